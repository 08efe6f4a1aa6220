use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{
    envelope::{is_falsy, ResponseEnvelope, ResponseHeaders},
    ApiError,
};

/// Shoptet reports an exhausted paginator with a message containing this.
const PAGE_NOT_FOUND_MARKER: &str = "max page is";

/// A single entry of the `errors` array Shoptet returns on 400 responses.
#[derive(Deserialize, Debug)]
struct ErrorEntry {
    #[serde(default)]
    message: Option<Value>,
    #[serde(flatten)]
    rest: serde_json::Map<String, Value>,
}

impl ErrorEntry {
    /// The error's message, or the whole entry if it did not carry a string one.
    fn message(&self) -> String {
        match &self.message {
            Some(Value::String(message)) => message.clone(),
            Some(other) => other.to_string(),
            None => Value::Object(self.rest.clone()).to_string(),
        }
    }
}

/// Everything the pipeline needs to judge a received response.
pub(crate) struct ReceivedResponse<'a> {
    pub status: StatusCode,
    pub path: &'a str,
    pub access_token: &'a str,
    pub headers: ResponseHeaders,
    pub body: Option<Value>,
}

/// Turns a received response into either an envelope or an error.
///
/// HTTP status is judged first. Statuses with no specific meaning fall
/// through to the body checks, as does a 400 without any `errors`.
pub(crate) fn classify(response: ReceivedResponse<'_>) -> Result<ResponseEnvelope, ApiError> {
    let ReceivedResponse {
        status,
        path,
        access_token,
        headers,
        body,
    } = response;

    if status != StatusCode::OK && status != StatusCode::CREATED {
        if let Some(err) = classify_status(status, path, access_token, &headers, body.as_ref()) {
            debug!(%status, path, error = %err, "Shoptet responded with an error");
            return Err(err);
        }
    }

    let body = match body {
        Some(body) if !is_falsy(&body) => body,
        _ => return Ok(ResponseEnvelope::empty(headers)),
    };

    if let Some(success) = body.get("success") {
        if is_falsy(success) {
            debug!(%status, path, "Shoptet reported an unsuccessful request");
            return Err(ApiError::Another { payload: body });
        }
    }

    Ok(ResponseEnvelope {
        data: body,
        headers,
    })
}

fn classify_status(
    status: StatusCode,
    path: &str,
    access_token: &str,
    headers: &ResponseHeaders,
    body: Option<&Value>,
) -> Option<ApiError> {
    match status {
        StatusCode::NOT_FOUND => Some(ApiError::NotFound {
            path: path.to_string(),
        }),
        StatusCode::UNAUTHORIZED => Some(ApiError::InvalidAuthorization {
            access_token: access_token.to_string(),
        }),
        StatusCode::TOO_MANY_REQUESTS => Some(ApiError::RateLimitExceeded {
            headers: headers.clone(),
        }),
        StatusCode::BAD_REQUEST => first_error_message(body?).map(|message| {
            if message.contains(PAGE_NOT_FOUND_MARKER) {
                ApiError::PageNotFound { message }
            } else {
                ApiError::Request { message }
            }
        }),
        _ => None,
    }
}

/// Only the first reported error is surfaced; any others are dropped.
///
/// The body must be an object with an `errors` field. Anything else,
/// including a top-level array, carries no errors.
fn first_error_message(body: &Value) -> Option<String> {
    let errors = body.as_object()?.get("errors")?;
    let errors = Vec::<ErrorEntry>::deserialize(errors).ok()?;
    errors.first().map(ErrorEntry::message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn received(status: u16, body: Option<Value>) -> ReceivedResponse<'static> {
        ReceivedResponse {
            status: StatusCode::from_u16(status).unwrap(),
            path: "api/products",
            access_token: "token-123",
            headers: ResponseHeaders::parse("X-RateLimit-Remaining: 0\nRetry-After: 7\n"),
            body,
        }
    }

    #[test]
    fn ok_returns_body_and_headers() {
        let envelope = classify(received(200, Some(json!({ "data": { "id": 1 } })))).unwrap();
        assert_eq!(envelope.data, json!({ "data": { "id": 1 } }));
        assert_eq!(envelope.headers.get("X-RateLimit-Remaining"), Some("0"));
    }

    #[test]
    fn created_with_success_true_passes() {
        let envelope = classify(received(201, Some(json!({ "success": true })))).unwrap();
        assert_eq!(envelope.data, json!({ "success": true }));
    }

    #[test]
    fn not_found_ignores_body() {
        let err = classify(received(404, Some(json!({ "success": true })))).unwrap_err();
        assert!(matches!(err, ApiError::NotFound { ref path } if path == "api/products"));
    }

    #[test]
    fn unauthorized_carries_token() {
        let err = classify(received(401, None)).unwrap_err();
        assert!(
            matches!(err, ApiError::InvalidAuthorization { ref access_token } if access_token == "token-123")
        );
    }

    #[test]
    fn too_many_requests_carries_headers() {
        let err = classify(received(429, None)).unwrap_err();
        let ApiError::RateLimitExceeded { headers } = &err else {
            panic!("expected rate limit error, got {err:?}");
        };
        assert_eq!(headers.retry_after(), Some(std::time::Duration::from_secs(7)));
    }

    #[test]
    fn bad_request_past_last_page() {
        let body = json!({ "errors": [{ "message": "Page 5, max page is 3" }] });
        let err = classify(received(400, Some(body))).unwrap_err();
        assert!(
            matches!(err, ApiError::PageNotFound { ref message } if message == "Page 5, max page is 3")
        );
    }

    #[test]
    fn bad_request_uses_first_error_only() {
        let body = json!({
            "errors": [
                { "errorCode": "invalid-field", "message": "Invalid field X" },
                { "message": "Page 5, max page is 3" }
            ]
        });
        let err = classify(received(400, Some(body))).unwrap_err();
        assert!(matches!(err, ApiError::Request { ref message } if message == "Invalid field X"));
    }

    #[test]
    fn bad_request_without_message_reports_entry() {
        let body = json!({ "errors": [{ "errorCode": "oops" }] });
        let err = classify(received(400, Some(body))).unwrap_err();
        assert!(matches!(err, ApiError::Request { ref message } if message == r#"{"errorCode":"oops"}"#));
    }

    #[test]
    fn bad_request_without_errors_falls_through() {
        let envelope = classify(received(400, Some(json!({ "errors": [], "data": 1 })))).unwrap();
        assert_eq!(envelope.data, json!({ "errors": [], "data": 1 }));

        let err = classify(received(400, Some(json!({ "errors": null, "success": false }))))
            .unwrap_err();
        assert!(matches!(err, ApiError::Another { .. }));
    }

    #[test]
    fn bad_request_with_array_body_falls_through() {
        let body = json!([[{ "message": "boom" }]]);
        let envelope = classify(received(400, Some(body.clone()))).unwrap();
        assert_eq!(envelope.data, body);
    }

    #[test]
    fn bad_request_with_malformed_errors_falls_through() {
        let body = json!({ "errors": "boom" });
        let envelope = classify(received(400, Some(body.clone()))).unwrap();
        assert_eq!(envelope.data, body);
    }

    #[test]
    fn unclassified_status_falls_through() {
        let envelope = classify(received(500, None)).unwrap();
        assert_eq!(envelope.data, json!({}));

        let envelope = classify(received(503, Some(json!({ "data": "x" })))).unwrap();
        assert_eq!(envelope.data, json!({ "data": "x" }));
    }

    #[test]
    fn success_false_is_another_error() {
        let body = json!({ "success": false, "reason": "stock locked" });
        let err = classify(received(200, Some(body.clone()))).unwrap_err();
        assert!(matches!(err, ApiError::Another { ref payload } if payload == &body));
    }

    #[test]
    fn falsy_body_yields_empty_data() {
        for body in [None, Some(json!(null)), Some(json!([])), Some(json!(false))] {
            let envelope = classify(received(200, body)).unwrap();
            assert_eq!(envelope.data, json!({}));
            assert_eq!(envelope.headers.len(), 2);
        }
    }

    #[test]
    fn non_object_body_is_returned_as_is() {
        let envelope = classify(received(200, Some(json!([1, 2])))).unwrap();
        assert_eq!(envelope.data, json!([1, 2]));
    }
}
