use reqwest::StatusCode;
use serde_json::Value;

use super::envelope::ResponseHeaders;

/// Every way a call against Shoptet can fail.
///
/// Shoptet reports failures through the HTTP status, through an `errors`
/// array on 400 responses, and through a `success: false` flag on otherwise
/// successful responses. All of them end up here.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// We never received a response: connection refused, DNS failure, or a timeout.
    #[error("transport failure: {0}")]
    Transport(#[source] reqwest::Error),

    /// The requested resource does not exist (HTTP 404).
    #[error("resource not found: {path}")]
    NotFound { path: String },

    /// The access token was rejected (HTTP 401).
    /// The token is kept for diagnostics, but never displayed.
    #[error("access token was rejected")]
    InvalidAuthorization { access_token: String },

    /// The access token cannot be sent as an HTTP header value (e.g. it contains a newline).
    /// Nothing was sent to Shoptet.
    #[error("access token is not a valid header value")]
    InvalidAccessToken,

    /// Too many requests (HTTP 429).
    /// The response headers carry Shoptet's rate limit metadata. Header names
    /// are as our HTTP stack received them, i.e. lowercased, so the serialized
    /// form reads `"retry-after"` rather than `"Retry-After"`.
    #[error("rate limit exceeded: {}", .headers.to_json())]
    RateLimitExceeded { headers: ResponseHeaders },

    /// A page past the last one was requested.
    #[error("page not found: {message}")]
    PageNotFound { message: String },

    /// Shoptet rejected the request (HTTP 400) with the given message.
    #[error("request rejected: {message}")]
    Request { message: String },

    /// The response claimed `success: false`. The full body is retained.
    #[error("request was not successful: {payload}")]
    Another { payload: Value },

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// The HTTP status this error was derived from, if it was derived from one.
    ///
    /// `Another` is reported on 2xx responses and has no meaningful status.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            ApiError::InvalidAuthorization { .. } => Some(StatusCode::UNAUTHORIZED),
            ApiError::RateLimitExceeded { .. } => Some(StatusCode::TOO_MANY_REQUESTS),
            ApiError::PageNotFound { .. } | ApiError::Request { .. } => {
                Some(StatusCode::BAD_REQUEST)
            }
            ApiError::Transport(_)
            | ApiError::InvalidAccessToken
            | ApiError::Another { .. }
            | ApiError::InvalidUrl(_)
            | ApiError::Json(_) => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}
