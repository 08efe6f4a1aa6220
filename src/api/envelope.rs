use std::{collections::BTreeMap, time::Duration};

use reqwest::header::HeaderMap;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use super::ApiError;

/// The name of the header Shoptet uses to tell us how long to back off.
const RETRY_AFTER: &str = "Retry-After";

/// Response headers, keyed by their (case-preserved) name.
///
/// Headers received over the network arrive lowercased by our HTTP stack,
/// so prefer [`ResponseHeaders::get`] over indexing the map directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResponseHeaders(BTreeMap<String, String>);

impl ResponseHeaders {
    /// Parses a raw header block, one `Name: value` per line.
    ///
    /// Each line is split on its first colon only, so values such as URLs survive.
    /// Lines without a colon (e.g. an HTTP status line) are skipped.
    /// Later duplicates replace earlier ones.
    pub fn parse(raw: &str) -> Self {
        let headers = raw
            .split('\n')
            .filter_map(|line| line.split_once(':'))
            .map(|(name, value)| (name.trim(), value.trim()))
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        Self(headers)
    }

    pub(crate) fn from_header_map(map: &HeaderMap) -> Self {
        let headers = map
            .iter()
            .map(|(name, value)| {
                let value = String::from_utf8_lossy(value.as_bytes());
                (name.as_str().trim().to_string(), value.trim().to_string())
            })
            .collect();
        Self(headers)
    }

    /// Looks up a header, preferring an exact match and falling back to
    /// an ASCII case-insensitive one.
    pub fn get(&self, name: &str) -> Option<&str> {
        if let Some(value) = self.0.get(name) {
            return Some(value.as_str());
        }
        self.0
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// How long Shoptet asked us to wait, if it told us in whole seconds.
    pub fn retry_after(&self) -> Option<Duration> {
        self.get(RETRY_AFTER)?
            .parse::<u64>()
            .ok()
            .map(Duration::from_secs)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    /// The headers as a JSON object.
    pub fn to_json(&self) -> String {
        // A map of strings to strings always serializes.
        serde_json::to_string(&self.0).unwrap_or_default()
    }
}

/// What every successful call hands back: the decoded body and the response headers.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub data: Value,
    /// Headers as received. Our HTTP stack lowercases header names, so the keys
    /// of [`ResponseHeaders::as_map`] read e.g. `x-ratelimit-remaining`.
    /// [`ResponseHeaders::get`] matches regardless of case.
    pub headers: ResponseHeaders,
}

impl ResponseEnvelope {
    pub(crate) fn empty(headers: ResponseHeaders) -> Self {
        Self {
            data: empty_container(),
            headers,
        }
    }

    /// Decodes `data` into an endpoint-specific type.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(T::deserialize(&self.data)?)
    }

    pub fn into_data(self) -> Value {
        self.data
    }
}

pub(crate) fn empty_container() -> Value {
    Value::Object(Map::new())
}

/// Decodes a response body, treating empty or malformed JSON as absent.
pub(crate) fn decode_body(body: &[u8]) -> Option<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    serde_json::from_slice(body).ok()
}

/// Whether a JSON value counts as "false" the way Shoptet's own clients judge it:
/// `null`, `false`, zero, `""`, `"0"`, and empty arrays or objects.
pub(crate) fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n == 0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderName, HeaderValue};
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn parses_header_block() {
        let headers =
            ResponseHeaders::parse("Content-Type: application/json\nX-RateLimit-Remaining: 3\n");
        let expected: BTreeMap<String, String> = [
            ("Content-Type".to_string(), "application/json".to_string()),
            ("X-RateLimit-Remaining".to_string(), "3".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(headers.as_map(), &expected);
    }

    #[test]
    fn header_values_keep_later_colons() {
        let headers = ResponseHeaders::parse(
            "HTTP/1.1 301 Moved Permanently\r\nLocation:  https://example.com:8443/a \r\n\r\n",
        );
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("Location"), Some("https://example.com:8443/a"));
    }

    #[test]
    fn header_names_are_case_sensitive_keys() {
        let headers = ResponseHeaders::parse("X-Foo: a\nx-foo: b\n");
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("X-Foo"), Some("a"));
        assert_eq!(headers.get("x-foo"), Some("b"));
        assert_eq!(headers.get("X-FOO"), Some("a"));
    }

    #[test]
    fn header_map_conversion() {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static("retry-after"),
            HeaderValue::from_static("12"),
        );
        let headers = ResponseHeaders::from_header_map(&map);
        assert_eq!(headers.get("retry-after"), Some("12"));
        assert_eq!(headers.retry_after(), Some(Duration::from_secs(12)));
    }

    #[test]
    fn retry_after_ignores_dates() {
        let headers = ResponseHeaders::parse("Retry-After: Wed, 21 Oct 2015 07:28:00 GMT\n");
        assert_eq!(headers.retry_after(), None);
    }

    #[test]
    fn decodes_bodies() {
        assert_eq!(decode_body(b""), None);
        assert_eq!(decode_body(b"  \n"), None);
        assert_eq!(decode_body(b"<html>oops</html>"), None);
        assert_eq!(decode_body(br#"{"a": 1}"#), Some(json!({ "a": 1 })));
    }

    #[test]
    fn falsiness() {
        for value in [
            json!(null),
            json!(false),
            json!(0),
            json!(0.0),
            json!(""),
            json!("0"),
            json!([]),
            json!({}),
        ] {
            assert!(is_falsy(&value), "{value} should be falsy");
        }
        for value in [json!(true), json!(1), json!("false"), json!([0]), json!({ "a": null })] {
            assert!(!is_falsy(&value), "{value} should be truthy");
        }
    }

    #[test]
    fn envelope_deserializes_into_typed_data() {
        #[derive(Deserialize)]
        struct Product {
            guid: String,
        }

        let envelope = ResponseEnvelope {
            data: json!({ "guid": "abc" }),
            headers: ResponseHeaders::default(),
        };
        let product: Product = envelope.deserialize().expect("should decode product");
        assert_eq!(product.guid, "abc");

        let mismatch = envelope.deserialize::<Vec<String>>();
        assert!(matches!(mismatch, Err(ApiError::Json(_))));
    }
}
