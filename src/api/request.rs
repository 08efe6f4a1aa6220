use reqwest::Method;
use serde::Serialize;
use serde_json::{Map, Value};
use url::Url;

use super::ApiError;

/// A single call against the resource API.
///
/// `path` is relative to the API base (e.g. `api/eshop`). Post fields become
/// a JSON body and query parameters become the query string; both may be
/// given at once.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub post_fields: Map<String, Value>,
    pub query_parameters: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            post_fields: Map::new(),
            query_parameters: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Adds a single field to the JSON body.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.post_fields.insert(name.into(), value.into());
        self
    }

    /// Replaces the JSON body fields with the serialized form of `fields`,
    /// which must serialize to a JSON object.
    pub fn fields<T: Serialize>(mut self, fields: &T) -> Result<Self, ApiError> {
        self.post_fields = match serde_json::to_value(fields)? {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(ApiError::Json(serde::ser::Error::custom(format!(
                    "post fields must serialize to an object, got {other}"
                ))))
            }
        };
        Ok(self)
    }

    /// Appends a query parameter. Repeated names are all sent, in order.
    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query_parameters.push((name.into(), value.to_string()));
        self
    }

    /// Resolves the full target URL against the API base.
    pub(crate) fn url(&self, base: &str) -> Result<Url, ApiError> {
        let path = self.path.strip_prefix('/').unwrap_or(&self.path);
        let mut url = Url::parse(&format!("{}/{}", base.trim_end_matches('/'), path))?;
        if !self.query_parameters.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query_parameters);
        }
        Ok(url)
    }

    /// The JSON body to send, if there is anything to send.
    pub(crate) fn body(&self) -> Result<Option<Vec<u8>>, ApiError> {
        if self.post_fields.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::to_vec(&self.post_fields)?))
    }
}
