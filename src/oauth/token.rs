use serde::Deserialize;
use serde_json::Value;

/// A token granted by Shoptet's OAuth server.
///
/// The code exchange returns the long-lived OAuth access token (with `token_type`
/// and `scope`). Retrieval of an API token returns a short-lived token with
/// `expires_in`. Both share this shape.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct GrantedToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// An OAuth error response.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OAuthError {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

/// A typed reading of the JSON returned by the OAuth operations.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenPayload {
    Granted(GrantedToken),
    Rejected(OAuthError),
    /// Neither a token nor a recognizable error. The raw value is kept.
    Unrecognized(Value),
}

impl TokenPayload {
    pub fn from_value(value: Value) -> Self {
        // Errors are checked first: a rejected request never carries a usable token.
        if let Ok(error) = OAuthError::deserialize(&value) {
            return TokenPayload::Rejected(error);
        }
        if let Ok(token) = GrantedToken::deserialize(&value) {
            return TokenPayload::Granted(token);
        }
        TokenPayload::Unrecognized(value)
    }

    pub fn access_token(&self) -> Option<&str> {
        match self {
            TokenPayload::Granted(token) => Some(token.access_token.as_str()),
            _ => None,
        }
    }
}

impl From<Value> for TokenPayload {
    fn from(value: Value) -> Self {
        TokenPayload::from_value(value)
    }
}
