//! A client for the Shoptet REST API.
//!
//! [`ApiClient`] is bound to one shop (its subdomain) and one access token. It can
//! perform the OAuth handshake Shoptet addons go through on installation, and it
//! performs authenticated calls against `api.myshoptet.com`.
//!
//! Shoptet reports failures in three ways: the HTTP status, an `errors` array on
//! 400 responses, and a `success: false` flag on responses that are otherwise fine.
//! All three are mapped onto [`ApiError`].
//!
//! ```no_run
//! # async fn run() -> Result<(), shoptet_client::ApiError> {
//! use shoptet_client::{ApiClient, ApiError, ApiRequest};
//!
//! let client = ApiClient::new("access-token", "my-shop")?;
//! let request = ApiRequest::get("api/products").query("page", 2);
//! match client.request(request).await {
//!     Ok(envelope) => println!("{}", envelope.data),
//!     Err(ApiError::PageNotFound { .. }) => println!("no more pages"),
//!     Err(err) => return Err(err),
//! }
//! # Ok(())
//! # }
//! ```

mod api;
mod config;
mod http_client;
mod oauth;

pub use api::{ApiClient, ApiError, ApiRequest, Credentials, ResponseEnvelope, ResponseHeaders};
pub use config::{
    ClientConfig, API_BASE_URL, CONNECT_TIMEOUT, OAUTH_BASE_URL, REQUEST_TIMEOUT, USER_AGENT,
};
pub use oauth::{GrantedToken, OAuthError, TokenPayload};

/// Re-exported so callers can build requests without depending on reqwest directly.
pub use reqwest::{Method, StatusCode};
