use std::fmt;

use reqwest::header::{HeaderValue, CONTENT_TYPE};

use super::{
    classify::{classify, ReceivedResponse},
    envelope::{decode_body, ResponseEnvelope, ResponseHeaders},
    ApiError, ApiRequest,
};
use crate::{config::ClientConfig, http_client};

/// Header carrying our access token on every resource request.
const ACCESS_TOKEN_HEADER: &str = "Shoptet-Access-Token";

/// The vendor content type Shoptet expects, which also selects the API version.
const SHOPTET_CONTENT_TYPE: &str = "application/vnd.shoptet.v1.0";

/// The credentials a client is bound to for its entire lifetime.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Sent as `Shoptet-Access-Token`, and as the OAuth `code` during code exchange.
    pub access_token: String,
    /// The shop's subdomain under `myshoptet.com`.
    pub tenant_id: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

/// A client for a single Shoptet shop.
///
/// Cloning is cheap and clones share the same connection pool.
/// Concurrent calls from several tasks are fine; each call is independent.
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub(crate) credentials: Credentials,
    pub(crate) config: ClientConfig,
    pub(crate) http: reqwest::Client,
}

impl ApiClient {
    /// Creates a new API client around the given access token and shop.
    /// Neither value is validated; Shoptet will tell us if they are wrong.
    pub fn new(
        access_token: impl Into<String>,
        tenant_id: impl Into<String>,
    ) -> Result<Self, ApiError> {
        Self::with_config(access_token, tenant_id, ClientConfig::default())
    }

    pub fn with_config(
        access_token: impl Into<String>,
        tenant_id: impl Into<String>,
        config: ClientConfig,
    ) -> Result<Self, ApiError> {
        let http = http_client::build_http_client(&config)?;
        Ok(Self {
            credentials: Credentials {
                access_token: access_token.into(),
                tenant_id: tenant_id.into(),
            },
            config,
            http,
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Performs an authenticated call against the resource API.
    ///
    /// The returned envelope always carries the response headers. Its `data`
    /// is the decoded body, or an empty object if the body was empty or not JSON.
    ///
    /// If the access token cannot be sent as a header value, this fails with
    /// [`ApiError::InvalidAccessToken`] before anything is sent.
    pub async fn request(&self, request: ApiRequest) -> Result<ResponseEnvelope, ApiError> {
        // Paths are relative to the API base; query parameters go straight into the URL.
        let url = request.url(&self.config.api_base_url)?;

        // Every call is authenticated by the token alone. Shoptet also expects its
        // vendor content type, even on requests without a body, as it selects the API version.
        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .header(ACCESS_TOKEN_HEADER, self.access_token_header()?)
            .header(CONTENT_TYPE, SHOPTET_CONTENT_TYPE);

        // Post fields are only sent if there are any, independently of the query string.
        if let Some(body) = request.body()? {
            builder = builder.body(body);
        }

        let response = http_client::execute(&self.http, builder).await?;

        // From here on we have a complete response. Whether it is a success
        // depends on its status as well as on its body.
        classify(ReceivedResponse {
            status: response.status,
            path: &request.path,
            access_token: &self.credentials.access_token,
            headers: ResponseHeaders::from_header_map(&response.headers),
            body: decode_body(&response.body),
        })
    }

    /// Shorthand for a `GET` with the given query parameters.
    pub async fn get<K, V>(
        &self,
        path: &str,
        query_parameters: impl IntoIterator<Item = (K, V)>,
    ) -> Result<ResponseEnvelope, ApiError>
    where
        K: Into<String>,
        V: ToString,
    {
        let request = query_parameters
            .into_iter()
            .fold(ApiRequest::get(path), |request, (name, value)| {
                request.query(name, value)
            });
        self.request(request).await
    }

    /// Marks the token as sensitive so it is kept out of reqwest's debug output.
    fn access_token_header(&self) -> Result<HeaderValue, ApiError> {
        let mut value = HeaderValue::from_str(&self.credentials.access_token)
            .map_err(|_| ApiError::InvalidAccessToken)?;
        value.set_sensitive(true);
        Ok(value)
    }
}
