use serde_json::Value;

use crate::{
    api::{decode_body, ApiClient, ApiError},
    http_client,
};

/// The OAuth endpoint exchanging an authorization code for an OAuth access token.
const TOKEN_ENDPOINT: &str = "token";

/// The OAuth endpoint handing out short-lived API access tokens.
const ACCESS_TOKEN_ENDPOINT: &str = "getAccessToken";

/// The only scope Shoptet's OAuth server grants to addons.
const OAUTH_SCOPE: &str = "api";

impl ApiClient {
    /// Exchanges the authorization code this client was created with for an OAuth access token.
    ///
    /// During installation, Shoptet redirects to the addon with a `code`. Create the client
    /// with that code in place of the access token, then call this once.
    ///
    /// The response is handed back exactly as decoded, whether it holds a token or an
    /// OAuth error; see [`TokenPayload`](super::TokenPayload) to interpret it.
    /// A body that is not JSON comes back as `null`.
    pub async fn exchange_auth_code(
        &self,
        client_id: &str,
        redirect_uri: &str,
        client_secret: Option<&str>,
    ) -> Result<Value, ApiError> {
        let mut form = vec![
            ("code", self.credentials.access_token.as_str()),
            ("grant_type", "authorization_code"),
            ("client_id", client_id),
            ("redirect_uri", redirect_uri),
            ("scope", OAUTH_SCOPE),
        ];
        if let Some(secret) = client_secret {
            form.push(("client_secret", secret));
        }

        let request = self.http.post(self.oauth_url(TOKEN_ENDPOINT)?).form(&form);
        let response = http_client::execute(&self.http, request).await?;
        Ok(decode_body(&response.body).unwrap_or(Value::Null))
    }

    /// Retrieves an API access token using an OAuth access token
    /// previously obtained through [`ApiClient::exchange_auth_code`].
    ///
    /// As with the code exchange, the decoded body is returned verbatim.
    pub async fn fetch_api_token(&self, oauth_access_token: &str) -> Result<Value, ApiError> {
        let request = self
            .http
            .get(self.oauth_url(ACCESS_TOKEN_ENDPOINT)?)
            .bearer_auth(oauth_access_token);
        let response = http_client::execute(&self.http, request).await?;
        Ok(decode_body(&response.body).unwrap_or(Value::Null))
    }

    fn oauth_url(&self, endpoint: &str) -> Result<url::Url, ApiError> {
        let base = self.config.oauth_base_for(&self.credentials.tenant_id);
        Ok(url::Url::parse(&format!("{base}/{endpoint}"))?)
    }
}
