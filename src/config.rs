use std::time::Duration;

/// The base URL for all resource requests.
pub const API_BASE_URL: &str = "https://api.myshoptet.com";

/// The base URL for the OAuth server of a single shop.
/// `{tenant}` is replaced with the shop's subdomain.
pub const OAUTH_BASE_URL: &str = "https://{tenant}.myshoptet.com/action/ApiOAuthServer";

/// Identifies this client to Shoptet on every request.
pub const USER_AGENT: &str =
    "Ecomail.cz Shoptet client (https://github.com/Ecomailcz/shoptet-client)";

/// How long we wait for a connection to be established.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// How long an entire request (including reading the body) may take.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Placeholder substituted within [`ClientConfig::oauth_base_url`].
const TENANT_PLACEHOLDER: &str = "{tenant}";

/// Endpoints, identification and timeouts used by an [`ApiClient`](crate::ApiClient).
///
/// The defaults talk to production Shoptet. Overriding the endpoints is
/// mostly useful for pointing the client at a mock server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub oauth_base_url: String,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: API_BASE_URL.to_string(),
            oauth_base_url: OAUTH_BASE_URL.to_string(),
            user_agent: USER_AGENT.to_string(),
            connect_timeout: CONNECT_TIMEOUT,
            timeout: REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Overrides the OAuth server location.
    /// The value may contain `{tenant}`, which is replaced with the shop's subdomain.
    pub fn with_oauth_base_url(mut self, url: impl Into<String>) -> Self {
        self.oauth_base_url = url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The OAuth server base for the given tenant, without a trailing slash.
    pub(crate) fn oauth_base_for(&self, tenant_id: &str) -> String {
        self.oauth_base_url
            .replace(TENANT_PLACEHOLDER, tenant_id)
            .trim_end_matches('/')
            .to_string()
    }
}
