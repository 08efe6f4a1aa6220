use reqwest::{header::HeaderMap, StatusCode};
use tracing::debug;

use crate::{api::ApiError, config::ClientConfig};

/// Everything we keep from a response once it has been fully received.
#[derive(Debug)]
pub(crate) struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Creates the underlying HTTP client with our user agent and timeouts applied.
///
/// Both timeouts are enforced by reqwest itself. Expiry of either surfaces
/// as a [`reqwest::Error`] with `is_timeout()` set, which we treat as a transport failure.
pub(crate) fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client, ApiError> {
    reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .connect_timeout(config.connect_timeout)
        .timeout(config.timeout)
        .build()
        .map_err(ApiError::Transport)
}

/// Executes the given request and reads its body in full.
///
/// Any failure here means we never received a complete response,
/// so it is always reported as [`ApiError::Transport`].
pub(crate) async fn execute(
    client: &reqwest::Client,
    request: reqwest::RequestBuilder,
) -> Result<RawResponse, ApiError> {
    let request = request.build().map_err(ApiError::Transport)?;
    let method = request.method().clone();
    let url = request.url().clone();
    debug!(%method, %url, "sending Shoptet request");

    // Redirects are followed by reqwest. If we fail here, we never got a status back.
    let response = client.execute(request).await.map_err(|err| {
        debug!(%method, %url, error = %err, "Shoptet request failed");
        ApiError::Transport(err)
    })?;

    // We hold on to the headers before the body consumes the response.
    // Reading the body still counts against the total timeout.
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.bytes().await.map_err(ApiError::Transport)?;
    debug!(%method, %url, %status, bytes = body.len(), "received Shoptet response");

    Ok(RawResponse {
        status,
        headers,
        body: body.to_vec(),
    })
}
