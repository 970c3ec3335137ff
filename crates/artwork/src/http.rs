//! Shared HTTP client construction and image download.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use crate::error::Error;
use crate::provider::FetchedImage;

/// How long an endpoint may stay silent before the request fails.
pub const DEFAULT_HEADER_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport settings for every provider request.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Applied to connecting and to each read, so a server that accepts
    /// the connection but never answers cannot hang the run.
    pub header_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            header_timeout: DEFAULT_HEADER_TIMEOUT,
            user_agent: concat!("steamgrid/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Builds the client shared by all providers of a run.
pub fn build_http_client(config: &HttpConfig) -> Result<reqwest::Client, Error> {
    let http = reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .connect_timeout(config.header_timeout)
        .read_timeout(config.header_timeout)
        .build()?;
    Ok(http)
}

/// Downloads an image, reporting a non-success status as a miss.
pub(crate) async fn fetch_image(
    http: &reqwest::Client,
    url: &str,
) -> Result<Option<FetchedImage>, Error> {
    let resp = http.get(url).send().await?;
    let status = resp.status();
    if !status.is_success() {
        tracing::debug!(url, status = status.as_u16(), "image not available");
        return Ok(None);
    }

    let content_type = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = resp.bytes().await?.to_vec();
    if bytes.is_empty() {
        tracing::debug!(url, "empty image body");
        return Ok(None);
    }

    Ok(Some(FetchedImage {
        bytes,
        content_type,
        url: url.to_string(),
    }))
}
