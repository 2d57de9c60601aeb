use std::time::Duration;

use reqwest::{Client, StatusCode, redirect};

use crate::render;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_REDIRECTS: usize = 5;

/// Some restaurant sites serve bot-interstitial pages to non-browser agents.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    #[error("Could not resolve or reach host for {0}")]
    HostUnreachable(String),
    #[error("Request to {0} timed out")]
    Timeout(String),
    #[error("Target site blocked the request (HTTP 403): {0}")]
    Forbidden(String),
    #[error("Target page not found (HTTP 404): {0}")]
    NotFound(String),
    #[error("Browser rendering failed: {0}")]
    Browser(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Retrieves raw page HTML for a target URL, either with a plain GET or a
/// headless-browser render. One attempt per request, no retries.
#[derive(Debug, Clone)]
pub struct PageAcquirer {
    client: Client,
}

impl PageAcquirer {
    pub fn new() -> Result<Self, AcquireError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }

    /// Plain-mode acquisition: a single GET accepting any 2xx/3xx status.
    pub async fn fetch_page(&self, url: &str) -> Result<String, AcquireError> {
        let url = normalize_url(url);
        log::info!("Fetching page: {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| classify(e, &url))?;

        match response.status() {
            StatusCode::FORBIDDEN => Err(AcquireError::Forbidden(url)),
            StatusCode::NOT_FOUND => Err(AcquireError::NotFound(url)),
            _ => {
                response
                    .error_for_status()?
                    .text()
                    .await
                    .map_err(|e| classify(e, &url))
            }
        }
    }

    /// Rendering-mode acquisition for pages whose menu content is injected
    /// by client-side scripting.
    pub async fn fetch_rendered(&self, url: &str) -> Result<String, AcquireError> {
        let url = normalize_url(url);
        log::info!("Rendering page: {url}");
        render::fetch_rendered_html(&url).await
    }
}

fn classify(error: reqwest::Error, url: &str) -> AcquireError {
    if error.is_timeout() {
        AcquireError::Timeout(url.to_string())
    } else if error.is_connect() {
        // DNS resolution failures surface as connect errors.
        AcquireError::HostUnreachable(url.to_string())
    } else {
        AcquireError::Http(error)
    }
}

/// Prepends `https://` when the URL carries no scheme.
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}
