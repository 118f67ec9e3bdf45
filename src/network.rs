use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;

use crate::config::Config;

/// The page-fetching boundary of the crawl.
///
/// The crawl core only sees this trait; production wires in [`HttpClient`],
/// tests substitute scripted fetchers.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetch a URL, returning within the configured per-request timeout or
    /// failing with [`FetchError::Timeout`].
    async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError>;
}

/// Result of a successful HTTP fetch.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub content: String,
    pub status_code: u16,
    pub content_type: Option<String>,
}

/// Errors that can occur during HTTP fetching.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout")]
    Timeout,

    #[error("HTTP status {0}")]
    HttpStatus(u16),

    #[error("Not an HTML page: {0}")]
    NotHtml(String),

    #[error("Failed to read response body: {0}")]
    Body(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

/// HTTP client for fetching pages during a crawl.
#[derive(Debug)]
pub struct HttpClient {
    client: reqwest::Client,
    timeout_duration: Duration,
}

impl HttpClient {
    /// Create a new HTTP client with settings suited to crawling.
    pub fn new(user_agent: &str, fetch_timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(fetch_timeout)
            .connect_timeout(Duration::from_secs(Config::CONNECT_TIMEOUT_SECS))
            .redirect(reqwest::redirect::Policy::limited(Config::MAX_REDIRECTS))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            timeout_duration: fetch_timeout,
        })
    }
}

#[async_trait]
impl Fetch for HttpClient {
    async fn fetch(&self, url: &str) -> Result<FetchResult, FetchError> {
        let response = timeout(self.timeout_duration, self.client.get(url).send())
            .await
            .map_err(|_| FetchError::Timeout)?
            .map_err(classify_error)?;

        let status_code = response.status().as_u16();
        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(status_code));
        }

        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string());

        // A missing content-type header gets the benefit of the doubt.
        if let Some(ct) = content_type.as_deref() {
            if !is_html_content_type(ct) {
                return Err(FetchError::NotHtml(ct.to_string()));
            }
        }

        let content = timeout(self.timeout_duration, response.text())
            .await
            .map_err(|_| FetchError::Timeout)?
            .map_err(|e| FetchError::Body(e.to_string()))?;

        Ok(FetchResult {
            content,
            status_code,
            content_type,
        })
    }
}

/// Classify reqwest errors into our FetchError types.
fn classify_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Network(error.to_string())
    }
}

/// Check whether a content-type header names a parseable HTML document.
pub fn is_html_content_type(content_type: &str) -> bool {
    let ct = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim();
    ct.eq_ignore_ascii_case("text/html") || ct.eq_ignore_ascii_case("application/xhtml+xml")
}
