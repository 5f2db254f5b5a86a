//! HTTP client for the crawl service
//!
//! This module handles the one request this crate makes:
//! - Building the HTTP client with a product user agent
//! - Building the `/api/crawl` request URL from a `RequestConfig`
//! - Bounding the request with a timeout
//! - Classifying failures into transport, status and timeout errors

use crate::config::{RequestConfig, ServiceConfig};
use crate::ReportError;
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use url::Url;

/// Path of the crawl endpoint, relative to the service base URL
pub const CRAWL_ENDPOINT: &str = "api/crawl";

/// The crawl service as seen by the request controller
///
/// Implementations return the raw delimited-text payload; decoding happens in
/// the controller so that decode failures can be told apart from fetch
/// failures.
pub trait CrawlService: Send + Sync {
    /// Issues one crawl request and returns the response body
    fn fetch_report(
        &self,
        config: &RequestConfig,
    ) -> impl Future<Output = Result<String, ReportError>> + Send;
}

/// Crawl service reached over HTTP
#[derive(Debug, Clone)]
pub struct HttpCrawlService {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

impl HttpCrawlService {
    /// Creates a service client from the `[service]` configuration
    ///
    /// A base URL with a path prefix should end in `/`, otherwise its last
    /// segment is replaced by the endpoint path.
    ///
    /// # Example
    ///
    /// ```
    /// use crawl_report::client::HttpCrawlService;
    /// use crawl_report::config::ServiceConfig;
    ///
    /// let service = HttpCrawlService::new(&ServiceConfig::default()).unwrap();
    /// assert_eq!(service.endpoint().as_str(), "http://localhost:8080/api/crawl");
    /// ```
    pub fn new(config: &ServiceConfig) -> Result<Self, ReportError> {
        let endpoint = Url::parse(&config.base_url)?.join(CRAWL_ENDPOINT)?;
        let client = build_http_client()?;

        Ok(Self {
            client,
            endpoint,
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    /// Overrides the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch_once(&self, url: &Url) -> Result<String, ReportError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Crawl service responded with HTTP {}", status.as_u16());
            return Err(ReportError::HttpStatus {
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| classify_error(url, e))
    }
}

impl CrawlService for HttpCrawlService {
    async fn fetch_report(&self, config: &RequestConfig) -> Result<String, ReportError> {
        let url = build_request_url(&self.endpoint, config);
        tracing::info!(
            "Requesting crawl of {} (concurrency {}, max pages {})",
            config.target_url(),
            config.max_concurrency(),
            config.max_pages()
        );
        tracing::debug!("GET {}", url);

        match tokio::time::timeout(self.timeout, self.fetch_once(&url)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!("Crawl request timed out after {:?}", self.timeout);
                Err(ReportError::Timeout {
                    after: self.timeout,
                })
            }
        }
    }
}

/// Builds the HTTP client used for crawl requests
///
/// No overall request timeout is set here; the service wraps each request in
/// its own timeout instead.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Builds the full request URL for a crawl
///
/// # Example
///
/// ```
/// use crawl_report::client::build_request_url;
/// use crawl_report::config::RequestConfig;
/// use url::Url;
///
/// let endpoint = Url::parse("http://localhost:8080/api/crawl").unwrap();
/// let config = RequestConfig::new("https://example.com/a b", 5, 25).unwrap();
/// let url = build_request_url(&endpoint, &config);
/// assert_eq!(
///     url.as_str(),
///     "http://localhost:8080/api/crawl?url=https%3A%2F%2Fexample.com%2Fa+b&maxConcurrency=5&maxPages=25"
/// );
/// ```
pub fn build_request_url(endpoint: &Url, config: &RequestConfig) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .clear()
        .append_pair("url", config.target_url())
        .append_pair("maxConcurrency", &config.max_concurrency().to_string())
        .append_pair("maxPages", &config.max_pages().to_string());
    url
}

fn classify_error(url: &Url, error: reqwest::Error) -> ReportError {
    let message = if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        "Connection refused".to_string()
    } else {
        error.to_string()
    };

    ReportError::Transport {
        url: url.to_string(),
        message,
    }
}
