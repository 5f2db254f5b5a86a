use crate::config::validation::validate_request;
use crate::ValidationError;
use serde::Deserialize;
use std::ops::RangeInclusive;

/// Accepted range for `max_concurrency`
pub const MAX_CONCURRENCY_RANGE: RangeInclusive<u32> = 1..=20;

/// Accepted range for `max_pages`
pub const MAX_PAGES_RANGE: RangeInclusive<u32> = 1..=1000;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_MAX_CONCURRENCY: u32 = 5;
pub const DEFAULT_MAX_PAGES: u32 = 25;
pub const DEFAULT_PRODUCT_NAME: &str = "crawler";

/// Main configuration structure for Crawl-Report
///
/// Every table is optional; missing values fall back to the defaults above.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub service: ServiceConfig,
    pub defaults: DefaultsConfig,
    pub export: ExportConfig,
}

/// Where the crawl service lives and how long to wait for it
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Origin of the crawl service (the `/api/crawl` path is appended)
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Upper bound on one request, in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Initial values of the request form, also restored on reset
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    #[serde(rename = "max-concurrency")]
    pub max_concurrency: u32,

    #[serde(rename = "max-pages")]
    pub max_pages: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

/// Export file settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Product prefix of the export file name (`<product>_report.csv`)
    #[serde(rename = "product-name")]
    pub product_name: String,

    /// Directory the export file is written to
    pub directory: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            product_name: DEFAULT_PRODUCT_NAME.to_string(),
            directory: ".".to_string(),
        }
    }
}

/// Parameters of one crawl request
///
/// Built only through validation, and never changed afterwards: editing the
/// form while a request is in flight does not touch the issued config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestConfig {
    target_url: String,
    max_concurrency: u32,
    max_pages: u32,
}

impl RequestConfig {
    /// Creates a validated request config
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the URL is not a well-formed http(s) URL or
    /// a numeric field is out of range.
    pub fn new(
        target_url: impl Into<String>,
        max_concurrency: u32,
        max_pages: u32,
    ) -> Result<Self, ValidationError> {
        let target_url = target_url.into().trim().to_string();
        validate_request(&target_url, max_concurrency, max_pages)?;
        Ok(Self {
            target_url,
            max_concurrency,
            max_pages,
        })
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    pub fn max_concurrency(&self) -> u32 {
        self.max_concurrency
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }
}

/// The user-editable request fields
///
/// Numeric setters clamp into range, so out-of-range values never reach a
/// request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestForm {
    url: String,
    max_concurrency: u32,
    max_pages: u32,
}

impl RequestForm {
    /// Creates a form holding the given defaults and an empty URL
    pub fn new(defaults: &DefaultsConfig) -> Self {
        Self {
            url: String::new(),
            max_concurrency: clamp(defaults.max_concurrency, &MAX_CONCURRENCY_RANGE),
            max_pages: clamp(defaults.max_pages, &MAX_PAGES_RANGE),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn max_concurrency(&self) -> u32 {
        self.max_concurrency
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    pub fn set_max_concurrency(&mut self, value: u32) {
        self.max_concurrency = clamp(value, &MAX_CONCURRENCY_RANGE);
    }

    pub fn set_max_pages(&mut self, value: u32) {
        self.max_pages = clamp(value, &MAX_PAGES_RANGE);
    }

    /// Freezes the current field values into a request config
    pub fn snapshot(&self) -> Result<RequestConfig, ValidationError> {
        RequestConfig::new(self.url.clone(), self.max_concurrency, self.max_pages)
    }
}

impl Default for RequestForm {
    fn default() -> Self {
        Self::new(&DefaultsConfig::default())
    }
}

fn clamp(value: u32, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}
