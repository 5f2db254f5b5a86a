//! Crawl-Report: a viewer for crawl reports
//!
//! This crate requests a crawl report from a remote crawling service, decodes the
//! delimited-text payload into typed rows, tracks the request lifecycle, and can
//! re-export the held rows as a CSV file.

pub mod client;
pub mod codec;
pub mod config;
pub mod controller;
pub mod output;

use thiserror::Error;

/// Main error type for Crawl-Report operations
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to fetch report from {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Failed to fetch report: service responded with HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("Failed to fetch report: request timed out after {after:?}")]
    Timeout { after: std::time::Duration },

    #[error("Failed to decode report: {0}")]
    Decode(#[from] DecodeError),

    #[error("Invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),
}

impl ReportError {
    /// Returns true if the error came from reaching the crawl service
    /// (as opposed to making sense of what it sent back)
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::HttpStatus { .. } | Self::Timeout { .. }
        )
    }

    /// Returns true if the payload arrived but could not be decoded
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

/// Errors raised while decoding a delimited-text payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed field at record {record}, column {column}: {reason}")]
    MalformedField {
        record: usize,
        column: usize,
        reason: String,
    },

    #[error("header has no recognized column: {header:?}")]
    UnrecognizedSchema { header: Vec<String> },
}

/// Request parameter errors, caught before a request is issued
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("target URL cannot be empty")]
    EmptyUrl,

    #[error("invalid target URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("target URL must use http or https, got '{0}'")]
    UnsupportedScheme(String),

    #[error("max concurrency must be between 1 and 20, got {0}")]
    MaxConcurrencyOutOfRange(u32),

    #[error("max pages must be between 1 and 1000, got {0}")]
    MaxPagesOutOfRange(u32),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Crawl-Report operations
pub type Result<T> = std::result::Result<T, ReportError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for decode operations
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;

// Re-export commonly used types
pub use client::{CrawlService, HttpCrawlService};
pub use codec::{decode, encode, Report, ReportRow, SchemaField};
pub use config::{RequestConfig, RequestForm, ViewerConfig};
pub use controller::{ExpansionSet, RequestLifecycle, Session, ViewState};
pub use output::ExportArtifact;
