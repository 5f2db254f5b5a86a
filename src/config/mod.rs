//! Configuration module for Crawl-Report
//!
//! This module handles the optional TOML settings file and the request
//! parameters the user edits before each crawl.
//!
//! # Example
//!
//! ```no_run
//! use crawl_report::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl-report.toml")).unwrap();
//! println!("Default page limit: {}", config.defaults.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    DefaultsConfig, ExportConfig, RequestConfig, RequestForm, ServiceConfig, ViewerConfig,
    DEFAULT_MAX_CONCURRENCY, DEFAULT_MAX_PAGES, MAX_CONCURRENCY_RANGE, MAX_PAGES_RANGE,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate_request;
