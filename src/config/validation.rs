use crate::config::types::{
    DefaultsConfig, ExportConfig, ServiceConfig, ViewerConfig, MAX_CONCURRENCY_RANGE,
    MAX_PAGES_RANGE,
};
use crate::{ConfigError, ValidationError};
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &ViewerConfig) -> Result<(), ConfigError> {
    validate_service_config(&config.service)?;
    validate_defaults_config(&config.defaults)?;
    validate_export_config(&config.export)?;
    Ok(())
}

/// Validates the parameters of a single crawl request
pub fn validate_request(
    target_url: &str,
    max_concurrency: u32,
    max_pages: u32,
) -> Result<(), ValidationError> {
    validate_target_url(target_url)?;

    if !MAX_CONCURRENCY_RANGE.contains(&max_concurrency) {
        return Err(ValidationError::MaxConcurrencyOutOfRange(max_concurrency));
    }

    if !MAX_PAGES_RANGE.contains(&max_pages) {
        return Err(ValidationError::MaxPagesOutOfRange(max_pages));
    }

    Ok(())
}

/// Syntactic check only: the URL must parse and use http or https
fn validate_target_url(target_url: &str) -> Result<(), ValidationError> {
    if target_url.is_empty() {
        return Err(ValidationError::EmptyUrl);
    }

    let url = Url::parse(target_url).map_err(|e| ValidationError::InvalidUrl {
        url: target_url.to_string(),
        reason: e.to_string(),
    })?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ValidationError::UnsupportedScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ValidationError::InvalidUrl {
            url: target_url.to_string(),
            reason: "missing host".to_string(),
        });
    }

    Ok(())
}

fn validate_service_config(config: &ServiceConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must use http or https, got '{}'",
            config.base_url
        )));
    }

    if config.timeout_secs < 1 || config.timeout_secs > 3600 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be between 1 and 3600, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

fn validate_defaults_config(config: &DefaultsConfig) -> Result<(), ConfigError> {
    if !MAX_CONCURRENCY_RANGE.contains(&config.max_concurrency) {
        return Err(ConfigError::Validation(format!(
            "max-concurrency must be between 1 and 20, got {}",
            config.max_concurrency
        )));
    }

    if !MAX_PAGES_RANGE.contains(&config.max_pages) {
        return Err(ConfigError::Validation(format!(
            "max-pages must be between 1 and 1000, got {}",
            config.max_pages
        )));
    }

    Ok(())
}

fn validate_export_config(config: &ExportConfig) -> Result<(), ConfigError> {
    // Product name becomes part of a file name
    if config.product_name.is_empty() {
        return Err(ConfigError::Validation(
            "product-name cannot be empty".to_string(),
        ));
    }

    if !config
        .product_name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(ConfigError::Validation(format!(
            "product-name must contain only ASCII letters, digits, '-', '_' or '.', got '{}'",
            config.product_name
        )));
    }

    if config.product_name == "." || config.product_name == ".." {
        return Err(ConfigError::Validation(format!(
            "product-name cannot be '{}'",
            config.product_name
        )));
    }

    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "export directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}
