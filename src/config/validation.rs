//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check addresses and URLs parse
//! - Validate value ranges (timeouts > 0, chain id > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use alloy::primitives::Address;
use thiserror::Error;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// What is wrong with it.
    pub reason: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Validate a loaded configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "contract.address", &config.contract.address);
    check_address(&mut errors, "admin.address", &config.admin.address);

    if config.network.chain_id == 0 {
        errors.push(ValidationError::new("network.chain_id", "must be non-zero"));
    }
    if config.network.chain_name.trim().is_empty() {
        errors.push(ValidationError::new("network.chain_name", "must not be empty"));
    }
    if config.network.rpc_urls.is_empty() {
        errors.push(ValidationError::new("network.rpc_urls", "at least one URL is required"));
    }
    for (i, raw) in config.network.rpc_urls.iter().enumerate() {
        check_url(&mut errors, &format!("network.rpc_urls[{i}]"), raw);
    }
    for (i, raw) in config.network.block_explorer_urls.iter().enumerate() {
        check_url(&mut errors, &format!("network.block_explorer_urls[{i}]"), raw);
    }

    check_url(&mut errors, "wallet.endpoint", &config.wallet.endpoint);
    if config.wallet.request_timeout_secs == 0 {
        errors.push(ValidationError::new("wallet.request_timeout_secs", "must be > 0"));
    }
    if config.wallet.detect_timeout_secs == 0 {
        errors.push(ValidationError::new("wallet.detect_timeout_secs", "must be > 0"));
    }
    if config.wallet.account_poll_interval_ms == 0 {
        errors.push(ValidationError::new("wallet.account_poll_interval_ms", "must be > 0"));
    }

    check_url(&mut errors, "app.base_url", &config.app.base_url);

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<std::net::SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "not a socket address",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &str, raw: &str) {
    if raw.trim().is_empty() {
        errors.push(ValidationError::new(field, "is required"));
    } else if raw.parse::<Address>().is_err() {
        errors.push(ValidationError::new(field, format!("'{raw}' is not a 20-byte hex address")));
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &str, raw: &str) {
    if let Err(e) = url::Url::parse(raw) {
        errors.push(ValidationError::new(field, format!("invalid URL '{raw}': {e}")));
    }
}
