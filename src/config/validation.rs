//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, decimals representable in U256)
//! - Detect duplicate token list entries
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GreeterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::fmt;

use alloy::primitives::Address;

use crate::config::schema::GreeterConfig;

/// Largest decimal shift that still fits a U256 power of ten.
pub const MAX_DECIMALS: u8 = 77;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GreeterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url("network.rpc_url", &config.network.rpc_url, &mut errors);
    for (i, url) in config.network.failover_urls.iter().enumerate() {
        check_url(&format!("network.failover_urls[{}]", i), url, &mut errors);
    }
    check_url("wallet.rpc_url", &config.wallet.rpc_url, &mut errors);

    if config.network.chain_id == 0 {
        errors.push(ValidationError::new("network.chain_id", "must be non-zero"));
    }
    if config.network.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("network.rpc_timeout_secs", "must be greater than 0"));
    }
    if config.network.confirmation_poll_ms == 0 {
        errors.push(ValidationError::new("network.confirmation_poll_ms", "must be greater than 0"));
    }
    if config.network.confirmation_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "network.confirmation_timeout_secs",
            "must be greater than 0",
        ));
    }

    if config.contract.greeter_address == Address::ZERO {
        errors.push(ValidationError::new("contract.greeter_address", "must not be the zero address"));
    }

    let mut seen = HashSet::new();
    for (i, token) in config.tokens.iter().enumerate() {
        let field = format!("tokens[{}]", i);
        if token.address == Address::ZERO {
            errors.push(ValidationError::new(
                format!("{}.address", field),
                "zero address is reserved for the native asset",
            ));
        }
        if !seen.insert(token.address) {
            errors.push(ValidationError::new(
                format!("{}.address", field),
                format!("duplicate token {}", token.address),
            ));
        }
        if token.decimals > MAX_DECIMALS {
            errors.push(ValidationError::new(
                format!("{}.decimals", field),
                format!("must be at most {}", MAX_DECIMALS),
            ));
        }
        if token.symbol.trim().is_empty() {
            errors.push(ValidationError::new(format!("{}.symbol", field), "must not be empty"));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(field: &str, value: &str, errors: &mut Vec<ValidationError>) {
    if let Err(e) = value.parse::<url::Url>() {
        errors.push(ValidationError::new(field, format!("invalid URL '{}': {}", value, e)));
    }
}
