//! Configuration validation.
//!
//! Semantic checks that serde cannot express. Returns every problem found,
//! not just the first.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::{AppConfig, StoreBackend};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} is not a valid URL: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field} is not a valid socket address: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("guest.suffix_len must be between 1 and {max}, got {value}")]
    SuffixLength { value: usize, max: usize },
}

/// Longest random suffix accepted for guest slugs.
pub const MAX_SUFFIX_LEN: usize = 16;

/// Validate a parsed configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.app.name.trim().is_empty() {
        errors.push(ValidationError::Empty { field: "app.name" });
    }

    if config.database.backend == StoreBackend::Postgrest {
        if config.database.url.is_empty() {
            errors.push(ValidationError::Empty { field: "database.url" });
        } else if Url::parse(&config.database.url).is_err() {
            errors.push(ValidationError::InvalidUrl {
                field: "database.url",
                value: config.database.url.clone(),
            });
        }
        if config.database.api_key.is_empty() {
            errors.push(ValidationError::Empty { field: "database.api_key" });
        }
    }
    if config.database.wish_table.is_empty() {
        errors.push(ValidationError::Empty { field: "database.wish_table" });
    }
    if config.database.guest_table.is_empty() {
        errors.push(ValidationError::Empty { field: "database.guest_table" });
    }

    if config.rate_limit.enabled {
        if config.rate_limit.window_secs == 0 {
            errors.push(ValidationError::Zero { field: "rate_limit.window_secs" });
        }
        if config.rate_limit.max_requests == 0 {
            errors.push(ValidationError::Zero { field: "rate_limit.max_requests" });
        }
        if config.rate_limit.sweep_interval_secs == 0 {
            errors.push(ValidationError::Zero { field: "rate_limit.sweep_interval_secs" });
        }
    }

    if config.cors.allowed_origins.is_empty() {
        errors.push(ValidationError::Empty { field: "cors.allowed_origins" });
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero { field: "security.max_body_size" });
    }

    if Url::parse(&config.guest.invite_base_url).is_err() {
        errors.push(ValidationError::InvalidUrl {
            field: "guest.invite_base_url",
            value: config.guest.invite_base_url.clone(),
        });
    }
    if config.guest.suffix_len == 0 || config.guest.suffix_len > MAX_SUFFIX_LEN {
        errors.push(ValidationError::SuffixLength {
            value: config.guest.suffix_len,
            max: MAX_SUFFIX_LEN,
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
