//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, threshold >= 1)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::AppConfig;
use thiserror::Error;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("upstream.base_url must not be empty")]
    EmptyBaseUrl,

    #[error("upstream.request_timeout_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("upstream.user_agent must not be empty")]
    EmptyUserAgent,

    #[error("cache.ttl_secs must be greater than zero")]
    ZeroCacheTtl,

    #[error("cache.namespace must not be empty")]
    EmptyNamespace,

    #[error("circuit_breaker.failure_threshold must be at least 1")]
    ZeroFailureThreshold,
}

/// Check the configuration, collecting every violation.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.upstream.base_url.is_empty() {
        errors.push(ValidationError::EmptyBaseUrl);
    }
    if config.upstream.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }
    if config.upstream.user_agent.is_empty() {
        errors.push(ValidationError::EmptyUserAgent);
    }
    if config.cache.ttl_secs == 0 {
        errors.push(ValidationError::ZeroCacheTtl);
    }
    if config.cache.namespace.is_empty() {
        errors.push(ValidationError::EmptyNamespace);
    }
    if config.circuit_breaker.failure_threshold == 0 {
        errors.push(ValidationError::ZeroFailureThreshold);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
