//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid log filter directive")]
    InvalidLogLevel,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool needs at least one connection")]
    EmptyPool,

    #[error("Pool size exceeds maximum allowed ({0})")]
    PoolSizeTooLarge(u32),

    #[error("Database acquire timeout must be positive")]
    InvalidAcquireTimeout,

    #[error("Invalid Stripe API key format")]
    InvalidStripeKey,

    #[error("Stripe API base URL must use HTTP(S)")]
    InvalidStripeBaseUrl,

    #[error("Invalid retry settings: {0}")]
    InvalidRetryPolicy(&'static str),
}
