//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `MEMBERSHIP_DISCOUNTS`
//! prefix and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use membership_discounts::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Coupon IDs use the {} prefix", config.server.coupon_environment());
//! ```

mod database;
mod error;
mod payment;
mod server;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Process configuration (environment, logging, debug override)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Payment configuration (Stripe)
    pub payment: PaymentConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MEMBERSHIP_DISCOUNTS` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `MEMBERSHIP_DISCOUNTS__SERVER__DEBUG=false` -> `server.debug = false`
    /// - `MEMBERSHIP_DISCOUNTS__PAYMENT__RETRY__MAX_RETRIES=2` -> `payment.retry.max_retries = 2`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MEMBERSHIP_DISCOUNTS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.payment.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pricing::CouponEnvironment;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var(
            "MEMBERSHIP_DISCOUNTS__DATABASE__URL",
            "postgresql://test@localhost/test",
        );
        env::set_var("MEMBERSHIP_DISCOUNTS__PAYMENT__STRIPE_API_KEY", "sk_test_xxx");
    }

    fn clear_env() {
        for key in [
            "MEMBERSHIP_DISCOUNTS__DATABASE__URL",
            "MEMBERSHIP_DISCOUNTS__PAYMENT__STRIPE_API_KEY",
            "MEMBERSHIP_DISCOUNTS__PAYMENT__RETRY__MAX_RETRIES",
            "MEMBERSHIP_DISCOUNTS__SERVER__ENVIRONMENT",
            "MEMBERSHIP_DISCOUNTS__SERVER__DEBUG",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/test");
        assert!(config.payment.is_test_mode());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_use_debug_coupons() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.server.coupon_environment(), CouponEnvironment::Debug);
        assert_eq!(config.payment.retry_policy().max_retries, 4);
    }

    #[test]
    fn test_production_uses_production_coupons() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("MEMBERSHIP_DISCOUNTS__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
        assert_eq!(config.server.coupon_environment(), CouponEnvironment::Production);
    }

    #[test]
    fn test_debug_override_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("MEMBERSHIP_DISCOUNTS__SERVER__ENVIRONMENT", "production");
        env::set_var("MEMBERSHIP_DISCOUNTS__SERVER__DEBUG", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.coupon_environment(), CouponEnvironment::Debug);
    }

    #[test]
    fn test_nested_retry_settings() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("MEMBERSHIP_DISCOUNTS__PAYMENT__RETRY__MAX_RETRIES", "1");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.payment.retry.max_retries, 1);
    }

    #[test]
    fn test_missing_stripe_key_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var(
            "MEMBERSHIP_DISCOUNTS__DATABASE__URL",
            "postgresql://test@localhost/test",
        );
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_err());
    }
}
