//! Server configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::pricing::CouponEnvironment;

/// Process-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Environment name
    #[serde(default = "default_environment")]
    pub environment: Environment,

    /// Rust log filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Forces debug (`true`) or production (`false`) coupon IDs.
    ///
    /// When unset, only the production environment uses production IDs.
    pub debug: Option<bool>,
}

/// Application environment
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl ServerConfig {
    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Whether the process runs in debug mode
    pub fn is_debug(&self) -> bool {
        self.debug.unwrap_or(!self.is_production())
    }

    /// Environment used to prefix derived Stripe coupon IDs
    pub fn coupon_environment(&self) -> CouponEnvironment {
        CouponEnvironment::from_debug_flag(self.is_debug())
    }

    /// Validate server configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.log_level.trim().is_empty() {
            return Err(ValidationError::InvalidLogLevel);
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            log_level: default_log_level(),
            debug: None,
        }
    }
}

fn default_environment() -> Environment {
    Environment::Development
}

fn default_log_level() -> String {
    "info,membership_discounts=debug,sqlx=warn".to_string()
}
