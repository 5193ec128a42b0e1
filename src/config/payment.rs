//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use crate::adapters::{RetryPolicy, StripeConfig};

/// Payment configuration (Stripe)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key
    pub stripe_api_key: SecretString,

    /// Override for the Stripe API base URL
    pub api_base_url: Option<String>,

    /// Retry settings for Stripe calls
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.expose_secret().starts_with("sk_test_")
    }

    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.stripe_api_key.expose_secret().starts_with("sk_live_")
    }

    /// Retry policy for Stripe calls
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone()
    }

    /// Builds the Stripe adapter configuration
    pub fn stripe_config(&self) -> StripeConfig {
        let config = StripeConfig::new(self.stripe_api_key.expose_secret().clone());
        match &self.api_base_url {
            Some(url) => config.with_base_url(url.clone()),
            None => config,
        }
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let key = self.stripe_api_key.expose_secret();
        if key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_API_KEY"));
        }

        // Secret keys and restricted keys only; publishable keys cannot manage coupons
        if !key.starts_with("sk_") && !key.starts_with("rk_") {
            return Err(ValidationError::InvalidStripeKey);
        }

        if let Some(url) = &self.api_base_url {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(ValidationError::InvalidStripeBaseUrl);
            }
        }

        if self.retry.backoff_multiplier < 1.0 {
            return Err(ValidationError::InvalidRetryPolicy(
                "backoff_multiplier must be at least 1.0",
            ));
        }
        if self.retry.initial_backoff_ms > self.retry.max_backoff_ms {
            return Err(ValidationError::InvalidRetryPolicy(
                "initial_backoff_ms exceeds max_backoff_ms",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(key: &str) -> PaymentConfig {
        PaymentConfig {
            stripe_api_key: SecretString::new(key.to_string()),
            api_base_url: None,
            retry: RetryPolicy::default(),
        }
    }

    #[test]
    fn test_is_test_mode() {
        let config = config("sk_test_xxx");
        assert!(config.is_test_mode());
        assert!(!config.is_live_mode());
    }

    #[test]
    fn test_is_live_mode() {
        let config = config("sk_live_xxx");
        assert!(config.is_live_mode());
        assert!(!config.is_test_mode());
    }

    #[test]
    fn test_validation_missing_api_key() {
        assert_eq!(
            config("").validate(),
            Err(ValidationError::MissingRequired("STRIPE_API_KEY"))
        );
    }

    #[test]
    fn test_validation_invalid_api_key_prefix() {
        assert_eq!(
            config("pk_test_xxx").validate(),
            Err(ValidationError::InvalidStripeKey)
        );
    }

    #[test]
    fn test_validation_invalid_base_url() {
        let config = PaymentConfig {
            api_base_url: Some("ftp://stripe.test".to_string()),
            ..config("sk_test_xxx")
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidStripeBaseUrl));
    }

    #[test]
    fn test_validation_invalid_retry() {
        let mut config = config("sk_test_xxx");
        config.retry.initial_backoff_ms = 10_000;
        config.retry.max_backoff_ms = 1_000;
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidRetryPolicy(_))
        ));
    }

    #[test]
    fn test_stripe_config_uses_base_url_override() {
        let config = PaymentConfig {
            api_base_url: Some("http://localhost:12111/".to_string()),
            ..config("sk_test_xxx")
        };
        assert_eq!(config.stripe_config().api_base_url(), "http://localhost:12111");
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(config("sk_test_abcd1234").validate().is_ok());
        assert!(config("rk_live_abcd1234").validate().is_ok());
    }

    #[test]
    fn test_debug_output_hides_key() {
        let output = format!("{:?}", config("sk_test_topsecret"));
        assert!(!output.contains("topsecret"));
    }
}
