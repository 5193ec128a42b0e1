//! Stripe coupon adapter.
//!
//! Implements the `CouponProvider` trait against the Stripe REST API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::new(api_key);
//! let adapter = StripeCouponAdapter::new(config);
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::domain::pricing::{Coupon, CreateCouponRequest};
use crate::ports::{CouponProvider, DeletedCoupon, PaymentError, PaymentErrorCode};

use super::coupon_types::{StripeCoupon, StripeDeleted, StripeErrorResponse, StripeList};

/// Default Stripe API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";

/// Largest page Stripe serves for list endpoints.
const LIST_PAGE_SIZE: &str = "100";

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }
}

/// Stripe coupon adapter.
///
/// Implements `CouponProvider` for Stripe API integration.
pub struct StripeCouponAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripeCouponAdapter {
    /// Create a new Stripe adapter with the given configuration.
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn coupons_url(&self) -> String {
        format!("{}/v1/coupons", self.config.api_base_url)
    }

    fn coupon_url(&self, coupon_id: &str) -> String {
        format!("{}/v1/coupons/{}", self.config.api_base_url, coupon_id)
    }

    /// Decode a Stripe response, mapping failures to `PaymentError`.
    async fn read_response<T: DeserializeOwned>(
        response: reqwest::Response,
        operation: &str,
    ) -> Result<T, PaymentError> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = error_from_response(status, &body);
            if error.is_not_found() {
                tracing::debug!(operation, error = %error, "Stripe resource missing");
            } else {
                tracing::error!(operation, status = status.as_u16(), error = %error, "Stripe request failed");
            }
            return Err(error);
        }

        response.json().await.map_err(|e| {
            PaymentError::new(
                PaymentErrorCode::ProviderError,
                format!("Failed to parse Stripe response: {}", e),
            )
        })
    }
}

/// Map a non-success Stripe response to a `PaymentError`.
fn error_from_response(status: reqwest::StatusCode, body: &str) -> PaymentError {
    let parsed = serde_json::from_str::<StripeErrorResponse>(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|e| e.error.message.clone())
        .unwrap_or_else(|| format!("Stripe API error ({}): {}", status, body));

    let code = match status.as_u16() {
        404 => PaymentErrorCode::NotFound,
        401 | 403 => PaymentErrorCode::AuthenticationError,
        429 => PaymentErrorCode::RateLimitExceeded,
        500..=599 => PaymentErrorCode::ServiceUnavailable,
        400..=499 => PaymentErrorCode::InvalidRequest,
        _ => PaymentErrorCode::ProviderError,
    };

    let error = PaymentError::new(code, message);
    match parsed.and_then(|e| e.error.code) {
        Some(provider_code) => error.with_provider_code(provider_code),
        None => error,
    }
}

#[async_trait]
impl CouponProvider for StripeCouponAdapter {
    async fn list_coupons(&self) -> Result<Vec<Coupon>, PaymentError> {
        let url = self.coupons_url();
        let mut coupons = Vec::new();
        let mut starting_after: Option<String> = None;

        loop {
            let mut query = vec![("limit", LIST_PAGE_SIZE.to_string())];
            if let Some(cursor) = &starting_after {
                query.push(("starting_after", cursor.clone()));
            }

            let response = self
                .http_client
                .get(&url)
                .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
                .query(&query)
                .send()
                .await
                .map_err(|e| PaymentError::network(e.to_string()))?;

            let page: StripeList<StripeCoupon> =
                Self::read_response(response, "list_coupons").await?;

            starting_after = page.data.last().map(|c| c.id.clone());
            let has_more = page.has_more;

            for coupon in page.data {
                coupons.push(Coupon::try_from(coupon)?);
            }

            if !has_more || starting_after.is_none() {
                break;
            }
        }

        tracing::debug!(count = coupons.len(), "Listed Stripe coupons");
        Ok(coupons)
    }

    async fn retrieve_coupon(&self, coupon_id: &str) -> Result<Coupon, PaymentError> {
        let response = self
            .http_client
            .get(self.coupon_url(coupon_id))
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        let coupon: StripeCoupon = Self::read_response(response, "retrieve_coupon").await?;
        Coupon::try_from(coupon)
    }

    async fn create_coupon(&self, request: CreateCouponRequest) -> Result<Coupon, PaymentError> {
        let mut params = vec![
            ("duration".to_string(), request.duration.as_str().to_string()),
            (
                "percent_off".to_string(),
                request.percent_off.normalize().to_string(),
            ),
        ];

        if let Some(id) = &request.id {
            params.push(("id".to_string(), id.clone()));
        }
        if let Some(name) = &request.name {
            params.push(("name".to_string(), name.clone()));
        }

        let mut metadata: Vec<_> = request.metadata.iter().collect();
        metadata.sort();
        for (key, value) in metadata {
            params.push((format!("metadata[{}]", key), value.clone()));
        }

        let mut builder = self
            .http_client
            .post(self.coupons_url())
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&params);

        // Stripe replays the first response for a repeated key
        if let Some(idempotency_key) = &request.idempotency_key {
            builder = builder.header("Idempotency-Key", idempotency_key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        let coupon: StripeCoupon = Self::read_response(response, "create_coupon").await?;

        tracing::debug!(coupon_id = %coupon.id, "Stripe coupon created");
        Coupon::try_from(coupon)
    }

    async fn delete_coupon(&self, coupon_id: &str) -> Result<DeletedCoupon, PaymentError> {
        let response = self
            .http_client
            .delete(self.coupon_url(coupon_id))
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        let deleted: StripeDeleted = Self::read_response(response, "delete_coupon").await?;

        tracing::debug!(coupon_id = %deleted.id, "Stripe coupon deleted");
        Ok(deleted.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn config_new_sets_defaults() {
        let config = StripeConfig::new("sk_test_key");
        assert_eq!(config.api_base_url, "https://api.stripe.com");
    }

    #[test]
    fn config_with_base_url_strips_trailing_slash() {
        let config = StripeConfig::new("key").with_base_url("http://localhost:8080/");
        assert_eq!(config.api_base_url(), "http://localhost:8080");
    }

    #[test]
    fn adapter_builds_coupon_urls() {
        let adapter =
            StripeCouponAdapter::new(StripeConfig::new("key").with_base_url("http://stripe.test"));
        assert_eq!(adapter.coupons_url(), "http://stripe.test/v1/coupons");
        assert_eq!(adapter.coupon_url("prod_1"), "http://stripe.test/v1/coupons/prod_1");
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Error Mapping Tests
    // ════════════════════════════════════════════════════════════════════════════

    const MISSING_BODY: &str = r#"{"error":{"code":"resource_missing","message":"No such coupon: 'prod_9'","type":"invalid_request_error"}}"#;

    #[test]
    fn not_found_maps_to_not_found() {
        let err = error_from_response(StatusCode::NOT_FOUND, MISSING_BODY);
        assert_eq!(err.code, PaymentErrorCode::NotFound);
        assert_eq!(err.message, "No such coupon: 'prod_9'");
        assert_eq!(err.provider_code.as_deref(), Some("resource_missing"));
        assert!(!err.retryable);
    }

    #[test]
    fn server_errors_are_retryable() {
        let err = error_from_response(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.code, PaymentErrorCode::ServiceUnavailable);
        assert!(err.retryable);
        assert!(err.message.contains("upstream down"));
    }

    #[test]
    fn rate_limit_is_retryable() {
        let err = error_from_response(StatusCode::TOO_MANY_REQUESTS, "{}");
        assert_eq!(err.code, PaymentErrorCode::RateLimitExceeded);
        assert!(err.retryable);
    }

    #[test]
    fn unauthorized_maps_to_authentication() {
        let err = error_from_response(StatusCode::UNAUTHORIZED, "{}");
        assert_eq!(err.code, PaymentErrorCode::AuthenticationError);
    }

    #[test]
    fn other_client_errors_are_invalid_requests() {
        let body = r#"{"error":{"code":"resource_already_exists","message":"Coupon already exists.","type":"invalid_request_error"}}"#;
        let err = error_from_response(StatusCode::BAD_REQUEST, body);
        assert_eq!(err.code, PaymentErrorCode::InvalidRequest);
        assert_eq!(err.provider_code.as_deref(), Some("resource_already_exists"));
    }
}
