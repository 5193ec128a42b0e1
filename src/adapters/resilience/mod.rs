//! Resilience adapters for external service calls.
//!
//! - `RetryPolicy` - Exponential backoff for transient payment errors
//! - `RetryingCouponProvider` - Applies a policy to every coupon call

mod retry_policy;
mod retrying_coupon_provider;

pub use retry_policy::RetryPolicy;
pub use retrying_coupon_provider::RetryingCouponProvider;
