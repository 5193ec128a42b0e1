//! Stripe coupon adapter.
//!
//! Implements the `CouponProvider` port for Stripe integration:
//! - Coupon listing (all pages)
//! - Retrieval, creation and deletion by ID
//!
//! # Security
//!
//! - The secret key is handled via `secrecy::SecretString`
//!
//! # Configuration
//!
//! Required environment variables:
//! - `MEMBERSHIP_DISCOUNTS__PAYMENT__STRIPE_API_KEY`: Stripe secret API key

mod coupon_types;
mod mock_coupon_provider;
mod stripe_coupon_adapter;

pub use coupon_types::{StripeCoupon, StripeDeleted, StripeErrorBody, StripeErrorResponse, StripeList};
pub use mock_coupon_provider::{MethodCall, MockCouponProvider};
pub use stripe_coupon_adapter::{StripeConfig, StripeCouponAdapter, DEFAULT_API_BASE_URL};
