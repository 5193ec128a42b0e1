//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `stripe` - Stripe coupon API client and test double
//! - `resilience` - Retry decorator for coupon providers
//! - `postgres` - Discount record persistence
//! - `memory` - In-memory repository

pub mod memory;
pub mod postgres;
pub mod resilience;
pub mod stripe;

pub use memory::InMemoryDiscountCouponRepository;
pub use postgres::PostgresDiscountCouponRepository;
pub use resilience::{RetryPolicy, RetryingCouponProvider};
pub use stripe::{MockCouponProvider, StripeConfig, StripeCouponAdapter};
