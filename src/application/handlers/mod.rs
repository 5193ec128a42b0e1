//! Application handlers.
//!
//! Handlers that orchestrate domain operations over the ports.

pub mod discounts;

pub use discounts::{CouponLifecycle, DiscountError, DiscountResolver, SyncReport};
