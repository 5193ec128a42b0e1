//! Discount handlers.
//!
//! - `DiscountResolver` - Price level to discount resolution, cached per level
//! - `CouponLifecycle` - Stripe coupon create/find/delete/replace per discount record

mod coupon_lifecycle;
mod discount_resolver;
mod errors;

pub use coupon_lifecycle::{CouponLifecycle, SyncReport};
pub use discount_resolver::DiscountResolver;
pub use errors::DiscountError;
