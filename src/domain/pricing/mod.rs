//! Pricing domain module.
//!
//! Price levels, the discounts they map to, and the internal discount
//! records mirrored as Stripe coupons.
//!
//! # Module Structure
//!
//! - `price_level` - PriceLevel membership tiers
//! - `coupon` - Remote coupon values and lookups
//! - `discount` - Discount resolved for a price level
//! - `discount_coupon` - Internal discount record
//! - `coupon_environment` - Derived coupon ID prefixes
//! - `member` - Member and Product views

mod coupon;
mod coupon_environment;
mod discount;
mod discount_coupon;
mod member;
mod metadata;
mod price_level;

pub use coupon::{Coupon, CouponDuration, CouponLookup, CreateCouponRequest};
pub use coupon_environment::CouponEnvironment;
pub use discount::Discount;
pub use discount_coupon::DiscountCoupon;
pub use member::{Member, Product};
pub use metadata::MetadataKey;
pub use price_level::PriceLevel;

#[cfg(test)]
pub(crate) use coupon::fixtures;
