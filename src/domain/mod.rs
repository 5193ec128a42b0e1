//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, percentages, errors)
//! - `pricing` - Price levels, coupons, discounts and discount records

pub mod foundation;
pub mod pricing;
