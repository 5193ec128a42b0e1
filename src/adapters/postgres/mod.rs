//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresDiscountCouponRepository` - Discount records and their Stripe link

mod discount_coupon_repository;

pub use discount_coupon_repository::PostgresDiscountCouponRepository;
