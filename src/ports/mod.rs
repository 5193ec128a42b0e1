//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `CouponProvider` - Payment processor coupon API
//! - `DiscountCouponRepository` - Internal discount records

mod coupon_provider;
mod discount_coupon_repository;

pub use coupon_provider::{CouponProvider, DeletedCoupon, PaymentError, PaymentErrorCode};
pub use discount_coupon_repository::DiscountCouponRepository;
