//! In-memory adapters.

mod discount_coupon_repository;

pub use discount_coupon_repository::InMemoryDiscountCouponRepository;
