//! Membership Discounts - Stripe coupons for membership price levels
//!
//! This crate resolves the discount a member's price level is entitled to
//! from tagged Stripe coupons, and keeps each internal discount record
//! mirrored by exactly one Stripe coupon.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
