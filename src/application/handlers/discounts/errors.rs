//! Discount-specific error types.
//!
//! # Error Code Mapping
//!
//! | Error | ErrorCode |
//! |-------|-----------|
//! | NoCouponForPriceLevel | ConfigurationError |
//! | MultipleCouponsForPriceLevel | ConfigurationError |
//! | FixedAmountOff | ConfigurationError |
//! | InvalidPercentOff | ConfigurationError |
//! | CouponIdMismatch | InternalError |
//! | Validation | from ValidationError |
//! | Payment | from PaymentError |
//! | Repository | unchanged |

use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::foundation::{DiscountCouponId, DomainError, ErrorCode, ValidationError};
use crate::domain::pricing::{MetadataKey, PriceLevel};
use crate::ports::PaymentError;

/// Errors raised while resolving discounts or syncing coupons.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiscountError {
    #[error("Could not find Stripe coupon for {}={}", MetadataKey::PriceLevel, .0)]
    NoCouponForPriceLevel(PriceLevel),

    #[error("Found {count} Stripe coupons for {}={level}", MetadataKey::PriceLevel)]
    MultipleCouponsForPriceLevel { level: PriceLevel, count: usize },

    #[error("Stripe coupon {coupon_id} has a fixed amount off; only a percentage off is supported")]
    FixedAmountOff { coupon_id: String },

    #[error("Stripe coupon {coupon_id} has invalid percent_off {percent_off:?}")]
    InvalidPercentOff {
        coupon_id: String,
        percent_off: Option<Decimal>,
    },

    #[error("Stripe coupon {coupon_id} does not match discount coupon {discount_coupon_id} (expected {expected_id})")]
    CouponIdMismatch {
        coupon_id: String,
        discount_coupon_id: DiscountCouponId,
        expected_id: String,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Payment provider error: {0}")]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Repository(#[from] DomainError),
}

impl DiscountError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DiscountError::NoCouponForPriceLevel(_)
            | DiscountError::MultipleCouponsForPriceLevel { .. }
            | DiscountError::FixedAmountOff { .. }
            | DiscountError::InvalidPercentOff { .. } => ErrorCode::ConfigurationError,
            DiscountError::CouponIdMismatch { .. } => ErrorCode::InternalError,
            DiscountError::Validation(e) => DomainError::from(e.clone()).code,
            DiscountError::Payment(e) => DomainError::from(e.clone()).code,
            DiscountError::Repository(e) => e.code,
        }
    }
}

impl From<DiscountError> for DomainError {
    fn from(err: DiscountError) -> Self {
        match err {
            DiscountError::Repository(e) => e,
            DiscountError::Payment(e) => e.into(),
            DiscountError::Validation(e) => e.into(),
            other => DomainError::new(other.code(), other.to_string()),
        }
    }
}
