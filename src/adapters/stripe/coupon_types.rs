//! Stripe API wire types for coupons.
//!
//! These types represent Stripe API objects as they arrive over HTTP.
//! They are designed to:
//! - Parse actual Stripe JSON accurately
//! - Map to domain types for further processing

use std::collections::HashMap;

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::pricing::{Coupon, CouponDuration};
use crate::ports::{DeletedCoupon, PaymentError, PaymentErrorCode};

/// Stripe coupon object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeCoupon {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    /// Stripe reports percentages as JSON numbers (e.g. `12.5`).
    #[serde(default)]
    pub percent_off: Option<f64>,

    #[serde(default)]
    pub amount_off: Option<i64>,

    #[serde(default)]
    pub currency: Option<String>,

    pub duration: CouponDuration,

    #[serde(default)]
    pub metadata: HashMap<String, String>,

    #[serde(default = "default_valid")]
    pub valid: bool,

    #[serde(default)]
    pub created: i64,
}

fn default_valid() -> bool {
    true
}

impl TryFrom<StripeCoupon> for Coupon {
    type Error = PaymentError;

    fn try_from(coupon: StripeCoupon) -> Result<Self, Self::Error> {
        let percent_off = match coupon.percent_off {
            Some(value) => Some(Decimal::from_f64(value).ok_or_else(|| {
                PaymentError::new(
                    PaymentErrorCode::ProviderError,
                    format!("Coupon {} has unrepresentable percent_off {}", coupon.id, value),
                )
            })?),
            None => None,
        };

        Ok(Coupon {
            id: coupon.id,
            name: coupon.name,
            percent_off,
            amount_off: coupon.amount_off,
            currency: coupon.currency,
            duration: coupon.duration,
            metadata: coupon.metadata,
            valid: coupon.valid,
            created: coupon.created,
        })
    }
}

/// Stripe list envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeList<T> {
    pub data: Vec<T>,

    #[serde(default)]
    pub has_more: bool,
}

/// Stripe deletion confirmation.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeDeleted {
    pub id: String,

    #[serde(default)]
    pub deleted: bool,
}

impl From<StripeDeleted> for DeletedCoupon {
    fn from(deleted: StripeDeleted) -> Self {
        DeletedCoupon {
            id: deleted.id,
            deleted: deleted.deleted,
        }
    }
}

/// Stripe error envelope: `{"error": {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorResponse {
    pub error: StripeErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorBody {
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,

    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}
