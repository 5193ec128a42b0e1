//! Remote coupon value as seen by the domain.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{MetadataKey, PriceLevel};

/// How long a coupon keeps applying to a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponDuration {
    Once,
    Repeating,
    Forever,
}

impl CouponDuration {
    pub fn as_str(&self) -> &'static str {
        match self {
            CouponDuration::Once => "once",
            CouponDuration::Repeating => "repeating",
            CouponDuration::Forever => "forever",
        }
    }
}

/// A coupon object held by the payment provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    /// Provider's coupon ID.
    pub id: String,

    /// Display name, if any.
    pub name: Option<String>,

    /// Percentage off, 0-100.
    pub percent_off: Option<Decimal>,

    /// Fixed amount off in the smallest currency unit.
    pub amount_off: Option<i64>,

    /// Currency of `amount_off`.
    pub currency: Option<String>,

    pub duration: CouponDuration,

    /// Free-form metadata used for correlation.
    pub metadata: HashMap<String, String>,

    /// Whether the coupon can still be redeemed.
    pub valid: bool,

    /// When the coupon was created (Unix timestamp).
    pub created: i64,
}

impl Coupon {
    /// Returns a metadata value.
    pub fn metadata_value(&self, key: MetadataKey) -> Option<&str> {
        self.metadata.get(key.as_str()).map(String::as_str)
    }

    /// Returns true if the coupon is tagged with the given price level.
    pub fn is_tagged_with(&self, level: PriceLevel) -> bool {
        self.metadata_value(MetadataKey::PriceLevel) == Some(level.as_str())
    }

    /// Returns true if the coupon takes a fixed amount off.
    pub fn has_fixed_amount_off(&self) -> bool {
        self.amount_off.unwrap_or(0) > 0
    }
}

/// Request to create a coupon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCouponRequest {
    /// Coupon ID to assign; the provider generates one when absent.
    pub id: Option<String>,

    pub name: Option<String>,

    pub percent_off: Decimal,

    pub duration: CouponDuration,

    pub metadata: HashMap<String, String>,

    /// Idempotency key for safe retries.
    ///
    /// Retries of one logical create must reuse the same key.
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

/// Outcome of looking a coupon up by ID.
#[derive(Debug, Clone, PartialEq)]
pub enum CouponLookup {
    /// The coupon exists.
    Found(Coupon),

    /// The provider has no coupon with this ID.
    NotFound { coupon_id: String },
}

impl CouponLookup {
    pub fn is_found(&self) -> bool {
        matches!(self, CouponLookup::Found(_))
    }

    /// Converts into an `Option`, dropping the missing ID.
    pub fn into_option(self) -> Option<Coupon> {
        match self {
            CouponLookup::Found(coupon) => Some(coupon),
            CouponLookup::NotFound { .. } => None,
        }
    }
}
