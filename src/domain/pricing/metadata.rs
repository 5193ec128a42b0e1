//! Metadata keys shared with Stripe objects.

use std::fmt;

/// Keys used in Stripe metadata to correlate remote objects with ours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataKey {
    /// On coupons: the price level the coupon implements.
    PriceLevel,

    /// On products: JSON list of price levels that may be discounted.
    AllowedPriceLevels,

    /// On coupons: id of the internal discount record.
    DiscountCouponId,
}

impl MetadataKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataKey::PriceLevel => "price_level",
            MetadataKey::AllowedPriceLevels => "allowed_price_levels",
            MetadataKey::DiscountCouponId => "discount_coupon_id",
        }
    }
}

impl fmt::Display for MetadataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
