//! Resolved discount for a price level.

use rust_decimal::Decimal;

use super::Coupon;

/// The discount that applies at a price level.
#[derive(Debug, Clone, PartialEq)]
pub struct Discount {
    /// The coupon implementing the discount; `None` at full price.
    pub coupon: Option<Coupon>,

    /// Fraction of the price taken off, in `[0, 1]`.
    pub fraction_off: Decimal,
}

impl Discount {
    /// Full price, no coupon.
    pub fn none() -> Self {
        Self {
            coupon: None,
            fraction_off: Decimal::ZERO,
        }
    }

    /// Returns the coupon ID, if a coupon backs this discount.
    pub fn coupon_id(&self) -> Option<&str> {
        self.coupon.as_ref().map(|c| c.id.as_str())
    }

    /// Applies the discount to an amount in the smallest currency unit.
    pub fn apply(&self, amount: Decimal) -> Decimal {
        amount * (Decimal::ONE - self.fraction_off)
    }
}
