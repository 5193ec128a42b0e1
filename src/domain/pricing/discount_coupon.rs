//! Internal discount coupon record.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DiscountCouponId, Percentage};

/// A discount defined in the membership database.
///
/// Each record is mirrored by at most one Stripe coupon; `stripe_coupon_id`
/// is set once that coupon exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountCoupon {
    pub id: DiscountCouponId,

    pub description: String,

    pub discount_percentage: Percentage,

    pub stripe_coupon_id: Option<String>,
}

impl DiscountCoupon {
    /// Creates a record that is not yet linked to Stripe.
    pub fn new(
        id: DiscountCouponId,
        description: impl Into<String>,
        discount_percentage: Percentage,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            discount_percentage,
            stripe_coupon_id: None,
        }
    }

    pub fn is_linked(&self) -> bool {
        self.stripe_coupon_id.is_some()
    }

    pub fn link(&mut self, stripe_coupon_id: impl Into<String>) {
        self.stripe_coupon_id = Some(stripe_coupon_id.into());
    }

    pub fn unlink(&mut self) {
        self.stripe_coupon_id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_is_unlinked() {
        let record = DiscountCoupon::new(
            DiscountCouponId::new(1),
            "Student",
            Percentage::try_new(20).unwrap(),
        );
        assert!(!record.is_linked());
    }

    #[test]
    fn link_and_unlink() {
        let mut record = DiscountCoupon::new(
            DiscountCouponId::new(1),
            "Student",
            Percentage::try_new(20).unwrap(),
        );
        record.link("prod_1");
        assert_eq!(record.stripe_coupon_id.as_deref(), Some("prod_1"));
        record.unlink();
        assert!(!record.is_linked());
    }
}
