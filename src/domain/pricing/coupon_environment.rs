//! Environment prefix for derived Stripe coupon IDs.

use std::fmt;

use super::DiscountCoupon;

/// Deployment environment a coupon ID belongs to.
///
/// Debug and production deployments may share a Stripe account, so coupon
/// IDs carry the environment to keep the two sets apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CouponEnvironment {
    #[default]
    Debug,
    Production,
}

impl CouponEnvironment {
    pub fn from_debug_flag(debug: bool) -> Self {
        if debug {
            CouponEnvironment::Debug
        } else {
            CouponEnvironment::Production
        }
    }

    pub fn prefix(&self) -> &'static str {
        match self {
            CouponEnvironment::Debug => "debug",
            CouponEnvironment::Production => "prod",
        }
    }

    /// Stripe coupon ID for a discount record: `{prefix}_{id}`.
    pub fn coupon_id_for(&self, record: &DiscountCoupon) -> String {
        format!("{}_{}", self.prefix(), record.id)
    }
}

impl fmt::Display for CouponEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}
