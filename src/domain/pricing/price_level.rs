//! Membership price level definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Membership price level.
///
/// Determines which Stripe coupon, if any, applies to a member's purchases.
/// The string form is what appears in member records and in Stripe metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceLevel {
    /// Full price, no coupon.
    Normal,

    /// Reduced price for members with a low-income discount.
    LowIncomeDiscount,
}

impl PriceLevel {
    /// Every price level, in declaration order.
    pub const ALL: [PriceLevel; 2] = [PriceLevel::Normal, PriceLevel::LowIncomeDiscount];

    /// Returns the value stored in member records and coupon metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceLevel::Normal => "normal",
            PriceLevel::LowIncomeDiscount => "low_income_discount",
        }
    }

    /// Returns true if this level can carry a discount.
    pub fn is_discounted(&self) -> bool {
        !matches!(self, PriceLevel::Normal)
    }
}

impl fmt::Display for PriceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PriceLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PriceLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| {
                ValidationError::invalid_format("price_level", format!("unknown price level '{}'", s))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_is_not_discounted() {
        assert!(!PriceLevel::Normal.is_discounted());
        assert!(PriceLevel::LowIncomeDiscount.is_discounted());
    }

    #[test]
    fn parses_stored_values() {
        assert_eq!("normal".parse::<PriceLevel>().unwrap(), PriceLevel::Normal);
        assert_eq!(
            "low_income_discount".parse::<PriceLevel>().unwrap(),
            PriceLevel::LowIncomeDiscount
        );
    }

    #[test]
    fn rejects_unknown_values() {
        let err = "student".parse::<PriceLevel>().unwrap_err();
        assert!(err.to_string().contains("student"));
    }

    #[test]
    fn serde_matches_as_str() {
        for level in PriceLevel::ALL {
            let json = serde_json::to_string(&level).unwrap();
            assert_eq!(json, format!("\"{}\"", level.as_str()));
        }
    }
}
