//! Percentage value object (0-100 scale).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A whole percentage between 0 and 100 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Percentage(u8);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Self = Self(0);

    /// One hundred percent.
    pub const HUNDRED: Self = Self(100);

    /// Creates a Percentage, returning error if out of range.
    pub fn try_new(value: i64) -> Result<Self, ValidationError> {
        if !(0..=100).contains(&value) {
            return Err(ValidationError::out_of_range(
                "percentage",
                0,
                100,
                value.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
            ));
        }
        Ok(Self(value as u8))
    }

    /// Returns the value as u8.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Returns the value as an exact fraction (0 to 1).
    pub fn as_fraction(&self) -> Decimal {
        Decimal::from(self.0) / Decimal::ONE_HUNDRED
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TryFrom<i64> for Percentage {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Percentage> for u8 {
    fn from(pct: Percentage) -> Self {
        pct.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_try_new_accepts_bounds() {
        assert_eq!(Percentage::try_new(0).unwrap(), Percentage::ZERO);
        assert_eq!(Percentage::try_new(100).unwrap(), Percentage::HUNDRED);
        assert_eq!(Percentage::try_new(35).unwrap().value(), 35);
    }

    #[test]
    fn percentage_try_new_rejects_out_of_range() {
        match Percentage::try_new(101) {
            Err(ValidationError::OutOfRange { field, min, max, actual }) => {
                assert_eq!(field, "percentage");
                assert_eq!(min, 0);
                assert_eq!(max, 100);
                assert_eq!(actual, 101);
            }
            other => panic!("Expected OutOfRange error, got {:?}", other),
        }
        assert!(Percentage::try_new(-1).is_err());
    }

    #[test]
    fn percentage_as_fraction_is_exact() {
        assert_eq!(Percentage::try_new(25).unwrap().as_fraction(), Decimal::new(25, 2));
        assert_eq!(Percentage::try_new(10).unwrap().as_fraction(), Decimal::new(1, 1));
        assert_eq!(Percentage::HUNDRED.as_fraction(), Decimal::ONE);
        assert_eq!(Percentage::ZERO.as_fraction(), Decimal::ZERO);
    }

    #[test]
    fn percentage_displays_correctly() {
        assert_eq!(format!("{}", Percentage::try_new(75).unwrap()), "75%");
        assert_eq!(format!("{}", Percentage::ZERO), "0%");
    }

    #[test]
    fn percentage_serde_round_trips_as_number() {
        let pct = Percentage::try_new(42).unwrap();
        assert_eq!(serde_json::to_string(&pct).unwrap(), "42");
        let parsed: Percentage = serde_json::from_str("42").unwrap();
        assert_eq!(parsed, pct);
    }

    #[test]
    fn percentage_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Percentage>("150").is_err());
    }
}
