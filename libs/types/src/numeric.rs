//! Reward amounts
//!
//! An `Amount` is a non-negative whole number that fits in the low 128 bits
//! of a `uint256`. Amounts parsed from text or `Decimal` are validated here so
//! that a leaf can never bind a negative or fractional value.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::EntitlementError;

/// Non-negative integer reward amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// 32-byte big-endian encoding (ABI `uint256`)
    pub fn to_be_bytes32(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out[16..].copy_from_slice(&self.0.to_be_bytes());
        out
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(value as u128)
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = EntitlementError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(EntitlementError::NegativeAmount {
                amount: value.to_string(),
            });
        }
        if !value.fract().is_zero() {
            return Err(EntitlementError::FractionalAmount {
                amount: value.to_string(),
            });
        }
        value
            .trunc()
            .to_u128()
            .map(Amount)
            .ok_or_else(|| EntitlementError::AmountOverflow {
                amount: value.to_string(),
            })
    }
}

impl FromStr for Amount {
    type Err = EntitlementError;

    /// Parse decimal text.
    ///
    /// Plain digit strings are parsed as integers directly so that values
    /// beyond `Decimal`'s 28-digit range are still accepted up to `u128::MAX`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return trimmed
                .parse::<u128>()
                .map(Amount)
                .map_err(|_| EntitlementError::AmountOverflow {
                    amount: trimmed.to_string(),
                });
        }
        let decimal =
            Decimal::from_str_exact(trimmed).map_err(|_| EntitlementError::InvalidAmount {
                input: s.to_string(),
            })?;
        Amount::try_from(decimal)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, |acc, a| Amount(acc.0.saturating_add(a.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_integer() {
        let amount: Amount = "200".parse().unwrap();
        assert_eq!(amount.value(), 200);
    }

    #[test]
    fn test_parse_beyond_decimal_range() {
        let max = u128::MAX.to_string();
        let amount: Amount = max.parse().unwrap();
        assert_eq!(amount.value(), u128::MAX);
    }

    #[test]
    fn test_parse_overflow() {
        let too_big = format!("{}0", u128::MAX);
        assert!(matches!(
            too_big.parse::<Amount>(),
            Err(EntitlementError::AmountOverflow { .. })
        ));
    }

    #[test]
    fn test_parse_negative() {
        assert!(matches!(
            "-5".parse::<Amount>(),
            Err(EntitlementError::NegativeAmount { .. })
        ));
    }

    #[test]
    fn test_parse_fractional() {
        assert!(matches!(
            "1.5".parse::<Amount>(),
            Err(EntitlementError::FractionalAmount { .. })
        ));
    }

    #[test]
    fn test_parse_whole_decimal_is_accepted() {
        let amount: Amount = "300.00".parse().unwrap();
        assert_eq!(amount.value(), 300);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            "abc".parse::<Amount>(),
            Err(EntitlementError::InvalidAmount { .. })
        ));
        assert!("".parse::<Amount>().is_err());
    }

    #[test]
    fn test_try_from_decimal() {
        assert_eq!(Amount::try_from(Decimal::from(42)).unwrap().value(), 42);
        assert!(Amount::try_from(Decimal::new(-1, 0)).is_err());
        assert!(Amount::try_from(Decimal::new(15, 1)).is_err());
    }

    #[test]
    fn test_be_bytes32() {
        let bytes = Amount::new(0x0102).to_be_bytes32();
        assert_eq!(bytes[30], 0x01);
        assert_eq!(bytes[31], 0x02);
        assert!(bytes[..16].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_serialization_as_string() {
        let amount = Amount::new(100);
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"100\"");
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
    }

    #[test]
    fn test_sum() {
        let total: Amount = [100u64, 200, 300].into_iter().map(Amount::from).sum();
        assert_eq!(total.value(), 600);
    }

    mod fuzz {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Any whole non-negative Decimal converts to the same integer.
            #[test]
            fn fuzz_whole_decimals_convert_exactly(n in 0u64..u64::MAX) {
                let amount = Amount::try_from(Decimal::from(n)).unwrap();
                prop_assert_eq!(amount.value(), n as u128);
            }

            /// Negative whole numbers are always rejected.
            #[test]
            fn fuzz_negative_rejected(n in 1i64..i64::MAX) {
                let result = Amount::try_from(Decimal::from(-n));
                prop_assert!(matches!(
                    result,
                    Err(EntitlementError::NegativeAmount { .. })
                ), "expected NegativeAmount error, got {:?}", result);
            }
        }
    }
}
