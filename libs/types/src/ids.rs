//! Identifier types for players, rounds and entries
//!
//! Addresses are 20-byte EVM-style account identifiers. Entry IDs use UUID v7
//! for time-sortable ordering of submissions within a round.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::EntitlementError;

/// Length of an account address in bytes
pub const ADDRESS_LEN: usize = 20;

/// 20-byte account address
///
/// Text form is `0x` followed by 40 hex digits. Parsing accepts either case;
/// display is always lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The all-zero address
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// Create from raw bytes
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Create from a slice, which must be exactly 20 bytes long
    pub fn from_slice(bytes: &[u8]) -> Result<Self, EntitlementError> {
        let raw: [u8; ADDRESS_LEN] =
            bytes
                .try_into()
                .map_err(|_| EntitlementError::InvalidAddress {
                    input: hex::encode(bytes),
                })?;
        Ok(Self(raw))
    }

    /// Address whose last byte is `n` and all others zero (test fixtures)
    pub const fn from_low_byte(n: u8) -> Self {
        let mut raw = [0u8; ADDRESS_LEN];
        raw[ADDRESS_LEN - 1] = n;
        Self(raw)
    }

    /// Get raw bytes
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Lowercase `0x`-prefixed hex
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = EntitlementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EntitlementError::InvalidAddress {
            input: s.to_string(),
        };
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(invalid)?;
        if digits.len() != ADDRESS_LEN * 2 {
            return Err(invalid());
        }
        let bytes = hex::decode(digits).map_err(|_| invalid())?;
        Self::from_slice(&bytes).map_err(|_| invalid())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Sequential round number within a game (first round is 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoundId(u64);

impl RoundId {
    pub fn new(n: u64) -> Self {
        Self(n)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// The round that follows this one
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RoundId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "round-{}", self.0)
    }
}

/// Unique identifier for a submitted entry
///
/// Uses UUID v7 so entries sort by submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "0x70997970c51812dc3a010c7d01b50e0d17dc79c8";

    #[test]
    fn test_address_parse_and_display() {
        let addr: Address = ALICE.parse().unwrap();
        assert_eq!(addr.to_string(), ALICE);
        assert_eq!(addr.as_bytes()[0], 0x70);
    }

    #[test]
    fn test_address_parse_mixed_case() {
        let addr: Address = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8".parse().unwrap();
        assert_eq!(addr.to_string(), ALICE);
    }

    #[test]
    fn test_address_rejects_missing_prefix() {
        let result = "70997970c51812dc3a010c7d01b50e0d17dc79c8".parse::<Address>();
        assert!(matches!(result, Err(EntitlementError::InvalidAddress { .. })));
    }

    #[test]
    fn test_address_rejects_wrong_length() {
        assert!("0x1234".parse::<Address>().is_err());
        assert!(format!("{}00", ALICE).parse::<Address>().is_err());
    }

    #[test]
    fn test_address_rejects_non_hex() {
        let result = "0xzz997970c51812dc3a010c7d01b50e0d17dc79c8".parse::<Address>();
        assert!(result.is_err());
    }

    #[test]
    fn test_address_from_low_byte() {
        let addr = Address::from_low_byte(0x0b);
        assert_eq!(addr.to_string(), "0x000000000000000000000000000000000000000b");
    }

    #[test]
    fn test_address_serialization() {
        let addr: Address = ALICE.parse().unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", ALICE));

        let deserialized: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, deserialized);
    }

    #[test]
    fn test_address_deserialize_rejects_garbage() {
        let result = serde_json::from_str::<Address>("\"0xnope\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_round_id_next() {
        let r = RoundId::new(1);
        assert_eq!(r.next().value(), 2);
        assert_eq!(r.to_string(), "round-1");
    }

    #[test]
    fn test_entry_id_creation() {
        let id1 = EntryId::new();
        let id2 = EntryId::new();
        assert_ne!(id1, id2, "EntryIds should be unique");
    }
}
