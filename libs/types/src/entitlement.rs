//! Reward entitlements
//!
//! An entitlement is an (account, amount) pair earned in a round. Its
//! canonical byte form is the ABI encoding of `(address, uint256)`, which is
//! what leaf hashing consumes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::EntitlementError;
use crate::ids::{Address, ADDRESS_LEN};
use crate::numeric::Amount;

/// Size of `abi.encode(address, uint256)` in bytes
pub const ABI_ENCODED_LEN: usize = 64;

/// Claimable amount for one account in one round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entitlement {
    pub account: Address,
    pub amount: Amount,
}

impl Entitlement {
    pub fn new(account: Address, amount: impl Into<Amount>) -> Self {
        Self {
            account,
            amount: amount.into(),
        }
    }

    /// Parse from text, validating both fields
    pub fn parse(account: &str, amount: &str) -> Result<Self, EntitlementError> {
        Ok(Self {
            account: account.parse()?,
            amount: amount.parse()?,
        })
    }

    /// `abi.encode(address, uint256)`: address left-padded to 32 bytes,
    /// followed by the big-endian amount.
    pub fn abi_encode(&self) -> [u8; ABI_ENCODED_LEN] {
        let mut out = [0u8; ABI_ENCODED_LEN];
        out[32 - ADDRESS_LEN..32].copy_from_slice(self.account.as_bytes());
        out[32..].copy_from_slice(&self.amount.to_be_bytes32());
        out
    }
}

impl fmt::Display for Entitlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.account, self.amount)
    }
}
