//! Error types for entitlement validation
//!
//! Every variant means the same thing to callers: the (account, amount)
//! pair is malformed and cannot be bound into a leaf.

use thiserror::Error;

/// Entitlement-specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntitlementError {
    #[error("Invalid address: {input}")]
    InvalidAddress { input: String },

    #[error("Amount must not be negative: {amount}")]
    NegativeAmount { amount: String },

    #[error("Amount must be a whole number: {amount}")]
    FractionalAmount { amount: String },

    #[error("Amount does not fit in 128 bits: {amount}")]
    AmountOverflow { amount: String },

    #[error("Invalid amount: {input}")]
    InvalidAmount { input: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_address_display() {
        let err = EntitlementError::InvalidAddress {
            input: "0x12".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid address: 0x12");
    }

    #[test]
    fn test_negative_amount_display() {
        let err = EntitlementError::NegativeAmount {
            amount: "-5".to_string(),
        };
        assert!(err.to_string().contains("-5"));
    }
}
