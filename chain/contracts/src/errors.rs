//! Contract-specific error types
//!
//! Error taxonomy for round grading, entries and reward claims. Every error
//! is terminal for the call that raised it and leaves contract state as it
//! was before the call.

use thiserror::Error;
use types::errors::EntitlementError;

/// Round and game errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoundError {
    #[error("Out of order: cannot {action} while round is {phase}")]
    OutOfOrder { action: String, phase: String },

    #[error("Round already graded")]
    AlreadyGraded,

    #[error("Reward already claimed")]
    AlreadyClaimed,

    #[error("Invalid proof: recomputed root does not match")]
    InvalidProof,

    #[error("Malformed entitlement: {0}")]
    MalformedEntitlement(#[from] EntitlementError),

    #[error("Unauthorized: {caller} may not {action}")]
    Unauthorized { caller: String, action: String },

    #[error("Invalid entry fee: expected {expected}, paid {paid}")]
    InvalidEntryFee { expected: String, paid: String },

    #[error("Round is full: {max_entries} entries")]
    RoundFull { max_entries: usize },

    #[error("No round has been started")]
    RoundNotFound,

    #[error("Arithmetic overflow in claim accounting")]
    Overflow,
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid config: {reason}")]
    Invalid { reason: String },

    #[error("Config parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
