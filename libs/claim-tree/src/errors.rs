//! Claim tree error types

use thiserror::Error;
use types::errors::EntitlementError;

/// Errors raised while building, querying or loading a claim tree
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("Cannot build a tree from an empty entitlement set")]
    EmptyEntitlementSet,

    #[error("Duplicate entitlement: {entitlement}")]
    DuplicateEntitlement { entitlement: String },

    #[error("Leaf index {index} out of range (tree has {len} leaves)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Entitlement not in tree: {entitlement}")]
    NotInTree { entitlement: String },

    #[error("Malformed entitlement: {0}")]
    Malformed(#[from] EntitlementError),

    #[error("Invalid hash: {input}")]
    InvalidHash { input: String },

    #[error("Invalid tree dump: {reason}")]
    InvalidDump { reason: String },

    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for TreeError {
    fn from(err: serde_json::Error) -> Self {
        TreeError::Json(err.to_string())
    }
}
