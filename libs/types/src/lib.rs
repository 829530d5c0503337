//! Types library for Midcurve rounds and reward claims
//!
//! This library provides the core type definitions shared by the claim tree
//! builder, the round contracts and the simulation tooling.
//!
//! # Version
//! v1.0.0
//!
//! # Modules
//! - `ids`: Identifiers (Address, RoundId, EntryId)
//! - `numeric`: Non-negative integer amounts (uint256-compatible)
//! - `entitlement`: (account, amount) pairs and their canonical ABI encoding
//! - `errors`: Entitlement validation errors

// Public modules
pub mod ids;
pub mod numeric;
pub mod entitlement;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::entitlement::*;
    pub use crate::errors::*;
}
