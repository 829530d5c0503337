//! Round Contract Logic for Midcurve
//!
//! This crate implements the contract layer of the game: rounds accept paid
//! entries, are graded exactly once with a Merkle root after they expire, and
//! pay each committed entitlement exactly once against a valid proof.
//!
//! # Modules
//! - `round`: Round state machine (entries, grading, claims)
//! - `game`: Multi-round contract with access control and event log
//! - `shared`: Lock-guarded round for concurrent claimants
//! - `clock`: Time sources (system, manual)
//! - `config`: Game configuration
//! - `events`: Contract events
//! - `errors`: Contract-specific error types
//! - `security`: Role-based access control

pub mod clock;
pub mod config;
pub mod errors;
pub mod events;
pub mod game;
pub mod round;
pub mod security;
pub mod shared;

pub use errors::RoundError;
pub use game::Game;
pub use round::{ClaimRequest, Phase, Round};
pub use shared::SharedRound;

/// Contract ABI version, frozen after release
pub const CONTRACT_ABI_VERSION: &str = "1.0.0";
