//! Midcurve Round Simulation
//!
//! Deterministic round simulation for the Midcurve game. Plays seeded
//! players through the game contract, grades the round with a Merkle root
//! over a prize table, and drives every winner's claim.
//!
//! # Modules
//! - `wallets`: Seeded player addresses and answers
//! - `prizes`: Prize table from pot and guesses
//! - `scenario`: Full-round scenario and report
//! - `replay`: Event log replay validation
//! - `export`: Report and tree dump JSON export
//! - `errors`: Simulation error type

pub mod wallets;
pub mod prizes;
pub mod scenario;
pub mod replay;
pub mod export;
pub mod errors;

pub use errors::SimulationError;

/// Crate version constant
pub const VERSION: &str = "1.0.0";
