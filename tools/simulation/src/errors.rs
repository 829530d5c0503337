//! Simulation error types

use claim_tree::TreeError;
use contracts::errors::{ConfigError, RoundError};
use thiserror::Error;
use types::errors::EntitlementError;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("Round error: {0}")]
    Round(#[from] RoundError),

    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Amount error: {0}")]
    Amount(#[from] EntitlementError),

    #[error("Pot of {pot} does not fit in base units")]
    PotOverflow { pot: String },

    #[error("Export error: {0}")]
    Export(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
