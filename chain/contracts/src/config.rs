//! Game configuration
//!
//! Built in code with `GameConfig::default()` / struct update syntax, or
//! loaded from JSON. Missing JSON fields take their defaults.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Default round length: 24 hours.
pub const DEFAULT_ROUND_DURATION_SECONDS: i64 = 86_400;

/// Configuration for a game and each round it opens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seconds from `begin_game` until the round expires.
    pub round_duration_seconds: i64,
    /// Exact fee each entry must pay (default 0.02).
    pub entry_fee: Decimal,
    /// Maximum entries per round (0 = unlimited).
    pub max_entries_per_round: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            round_duration_seconds: DEFAULT_ROUND_DURATION_SECONDS,
            entry_fee: Decimal::new(2, 2),
            max_entries_per_round: 0,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.round_duration_seconds <= 0 {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "round_duration_seconds must be positive, got {}",
                    self.round_duration_seconds
                ),
            });
        }
        if self.entry_fee < Decimal::ZERO {
            return Err(ConfigError::Invalid {
                reason: format!("entry_fee must not be negative, got {}", self.entry_fee),
            });
        }
        Ok(())
    }
}
