//! Contract events
//!
//! Events are immutable records emitted by successful game operations.
//! Failed calls emit nothing.

use claim_tree::Hash;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::ids::{Address, EntryId, RoundId};
use types::numeric::Amount;

/// A new round was opened by `begin_game`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundBegun {
    pub round_id: RoundId,
    pub started_at: i64,
    pub expires_at: i64,
}

/// A player paid the entry fee and submitted an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySubmitted {
    pub round_id: RoundId,
    pub entry_id: EntryId,
    pub player: Address,
    pub referrer: Address,
    pub fee: Decimal,
    pub submitted_at: i64,
}

/// The reward root for a round was committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundGraded {
    pub round_id: RoundId,
    #[serde(with = "claim_tree::hash::hex_hash")]
    pub merkle_root: Hash,
    pub grader: String,
    pub graded_at: i64,
}

/// A leaf was claimed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardClaimed {
    pub round_id: RoundId,
    pub account: Address,
    pub amount: Amount,
    pub claimed_at: i64,
}

/// Enum wrapper for all contract events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractEvent {
    RoundBegun(RoundBegun),
    EntrySubmitted(EntrySubmitted),
    RoundGraded(RoundGraded),
    RewardClaimed(RewardClaimed),
}
