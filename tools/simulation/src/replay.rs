//! Event log replay validation
//!
//! Rebuilds per-round state from the game's event log alone and compares it
//! with the live rounds: same events → same entries, pot, root and claims.

use claim_tree::hash::format_hash;
use contracts::events::ContractEvent;
use contracts::round::Round;
use contracts::Game;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use contracts::RoundError;
use types::ids::RoundId;
use types::numeric::Amount;

use crate::errors::SimulationError;

/// Observable state of one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub round_id: RoundId,
    pub expires_at: i64,
    pub entries: usize,
    pub pot: Decimal,
    pub merkle_root: Option<String>,
    pub claimed_count: usize,
    pub total_claimed: Amount,
}

/// Capture a snapshot of a live round.
pub fn capture_snapshot(round: &Round) -> RoundSnapshot {
    RoundSnapshot {
        round_id: round.round_id(),
        expires_at: round.expires_at(),
        entries: round.entries().len(),
        pot: round.pot(),
        merkle_root: round.merkle_root().map(|r| format_hash(&r)),
        claimed_count: round.claimed_count(),
        total_claimed: round.total_claimed(),
    }
}

/// Fold an event log into one snapshot per round, in order of `RoundBegun`.
///
/// A claimed total that overflows cannot come from a live round, so it is
/// reported as `Overflow` rather than folded.
pub fn replay_events(events: &[ContractEvent]) -> Result<Vec<RoundSnapshot>, SimulationError> {
    let mut rounds: Vec<RoundSnapshot> = Vec::new();

    for event in events {
        match event {
            ContractEvent::RoundBegun(e) => rounds.push(RoundSnapshot {
                round_id: e.round_id,
                expires_at: e.expires_at,
                entries: 0,
                pot: Decimal::ZERO,
                merkle_root: None,
                claimed_count: 0,
                total_claimed: Amount::ZERO,
            }),
            ContractEvent::EntrySubmitted(e) => {
                if let Some(r) = rounds.iter_mut().find(|r| r.round_id == e.round_id) {
                    r.entries += 1;
                    r.pot += e.fee;
                }
            }
            ContractEvent::RoundGraded(e) => {
                if let Some(r) = rounds.iter_mut().find(|r| r.round_id == e.round_id) {
                    r.merkle_root = Some(format_hash(&e.merkle_root));
                }
            }
            ContractEvent::RewardClaimed(e) => {
                if let Some(r) = rounds.iter_mut().find(|r| r.round_id == e.round_id) {
                    r.claimed_count += 1;
                    r.total_claimed = r
                        .total_claimed
                        .checked_add(e.amount)
                        .ok_or(RoundError::Overflow)?;
                }
            }
        }
    }

    Ok(rounds)
}

/// Result of replay validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayValidation {
    pub matches: bool,
    pub original: Vec<RoundSnapshot>,
    pub replayed: Vec<RoundSnapshot>,
}

/// Compare the game's live rounds with a replay of its event log.
pub fn validate_replay(game: &Game) -> Result<ReplayValidation, SimulationError> {
    let original: Vec<RoundSnapshot> = game.rounds().iter().map(capture_snapshot).collect();
    let replayed = replay_events(game.events())?;

    Ok(ReplayValidation {
        matches: original == replayed,
        original,
        replayed,
    })
}

/// Export event log as JSON.
pub fn export_event_log(events: &[ContractEvent]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(events)
}

/// Import event log from JSON.
pub fn import_event_log(json: &str) -> Result<Vec<ContractEvent>, serde_json::Error> {
    serde_json::from_str(json)
}
