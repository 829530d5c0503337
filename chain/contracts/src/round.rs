//! Round: entries, grading, and Merkle-proof reward claims
//!
//! Lifecycle: `Open → Expired → Graded`, then each leaf independently moves
//! to claimed.
//! - `Open` while `now <= expires_at`; entries are accepted.
//! - `Expired` once `now > expires_at` and no root is committed.
//! - `Graded` once exactly one root has been committed.
//!
//! Claims re-derive the leaf from `(account, amount)`, so the amount paid out
//! is always the amount bound into the committed tree. Every check happens
//! before any mutation: a failed call leaves the round untouched.

use claim_tree::hash::format_hash;
use claim_tree::{leaf_hash, verify, Hash, Proof};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, warn};
use types::entitlement::Entitlement;
use types::ids::{Address, EntryId, RoundId};
use types::numeric::Amount;

use crate::config::GameConfig;
use crate::errors::RoundError;

/// Round phase derived from time and grading state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Open,
    Expired,
    Graded,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Open => "Open",
            Phase::Expired => "Expired",
            Phase::Graded => "Graded",
        };
        write!(f, "{}", s)
    }
}

/// A paid submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub entry_id: EntryId,
    pub player: Address,
    pub referrer: Address,
    pub answer: String,
    pub fee: Decimal,
    pub submitted_at: i64,
}

/// Claim arguments in contract order: `(proof, amount, account)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRequest {
    pub proof: Proof,
    pub amount: Amount,
    pub account: Address,
}

impl ClaimRequest {
    pub fn new(proof: Proof, amount: Amount, account: Address) -> Self {
        Self {
            proof,
            amount,
            account,
        }
    }

    /// Build from untrusted text; bad amounts or addresses are
    /// `MalformedEntitlement`.
    pub fn parse(proof: Proof, amount: &str, account: &str) -> Result<Self, RoundError> {
        let entitlement = Entitlement::parse(account, amount)?;
        Ok(Self::new(proof, entitlement.amount, entitlement.account))
    }

    pub fn entitlement(&self) -> Entitlement {
        Entitlement::new(self.account, self.amount)
    }

    fn leaf(&self) -> Hash {
        leaf_hash(&self.entitlement())
    }
}

/// One play/claim cycle.
#[derive(Debug, Clone)]
pub struct Round {
    round_id: RoundId,
    started_at: i64,
    expires_at: i64,
    entry_fee: Decimal,
    max_entries: usize,
    entries: Vec<Entry>,
    pot: Decimal,
    merkle_root: Option<Hash>,
    graded_at: Option<i64>,
    claimed: HashSet<Hash>,
    total_claimed: Amount,
}

impl Round {
    /// Open a round at `started_at` using the config's duration and fee.
    /// Fails with `Overflow` if the expiry does not fit in an `i64`.
    pub fn new(
        round_id: RoundId,
        started_at: i64,
        config: &GameConfig,
    ) -> Result<Self, RoundError> {
        let expires_at = started_at
            .checked_add(config.round_duration_seconds)
            .ok_or(RoundError::Overflow)?;
        Ok(Self {
            round_id,
            started_at,
            expires_at,
            entry_fee: config.entry_fee,
            max_entries: config.max_entries_per_round,
            entries: Vec::new(),
            pot: Decimal::ZERO,
            merkle_root: None,
            graded_at: None,
            claimed: HashSet::new(),
            total_claimed: Amount::ZERO,
        })
    }

    pub fn phase(&self, now: i64) -> Phase {
        if self.merkle_root.is_some() {
            Phase::Graded
        } else if now > self.expires_at {
            Phase::Expired
        } else {
            Phase::Open
        }
    }

    // ───────────────────────── Entries ─────────────────────────

    /// Record a paid entry. Only while `Open`, and only with the exact fee.
    pub fn submit_entry(
        &mut self,
        player: Address,
        answer: impl Into<String>,
        referrer: Address,
        paid: Decimal,
        now: i64,
    ) -> Result<&Entry, RoundError> {
        let phase = self.phase(now);
        if phase != Phase::Open {
            return Err(out_of_order("submit an entry", phase));
        }
        if paid != self.entry_fee {
            return Err(RoundError::InvalidEntryFee {
                expected: self.entry_fee.to_string(),
                paid: paid.to_string(),
            });
        }
        if self.max_entries > 0 && self.entries.len() >= self.max_entries {
            return Err(RoundError::RoundFull {
                max_entries: self.max_entries,
            });
        }
        let pot = self
            .pot
            .checked_add(paid)
            .ok_or(RoundError::Overflow)?;

        self.pot = pot;
        self.entries.push(Entry {
            entry_id: EntryId::new(),
            player,
            referrer,
            answer: answer.into(),
            fee: paid,
            submitted_at: now,
        });

        debug!(
            round = %self.round_id,
            %player,
            entries = self.entries.len(),
            "Entry submitted"
        );

        Ok(&self.entries[self.entries.len() - 1])
    }

    // ───────────────────────── Grading ─────────────────────────

    /// Commit the reward root. One-shot, and only after expiry.
    pub fn grade(&mut self, merkle_root: Hash, now: i64) -> Result<(), RoundError> {
        if self.merkle_root.is_some() {
            warn!(round = %self.round_id, "Rejected re-grade of graded round");
            return Err(RoundError::AlreadyGraded);
        }
        let phase = self.phase(now);
        if phase != Phase::Expired {
            warn!(
                round = %self.round_id,
                now,
                expires_at = self.expires_at,
                "Rejected grade before expiry"
            );
            return Err(out_of_order("grade", phase));
        }

        self.merkle_root = Some(merkle_root);
        self.graded_at = Some(now);

        info!(
            round = %self.round_id,
            root = %format_hash(&merkle_root),
            "Round graded"
        );
        Ok(())
    }

    // ───────────────────────── Claims ─────────────────────────

    /// Amount the request could claim right now, without claiming it.
    ///
    /// Returns zero for a leaf that has already been claimed.
    pub fn available_to_claim(&self, request: &ClaimRequest) -> Result<Amount, RoundError> {
        let root = self.committed_root()?;
        let leaf = request.leaf();
        if !verify(&root, &leaf, &request.proof) {
            return Err(RoundError::InvalidProof);
        }
        if self.claimed.contains(&leaf) {
            return Ok(Amount::ZERO);
        }
        Ok(request.amount)
    }

    /// Claim a leaf, returning exactly the amount bound into it.
    pub fn claim(&mut self, request: &ClaimRequest, now: i64) -> Result<Amount, RoundError> {
        let root = self.committed_root()?;
        let leaf = verified_leaf(&root, request, self.round_id)?;
        self.record_claim(leaf, request, now)
    }

    /// Mark an already-verified leaf claimed. The root is immutable once set,
    /// so a proof checked against it stays valid.
    pub(crate) fn record_claim(
        &mut self,
        leaf: Hash,
        request: &ClaimRequest,
        now: i64,
    ) -> Result<Amount, RoundError> {
        if self.claimed.contains(&leaf) {
            return Err(RoundError::AlreadyClaimed);
        }
        let total = self
            .total_claimed
            .checked_add(request.amount)
            .ok_or(RoundError::Overflow)?;

        self.claimed.insert(leaf);
        self.total_claimed = total;

        debug!(
            round = %self.round_id,
            account = %request.account,
            amount = %request.amount,
            now,
            "Reward claimed"
        );
        Ok(request.amount)
    }

    /// Whether the leaf for `entitlement` has been claimed.
    pub fn is_claimed(&self, entitlement: &Entitlement) -> bool {
        self.claimed.contains(&leaf_hash(entitlement))
    }

    pub(crate) fn committed_root(&self) -> Result<Hash, RoundError> {
        self.merkle_root.ok_or_else(|| RoundError::OutOfOrder {
            action: "claim".to_string(),
            phase: "not graded".to_string(),
        })
    }

    // ───────────────────────── Queries ─────────────────────────

    pub fn round_id(&self) -> RoundId {
        self.round_id
    }

    pub fn started_at(&self) -> i64 {
        self.started_at
    }

    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    pub fn merkle_root(&self) -> Option<Hash> {
        self.merkle_root
    }

    pub fn graded_at(&self) -> Option<i64> {
        self.graded_at
    }

    pub fn is_graded(&self) -> bool {
        self.merkle_root.is_some()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn pot(&self) -> Decimal {
        self.pot
    }

    pub fn entry_fee(&self) -> Decimal {
        self.entry_fee
    }

    pub fn claimed_count(&self) -> usize {
        self.claimed.len()
    }

    pub fn total_claimed(&self) -> Amount {
        self.total_claimed
    }
}

/// Re-derive the leaf and check it against `root`.
pub(crate) fn verified_leaf(
    root: &Hash,
    request: &ClaimRequest,
    round_id: RoundId,
) -> Result<Hash, RoundError> {
    let leaf = request.leaf();
    if !verify(root, &leaf, &request.proof) {
        warn!(
            round = %round_id,
            account = %request.account,
            amount = %request.amount,
            "Rejected claim with invalid proof"
        );
        return Err(RoundError::InvalidProof);
    }
    Ok(leaf)
}

fn out_of_order(action: &str, phase: Phase) -> RoundError {
    RoundError::OutOfOrder {
        action: action.to_string(),
        phase: phase.to_string(),
    }
}
