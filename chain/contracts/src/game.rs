//! Game: the multi-round Midcurve contract
//!
//! The owner opens rounds with `begin_game`, players `submit` paid answers
//! while the round is open, the owner (or a grader) commits the reward root
//! with `grade_round` after expiry, and winners `claim` with a Merkle proof.
//! A new round can only begin once the current one is graded. Claims remain
//! valid for every graded round, not only the latest.

use claim_tree::Hash;
use rust_decimal::Decimal;
use tracing::{debug, info};
use types::ids::{Address, RoundId};
use types::numeric::Amount;

use crate::config::GameConfig;
use crate::errors::{ConfigError, RoundError};
use crate::events::{ContractEvent, EntrySubmitted, RewardClaimed, RoundBegun, RoundGraded};
use crate::round::{ClaimRequest, Phase, Round};
use crate::security::{AccessControl, Role};

/// Midcurve game contract.
#[derive(Debug)]
pub struct Game {
    config: GameConfig,
    /// Security: role-based access control
    access_control: AccessControl,
    contributor: Address,
    /// Rounds in order; `rounds[i]` has id `i + 1`
    rounds: Vec<Round>,
    /// Emitted events log (append-only)
    events: Vec<ContractEvent>,
}

impl Game {
    /// Create a game. The owner holds the grader capability; the contributor
    /// is recorded with the `Contributor` role. An owner who is also the
    /// contributor keeps the `Owner` role.
    pub fn new(
        config: GameConfig,
        owner: Address,
        contributor: Address,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut access_control = AccessControl::new(owner);
        if !access_control.grant_role(&owner, contributor, Role::Contributor) {
            debug!(%owner, "Owner is also the contributor");
        }
        Ok(Self {
            config,
            access_control,
            contributor,
            rounds: Vec::new(),
            events: Vec::new(),
        })
    }

    // ───────────────────────── Administration ─────────────────────────

    /// Allow `grader` to commit round roots. Owner-only.
    pub fn add_grader(&mut self, caller: &Address, grader: Address) -> Result<(), RoundError> {
        if !self.access_control.grant_role(caller, grader, Role::Grader) {
            return Err(unauthorized(caller, "add a grader"));
        }
        Ok(())
    }

    /// Open the next round, expiring `round_duration_seconds` from `now`.
    pub fn begin_game(&mut self, caller: &Address, now: i64) -> Result<ContractEvent, RoundError> {
        if !self.access_control.is_owner(caller) {
            return Err(unauthorized(caller, "begin a round"));
        }
        if let Some(current) = self.rounds.last() {
            let phase = current.phase(now);
            if phase != Phase::Graded {
                return Err(RoundError::OutOfOrder {
                    action: "begin a round".to_string(),
                    phase: phase.to_string(),
                });
            }
        }

        let round_id = self
            .rounds
            .last()
            .map_or(RoundId::new(1), |r| r.round_id().next());
        let round = Round::new(round_id, now, &self.config)?;
        let expires_at = round.expires_at();
        self.rounds.push(round);

        info!(round = %round_id, started_at = now, expires_at, "Round begun");

        let event = ContractEvent::RoundBegun(RoundBegun {
            round_id,
            started_at: now,
            expires_at,
        });
        self.events.push(event.clone());
        Ok(event)
    }

    // ───────────────────────── Entries ─────────────────────────

    /// Submit a paid answer to the current round.
    pub fn submit(
        &mut self,
        player: Address,
        answer: impl Into<String>,
        referrer: Address,
        paid: Decimal,
        now: i64,
    ) -> Result<ContractEvent, RoundError> {
        let round = self.rounds.last_mut().ok_or(RoundError::RoundNotFound)?;
        let round_id = round.round_id();
        let entry = round.submit_entry(player, answer, referrer, paid, now)?;

        let event = ContractEvent::EntrySubmitted(EntrySubmitted {
            round_id,
            entry_id: entry.entry_id,
            player: entry.player,
            referrer: entry.referrer,
            fee: entry.fee,
            submitted_at: entry.submitted_at,
        });
        self.events.push(event.clone());
        Ok(event)
    }

    // ───────────────────────── Grading ─────────────────────────

    /// Commit the reward root for the current round. Owner or grader only.
    pub fn grade_round(
        &mut self,
        caller: &Address,
        merkle_root: Hash,
        now: i64,
    ) -> Result<ContractEvent, RoundError> {
        if !self.access_control.can_grade(caller) {
            return Err(unauthorized(caller, "grade a round"));
        }
        let round = self.rounds.last_mut().ok_or(RoundError::RoundNotFound)?;
        round.grade(merkle_root, now)?;

        let event = ContractEvent::RoundGraded(RoundGraded {
            round_id: round.round_id(),
            merkle_root,
            grader: caller.to_hex(),
            graded_at: now,
        });
        self.events.push(event.clone());
        Ok(event)
    }

    // ───────────────────────── Claims ─────────────────────────

    /// Claimable amount for the current round, without claiming.
    pub fn available_to_claim(&self, request: &ClaimRequest) -> Result<Amount, RoundError> {
        self.current_round()?.available_to_claim(request)
    }

    /// Claim against the current round.
    pub fn claim(&mut self, request: &ClaimRequest, now: i64) -> Result<Amount, RoundError> {
        let round_id = self.current_round()?.round_id();
        self.claim_in(round_id, request, now)
    }

    /// Claim against a specific graded round.
    pub fn claim_in(
        &mut self,
        round_id: RoundId,
        request: &ClaimRequest,
        now: i64,
    ) -> Result<Amount, RoundError> {
        let round = self.round_mut(round_id)?;
        let amount = round.claim(request, now)?;

        self.events.push(ContractEvent::RewardClaimed(RewardClaimed {
            round_id,
            account: request.account,
            amount,
            claimed_at: now,
        }));
        Ok(amount)
    }

    // ───────────────────────── Queries ─────────────────────────

    /// Expiry timestamp of the current round.
    pub fn expiry_time_answer(&self) -> Result<i64, RoundError> {
        Ok(self.current_round()?.expires_at())
    }

    /// Committed root of the current round, if graded.
    pub fn merkle_root(&self) -> Option<Hash> {
        self.rounds.last().and_then(Round::merkle_root)
    }

    pub fn current_round(&self) -> Result<&Round, RoundError> {
        self.rounds.last().ok_or(RoundError::RoundNotFound)
    }

    pub fn round(&self, round_id: RoundId) -> Result<&Round, RoundError> {
        round_index(round_id)
            .and_then(|i| self.rounds.get(i))
            .ok_or(RoundError::RoundNotFound)
    }

    fn round_mut(&mut self, round_id: RoundId) -> Result<&mut Round, RoundError> {
        round_index(round_id)
            .and_then(|i| self.rounds.get_mut(i))
            .ok_or(RoundError::RoundNotFound)
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn owner(&self) -> &Address {
        self.access_control.owner()
    }

    pub fn contributor(&self) -> &Address {
        &self.contributor
    }

    /// Get all emitted events.
    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    /// Drain events (for external consumption).
    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }
}

fn round_index(round_id: RoundId) -> Option<usize> {
    usize::try_from(round_id.value()).ok()?.checked_sub(1)
}

fn unauthorized(caller: &Address, action: &str) -> RoundError {
    RoundError::Unauthorized {
        caller: caller.to_hex(),
        action: action.to_string(),
    }
}
