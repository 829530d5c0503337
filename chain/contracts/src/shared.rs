//! Lockable round for concurrent claimants.
//!
//! Proof verification is pure, so it runs outside the lock against the
//! committed root. The claimed-set check and the mark happen together under
//! one lock acquisition: two claims of the same leaf cannot both succeed.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use claim_tree::Hash;
use types::numeric::Amount;

use crate::errors::RoundError;
use crate::round::{verified_leaf, ClaimRequest, Phase, Round};

/// A `Round` shared between threads. Cloning shares the same round.
#[derive(Debug, Clone)]
pub struct SharedRound {
    inner: Arc<Mutex<Round>>,
}

impl SharedRound {
    pub fn new(round: Round) -> Self {
        Self {
            inner: Arc::new(Mutex::new(round)),
        }
    }

    // A panic while holding the lock cannot leave a half-applied claim:
    // `Round` only mutates after every check has passed.
    fn lock(&self) -> MutexGuard<'_, Round> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn phase(&self, now: i64) -> Phase {
        self.lock().phase(now)
    }

    pub fn grade(&self, merkle_root: Hash, now: i64) -> Result<(), RoundError> {
        self.lock().grade(merkle_root, now)
    }

    pub fn available_to_claim(&self, request: &ClaimRequest) -> Result<Amount, RoundError> {
        self.lock().available_to_claim(request)
    }

    pub fn claim(&self, request: &ClaimRequest, now: i64) -> Result<Amount, RoundError> {
        let (root, round_id) = {
            let round = self.lock();
            (round.committed_root()?, round.round_id())
        };
        let leaf = verified_leaf(&root, request, round_id)?;
        self.lock().record_claim(leaf, request, now)
    }

    pub fn claimed_count(&self) -> usize {
        self.lock().claimed_count()
    }

    pub fn total_claimed(&self) -> Amount {
        self.lock().total_claimed()
    }

    /// Copy of the current round state.
    pub fn snapshot(&self) -> Round {
        self.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use claim_tree::ClaimTree;
    use std::thread;
    use types::entitlement::Entitlement;
    use types::ids::{Address, RoundId};

    fn graded(tree: &ClaimTree) -> SharedRound {
        let config = GameConfig {
            round_duration_seconds: 10,
            ..GameConfig::default()
        };
        let shared = SharedRound::new(Round::new(RoundId::new(1), 0, &config).unwrap());
        shared.grade(tree.root(), 11).unwrap();
        shared
    }

    #[test]
    fn test_racing_claims_of_one_leaf() {
        let e = Entitlement::new(Address::from_low_byte(7), 700u64);
        let tree = ClaimTree::build(vec![e, Entitlement::new(Address::from_low_byte(8), 1u64)])
            .unwrap();
        let shared = graded(&tree);
        let request = ClaimRequest::new(tree.proof_for(&e).unwrap(), e.amount, e.account);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let shared = shared.clone();
                let request = request.clone();
                thread::spawn(move || shared.claim(&request, 20))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let wins = results.iter().filter(|r| r.is_ok()).count();
        let replays = results
            .iter()
            .filter(|r| **r == Err(RoundError::AlreadyClaimed))
            .count();

        assert_eq!(wins, 1);
        assert_eq!(replays, 7);
        assert_eq!(shared.total_claimed(), Amount::new(700));
    }

    #[test]
    fn test_shared_claim_before_grade() {
        let round = Round::new(RoundId::new(1), 0, &GameConfig::default()).unwrap();
        let shared = SharedRound::new(round);
        let request = ClaimRequest::new(Default::default(), Amount::new(1), Address::ZERO);
        assert!(matches!(
            shared.claim(&request, 5),
            Err(RoundError::OutOfOrder { .. })
        ));
        assert_eq!(shared.phase(5), Phase::Open);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let e = Entitlement::new(Address::from_low_byte(1), 5u64);
        let tree = ClaimTree::build(vec![e]).unwrap();
        let shared = graded(&tree);
        let before = shared.snapshot();

        let request = ClaimRequest::new(tree.proof_for(&e).unwrap(), e.amount, e.account);
        assert_eq!(shared.available_to_claim(&request).unwrap(), Amount::new(5));
        shared.claim(&request, 12).unwrap();

        assert_eq!(before.claimed_count(), 0);
        assert_eq!(shared.claimed_count(), 1);
    }
}
