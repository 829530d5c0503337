//! Seeded player wallets
//!
//! Generates player addresses and answers from a ChaCha RNG so that a
//! scenario with the same seed always produces the same players, the same
//! prize table and therefore the same root.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use types::ids::{Address, ADDRESS_LEN};

/// Largest answer a player may guess.
pub const MAX_GUESS: u32 = 1_000;

/// A simulated player and the entry they will submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub address: Address,
    pub guess: u32,
    pub referrer: Address,
}

impl Player {
    /// Answer text as submitted to the contract.
    pub fn answer(&self) -> String {
        self.guess.to_string()
    }
}

/// Deterministic address and player generator.
pub struct WalletFactory {
    rng: ChaCha8Rng,
}

impl WalletFactory {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draw a fresh address.
    pub fn next_address(&mut self) -> Address {
        let mut raw = [0u8; ADDRESS_LEN];
        self.rng.fill(&mut raw);
        Address::new(raw)
    }

    /// Draw `count` players. Each player after the first is referred by a
    /// randomly chosen earlier player; the first has no referrer.
    pub fn players(&mut self, count: usize) -> Vec<Player> {
        let mut players: Vec<Player> = Vec::with_capacity(count);
        for i in 0..count {
            let address = self.next_address();
            let guess = self.rng.gen_range(0..=MAX_GUESS);
            let referrer = if i == 0 {
                Address::ZERO
            } else {
                players[self.rng.gen_range(0..i)].address
            };
            players.push(Player {
                address,
                guess,
                referrer,
            });
        }
        players
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_same_seed_same_players() {
        let a = WalletFactory::new(7).players(50);
        let b = WalletFactory::new(7).players(50);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seed_different_players() {
        let a = WalletFactory::new(7).players(10);
        let b = WalletFactory::new(8).players(10);
        assert_ne!(a, b);
    }

    #[test]
    fn test_addresses_unique_and_guesses_bounded() {
        let players = WalletFactory::new(1).players(1_000);
        let unique: HashSet<_> = players.iter().map(|p| p.address).collect();
        assert_eq!(unique.len(), 1_000);
        assert!(players.iter().all(|p| p.guess <= MAX_GUESS));
    }

    #[test]
    fn test_referrers_are_earlier_players() {
        let players = WalletFactory::new(3).players(20);
        assert_eq!(players[0].referrer, Address::ZERO);
        for (i, p) in players.iter().enumerate().skip(1) {
            assert!(players[..i].iter().any(|q| q.address == p.referrer));
        }
    }
}
