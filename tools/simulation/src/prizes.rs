//! Prize table
//!
//! Players are ranked by distance from the median guess (ties broken by
//! address). The top `winners` split the pot, less the contributor's cut,
//! with linearly decreasing weights: rank 0 gets weight `n`, rank `n - 1`
//! gets weight 1. Integer division leftovers go to rank 0, so the table
//! always distributes the whole prize pool.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::entitlement::Entitlement;
use types::numeric::Amount;

use crate::errors::SimulationError;
use crate::wallets::Player;

/// Base units per unit of entry-fee currency (wei per ether).
pub const BASE_UNITS: u64 = 1_000_000_000_000_000_000;

/// Basis-point denominator.
pub const BPS: u128 = 10_000;

/// Rewards for one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrizeTable {
    pub median_guess: u32,
    pub pot: Amount,
    pub contributor_cut: Amount,
    pub entitlements: Vec<Entitlement>,
}

impl PrizeTable {
    /// Sum paid to players.
    pub fn distributed(&self) -> Amount {
        self.entitlements.iter().map(|e| e.amount).sum()
    }
}

/// Convert a decimal pot into integer base units.
pub fn pot_in_base_units(pot: Decimal) -> Result<Amount, SimulationError> {
    let scaled = pot
        .checked_mul(Decimal::from(BASE_UNITS))
        .ok_or_else(|| SimulationError::PotOverflow {
            pot: pot.to_string(),
        })?;
    Ok(Amount::try_from(scaled)?)
}

/// Median of the players' guesses (lower median for even counts).
pub fn median_guess(players: &[Player]) -> u32 {
    let mut guesses: Vec<u32> = players.iter().map(|p| p.guess).collect();
    guesses.sort_unstable();
    if guesses.is_empty() {
        0
    } else {
        guesses[(guesses.len() - 1) / 2]
    }
}

/// Rank players and split `pot` among the top `winners`.
pub fn build_prize_table(
    players: &[Player],
    pot: Amount,
    winners: usize,
    contributor_share_bps: u32,
) -> PrizeTable {
    let median = median_guess(players);
    let mut ranked: Vec<&Player> = players.iter().collect();
    ranked.sort_by_key(|p| (p.guess.abs_diff(median), p.address));
    ranked.truncate(winners);

    let contributor_cut = pot.value() * u128::from(contributor_share_bps.min(BPS as u32)) / BPS;
    let pool = pot.value() - contributor_cut;

    let n = ranked.len() as u128;
    let total_weight = n * (n + 1) / 2;
    let mut shares: Vec<u128> = (0..n)
        .map(|rank| pool * (n - rank) / total_weight)
        .collect();
    let assigned: u128 = shares.iter().sum();
    if let Some(first) = shares.first_mut() {
        *first += pool - assigned;
    }

    let entitlements = ranked
        .iter()
        .zip(shares)
        .filter(|(_, share)| *share > 0)
        .map(|(p, share)| Entitlement::new(p.address, share))
        .collect();

    PrizeTable {
        median_guess: median,
        pot,
        contributor_cut: Amount::new(contributor_cut),
        entitlements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallets::WalletFactory;
    use types::ids::Address;

    fn player(low: u8, guess: u32) -> Player {
        Player {
            address: Address::from_low_byte(low),
            guess,
            referrer: Address::ZERO,
        }
    }

    #[test]
    fn test_pot_in_base_units() {
        let pot = pot_in_base_units(Decimal::new(2, 2)).unwrap();
        assert_eq!(pot, Amount::new(20_000_000_000_000_000));
    }

    #[test]
    fn test_median_guess() {
        let players = vec![player(1, 10), player(2, 500), player(3, 30), player(4, 20)];
        assert_eq!(median_guess(&players), 20);
        assert_eq!(median_guess(&[]), 0);
    }

    #[test]
    fn test_closest_to_median_wins_most() {
        let players = vec![player(1, 100), player(2, 50), player(3, 49), player(4, 900)];
        // median = 50
        let table = build_prize_table(&players, Amount::new(600), 3, 0);
        assert_eq!(table.median_guess, 50);
        assert_eq!(table.entitlements[0].account, Address::from_low_byte(2));
        assert_eq!(table.entitlements[1].account, Address::from_low_byte(3));
        assert_eq!(table.entitlements[2].account, Address::from_low_byte(1));
        assert_eq!(table.entitlements[0].amount, Amount::new(300));
        assert_eq!(table.entitlements[1].amount, Amount::new(200));
        assert_eq!(table.entitlements[2].amount, Amount::new(100));
    }

    #[test]
    fn test_whole_pool_distributed() {
        let players = WalletFactory::new(11).players(97);
        let pot = Amount::new(1_940_000_000_000_000_001);
        let table = build_prize_table(&players, pot, 13, 500);
        assert_eq!(table.entitlements.len(), 13);
        assert_eq!(
            table.distributed().value() + table.contributor_cut.value(),
            pot.value()
        );
    }

    #[test]
    fn test_more_winners_than_players() {
        let players = vec![player(1, 5), player(2, 6)];
        let table = build_prize_table(&players, Amount::new(30), 10, 0);
        assert_eq!(table.entitlements.len(), 2);
        assert_eq!(table.distributed(), Amount::new(30));
    }

    #[test]
    fn test_zero_shares_dropped() {
        let players = vec![player(1, 5), player(2, 6), player(3, 7)];
        let table = build_prize_table(&players, Amount::new(1), 3, 0);
        assert_eq!(table.entitlements.len(), 1);
        assert_eq!(table.distributed(), Amount::new(1));
    }
}
