//! Concurrency test
//!
//! Independent rounds run in parallel without shared state, and many
//! claimants racing on one shared round are each paid at most once.

use claim_tree::ClaimTree;
use contracts::config::GameConfig;
use contracts::round::{ClaimRequest, Round};
use contracts::shared::SharedRound;
use contracts::RoundError;
use simulation::prizes::build_prize_table;
use simulation::scenario::{run, RoundScenarioConfig};
use simulation::wallets::WalletFactory;
use std::sync::Arc;
use std::thread;
use types::ids::RoundId;
use types::numeric::Amount;

#[test]
fn test_concurrent_scenarios() {
    let handles: Vec<_> = (0..4u64)
        .map(|seed| {
            thread::spawn(move || {
                let config = RoundScenarioConfig {
                    players: 200,
                    winners: 20,
                    seed,
                    ..RoundScenarioConfig::default()
                };
                run(&config).unwrap().report
            })
        })
        .collect();

    let reports: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(reports.iter().all(|r| r.passed));
    assert_eq!(reports.iter().map(|r| r.claims_succeeded).sum::<usize>(), 80);
}

#[test]
fn test_concurrent_determinism() {
    let config = RoundScenarioConfig {
        players: 150,
        winners: 15,
        ..RoundScenarioConfig::default()
    };
    let c1 = config.clone();
    let c2 = config;

    let h1 = thread::spawn(move || run(&c1).unwrap().report);
    let h2 = thread::spawn(move || run(&c2).unwrap().report);

    let r1 = h1.join().unwrap();
    let r2 = h2.join().unwrap();

    assert_eq!(r1, r2, "Parallel runs must produce identical results");
}

#[test]
fn test_racing_claimants_paid_once() {
    let players = WalletFactory::new(9).players(200);
    let prizes = build_prize_table(&players, Amount::new(1_000_000_000), 50, 0);
    let tree = Arc::new(ClaimTree::build(prizes.entitlements.clone()).unwrap());

    let config = GameConfig {
        round_duration_seconds: 60,
        ..GameConfig::default()
    };
    let round = SharedRound::new(Round::new(RoundId::new(1), 0, &config).unwrap());
    round.grade(tree.root(), 61).unwrap();

    // Every thread tries every leaf.
    let handles: Vec<_> = (0..6)
        .map(|_| {
            let round = round.clone();
            let tree = Arc::clone(&tree);
            thread::spawn(move || {
                let mut paid = 0u128;
                let mut replays = 0usize;
                for (index, e) in tree.entries() {
                    let request =
                        ClaimRequest::new(tree.proof(index).unwrap(), e.amount, e.account);
                    match round.claim(&request, 100) {
                        Ok(amount) => paid += amount.value(),
                        Err(RoundError::AlreadyClaimed) => replays += 1,
                        Err(other) => panic!("unexpected claim error: {}", other),
                    }
                }
                (paid, replays)
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let paid: u128 = results.iter().map(|(p, _)| p).sum();
    let replays: usize = results.iter().map(|(_, r)| r).sum();

    assert_eq!(paid, 1_000_000_000);
    assert_eq!(replays, 5 * tree.len());
    assert_eq!(round.claimed_count(), tree.len());
}
