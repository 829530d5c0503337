//! Midcurve CLI - build reward trees, serve proofs, verify claims
//!
//! This tool provides commands for:
//! - Building a claim tree from a JSON list of entitlements
//! - Looking up an account's proofs in a tree dump
//! - Verifying a proof against a root
//! - Running a seeded full-round simulation

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use claim_tree::hash::{format_hash, parse_hash};
use claim_tree::{verify_entitlement, ClaimTree, Proof};
use contracts::config::GameConfig;
use simulation::export::{build_export, export_json};
use simulation::replay::validate_replay;
use simulation::scenario::{run, RoundScenarioConfig};
use types::entitlement::Entitlement;
use types::ids::Address;

/// Midcurve - Merkle reward claims
#[derive(Parser)]
#[command(name = "midcurve")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build, serve and verify Midcurve reward claims", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a claim tree and print its root
    Build {
        /// JSON array of { "account": "0x…", "amount": "100" }
        #[arg(short, long)]
        input: PathBuf,

        /// Write the tree dump here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print every proof for an account
    Proof {
        /// Tree dump produced by `build`
        #[arg(short, long)]
        tree: PathBuf,

        /// Account address
        #[arg(short, long)]
        account: String,
    },

    /// Verify a proof for (account, amount) against a root
    Verify {
        #[arg(short, long)]
        root: String,

        #[arg(short, long)]
        account: String,

        #[arg(long)]
        amount: String,

        /// Sibling hashes, comma separated
        #[arg(short, long, value_delimiter = ',')]
        proof: Vec<String>,
    },

    /// Run a seeded full-round simulation
    Simulate {
        #[arg(long, default_value_t = 1_000)]
        players: usize,

        #[arg(long, default_value_t = 100)]
        winners: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Game config JSON
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the full export here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output } => build(input, output),
        Commands::Proof { tree, account } => proof(tree, account),
        Commands::Verify {
            root,
            account,
            amount,
            proof,
        } => verify(root, account, amount, proof),
        Commands::Simulate {
            players,
            winners,
            seed,
            config,
            output,
        } => simulate(players, winners, seed, config, output),
    }
}

fn build(input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let contents = fs::read_to_string(&input)
        .with_context(|| format!("Failed to read entitlements file: {}", input.display()))?;
    let entitlements: Vec<Entitlement> =
        serde_json::from_str(&contents).with_context(|| "Failed to parse entitlements JSON")?;

    let tree = ClaimTree::build(entitlements).context("Failed to build claim tree")?;

    if let Some(path) = output {
        tree.write_to_file(&path)
            .with_context(|| format!("Failed to write tree dump: {}", path.display()))?;
        eprintln!("Tree written to: {}", path.display());
    }

    eprintln!("Leaves: {}", tree.len());
    println!("{}", format_hash(&tree.root()));
    Ok(())
}

fn proof(tree_path: PathBuf, account: String) -> Result<()> {
    let tree = ClaimTree::read_from_file(&tree_path)
        .with_context(|| format!("Failed to load tree dump: {}", tree_path.display()))?;
    let account: Address = account.parse().context("Invalid account address")?;

    let found = tree.find(&account);
    if found.is_empty() {
        anyhow::bail!("No entitlement for {} in tree", account);
    }

    let mut claims = Vec::with_capacity(found.len());
    for (index, entitlement) in found {
        let proof = tree.proof(index)?;
        claims.push(serde_json::json!({
            "index": index,
            "account": entitlement.account,
            "amount": entitlement.amount,
            "proof": proof,
        }));
    }

    println!("{}", serde_json::to_string_pretty(&claims)?);
    Ok(())
}

fn verify(root: String, account: String, amount: String, proof: Vec<String>) -> Result<()> {
    let root = parse_hash(&root).context("Invalid root")?;
    let entitlement = Entitlement::parse(&account, &amount).context("Malformed entitlement")?;
    let siblings = proof
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| parse_hash(s))
        .collect::<Result<Vec<_>, _>>()
        .context("Invalid proof hash")?;

    if !verify_entitlement(&root, &entitlement, &Proof::new(siblings)) {
        anyhow::bail!("Invalid proof for {}", entitlement);
    }

    println!("valid");
    Ok(())
}

fn simulate(
    players: usize,
    winners: usize,
    seed: u64,
    config_path: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<()> {
    let game = match config_path {
        Some(path) => {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            GameConfig::from_json_str(&contents).context("Invalid game config")?
        }
        None => GameConfig::default(),
    };

    let config = RoundScenarioConfig {
        players,
        winners,
        seed,
        game,
        ..RoundScenarioConfig::default()
    };

    let outcome = run(&config).context("Simulation failed")?;
    let replay = validate_replay(&outcome.game).context("Event log replay failed")?;
    if !replay.matches {
        anyhow::bail!("Event log replay diverged from contract state");
    }

    let export = build_export(&outcome);
    let json = export_json(&export)?;
    match output {
        Some(path) => {
            fs::write(&path, &json)
                .with_context(|| format!("Failed to write output file: {}", path.display()))?;
            eprintln!("Export written to: {}", path.display());
            println!("{}", serde_json::to_string_pretty(&outcome.report)?);
        }
        None => println!("{}", json),
    }

    if !outcome.report.passed {
        anyhow::bail!("Scenario failed: {:?}", outcome.report.violations);
    }
    Ok(())
}
