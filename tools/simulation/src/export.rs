//! Report export
//!
//! Serializes a scenario's report, prize table and tree dump to JSON for
//! external consumption (e.g. a front end that serves proofs by address).

use claim_tree::dump::TreeDump;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::SimulationError;
use crate::prizes::PrizeTable;
use crate::scenario::{ScenarioOutcome, ScenarioReport};

/// Combined export containing all scenario outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationExport {
    pub version: String,
    pub report: ScenarioReport,
    pub prizes: PrizeTable,
    pub tree: TreeDump,
    pub event_count: usize,
}

/// Build a complete export from a finished run.
pub fn build_export(outcome: &ScenarioOutcome) -> SimulationExport {
    SimulationExport {
        version: crate::VERSION.to_string(),
        report: outcome.report.clone(),
        prizes: outcome.prizes.clone(),
        tree: outcome.tree.dump(),
        event_count: outcome.game.events().len(),
    }
}

/// Export as pretty JSON.
pub fn export_json(export: &SimulationExport) -> Result<String, SimulationError> {
    Ok(serde_json::to_string_pretty(export)?)
}

/// Write export to a file path.
pub fn write_to_file(
    export: &SimulationExport,
    path: impl AsRef<Path>,
) -> Result<(), SimulationError> {
    let json = export_json(export)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{run, RoundScenarioConfig};
    use claim_tree::ClaimTree;

    fn outcome() -> ScenarioOutcome {
        run(&RoundScenarioConfig {
            players: 8,
            winners: 3,
            ..RoundScenarioConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_build_export() {
        let outcome = outcome();
        let export = build_export(&outcome);
        assert_eq!(export.version, crate::VERSION);
        assert_eq!(export.event_count, outcome.game.events().len());
        assert_eq!(export.tree.values.len(), 3);
    }

    #[test]
    fn test_export_json_roundtrip() {
        let export = build_export(&outcome());
        let json = export_json(&export).unwrap();
        let parsed: SimulationExport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.report, export.report);

        // The embedded dump reloads to the reported root.
        let tree = ClaimTree::load(&parsed.tree).unwrap();
        assert_eq!(
            claim_tree::hash::format_hash(&tree.root()),
            parsed.report.merkle_root
        );
    }
}
