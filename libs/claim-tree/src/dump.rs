//! Tree dump and load
//!
//! A dump carries the root, every layer, and the entitlements with their
//! leaf indices, so a claimant can look up a proof without rebuilding the
//! tree. Loading always rebuilds from the values and rejects a dump whose
//! stored hashes disagree with the recomputation.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;
use types::entitlement::Entitlement;

use crate::errors::TreeError;
use crate::hash::{format_hash, Hash};
use crate::tree::ClaimTree;
use crate::TREE_FORMAT;

/// Leaf encoding types, in ABI order (frozen)
pub const LEAF_ENCODING: [&str; 2] = ["address", "uint256"];

/// One entitlement and the index of its leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpValue {
    pub index: usize,
    pub value: Entitlement,
}

/// Serializable snapshot of a built tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeDump {
    pub format: String,
    pub leaf_encoding: Vec<String>,
    #[serde(with = "crate::hash::hex_hash")]
    pub root: Hash,
    pub layers: Vec<HexLayer>,
    pub values: Vec<DumpValue>,
}

/// One tree layer as hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HexLayer(#[serde(with = "crate::hash::hex_hash_vec")] pub Vec<Hash>);

impl ClaimTree {
    /// Snapshot this tree.
    pub fn dump(&self) -> TreeDump {
        TreeDump {
            format: TREE_FORMAT.to_string(),
            leaf_encoding: LEAF_ENCODING.iter().map(|s| s.to_string()).collect(),
            root: self.root(),
            layers: self.layers().iter().cloned().map(HexLayer).collect(),
            values: self
                .entries()
                .map(|(index, value)| DumpValue {
                    index,
                    value: *value,
                })
                .collect(),
        }
    }

    /// Rebuild a tree from a dump, checking every stored hash.
    pub fn load(dump: &TreeDump) -> Result<Self, TreeError> {
        if dump.format != TREE_FORMAT {
            return Err(invalid(format!("unknown format '{}'", dump.format)));
        }
        if dump.leaf_encoding != LEAF_ENCODING {
            return Err(invalid(format!(
                "unsupported leaf encoding {:?}",
                dump.leaf_encoding
            )));
        }

        let tree = ClaimTree::build(dump.values.iter().map(|v| v.value))?;

        if tree.root() != dump.root {
            warn!(
                stored = %format_hash(&dump.root),
                computed = %format_hash(&tree.root()),
                "Tree dump root mismatch"
            );
            return Err(invalid("stored root does not match values".to_string()));
        }

        let layers_match = tree.layers().len() == dump.layers.len()
            && tree
                .layers()
                .iter()
                .zip(dump.layers.iter())
                .all(|(computed, stored)| *computed == stored.0);
        if !layers_match {
            return Err(invalid("stored layers do not match values".to_string()));
        }

        for stored in &dump.values {
            if tree.index_of(&stored.value) != Some(stored.index) {
                return Err(invalid(format!(
                    "value {} stored at wrong index {}",
                    stored.value, stored.index
                )));
            }
        }

        Ok(tree)
    }

    /// Dump as pretty JSON.
    pub fn to_json(&self) -> Result<String, TreeError> {
        Ok(serde_json::to_string_pretty(&self.dump())?)
    }

    /// Load from JSON produced by `to_json`.
    pub fn from_json(json: &str) -> Result<Self, TreeError> {
        let dump: TreeDump = serde_json::from_str(json)?;
        Self::load(&dump)
    }

    /// Write the JSON dump to a file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), TreeError> {
        let json = self.to_json()?;
        std::fs::write(path.as_ref(), json).map_err(|e| {
            invalid(format!("cannot write {}: {}", path.as_ref().display(), e))
        })
    }

    /// Read and verify a JSON dump from a file.
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, TreeError> {
        let json = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            invalid(format!("cannot read {}: {}", path.as_ref().display(), e))
        })?;
        Self::from_json(&json)
    }
}

fn invalid(reason: String) -> TreeError {
    TreeError::InvalidDump { reason }
}
