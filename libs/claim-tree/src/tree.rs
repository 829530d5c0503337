//! Tree builder
//!
//! Hashes every entitlement into a leaf, sorts the leaves, and folds them
//! layer by layer into a single root. Pairs are combined with the commutative
//! `hash_pair`; when a layer has an odd number of nodes the last one is
//! promoted unchanged.

use std::collections::HashMap;
use tracing::debug;
use types::entitlement::Entitlement;
use types::ids::Address;
use types::numeric::Amount;

use crate::errors::TreeError;
use crate::hash::{format_hash, hash_pair, leaf_hash, Hash};
use crate::proof::{verify, Proof};

/// A built Merkle tree over a set of entitlements.
///
/// `layers[0]` holds the sorted leaves, the last layer holds the root.
/// `values[i]` is the entitlement whose leaf is `layers[0][i]`.
#[derive(Debug, Clone)]
pub struct ClaimTree {
    layers: Vec<Vec<Hash>>,
    values: Vec<Entitlement>,
    positions: HashMap<Hash, usize>,
}

impl ClaimTree {
    /// Build a tree from a non-empty set of entitlements.
    ///
    /// Input order is irrelevant. An account may appear several times with
    /// different amounts; an exactly repeated `(account, amount)` pair is
    /// rejected since both copies would share one leaf.
    pub fn build<I>(entitlements: I) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = Entitlement>,
    {
        let mut hashed: Vec<(Hash, Entitlement)> = entitlements
            .into_iter()
            .map(|e| (leaf_hash(&e), e))
            .collect();

        if hashed.is_empty() {
            return Err(TreeError::EmptyEntitlementSet);
        }

        hashed.sort_by(|a, b| a.0.cmp(&b.0));

        if let Some(dup) = hashed.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(TreeError::DuplicateEntitlement {
                entitlement: dup[0].1.to_string(),
            });
        }

        let (leaves, values): (Vec<Hash>, Vec<Entitlement>) = hashed.into_iter().unzip();
        let positions = leaves
            .iter()
            .enumerate()
            .map(|(i, leaf)| (*leaf, i))
            .collect();
        let layers = build_layers(leaves);

        let tree = Self {
            layers,
            values,
            positions,
        };

        debug!(
            leaves = tree.len(),
            depth = tree.depth(),
            root = %format_hash(&tree.root()),
            "Built claim tree"
        );

        Ok(tree)
    }

    /// The committed root.
    pub fn root(&self) -> Hash {
        // build_layers always ends with a single-node layer
        self.layers[self.layers.len() - 1][0]
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a built tree; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of hashing layers above the leaves.
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// All layers, leaves first.
    pub fn layers(&self) -> &[Vec<Hash>] {
        &self.layers
    }

    /// Leaf hash at `index`.
    pub fn leaf(&self, index: usize) -> Result<Hash, TreeError> {
        self.check_index(index)?;
        Ok(self.layers[0][index])
    }

    /// Entitlement at `index`.
    pub fn value(&self, index: usize) -> Result<&Entitlement, TreeError> {
        self.check_index(index)?;
        Ok(&self.values[index])
    }

    /// Iterate `(index, entitlement)` in leaf order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &Entitlement)> {
        self.values.iter().enumerate()
    }

    /// Leaf index of an entitlement, if included.
    pub fn index_of(&self, entitlement: &Entitlement) -> Option<usize> {
        self.positions.get(&leaf_hash(entitlement)).copied()
    }

    /// All entries belonging to `account`, in leaf order.
    pub fn find(&self, account: &Address) -> Vec<(usize, &Entitlement)> {
        self.entries()
            .filter(|(_, e)| e.account == *account)
            .collect()
    }

    /// Sibling path from leaf `index` to the root.
    pub fn proof(&self, index: usize) -> Result<Proof, TreeError> {
        self.check_index(index)?;

        let mut siblings = Vec::with_capacity(self.depth());
        let mut idx = index;
        for layer in &self.layers[..self.layers.len() - 1] {
            let sibling = idx ^ 1;
            if sibling < layer.len() {
                siblings.push(layer[sibling]);
            }
            idx /= 2;
        }

        Ok(Proof::new(siblings))
    }

    /// Proof for an included entitlement.
    pub fn proof_for(&self, entitlement: &Entitlement) -> Result<Proof, TreeError> {
        let index = self
            .index_of(entitlement)
            .ok_or_else(|| TreeError::NotInTree {
                entitlement: entitlement.to_string(),
            })?;
        self.proof(index)
    }

    /// Check a proof for leaf `index` against this tree's root.
    pub fn verify_index(&self, index: usize, proof: &Proof) -> Result<bool, TreeError> {
        let leaf = self.leaf(index)?;
        Ok(verify(&self.root(), &leaf, proof))
    }

    /// Sum of all entitled amounts (saturating).
    pub fn total_amount(&self) -> Amount {
        self.values.iter().map(|e| e.amount).sum()
    }

    /// Entitlements in leaf order.
    pub fn values(&self) -> &[Entitlement] {
        &self.values
    }

    fn check_index(&self, index: usize) -> Result<(), TreeError> {
        if index >= self.len() {
            return Err(TreeError::IndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(())
    }
}

/// Fold sorted leaves into layers; the last layer has exactly one node.
fn build_layers(leaves: Vec<Hash>) -> Vec<Vec<Hash>> {
    let mut layers = vec![leaves];
    while layers[layers.len() - 1].len() > 1 {
        let current = &layers[layers.len() - 1];
        let next: Vec<Hash> = current
            .chunks(2)
            .map(|pair| match pair {
                [a, b] => hash_pair(a, b),
                [single] => *single,
                _ => unreachable!("chunks(2) yields one or two nodes"),
            })
            .collect();
        layers.push(next);
    }
    layers
}
