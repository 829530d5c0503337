//! Proof verification
//!
//! A proof is the list of sibling hashes met while walking from a leaf up to
//! the root. Because node hashing is commutative, a proof carries no
//! left/right bits: the verifier simply folds each sibling into the running
//! hash.

use serde::{Deserialize, Serialize};
use types::entitlement::Entitlement;

use crate::hash::{hash_pair, leaf_hash, Hash};

/// Inclusion proof: sibling hashes ordered from leaf to root
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Proof(#[serde(with = "crate::hash::hex_hash_vec")] pub Vec<Hash>);

impl Proof {
    pub fn new(siblings: Vec<Hash>) -> Self {
        Self(siblings)
    }

    pub fn siblings(&self) -> &[Hash] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Hash>> for Proof {
    fn from(siblings: Vec<Hash>) -> Self {
        Self(siblings)
    }
}

/// Recompute the root implied by `leaf` and `proof`.
pub fn process_proof(leaf: &Hash, proof: &Proof) -> Hash {
    proof
        .siblings()
        .iter()
        .fold(*leaf, |acc, sibling| hash_pair(&acc, sibling))
}

/// True iff `proof` links `leaf` to `root`.
pub fn verify(root: &Hash, leaf: &Hash, proof: &Proof) -> bool {
    process_proof(leaf, proof) == *root
}

/// Verify an entitlement directly; the leaf is derived from its fields.
pub fn verify_entitlement(root: &Hash, entitlement: &Entitlement, proof: &Proof) -> bool {
    verify(root, &leaf_hash(entitlement), proof)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::keccak256;

    #[test]
    fn test_empty_proof_leaf_is_root() {
        let leaf = keccak256(b"only");
        assert!(verify(&leaf, &leaf, &Proof::default()));
    }

    #[test]
    fn test_two_leaf_proof() {
        let a = keccak256(b"a");
        let b = keccak256(b"b");
        let root = hash_pair(&a, &b);

        assert!(verify(&root, &a, &Proof::new(vec![b])));
        assert!(verify(&root, &b, &Proof::new(vec![a])));
    }

    #[test]
    fn test_wrong_sibling_fails() {
        let a = keccak256(b"a");
        let b = keccak256(b"b");
        let c = keccak256(b"c");
        let root = hash_pair(&a, &b);

        assert!(!verify(&root, &a, &Proof::new(vec![c])));
    }

    #[test]
    fn test_extra_sibling_fails() {
        let a = keccak256(b"a");
        let b = keccak256(b"b");
        let root = hash_pair(&a, &b);

        assert!(!verify(&root, &a, &Proof::new(vec![b, b])));
    }

    #[test]
    fn test_proof_serializes_as_hex_list() {
        let proof = Proof::new(vec![[0u8; 32], [0xffu8; 32]]);
        let json = serde_json::to_string(&proof).unwrap();
        assert!(json.starts_with("[\"0x0000"));
        assert!(json.contains("0xffff"));

        let back: Proof = serde_json::from_str(&json).unwrap();
        assert_eq!(back, proof);
    }
}
