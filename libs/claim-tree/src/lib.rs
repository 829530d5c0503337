//! Claim Tree: Merkle commitments over reward entitlements
//!
//! Builds a canonical Merkle root over a set of `(address, uint256)`
//! entitlements and verifies inclusion proofs against it. Leaf and pair
//! hashing match OpenZeppelin's `StandardMerkleTree`, so every proof verifies
//! under `MerkleProof.verify`:
//!
//! - leaf = `keccak256(keccak256(abi.encode(account, amount)))`
//! - node = `keccak256(min(a, b) ‖ max(a, b))`
//!
//! The layout is not OpenZeppelin's: layers are built pairwise and an odd last
//! node is promoted unchanged. Roots agree with `StandardMerkleTree` for 1, 2,
//! 3, 4, 6 and 8 leaves and differ for other counts such as 5 and 7.
//!
//! # Determinism
//! Leaves are sorted by hash before pairing, so the root depends only on the
//! set of entitlements, never on insertion order. Verification is a pure
//! function of `(root, leaf, proof)`.
//!
//! # Modules
//! - `hash`: Keccak-256, leaf hashing, commutative pair hashing
//! - `proof`: Proof type and verifier
//! - `tree`: Tree builder and proof generation
//! - `dump`: JSON dump/load of a built tree
//! - `errors`: Tree error taxonomy

pub mod hash;
pub mod proof;
pub mod tree;
pub mod dump;
pub mod errors;

pub use errors::TreeError;
pub use hash::{hash_pair, keccak256, leaf_hash, Hash};
pub use proof::{process_proof, verify, verify_entitlement, Proof};
pub use tree::ClaimTree;

/// Dump format identifier (frozen)
pub const TREE_FORMAT: &str = "midcurve-claim-v1";
