//! Hashing primitives for the claim tree
//!
//! All hashes are Keccak-256. Leaves are double-hashed so that no leaf
//! preimage (32 bytes) can collide with an internal node preimage (64 bytes).

use sha3::{Digest, Keccak256};
use types::entitlement::Entitlement;

use crate::errors::TreeError;

/// 32-byte Keccak-256 digest
pub type Hash = [u8; 32];

/// Keccak-256 of arbitrary bytes.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Leaf hash of an entitlement: `keccak256(keccak256(abi.encode(account, amount)))`.
pub fn leaf_hash(entitlement: &Entitlement) -> Hash {
    keccak256(&keccak256(&entitlement.abi_encode()))
}

/// Commutative node hash: the smaller child (bytewise) always goes first.
pub fn hash_pair(a: &Hash, b: &Hash) -> Hash {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut hasher = Keccak256::new();
    hasher.update(lo);
    hasher.update(hi);
    hasher.finalize().into()
}

/// Lowercase `0x`-prefixed hex form of a hash.
pub fn format_hash(hash: &Hash) -> String {
    format!("0x{}", hex::encode(hash))
}

/// Parse a `0x`-prefixed (or bare) 64-digit hex string.
pub fn parse_hash(s: &str) -> Result<Hash, TreeError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(digits).map_err(|_| TreeError::InvalidHash {
        input: s.to_string(),
    })?;
    bytes.try_into().map_err(|_| TreeError::InvalidHash {
        input: s.to_string(),
    })
}

/// Serde adapter storing a `Hash` as a `0x` hex string.
pub mod hex_hash {
    use super::{format_hash, parse_hash, Hash};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(hash: &Hash, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_hash(hash))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Hash, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_hash(&s).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for `Vec<Hash>` as a list of `0x` hex strings.
pub mod hex_hash_vec {
    use super::{format_hash, parse_hash, Hash};
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(hashes: &[Hash], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(hashes.len()))?;
        for h in hashes {
            seq.serialize_element(&format_hash(h))?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Hash>, D::Error> {
        let raw = Vec::<String>::deserialize(deserializer)?;
        raw.iter()
            .map(|s| parse_hash(s).map_err(serde::de::Error::custom))
            .collect()
    }
}
