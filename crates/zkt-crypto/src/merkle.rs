//! # Authenticated Map
//!
//! A fixed-depth Merkle tree keyed by leaf index. The map itself is held
//! off-chain by callers; only [`AuthenticatedMap::root`] is persisted. Every
//! read or write against the on-chain root must first show that the caller's
//! copy commits to that root.
//!
//! ## Hashing
//!
//! Domain-separated SHA-256, as for the receipt chains this is derived from:
//! - Leaf: `SHA256(0x00 || index_u64_be || value32)`.
//! - Node: `SHA256(0x01 || left || right)`.
//!
//! Binding the index into the leaf hash means a witness for one key can
//! never be replayed as a witness for another key holding the same value.
//!
//! ## Absent Values
//!
//! A leaf holding 32 zero bytes is empty. `get` reports it as `None`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use zkt_core::error::CryptoError;
use zkt_core::{hex, sha256};

const LEAF_TAG: [u8; 1] = [0x00];
const NODE_TAG: [u8; 1] = [0x01];

/// Compute the leaf hash for `value` stored at `index`.
pub fn leaf_hash(index: u64, value: &[u8; 32]) -> [u8; 32] {
    sha256(&[&LEAF_TAG, &index.to_be_bytes(), value])
}

/// Compute a parent node hash.
pub fn node_hash(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    sha256(&[&NODE_TAG, left, right])
}

/// Inclusion (or exclusion, for an empty leaf) witness for one index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapWitness {
    /// Leaf index the witness opens.
    pub index: u64,
    /// Sibling hashes from the leaf level upwards.
    pub siblings: Vec<[u8; 32]>,
}

impl MapWitness {
    /// Fold the witness with `value` at its index into a root.
    pub fn compute_root(&self, value: &[u8; 32]) -> [u8; 32] {
        let mut current = leaf_hash(self.index, value);
        let mut pos = self.index;
        for sibling in &self.siblings {
            current = if pos & 1 == 0 {
                node_hash(&current, sibling)
            } else {
                node_hash(sibling, &current)
            };
            pos >>= 1;
        }
        current
    }

    /// Whether `value` at this witness's index commits to `root`.
    pub fn verify(&self, value: &[u8; 32], root: &[u8; 32]) -> bool {
        &self.compute_root(value) == root
    }
}

/// A fixed-depth authenticated key-value map with `2^DEPTH` leaves.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthenticatedMap<const DEPTH: usize> {
    leaves: Vec<[u8; 32]>,
}

impl<const DEPTH: usize> AuthenticatedMap<DEPTH> {
    /// Number of leaves.
    pub const CAPACITY: u64 = 1 << DEPTH;

    /// An empty map.
    pub fn new() -> Self {
        Self {
            leaves: vec![[0u8; 32]; Self::CAPACITY as usize],
        }
    }

    /// Root of the empty map. This is the value a freshly initialized
    /// contract persists.
    pub fn empty_root() -> [u8; 32] {
        Self::new().root()
    }

    fn check_index(index: u64) -> Result<usize, CryptoError> {
        if index >= Self::CAPACITY {
            return Err(CryptoError::IndexOutOfRange {
                index,
                capacity: Self::CAPACITY,
            });
        }
        Ok(index as usize)
    }

    /// Value at `index`, or `None` for an empty leaf.
    pub fn get(&self, index: u64) -> Result<Option<[u8; 32]>, CryptoError> {
        let i = Self::check_index(index)?;
        let value = self.leaves[i];
        Ok((value != [0u8; 32]).then_some(value))
    }

    /// Insert or overwrite the value at `index`.
    pub fn set(&mut self, index: u64, value: [u8; 32]) -> Result<(), CryptoError> {
        let i = Self::check_index(index)?;
        self.leaves[i] = value;
        Ok(())
    }

    /// All tree levels, leaf hashes first, root last.
    fn levels(&self) -> Vec<Vec<[u8; 32]>> {
        let mut levels = Vec::with_capacity(DEPTH + 1);
        let mut level: Vec<[u8; 32]> = self
            .leaves
            .iter()
            .enumerate()
            .map(|(i, v)| leaf_hash(i as u64, v))
            .collect();
        while level.len() > 1 {
            let next = level
                .chunks(2)
                .map(|pair| node_hash(&pair[0], &pair[1]))
                .collect();
            levels.push(level);
            level = next;
        }
        levels.push(level);
        levels
    }

    /// The root commitment.
    pub fn root(&self) -> [u8; 32] {
        self.levels()
            .last()
            .and_then(|top| top.first().copied())
            .unwrap_or([0u8; 32])
    }

    /// Witness opening `index`.
    pub fn witness(&self, index: u64) -> Result<MapWitness, CryptoError> {
        let mut pos = Self::check_index(index)?;
        let levels = self.levels();
        let mut siblings = Vec::with_capacity(DEPTH);
        for level in levels.iter().take(DEPTH) {
            siblings.push(level[pos ^ 1]);
            pos >>= 1;
        }
        Ok(MapWitness { index, siblings })
    }
}

impl<const DEPTH: usize> Default for AuthenticatedMap<DEPTH> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const DEPTH: usize> std::fmt::Debug for AuthenticatedMap<DEPTH> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthenticatedMap<{DEPTH}>(root={})", hex::encode(&self.root()))
    }
}

impl<const DEPTH: usize> Serialize for AuthenticatedMap<DEPTH> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let leaves: Vec<String> = self.leaves.iter().map(|l| hex::encode(l)).collect();
        leaves.serialize(serializer)
    }
}

impl<'de, const DEPTH: usize> Deserialize<'de> for AuthenticatedMap<DEPTH> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Vec::<String>::deserialize(deserializer)?;
        if raw.len() as u64 != Self::CAPACITY {
            return Err(serde::de::Error::custom(format!(
                "expected {} leaves, got {}",
                Self::CAPACITY,
                raw.len()
            )));
        }
        let leaves = raw
            .iter()
            .map(|s| hex::decode_32(s))
            .collect::<Result<Vec<_>, _>>()
            .map_err(serde::de::Error::custom)?;
        Ok(Self { leaves })
    }
}
