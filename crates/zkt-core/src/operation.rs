//! # Operation Keys
//!
//! Every configuration slice and every registry leaf is addressed by the
//! operation it governs. The numeric ids are part of the wire surface: they
//! select the registry leaf and the bit range inside the packed
//! proof-requirement word.

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// A supply-affecting operation gated by proof requirements and the
/// verification-key registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKey {
    /// Create supply.
    Mint,
    /// Destroy supply.
    Burn,
    /// Move balance between two accounts.
    Transfer,
    /// Approve a forest of balance-changing account updates.
    BulkUpdate,
}

impl OperationKey {
    /// Number of operations. Sizes the packed requirement word and the
    /// registry map.
    pub const COUNT: usize = 4;

    /// All operations in id order.
    pub const ALL: [OperationKey; Self::COUNT] = [
        OperationKey::Mint,
        OperationKey::Burn,
        OperationKey::Transfer,
        OperationKey::BulkUpdate,
    ];

    /// Wire id (1-based).
    pub fn id(self) -> u64 {
        self.index() as u64 + 1
    }

    /// Zero-based position used for bit offsets and map leaves.
    pub fn index(self) -> usize {
        match self {
            Self::Mint => 0,
            Self::Burn => 1,
            Self::Transfer => 2,
            Self::BulkUpdate => 3,
        }
    }

    /// Stable lowercase name, used in events, metrics and signed payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mint => "mint",
            Self::Burn => "burn",
            Self::Transfer => "transfer",
            Self::BulkUpdate => "bulk_update",
        }
    }
}

impl TryFrom<u64> for OperationKey {
    type Error = RegistryError;

    fn try_from(id: u64) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(Self::Mint),
            2 => Ok(Self::Burn),
            3 => Ok(Self::Transfer),
            4 => Ok(Self::BulkUpdate),
            other => Err(RegistryError::InvalidOperationKey(other)),
        }
    }
}

impl std::fmt::Display for OperationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An operation governed by an amount policy and range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountOperation {
    /// Amount rules for minting.
    Mint,
    /// Amount rules for burning.
    Burn,
}

impl AmountOperation {
    /// Number of amount operations packed into the policy word.
    pub const COUNT: usize = 2;

    /// Zero-based slot inside the packed policy word.
    pub fn index(self) -> usize {
        match self {
            Self::Mint => 0,
            Self::Burn => 1,
        }
    }

    /// The registry/requirement key of the same operation.
    pub fn operation_key(self) -> OperationKey {
        match self {
            Self::Mint => OperationKey::Mint,
            Self::Burn => OperationKey::Burn,
        }
    }
}

impl std::fmt::Display for AmountOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.operation_key().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_roundtrip() {
        for op in OperationKey::ALL {
            assert_eq!(OperationKey::try_from(op.id()).unwrap(), op);
        }
    }

    #[test]
    fn ids_are_one_based_and_dense() {
        let ids: Vec<u64> = OperationKey::ALL.iter().map(|o| o.id()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn unknown_ids_rejected() {
        for bad in [0u64, 5, 99, u64::MAX] {
            assert!(matches!(
                OperationKey::try_from(bad),
                Err(RegistryError::InvalidOperationKey(id)) if id == bad
            ));
        }
    }

    #[test]
    fn amount_operation_maps_to_key() {
        assert_eq!(AmountOperation::Mint.operation_key(), OperationKey::Mint);
        assert_eq!(AmountOperation::Burn.operation_key(), OperationKey::Burn);
    }

    #[test]
    fn serde_names() {
        assert_eq!(
            serde_json::to_string(&OperationKey::BulkUpdate).unwrap(),
            "\"bulk_update\""
        );
    }
}
