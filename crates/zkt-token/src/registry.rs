//! # Verification-Key Registry
//!
//! A depth-2 authenticated map from operation key to verification-key
//! fingerprint. Leaf `OperationKey::index()` holds the fingerprint of the
//! key proofs for that operation must be checked with; an all-zero leaf
//! means no key is registered.
//!
//! Only the root is on-chain (slot 6). Callers keep the map and present it
//! with every operation that reads or writes the registry. A map whose root
//! differs from the on-chain root is stale and is rejected before anything
//! else happens. Staleness is detected, never prevented: the caller
//! re-fetches and resubmits.

use zkt_core::{hex, OperationKey, RegistryError, StateWord, VkFingerprint};
use zkt_crypto::AuthenticatedMap;

use crate::error::TokenError;

/// The caller-held registry map.
pub type VKeyMap = AuthenticatedMap<2>;

/// Registry operations against an on-chain root.
#[derive(Debug, Clone, Copy)]
pub struct VKeyRegistry;

impl VKeyRegistry {
    /// Root a freshly initialized contract stores.
    pub fn empty_root() -> StateWord {
        StateWord(VKeyMap::empty_root())
    }

    /// Fail with `StaleRegistry` unless `map` commits to `on_chain_root`.
    pub fn check_sync(map: &VKeyMap, on_chain_root: &StateWord) -> Result<(), RegistryError> {
        let supplied = map.root();
        if supplied != on_chain_root.0 {
            return Err(RegistryError::StaleRegistry {
                supplied: hex::encode(&supplied),
                on_chain: on_chain_root.to_hex(),
            });
        }
        Ok(())
    }

    /// Insert or overwrite the fingerprint for `raw_key`.
    ///
    /// Returns the updated map; `map` itself is left as it was so the caller
    /// can keep it until the registration is committed.
    pub fn register(
        map: &VKeyMap,
        on_chain_root: &StateWord,
        raw_key: u64,
        fingerprint: VkFingerprint,
    ) -> Result<(OperationKey, VKeyMap), TokenError> {
        Self::check_sync(map, on_chain_root)?;
        let operation = OperationKey::try_from(raw_key)?;
        if fingerprint.is_absent() {
            return Err(RegistryError::InvalidKey(operation).into());
        }
        let mut next = map.clone();
        next.set(operation.index() as u64, fingerprint.0)?;
        Ok((operation, next))
    }

    /// The fingerprint registered for `operation`, if any.
    ///
    /// The leaf is read through a witness that must fold to the on-chain
    /// root.
    pub fn lookup(
        map: &VKeyMap,
        on_chain_root: &StateWord,
        operation: OperationKey,
    ) -> Result<Option<VkFingerprint>, TokenError> {
        Self::check_sync(map, on_chain_root)?;
        let index = operation.index() as u64;
        let leaf = map.get(index)?;
        let witness = map.witness(index)?;
        if !witness.verify(&leaf.unwrap_or([0u8; 32]), &on_chain_root.0) {
            return Err(RegistryError::StaleRegistry {
                supplied: hex::encode(&map.root()),
                on_chain: on_chain_root.to_hex(),
            }
            .into());
        }
        Ok(leaf.map(VkFingerprint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn fp(n: u8) -> VkFingerprint {
        VkFingerprint([n; 32])
    }

    #[test]
    fn register_then_lookup() {
        let map = VKeyMap::new();
        let root = VKeyRegistry::empty_root();
        let (op, next) = VKeyRegistry::register(&map, &root, 3, fp(7)).unwrap();
        assert_eq!(op, OperationKey::Transfer);
        let new_root = StateWord(next.root());
        assert_eq!(
            VKeyRegistry::lookup(&next, &new_root, OperationKey::Transfer).unwrap(),
            Some(fp(7))
        );
        assert_eq!(VKeyRegistry::lookup(&next, &new_root, OperationKey::Mint).unwrap(), None);
        assert_eq!(map.root(), VKeyMap::empty_root());
    }

    #[test]
    fn stale_map_rejected() {
        let mut stale = VKeyMap::new();
        stale.set(0, [1; 32]).unwrap();
        let err = VKeyRegistry::register(&stale, &VKeyRegistry::empty_root(), 1, fp(2)).unwrap_err();
        assert!(matches!(err, TokenError::Registry(RegistryError::StaleRegistry { .. })));
        assert!(VKeyRegistry::lookup(&stale, &VKeyRegistry::empty_root(), OperationKey::Mint).is_err());
    }

    #[test]
    fn unknown_operation_rejected() {
        for raw in [0u64, 5, 99] {
            let err = VKeyRegistry::register(&VKeyMap::new(), &VKeyRegistry::empty_root(), raw, fp(1))
                .unwrap_err();
            assert!(matches!(err, TokenError::Registry(RegistryError::InvalidOperationKey(r)) if r == raw));
        }
    }

    #[test]
    fn absent_fingerprint_rejected() {
        let err = VKeyRegistry::register(
            &VKeyMap::new(),
            &VKeyRegistry::empty_root(),
            2,
            VkFingerprint::ABSENT,
        )
        .unwrap_err();
        assert!(matches!(err, TokenError::Registry(RegistryError::InvalidKey(OperationKey::Burn))));
    }

    proptest! {
        #[test]
        fn synced_register_changes_exactly_one_leaf(raw in 1u64..=4, byte in 1u8..=255) {
            let mut map = VKeyMap::new();
            map.set(0, [0x11; 32]).unwrap();
            map.set(3, [0x44; 32]).unwrap();
            let root = StateWord(map.root());
            let (op, next) = VKeyRegistry::register(&map, &root, raw, fp(byte)).unwrap();
            for other in OperationKey::ALL {
                let before = map.get(other.index() as u64).unwrap();
                let after = next.get(other.index() as u64).unwrap();
                if other == op {
                    prop_assert_eq!(after, Some([byte; 32]));
                } else {
                    prop_assert_eq!(after, before);
                }
            }
        }
    }
}
