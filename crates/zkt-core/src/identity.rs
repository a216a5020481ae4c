//! # Identifier Newtypes
//!
//! Addresses, token identifiers and verification-key fingerprints are all
//! 32-byte values. Each gets its own type so that a fingerprint cannot be
//! substituted for an address (or a token id for either) anywhere in the
//! gating pipeline.
//!
//! All three serialize as 64-char lowercase hex strings.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::digest::sha256;
use crate::error::CryptoError;
use crate::hex;

macro_rules! hex_newtype {
    ($name:ident) => {
        impl $name {
            /// Wrap raw bytes.
            pub const fn from_bytes(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            /// Return the raw bytes.
            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            /// Render as lowercase hex.
            pub fn to_hex(&self) -> String {
                hex::encode(&self.0)
            }

            /// Parse from a 64-char hex string.
            pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
                hex::decode_32(s).map(Self)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_hex(&s).map_err(serde::de::Error::custom)
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!(stringify!($name), "({}...)"), hex::prefix(&self.0))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.to_hex())
            }
        }
    };
}

/// A ledger account address.
///
/// Administrator addresses are Ed25519 public key bytes, so a co-signature
/// can be checked against the address stored on-chain without a separate
/// key registry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// The circulation pseudo-account. Its custom-token balance mirrors
    /// total supply; it is never a legitimate source or destination.
    pub const CIRCULATION: Address = Address([0u8; 32]);

    /// Whether this is the reserved circulation pseudo-account.
    pub fn is_circulation(&self) -> bool {
        *self == Self::CIRCULATION
    }
}

hex_newtype!(Address);

/// A token identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId(pub [u8; 32]);

impl TokenId {
    /// The settlement currency (fees, "mina" balances and nonces).
    pub const SETTLEMENT: TokenId = {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        TokenId(bytes)
    };

    /// Derive the custom token id owned by the contract at `owner`.
    ///
    /// `SHA256("zkt:token-id" || owner || SETTLEMENT)`.
    pub fn derive(owner: &Address) -> Self {
        Self(sha256(&[
            b"zkt:token-id",
            owner.as_bytes(),
            Self::SETTLEMENT.as_bytes(),
        ]))
    }
}

hex_newtype!(TokenId);

/// Short commitment uniquely identifying a verification key.
///
/// The all-zero value is reserved as the registry's "absent" leaf value.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct VkFingerprint(pub [u8; 32]);

impl VkFingerprint {
    /// The empty-leaf sentinel.
    pub const ABSENT: VkFingerprint = VkFingerprint([0u8; 32]);

    /// Whether this is the empty-leaf sentinel.
    pub fn is_absent(&self) -> bool {
        *self == Self::ABSENT
    }
}

hex_newtype!(VkFingerprint);
