//! # zkt-crypto: Cryptographic Primitives
//!
//! - **Ed25519** administrator co-signatures over `CanonicalBytes`. An
//!   administrator's [`Address`](zkt_core::Address) is its public key, so
//!   verification needs nothing beyond the on-chain admin slot.
//! - **Authenticated map**: a fixed-depth Merkle tree keyed by leaf index,
//!   with domain-separated SHA-256. Only its root is stored on-chain; the
//!   map itself is held by callers and proven against that root.
//!
//! ## Crate Policy
//!
//! - Depends only on `zkt-core` internally.
//! - No mocking of cryptographic operations in tests.

pub mod ed25519;
pub mod merkle;

pub use ed25519::{verify_with_address, Ed25519KeyPair, Ed25519Signature};
pub use merkle::{AuthenticatedMap, MapWitness};
