//! # zkt-core: Foundational Types for the Token Overlay
//!
//! This crate is the leaf of the `zkt` workspace DAG. It defines the
//! primitives every other crate agrees on: identifiers, on-chain state
//! words, operation keys, canonical bytes, digests, and the error taxonomy.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `Address`, `TokenId` and
//!    `VkFingerprint` are distinct 32-byte types. A fingerprint can never be
//!    passed where an address is expected.
//!
//! 2. **`StateWord` is the only on-chain value.** Contract app state is eight
//!    256-bit words. Bit and lane addressing is defined once, here, so the
//!    packed configuration layout is identical for every caller.
//!
//! 3. **`CanonicalBytes` for everything signed or hashed.** Administrator
//!    authorizations and proof statements are serialized through the JCS
//!    pipeline before they reach a signature or a digest.
//!
//! 4. **One error taxonomy.** Validation, authorization, registry, proof
//!    consistency and invariant failures are separate enums so callers can
//!    match on the category without parsing messages.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `zkt-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod hex;
pub mod identity;
pub mod operation;
pub mod signed;
pub mod word;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{sha256, Sha256Accumulator};
pub use error::{
    AuthorizationError, CanonicalizationError, CryptoError, InvariantError,
    ProofConsistencyError, RegistryError, ValidationError,
};
pub use identity::{Address, TokenId, VkFingerprint};
pub use operation::{AmountOperation, OperationKey};
pub use word::StateWord;
