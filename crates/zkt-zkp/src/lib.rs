//! # zkt-zkp: Proof System Abstraction
//!
//! Proof generation and the underlying field arithmetic belong to an
//! external proving subsystem. This crate fixes the interface the token
//! overlay verifies through.
//!
//! - **Traits** (`traits.rs`): the sealed `ProofSystem` trait.
//! - **Mock** (`mock.rs`): deterministic SHA-256 backend used by tests and
//!   development deployments. Transparent, no privacy.
//! - **Side-load** (`sideload.rs`): the public input/output a token-operation
//!   proof commits to, and the `SideloadedProof` artifact.
//!
//! ## Crate Policy
//!
//! - Depends only on `zkt-core` internally.
//! - No `unsafe`.

pub mod mock;
pub mod sideload;
pub mod traits;

pub use mock::{MockProof, MockProofSystem, MockProvingKey, MockVerifyingKey};
pub use sideload::{
    AccountSnapshot, BackendProvingKey, BackendVerifyingKey, ProofPublicInput, ProofPublicOutput,
    SideloadedProof,
};
pub use traits::{ProofError, ProofSystem, VerifyError};
