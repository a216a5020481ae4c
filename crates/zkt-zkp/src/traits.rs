//! # Proof System Trait (Sealed)
//!
//! The contract never generates proofs. It receives a proof together with
//! the verification key the prover used, checks that key's fingerprint
//! against the registry, and asks the backend whether the proof holds for
//! the claimed statement.
//!
//! ## Sealed Trait
//!
//! `ProofSystem` can only be implemented inside `zkt-zkp`. A backend whose
//! `verify` always answers `true` cannot be injected from outside.

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use zkt_core::VkFingerprint;

/// Error during proof generation.
#[derive(Error, Debug)]
pub enum ProofError {
    /// The statement could not be encoded.
    #[error("invalid statement: {0}")]
    InvalidInputs(String),
    /// Proof generation failed internally.
    #[error("proof generation failed: {0}")]
    GenerationFailed(String),
}

/// Error during proof verification.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The proof is structurally malformed.
    #[error("malformed proof: {0}")]
    MalformedProof(String),
    /// The statement could not be encoded.
    #[error("invalid statement: {0}")]
    InvalidStatement(String),
}

mod private {
    pub trait Sealed {}
}

/// Interface of a proof backend.
///
/// `verify` returns `Ok(false)` for a well-formed proof that does not hold
/// and `Err` only when the proof or statement cannot even be checked.
pub trait ProofSystem: private::Sealed + Send + Sync {
    /// The proof artifact.
    type Proof: Serialize + DeserializeOwned + Clone + std::fmt::Debug;
    /// The key a verifier checks proofs with. Its fingerprint is what the
    /// registry stores.
    type VerifyingKey: Clone + std::fmt::Debug;
    /// The key a prover generates proofs with.
    type ProvingKey;

    /// Prove `statement`.
    fn prove<S: Serialize>(
        &self,
        pk: &Self::ProvingKey,
        statement: &S,
    ) -> Result<Self::Proof, ProofError>;

    /// Check `proof` against `statement` under `vk`.
    fn verify<S: Serialize>(
        &self,
        vk: &Self::VerifyingKey,
        proof: &Self::Proof,
        statement: &S,
    ) -> Result<bool, VerifyError>;

    /// Commitment identifying `vk`.
    fn fingerprint(&self, vk: &Self::VerifyingKey) -> VkFingerprint;
}

impl private::Sealed for crate::mock::MockProofSystem {}
