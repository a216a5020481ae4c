//! # Mock Proof System
//!
//! A deterministic, transparent backend. A "proof" is
//! `SHA256("zkt:mock-proof" || circuit_id || JCS(statement))` and a key's
//! fingerprint is `SHA256("zkt:vk" || circuit_id)`.
//!
//! Verification recomputes the digest with the verifying key's circuit id,
//! so a proof only verifies for the exact statement it was produced for and
//! only under the key of the circuit that produced it.
//!
//! ## Security Warning
//!
//! **NOT PRIVATE.** Anyone can recompute a proof from its statement. This
//! backend stands in for the external proving subsystem in tests and
//! development deployments.

use serde::{Deserialize, Serialize};

use zkt_core::{sha256, CanonicalBytes, Sha256Accumulator, VkFingerprint};

use crate::traits::{ProofError, ProofSystem, VerifyError};

const PROOF_TAG: &[u8] = b"zkt:mock-proof";
const VK_TAG: &[u8] = b"zkt:vk";

/// A mock proof: hex digest of the circuit id and canonical statement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MockProof {
    /// 64-char lowercase hex digest.
    pub proof_hex: String,
}

/// Mock verifying key, identified by its circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockVerifyingKey {
    /// Circuit identifier.
    pub circuit_id: String,
}

impl MockVerifyingKey {
    /// `SHA256("zkt:vk" || circuit_id)`.
    pub fn fingerprint(&self) -> VkFingerprint {
        VkFingerprint(sha256(&[VK_TAG, self.circuit_id.as_bytes()]))
    }
}

/// Mock proving key, identified by its circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockProvingKey {
    /// Circuit identifier.
    pub circuit_id: String,
}

/// Deterministic SHA-256 proof backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockProofSystem;

impl MockProofSystem {
    /// Key pair for the circuit named `circuit_id`.
    pub fn setup(circuit_id: &str) -> (MockProvingKey, MockVerifyingKey) {
        (
            MockProvingKey {
                circuit_id: circuit_id.to_string(),
            },
            MockVerifyingKey {
                circuit_id: circuit_id.to_string(),
            },
        )
    }

    fn digest(circuit_id: &str, statement: &CanonicalBytes) -> String {
        let mut acc = Sha256Accumulator::new();
        acc.update(PROOF_TAG);
        acc.update(circuit_id.as_bytes());
        acc.update(statement.as_bytes());
        acc.finalize_hex()
    }
}

impl ProofSystem for MockProofSystem {
    type Proof = MockProof;
    type VerifyingKey = MockVerifyingKey;
    type ProvingKey = MockProvingKey;

    fn prove<S: Serialize>(
        &self,
        pk: &Self::ProvingKey,
        statement: &S,
    ) -> Result<Self::Proof, ProofError> {
        let canonical = CanonicalBytes::new(statement)
            .map_err(|e| ProofError::InvalidInputs(format!("failed to canonicalize statement: {e}")))?;
        Ok(MockProof {
            proof_hex: Self::digest(&pk.circuit_id, &canonical),
        })
    }

    fn verify<S: Serialize>(
        &self,
        vk: &Self::VerifyingKey,
        proof: &Self::Proof,
        statement: &S,
    ) -> Result<bool, VerifyError> {
        if proof.proof_hex.len() != 64 {
            return Err(VerifyError::MalformedProof(format!(
                "expected 64 hex chars, got {}",
                proof.proof_hex.len()
            )));
        }
        if !proof.proof_hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(VerifyError::MalformedProof(
                "proof_hex contains non-hex characters".to_string(),
            ));
        }
        let canonical = CanonicalBytes::new(statement)
            .map_err(|e| VerifyError::InvalidStatement(e.to_string()))?;
        Ok(proof.proof_hex == Self::digest(&vk.circuit_id, &canonical))
    }

    fn fingerprint(&self, vk: &Self::VerifyingKey) -> VkFingerprint {
        vk.fingerprint()
    }
}
