//! # Side-Loaded Proofs
//!
//! The statement a token-operation proof commits to, and the proof artifact
//! callers attach to an operation.
//!
//! The statement captures a snapshot of the subject's accounts at proving
//! time. The contract compares that snapshot with live state when the
//! proof is admitted; the proof itself only says the snapshot was taken
//! honestly by the registered circuit.

use serde::{Deserialize, Serialize};

use zkt_core::{Address, TokenId};

use crate::mock::{MockProofSystem, MockProvingKey, MockVerifyingKey};
use crate::traits::{ProofError, ProofSystem, VerifyError};

/// Backend the token overlay verifies side-loaded proofs with.
pub type ProofBackend = MockProofSystem;

/// Proof artifact produced by [`ProofBackend`].
pub type BackendProof = <ProofBackend as ProofSystem>::Proof;

/// Verifying key of [`ProofBackend`].
pub type BackendVerifyingKey = MockVerifyingKey;

/// Proving key of [`ProofBackend`].
pub type BackendProvingKey = MockProvingKey;

/// Public input: who the proof is about, and for which token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofPublicInput {
    /// Subject of the operation.
    pub operation_address: Address,
    /// Token the prover targeted.
    pub token_id: TokenId,
}

/// One account as observed by the prover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    /// Account address.
    pub address: Address,
    /// Account token.
    pub token_id: TokenId,
    /// Balance at proving time.
    pub balance: u64,
    /// Nonce at proving time.
    pub nonce: u64,
}

/// Public output: the captured snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofPublicOutput {
    /// The subject's settlement-currency account.
    pub external_account: AccountSnapshot,
    /// The subject's custom-token account.
    pub token_account: AccountSnapshot,
    /// Settlement-currency balance.
    pub mina_balance: u64,
    /// Custom-token balance.
    pub token_balance: u64,
    /// Settlement-currency nonce.
    pub mina_nonce: u64,
    /// Custom-token nonce.
    pub token_nonce: u64,
}

impl ProofPublicOutput {
    /// Build an output whose summary fields agree with the two snapshots.
    pub fn from_accounts(external_account: AccountSnapshot, token_account: AccountSnapshot) -> Self {
        Self {
            external_account,
            token_account,
            mina_balance: external_account.balance,
            token_balance: token_account.balance,
            mina_nonce: external_account.nonce,
            token_nonce: token_account.nonce,
        }
    }
}

#[derive(Serialize)]
struct Statement<'a> {
    public_input: &'a ProofPublicInput,
    public_output: &'a ProofPublicOutput,
}

/// A proof bound to its public input and output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideloadedProof {
    /// Public input.
    pub public_input: ProofPublicInput,
    /// Public output.
    pub public_output: ProofPublicOutput,
    /// Backend proof over both.
    pub proof: BackendProof,
}

impl SideloadedProof {
    /// Prove a statement with `pk`.
    pub fn prove(
        pk: &BackendProvingKey,
        public_input: ProofPublicInput,
        public_output: ProofPublicOutput,
    ) -> Result<Self, ProofError> {
        let proof = ProofBackend::default().prove(
            pk,
            &Statement {
                public_input: &public_input,
                public_output: &public_output,
            },
        )?;
        Ok(Self {
            public_input,
            public_output,
            proof,
        })
    }

    /// Whether the proof holds for its own public input and output under
    /// `vk`.
    pub fn verify(&self, vk: &BackendVerifyingKey) -> Result<bool, VerifyError> {
        ProofBackend::default().verify(
            vk,
            &self.proof,
            &Statement {
                public_input: &self.public_input,
                public_output: &self.public_output,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(address: Address, token_id: TokenId, balance: u64, nonce: u64) -> AccountSnapshot {
        AccountSnapshot { address, token_id, balance, nonce }
    }

    fn sample(pk: &BackendProvingKey) -> SideloadedProof {
        let user = Address([4; 32]);
        let token = TokenId([9; 32]);
        SideloadedProof::prove(
            pk,
            ProofPublicInput { operation_address: user, token_id: token },
            ProofPublicOutput::from_accounts(
                snapshot(user, TokenId::SETTLEMENT, 1_000, 3),
                snapshot(user, token, 50, 1),
            ),
        )
        .unwrap()
    }

    #[test]
    fn honest_proof_verifies() {
        let (pk, vk) = MockProofSystem::setup("transfer");
        assert!(sample(&pk).verify(&vk).unwrap());
    }

    #[test]
    fn tampered_output_fails() {
        let (pk, vk) = MockProofSystem::setup("transfer");
        let mut proof = sample(&pk);
        proof.public_output.token_balance += 1;
        assert!(!proof.verify(&vk).unwrap());
    }

    #[test]
    fn tampered_input_fails() {
        let (pk, vk) = MockProofSystem::setup("transfer");
        let mut proof = sample(&pk);
        proof.public_input.operation_address = Address([5; 32]);
        assert!(!proof.verify(&vk).unwrap());
    }

    #[test]
    fn summary_fields_follow_accounts() {
        let (pk, _) = MockProofSystem::setup("mint");
        let p = sample(&pk);
        assert_eq!(p.public_output.mina_balance, 1_000);
        assert_eq!(p.public_output.mina_nonce, 3);
        assert_eq!(p.public_output.token_balance, 50);
        assert_eq!(p.public_output.token_nonce, 1);
    }

    #[test]
    fn serde_roundtrip_keeps_proof_valid() {
        let (pk, vk) = MockProofSystem::setup("burn");
        let proof = sample(&pk);
        let json = serde_json::to_string(&proof).unwrap();
        let back: SideloadedProof = serde_json::from_str(&json).unwrap();
        assert!(back.verify(&vk).unwrap());
    }
}
