//! # Proof Admission
//!
//! Decides whether a side-loaded proof lets an operation proceed.
//!
//! With `should_verify` off the proof is not looked at. With it on, in
//! order:
//!
//! 1. The registered fingerprint for the operation is looked up through the
//!    caller's registry map; none registered is `MissingKey`, a supplied
//!    key with a different fingerprint is `InvalidKey`.
//! 2. Recipient, token id, and the four balance/nonce fields are compared
//!    with the operation and with live state, each only when its flag is
//!    set. Live values are recorded as preconditions.
//! 3. The proof must verify under the supplied key, whatever the other
//!    flags say.

use serde::{Deserialize, Serialize};

use zkt_core::{Address, OperationKey, ProofConsistencyError, RegistryError, TokenId};
use zkt_ledger::AccountId;
use zkt_policy::ProofRequirement;
use zkt_zkp::{BackendVerifyingKey, SideloadedProof};

use crate::error::TokenError;
use crate::registry::{VKeyMap, VKeyRegistry};
use crate::state::{ContractView, Slot};
use crate::telemetry;

/// What a caller supplies with a proof-carrying operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofAttachment {
    /// The proof.
    pub proof: SideloadedProof,
    /// Key the proof was produced for.
    pub verification_key: BackendVerifyingKey,
    /// Caller's copy of the registry map.
    pub registry: VKeyMap,
}

/// Result of a successful admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Verification is off for the operation.
    Skipped,
    /// Every enabled check passed.
    Verified,
}

/// Live account values a proof snapshot is compared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LiveSnapshot {
    /// Settlement-currency balance.
    pub mina_balance: u64,
    /// Custom-token balance.
    pub custom_balance: u64,
    /// Settlement-currency nonce.
    pub mina_nonce: u64,
    /// Custom-token nonce.
    pub custom_nonce: u64,
}

/// Proof admission.
#[derive(Debug, Clone, Copy)]
pub struct ProofGate;

impl ProofGate {
    /// Check `proof` against the operation's subject and live state.
    ///
    /// `registered` is the fingerprint found in the registry, `None` if
    /// nothing is registered. Pure: every live value is passed in.
    #[allow(clippy::too_many_arguments)]
    pub fn check(
        operation: OperationKey,
        requirement: &ProofRequirement,
        proof: &SideloadedProof,
        verification_key: &BackendVerifyingKey,
        registered: Option<zkt_core::VkFingerprint>,
        subject: Address,
        token_id: TokenId,
        live: &LiveSnapshot,
    ) -> Result<Admission, TokenError> {
        if !requirement.should_verify {
            return Ok(Admission::Skipped);
        }
        let registered = registered.ok_or(RegistryError::MissingKey(operation))?;
        if verification_key.fingerprint() != registered {
            return Err(RegistryError::InvalidKey(operation).into());
        }

        let input = &proof.public_input;
        let output = &proof.public_output;
        if requirement.require_recipient_match && input.operation_address != subject {
            return Err(ProofConsistencyError::RecipientMismatch.into());
        }
        if requirement.require_token_id_match && output.token_account.token_id != token_id {
            return Err(ProofConsistencyError::TokenIdMismatch.into());
        }
        if requirement.require_mina_balance_match && output.mina_balance != live.mina_balance {
            return Err(ProofConsistencyError::MinaBalanceMismatch.into());
        }
        if requirement.require_custom_balance_match && output.token_balance != live.custom_balance {
            return Err(ProofConsistencyError::CustomBalanceMismatch.into());
        }
        if requirement.require_mina_nonce_match && output.mina_nonce != live.mina_nonce {
            return Err(ProofConsistencyError::MinaNonceMismatch.into());
        }
        if requirement.require_custom_nonce_match && output.token_nonce != live.custom_nonce {
            return Err(ProofConsistencyError::CustomNonceMismatch.into());
        }

        match proof.verify(verification_key) {
            Ok(true) => Ok(Admission::Verified),
            Ok(false) => Err(ProofConsistencyError::InvalidProof(
                "proof does not verify under the supplied key".to_string(),
            )
            .into()),
            Err(e) => Err(ProofConsistencyError::InvalidProof(e.to_string()).into()),
        }
    }

    /// Run admission inside an operation, reading the registry root and
    /// the live values the requirement needs through `view`.
    pub(crate) fn admit(
        view: &mut ContractView<'_>,
        operation: OperationKey,
        requirement: &ProofRequirement,
        attachment: &ProofAttachment,
        subject: Address,
    ) -> Result<Admission, TokenError> {
        let result = Self::admit_inner(view, operation, requirement, attachment, subject);
        match &result {
            Ok(admission) => tracing::debug!(
                operation = %operation,
                subject = %subject,
                admission = ?admission,
                "proof admitted"
            ),
            Err(e) => tracing::warn!(
                operation = %operation,
                subject = %subject,
                error = %e,
                "proof rejected"
            ),
        }
        telemetry::record_admission(operation.as_str(), &result);
        result
    }

    fn admit_inner(
        view: &mut ContractView<'_>,
        operation: OperationKey,
        requirement: &ProofRequirement,
        attachment: &ProofAttachment,
        subject: Address,
    ) -> Result<Admission, TokenError> {
        if !requirement.should_verify {
            return Ok(Admission::Skipped);
        }
        let root = view.read(Slot::VkeyRoot)?;
        let registered = VKeyRegistry::lookup(&attachment.registry, &root, operation)?;

        let mina = AccountId::settlement(subject);
        let custom = view.token_account(subject);
        let mut live = LiveSnapshot::default();
        if requirement.require_mina_balance_match {
            live.mina_balance = view.balance(mina);
        }
        if requirement.require_custom_balance_match {
            live.custom_balance = view.balance(custom);
        }
        if requirement.require_mina_nonce_match {
            live.mina_nonce = view.nonce(mina);
        }
        if requirement.require_custom_nonce_match {
            live.custom_nonce = view.nonce(custom);
        }

        Self::check(
            operation,
            requirement,
            &attachment.proof,
            &attachment.verification_key,
            registered,
            subject,
            view.token_id(),
            &live,
        )
    }
}
