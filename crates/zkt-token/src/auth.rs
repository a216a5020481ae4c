//! # Administrator Authorization
//!
//! Two gates live here.
//!
//! - [`PermissionGate`] decides whether a mint or burn magnitude is allowed
//!   by the amount policy and whether the administrator must co-sign.
//! - [`AdminAuthorizer`] checks an administrator co-signature.
//!
//! ## Signed Message
//!
//! The administrator signs the canonical bytes of
//! `{ contract, token_id, admin_nonce, action }`. `admin_nonce` is the
//! administrator's settlement-account nonce. It is read as a precondition
//! and incremented by the transaction, so a signature is good for exactly
//! one committed action on exactly one contract.

use serde::{Deserialize, Serialize};

use zkt_core::{
    Address, AmountOperation, AuthorizationError, CanonicalBytes, OperationKey, TokenId,
    VkFingerprint,
};
use zkt_crypto::{verify_with_address, Ed25519KeyPair, Ed25519Signature};
use zkt_ledger::AccountId;
use zkt_policy::{AmountPolicy, AmountRange, ProofRequirement, RangeField};

use crate::error::TokenError;
use crate::params::InitParams;
use crate::state::ContractView;

/// Every action an administrator can authorize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum AdminAction {
    /// One-time initialization.
    Initialize {
        /// Initialization arguments.
        params: InitParams,
    },
    /// Policy-authorized mint.
    Mint {
        /// Credited account.
        recipient: Address,
        /// Amount.
        amount: u64,
    },
    /// Policy-authorized burn.
    Burn {
        /// Debited account.
        holder: Address,
        /// Amount.
        amount: u64,
    },
    /// Replace an amount policy.
    UpdatePolicy {
        /// Affected operation.
        operation: AmountOperation,
        /// New policy.
        policy: AmountPolicy,
    },
    /// Replace an amount range.
    UpdateRange {
        /// Affected operation.
        operation: AmountOperation,
        /// New range.
        range: AmountRange,
    },
    /// Change one field of an amount range.
    UpdateRangeField {
        /// Affected operation.
        operation: AmountOperation,
        /// Field to change.
        field: RangeField,
        /// New value.
        value: u64,
    },
    /// Replace a proof requirement.
    UpdateProofRequirement {
        /// Affected operation.
        operation: OperationKey,
        /// New requirement.
        requirement: ProofRequirement,
    },
    /// Register a verification key.
    RegisterVerificationKey {
        /// Raw operation id.
        operation_key: u64,
        /// New fingerprint.
        fingerprint: VkFingerprint,
    },
    /// Hand over administration.
    SetAdmin {
        /// Incoming administrator.
        new_admin: Address,
    },
    /// Suspend supply-changing operations.
    Pause,
    /// Resume supply-changing operations.
    Resume,
}

#[derive(Serialize)]
struct AdminMessage<'a> {
    contract: Address,
    token_id: TokenId,
    admin_nonce: u64,
    action: &'a AdminAction,
}

/// The exact bytes an administrator signs for `action`.
pub fn admin_message(
    contract: Address,
    token_id: TokenId,
    admin_nonce: u64,
    action: &AdminAction,
) -> Result<CanonicalBytes, TokenError> {
    Ok(CanonicalBytes::new(&AdminMessage {
        contract,
        token_id,
        admin_nonce,
        action,
    })?)
}

/// Sign `action` for the contract at `contract`.
///
/// `admin_nonce` must be the signer's current settlement-account nonce.
pub fn sign_admin_action(
    key: &Ed25519KeyPair,
    contract: Address,
    admin_nonce: u64,
    action: &AdminAction,
) -> Result<Ed25519Signature, TokenError> {
    let message = admin_message(contract, TokenId::derive(&contract), admin_nonce, action)?;
    Ok(key.sign(&message))
}

/// Administrator co-signature check.
pub(crate) struct AdminAuthorizer;

impl AdminAuthorizer {
    /// Verify `signature` by `signer` over `action`, then queue the
    /// signer's nonce increment.
    pub(crate) fn verify_signer(
        view: &mut ContractView<'_>,
        signer: Address,
        action: &AdminAction,
        signature: Option<&Ed25519Signature>,
    ) -> Result<(), TokenError> {
        let signature = signature.ok_or(AuthorizationError::MissingAuthorization)?;
        let nonce_account = AccountId::settlement(signer);
        let admin_nonce = view.nonce(nonce_account);
        let message = admin_message(view.contract(), view.token_id(), admin_nonce, action)?;
        verify_with_address(&message, signature, &signer)
            .map_err(|e| AuthorizationError::InvalidSignature(e.to_string()))?;
        view.tx().increment_nonce(nonce_account);
        Ok(())
    }

    /// Verify against the administrator stored on-chain.
    pub(crate) fn verify(
        view: &mut ContractView<'_>,
        action: &AdminAction,
        signature: Option<&Ed25519Signature>,
    ) -> Result<(), TokenError> {
        let admin = view.admin()?;
        Self::verify_signer(view, admin, action, signature)
    }
}

/// Outcome of a permitted amount check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountDecision {
    /// Allowed with no co-signature.
    Permitted,
    /// Allowed once the administrator co-signs.
    RequiresAdmin,
}

/// Amount-policy gate for mint and burn.
#[derive(Debug, Clone, Copy)]
pub struct PermissionGate;

impl PermissionGate {
    /// Judge `magnitude` against `policy` and `range`.
    ///
    /// A fixed policy accepts exactly `range.fixed_amount`; a ranged policy
    /// accepts `[min_amount, max_amount]` inclusive. A policy without the
    /// `unauthorized` flag also needs the administrator.
    pub fn authorize(
        policy: &AmountPolicy,
        range: &AmountRange,
        operation: AmountOperation,
        magnitude: u64,
    ) -> Result<AmountDecision, AuthorizationError> {
        let allowed = if policy.fixed_amount {
            range.is_fixed(magnitude)
        } else {
            range.is_in_range(magnitude)
        };
        if !allowed {
            return Err(AuthorizationError::NotPermitted {
                operation: operation.operation_key(),
                amount: magnitude,
            });
        }
        Ok(if policy.unauthorized {
            AmountDecision::Permitted
        } else {
            AmountDecision::RequiresAdmin
        })
    }
}
