//! # Transactions
//!
//! A transaction is what a contract operation produces from a read of the
//! ledger: the state it observed (preconditions), the changes it wants
//! (effects), and the events it emits. Nothing touches the ledger until
//! [`Ledger::commit`](crate::Ledger::commit), which applies all of it or
//! none of it.
//!
//! ## Authority
//!
//! Debits and permission changes act on someone's account, so the ledger
//! checks them against that account's [`Permissions`](crate::Permissions)
//! at commit. Two kinds of authority can be attached:
//!
//! - [`HolderSignature`]: the holder's Ed25519 signature over
//!   [`Transaction::signing_payload`]. Any change to the preconditions,
//!   effects, events or proof authorizations after signing invalidates it.
//! - [`ProofAuthorization`]: the contract that owns an account's token
//!   vouching for it after admitting a proof about that account.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use zkt_core::{Address, CanonicalBytes, CanonicalizationError, StateWord};
use zkt_crypto::{Ed25519KeyPair, Ed25519Signature};

use crate::account::{AccountId, PermissionsUpdate};
use crate::event::EmittedEvent;

/// A read that must still hold at commit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precondition {
    /// A contract app-state slot holds `equals`.
    AppState {
        /// Contract address.
        contract: Address,
        /// Slot index.
        slot: usize,
        /// Observed value.
        equals: StateWord,
    },
    /// An account balance is `equals`. Missing accounts read as zero.
    Balance {
        /// Account.
        account: AccountId,
        /// Observed balance.
        equals: u64,
    },
    /// An account nonce is `equals`. Missing accounts read as zero.
    Nonce {
        /// Account.
        account: AccountId,
        /// Observed nonce.
        equals: u64,
    },
}

/// A state change applied at commit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    /// Overwrite a contract app-state slot.
    SetAppState {
        /// Contract address.
        contract: Address,
        /// Slot index.
        slot: usize,
        /// New value.
        value: StateWord,
    },
    /// Add a signed amount to a balance. Creates the account on first
    /// credit.
    BalanceChange {
        /// Account.
        account: AccountId,
        /// Signed change.
        #[serde(with = "zkt_core::signed")]
        delta: i128,
    },
    /// Increment an account nonce.
    IncrementNonce {
        /// Account.
        account: AccountId,
    },
    /// Change some of an account's permissions.
    UpdatePermissions {
        /// Account.
        account: AccountId,
        /// Fields to change.
        update: PermissionsUpdate,
    },
}

/// A holder's signature over a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderSignature {
    /// Signing holder; also the verifying key.
    pub signer: Address,
    /// Signature over the transaction's signing payload.
    pub signature: Ed25519Signature,
}

/// An owner contract's authority over one of its token accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProofAuthorization {
    /// Contract vouching for the account.
    pub contract: Address,
    /// Account it vouches for. Its token must be the one `contract` owns.
    pub account: AccountId,
}

#[derive(Serialize)]
struct SigningPayload<'a> {
    preconditions: &'a [Precondition],
    effects: &'a [Effect],
    events: &'a [EmittedEvent],
    proof_authorizations: &'a [ProofAuthorization],
}

/// Preconditions, effects and events of one operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Checked in order before any effect is applied.
    pub preconditions: Vec<Precondition>,
    /// Applied in order.
    pub effects: Vec<Effect>,
    /// Appended to the ledger log in order.
    pub events: Vec<EmittedEvent>,
    /// Accounts whose owner contract admitted a proof for this transaction.
    #[serde(default)]
    pub proof_authorizations: Vec<ProofAuthorization>,
    /// Holder signatures. Not part of the signing payload.
    #[serde(default)]
    pub signatures: Vec<HolderSignature>,
}

impl Transaction {
    /// An empty transaction.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an observed app-state slot.
    pub fn require_app_state(&mut self, contract: Address, slot: usize, equals: StateWord) {
        self.push_precondition(Precondition::AppState { contract, slot, equals });
    }

    /// Record an observed balance.
    pub fn require_balance(&mut self, account: AccountId, equals: u64) {
        self.push_precondition(Precondition::Balance { account, equals });
    }

    /// Record an observed nonce.
    pub fn require_nonce(&mut self, account: AccountId, equals: u64) {
        self.push_precondition(Precondition::Nonce { account, equals });
    }

    fn push_precondition(&mut self, precondition: Precondition) {
        if !self.preconditions.contains(&precondition) {
            self.preconditions.push(precondition);
        }
    }

    /// Overwrite an app-state slot.
    pub fn set_app_state(&mut self, contract: Address, slot: usize, value: StateWord) {
        self.effects.push(Effect::SetAppState { contract, slot, value });
    }

    /// Change a balance by a signed amount.
    pub fn change_balance(&mut self, account: AccountId, delta: i128) {
        self.effects.push(Effect::BalanceChange { account, delta });
    }

    /// Increment a nonce.
    pub fn increment_nonce(&mut self, account: AccountId) {
        self.effects.push(Effect::IncrementNonce { account });
    }

    /// Change some of an account's permissions.
    pub fn update_permissions(&mut self, account: AccountId, update: PermissionsUpdate) {
        self.effects.push(Effect::UpdatePermissions { account, update });
    }

    /// Record `contract`'s proof authority over `account`.
    pub fn authorize_proof(&mut self, contract: Address, account: AccountId) {
        let authorization = ProofAuthorization { contract, account };
        if !self.proof_authorizations.contains(&authorization) {
            self.proof_authorizations.push(authorization);
        }
    }

    /// The canonical bytes holders sign.
    pub fn signing_payload(&self) -> Result<CanonicalBytes, CanonicalizationError> {
        CanonicalBytes::new(&SigningPayload {
            preconditions: &self.preconditions,
            effects: &self.effects,
            events: &self.events,
            proof_authorizations: &self.proof_authorizations,
        })
    }

    /// Add `key`'s signature, replacing any earlier one by the same holder.
    pub fn sign(&mut self, key: &Ed25519KeyPair) -> Result<(), CanonicalizationError> {
        let payload = self.signing_payload()?;
        let signer = key.address();
        self.signatures.retain(|s| s.signer != signer);
        self.signatures.push(HolderSignature {
            signer,
            signature: key.sign(&payload),
        });
        Ok(())
    }

    /// Holders whose authority the effects invoke: every debited account
    /// and every account whose permissions change.
    pub fn authorizers(&self) -> BTreeSet<Address> {
        self.effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::BalanceChange { account, delta } if *delta < 0 => Some(account.address),
                Effect::UpdatePermissions { account, .. } => Some(account.address),
                _ => None,
            })
            .collect()
    }

    /// Queue an event.
    pub fn emit(&mut self, event: EmittedEvent) {
        self.events.push(event);
    }

    /// Whether the transaction would change nothing.
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty() && self.events.is_empty()
    }
}
