//! # Token Contract
//!
//! The operation surface. Every operation reads a `&Ledger` through a
//! [`ContractView`], runs its gates, and returns the [`Transaction`] that
//! would apply it. Nothing is applied until the caller passes that
//! transaction to `Ledger::commit`; if any state the operation read has
//! changed by then, the commit fails as a whole.
//!
//! ## Pipelines
//!
//! - mint/burn: amount policy and range → [`PermissionGate`] → optional
//!   administrator co-signature → proof requirement → [`ProofGate`] →
//!   balance and circulation change → event.
//! - transfer/bulk update: proof requirement → [`ProofGate`] → balance
//!   changes → events.
//!
//! The circulation account is never a source or destination. While the
//! contract is paused, all four fail with `Paused`.
//!
//! ## Holder authority
//!
//! Every debit of a holder's token account requires that account's nonce
//! unchanged and bumps it. The ledger then demands the authority the
//! account's `send` permission names: by default the holder's signature
//! over the transaction. A proof admitted about the operation's subject
//! makes the contract vouch for the subject's account, which satisfies a
//! `send` permission of `Proof`. The circulation account is set to `Proof`
//! at initialization and only this contract vouches for it.
//!
//! The `_unproven` variants carry no proof and fail with
//! `NoPermissionForSideloadDisabledOperation` when the operation requires
//! one.

use zkt_core::{
    Address, AmountOperation, AuthorizationError, InvariantError, OperationKey, StateWord,
    TokenId, ValidationError, VkFingerprint,
};
use zkt_crypto::Ed25519Signature;
use zkt_ledger::{AuthRequired, Ledger, PermissionsUpdate, Transaction};
use zkt_policy::{
    AmountPolicy, AmountRange, ConfigSnapshot, ConfigStore, ProofRequirement, RangeField,
};

use crate::auth::{AdminAction, AdminAuthorizer, AmountDecision, PermissionGate};
use crate::bulk::AccountUpdateForest;
use crate::error::TokenError;
use crate::events::TokenEvent;
use crate::params::InitParams;
use crate::proof_gate::{Admission, ProofAttachment, ProofGate};
use crate::registry::{VKeyMap, VKeyRegistry};
use crate::state::{ContractFlags, ContractView, Slot};
use crate::telemetry;

/// A token contract deployed at one address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenContract {
    address: Address,
    token_id: TokenId,
}

impl TokenContract {
    /// The contract at `address`. Its token id is derived from the address.
    pub fn new(address: Address) -> Self {
        Self {
            address,
            token_id: TokenId::derive(&address),
        }
    }

    /// Contract address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The custom token this contract owns.
    pub fn token_id(&self) -> TokenId {
        self.token_id
    }

    fn view<'a>(&self, ledger: &'a Ledger) -> ContractView<'a> {
        ContractView::new(ledger, self.address, self.token_id)
    }

    fn finish<T>(&self, operation: &'static str, result: Result<T, TokenError>) -> Result<T, TokenError> {
        match &result {
            Ok(_) => tracing::debug!(contract = %self.address, operation, "operation prepared"),
            Err(e) => tracing::warn!(
                contract = %self.address,
                operation,
                error = %e,
                "operation rejected"
            ),
        }
        telemetry::record_operation(operation, &result);
        result
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// One-time setup, signed by the administrator being installed.
    pub fn initialize(
        &self,
        ledger: &Ledger,
        params: &InitParams,
        signature: Option<&Ed25519Signature>,
    ) -> Result<Transaction, TokenError> {
        let result = self.initialize_inner(ledger, params, signature);
        self.finish("initialize", result)
    }

    fn initialize_inner(
        &self,
        ledger: &Ledger,
        params: &InitParams,
        signature: Option<&Ed25519Signature>,
    ) -> Result<Transaction, TokenError> {
        let mut view = self.view(ledger);
        if view.flags()?.initialized {
            return Err(InvariantError::AlreadyInitialized.into());
        }
        params.validate()?;
        let [policies, mint_range, burn_range, requirements] = params.config().to_words()?;
        AdminAuthorizer::verify_signer(
            &mut view,
            params.admin,
            &AdminAction::Initialize { params: *params },
            signature,
        )?;

        view.write(Slot::Admin, params.admin.into());
        view.write(Slot::Decimals, StateWord::from_u64(u64::from(params.decimals)));
        view.write(Slot::Policies, policies);
        view.write(Slot::MintRange, mint_range);
        view.write(Slot::BurnRange, burn_range);
        view.write(Slot::Requirements, requirements);
        view.write(Slot::VkeyRoot, VKeyRegistry::empty_root());
        let circulation = view.token_account(Address::CIRCULATION);
        view.tx().update_permissions(
            circulation,
            PermissionsUpdate {
                send: Some(AuthRequired::Proof),
                ..Default::default()
            },
        );
        view.authorize_proof(Address::CIRCULATION);
        view.write(
            Slot::Flags,
            ContractFlags {
                initialized: true,
                paused: false,
            }
            .to_word(),
        );
        view.emit(TokenEvent::Initialized {
            admin: params.admin,
            decimals: params.decimals,
        })?;
        tracing::info!(contract = %self.address, admin = %params.admin, "initialization prepared");
        Ok(view.finish())
    }

    // ── Supply ──────────────────────────────────────────────────────

    /// Mint `amount` to `recipient` with a proof.
    pub fn mint(
        &self,
        ledger: &Ledger,
        recipient: Address,
        amount: u64,
        attachment: &ProofAttachment,
        signature: Option<&Ed25519Signature>,
    ) -> Result<Transaction, TokenError> {
        let result = self.supply_change(ledger, AmountOperation::Mint, recipient, amount, Some(attachment), signature);
        self.finish("mint", result)
    }

    /// Mint without a proof.
    pub fn mint_unproven(
        &self,
        ledger: &Ledger,
        recipient: Address,
        amount: u64,
        signature: Option<&Ed25519Signature>,
    ) -> Result<Transaction, TokenError> {
        let result = self.supply_change(ledger, AmountOperation::Mint, recipient, amount, None, signature);
        self.finish("mint", result)
    }

    /// Burn `amount` from `holder` with a proof.
    pub fn burn(
        &self,
        ledger: &Ledger,
        holder: Address,
        amount: u64,
        attachment: &ProofAttachment,
        signature: Option<&Ed25519Signature>,
    ) -> Result<Transaction, TokenError> {
        let result = self.supply_change(ledger, AmountOperation::Burn, holder, amount, Some(attachment), signature);
        self.finish("burn", result)
    }

    /// Burn without a proof.
    pub fn burn_unproven(
        &self,
        ledger: &Ledger,
        holder: Address,
        amount: u64,
        signature: Option<&Ed25519Signature>,
    ) -> Result<Transaction, TokenError> {
        let result = self.supply_change(ledger, AmountOperation::Burn, holder, amount, None, signature);
        self.finish("burn", result)
    }

    fn supply_change(
        &self,
        ledger: &Ledger,
        op: AmountOperation,
        subject: Address,
        amount: u64,
        proof: Option<&ProofAttachment>,
        signature: Option<&Ed25519Signature>,
    ) -> Result<Transaction, TokenError> {
        let mut view = self.view(ledger);
        view.require_active()?;
        if subject.is_circulation() {
            return Err(InvariantError::CirculationMovement.into());
        }

        let policy = ConfigStore::policy(&view.read(Slot::Policies)?, op);
        let range = AmountRange::from_word(&view.read(Slot::range(op))?);
        tracing::debug!(operation = %op, ?policy, ?range, amount, "amount configuration decoded");
        if PermissionGate::authorize(&policy, &range, op, amount)? == AmountDecision::RequiresAdmin {
            let action = match op {
                AmountOperation::Mint => AdminAction::Mint { recipient: subject, amount },
                AmountOperation::Burn => AdminAction::Burn { holder: subject, amount },
            };
            AdminAuthorizer::verify(&mut view, &action, signature)?;
        }

        let key = op.operation_key();
        self.gate_proof(&mut view, key, proof, subject)?;

        let holder = view.token_account(subject);
        let circulation = view.token_account(Address::CIRCULATION);
        match op {
            AmountOperation::Mint => {
                view.tx().change_balance(holder, i128::from(amount));
                view.tx().change_balance(circulation, i128::from(amount));
            }
            AmountOperation::Burn => {
                view.debit(subject, -i128::from(amount));
                view.authorize_proof(Address::CIRCULATION);
                view.tx().change_balance(circulation, -i128::from(amount));
            }
        }
        view.emit(match op {
            AmountOperation::Mint => TokenEvent::Mint { recipient: subject, amount },
            AmountOperation::Burn => TokenEvent::Burn { holder: subject, amount },
        })?;
        Ok(view.finish())
    }

    fn gate_proof(
        &self,
        view: &mut ContractView<'_>,
        key: OperationKey,
        proof: Option<&ProofAttachment>,
        subject: Address,
    ) -> Result<(), TokenError> {
        let requirement = ConfigStore::requirement(&view.read(Slot::Requirements)?, key);
        match proof {
            Some(attachment) => {
                if ProofGate::admit(view, key, &requirement, attachment, subject)? == Admission::Verified {
                    view.authorize_proof(subject);
                }
            }
            None if requirement.should_verify => {
                return Err(AuthorizationError::NoPermissionForSideloadDisabledOperation(key).into());
            }
            None => {}
        }
        Ok(())
    }

    // ── Movement ────────────────────────────────────────────────────

    /// Move `amount` from `from` to `to` with a proof about `from`.
    pub fn transfer(
        &self,
        ledger: &Ledger,
        from: Address,
        to: Address,
        amount: u64,
        attachment: &ProofAttachment,
    ) -> Result<Transaction, TokenError> {
        let result = self.transfer_inner(ledger, from, to, amount, Some(attachment));
        self.finish("transfer", result)
    }

    /// Transfer without a proof.
    pub fn transfer_unproven(
        &self,
        ledger: &Ledger,
        from: Address,
        to: Address,
        amount: u64,
    ) -> Result<Transaction, TokenError> {
        let result = self.transfer_inner(ledger, from, to, amount, None);
        self.finish("transfer", result)
    }

    fn transfer_inner(
        &self,
        ledger: &Ledger,
        from: Address,
        to: Address,
        amount: u64,
        proof: Option<&ProofAttachment>,
    ) -> Result<Transaction, TokenError> {
        let mut view = self.view(ledger);
        view.require_active()?;
        if from.is_circulation() || to.is_circulation() {
            return Err(InvariantError::CirculationMovement.into());
        }
        self.gate_proof(&mut view, OperationKey::Transfer, proof, from)?;

        let destination = view.token_account(to);
        view.debit(from, -i128::from(amount));
        view.tx().change_balance(destination, i128::from(amount));
        view.emit(TokenEvent::Transfer { from, to, amount })?;
        Ok(view.finish())
    }

    /// Approve a forest of account updates with a proof about the first
    /// update's account.
    pub fn bulk_update(
        &self,
        ledger: &Ledger,
        forest: &AccountUpdateForest,
        attachment: &ProofAttachment,
    ) -> Result<Transaction, TokenError> {
        let result = self.bulk_update_inner(ledger, forest, Some(attachment));
        self.finish("bulk_update", result)
    }

    /// Bulk update without a proof.
    pub fn bulk_update_unproven(
        &self,
        ledger: &Ledger,
        forest: &AccountUpdateForest,
    ) -> Result<Transaction, TokenError> {
        let result = self.bulk_update_inner(ledger, forest, None);
        self.finish("bulk_update", result)
    }

    fn bulk_update_inner(
        &self,
        ledger: &Ledger,
        forest: &AccountUpdateForest,
        proof: Option<&ProofAttachment>,
    ) -> Result<Transaction, TokenError> {
        let mut view = self.view(ledger);
        view.require_active()?;
        let updates = forest.validate()?;
        let subject = forest.subject().ok_or(ValidationError::EmptyBatch)?;
        self.gate_proof(&mut view, OperationKey::BulkUpdate, proof, subject)?;

        for update in updates {
            let account = view.token_account(update.address);
            if update.balance_change < 0 {
                view.debit(update.address, update.balance_change);
            } else if update.balance_change > 0 {
                view.tx().change_balance(account, update.balance_change);
            }
            if let Some(permissions) = update.permissions {
                view.tx().update_permissions(account, permissions);
            }
            view.emit(TokenEvent::BalanceChange {
                address: update.address,
                amount: update.balance_change,
            })?;
        }
        Ok(view.finish())
    }

    // ── Administration ──────────────────────────────────────────────

    /// Replace the amount policy of `operation`.
    pub fn update_policy(
        &self,
        ledger: &Ledger,
        operation: AmountOperation,
        policy: AmountPolicy,
        signature: Option<&Ed25519Signature>,
    ) -> Result<Transaction, TokenError> {
        let result = (|| -> Result<Transaction, TokenError> {
            let mut view = self.view(ledger);
            view.require_initialized()?;
            policy.validate()?;
            AdminAuthorizer::verify(&mut view, &AdminAction::UpdatePolicy { operation, policy }, signature)?;
            let word = ConfigStore::with_policy(view.read(Slot::Policies)?, operation, &policy)?;
            view.write(Slot::Policies, word);
            view.emit(TokenEvent::AmountPolicyUpdated { operation, policy })?;
            tracing::info!(contract = %self.address, %operation, ?policy, "amount policy update prepared");
            Ok(view.finish())
        })();
        self.finish("update_policy", result)
    }

    /// Replace the amount range of `operation`.
    pub fn update_range(
        &self,
        ledger: &Ledger,
        operation: AmountOperation,
        range: AmountRange,
        signature: Option<&Ed25519Signature>,
    ) -> Result<Transaction, TokenError> {
        let result = (|| -> Result<Transaction, TokenError> {
            let mut view = self.view(ledger);
            view.require_initialized()?;
            range.validate()?;
            AdminAuthorizer::verify(&mut view, &AdminAction::UpdateRange { operation, range }, signature)?;
            view.read(Slot::range(operation))?;
            view.write(Slot::range(operation), range.to_word());
            view.emit(TokenEvent::AmountRangeUpdated { operation, range })?;
            tracing::info!(contract = %self.address, %operation, ?range, "amount range update prepared");
            Ok(view.finish())
        })();
        self.finish("update_range", result)
    }

    /// Change one field of the amount range of `operation`. The whole range
    /// must still be valid afterwards.
    pub fn update_range_field(
        &self,
        ledger: &Ledger,
        operation: AmountOperation,
        field: RangeField,
        value: u64,
        signature: Option<&Ed25519Signature>,
    ) -> Result<Transaction, TokenError> {
        let result = (|| -> Result<Transaction, TokenError> {
            let mut view = self.view(ledger);
            view.require_initialized()?;
            let current = AmountRange::from_word(&view.read(Slot::range(operation))?);
            let range = current.with_field(field, value)?;
            AdminAuthorizer::verify(
                &mut view,
                &AdminAction::UpdateRangeField { operation, field, value },
                signature,
            )?;
            view.write(Slot::range(operation), range.to_word());
            view.emit(TokenEvent::AmountRangeUpdated { operation, range })?;
            tracing::info!(contract = %self.address, %operation, ?field, value, "amount range field update prepared");
            Ok(view.finish())
        })();
        self.finish("update_range_field", result)
    }

    /// Replace the proof requirement of `operation`.
    pub fn update_proof_requirement(
        &self,
        ledger: &Ledger,
        operation: OperationKey,
        requirement: ProofRequirement,
        signature: Option<&Ed25519Signature>,
    ) -> Result<Transaction, TokenError> {
        let result = (|| -> Result<Transaction, TokenError> {
            let mut view = self.view(ledger);
            view.require_initialized()?;
            AdminAuthorizer::verify(
                &mut view,
                &AdminAction::UpdateProofRequirement { operation, requirement },
                signature,
            )?;
            let word = ConfigStore::with_requirement(view.read(Slot::Requirements)?, operation, &requirement);
            view.write(Slot::Requirements, word);
            view.emit(TokenEvent::ProofRequirementUpdated { operation, requirement })?;
            tracing::info!(contract = %self.address, %operation, ?requirement, "proof requirement update prepared");
            Ok(view.finish())
        })();
        self.finish("update_proof_requirement", result)
    }

    /// Register `fingerprint` for the operation with id `raw_key`.
    ///
    /// `map` must be in sync with the on-chain root. On success returns the
    /// transaction and the updated map; adopt the map once the transaction
    /// commits.
    pub fn register_verification_key(
        &self,
        ledger: &Ledger,
        map: &VKeyMap,
        raw_key: u64,
        fingerprint: VkFingerprint,
        signature: Option<&Ed25519Signature>,
    ) -> Result<(Transaction, VKeyMap), TokenError> {
        let result = (|| -> Result<(Transaction, VKeyMap), TokenError> {
            let mut view = self.view(ledger);
            view.require_initialized()?;
            let on_chain_root = view.read(Slot::VkeyRoot)?;
            let (operation, next) = VKeyRegistry::register(map, &on_chain_root, raw_key, fingerprint)?;
            AdminAuthorizer::verify(
                &mut view,
                &AdminAction::RegisterVerificationKey { operation_key: raw_key, fingerprint },
                signature,
            )?;
            let root = StateWord(next.root());
            view.write(Slot::VkeyRoot, root);
            view.emit(TokenEvent::VerificationKeyUpdated { operation, fingerprint, root })?;
            tracing::info!(
                contract = %self.address,
                %operation,
                %fingerprint,
                root = %root.to_hex(),
                "verification key registration prepared"
            );
            Ok((view.finish(), next))
        })();
        self.finish("register_verification_key", result)
    }

    /// Hand administration to `new_admin`.
    pub fn set_admin(
        &self,
        ledger: &Ledger,
        new_admin: Address,
        signature: Option<&Ed25519Signature>,
    ) -> Result<Transaction, TokenError> {
        let result = (|| -> Result<Transaction, TokenError> {
            let mut view = self.view(ledger);
            view.require_initialized()?;
            if new_admin.is_circulation() {
                return Err(ValidationError::InvalidConfig(
                    "administrator cannot be the circulation account".to_string(),
                )
                .into());
            }
            let previous_admin = view.admin()?;
            AdminAuthorizer::verify(&mut view, &AdminAction::SetAdmin { new_admin }, signature)?;
            view.write(Slot::Admin, new_admin.into());
            view.emit(TokenEvent::AdminChanged { previous_admin, new_admin })?;
            tracing::info!(contract = %self.address, %previous_admin, %new_admin, "admin change prepared");
            Ok(view.finish())
        })();
        self.finish("set_admin", result)
    }

    /// Suspend mint, burn, transfer and bulk update.
    pub fn pause(&self, ledger: &Ledger, signature: Option<&Ed25519Signature>) -> Result<Transaction, TokenError> {
        let result = self.set_paused(ledger, true, signature);
        self.finish("pause", result)
    }

    /// Lift a pause.
    pub fn resume(&self, ledger: &Ledger, signature: Option<&Ed25519Signature>) -> Result<Transaction, TokenError> {
        let result = self.set_paused(ledger, false, signature);
        self.finish("resume", result)
    }

    fn set_paused(
        &self,
        ledger: &Ledger,
        paused: bool,
        signature: Option<&Ed25519Signature>,
    ) -> Result<Transaction, TokenError> {
        let mut view = self.view(ledger);
        let mut flags = view.require_initialized()?;
        let action = if paused { AdminAction::Pause } else { AdminAction::Resume };
        AdminAuthorizer::verify(&mut view, &action, signature)?;
        flags.paused = paused;
        view.write(Slot::Flags, flags.to_word());
        view.emit(TokenEvent::PauseChanged { is_paused: paused })?;
        tracing::info!(contract = %self.address, paused, "pause change prepared");
        Ok(view.finish())
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// Token balance of `address`.
    pub fn get_balance_of(&self, ledger: &Ledger, address: Address) -> u64 {
        ledger.balance(&zkt_ledger::AccountId::new(address, self.token_id))
    }

    /// Total supply, as mirrored by the circulation account.
    pub fn get_circulating(&self, ledger: &Ledger) -> u64 {
        self.get_balance_of(ledger, Address::CIRCULATION)
    }

    /// Display decimals.
    pub fn get_decimals(&self, ledger: &Ledger) -> Result<u8, TokenError> {
        let lane = ledger.app_state(&self.address, Slot::Decimals.index())?.lane(0);
        u8::try_from(lane).map_err(|_| {
            ValidationError::InvalidConfig(format!("stored decimals {lane} out of range")).into()
        })
    }

    /// Current administrator.
    pub fn get_admin(&self, ledger: &Ledger) -> Result<Address, TokenError> {
        Ok(ledger.app_state(&self.address, Slot::Admin.index())?.into())
    }

    /// The four packed configuration words: policies, mint range, burn
    /// range, requirements.
    pub fn get_all_configs(&self, ledger: &Ledger) -> Result<[StateWord; 4], TokenError> {
        let read = |slot: Slot| ledger.app_state(&self.address, slot.index());
        Ok([
            read(Slot::Policies)?,
            read(Slot::MintRange)?,
            read(Slot::BurnRange)?,
            read(Slot::Requirements)?,
        ])
    }

    /// [`get_all_configs`](Self::get_all_configs), decoded.
    pub fn get_config(&self, ledger: &Ledger) -> Result<ConfigSnapshot, TokenError> {
        Ok(ConfigSnapshot::from_words(&self.get_all_configs(ledger)?))
    }

    /// On-chain registry root.
    pub fn get_vkey_root(&self, ledger: &Ledger) -> Result<StateWord, TokenError> {
        Ok(ledger.app_state(&self.address, Slot::VkeyRoot.index())?)
    }

    /// Lifecycle flags.
    pub fn get_flags(&self, ledger: &Ledger) -> Result<ContractFlags, TokenError> {
        Ok(ContractFlags::from_word(&ledger.app_state(&self.address, Slot::Flags.index())?))
    }
}
