//! # Ledger
//!
//! In-memory account and contract state with an ordered event log.
//!
//! ## Commit Protocol
//!
//! 1. Every precondition is checked against live state.
//! 2. Proof authorizations are matched to their contracts' tokens and
//!    holder signatures are verified over the signing payload.
//! 3. Every effect is authorized against the permissions in force at that
//!    point and applied, in order, to a scratch copy.
//! 4. The scratch copy replaces live state and events are appended.
//!
//! A failure at steps 1 to 3 returns an error and leaves the ledger exactly
//! as it was. This is the only concurrency control there is: two
//! transactions built from the same observed state cannot both commit if
//! the first changes what the second observed.

use std::collections::{BTreeMap, BTreeSet};

use zkt_core::{Address, StateWord, TokenId};
use zkt_crypto::verify_with_address;

use crate::account::{Account, AccountId, AuthRequired, Permissions, APP_STATE_SLOTS};
use crate::error::LedgerError;
use crate::event::EmittedEvent;
use crate::transaction::{Effect, Precondition, Transaction};

#[derive(Debug, Clone, Default, PartialEq)]
struct State {
    accounts: BTreeMap<AccountId, Account>,
    contracts: BTreeMap<Address, [StateWord; APP_STATE_SLOTS]>,
}

impl State {
    fn app_state(&self, contract: &Address, slot: usize) -> Result<StateWord, LedgerError> {
        let slots = self
            .contracts
            .get(contract)
            .ok_or(LedgerError::UnknownContract(*contract))?;
        slots
            .get(slot)
            .copied()
            .ok_or(LedgerError::SlotOutOfRange(slot))
    }

    fn permissions(&self, id: &AccountId) -> Permissions {
        self.accounts
            .get(id)
            .map(|a| a.permissions)
            .unwrap_or_default()
    }

    /// Whether `authority` lets the transaction act on `account` for an
    /// effect that needs `required`.
    fn check_authority(
        account: AccountId,
        required: AuthRequired,
        authority: &Authority,
    ) -> Result<(), LedgerError> {
        let granted = match required {
            AuthRequired::None => true,
            AuthRequired::Signature => authority.signed(&account),
            AuthRequired::Proof => authority.proven(&account),
            AuthRequired::Impossible => false,
        };
        if granted {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized { account, required })
        }
    }

    fn authorize(&self, effect: &Effect, authority: &Authority) -> Result<(), LedgerError> {
        match effect {
            Effect::BalanceChange { account, delta } if *delta != 0 => {
                let permissions = self.permissions(account);
                Self::check_authority(*account, permissions.access, authority)?;
                let required = if *delta < 0 {
                    permissions.send
                } else {
                    permissions.receive
                };
                Self::check_authority(*account, required, authority)
            }
            Effect::UpdatePermissions { account, .. } => {
                Self::check_authority(*account, self.permissions(account).access, authority)?;
                if authority.signed(account) || authority.proven(account) {
                    Ok(())
                } else {
                    Err(LedgerError::Unauthorized {
                        account: *account,
                        required: AuthRequired::Signature,
                    })
                }
            }
            _ => Ok(()),
        }
    }

    fn account_mut(&mut self, id: AccountId) -> &mut Account {
        self.accounts.entry(id).or_insert_with(|| Account::empty(id))
    }

    fn apply(&mut self, effect: &Effect) -> Result<(), LedgerError> {
        match effect {
            Effect::SetAppState {
                contract,
                slot,
                value,
            } => {
                let slots = self
                    .contracts
                    .get_mut(contract)
                    .ok_or(LedgerError::UnknownContract(*contract))?;
                let target = slots
                    .get_mut(*slot)
                    .ok_or(LedgerError::SlotOutOfRange(*slot))?;
                *target = *value;
            }
            Effect::BalanceChange { account, delta } => {
                let acct = self.account_mut(*account);
                let next = i128::from(acct.balance) + delta;
                if next < 0 {
                    return Err(LedgerError::InsufficientBalance {
                        account: *account,
                        balance: acct.balance,
                        change: *delta,
                    });
                }
                acct.balance =
                    u64::try_from(next).map_err(|_| LedgerError::BalanceOverflow(*account))?;
            }
            Effect::IncrementNonce { account } => {
                let acct = self.account_mut(*account);
                acct.nonce = acct
                    .nonce
                    .checked_add(1)
                    .ok_or(LedgerError::NonceOverflow(*account))?;
            }
            Effect::UpdatePermissions { account, update } => {
                let acct = self.account_mut(*account);
                acct.permissions = update.apply(acct.permissions);
            }
        }
        Ok(())
    }
}

/// Verified authority carried by one transaction.
#[derive(Debug, Default)]
struct Authority {
    signers: BTreeSet<Address>,
    proven: BTreeSet<AccountId>,
}

impl Authority {
    fn signed(&self, account: &AccountId) -> bool {
        self.signers.contains(&account.address)
    }

    fn proven(&self, account: &AccountId) -> bool {
        self.proven.contains(account)
    }
}

/// The base ledger.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    state: State,
    events: Vec<EmittedEvent>,
    height: u64,
}

impl Ledger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a contract account at `address` with zeroed app state.
    pub fn deploy(&mut self, address: Address) -> Result<(), LedgerError> {
        if self.state.contracts.contains_key(&address) {
            return Err(LedgerError::AlreadyDeployed(address));
        }
        self.state
            .contracts
            .insert(address, [StateWord::ZERO; APP_STATE_SLOTS]);
        tracing::debug!(contract = %address, "contract deployed");
        Ok(())
    }

    /// Genesis credit outside any transaction.
    pub fn fund(&mut self, account: AccountId, amount: u64) -> Result<(), LedgerError> {
        let acct = self.state.account_mut(account);
        acct.balance = acct
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow(account))?;
        Ok(())
    }

    /// Whether a contract is deployed at `address`.
    pub fn is_deployed(&self, address: &Address) -> bool {
        self.state.contracts.contains_key(address)
    }

    /// Read one app-state slot.
    pub fn app_state(&self, contract: &Address, slot: usize) -> Result<StateWord, LedgerError> {
        self.state.app_state(contract, slot)
    }

    /// The account record, if it exists.
    pub fn account(&self, id: &AccountId) -> Option<&Account> {
        self.state.accounts.get(id)
    }

    /// Balance, zero for a missing account.
    pub fn balance(&self, id: &AccountId) -> u64 {
        self.account(id).map_or(0, |a| a.balance)
    }

    /// Nonce, zero for a missing account.
    pub fn nonce(&self, id: &AccountId) -> u64 {
        self.account(id).map_or(0, |a| a.nonce)
    }

    /// Permissions, defaults for a missing account.
    pub fn permissions(&self, id: &AccountId) -> Permissions {
        self.state.permissions(id)
    }

    /// Every event ever committed, oldest first.
    pub fn events(&self) -> &[EmittedEvent] {
        &self.events
    }

    /// Events emitted by `contract`, oldest first.
    pub fn events_for<'a>(&'a self, contract: &Address) -> impl DoubleEndedIterator<Item = &'a EmittedEvent> + 'a {
        let contract = *contract;
        self.events.iter().filter(move |e| e.contract == contract)
    }

    /// Number of committed transactions.
    pub fn height(&self) -> u64 {
        self.height
    }

    fn check(&self, precondition: &Precondition) -> Result<(), LedgerError> {
        match precondition {
            Precondition::AppState {
                contract,
                slot,
                equals,
            } => {
                let live = self.state.app_state(contract, *slot)?;
                if live != *equals {
                    return Err(LedgerError::PreconditionFailed(format!(
                        "app state {contract}[{slot}] is {}, expected {}",
                        live.to_hex(),
                        equals.to_hex()
                    )));
                }
            }
            Precondition::Balance { account, equals } => {
                let live = self.balance(account);
                if live != *equals {
                    return Err(LedgerError::PreconditionFailed(format!(
                        "balance of {account} is {live}, expected {equals}"
                    )));
                }
            }
            Precondition::Nonce { account, equals } => {
                let live = self.nonce(account);
                if live != *equals {
                    return Err(LedgerError::PreconditionFailed(format!(
                        "nonce of {account} is {live}, expected {equals}"
                    )));
                }
            }
        }
        Ok(())
    }

    fn authority(&self, tx: &Transaction) -> Result<Authority, LedgerError> {
        let mut authority = Authority::default();
        for grant in &tx.proof_authorizations {
            let owned = grant.account.token_id == TokenId::derive(&grant.contract);
            if !owned || !self.is_deployed(&grant.contract) {
                return Err(LedgerError::ForeignProofAuthorization {
                    contract: grant.contract,
                    account: grant.account,
                });
            }
            authority.proven.insert(grant.account);
        }
        if tx.signatures.is_empty() {
            return Ok(authority);
        }
        let payload = tx
            .signing_payload()
            .map_err(|e| LedgerError::Encoding(e.to_string()))?;
        for holder in &tx.signatures {
            verify_with_address(&payload, &holder.signature, &holder.signer)
                .map_err(|_| LedgerError::InvalidSignature(holder.signer))?;
            authority.signers.insert(holder.signer);
        }
        Ok(authority)
    }

    fn stage(&self, tx: &Transaction) -> Result<State, LedgerError> {
        for precondition in &tx.preconditions {
            self.check(precondition)?;
        }
        let authority = self.authority(tx)?;
        let mut scratch = self.state.clone();
        for effect in &tx.effects {
            scratch.authorize(effect, &authority)?;
            scratch.apply(effect)?;
        }
        Ok(scratch)
    }

    /// Check every precondition and authorization, apply every effect,
    /// append every event. All or nothing.
    pub fn commit(&mut self, tx: Transaction) -> Result<(), LedgerError> {
        let scratch = match self.stage(&tx) {
            Ok(scratch) => scratch,
            Err(e) => {
                tracing::warn!(error = %e, height = self.height, "transaction rejected");
                return Err(e);
            }
        };
        self.state = scratch;
        self.height += 1;
        tracing::debug!(
            height = self.height,
            preconditions = tx.preconditions.len(),
            effects = tx.effects.len(),
            signatures = tx.signatures.len(),
            events = tx.events.len(),
            "transaction committed"
        );
        self.events.extend(tx.events);
        Ok(())
    }
}
