//! # Contract State
//!
//! The eight app-state slots of a token contract, and the view every
//! operation reads them through.
//!
//! | Slot | Content |
//! |------|---------|
//! | 0 | administrator address |
//! | 1 | decimals (lane 0) |
//! | 2 | packed amount policies |
//! | 3 | mint range |
//! | 4 | burn range |
//! | 5 | packed proof requirements |
//! | 6 | verification-key registry root |
//! | 7 | flags: bit 0 initialized, bit 1 paused |
//!
//! [`ContractView`] records each read as a precondition on the transaction
//! it is building, so a transaction built on state that has since changed
//! fails at commit.

use zkt_core::{Address, AmountOperation, AuthorizationError, InvariantError, StateWord, TokenId};
use zkt_ledger::{AccountId, Ledger, Transaction};
use zkt_policy::{Flags, Layout};

use crate::error::TokenError;
use crate::events::TokenEvent;

/// App-state slot assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Administrator address.
    Admin = 0,
    /// Decimals in lane 0.
    Decimals = 1,
    /// Packed amount policies.
    Policies = 2,
    /// Mint range lanes.
    MintRange = 3,
    /// Burn range lanes.
    BurnRange = 4,
    /// Packed proof requirements.
    Requirements = 5,
    /// Verification-key registry root.
    VkeyRoot = 6,
    /// Lifecycle flags.
    Flags = 7,
}

impl Slot {
    /// Range slot of an amount operation.
    pub fn range(op: AmountOperation) -> Self {
        match op {
            AmountOperation::Mint => Self::MintRange,
            AmountOperation::Burn => Self::BurnRange,
        }
    }

    /// Ledger slot index.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Lifecycle flags in slot 7.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContractFlags {
    /// `initialize` has run.
    pub initialized: bool,
    /// Supply-changing operations are suspended.
    pub paused: bool,
}

impl Flags<2> for ContractFlags {
    fn to_flags(&self) -> [bool; 2] {
        [self.initialized, self.paused]
    }

    fn from_flags(flags: [bool; 2]) -> Self {
        Self {
            initialized: flags[0],
            paused: flags[1],
        }
    }
}

type FlagsLayout = Layout<2, 1>;

impl ContractFlags {
    /// Decode slot 7.
    pub fn from_word(word: &StateWord) -> Self {
        FlagsLayout::read(word, 0)
    }

    /// Encode for slot 7.
    pub fn to_word(&self) -> StateWord {
        FlagsLayout::write(StateWord::ZERO, 0, self)
    }
}

/// Reads contract state for one operation, recording every read as a
/// precondition of the transaction under construction.
pub(crate) struct ContractView<'a> {
    ledger: &'a Ledger,
    contract: Address,
    token_id: TokenId,
    tx: Transaction,
}

impl<'a> ContractView<'a> {
    pub(crate) fn new(ledger: &'a Ledger, contract: Address, token_id: TokenId) -> Self {
        Self {
            ledger,
            contract,
            token_id,
            tx: Transaction::new(),
        }
    }

    pub(crate) fn contract(&self) -> Address {
        self.contract
    }

    pub(crate) fn token_id(&self) -> TokenId {
        self.token_id
    }

    /// Read a slot and require it unchanged at commit.
    pub(crate) fn read(&mut self, slot: Slot) -> Result<StateWord, TokenError> {
        let word = self.ledger.app_state(&self.contract, slot.index())?;
        self.tx.require_app_state(self.contract, slot.index(), word);
        Ok(word)
    }

    pub(crate) fn write(&mut self, slot: Slot, value: StateWord) {
        self.tx.set_app_state(self.contract, slot.index(), value);
    }

    pub(crate) fn flags(&mut self) -> Result<ContractFlags, TokenError> {
        Ok(ContractFlags::from_word(&self.read(Slot::Flags)?))
    }

    pub(crate) fn require_initialized(&mut self) -> Result<ContractFlags, TokenError> {
        let flags = self.flags()?;
        if !flags.initialized {
            return Err(InvariantError::NotInitialized.into());
        }
        Ok(flags)
    }

    /// Initialized and not paused.
    pub(crate) fn require_active(&mut self) -> Result<(), TokenError> {
        if self.require_initialized()?.paused {
            return Err(AuthorizationError::Paused.into());
        }
        Ok(())
    }

    pub(crate) fn admin(&mut self) -> Result<Address, TokenError> {
        Ok(Address::from(self.read(Slot::Admin)?))
    }

    /// Live balance, required unchanged at commit.
    pub(crate) fn balance(&mut self, account: AccountId) -> u64 {
        let balance = self.ledger.balance(&account);
        self.tx.require_balance(account, balance);
        balance
    }

    /// Live nonce, required unchanged at commit.
    pub(crate) fn nonce(&mut self, account: AccountId) -> u64 {
        let nonce = self.ledger.nonce(&account);
        self.tx.require_nonce(account, nonce);
        nonce
    }

    /// This contract's token account for `address`.
    pub(crate) fn token_account(&self, address: Address) -> AccountId {
        AccountId::new(address, self.token_id)
    }

    pub(crate) fn tx(&mut self) -> &mut Transaction {
        &mut self.tx
    }

    /// Apply a negative `delta` to `address`'s token account. The holder's
    /// nonce is required unchanged and then bumped, so authority granted
    /// over this transaction is spent by committing it.
    pub(crate) fn debit(&mut self, address: Address, delta: i128) {
        let account = self.token_account(address);
        self.nonce(account);
        self.tx.change_balance(account, delta);
        self.tx.increment_nonce(account);
    }

    /// Vouch for `address`'s token account after admitting a proof about it.
    pub(crate) fn authorize_proof(&mut self, address: Address) {
        let account = self.token_account(address);
        self.tx.authorize_proof(self.contract, account);
    }

    pub(crate) fn emit(&mut self, event: TokenEvent) -> Result<(), TokenError> {
        let emitted = event.emit(self.contract)?;
        self.tx.emit(emitted);
        Ok(())
    }

    pub(crate) fn finish(self) -> Transaction {
        self.tx
    }
}
