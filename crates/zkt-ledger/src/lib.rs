//! # zkt-ledger: Base Ledger
//!
//! The ledger the token overlay runs on: balances keyed by
//! `(address, token)`, eight app-state words per contract, and an ordered
//! event log. Contract operations never write here directly. They read,
//! record what they read as preconditions, and hand back a
//! [`Transaction`] for [`Ledger::commit`].
//!
//! Account permissions are enforced at commit: a debit needs the authority
//! the account's `send` permission names, a credit the authority of its
//! `receive` permission, and a permission change the holder's signature
//! or the owner contract's proof authorization. Global zero-sum
//! enforcement across a transaction is left to the contracts.

pub mod account;
pub mod error;
pub mod event;
pub mod ledger;
pub mod transaction;

pub use account::{
    Account, AccountId, AuthRequired, Permissions, PermissionsUpdate, APP_STATE_SLOTS,
};
pub use error::LedgerError;
pub use event::EmittedEvent;
pub use ledger::Ledger;
pub use transaction::{
    Effect, HolderSignature, Precondition, ProofAuthorization, Transaction,
};
