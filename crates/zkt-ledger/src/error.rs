//! Ledger commit failures.

use thiserror::Error;

use zkt_core::Address;

use crate::account::{AccountId, AuthRequired};

/// Why a transaction could not be committed. The ledger is unchanged in
/// every case.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// State read by the transaction changed before it was committed.
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    /// A debit exceeds the account balance.
    #[error("insufficient balance on {account}: balance {balance}, change {change}")]
    InsufficientBalance {
        /// Debited account.
        account: AccountId,
        /// Balance before the change.
        balance: u64,
        /// Requested signed change.
        change: i128,
    },

    /// A credit would overflow the account balance.
    #[error("balance overflow on {0}")]
    BalanceOverflow(AccountId),

    /// A nonce increment would overflow.
    #[error("nonce overflow on {0}")]
    NonceOverflow(AccountId),

    /// No contract is deployed at the address.
    #[error("no contract deployed at {0}")]
    UnknownContract(Address),

    /// A contract is already deployed at the address.
    #[error("contract already deployed at {0}")]
    AlreadyDeployed(Address),

    /// An effect needs authority the transaction does not carry.
    #[error("{account} requires {required:?} authorization")]
    Unauthorized {
        /// Account acted on.
        account: AccountId,
        /// Authority its permissions demand.
        required: AuthRequired,
    },
    /// A holder signature does not verify over the signing payload.
    #[error("invalid signature by {0}")]
    InvalidSignature(Address),
    /// A proof authorization names an account outside the vouching
    /// contract's token, or a contract that is not deployed.
    #[error("{contract} cannot vouch for {account}")]
    ForeignProofAuthorization {
        /// Vouching contract.
        contract: Address,
        /// Account it named.
        account: AccountId,
    },
    /// The signing payload could not be canonicalized.
    #[error("transaction encoding failed: {0}")]
    Encoding(String),
    /// App-state slot index out of range.
    #[error("app state slot {0} out of range")]
    SlotOutOfRange(usize),
}
