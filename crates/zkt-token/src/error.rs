//! Operation failures.

use thiserror::Error;

use zkt_core::{
    AuthorizationError, CanonicalizationError, CryptoError, InvariantError,
    ProofConsistencyError, RegistryError, ValidationError,
};
use zkt_ledger::LedgerError;

/// Any reason a token operation is rejected. Nothing is ever partially
/// applied: an `Err` means no transaction was produced, and a transaction
/// whose commit fails leaves the ledger untouched.
#[derive(Error, Debug)]
pub enum TokenError {
    /// Malformed policy, range, or request data.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Missing or bad authority.
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    /// Verification-key registry failure.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Proof snapshot disagrees with live state, or the proof is invalid.
    #[error(transparent)]
    ProofConsistency(#[from] ProofConsistencyError),

    /// Structural or lifecycle invariant violated.
    #[error(transparent)]
    Invariant(#[from] InvariantError),

    /// The base ledger refused a read.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Key or signature encoding problem.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// A signed payload could not be canonicalized.
    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),
}

impl TokenError {
    /// Short category label, used as the metrics `outcome`.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Authorization(_) => "authorization",
            Self::Registry(_) => "registry",
            Self::ProofConsistency(_) => "proof_consistency",
            Self::Invariant(_) => "invariant",
            Self::Ledger(_) => "ledger",
            Self::Crypto(_) => "crypto",
            Self::Canonicalization(_) => "canonicalization",
        }
    }
}
