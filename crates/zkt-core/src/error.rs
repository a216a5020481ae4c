//! # Error Types: Failure Taxonomy
//!
//! Every failure in the overlay is a synchronous, whole-operation rejection.
//! Nothing is recovered locally: callers re-derive their inputs and resubmit.
//!
//! ## Categories
//!
//! - [`ValidationError`]: malformed policy, range, or request data.
//! - [`AuthorizationError`]: missing or bad co-signature, out-of-policy
//!   magnitude, operation disabled.
//! - [`RegistryError`]: stale caller map, unknown operation key, missing or
//!   mismatched verification-key fingerprint.
//! - [`ProofConsistencyError`]: the proof's captured snapshot disagrees with
//!   live state, or the proof itself does not verify.
//! - [`InvariantError`]: non-zero-sum batch, circulation movement,
//!   forbidden permission change, lifecycle violations.

use thiserror::Error;

use crate::identity::Address;
use crate::operation::OperationKey;

/// Malformed policy, range, or request data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Exactly one of `fixed_amount` / `ranged_amount` must be set.
    #[error("invalid policy: exactly one of fixed_amount and ranged_amount must be set (fixed={fixed_amount}, ranged={ranged_amount})")]
    InvalidPolicy {
        /// Decoded `fixed_amount` flag.
        fixed_amount: bool,
        /// Decoded `ranged_amount` flag.
        ranged_amount: bool,
    },

    /// `min_amount` must be strictly below `max_amount`.
    #[error("invalid range: min_amount {min_amount} must be strictly less than max_amount {max_amount}")]
    InvalidRange {
        /// Lower bound.
        min_amount: u64,
        /// Upper bound.
        max_amount: u64,
    },

    /// Range overrides do not match the active policy mode.
    #[error("invalid policy data: {0}")]
    InvalidPolicyData(String),

    /// A bulk update carried no account updates.
    #[error("bulk update must contain at least one account update")]
    EmptyBatch,

    /// Deployment configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Missing authority or out-of-policy request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationError {
    /// The requested magnitude is not allowed by the active policy.
    #[error("{operation} of {amount} not permitted by the amount policy")]
    NotPermitted {
        /// The gated operation.
        operation: OperationKey,
        /// The requested magnitude.
        amount: u64,
    },

    /// An administrator co-signature is required but absent.
    #[error("administrator co-signature required")]
    MissingAuthorization,

    /// The supplied co-signature did not verify against the administrator.
    #[error("invalid administrator signature: {0}")]
    InvalidSignature(String),

    /// A proof-skipping variant was called while proof verification is
    /// mandatory for the operation.
    #[error("no permission for sideload-disabled operation: {0} requires a verified proof")]
    NoPermissionForSideloadDisabledOperation(OperationKey),

    /// Supply-changing operations are paused.
    #[error("token operations are paused")]
    Paused,
}

/// Verification-key registry failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The caller's map root differs from the on-chain root.
    #[error("stale registry: caller map root {supplied} does not match on-chain root {on_chain}")]
    StaleRegistry {
        /// Root of the caller-held map (hex).
        supplied: String,
        /// Root persisted on-chain (hex).
        on_chain: String,
    },

    /// The operation id is not one of the four known operations.
    #[error("invalid operation key: {0}")]
    InvalidOperationKey(u64),

    /// Verification is required but no key is registered.
    #[error("no verification key registered for {0}")]
    MissingKey(OperationKey),

    /// The supplied verification key's fingerprint differs from the
    /// registered fingerprint.
    #[error("verification key fingerprint does not match the registered key for {0}")]
    InvalidKey(OperationKey),
}

/// The proof's captured snapshot disagrees with live state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofConsistencyError {
    /// Proof was generated for a different operation address.
    #[error("recipient mismatch")]
    RecipientMismatch,
    /// Proof captured a different token account.
    #[error("token id mismatch")]
    TokenIdMismatch,
    /// Settlement-currency balance changed since the proof was generated.
    #[error("mina balance mismatch")]
    MinaBalanceMismatch,
    /// Custom-token balance changed since the proof was generated.
    #[error("custom token balance mismatch")]
    CustomBalanceMismatch,
    /// Settlement-currency nonce changed since the proof was generated.
    #[error("mina nonce mismatch")]
    MinaNonceMismatch,
    /// Custom-token nonce changed since the proof was generated.
    #[error("custom token nonce mismatch")]
    CustomNonceMismatch,
    /// The proof does not verify against the supplied key.
    #[error("proof verification failed: {0}")]
    InvalidProof(String),
}

/// Structural or lifecycle invariant violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    /// Balance changes in a bulk update do not sum to zero.
    #[error("bulk update balance changes must sum to zero, got {0}")]
    NonZeroSum(i128),

    /// The circulation pseudo-account appeared as a source or destination.
    #[error("circulation account cannot be a transfer endpoint")]
    CirculationMovement,

    /// A bulk update tried to change an account's access or receive
    /// permission.
    #[error("permission change not allowed for account {0}")]
    PermissionChange(Address),

    /// `initialize` was called on an initialized contract.
    #[error("contract already initialized")]
    AlreadyInitialized,

    /// An operation ran before `initialize`.
    #[error("contract not initialized")]
    NotInitialized,
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    #[error("float values are not permitted in canonical representations; use integers for amounts: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error in cryptographic encoding or verification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Signature verification failed.
    #[error("signature verification failed: {0}")]
    VerificationFailed(String),

    /// Key parsing failed.
    #[error("key error: {0}")]
    KeyError(String),

    /// Hex or length encoding was malformed.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Authenticated map index outside the map's capacity.
    #[error("map index {index} out of range for capacity {capacity}")]
    IndexOutOfRange {
        /// Requested leaf index.
        index: u64,
        /// Number of leaves.
        capacity: u64,
    },
}
