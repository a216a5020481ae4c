//! # zkt-token: Proof-Gated Token Contract
//!
//! A fungible token whose supply-changing operations pass through two
//! layers of gating before they reach the ledger:
//!
//! 1. an amount policy (fixed or ranged magnitude, with or without an
//!    administrator co-signature) for mint and burn, and
//! 2. an optional side-loaded proof, checked against a verification key
//!    registered for the operation and against live account state.
//!
//! Every operation is pure with respect to the [`zkt_ledger::Ledger`] it
//! reads: it returns a [`zkt_ledger::Transaction`] carrying the state it
//! observed as preconditions, and the caller commits it.
//!
//! ## Modules
//!
//! - **`contract`**: [`TokenContract`], the operation surface.
//! - **`auth`**: amount-policy gate and administrator co-signatures.
//! - **`proof_gate`**: proof admission.
//! - **`registry`**: the verification-key registry and its on-chain root.
//! - **`bulk`**: account-update forests and their batch invariants.
//! - **`config`**: YAML/JSON deployment documents.
//! - **`events`**, **`state`**, **`params`**, **`telemetry`**.

pub mod auth;
pub mod bulk;
pub mod config;
pub mod contract;
pub mod error;
pub mod events;
pub mod params;
pub mod proof_gate;
pub mod registry;
pub mod state;
pub mod telemetry;

pub use auth::{admin_message, sign_admin_action, AdminAction, AmountDecision, PermissionGate};
pub use bulk::{AccountUpdate, AccountUpdateForest};
pub use config::{AmountConfig, DeploymentConfig, ProofRequirements};
pub use contract::TokenContract;
pub use error::TokenError;
pub use events::TokenEvent;
pub use params::InitParams;
pub use proof_gate::{Admission, LiveSnapshot, ProofAttachment, ProofGate};
pub use registry::{VKeyMap, VKeyRegistry};
pub use state::{ContractFlags, Slot};
