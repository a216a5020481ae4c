//! # zkt-policy: Packed Configuration
//!
//! The contract persists its whole configuration in four 256-bit words:
//!
//! | Word | Contents |
//! |------|----------|
//! | amount policies | mint and burn [`AmountPolicy`], 3 bits each |
//! | mint range | [`AmountRange`] as three 64-bit lanes |
//! | burn range | [`AmountRange`] as three 64-bit lanes |
//! | proof requirements | four [`ProofRequirement`]s, 7 bits each |
//!
//! ## Modules
//!
//! - **`bitfield`**: flag-array ↔ word codec with compile-time non-overlap.
//! - **`amount`**: amount policy and range structs with their validation.
//! - **`requirement`**: the seven proof-requirement flags.
//! - **`store`**: get/set of one operation's slice, preserving the rest.

pub mod amount;
pub mod bitfield;
pub mod requirement;
pub mod store;

pub use amount::{AmountPolicy, AmountRange, RangeField, RangeOverrides};
pub use bitfield::{Flags, Layout};
pub use requirement::ProofRequirement;
pub use store::{ConfigSnapshot, ConfigStore};
