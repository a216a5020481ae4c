//! Ordered contract events.

use serde::{Deserialize, Serialize};

use zkt_core::{Address, CanonicalizationError};

/// An event as recorded in the ledger log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmittedEvent {
    /// Emitting contract.
    pub contract: Address,
    /// Event name.
    pub name: String,
    /// Event payload.
    pub data: serde_json::Value,
}

impl EmittedEvent {
    /// Serialize `data` into an event.
    ///
    /// # Errors
    ///
    /// A payload `serde_json::Value` cannot hold (an `i128` outside the
    /// `i64`/`u64` range, a map with non-string keys) is an error, never a
    /// silently dropped payload.
    pub fn new(
        contract: Address,
        name: impl Into<String>,
        data: &impl Serialize,
    ) -> Result<Self, CanonicalizationError> {
        Ok(Self {
            contract,
            name: name.into(),
            data: serde_json::to_value(data)?,
        })
    }
}
