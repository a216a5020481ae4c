//! Token contract events.

use serde::{Deserialize, Serialize};

use zkt_core::{
    Address, AmountOperation, CanonicalizationError, OperationKey, StateWord, VkFingerprint,
};
use zkt_ledger::EmittedEvent;
use zkt_policy::{AmountPolicy, AmountRange, ProofRequirement};

/// Every event the token contract emits. The ledger records the variant
/// name as the event name and the whole value as its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenEvent {
    /// One-time initialization completed.
    Initialized {
        /// First administrator.
        admin: Address,
        /// Display decimals.
        decimals: u8,
    },
    /// Supply created.
    Mint {
        /// Credited account.
        recipient: Address,
        /// Amount created.
        amount: u64,
    },
    /// Supply destroyed.
    Burn {
        /// Debited account.
        holder: Address,
        /// Amount destroyed.
        amount: u64,
    },
    /// Balance moved between two accounts.
    Transfer {
        /// Debited account.
        from: Address,
        /// Credited account.
        to: Address,
        /// Amount moved.
        amount: u64,
    },
    /// One account update inside an approved bulk update.
    BalanceChange {
        /// Updated account.
        address: Address,
        /// Signed change, as a decimal string on the wire.
        #[serde(with = "zkt_core::signed")]
        amount: i128,
    },
    /// Administrator replaced.
    AdminChanged {
        /// Outgoing administrator.
        previous_admin: Address,
        /// Incoming administrator.
        new_admin: Address,
    },
    /// Pause flag flipped.
    PauseChanged {
        /// New pause state.
        is_paused: bool,
    },
    /// An amount policy was replaced.
    AmountPolicyUpdated {
        /// Affected operation.
        operation: AmountOperation,
        /// New policy.
        policy: AmountPolicy,
    },
    /// An amount range was replaced or one of its fields changed.
    AmountRangeUpdated {
        /// Affected operation.
        operation: AmountOperation,
        /// Range after the update.
        range: AmountRange,
    },
    /// A proof requirement was replaced.
    ProofRequirementUpdated {
        /// Affected operation.
        operation: OperationKey,
        /// New requirement.
        requirement: ProofRequirement,
    },
    /// A verification key was registered.
    VerificationKeyUpdated {
        /// Affected operation.
        operation: OperationKey,
        /// New fingerprint.
        fingerprint: VkFingerprint,
        /// Registry root after the update.
        root: StateWord,
    },
}

impl TokenEvent {
    /// Event name as recorded in the ledger.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Initialized { .. } => "Initialized",
            Self::Mint { .. } => "Mint",
            Self::Burn { .. } => "Burn",
            Self::Transfer { .. } => "Transfer",
            Self::BalanceChange { .. } => "BalanceChange",
            Self::AdminChanged { .. } => "AdminChanged",
            Self::PauseChanged { .. } => "PauseChanged",
            Self::AmountPolicyUpdated { .. } => "AmountPolicyUpdated",
            Self::AmountRangeUpdated { .. } => "AmountRangeUpdated",
            Self::ProofRequirementUpdated { .. } => "ProofRequirementUpdated",
            Self::VerificationKeyUpdated { .. } => "VerificationKeyUpdated",
        }
    }

    /// Wrap for the ledger log.
    pub fn emit(&self, contract: Address) -> Result<EmittedEvent, CanonicalizationError> {
        EmittedEvent::new(contract, self.name(), self)
    }

    /// Decode a logged event. `None` for events this contract does not
    /// emit.
    pub fn decode(event: &EmittedEvent) -> Option<Self> {
        serde_json::from_value(event.data.clone()).ok()
    }
}
