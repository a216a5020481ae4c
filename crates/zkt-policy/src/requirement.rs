//! Per-operation proof requirements.

use serde::{Deserialize, Serialize};

use crate::bitfield::Flags;

/// Whether an operation must carry a verified proof, and which fields of
/// the proof's captured snapshot must still match live state.
///
/// With `should_verify` false every other flag is moot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ProofRequirement {
    /// A proof is mandatory and must verify against the registered key.
    pub should_verify: bool,
    /// The proof's operation address must be the operation's subject.
    pub require_recipient_match: bool,
    /// The proof's token account must belong to this contract's token.
    pub require_token_id_match: bool,
    /// Settlement-currency balance must be unchanged since proving.
    pub require_mina_balance_match: bool,
    /// Custom-token balance must be unchanged since proving.
    pub require_custom_balance_match: bool,
    /// Settlement-currency nonce must be unchanged since proving.
    pub require_mina_nonce_match: bool,
    /// Custom-token nonce must be unchanged since proving.
    pub require_custom_nonce_match: bool,
}

impl ProofRequirement {
    /// No proof is required.
    pub const DISABLED: ProofRequirement = ProofRequirement {
        should_verify: false,
        require_recipient_match: false,
        require_token_id_match: false,
        require_mina_balance_match: false,
        require_custom_balance_match: false,
        require_mina_nonce_match: false,
        require_custom_nonce_match: false,
    };

    /// A proof is required and every snapshot field must match.
    pub const STRICT: ProofRequirement = ProofRequirement {
        should_verify: true,
        require_recipient_match: true,
        require_token_id_match: true,
        require_mina_balance_match: true,
        require_custom_balance_match: true,
        require_mina_nonce_match: true,
        require_custom_nonce_match: true,
    };

    /// Whether any live account state has to be read to check a proof.
    pub fn needs_live_snapshot(&self) -> bool {
        self.should_verify
            && (self.require_mina_balance_match
                || self.require_custom_balance_match
                || self.require_mina_nonce_match
                || self.require_custom_nonce_match)
    }
}

impl Flags<7> for ProofRequirement {
    fn to_flags(&self) -> [bool; 7] {
        [
            self.should_verify,
            self.require_recipient_match,
            self.require_token_id_match,
            self.require_mina_balance_match,
            self.require_custom_balance_match,
            self.require_mina_nonce_match,
            self.require_custom_nonce_match,
        ]
    }

    fn from_flags(flags: [bool; 7]) -> Self {
        let [should_verify, require_recipient_match, require_token_id_match, require_mina_balance_match, require_custom_balance_match, require_mina_nonce_match, require_custom_nonce_match] =
            flags;
        Self {
            should_verify,
            require_recipient_match,
            require_token_id_match,
            require_mina_balance_match,
            require_custom_balance_match,
            require_mina_nonce_match,
            require_custom_nonce_match,
        }
    }
}
