//! Arguments to `initialize`.

use serde::{Deserialize, Serialize};

use zkt_core::{Address, ValidationError};
use zkt_policy::{AmountPolicy, AmountRange, ConfigSnapshot, ProofRequirement};

/// Everything `initialize` writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitParams {
    /// First administrator.
    pub admin: Address,
    /// Display decimals.
    pub decimals: u8,
    /// Mint amount policy.
    pub mint_policy: AmountPolicy,
    /// Mint amount range.
    pub mint_range: AmountRange,
    /// Burn amount policy.
    pub burn_policy: AmountPolicy,
    /// Burn amount range.
    pub burn_range: AmountRange,
    /// Proof requirement for mint.
    pub mint_requirement: ProofRequirement,
    /// Proof requirement for burn.
    pub burn_requirement: ProofRequirement,
    /// Proof requirement for transfer.
    pub transfer_requirement: ProofRequirement,
    /// Proof requirement for bulk update.
    pub bulk_update_requirement: ProofRequirement,
}

impl InitParams {
    /// The configuration these parameters describe.
    pub fn config(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            mint_policy: self.mint_policy,
            burn_policy: self.burn_policy,
            mint_range: self.mint_range,
            burn_range: self.burn_range,
            requirements: [
                self.mint_requirement,
                self.burn_requirement,
                self.transfer_requirement,
                self.bulk_update_requirement,
            ],
        }
    }

    /// Every struct-level validation, plus a usable administrator.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.admin.is_circulation() {
            return Err(ValidationError::InvalidConfig(
                "administrator cannot be the circulation account".to_string(),
            ));
        }
        self.config().validate()
    }
}
