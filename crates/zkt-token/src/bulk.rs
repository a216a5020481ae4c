//! # Bulk Updates
//!
//! A forest of account updates approved as one unit. Trees are flattened
//! depth-first, parents before children. The batch is accepted only if:
//!
//! - it contains at least one update;
//! - no update targets the circulation account;
//! - no update changes `access` or `receive` permissions;
//! - balance changes sum to exactly zero.
//!
//! All four are checked before anything is queued.

use serde::{Deserialize, Serialize};

use zkt_core::{Address, InvariantError, ValidationError};
use zkt_ledger::PermissionsUpdate;

/// One account update, with the updates nested under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUpdate {
    /// Updated account.
    pub address: Address,
    /// Signed change to the account's token balance.
    pub balance_change: i128,
    /// Permission changes, if any.
    #[serde(default)]
    pub permissions: Option<PermissionsUpdate>,
    /// Child updates.
    #[serde(default)]
    pub children: Vec<AccountUpdate>,
}

impl AccountUpdate {
    /// A leaf update that only changes balance.
    pub fn balance(address: Address, balance_change: i128) -> Self {
        Self {
            address,
            balance_change,
            permissions: None,
            children: Vec::new(),
        }
    }

    /// Attach a child update.
    #[must_use]
    pub fn with_child(mut self, child: AccountUpdate) -> Self {
        self.children.push(child);
        self
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a AccountUpdate>) {
        out.push(self);
        for child in &self.children {
            child.collect(out);
        }
    }
}

/// Ordered trees of account updates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUpdateForest {
    /// Root updates.
    pub trees: Vec<AccountUpdate>,
}

impl AccountUpdateForest {
    /// A forest of the given trees.
    pub fn new(trees: Vec<AccountUpdate>) -> Self {
        Self { trees }
    }

    /// Every update, depth-first.
    pub fn flatten(&self) -> Vec<&AccountUpdate> {
        let mut out = Vec::new();
        for tree in &self.trees {
            tree.collect(&mut out);
        }
        out
    }

    /// Check the batch and return it flattened.
    pub fn validate(&self) -> Result<Vec<&AccountUpdate>, crate::TokenError> {
        let updates = self.flatten();
        if updates.is_empty() {
            return Err(ValidationError::EmptyBatch.into());
        }
        let mut sum: i128 = 0;
        for update in &updates {
            if update.address.is_circulation() {
                return Err(InvariantError::CirculationMovement.into());
            }
            if let Some(p) = &update.permissions {
                if p.access.is_some() || p.receive.is_some() {
                    return Err(InvariantError::PermissionChange(update.address).into());
                }
            }
            if update.balance_change.unsigned_abs() > u128::from(u64::MAX) {
                return Err(ValidationError::InvalidPolicyData(format!(
                    "balance change {} for {} exceeds the balance range",
                    update.balance_change, update.address
                ))
                .into());
            }
            sum += update.balance_change;
        }
        if sum != 0 {
            return Err(InvariantError::NonZeroSum(sum).into());
        }
        Ok(updates)
    }

    /// Address the batch's proof is about: the first update depth-first.
    pub fn subject(&self) -> Option<Address> {
        self.trees.first().map(|t| t.address)
    }
}
