//! # Config Store
//!
//! Get and set one operation's slice of a packed configuration word while
//! leaving every other operation's bits untouched.
//!
//! The store is stateless: it maps `(word, key) -> value` and
//! `(word, key, value) -> word`. Persisting the resulting word, and
//! requiring administrator co-authorization for the write, is the contract's
//! job.

use serde::{Deserialize, Serialize};

use zkt_core::{AmountOperation, OperationKey, StateWord, ValidationError};

use crate::amount::{AmountPolicy, AmountRange};
use crate::bitfield::Layout;
use crate::requirement::ProofRequirement;

/// Amount policies: 3 bits per amount operation.
pub type PolicyLayout = Layout<3, { AmountOperation::COUNT }>;

/// Proof requirements: 7 bits per operation.
pub type RequirementLayout = Layout<7, { OperationKey::COUNT }>;

/// Slice accessors over packed configuration words.
#[derive(Debug, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    /// Decode the amount policy of `op` from the policy word.
    pub fn policy(word: &StateWord, op: AmountOperation) -> AmountPolicy {
        PolicyLayout::read(word, op.index())
    }

    /// Replace the amount policy of `op`. The policy is validated first.
    pub fn with_policy(
        word: StateWord,
        op: AmountOperation,
        policy: &AmountPolicy,
    ) -> Result<StateWord, ValidationError> {
        policy.validate()?;
        Ok(PolicyLayout::write(word, op.index(), policy))
    }

    /// Decode the proof requirement of `op` from the requirement word.
    pub fn requirement(word: &StateWord, op: OperationKey) -> ProofRequirement {
        RequirementLayout::read(word, op.index())
    }

    /// Replace the proof requirement of `op`.
    #[must_use]
    pub fn with_requirement(
        word: StateWord,
        op: OperationKey,
        requirement: &ProofRequirement,
    ) -> StateWord {
        RequirementLayout::write(word, op.index(), requirement)
    }

    /// Pack both amount policies into a fresh word.
    pub fn pack_policies(
        mint: &AmountPolicy,
        burn: &AmountPolicy,
    ) -> Result<StateWord, ValidationError> {
        let word = Self::with_policy(StateWord::ZERO, AmountOperation::Mint, mint)?;
        Self::with_policy(word, AmountOperation::Burn, burn)
    }

    /// Pack all four proof requirements, indexed by operation, into a fresh
    /// word.
    pub fn pack_requirements(requirements: &[ProofRequirement; OperationKey::COUNT]) -> StateWord {
        OperationKey::ALL
            .iter()
            .fold(StateWord::ZERO, |word, op| {
                Self::with_requirement(word, *op, &requirements[op.index()])
            })
    }
}

/// Fully decoded configuration, as returned by `get_all_configs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// Mint amount policy.
    pub mint_policy: AmountPolicy,
    /// Burn amount policy.
    pub burn_policy: AmountPolicy,
    /// Mint amount range.
    pub mint_range: AmountRange,
    /// Burn amount range.
    pub burn_range: AmountRange,
    /// Proof requirements indexed by `OperationKey::index()`.
    pub requirements: [ProofRequirement; OperationKey::COUNT],
}

impl ConfigSnapshot {
    /// Decode `[policies, mint range, burn range, requirements]`.
    pub fn from_words(words: &[StateWord; 4]) -> Self {
        let [policies, mint_range, burn_range, requirements] = words;
        Self {
            mint_policy: ConfigStore::policy(policies, AmountOperation::Mint),
            burn_policy: ConfigStore::policy(policies, AmountOperation::Burn),
            mint_range: AmountRange::from_word(mint_range),
            burn_range: AmountRange::from_word(burn_range),
            requirements: OperationKey::ALL.map(|op| ConfigStore::requirement(requirements, op)),
        }
    }

    /// Encode as `[policies, mint range, burn range, requirements]`,
    /// validating every policy and range.
    pub fn to_words(&self) -> Result<[StateWord; 4], ValidationError> {
        self.validate()?;
        Ok([
            ConfigStore::pack_policies(&self.mint_policy, &self.burn_policy)?,
            self.mint_range.to_word(),
            self.burn_range.to_word(),
            ConfigStore::pack_requirements(&self.requirements),
        ])
    }

    /// Run every struct-level validation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.mint_policy.validate()?;
        self.burn_policy.validate()?;
        self.mint_range.validate()?;
        self.burn_range.validate()
    }

    /// Amount policy of `op`.
    pub fn policy(&self, op: AmountOperation) -> AmountPolicy {
        match op {
            AmountOperation::Mint => self.mint_policy,
            AmountOperation::Burn => self.burn_policy,
        }
    }

    /// Amount range of `op`.
    pub fn range(&self, op: AmountOperation) -> AmountRange {
        match op {
            AmountOperation::Mint => self.mint_range,
            AmountOperation::Burn => self.burn_range,
        }
    }

    /// Proof requirement of `op`.
    pub fn requirement(&self, op: OperationKey) -> ProofRequirement {
        self.requirements[op.index()]
    }
}
