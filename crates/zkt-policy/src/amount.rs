//! # Amount Policy and Range
//!
//! An [`AmountPolicy`] says *how* a mint or burn magnitude is judged (exact
//! fixed amount, or inside a range) and whether the administrator must
//! co-sign. An [`AmountRange`] carries the numbers it is judged against.
//!
//! ## Invariants
//!
//! - Policy: exactly one of `fixed_amount` / `ranged_amount` is set.
//! - Range: `min_amount < max_amount`, strictly. `fixed_amount` is stored
//!   whatever the active mode is.

use serde::{Deserialize, Serialize};

use zkt_core::{StateWord, ValidationError};

use crate::bitfield::Flags;

/// How mint/burn magnitudes are judged for one amount operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AmountPolicy {
    /// No administrator co-signature is required.
    pub unauthorized: bool,
    /// The magnitude must equal `AmountRange::fixed_amount`.
    pub fixed_amount: bool,
    /// The magnitude must lie in `[min_amount, max_amount]`.
    pub ranged_amount: bool,
}

impl AmountPolicy {
    /// Fixed-amount policy.
    pub fn fixed(unauthorized: bool) -> Self {
        Self {
            unauthorized,
            fixed_amount: true,
            ranged_amount: false,
        }
    }

    /// Ranged-amount policy.
    pub fn ranged(unauthorized: bool) -> Self {
        Self {
            unauthorized,
            fixed_amount: false,
            ranged_amount: true,
        }
    }

    /// Fails with `InvalidPolicy` unless exactly one mode flag is set.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.fixed_amount == self.ranged_amount {
            return Err(ValidationError::InvalidPolicy {
                fixed_amount: self.fixed_amount,
                ranged_amount: self.ranged_amount,
            });
        }
        Ok(())
    }
}

impl Flags<3> for AmountPolicy {
    fn to_flags(&self) -> [bool; 3] {
        [self.unauthorized, self.fixed_amount, self.ranged_amount]
    }

    fn from_flags(flags: [bool; 3]) -> Self {
        let [unauthorized, fixed_amount, ranged_amount] = flags;
        Self {
            unauthorized,
            fixed_amount,
            ranged_amount,
        }
    }
}

/// Selects one field of an [`AmountRange`] for a field-level update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeField {
    /// `fixed_amount`.
    FixedAmount,
    /// `min_amount`.
    MinAmount,
    /// `max_amount`.
    MaxAmount,
}

/// Caller-supplied values for [`AmountRange::create`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeOverrides {
    /// Exact amount, allowed only with a fixed policy.
    #[serde(default)]
    pub fixed_amount: Option<u64>,
    /// Lower bound, allowed only with a ranged policy.
    #[serde(default)]
    pub min_amount: Option<u64>,
    /// Upper bound, allowed only with a ranged policy.
    #[serde(default)]
    pub max_amount: Option<u64>,
}

/// Amount parameters for one amount operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AmountRange {
    /// Exact magnitude accepted under a fixed policy.
    pub fixed_amount: u64,
    /// Smallest magnitude accepted under a ranged policy.
    pub min_amount: u64,
    /// Largest magnitude accepted under a ranged policy.
    pub max_amount: u64,
}

impl AmountRange {
    /// Base values that [`AmountRange::create`] starts from.
    pub const DEFAULT: AmountRange = AmountRange {
        fixed_amount: 200,
        min_amount: 1,
        max_amount: 1000,
    };

    const FIXED_LANE: usize = 0;
    const MIN_LANE: usize = 1;
    const MAX_LANE: usize = 2;

    /// Fails with `InvalidRange` unless `min_amount < max_amount`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.min_amount >= self.max_amount {
            return Err(ValidationError::InvalidRange {
                min_amount: self.min_amount,
                max_amount: self.max_amount,
            });
        }
        Ok(())
    }

    /// Build a range for `policy` from [`AmountRange::DEFAULT`] plus the
    /// fields the policy's mode allows the caller to supply.
    ///
    /// A fixed policy accepts only `fixed_amount`; a ranged policy accepts
    /// only `min_amount` and `max_amount`. Anything else is
    /// `InvalidPolicyData`.
    pub fn create(policy: &AmountPolicy, overrides: RangeOverrides) -> Result<Self, ValidationError> {
        policy.validate()?;
        let mut range = Self::DEFAULT;
        if policy.fixed_amount {
            if overrides.min_amount.is_some() || overrides.max_amount.is_some() {
                return Err(ValidationError::InvalidPolicyData(
                    "a fixed-amount policy accepts only fixed_amount".to_string(),
                ));
            }
            if let Some(fixed) = overrides.fixed_amount {
                range.fixed_amount = fixed;
            }
        } else {
            if overrides.fixed_amount.is_some() {
                return Err(ValidationError::InvalidPolicyData(
                    "a ranged-amount policy accepts only min_amount and max_amount".to_string(),
                ));
            }
            if let Some(min) = overrides.min_amount {
                range.min_amount = min;
            }
            if let Some(max) = overrides.max_amount {
                range.max_amount = max;
            }
        }
        range.validate()?;
        Ok(range)
    }

    /// Return a copy with `field` replaced, validated as a whole.
    pub fn with_field(&self, field: RangeField, value: u64) -> Result<Self, ValidationError> {
        let mut next = *self;
        match field {
            RangeField::FixedAmount => next.fixed_amount = value,
            RangeField::MinAmount => next.min_amount = value,
            RangeField::MaxAmount => next.max_amount = value,
        }
        next.validate()?;
        Ok(next)
    }

    /// Replace `fixed_amount`. On failure `self` is unchanged.
    pub fn set_fixed_amount(&mut self, value: u64) -> Result<(), ValidationError> {
        *self = self.with_field(RangeField::FixedAmount, value)?;
        Ok(())
    }

    /// Replace `min_amount`. On failure `self` is unchanged.
    pub fn set_min_amount(&mut self, value: u64) -> Result<(), ValidationError> {
        *self = self.with_field(RangeField::MinAmount, value)?;
        Ok(())
    }

    /// Replace `max_amount`. On failure `self` is unchanged.
    pub fn set_max_amount(&mut self, value: u64) -> Result<(), ValidationError> {
        *self = self.with_field(RangeField::MaxAmount, value)?;
        Ok(())
    }

    /// Whether `magnitude` equals the fixed amount.
    pub fn is_fixed(&self, magnitude: u64) -> bool {
        magnitude == self.fixed_amount
    }

    /// Whether `magnitude` lies in `[min_amount, max_amount]`.
    pub fn is_in_range(&self, magnitude: u64) -> bool {
        self.min_amount <= magnitude && magnitude <= self.max_amount
    }

    /// Encode as three 64-bit lanes.
    pub fn to_word(&self) -> StateWord {
        StateWord::ZERO
            .with_lane(Self::FIXED_LANE, self.fixed_amount)
            .with_lane(Self::MIN_LANE, self.min_amount)
            .with_lane(Self::MAX_LANE, self.max_amount)
    }

    /// Decode from three 64-bit lanes. The result is not validated.
    pub fn from_word(word: &StateWord) -> Self {
        Self {
            fixed_amount: word.lane(Self::FIXED_LANE),
            min_amount: word.lane(Self::MIN_LANE),
            max_amount: word.lane(Self::MAX_LANE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn policy_validation_truth_table() {
        for (fixed, ranged, ok) in [
            (false, false, false),
            (true, false, true),
            (false, true, true),
            (true, true, false),
        ] {
            for unauthorized in [false, true] {
                let p = AmountPolicy {
                    unauthorized,
                    fixed_amount: fixed,
                    ranged_amount: ranged,
                };
                assert_eq!(p.validate().is_ok(), ok, "fixed={fixed} ranged={ranged}");
            }
        }
    }

    #[test]
    fn range_boundary() {
        let max = 1000;
        let accept = AmountRange { fixed_amount: 0, min_amount: max - 1, max_amount: max };
        let reject = AmountRange { fixed_amount: 0, min_amount: max, max_amount: max };
        assert!(accept.validate().is_ok());
        assert_eq!(
            reject.validate(),
            Err(ValidationError::InvalidRange { min_amount: max, max_amount: max })
        );
    }

    #[test]
    fn create_fixed_accepts_only_fixed_amount() {
        let policy = AmountPolicy::fixed(true);
        let r = AmountRange::create(&policy, RangeOverrides { fixed_amount: Some(200), ..Default::default() }).unwrap();
        assert_eq!(r.fixed_amount, 200);
        let err = AmountRange::create(&policy, RangeOverrides { min_amount: Some(5), ..Default::default() });
        assert!(matches!(err, Err(ValidationError::InvalidPolicyData(_))));
    }

    #[test]
    fn create_ranged_accepts_only_bounds() {
        let policy = AmountPolicy::ranged(false);
        let r = AmountRange::create(
            &policy,
            RangeOverrides { min_amount: Some(0), max_amount: Some(1000), ..Default::default() },
        )
        .unwrap();
        assert_eq!((r.min_amount, r.max_amount), (0, 1000));
        assert_eq!(r.fixed_amount, AmountRange::DEFAULT.fixed_amount);
        let err = AmountRange::create(&policy, RangeOverrides { fixed_amount: Some(1), ..Default::default() });
        assert!(matches!(err, Err(ValidationError::InvalidPolicyData(_))));
    }

    #[test]
    fn create_rejects_invalid_policy_and_bounds() {
        let bad = AmountPolicy { unauthorized: false, fixed_amount: true, ranged_amount: true };
        assert!(matches!(
            AmountRange::create(&bad, RangeOverrides::default()),
            Err(ValidationError::InvalidPolicy { .. })
        ));
        let err = AmountRange::create(
            &AmountPolicy::ranged(false),
            RangeOverrides { min_amount: Some(10), max_amount: Some(5), ..Default::default() },
        );
        assert!(matches!(err, Err(ValidationError::InvalidRange { .. })));
    }

    #[test]
    fn setter_rejects_and_leaves_struct_untouched() {
        let mut r = AmountRange { fixed_amount: 5, min_amount: 10, max_amount: 20 };
        assert!(r.set_min_amount(20).is_err());
        assert_eq!(r, AmountRange { fixed_amount: 5, min_amount: 10, max_amount: 20 });
        assert!(r.set_max_amount(9).is_err());
        assert_eq!(r.max_amount, 20);
        r.set_max_amount(30).unwrap();
        r.set_fixed_amount(999).unwrap();
        assert_eq!(r, AmountRange { fixed_amount: 999, min_amount: 10, max_amount: 30 });
    }

    #[test]
    fn membership() {
        let r = AmountRange { fixed_amount: 200, min_amount: 0, max_amount: 1000 };
        assert!(r.is_fixed(200));
        assert!(!r.is_fixed(199));
        assert!(r.is_in_range(0) && r.is_in_range(1000));
        assert!(!r.is_in_range(1001));
    }

    proptest! {
        #[test]
        fn range_word_roundtrip(fixed in any::<u64>(), min in any::<u64>(), max in any::<u64>()) {
            let r = AmountRange { fixed_amount: fixed, min_amount: min, max_amount: max };
            prop_assert_eq!(AmountRange::from_word(&r.to_word()), r);
        }

        #[test]
        fn range_valid_iff_strictly_ordered(min in any::<u64>(), max in any::<u64>()) {
            let r = AmountRange { fixed_amount: 0, min_amount: min, max_amount: max };
            prop_assert_eq!(r.validate().is_ok(), min < max);
        }
    }
}
