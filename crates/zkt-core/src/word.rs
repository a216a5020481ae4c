//! # State Words
//!
//! A `StateWord` is one 256-bit on-chain app-state slot. Everything the
//! contract persists (packed configuration, registry root, administrator,
//! flags) is stored as one of these.
//!
//! ## Addressing
//!
//! - Bit `i` is bit `i % 8` of byte `i / 8` (little-endian bit order).
//! - 64-bit lane `j` occupies bytes `8j..8j+8`, little-endian.
//!
//! These rules are part of the bit-exact storage surface: the packed
//! configuration words returned by `get_all_configs()` are decoded off-chain
//! with exactly this addressing.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::hex;
use crate::identity::{Address, VkFingerprint};

/// Number of addressable bits in a word.
pub const WORD_BITS: usize = 256;

/// Number of 64-bit lanes in a word.
pub const WORD_LANES: usize = 4;

/// One 256-bit on-chain word.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StateWord(pub [u8; 32]);

impl StateWord {
    /// The all-zero word.
    pub const ZERO: StateWord = StateWord([0u8; 32]);

    /// Read bit `index`. Out-of-range bits read as `false`.
    pub fn bit(&self, index: usize) -> bool {
        if index >= WORD_BITS {
            return false;
        }
        (self.0[index / 8] >> (index % 8)) & 1 == 1
    }

    /// Return a copy with bit `index` set to `value`. Out-of-range indices
    /// leave the word unchanged.
    #[must_use]
    pub fn with_bit(mut self, index: usize, value: bool) -> Self {
        if index < WORD_BITS {
            let mask = 1u8 << (index % 8);
            if value {
                self.0[index / 8] |= mask;
            } else {
                self.0[index / 8] &= !mask;
            }
        }
        self
    }

    /// Read 64-bit lane `lane`. Out-of-range lanes read as zero.
    pub fn lane(&self, lane: usize) -> u64 {
        if lane >= WORD_LANES {
            return 0;
        }
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&self.0[lane * 8..lane * 8 + 8]);
        u64::from_le_bytes(bytes)
    }

    /// Return a copy with 64-bit lane `lane` set to `value`.
    #[must_use]
    pub fn with_lane(mut self, lane: usize, value: u64) -> Self {
        if lane < WORD_LANES {
            self.0[lane * 8..lane * 8 + 8].copy_from_slice(&value.to_le_bytes());
        }
        self
    }

    /// Word holding a single `u64` in lane 0.
    pub fn from_u64(value: u64) -> Self {
        Self::ZERO.with_lane(0, value)
    }

    /// Render as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl From<Address> for StateWord {
    fn from(addr: Address) -> Self {
        Self(addr.0)
    }
}

impl From<StateWord> for Address {
    fn from(word: StateWord) -> Self {
        Address(word.0)
    }
}

impl From<VkFingerprint> for StateWord {
    fn from(fp: VkFingerprint) -> Self {
        Self(fp.0)
    }
}

impl Serialize for StateWord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for StateWord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode_32(&s).map(Self).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for StateWord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StateWord({})", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn bit_zero_is_lsb_of_first_byte() {
        let w = StateWord::ZERO.with_bit(0, true);
        assert_eq!(w.0[0], 0b0000_0001);
        let w = StateWord::ZERO.with_bit(9, true);
        assert_eq!(w.0[1], 0b0000_0010);
    }

    #[test]
    fn clearing_a_bit() {
        let w = StateWord::ZERO.with_bit(5, true).with_bit(5, false);
        assert_eq!(w, StateWord::ZERO);
    }

    #[test]
    fn out_of_range_bit_is_ignored() {
        let w = StateWord::ZERO.with_bit(WORD_BITS, true);
        assert_eq!(w, StateWord::ZERO);
        assert!(!w.bit(WORD_BITS + 3));
    }

    #[test]
    fn lane_layout_little_endian() {
        let w = StateWord::ZERO.with_lane(1, 0x0102);
        assert_eq!(w.0[8], 0x02);
        assert_eq!(w.0[9], 0x01);
        assert_eq!(w.lane(1), 0x0102);
        assert_eq!(w.lane(0), 0);
    }

    #[test]
    fn serde_hex() {
        let w = StateWord::from_u64(7);
        let json = serde_json::to_string(&w).unwrap();
        let back: StateWord = serde_json::from_str(&json).unwrap();
        assert_eq!(w, back);
    }

    proptest! {
        #[test]
        fn lanes_are_independent(a in any::<u64>(), b in any::<u64>(), lane in 0usize..4) {
            let other = (lane + 1) % WORD_LANES;
            let w = StateWord::ZERO.with_lane(other, b).with_lane(lane, a);
            prop_assert_eq!(w.lane(lane), a);
            prop_assert_eq!(w.lane(other), b);
        }

        #[test]
        fn setting_a_bit_touches_only_that_bit(seed in any::<[u8; 32]>(), index in 0usize..256, value in any::<bool>()) {
            let before = StateWord(seed);
            let after = before.with_bit(index, value);
            prop_assert_eq!(after.bit(index), value);
            for i in (0..WORD_BITS).filter(|i| *i != index) {
                prop_assert_eq!(after.bit(i), before.bit(i));
            }
        }
    }
}
