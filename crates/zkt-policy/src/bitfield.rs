//! # Bitfield Codec
//!
//! Converts fixed-width flag arrays to and from bit ranges of a
//! [`StateWord`]. Flags are written in declaration order starting at the
//! slot offset: flag `k` of slot `s` lives at bit `s * WIDTH + k`.
//!
//! [`Layout`] fixes `WIDTH` and the number of slots as const parameters and
//! rejects, at compile time, any layout whose slots would run past the end
//! of the word. Slots are addressed by enum index, so two operations can
//! never share bits.

use zkt_core::word::WORD_BITS;
use zkt_core::StateWord;

/// A struct that is a fixed-width array of boolean flags.
pub trait Flags<const N: usize>: Sized + Copy {
    /// Flags in declaration order.
    fn to_flags(&self) -> [bool; N];
    /// Rebuild from flags in declaration order.
    fn from_flags(flags: [bool; N]) -> Self;
}

/// Write `flags` into `word` starting at bit `offset`.
#[must_use]
pub fn pack<const N: usize>(word: StateWord, offset: usize, flags: [bool; N]) -> StateWord {
    flags
        .iter()
        .enumerate()
        .fold(word, |w, (k, flag)| w.with_bit(offset + k, *flag))
}

/// Read `N` flags from `word` starting at bit `offset`.
pub fn unpack<const N: usize>(word: &StateWord, offset: usize) -> [bool; N] {
    let mut flags = [false; N];
    for (k, flag) in flags.iter_mut().enumerate() {
        *flag = word.bit(offset + k);
    }
    flags
}

/// A packing layout of `SLOTS` consecutive `WIDTH`-bit slots.
#[derive(Debug, Clone, Copy)]
pub struct Layout<const WIDTH: usize, const SLOTS: usize>;

impl<const WIDTH: usize, const SLOTS: usize> Layout<WIDTH, SLOTS> {
    const FITS: () = assert!(
        WIDTH * SLOTS <= WORD_BITS,
        "packed slots overflow a 256-bit state word"
    );

    /// First bit of `slot`.
    pub fn offset(slot: usize) -> usize {
        #[allow(clippy::let_unit_value)]
        let () = Self::FITS;
        debug_assert!(slot < SLOTS, "slot {slot} out of range");
        slot * WIDTH
    }

    /// Decode the value stored in `slot`.
    pub fn read<T: Flags<WIDTH>>(word: &StateWord, slot: usize) -> T {
        T::from_flags(unpack::<WIDTH>(word, Self::offset(slot)))
    }

    /// Encode `value` into `slot`, leaving every other bit untouched.
    #[must_use]
    pub fn write<T: Flags<WIDTH>>(word: StateWord, slot: usize, value: &T) -> StateWord {
        pack(word, Self::offset(slot), value.to_flags())
    }
}
