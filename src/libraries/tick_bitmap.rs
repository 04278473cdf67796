use std::{collections::BTreeMap, ops::Bound};

use ethnum::U256;

use super::{
    bit_math,
    constants::{MAX_TICK, MIN_TICK},
};

/// Rounds towards negative infinity by tick_spacing.
pub fn compress(tick: i32, tick_spacing: i32) -> i32 {
    tick.div_euclid(tick_spacing)
}

/// Computes the position in the bitmap where the initialized bit for a compressed tick lives.
///
/// Returns `(word_pos, bit_pos)`: the key of the 256-bit word holding the flag and the bit
/// index of the flag inside that word.
pub fn position(compressed_tick: i32) -> (i16, u8) {
    // compressed ticks stay within a word of [MIN_TICK, MAX_TICK], so the index fits in an i16
    let word_pos = (compressed_tick >> 8_u32) as i16;
    let bit_pos = (compressed_tick & 0xff) as u8;

    (word_pos, bit_pos)
}

#[derive(Debug, PartialEq)]
pub enum TickBitmapError {
    InvalidTickSpacing(i32),
    TickMisaligned(i32, i32),
    TickOutOfBounds(i32),
}

/// One bit per usable tick, packed into 256-bit words keyed by `compressed_tick >> 8`.
/// Words that become empty are dropped, so the map only holds words with a set bit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickBitmap {
    words: BTreeMap<i16, U256>,
}

impl TickBitmap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn word(&self, word_pos: i16) -> U256 {
        self.words.get(&word_pos).copied().unwrap_or(U256::ZERO)
    }

    fn check_spacing(tick_spacing: i32) -> Result<(), TickBitmapError> {
        if tick_spacing <= 0 {
            return Err(TickBitmapError::InvalidTickSpacing(tick_spacing));
        }
        Ok(())
    }

    fn aligned_position(tick: i32, tick_spacing: i32) -> Result<(i16, u8), TickBitmapError> {
        Self::check_spacing(tick_spacing)?;
        if !(MIN_TICK..=MAX_TICK).contains(&tick) {
            return Err(TickBitmapError::TickOutOfBounds(tick));
        }
        if tick % tick_spacing != 0 {
            return Err(TickBitmapError::TickMisaligned(tick, tick_spacing));
        }
        Ok(position(tick / tick_spacing))
    }

    /// Nearest word strictly before (`lte`) or after `word_pos` with at least one bit set.
    pub fn next_non_empty_word(&self, word_pos: i16, lte: bool) -> Option<i16> {
        let found = if lte {
            self.words
                .range((Bound::Unbounded, Bound::Excluded(word_pos)))
                .next_back()
        } else {
            self.words
                .range((Bound::Excluded(word_pos), Bound::Unbounded))
                .next()
        };
        found.map(|(word_pos, _)| *word_pos)
    }

    /// Flips the initialized state for a given tick from false to true, or vice versa.
    pub fn flip_tick(&mut self, tick: i32, tick_spacing: i32) -> Result<(), TickBitmapError> {
        let (word_pos, bit_pos) = Self::aligned_position(tick, tick_spacing)?;

        let flipped = self.word(word_pos) ^ (U256::ONE << bit_pos);
        if flipped == U256::ZERO {
            self.words.remove(&word_pos);
        } else {
            self.words.insert(word_pos, flipped);
        }
        Ok(())
    }

    pub fn is_initialized(&self, tick: i32, tick_spacing: i32) -> bool {
        match Self::aligned_position(tick, tick_spacing) {
            Ok((word_pos, bit_pos)) => self.word(word_pos) & (U256::ONE << bit_pos) != U256::ZERO,
            Err(_) => false,
        }
    }

    /// Returns the next initialized tick contained in the same word as the tick that is either
    /// to the left (less than or equal to) or right (greater than) of the given tick.
    ///
    /// # Returns
    /// * `next` - The next initialized tick, or the last tick of the scanned word if none is
    ///   set. May lie outside `[MIN_TICK, MAX_TICK]` at the edges of the range.
    /// * `initialized` - Whether `next` is initialized.
    pub fn next_initialized_tick_within_one_word(
        &self,
        tick: i32,
        tick_spacing: i32,
        lte: bool,
    ) -> Result<(i32, bool), TickBitmapError> {
        Self::check_spacing(tick_spacing)?;

        let compressed = compress(tick, tick_spacing);

        let next = if lte {
            let (word_pos, bit_pos) = position(compressed);

            // all the 1s at or to the right of bit_pos
            let mask = U256::MAX >> (255_u32 - bit_pos as u32);
            let masked = self.word(word_pos) & mask;

            match bit_math::get_msb_bit_position(&masked) {
                Some(msb) => (
                    (compressed - (bit_pos as i32 - msb as i32)) * tick_spacing,
                    true,
                ),
                None => ((compressed - bit_pos as i32) * tick_spacing, false),
            }
        } else {
            let compressed_plus_one = compressed + 1;
            let (word_pos, bit_pos) = position(compressed_plus_one);

            // all the 1s at or to the left of bit_pos
            let mask = !((U256::ONE << bit_pos) - U256::ONE);
            let masked = self.word(word_pos) & mask;

            match bit_math::get_lsb_bit_position(&masked) {
                Some(lsb) => (
                    (compressed_plus_one + (lsb as i32 - bit_pos as i32)) * tick_spacing,
                    true,
                ),
                None => (
                    (compressed_plus_one + (255_i32 - bit_pos as i32)) * tick_spacing,
                    false,
                ),
            }
        };

        Ok(next)
    }
}
