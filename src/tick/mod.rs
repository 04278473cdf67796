use std::collections::BTreeMap;

use crate::libraries::{
    constants::{MAX_TICK, MIN_TICK},
    liquidity_math::{self, AddDeltaError},
    tick_bitmap::{TickBitmap, TickBitmapError, compress, position},
};
use types::{Direction, TickInfo};

pub mod types;

#[cfg(test)]
pub mod tests;

/// Derives max liquidity per tick from tick spacing.
/// Used in pool initialization.
pub fn tick_spacing_to_max_liquidity_per_tick(tick_spacing: i32) -> u128 {
    let min_tick = (MIN_TICK / tick_spacing) * tick_spacing;
    let max_tick = (MAX_TICK / tick_spacing) * tick_spacing;
    let num_ticks = ((max_tick - min_tick) / tick_spacing) as u32 + 1;
    u128::MAX / num_ticks as u128
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickIndexError {
    InvalidTickSpacing(i32),
    OutOfRange(i32),
    InvalidTick(i32),
}

impl From<TickBitmapError> for TickIndexError {
    fn from(error: TickBitmapError) -> Self {
        match error {
            TickBitmapError::InvalidTickSpacing(spacing) => {
                TickIndexError::InvalidTickSpacing(spacing)
            }
            TickBitmapError::TickMisaligned(tick, _) => TickIndexError::InvalidTick(tick),
            TickBitmapError::TickOutOfBounds(tick) => TickIndexError::OutOfRange(tick),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateTickError {
    TickIndex(TickIndexError),
    AddDeltaError(AddDeltaError),
    LiquidityNetOverflow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTickSuccess {
    pub flipped: bool,
    pub liquidity_gross_after: u128,
    pub updated_tick_info: TickInfo,
}

/// Sparse per-tick liquidity map of one pool.
///
/// `ticks` holds only initialized ticks (`liquidity_gross > 0`) and the bitmap has exactly one
/// bit set per entry of `ticks`, which the directional searches rely on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickIndex {
    tick_spacing: i32,
    ticks: BTreeMap<i32, TickInfo>,
    bitmap: TickBitmap,
}

impl TickIndex {
    pub fn new(tick_spacing: i32) -> Self {
        Self {
            tick_spacing,
            ticks: BTreeMap::new(),
            bitmap: TickBitmap::new(),
        }
    }

    pub fn tick_spacing(&self) -> i32 {
        self.tick_spacing
    }

    pub fn validate_tick(&self, tick: i32) -> Result<(), TickIndexError> {
        if self.tick_spacing <= 0 {
            return Err(TickIndexError::InvalidTickSpacing(self.tick_spacing));
        }
        if !(MIN_TICK..=MAX_TICK).contains(&tick) {
            return Err(TickIndexError::OutOfRange(tick));
        }
        if tick % self.tick_spacing != 0 {
            return Err(TickIndexError::InvalidTick(tick));
        }
        Ok(())
    }

    /// Returns the stored entry, or the zero entry for an uninitialized tick.
    pub fn query(&self, tick: i32) -> TickInfo {
        self.ticks.get(&tick).copied().unwrap_or_default()
    }

    pub fn liquidity_gross(&self, tick: i32) -> u128 {
        self.query(tick).liquidity_gross
    }

    pub fn liquidity_net(&self, tick: i32) -> i128 {
        self.query(tick).liquidity_net
    }

    pub fn is_initialized(&self, tick: i32) -> bool {
        self.ticks.contains_key(&tick)
    }

    pub fn is_flagged(&self, tick: i32) -> bool {
        self.bitmap.is_initialized(tick, self.tick_spacing)
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    /// Initialized ticks in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, TickInfo)> + '_ {
        self.ticks.iter().map(|(tick, info)| (*tick, *info))
    }

    /// Computes the entry `tick` would hold after adding `liquidity_delta` to its gross
    /// liquidity. `upper` selects the sign applied to `liquidity_net`.
    ///
    /// Nothing is stored: callers run every fallible step of an operation first and then
    /// persist all results through [`TickIndex::commit_tick`], so a failing operation never
    /// leaves a partial update behind.
    pub fn update_tick(
        &self,
        tick: i32,
        liquidity_delta: i128,
        upper: bool,
    ) -> Result<UpdateTickSuccess, UpdateTickError> {
        self.validate_tick(tick)
            .map_err(UpdateTickError::TickIndex)?;

        let mut tick_info = self.query(tick);

        let liquidity_gross_before = tick_info.liquidity_gross;
        let liquidity_gross_after =
            liquidity_math::add_delta(liquidity_gross_before, liquidity_delta)
                .map_err(UpdateTickError::AddDeltaError)?;

        let flipped = (liquidity_gross_after == 0) != (liquidity_gross_before == 0);

        tick_info.liquidity_gross = liquidity_gross_after;

        // when the lower (upper) tick is crossed left to right, liquidity must be added (removed)
        // when the lower (upper) tick is crossed right to left, liquidity must be removed (added)
        tick_info.liquidity_net = if upper {
            tick_info
                .liquidity_net
                .checked_sub(liquidity_delta)
                .ok_or(UpdateTickError::LiquidityNetOverflow)?
        } else {
            tick_info
                .liquidity_net
                .checked_add(liquidity_delta)
                .ok_or(UpdateTickError::LiquidityNetOverflow)?
        };

        Ok(UpdateTickSuccess {
            flipped,
            liquidity_gross_after,
            updated_tick_info: tick_info,
        })
    }

    /// Stores an entry computed by [`TickIndex::update_tick`]. Entries whose gross liquidity
    /// dropped to zero are purged, and the bitmap follows every initialization change.
    pub fn commit_tick(
        &mut self,
        tick: i32,
        update: &UpdateTickSuccess,
    ) -> Result<(), TickIndexError> {
        if update.flipped {
            self.bitmap.flip_tick(tick, self.tick_spacing)?;
        }
        if update.liquidity_gross_after == 0 {
            self.ticks.remove(&tick);
        } else {
            self.ticks.insert(tick, update.updated_tick_info);
        }
        Ok(())
    }

    /// Adds `delta` to the gross liquidity of `tick` and to (`is_lower`) or from its net
    /// liquidity, initializing the tick when needed.
    pub fn apply(&mut self, tick: i32, delta: u128, is_lower: bool) -> Result<(), UpdateTickError> {
        let delta = liquidity_math::to_signed(delta).map_err(UpdateTickError::AddDeltaError)?;
        let update = self.update_tick(tick, delta, !is_lower)?;
        self.commit_tick(tick, &update)
            .map_err(UpdateTickError::TickIndex)
    }

    /// Exact inverse of [`TickIndex::apply`]. Purges the tick once nothing references it.
    pub fn unapply(
        &mut self,
        tick: i32,
        delta: u128,
        is_lower: bool,
    ) -> Result<(), UpdateTickError> {
        let delta = liquidity_math::to_signed(delta).map_err(UpdateTickError::AddDeltaError)?;
        let update = self.update_tick(tick, -delta, !is_lower)?;
        self.commit_tick(tick, &update)
            .map_err(UpdateTickError::TickIndex)
    }

    /// Nearest initialized tick strictly above (`Up`) or strictly below (`Down`) `tick`.
    ///
    /// `tick` does not need to be aligned to the spacing. Returns `None` when no initialized
    /// tick exists on that side.
    pub fn next_initialized(&self, tick: i32, direction: Direction) -> Option<i32> {
        match direction {
            Direction::Up => self.next_initialized_above(tick),
            Direction::Down => {
                if tick <= MIN_TICK {
                    return None;
                }
                self.next_initialized_at_or_below(tick - 1)
            }
        }
    }

    /// Nearest initialized tick less than or equal to `tick`.
    pub fn next_initialized_at_or_below(&self, tick: i32) -> Option<i32> {
        let spacing = self.tick_spacing;

        let (next, initialized) = self
            .bitmap
            .next_initialized_tick_within_one_word(tick, spacing, true)
            .ok()?;
        if initialized {
            return Some(next);
        }

        let (word_pos, _) = position(compress(tick, spacing));
        let word_pos = self.bitmap.next_non_empty_word(word_pos, true)?;

        // scan the found word from its last bit
        let last_in_word = (word_pos as i32 * 256 + 255) * spacing;
        let (next, initialized) = self
            .bitmap
            .next_initialized_tick_within_one_word(last_in_word, spacing, true)
            .ok()?;
        initialized.then_some(next)
    }

    fn next_initialized_above(&self, tick: i32) -> Option<i32> {
        if tick >= MAX_TICK {
            return None;
        }
        let spacing = self.tick_spacing;

        let (next, initialized) = self
            .bitmap
            .next_initialized_tick_within_one_word(tick, spacing, false)
            .ok()?;
        if initialized {
            return Some(next);
        }

        let (word_pos, _) = position(compress(tick, spacing) + 1);
        let word_pos = self.bitmap.next_non_empty_word(word_pos, false)?;

        // scan the found word from its first bit
        let before_word = (word_pos as i32 * 256 - 1) * spacing;
        let (next, initialized) = self
            .bitmap
            .next_initialized_tick_within_one_word(before_word, spacing, false)
            .ok()?;
        initialized.then_some(next)
    }
}
