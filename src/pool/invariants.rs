use std::collections::BTreeMap;

use ethnum::{I256, U256};
use thiserror::Error;

use crate::{
    libraries::constants::{MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK},
    tick::types::Direction,
};

use super::Pool;

/// First broken consistency rule found by [`Pool::check_invariants`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("liquidity_net over all ticks sums to {0} instead of 0")]
    NetLiquidityNotConserved(I256),

    #[error("active liquidity is {actual} but ticks at or below the current tick sum to {expected}")]
    ActiveLiquidityMismatch { expected: I256, actual: u128 },

    #[error("tick {0} is outside the tick range or not aligned to the spacing")]
    TickNotUsable(i32),

    #[error("tick {0} is stored without gross liquidity")]
    EmptyTickStored(i32),

    #[error("bitmap flag of tick {0} disagrees with the tick map")]
    BitmapMismatch(i32),

    #[error("tick {tick} has gross liquidity {gross} but positions reference {referenced}")]
    GrossLiquidityMismatch {
        tick: i32,
        gross: u128,
        referenced: U256,
    },

    #[error("price {sqrt_price_x96} is outside the valid range or does not belong to tick {tick}")]
    PriceTickMismatch { sqrt_price_x96: U256, tick: i32 },
}

impl Pool {
    /// Verifies every consistency rule between the price state, the tick index and the ledger.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let state = &self.state;

        if state.sqrt_price_x96 < *MIN_SQRT_RATIO
            || state.sqrt_price_x96 >= *MAX_SQRT_RATIO
            || !(MIN_TICK..=MAX_TICK).contains(&state.tick)
            || !state.price_matches_tick()
        {
            return Err(InvariantViolation::PriceTickMismatch {
                sqrt_price_x96: state.sqrt_price_x96,
                tick: state.tick,
            });
        }

        let mut net_sum = I256::ZERO;
        let mut active = I256::ZERO;
        for (tick, info) in self.ticks.iter() {
            if !(MIN_TICK..=MAX_TICK).contains(&tick) || tick % self.tick_spacing() != 0 {
                return Err(InvariantViolation::TickNotUsable(tick));
            }
            if info.liquidity_gross == 0 {
                return Err(InvariantViolation::EmptyTickStored(tick));
            }
            if !self.ticks.is_flagged(tick) {
                return Err(InvariantViolation::BitmapMismatch(tick));
            }
            net_sum += I256::from(info.liquidity_net);
            if tick <= state.tick {
                active += I256::from(info.liquidity_net);
            }
        }

        if net_sum != I256::ZERO {
            return Err(InvariantViolation::NetLiquidityNotConserved(net_sum));
        }
        if active != U256::from(state.liquidity).as_i256() {
            return Err(InvariantViolation::ActiveLiquidityMismatch {
                expected: active,
                actual: state.liquidity,
            });
        }

        // every flagged tick must be stored: walk the bitmap through the directional search
        let mut next = self
            .ticks
            .next_initialized_at_or_below(MIN_TICK)
            .or_else(|| self.ticks.next_initialized(MIN_TICK, Direction::Up));
        while let Some(tick) = next {
            if !self.ticks.is_initialized(tick) {
                return Err(InvariantViolation::BitmapMismatch(tick));
            }
            next = self.ticks.next_initialized(tick, Direction::Up);
        }

        let mut referenced: BTreeMap<i32, U256> = BTreeMap::new();
        for (key, info) in self.positions.iter() {
            for tick in [key.tick_lower, key.tick_upper] {
                *referenced.entry(tick).or_insert(U256::ZERO) += U256::from(info.liquidity);
            }
        }
        for (tick, info) in self.ticks.iter() {
            let from_positions = referenced.remove(&tick).unwrap_or(U256::ZERO);
            if from_positions != U256::from(info.liquidity_gross) {
                return Err(InvariantViolation::GrossLiquidityMismatch {
                    tick,
                    gross: info.liquidity_gross,
                    referenced: from_positions,
                });
            }
        }
        if let Some((tick, referenced)) = referenced.into_iter().next() {
            return Err(InvariantViolation::GrossLiquidityMismatch {
                tick,
                gross: 0,
                referenced,
            });
        }

        Ok(())
    }
}
