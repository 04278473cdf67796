use ic_canister_log::log;

use crate::{
    libraries::{
        constants::{MAX_TICK, MIN_TICK},
        liquidity_math,
    },
    logs::{DEBUG, INFO},
    position::types::{Owner, PositionInfo, PositionKey},
    tick::UpdateTickSuccess,
};

use super::{Pool, error::PoolError};

/// Keeps state changes; on success they are committed together, on failure nothing is written.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ModifyLiquidityBufferState {
    pub position: (PositionKey, PositionInfo),
    pub tick_lower: (i32, UpdateTickSuccess),
    pub tick_upper: (i32, UpdateTickSuccess),
    pub liquidity: u128,
}

impl Pool {
    /// Adds `liquidity_delta` to the position of `owner` over `[tick_lower, tick_upper)`.
    pub fn mint(
        &mut self,
        owner: &Owner,
        tick_lower: i32,
        tick_upper: i32,
        liquidity_delta: u128,
    ) -> Result<(), PoolError> {
        let buffer_state = self
            .modify_liquidity(owner, tick_lower, tick_upper, liquidity_delta, true)
            .inspect_err(|err| {
                log!(
                    DEBUG,
                    "[mint]: rejected {liquidity_delta} for {owner} on [{tick_lower}, {tick_upper}): {err}"
                );
            })?;
        self.apply_modify_liquidity_buffer_state(buffer_state)?;

        log!(
            INFO,
            "[mint]: {owner} added {liquidity_delta} liquidity on [{tick_lower}, {tick_upper}), active liquidity {}",
            self.state.liquidity
        );
        Ok(())
    }

    /// Removes `liquidity_delta` from the position of `owner` over `[tick_lower, tick_upper)`.
    pub fn burn(
        &mut self,
        owner: &Owner,
        tick_lower: i32,
        tick_upper: i32,
        liquidity_delta: u128,
    ) -> Result<(), PoolError> {
        let buffer_state = self
            .modify_liquidity(owner, tick_lower, tick_upper, liquidity_delta, false)
            .inspect_err(|err| {
                log!(
                    DEBUG,
                    "[burn]: rejected {liquidity_delta} for {owner} on [{tick_lower}, {tick_upper}): {err}"
                );
            })?;
        self.apply_modify_liquidity_buffer_state(buffer_state)?;

        log!(
            INFO,
            "[burn]: {owner} removed {liquidity_delta} liquidity on [{tick_lower}, {tick_upper}), active liquidity {}",
            self.state.liquidity
        );
        Ok(())
    }

    fn validate_range(&self, tick_lower: i32, tick_upper: i32) -> Result<(), PoolError> {
        let bounds = MIN_TICK..=MAX_TICK;
        if !bounds.contains(&tick_lower) || !bounds.contains(&tick_upper) {
            return Err(PoolError::OutOfRange);
        }
        let tick_spacing = self.tick_spacing();
        if tick_lower % tick_spacing != 0 || tick_upper % tick_spacing != 0 {
            return Err(PoolError::InvalidTick);
        }
        if tick_lower >= tick_upper {
            return Err(PoolError::InvalidRange);
        }
        Ok(())
    }

    /// Computes every update a mint (`increase`) or burn implies without storing any of them.
    fn modify_liquidity(
        &self,
        owner: &Owner,
        tick_lower: i32,
        tick_upper: i32,
        liquidity_delta: u128,
        increase: bool,
    ) -> Result<ModifyLiquidityBufferState, PoolError> {
        if liquidity_delta == 0 {
            return Err(PoolError::ZeroLiquidity);
        }
        self.validate_range(tick_lower, tick_upper)?;

        let position_key = PositionKey {
            owner: owner.clone(),
            tick_lower,
            tick_upper,
        };
        let position = if increase {
            self.positions.credit(&position_key, liquidity_delta)
        } else {
            self.positions.debit(&position_key, liquidity_delta)
        }
        .map_err(|err| match PoolError::from(err) {
            // a credit can only overflow once the tick maximum is already exceeded
            PoolError::ArithmeticOverflow if increase => PoolError::TickLiquidityOverflow,
            err => err,
        })?;

        // never above the per-tick maximum, which fits in an i128
        let signed_delta = liquidity_math::to_signed(liquidity_delta)
            .map_err(|_| PoolError::TickLiquidityOverflow)?;
        let signed_delta = if increase { signed_delta } else { -signed_delta };

        let lower = self.ticks.update_tick(tick_lower, signed_delta, false)?;
        let upper = self.ticks.update_tick(tick_upper, signed_delta, true)?;

        if increase
            && (lower.liquidity_gross_after > self.max_liquidity_per_tick
                || upper.liquidity_gross_after > self.max_liquidity_per_tick)
        {
            return Err(PoolError::TickLiquidityOverflow);
        }

        let in_range = tick_lower <= self.state.tick && self.state.tick < tick_upper;
        let liquidity = if in_range {
            liquidity_math::add_delta(self.state.liquidity, signed_delta)?
        } else {
            self.state.liquidity
        };

        Ok(ModifyLiquidityBufferState {
            position: (position_key, position.updated_position_info),
            tick_lower: (tick_lower, lower),
            tick_upper: (tick_upper, upper),
            liquidity,
        })
    }

    fn apply_modify_liquidity_buffer_state(
        &mut self,
        buffer_state: ModifyLiquidityBufferState,
    ) -> Result<(), PoolError> {
        let (tick_lower, lower) = buffer_state.tick_lower;
        let (tick_upper, upper) = buffer_state.tick_upper;
        // both ticks passed validation, so committing them cannot fail
        self.ticks.commit_tick(tick_lower, &lower)?;
        self.ticks.commit_tick(tick_upper, &upper)?;

        let (position_key, position_info) = buffer_state.position;
        self.positions.store(position_key, position_info);

        self.state.liquidity = buffer_state.liquidity;
        Ok(())
    }
}
