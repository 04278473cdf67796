use ethnum::U256;
use ic_canister_log::log;

use crate::{
    libraries::{
        constants::{MAX_SQRT_RATIO, MIN_SQRT_RATIO},
        liquidity_math,
        swap_math::{compute_swap_step, get_sqrt_price_target},
        tick_math::TickMath,
    },
    logs::{DEBUG, INFO},
    tick::types::Direction,
};

use super::{
    Pool,
    error::PoolError,
    types::{PoolState, SwapSuccess},
};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SwapParams {
    pub zero_for_one: bool,
    // exact input amount
    pub amount_specified: U256,
    pub sqrt_price_limit_x96: U256,
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct StepComputations {
    // the price at the beginning of the step
    pub sqrt_price_start_x96: U256,
    // the next initialized tick in the swap direction
    pub tick_next: i32,
    // sqrt(price) for the next tick
    pub sqrt_price_next_x96: U256,
    // liquidity the step trades against
    pub liquidity: u128,
    // how much is being swapped in in this step
    pub amount_in: U256,
    // how much is being swapped out
    pub amount_out: U256,
}

impl Pool {
    /// Exact-input swap that stops once the input is spent, the price reaches
    /// `sqrt_price_limit_x96`, or no initialized tick is left in the direction of travel.
    ///
    /// `zero_for_one` sells token0 and moves the price down; otherwise token1 is sold and the
    /// price moves up. Running out of liquidity is reported through `amount_remaining`.
    pub fn swap(
        &mut self,
        zero_for_one: bool,
        amount_specified: U256,
        sqrt_price_limit_x96: U256,
    ) -> Result<SwapSuccess, PoolError> {
        let params = SwapParams {
            zero_for_one,
            amount_specified,
            sqrt_price_limit_x96,
        };
        let success = self.swap_inner(&params).inspect_err(|err| {
            log!(DEBUG, "[swap]: rejected {params:?}: {err}");
        })?;

        if success.amount_in != U256::ZERO || success.state != self.state {
            log!(
                INFO,
                "[swap]: zero_for_one {zero_for_one}, in {}, out {}, crossed {} ticks, tick {} -> {}",
                success.amount_in,
                success.amount_out,
                success.ticks_crossed,
                self.state.tick,
                success.state.tick
            );
        }
        self.state = success.state.clone();
        Ok(success)
    }

    /// Runs a swap against the current state without changing it.
    pub fn quote_swap(
        &self,
        zero_for_one: bool,
        amount_specified: U256,
        sqrt_price_limit_x96: U256,
    ) -> Result<SwapSuccess, PoolError> {
        self.swap_inner(&SwapParams {
            zero_for_one,
            amount_specified,
            sqrt_price_limit_x96,
        })
    }

    /// Walks the price on a working copy of the state. Only liquidity and price move during a
    /// swap, so the returned state is everything the caller has to write back.
    fn swap_inner(&self, params: &SwapParams) -> Result<SwapSuccess, PoolError> {
        let zero_for_one = params.zero_for_one;
        let limit = params.sqrt_price_limit_x96;

        if limit < *MIN_SQRT_RATIO || limit > *MAX_SQRT_RATIO {
            return Err(PoolError::OutOfRange);
        }
        // the price must stay strictly below MAX_SQRT_RATIO
        let limit = limit.min(*MAX_SQRT_RATIO - U256::ONE);

        let mut state = self.state.clone();
        let mut amount_remaining = params.amount_specified;
        let mut amount_out = U256::ZERO;
        let mut ticks_crossed = 0_u32;

        let limit_ahead = if zero_for_one {
            limit < state.sqrt_price_x96
        } else {
            limit > state.sqrt_price_x96
        };
        if amount_remaining == U256::ZERO || !limit_ahead {
            return Ok(SwapSuccess {
                amount_in: U256::ZERO,
                amount_out,
                amount_remaining,
                ticks_crossed,
                state,
            });
        }

        // continue swapping as long as we haven't used the entire input and haven't reached the
        // price limit
        while amount_remaining != U256::ZERO && state.sqrt_price_x96 != limit {
            let mut step = StepComputations {
                sqrt_price_start_x96: state.sqrt_price_x96,
                liquidity: state.liquidity,
                ..Default::default()
            };

            // Moving down from a price sitting exactly on an initialized tick leaves that tick,
            // so its liquidity_net comes off for this step. It is only committed if the price
            // actually moves below the boundary.
            let mut pending_cross = false;
            let tick_next = if zero_for_one {
                let on_boundary =
                    state.sqrt_price_x96 == TickMath::get_sqrt_ratio_at_tick(state.tick)?;
                if on_boundary {
                    if self.ticks.is_initialized(state.tick) {
                        pending_cross = true;
                        step.liquidity = liquidity_math::add_delta(
                            state.liquidity,
                            -self.ticks.liquidity_net(state.tick),
                        )?;
                    }
                    self.ticks.next_initialized(state.tick, Direction::Down)
                } else {
                    self.ticks.next_initialized_at_or_below(state.tick)
                }
            } else {
                self.ticks.next_initialized(state.tick, Direction::Up)
            };

            let Some(tick_next) = tick_next else {
                log!(DEBUG, "[swap]: no initialized tick beyond {}", state.tick);
                break;
            };
            step.tick_next = tick_next;
            step.sqrt_price_next_x96 = TickMath::get_sqrt_ratio_at_tick(tick_next)?;

            let sqrt_price_target_x96 =
                get_sqrt_price_target(zero_for_one, step.sqrt_price_next_x96, limit);

            let swap_step = compute_swap_step(
                state.sqrt_price_x96,
                sqrt_price_target_x96,
                step.liquidity,
                amount_remaining,
            )?;
            step.amount_in = swap_step.amount_in;
            step.amount_out = swap_step.amount_out;

            amount_remaining -= step.amount_in;
            amount_out = amount_out
                .checked_add(step.amount_out)
                .ok_or(PoolError::ArithmeticOverflow)?;

            let sqrt_price_after = swap_step.sqrt_price_next_x96;
            if sqrt_price_after == step.sqrt_price_start_x96 {
                // dust input that cannot move the price
                continue;
            }

            if pending_cross {
                state.liquidity = step.liquidity;
                ticks_crossed += 1;
                log!(DEBUG, "[swap]: crossed tick {} downward", state.tick);
            }
            state.sqrt_price_x96 = sqrt_price_after;

            let boundary_reached = sqrt_price_target_x96 == step.sqrt_price_next_x96
                && if zero_for_one {
                    sqrt_price_after <= step.sqrt_price_next_x96
                } else {
                    sqrt_price_after >= step.sqrt_price_next_x96
                };

            if boundary_reached {
                if !zero_for_one {
                    state.liquidity = liquidity_math::add_delta(
                        state.liquidity,
                        self.ticks.liquidity_net(tick_next),
                    )?;
                    ticks_crossed += 1;
                    log!(DEBUG, "[swap]: crossed tick {tick_next} upward");
                }
                // downward, tick_next's liquidity stays active until the price leaves it
                state.tick = tick_next;
            } else {
                state.tick = TickMath::get_tick_at_sqrt_ratio(state.sqrt_price_x96)?;
            }
        }

        Ok(SwapSuccess {
            amount_in: params.amount_specified - amount_remaining,
            amount_out,
            amount_remaining,
            ticks_crossed,
            state,
        })
    }
}

impl PoolState {
    /// True when the price lies in `[sqrt_price_at(tick), sqrt_price_at(tick + 1))`.
    pub fn price_matches_tick(&self) -> bool {
        let Ok(lower) = TickMath::get_sqrt_ratio_at_tick(self.tick) else {
            return false;
        };
        match TickMath::get_sqrt_ratio_at_tick(self.tick + 1) {
            Ok(upper) => lower <= self.sqrt_price_x96 && self.sqrt_price_x96 < upper,
            Err(_) => false,
        }
    }
}
