use ethnum::U256;

use super::{
    amount_delta::{get_amount_0_delta, get_amount_1_delta},
    sqrt_price_math::get_next_sqrt_price_from_input,
};

/// Computes the sqrt price target for the next swap step.
///
/// Picks whichever of the next tick's price and the caller's limit is reached first in the
/// direction of travel: the higher of the two when the price is falling (`zero_for_one`), the
/// lower when it is rising.
pub fn get_sqrt_price_target(
    zero_for_one: bool,
    sqrt_price_next_x96: U256,
    sqrt_price_limit_x96: U256,
) -> U256 {
    if zero_for_one {
        sqrt_price_next_x96.max(sqrt_price_limit_x96)
    } else {
        sqrt_price_next_x96.min(sqrt_price_limit_x96)
    }
}

#[derive(Debug, PartialEq)]
pub enum ComputeSwapError {
    PriceOverflow,
    AmountOverflow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapStep {
    // the price after this step, never beyond the step target
    pub sqrt_price_next_x96: U256,
    // how much of the remaining input this step consumed
    pub amount_in: U256,
    // how much of the other token this step released
    pub amount_out: U256,
}

/// Computes one exact-input step at constant liquidity.
///
/// The direction is implied by the two prices: a target at or below the current price swaps
/// token0 in, a target above it swaps token1 in. If `amount_remaining` covers the whole move the
/// step lands exactly on `sqrt_price_target_x96`; otherwise the entire remainder is consumed and
/// the price stops short of the target.
///
/// With zero liquidity nothing can be filled, so the price moves straight to the target and both
/// amounts are zero.
pub fn compute_swap_step(
    sqrt_price_current_x96: U256,
    sqrt_price_target_x96: U256,
    liquidity: u128,
    amount_remaining: U256,
) -> Result<SwapStep, ComputeSwapError> {
    if liquidity == 0 {
        return Ok(SwapStep {
            sqrt_price_next_x96: sqrt_price_target_x96,
            amount_in: U256::ZERO,
            amount_out: U256::ZERO,
        });
    }

    let zero_for_one = sqrt_price_current_x96 >= sqrt_price_target_x96;

    let amount_in_to_target = if zero_for_one {
        get_amount_0_delta(sqrt_price_target_x96, sqrt_price_current_x96, liquidity, true)
    } else {
        get_amount_1_delta(sqrt_price_current_x96, sqrt_price_target_x96, liquidity, true)
    }
    .map_err(|_| ComputeSwapError::AmountOverflow)?;

    let (sqrt_price_next_x96, amount_in) = if amount_remaining >= amount_in_to_target {
        (sqrt_price_target_x96, amount_in_to_target)
    } else {
        let next = get_next_sqrt_price_from_input(
            sqrt_price_current_x96,
            liquidity,
            amount_remaining,
            zero_for_one,
        )
        .map_err(|_| ComputeSwapError::PriceOverflow)?;
        (next, amount_remaining)
    };

    let amount_out = if zero_for_one {
        get_amount_1_delta(sqrt_price_next_x96, sqrt_price_current_x96, liquidity, false)
    } else {
        get_amount_0_delta(sqrt_price_current_x96, sqrt_price_next_x96, liquidity, false)
    }
    .map_err(|_| ComputeSwapError::AmountOverflow)?;

    Ok(SwapStep {
        sqrt_price_next_x96,
        amount_in,
        amount_out,
    })
}
