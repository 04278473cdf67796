use ethnum::U256;

use super::{
    constants::{Q96, U160_MAX},
    full_math::{div_rounding_up, mul_div, mul_div_rounding_up},
};

#[derive(Debug, PartialEq)]
pub enum SqrtPriceMathError {
    PriceOverflow,
    InvalidPriceOrLiquidity,
}

/// Next sqrt price after adding `amount` of token0, rounding up.
///
/// Adding token0 pushes the price down. Rounding up keeps the price from moving further than
/// the input pays for: `liquidity * sqrt_price / (liquidity + amount * sqrt_price)`, falling
/// back to `liquidity / (liquidity / sqrt_price + amount)` when the product overflows.
pub fn get_next_sqrt_price_from_amount0_rounding_up(
    sqrt_px96: U256,
    liquidity: u128,
    amount: U256,
) -> Result<U256, SqrtPriceMathError> {
    if amount == U256::ZERO {
        return Ok(sqrt_px96);
    }

    let numerator1: U256 = U256::from(liquidity) << 96_u32;

    let next = match amount
        .checked_mul(sqrt_px96)
        .and_then(|product| numerator1.checked_add(product))
    {
        Some(denominator) => mul_div_rounding_up(numerator1, sqrt_px96, denominator)
            .map_err(|_| SqrtPriceMathError::PriceOverflow)?,
        None => {
            let denominator = (numerator1 / sqrt_px96)
                .checked_add(amount)
                .ok_or(SqrtPriceMathError::PriceOverflow)?;
            div_rounding_up(numerator1, denominator)
                .map_err(|_| SqrtPriceMathError::PriceOverflow)?
        }
    };

    if next > *U160_MAX {
        return Err(SqrtPriceMathError::PriceOverflow);
    }
    Ok(next)
}

/// Next sqrt price after adding `amount` of token1, rounding down.
///
/// Adding token1 pushes the price up by `amount / liquidity`; rounding down keeps the price
/// from moving further than the input pays for.
pub fn get_next_sqrt_price_from_amount1_rounding_down(
    sqrt_px96: U256,
    liquidity: u128,
    amount: U256,
) -> Result<U256, SqrtPriceMathError> {
    let quotient = if amount <= *U160_MAX {
        (amount << 96_u32) / U256::from(liquidity)
    } else {
        mul_div(amount, *Q96, U256::from(liquidity))
            .map_err(|_| SqrtPriceMathError::PriceOverflow)?
    };

    let next = sqrt_px96
        .checked_add(quotient)
        .ok_or(SqrtPriceMathError::PriceOverflow)?;

    if next > *U160_MAX {
        return Err(SqrtPriceMathError::PriceOverflow);
    }
    Ok(next)
}

/// Next sqrt price given an exact input of token0 (`zero_for_one`) or token1.
///
/// Fails if the price or liquidity is zero. Rounds so the result never passes the price the
/// input could actually buy.
pub fn get_next_sqrt_price_from_input(
    sqrt_px96: U256,
    liquidity: u128,
    amount_in: U256,
    zero_for_one: bool,
) -> Result<U256, SqrtPriceMathError> {
    if sqrt_px96 == U256::ZERO || liquidity == 0 {
        return Err(SqrtPriceMathError::InvalidPriceOrLiquidity);
    }

    if zero_for_one {
        get_next_sqrt_price_from_amount0_rounding_up(sqrt_px96, liquidity, amount_in)
    } else {
        get_next_sqrt_price_from_amount1_rounding_down(sqrt_px96, liquidity, amount_in)
    }
}
