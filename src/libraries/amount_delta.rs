use ethnum::U256;

use super::{
    constants::Q96,
    full_math::{div_rounding_up, mul_div, mul_div_rounding_up},
};

#[derive(Debug, Clone, PartialEq)]
pub enum AmountDeltaError {
    InvalidPrice,
    Overflow,
}

const FIXED_POINT_96_RESOLUTION: u32 = 96;

fn sort_prices(sqrt_price_a_x96: U256, sqrt_price_b_x96: U256) -> (U256, U256) {
    if sqrt_price_a_x96 > sqrt_price_b_x96 {
        (sqrt_price_b_x96, sqrt_price_a_x96)
    } else {
        (sqrt_price_a_x96, sqrt_price_b_x96)
    }
}

/// Amount of token0 that moves the price between the two sqrt prices at the given liquidity:
/// liquidity * (sqrt(upper) - sqrt(lower)) / (sqrt(upper) * sqrt(lower))
pub fn get_amount_0_delta(
    sqrt_price_a_x96: U256,
    sqrt_price_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256, AmountDeltaError> {
    let (sqrt_lower, sqrt_upper) = sort_prices(sqrt_price_a_x96, sqrt_price_b_x96);

    if sqrt_lower == U256::ZERO {
        return Err(AmountDeltaError::InvalidPrice);
    }

    let numerator1 = U256::from(liquidity) << FIXED_POINT_96_RESOLUTION;
    let numerator2 = sqrt_upper - sqrt_lower;

    if round_up {
        let scaled = mul_div_rounding_up(numerator1, numerator2, sqrt_upper)
            .map_err(|_| AmountDeltaError::Overflow)?;
        div_rounding_up(scaled, sqrt_lower).map_err(|_| AmountDeltaError::InvalidPrice)
    } else {
        let scaled =
            mul_div(numerator1, numerator2, sqrt_upper).map_err(|_| AmountDeltaError::Overflow)?;
        Ok(scaled / sqrt_lower)
    }
}

/// Amount of token1 that moves the price between the two sqrt prices at the given liquidity:
/// liquidity * (sqrt(upper) - sqrt(lower))
pub fn get_amount_1_delta(
    sqrt_price_a_x96: U256,
    sqrt_price_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256, AmountDeltaError> {
    let (sqrt_lower, sqrt_upper) = sort_prices(sqrt_price_a_x96, sqrt_price_b_x96);
    let difference = sqrt_upper - sqrt_lower;

    let amount1 = if round_up {
        mul_div_rounding_up(U256::from(liquidity), difference, *Q96)
    } else {
        mul_div(U256::from(liquidity), difference, *Q96)
    };
    amount1.map_err(|_| AmountDeltaError::Overflow)
}
