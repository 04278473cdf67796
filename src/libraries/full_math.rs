use ethnum::U256;
use num_traits::Zero;

use super::safe_cast::{big_uint_to_u256, u256_to_big_uint};

#[derive(Debug, Clone, PartialEq)]
pub enum FullMathError {
    DivisionByZero,
    Overflow,
}

/// floor(a * b / denominator) with a 512-bit intermediate product.
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, FullMathError> {
    if denominator == U256::ZERO {
        return Err(FullMathError::DivisionByZero);
    }

    let product = u256_to_big_uint(a) * u256_to_big_uint(b);
    let quotient = product / u256_to_big_uint(denominator);

    big_uint_to_u256(&quotient).ok_or(FullMathError::Overflow)
}

/// ceil(a * b / denominator) with a 512-bit intermediate product.
pub fn mul_div_rounding_up(a: U256, b: U256, denominator: U256) -> Result<U256, FullMathError> {
    if denominator == U256::ZERO {
        return Err(FullMathError::DivisionByZero);
    }

    let product = u256_to_big_uint(a) * u256_to_big_uint(b);
    let denominator = u256_to_big_uint(denominator);
    let quotient = &product / &denominator;
    let result = if (&product % &denominator).is_zero() {
        quotient
    } else {
        quotient + 1_u32
    };

    big_uint_to_u256(&result).ok_or(FullMathError::Overflow)
}

/// ceil(x / y), callers guarantee y != 0
pub fn div_rounding_up(x: U256, y: U256) -> Result<U256, FullMathError> {
    if y == U256::ZERO {
        return Err(FullMathError::DivisionByZero);
    }
    let quotient = x / y;
    if x % y == U256::ZERO {
        Ok(quotient)
    } else {
        // quotient < U256::MAX whenever y > 1, and y == 1 never leaves a remainder
        Ok(quotient + U256::ONE)
    }
}
