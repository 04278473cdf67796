use ethnum::{I256, U256};
use lazy_static::lazy_static;

use super::{
    bit_math::get_msb_bit_position,
    constants::{MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK},
};

/// Math library for computing sqrt prices from ticks and vice versa.
///
/// Computes sqrt(1.0001^tick) as Q64.96 fixed point numbers, supporting prices between 2^-128
/// and 2^128. Everything is integer arithmetic, so results are bit-for-bit reproducible.
pub struct TickMath;

// 2^128 / sqrt(1.0001)^(2^i) for i in 1..20, as Q128.128
const RATIO_FACTORS: [u128; 19] = [
    0xfff97272373d413259a46990580e213a,
    0xfff2e50f5f656932ef12357cf3c7fdcc,
    0xffe5caca7e10e4e61c3624eaa0941cd0,
    0xffcb9843d60f6159c9db58835c926644,
    0xff973b41fa98c081472e6896dfb254c0,
    0xff2ea16466c96a3843ec78b326b52861,
    0xfe5dee046a99a2a811c461f1969c3053,
    0xfcbe86c7900a88aedcffc83b479aa3a4,
    0xf987a7253ac413176f2b074cf7815e54,
    0xf3392b0822b70005940c7a398e4b70f3,
    0xe7159475a2c29b7443b29c7fa6e889d9,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e5,
    0x70d869a156d2a1b890bb3df62baf32f7,
    0x31be135f97d08fd981231505542fcfa6,
    0x9aa508b5b7a84e1c677de54f3e99bc9,
    0x5d6af8dedb81196699c329225ee604,
    0x2216e584f5fa1ea926041bedfe98,
    0x48a170391f7dc42444e8fa2,
];

const ODD_TICK_RATIO: u128 = 0xfffcb933bd6fad37aa2d162d1a594001;

lazy_static! {
    // log_sqrt(1.0001)(2) as Q128.128 scaled down by 2^64
    static ref LOG_2_TO_LOG_SQRT10001: I256 = I256::from(255738958999603826347141_i128);
    // error bounds of the log approximation, in Q128.128
    static ref TICK_LOW_OFFSET: I256 = I256::from(3402992956809132418596140100660247210_i128);
    static ref TICK_HI_OFFSET: I256 =
        U256::from(291339464771989622907027621153398088495_u128).as_i256();
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickMathError {
    TickOutOfBounds,
    SqrtPriceOutOfBounds,
}

impl TickMath {
    /// Calculates sqrt(1.0001^tick) * 2^96.
    ///
    /// Fails with `TickOutOfBounds` if |tick| > MAX_TICK.
    pub fn get_sqrt_ratio_at_tick(tick: i32) -> Result<U256, TickMathError> {
        if !(MIN_TICK..=MAX_TICK).contains(&tick) {
            return Err(TickMathError::TickOutOfBounds);
        }

        let abs_tick = tick.unsigned_abs();
        let mut ratio = if abs_tick & 0x1 != 0 {
            U256::from(ODD_TICK_RATIO)
        } else {
            U256::ONE << 128_u32
        };

        // ratio <= 2^128 and each factor < 2^128, so the product always fits
        for (i, factor) in RATIO_FACTORS.iter().enumerate() {
            if abs_tick & (1 << (i + 1)) != 0 {
                ratio = (ratio * U256::from(*factor)) >> 128_u32;
            }
        }

        if tick > 0 {
            ratio = U256::MAX / ratio;
        }

        // Q128.128 -> Q64.96, rounding up so that get_tick_at_sqrt_ratio round-trips
        let sqrt_price_x96 = (ratio >> 32_u32)
            + if ratio & U256::from(u32::MAX) == U256::ZERO {
                U256::ZERO
            } else {
                U256::ONE
            };
        Ok(sqrt_price_x96)
    }

    /// Calculates the greatest tick such that get_sqrt_ratio_at_tick(tick) <= sqrt_price_x96.
    ///
    /// Fails with `SqrtPriceOutOfBounds` unless MIN_SQRT_RATIO <= sqrt_price_x96 < MAX_SQRT_RATIO.
    pub fn get_tick_at_sqrt_ratio(sqrt_price_x96: U256) -> Result<i32, TickMathError> {
        if sqrt_price_x96 < *MIN_SQRT_RATIO || sqrt_price_x96 >= *MAX_SQRT_RATIO {
            return Err(TickMathError::SqrtPriceOutOfBounds);
        }

        let ratio = sqrt_price_x96 << 32_u32;
        // ratio >= MIN_SQRT_RATIO << 32 > 0
        let msb = get_msb_bit_position(&ratio).ok_or(TickMathError::SqrtPriceOutOfBounds)? as u32;

        // normalise into [2^127, 2^128)
        let r = if msb >= 128 {
            ratio >> (msb - 127)
        } else {
            ratio << (127 - msb)
        };

        let log_2 = Self::log_2(r, msb);
        let log_sqrt10001 = log_2 * *LOG_2_TO_LOG_SQRT10001;

        let tick_low = ((log_sqrt10001 - *TICK_LOW_OFFSET) >> 128_u32).as_i32();
        let tick_hi = ((log_sqrt10001 + *TICK_HI_OFFSET) >> 128_u32).as_i32();

        if tick_low == tick_hi {
            return Ok(tick_low);
        }
        if Self::get_sqrt_ratio_at_tick(tick_hi)? <= sqrt_price_x96 {
            Ok(tick_hi)
        } else {
            Ok(tick_low)
        }
    }

    // log2 of the normalised ratio as Q64.64, 14 fractional bits by repeated squaring
    fn log_2(mut r: U256, msb: u32) -> I256 {
        let mut log_2 = (I256::from(msb as i32) - I256::from(128_i32)) << 64_u32;

        for shift in (50_u32..=63).rev() {
            r = (r * r) >> 127_u32;
            let f: U256 = r >> 128_u32;
            log_2 |= f.as_i256() << shift;
            r >>= f.as_u32();
        }

        log_2
    }
}
