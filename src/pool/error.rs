use thiserror::Error;

use crate::{
    libraries::{
        constants::MAX_TICK, liquidity_math::AddDeltaError, swap_math::ComputeSwapError, tick_math::TickMathError,
    },
    position::UpdatePositionError,
    tick::{TickIndexError, UpdateTickError},
};

/// Errors returned by pool operations. A rejected operation leaves the pool untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("tick or price outside the supported range")]
    OutOfRange,

    #[error("tick is not a multiple of the tick spacing")]
    InvalidTick,

    #[error("lower tick must be below the upper tick")]
    InvalidRange,

    #[error("position holds less liquidity than requested")]
    InsufficientPosition,

    #[error("liquidity delta must be non-zero")]
    ZeroLiquidity,

    #[error("tick spacing must lie in 1..={max}")]
    InvalidTickSpacing { max: i32 },

    #[error("liquidity at a tick would exceed the per-tick maximum")]
    TickLiquidityOverflow,

    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    #[error("pool {0} not found")]
    PoolNotFound(String),

    #[error("pool {0} already exists")]
    PoolAlreadyExists(String),
}

impl From<TickMathError> for PoolError {
    fn from(_: TickMathError) -> Self {
        PoolError::OutOfRange
    }
}

impl From<TickIndexError> for PoolError {
    fn from(error: TickIndexError) -> Self {
        match error {
            TickIndexError::InvalidTickSpacing(_) => PoolError::InvalidTickSpacing { max: MAX_TICK },
            TickIndexError::OutOfRange(_) => PoolError::OutOfRange,
            TickIndexError::InvalidTick(_) => PoolError::InvalidTick,
        }
    }
}

impl From<UpdateTickError> for PoolError {
    fn from(error: UpdateTickError) -> Self {
        match error {
            UpdateTickError::TickIndex(error) => error.into(),
            // gross liquidity past u128 is far beyond the per-tick maximum
            UpdateTickError::AddDeltaError(AddDeltaError::Overflow) => {
                PoolError::TickLiquidityOverflow
            }
            UpdateTickError::AddDeltaError(AddDeltaError::Underflow)
            | UpdateTickError::LiquidityNetOverflow => PoolError::ArithmeticOverflow,
        }
    }
}

impl From<UpdatePositionError> for PoolError {
    fn from(error: UpdatePositionError) -> Self {
        match error {
            UpdatePositionError::ZeroLiquidity => PoolError::ZeroLiquidity,
            UpdatePositionError::InsufficientLiquidity => PoolError::InsufficientPosition,
            UpdatePositionError::AddDeltaError(_) => PoolError::ArithmeticOverflow,
        }
    }
}

impl From<AddDeltaError> for PoolError {
    fn from(_: AddDeltaError) -> Self {
        PoolError::ArithmeticOverflow
    }
}

impl From<ComputeSwapError> for PoolError {
    fn from(_: ComputeSwapError) -> Self {
        PoolError::ArithmeticOverflow
    }
}
