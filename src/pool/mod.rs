use ethnum::U256;

use crate::{
    libraries::{
        constants::{MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO},
        tick_math::TickMath,
    },
    position::{
        PositionLedger,
        types::{Owner, PositionInfo, PositionKey},
    },
    tick::{TickIndex, tick_spacing_to_max_liquidity_per_tick, types::TickInfo},
};
use error::PoolError;
use types::{PoolConfig, PoolSnapshot, PoolState, PoolTickSpacing};

pub mod error;
pub mod invariants;
pub mod modify_liquidity;
pub mod swap;
pub mod types;


/// One concentrated-liquidity pool: its price state, tick index and position ledger.
///
/// Every `&mut self` operation is a transaction: it either commits completely or returns an
/// error with the pool unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    state: PoolState,
    tick_spacing: PoolTickSpacing,
    max_liquidity_per_tick: u128,
    ticks: TickIndex,
    positions: PositionLedger,
}

impl Pool {
    pub fn new(config: PoolConfig) -> Result<Self, PoolError> {
        let PoolTickSpacing(tick_spacing) = config.tick_spacing;
        if !(1..=MAX_TICK).contains(&tick_spacing) {
            return Err(PoolError::InvalidTickSpacing { max: MAX_TICK });
        }

        let sqrt_price_x96 = config.initial_sqrt_price_x96;
        if sqrt_price_x96 < *MIN_SQRT_RATIO || sqrt_price_x96 >= *MAX_SQRT_RATIO {
            return Err(PoolError::OutOfRange);
        }
        let tick = TickMath::get_tick_at_sqrt_ratio(sqrt_price_x96)?;

        Ok(Self {
            state: PoolState {
                sqrt_price_x96,
                tick,
                liquidity: 0,
            },
            tick_spacing: config.tick_spacing,
            max_liquidity_per_tick: tick_spacing_to_max_liquidity_per_tick(tick_spacing),
            ticks: TickIndex::new(tick_spacing),
            positions: PositionLedger::new(),
        })
    }

    /// Creates an empty pool whose price sits exactly on `tick`.
    pub fn at_tick(tick_spacing: i32, tick: i32) -> Result<Self, PoolError> {
        let initial_sqrt_price_x96 = TickMath::get_sqrt_ratio_at_tick(tick)?;
        Self::new(PoolConfig {
            tick_spacing: PoolTickSpacing(tick_spacing),
            initial_sqrt_price_x96,
        })
    }

    pub fn state(&self) -> &PoolState {
        &self.state
    }

    pub fn current_tick(&self) -> i32 {
        self.state.tick
    }

    pub fn current_sqrt_price(&self) -> U256 {
        self.state.sqrt_price_x96
    }

    pub fn current_liquidity(&self) -> u128 {
        self.state.liquidity
    }

    pub fn tick_spacing(&self) -> i32 {
        self.tick_spacing.0
    }

    pub fn max_liquidity_per_tick(&self) -> u128 {
        self.max_liquidity_per_tick
    }

    pub fn liquidity_net_at(&self, tick: i32) -> i128 {
        self.ticks.liquidity_net(tick)
    }

    pub fn liquidity_gross_at(&self, tick: i32) -> u128 {
        self.ticks.liquidity_gross(tick)
    }

    pub fn tick_info(&self, tick: i32) -> TickInfo {
        self.ticks.query(tick)
    }

    /// Initialized ticks in ascending order.
    pub fn initialized_ticks(&self) -> impl Iterator<Item = (i32, TickInfo)> + '_ {
        self.ticks.iter()
    }

    pub fn position(&self, owner: &Owner, tick_lower: i32, tick_upper: i32) -> PositionInfo {
        self.positions.get(&PositionKey {
            owner: owner.clone(),
            tick_lower,
            tick_upper,
        })
    }

    pub fn positions_of<'a>(
        &'a self,
        owner: &'a Owner,
    ) -> impl Iterator<Item = (&'a PositionKey, &'a PositionInfo)> + 'a {
        self.positions.positions_of(owner)
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            tick_spacing: self.tick_spacing,
            max_liquidity_per_tick: self.max_liquidity_per_tick,
            state: self.state.clone(),
            ticks: self.ticks.iter().map(Into::into).collect(),
            positions: self.positions.iter().map(Into::into).collect(),
        }
    }
}
