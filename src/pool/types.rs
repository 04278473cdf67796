use ethnum::U256;
use serde::{Deserialize, Serialize};

use crate::{
    position::types::{Owner, PositionInfo, PositionKey},
    tick::types::TickInfo,
};

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
#[serde(transparent)]
pub struct PoolTickSpacing(pub i32);

#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct PoolState {
    #[serde(with = "crate::serde_u256")]
    pub sqrt_price_x96: U256, // Current price in Q64.96 format
    pub tick: i32,            // Current tick index
    #[serde(with = "crate::serde_u128")]
    pub liquidity: u128, // Total active liquidity
}

/// Parameters a pool is created with.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct PoolConfig {
    pub tick_spacing: PoolTickSpacing,
    #[serde(with = "crate::serde_u256")]
    pub initial_sqrt_price_x96: U256,
}

#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct PositionSnapshot {
    pub owner: Owner,
    pub tick_lower: i32,
    pub tick_upper: i32,
    #[serde(with = "crate::serde_u128")]
    pub liquidity: u128,
}

impl From<(&PositionKey, &PositionInfo)> for PositionSnapshot {
    fn from((key, info): (&PositionKey, &PositionInfo)) -> Self {
        Self {
            owner: key.owner.clone(),
            tick_lower: key.tick_lower,
            tick_upper: key.tick_upper,
            liquidity: info.liquidity,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct TickSnapshot {
    pub tick: i32,
    #[serde(with = "crate::serde_u128")]
    pub liquidity_gross: u128,
    #[serde(with = "crate::serde_u128::signed")]
    pub liquidity_net: i128,
}

impl From<(i32, TickInfo)> for TickSnapshot {
    fn from((tick, info): (i32, TickInfo)) -> Self {
        Self {
            tick,
            liquidity_gross: info.liquidity_gross,
            liquidity_net: info.liquidity_net,
        }
    }
}

/// Owned, consistent copy of everything a pool holds.
#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct PoolSnapshot {
    pub tick_spacing: PoolTickSpacing,
    #[serde(with = "crate::serde_u128")]
    pub max_liquidity_per_tick: u128,
    pub state: PoolState,
    pub ticks: Vec<TickSnapshot>,
    pub positions: Vec<PositionSnapshot>,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct SwapSuccess {
    // input actually consumed
    #[serde(with = "crate::serde_u256")]
    pub amount_in: U256,
    // output released by the pool
    #[serde(with = "crate::serde_u256")]
    pub amount_out: U256,
    // input left over when the limit was reached or liquidity ran out
    #[serde(with = "crate::serde_u256")]
    pub amount_remaining: U256,
    pub ticks_crossed: u32,
    // pool state after the swap
    pub state: PoolState,
}
