use serde::{Deserialize, Serialize};

/// Liquidity bookkeeping for one initialized tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInfo {
    // total liquidity of all positions using this tick as a bound
    pub liquidity_gross: u128,
    // liquidity added when the price crosses the tick upward, removed when it crosses downward
    pub liquidity_net: i128,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}
