use std::collections::BTreeMap;

use types::{Owner, PositionInfo, PositionKey};

use crate::libraries::liquidity_math::{self, AddDeltaError};

pub mod types;

#[derive(Debug, Clone, PartialEq)]
pub enum UpdatePositionError {
    ZeroLiquidity,
    InsufficientLiquidity,
    AddDeltaError(AddDeltaError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePositionSuccess {
    pub liquidity_before: u128,
    pub updated_position_info: PositionInfo,
}

/// Owner-keyed ledger of liquidity positions.
///
/// Only positions with non-zero liquidity are stored. `credit` and `debit` compute the updated
/// position without storing it; the pool persists results with `store` once every other step
/// of the operation succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionLedger {
    positions: BTreeMap<PositionKey, PositionInfo>,
}

impl PositionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &PositionKey) -> PositionInfo {
        self.positions.get(key).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PositionKey, &PositionInfo)> {
        self.positions.iter()
    }

    /// All positions of `owner`, ordered by (tick_lower, tick_upper).
    pub fn positions_of<'a>(
        &'a self,
        owner: &'a Owner,
    ) -> impl Iterator<Item = (&'a PositionKey, &'a PositionInfo)> + 'a {
        self.positions
            .iter()
            .filter(move |(key, _)| &key.owner == owner)
    }

    pub fn credit(
        &self,
        key: &PositionKey,
        liquidity_delta: u128,
    ) -> Result<UpdatePositionSuccess, UpdatePositionError> {
        self.update(key, liquidity_delta, true)
    }

    pub fn debit(
        &self,
        key: &PositionKey,
        liquidity_delta: u128,
    ) -> Result<UpdatePositionSuccess, UpdatePositionError> {
        self.update(key, liquidity_delta, false)
    }

    fn update(
        &self,
        key: &PositionKey,
        liquidity_delta: u128,
        increase: bool,
    ) -> Result<UpdatePositionSuccess, UpdatePositionError> {
        if liquidity_delta == 0 {
            return Err(UpdatePositionError::ZeroLiquidity);
        }

        let mut position_info = self.get(key);
        let liquidity_before = position_info.liquidity;

        if !increase && liquidity_before < liquidity_delta {
            return Err(UpdatePositionError::InsufficientLiquidity);
        }

        let delta = liquidity_math::to_signed(liquidity_delta)
            .map_err(UpdatePositionError::AddDeltaError)?;
        let delta = if increase { delta } else { -delta };

        position_info.liquidity = liquidity_math::add_delta(liquidity_before, delta)
            .map_err(UpdatePositionError::AddDeltaError)?;

        Ok(UpdatePositionSuccess {
            liquidity_before,
            updated_position_info: position_info,
        })
    }

    /// Persists a computed position; a position left without liquidity is removed.
    pub fn store(&mut self, key: PositionKey, position_info: PositionInfo) {
        if position_info.liquidity == 0 {
            self.positions.remove(&key);
        } else {
            self.positions.insert(key, position_info);
        }
    }
}
