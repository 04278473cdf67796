// [Engine State]
//  └── pools: BTreeMap<PoolId, Pool>
//       ├── PoolState { sqrt_price_x96, tick, liquidity }
//       ├── TickIndex { ticks: BTreeMap<i32, TickInfo>, bitmap: TickBitmap }
//       └── PositionLedger { positions: BTreeMap<PositionKey, PositionInfo> }

use std::{cell::RefCell, collections::BTreeMap, fmt};

use ic_canister_log::log;
use serde::{Deserialize, Serialize};

use crate::{
    logs::INFO,
    pool::{Pool, error::PoolError, types::PoolConfig},
};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoolId(pub String);

impl From<&str> for PoolId {
    fn from(id: &str) -> Self {
        PoolId(id.to_string())
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

thread_local! {
    pub static STATE: RefCell<State> = RefCell::new(State::default());
}

#[derive(Debug, Default)]
pub struct State {
    pools: BTreeMap<PoolId, Pool>,
}

impl State {
    pub fn pool(&self, pool_id: &PoolId) -> Result<&Pool, PoolError> {
        self.pools
            .get(pool_id)
            .ok_or_else(|| PoolError::PoolNotFound(pool_id.to_string()))
    }

    pub fn pool_mut(&mut self, pool_id: &PoolId) -> Result<&mut Pool, PoolError> {
        self.pools
            .get_mut(pool_id)
            .ok_or_else(|| PoolError::PoolNotFound(pool_id.to_string()))
    }

    pub fn pool_ids(&self) -> Vec<PoolId> {
        self.pools.keys().cloned().collect()
    }

    pub fn insert_pool(&mut self, pool_id: PoolId, pool: Pool) -> Result<(), PoolError> {
        if self.pools.contains_key(&pool_id) {
            return Err(PoolError::PoolAlreadyExists(pool_id.to_string()));
        }
        self.pools.insert(pool_id, pool);
        Ok(())
    }

    pub fn remove_pool(&mut self, pool_id: &PoolId) -> Option<Pool> {
        self.pools.remove(pool_id)
    }
}

/// Creates and registers an empty pool.
pub fn create_pool(pool_id: PoolId, config: PoolConfig) -> Result<(), PoolError> {
    let pool = Pool::new(config)?;
    let tick = pool.current_tick();
    mutate_state(|s| s.insert_pool(pool_id.clone(), pool))?;
    log!(INFO, "[create_pool]: created pool {pool_id} at tick {tick}");
    Ok(())
}

/// Reads (part of) the current state using `f`.
pub fn read_state<R>(f: impl FnOnce(&State) -> R) -> R {
    STATE.with(|cell| f(&cell.borrow()))
}

/// Mutates (part of) the current state using `f`.
pub fn mutate_state<F, R>(f: F) -> R
where
    F: FnOnce(&mut State) -> R,
{
    STATE.with(|cell| f(&mut cell.borrow_mut()))
}
