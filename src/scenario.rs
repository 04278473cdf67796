//! Declarative pool scenarios: a pool configuration plus an ordered list of operations,
//! loaded from JSON and replayed against a fresh [`Pool`].

use ethnum::U256;
use ic_canister_log::log;
use serde::{Deserialize, Serialize};

use crate::{
    libraries::tick_math::TickMath,
    logs::INFO,
    pool::{
        Pool,
        error::PoolError,
        types::{PoolConfig, PoolSnapshot, PoolTickSpacing, SwapSuccess},
    },
    position::types::Owner,
};

/// A price given either as a tick or as a raw Q64.96 sqrt price.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PricePoint {
    Tick(i32),
    SqrtPriceX96(#[serde(with = "crate::serde_u256")] U256),
}

impl PricePoint {
    pub fn sqrt_price_x96(&self) -> Result<U256, PoolError> {
        match self {
            PricePoint::Tick(tick) => Ok(TickMath::get_sqrt_ratio_at_tick(*tick)?),
            PricePoint::SqrtPriceX96(sqrt_price_x96) => Ok(*sqrt_price_x96),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ScenarioPool {
    pub tick_spacing: PoolTickSpacing,
    pub initial_price: PricePoint,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Mint {
        owner: Owner,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
    },
    Burn {
        owner: Owner,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
    },
    Swap {
        zero_for_one: bool,
        #[serde(with = "crate::serde_u256")]
        amount: U256,
        limit: PricePoint,
    },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Scenario {
    pub pool: ScenarioPool,
    pub operations: Vec<Operation>,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct OperationOutcome {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap: Option<SwapSuccess>,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ScenarioReport {
    pub outcomes: Vec<OperationOutcome>,
    pub snapshot: PoolSnapshot,
    // first broken invariant, if any
    pub invariant_violation: Option<String>,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Replays every operation in order. Rejected operations are recorded and skipped; only an
    /// invalid pool configuration aborts the run.
    pub fn run(&self) -> Result<ScenarioReport, PoolError> {
        let mut pool = Pool::new(PoolConfig {
            tick_spacing: self.pool.tick_spacing,
            initial_sqrt_price_x96: self.pool.initial_price.sqrt_price_x96()?,
        })?;

        let outcomes: Vec<OperationOutcome> = self
            .operations
            .iter()
            .enumerate()
            .map(|(index, operation)| {
                let result = apply(&mut pool, operation);
                let (error, swap) = match result {
                    Ok(swap) => (None, swap),
                    Err(err) => (Some(err.to_string()), None),
                };
                OperationOutcome { index, error, swap }
            })
            .collect();

        let rejected = outcomes.iter().filter(|o| o.error.is_some()).count();
        log!(
            INFO,
            "[scenario]: replayed {} operations, {rejected} rejected",
            outcomes.len()
        );

        Ok(ScenarioReport {
            outcomes,
            snapshot: pool.snapshot(),
            invariant_violation: pool.check_invariants().err().map(|v| v.to_string()),
        })
    }
}

fn apply(pool: &mut Pool, operation: &Operation) -> Result<Option<SwapSuccess>, PoolError> {
    match operation {
        Operation::Mint {
            owner,
            tick_lower,
            tick_upper,
            liquidity,
        } => pool
            .mint(owner, *tick_lower, *tick_upper, *liquidity)
            .map(|_| None),
        Operation::Burn {
            owner,
            tick_lower,
            tick_upper,
            liquidity,
        } => pool
            .burn(owner, *tick_lower, *tick_upper, *liquidity)
            .map(|_| None),
        Operation::Swap {
            zero_for_one,
            amount,
            limit,
        } => {
            let limit = limit.sqrt_price_x96()?;
            pool.swap(*zero_for_one, *amount, limit).map(Some)
        }
    }
}
