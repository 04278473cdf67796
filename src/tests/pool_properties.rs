use ethnum::U256;
use proptest::prelude::*;

use crate::{
    libraries::{
        constants::{MAX_TICK, MIN_TICK},
        tick_math::TickMath,
    },
    pool::Pool,
    position::types::Owner,
};

const OWNERS: [&str; 3] = ["alice", "bob", "carol"];

#[derive(Debug, Clone)]
enum Operation {
    Mint {
        owner: usize,
        lower: i32,
        width: i32,
        liquidity: u128,
    },
    Burn {
        pick: usize,
        quarters: u128,
    },
    Swap {
        zero_for_one: bool,
        amount: u128,
        ticks_to_limit: i32,
    },
}

fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        (0..OWNERS.len(), -300i32..300, 1i32..200, 1u128..1_000_000_000_000_000_000_000)
            .prop_map(|(owner, lower, width, liquidity)| Operation::Mint {
                owner,
                lower,
                width,
                liquidity,
            }),
        (any::<usize>(), 1u128..=4).prop_map(|(pick, quarters)| Operation::Burn { pick, quarters }),
        (any::<bool>(), 1u128..1_000_000_000_000_000_000_000_000, 1i32..20_000).prop_map(
            |(zero_for_one, amount, ticks_to_limit)| Operation::Swap {
                zero_for_one,
                amount,
                ticks_to_limit,
            }
        ),
    ]
}

fn limit_price(pool: &Pool, zero_for_one: bool, ticks_to_limit: i32) -> U256 {
    let tick = if zero_for_one {
        (pool.current_tick() - ticks_to_limit).max(MIN_TICK)
    } else {
        (pool.current_tick() + ticks_to_limit).min(MAX_TICK)
    };
    TickMath::get_sqrt_ratio_at_tick(tick).unwrap()
}

/// Runs one operation and checks what it must guarantee on its own.
fn run(pool: &mut Pool, operation: &Operation) -> Result<(), TestCaseError> {
    let spacing = pool.tick_spacing();
    let before = pool.clone();

    match operation {
        Operation::Mint {
            owner,
            lower,
            width,
            liquidity,
        } => {
            let owner: Owner = OWNERS[*owner].into();
            let (tick_lower, tick_upper) = (lower * spacing, (lower + width) * spacing);
            if pool.mint(&owner, tick_lower, tick_upper, *liquidity).is_err() {
                prop_assert_eq!(&*pool, &before);
            }
        }
        Operation::Burn { pick, quarters } => {
            let positions: Vec<_> = OWNERS
                .iter()
                .flat_map(|owner| {
                    let owner: Owner = (*owner).into();
                    pool.positions_of(&owner)
                        .map(|(key, info)| (key.clone(), info.liquidity))
                        .collect::<Vec<_>>()
                })
                .collect();
            if positions.is_empty() {
                return Ok(());
            }
            let (key, liquidity) = &positions[pick % positions.len()];
            let amount = (liquidity / 4 * quarters).max(1);
            pool.burn(&key.owner, key.tick_lower, key.tick_upper, amount)
                .map_err(|err| TestCaseError::fail(format!("burn failed: {err}")))?;
        }
        Operation::Swap {
            zero_for_one,
            amount,
            ticks_to_limit,
        } => {
            let limit = limit_price(pool, *zero_for_one, *ticks_to_limit);
            let result = pool
                .swap(*zero_for_one, U256::from(*amount), limit)
                .map_err(|err| TestCaseError::fail(format!("swap failed: {err}")))?;

            prop_assert_eq!(result.amount_in + result.amount_remaining, U256::from(*amount));
            if *zero_for_one {
                prop_assert!(pool.current_sqrt_price() <= before.current_sqrt_price());
                prop_assert!(pool.current_tick() <= before.current_tick());
                if before.current_sqrt_price() > limit {
                    prop_assert!(pool.current_sqrt_price() >= limit);
                }
            } else {
                prop_assert!(pool.current_sqrt_price() >= before.current_sqrt_price());
                prop_assert!(pool.current_tick() >= before.current_tick());
                if before.current_sqrt_price() < limit {
                    prop_assert!(pool.current_sqrt_price() <= limit);
                }
            }
            if result.amount_in == U256::ZERO {
                prop_assert_eq!(result.amount_out, U256::ZERO);
            }
        }
    }

    pool.check_invariants()
        .map_err(|violation| TestCaseError::fail(format!("{violation} after {operation:?}")))?;
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn invariants_hold_after_any_sequence(
        spacing in prop::sample::select(vec![1, 10, 60]),
        start_tick in -5_000i32..5_000,
        operations in prop::collection::vec(operation_strategy(), 1..40),
    ) {
        let mut pool = Pool::at_tick(spacing, start_tick).unwrap();
        for operation in &operations {
            run(&mut pool, operation)?;
        }
    }

    #[test]
    fn mint_then_burn_restores_the_pool(
        spacing in prop::sample::select(vec![1, 10, 60]),
        start_tick in -5_000i32..5_000,
        operations in prop::collection::vec(operation_strategy(), 0..20),
        owner in 0..OWNERS.len(),
        lower in -300i32..300,
        width in 1i32..200,
        liquidity in 1u128..1_000_000_000_000_000_000_000,
    ) {
        let mut pool = Pool::at_tick(spacing, start_tick).unwrap();
        for operation in &operations {
            run(&mut pool, operation)?;
        }
        let before = pool.clone();
        let owner: Owner = OWNERS[owner].into();
        let (tick_lower, tick_upper) = (lower * spacing, (lower + width) * spacing);

        pool.mint(&owner, tick_lower, tick_upper, liquidity).unwrap();
        pool.burn(&owner, tick_lower, tick_upper, liquidity).unwrap();

        prop_assert_eq!(pool, before);
    }

    #[test]
    fn quote_never_mutates(
        start_tick in -5_000i32..5_000,
        operations in prop::collection::vec(operation_strategy(), 0..20),
        zero_for_one in any::<bool>(),
        amount in 1u128..1_000_000_000_000_000_000_000_000,
        ticks_to_limit in 1i32..20_000,
    ) {
        let mut pool = Pool::at_tick(10, start_tick).unwrap();
        for operation in &operations {
            run(&mut pool, operation)?;
        }
        let before = pool.clone();
        let limit = limit_price(&pool, zero_for_one, ticks_to_limit);

        let quote = pool.quote_swap(zero_for_one, U256::from(amount), limit).unwrap();
        prop_assert_eq!(&pool, &before);
        let result = pool.swap(zero_for_one, U256::from(amount), limit).unwrap();
        prop_assert_eq!(quote, result);
    }
}
