use std::str::FromStr;

use proptest::prelude::*;

use super::{
    types::{Direction, TickInfo},
    *,
};
use crate::pool::error::PoolError;

fn index_with(tick_spacing: i32, ranges: &[(i32, i32, u128)]) -> TickIndex {
    let mut index = TickIndex::new(tick_spacing);
    for (lower, upper, liquidity) in ranges {
        index.apply(*lower, *liquidity, true).unwrap();
        index.apply(*upper, *liquidity, false).unwrap();
    }
    index
}

mod tick_spacing {
    use super::*;

    // Fee amount tick spacings
    const TICK_SPACING_LOW: i32 = 10;
    const TICK_SPACING_MEDIUM: i32 = 60;
    const TICK_SPACING_HIGH: i32 = 200;

    #[test]
    fn tick_spacing_to_max_liquidity_per_tick_low_fee() {
        let result = tick_spacing_to_max_liquidity_per_tick(TICK_SPACING_LOW);
        let expected = u128::from_str("1917569901783203986719870431555990").unwrap();
        assert_eq!(result, expected, "Low fee tick spacing mismatch");
    }

    #[test]
    fn tick_spacing_to_max_liquidity_per_tick_medium_fee() {
        let result = tick_spacing_to_max_liquidity_per_tick(TICK_SPACING_MEDIUM);
        let expected = u128::from_str("11505743598341114571880798222544994").unwrap();
        assert_eq!(result, expected, "Medium fee tick spacing mismatch");
    }

    #[test]
    fn tick_spacing_to_max_liquidity_per_tick_high_fee() {
        let result = tick_spacing_to_max_liquidity_per_tick(TICK_SPACING_HIGH);
        let expected = u128::from_str("38350317471085141830651933667504588").unwrap();
        assert_eq!(result, expected, "High fee tick spacing mismatch");
    }

    #[test]
    fn tick_spacing_to_max_liquidity_per_tick_entire_range() {
        let result = tick_spacing_to_max_liquidity_per_tick(887272);
        assert_eq!(result, u128::MAX / 3, "Entire range tick spacing mismatch");
    }

    #[test]
    fn tick_spacing_to_max_liquidity_per_tick_2302() {
        let result = tick_spacing_to_max_liquidity_per_tick(2302);
        let expected = u128::from_str("441351967472034323558203122479595605").unwrap();
        assert_eq!(result, expected, "Tick spacing 2302 mismatch");
    }
}

mod update_tick {
    use super::*;

    fn update_and_commit(index: &mut TickIndex, tick: i32, delta: i128, upper: bool) -> UpdateTickSuccess {
        let update = index.update_tick(tick, delta, upper).unwrap();
        index.commit_tick(tick, &update).unwrap();
        update
    }

    #[test]
    fn should_flip_when_zero_to_non_zero() {
        let index = TickIndex::new(1);
        let result = index.update_tick(0, 1, false).unwrap();
        assert!(result.flipped);
        assert_eq!(result.liquidity_gross_after, 1);
    }

    #[test]
    fn should_not_store_anything_before_commit() {
        let index = TickIndex::new(1);
        let _ = index.update_tick(0, 1, false).unwrap();
        assert!(!index.is_initialized(0));
        assert!(!index.is_flagged(0));
    }

    #[test]
    fn should_not_flip_when_non_zero_to_greater_non_zero() {
        let mut index = TickIndex::new(1);
        update_and_commit(&mut index, 0, 1, false);
        let result = index.update_tick(0, 1, false).unwrap();
        assert!(!result.flipped);
        assert_eq!(result.liquidity_gross_after, 2);
    }

    #[test]
    fn should_not_flip_when_non_zero_to_lesser_non_zero() {
        let mut index = TickIndex::new(1);
        update_and_commit(&mut index, 0, 2, false);
        let result = index.update_tick(0, -1, false).unwrap();
        assert!(!result.flipped);
        assert_eq!(result.liquidity_gross_after, 1);
    }

    #[test]
    fn should_flip_and_purge_when_non_zero_to_zero() {
        let mut index = TickIndex::new(1);
        update_and_commit(&mut index, 0, 2, false);
        let result = update_and_commit(&mut index, 0, -2, false);
        assert!(result.flipped);
        assert!(!index.is_initialized(0));
        assert!(!index.is_flagged(0));
        assert_eq!(index.query(0), TickInfo::default());
    }

    #[test]
    fn update_nets_liquidity_based_on_upper_flag() {
        let mut index = TickIndex::new(1);
        update_and_commit(&mut index, 0, 2, false);
        update_and_commit(&mut index, 0, 1, true);
        update_and_commit(&mut index, 0, 3, true);
        update_and_commit(&mut index, 0, 1, false);

        let info = index.query(0);
        assert_eq!(info.liquidity_gross, 2 + 1 + 3 + 1);
        assert_eq!(info.liquidity_net, 2 - 1 - 3 + 1);
    }

    #[test]
    fn should_err_on_liquidity_net_overflow() {
        let mut index = TickIndex::new(1);
        update_and_commit(&mut index, 0, (u128::MAX / 2 - 1) as i128, false);

        let result = index.update_tick(0, (u128::MAX / 2 - 1) as i128, false);
        assert_eq!(result, Err(UpdateTickError::LiquidityNetOverflow));
    }

    #[test]
    fn should_err_on_gross_underflow() {
        let index = TickIndex::new(1);
        assert_eq!(
            index.update_tick(0, -1, false),
            Err(UpdateTickError::AddDeltaError(AddDeltaError::Underflow))
        );
    }

    #[test]
    fn should_reject_misaligned_and_out_of_range_ticks() {
        let index = TickIndex::new(10);
        assert_eq!(
            index.update_tick(15, 1, false),
            Err(UpdateTickError::TickIndex(TickIndexError::InvalidTick(15)))
        );
        assert_eq!(
            index.update_tick(MAX_TICK + 10, 1, false),
            Err(UpdateTickError::TickIndex(TickIndexError::OutOfRange(
                MAX_TICK + 10
            )))
        );
    }

    #[test]
    fn should_reject_updates_and_find_nothing_without_positive_spacing() {
        let index = TickIndex::new(0);
        assert_eq!(
            index.update_tick(60, 1, false),
            Err(UpdateTickError::TickIndex(TickIndexError::InvalidTickSpacing(0)))
        );
        assert_eq!(index.next_initialized(0, Direction::Up), None);
        assert_eq!(index.next_initialized(0, Direction::Down), None);
        assert!(matches!(
            PoolError::from(TickIndexError::InvalidTickSpacing(0)),
            PoolError::InvalidTickSpacing { .. }
        ));
    }
}

mod apply {
    use super::*;

    #[test]
    fn apply_then_unapply_restores_empty_index() {
        let mut index = TickIndex::new(1);
        index.apply(-10, 500, true).unwrap();
        index.apply(10, 500, false).unwrap();

        assert_eq!(index.query(-10), TickInfo { liquidity_gross: 500, liquidity_net: 500 });
        assert_eq!(index.query(10), TickInfo { liquidity_gross: 500, liquidity_net: -500 });

        index.unapply(-10, 500, true).unwrap();
        index.unapply(10, 500, false).unwrap();
        assert_eq!(index, TickIndex::new(1));
    }

    #[test]
    fn shared_tick_keeps_gross_but_cancels_net() {
        // [-10, 0) and [0, 10) share tick 0 as upper and lower bound
        let index = index_with(1, &[(-10, 0, 700), (0, 10, 700)]);
        assert_eq!(index.query(0), TickInfo { liquidity_gross: 1400, liquidity_net: 0 });
        assert!(index.is_initialized(0));
    }

    #[test]
    fn unapply_more_than_applied_fails_without_change() {
        let mut index = index_with(1, &[(-10, 10, 5)]);
        let before = index.clone();
        assert_eq!(
            index.unapply(-10, 6, true),
            Err(UpdateTickError::AddDeltaError(AddDeltaError::Underflow))
        );
        assert_eq!(index, before);
    }
}

mod next_initialized {
    use super::*;

    #[test]
    fn finds_neighbours_strictly_beyond_the_tick() {
        let index = index_with(1, &[(-200, 70, 1), (84, 240, 1)]);

        assert_eq!(index.next_initialized(0, Direction::Up), Some(70));
        assert_eq!(index.next_initialized(70, Direction::Up), Some(84));
        assert_eq!(index.next_initialized(240, Direction::Up), None);

        assert_eq!(index.next_initialized(84, Direction::Down), Some(70));
        assert_eq!(index.next_initialized(70, Direction::Down), Some(-200));
        assert_eq!(index.next_initialized(-200, Direction::Down), None);
    }

    #[test]
    fn at_or_below_includes_the_tick() {
        let index = index_with(1, &[(-200, 70, 1)]);
        assert_eq!(index.next_initialized_at_or_below(70), Some(70));
        assert_eq!(index.next_initialized_at_or_below(69), Some(-200));
        assert_eq!(index.next_initialized_at_or_below(-201), None);
    }

    #[test]
    fn walks_across_many_empty_words() {
        let index = index_with(1, &[(MIN_TICK, MAX_TICK, 1)]);
        assert_eq!(index.next_initialized(0, Direction::Up), Some(MAX_TICK));
        assert_eq!(index.next_initialized(0, Direction::Down), Some(MIN_TICK));
        assert_eq!(index.next_initialized(MAX_TICK, Direction::Up), None);
        assert_eq!(index.next_initialized(MIN_TICK, Direction::Down), None);
    }

    #[test]
    fn respects_tick_spacing_for_unaligned_queries() {
        let index = index_with(60, &[(-120, 600, 1)]);
        assert_eq!(index.next_initialized(-1, Direction::Up), Some(600));
        assert_eq!(index.next_initialized(-1, Direction::Down), Some(-120));
        assert_eq!(index.next_initialized(-120, Direction::Down), None);
        assert_eq!(index.next_initialized(599, Direction::Up), Some(600));
        assert_eq!(index.next_initialized_at_or_below(-61), Some(-120));
    }

    #[test]
    fn empty_index_has_no_neighbours() {
        let index = TickIndex::new(1);
        assert_eq!(index.next_initialized(0, Direction::Up), None);
        assert_eq!(index.next_initialized(0, Direction::Down), None);
        assert_eq!(index.next_initialized_at_or_below(0), None);
    }
}

fn ranges_strategy() -> impl Strategy<Value = Vec<(i32, i32, u128)>> {
    prop::collection::vec(
        (-2_000i32..2_000, 1i32..2_000, 1u128..1_000_000),
        1..8,
    )
    .prop_map(|ranges| {
        ranges
            .into_iter()
            .map(|(lower, width, liquidity)| (lower * 10, (lower + width) * 10, liquidity))
            .collect()
    })
}

proptest! {
    #[test]
    fn net_liquidity_sums_to_zero(ranges in ranges_strategy()) {
        let index = index_with(10, &ranges);
        let net: i128 = index.iter().map(|(_, info)| info.liquidity_net).sum();
        prop_assert_eq!(net, 0);
        for (tick, info) in index.iter() {
            prop_assert!(info.liquidity_gross > 0);
            prop_assert!(index.is_flagged(tick));
        }
    }

    #[test]
    fn next_initialized_matches_ordered_map(ranges in ranges_strategy(), probe in -25_000i32..25_000) {
        let index = index_with(10, &ranges);
        let above = index.iter().map(|(tick, _)| tick).find(|tick| *tick > probe);
        let below = index.iter().map(|(tick, _)| tick).filter(|tick| *tick < probe).last();
        let at_or_below = index.iter().map(|(tick, _)| tick).filter(|tick| *tick <= probe).last();

        prop_assert_eq!(index.next_initialized(probe, Direction::Up), above);
        prop_assert_eq!(index.next_initialized(probe, Direction::Down), below);
        prop_assert_eq!(index.next_initialized_at_or_below(probe), at_or_below);
    }

    #[test]
    fn unapplying_everything_empties_the_index(ranges in ranges_strategy()) {
        let mut index = index_with(10, &ranges);
        for (lower, upper, liquidity) in ranges.iter().rev() {
            index.unapply(*upper, *liquidity, false).unwrap();
            index.unapply(*lower, *liquidity, true).unwrap();
        }
        prop_assert!(index.is_empty());
        prop_assert_eq!(index, TickIndex::new(10));
    }
}
