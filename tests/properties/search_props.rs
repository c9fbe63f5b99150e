use proptest::prelude::*;

use packsize::core::{PackOptimizer, SelectionKey, explore};

/// Distinct positive sizes, largest first, as a catalog hands them over.
fn arb_sizes() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::btree_set(1_u32..=60, 1..5)
        .prop_map(|set| set.into_iter().rev().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn chosen_combination_covers_the_order(sizes in arb_sizes(), order in 1_u64..2_000) {
        let report = PackOptimizer::new().optimize(&sizes, order).unwrap().report;
        prop_assert!(report.total >= order);
        prop_assert_eq!(report.waste, report.total - order);
        prop_assert!(report.count > 0);

        let summed: u64 = report
            .packages
            .iter()
            .map(|line| u64::from(line.size) * u64::from(line.quantity))
            .sum();
        prop_assert_eq!(summed, report.total);
        prop_assert!(report.packages.iter().all(|line| sizes.contains(&line.size)));
        prop_assert!(report.packages.windows(2).all(|pair| pair[0].size > pair[1].size));
    }

    #[test]
    fn winner_is_minimal_among_explored(sizes in arb_sizes(), order in 1_u64..2_000) {
        let exploration = explore(&sizes, order).unwrap();
        let best = exploration
            .terminals
            .iter()
            .map(|candidate| SelectionKey::of(candidate, order))
            .min()
            .unwrap();

        let report = PackOptimizer::new().optimize(&sizes, order).unwrap().report;
        prop_assert_eq!(i128::from(report.waste), best.waste);
        prop_assert_eq!(report.count, best.count);
        prop_assert_eq!(report.explored, exploration.terminals.len());
    }

    #[test]
    fn search_is_deterministic(sizes in arb_sizes(), order in 1_u64..2_000) {
        let first = explore(&sizes, order).unwrap();
        let second = explore(&sizes, order).unwrap();
        prop_assert_eq!(first.terminals, second.terminals);
        prop_assert_eq!(first.stats.steps, second.stats.steps);
        prop_assert_eq!(first.stats.memo_hits, second.stats.memo_hits);
    }

    #[test]
    fn single_size_needs_ceiling_packages(size in 1_u32..500, order in 1_u64..5_000) {
        let report = PackOptimizer::new().optimize(&[size], order).unwrap().report;
        prop_assert_eq!(report.count, order.div_ceil(u64::from(size)));
        prop_assert!(report.waste < u64::from(size));
    }
}
