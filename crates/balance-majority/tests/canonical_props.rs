use balance_core::Count;
use balance_majority::state::{is_settled, labeling_count};
use balance_majority::transition::apply_weighing_to_distributions;
use balance_majority::{state_fingerprint, Canonicalizer, FindMajority, HypothesisState, JoinStrategy};
use balance_partition::PartitionStore;
use balance_search::Problem;
use proptest::prelude::*;

/// Follows random weighings and outcomes from the root, checking every
/// outcome table against its canonical form.
fn walk(coins: Count, strategy: JoinStrategy, steps: &[(usize, usize)]) -> Result<(), TestCaseError> {
    let mut store = PartitionStore::new();
    let mut problem = FindMajority::new(coins, true).expect("odd coin count");
    let threshold = problem.threshold();
    let mut canon = Canonicalizer::new(strategy, 40_320, true);
    let mut state = problem.make_root(&mut store);

    for &(pick, branch) in steps {
        let options = store.children_of(state.partition).to_vec();
        prop_assert!(!options.is_empty());
        let option = options[pick % options.len()];
        let in_sizes = store.partition(state.partition).parts().to_vec();
        let out_sizes = store.partition(option.output).parts().to_vec();
        let buckets = apply_weighing_to_distributions(
            &in_sizes,
            &state.distributions,
            store.weighing(option.weighing),
            &out_sizes,
        );

        let parent = labeling_count(&in_sizes, &state.distributions);
        let split: u64 = buckets
            .iter()
            .map(|rows| labeling_count(&out_sizes, rows))
            .sum();
        prop_assert_eq!(parent, split);

        let mut next: Vec<HypothesisState> = Vec::new();
        for rows in buckets {
            if rows.is_empty() {
                continue;
            }
            let canonical = canon.simplify(&mut store, &out_sizes, rows.clone());
            let sizes = store.partition(canonical.partition).parts().to_vec();
            prop_assert_eq!(
                labeling_count(&out_sizes, &rows),
                labeling_count(&sizes, &canonical.distributions)
            );
            prop_assert_eq!(
                is_settled(&out_sizes, &rows, threshold),
                is_settled(&sizes, &canonical.distributions, threshold)
            );
            let again = canon.canonical_form(&mut store, &canonical);
            prop_assert_eq!(&again, &canonical);
            prop_assert_eq!(
                state_fingerprint(&store, &again),
                state_fingerprint(&store, &canonical)
            );
            next.push(canonical);
        }
        prop_assert!(!next.is_empty());
        state = next.swap_remove(branch % next.len());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn canonical_forms_preserve_labelings_and_solvedness(
        coins in prop::sample::select(vec![5u8, 7, 9]),
        steps in prop::collection::vec((0usize..64, 0usize..3), 1..=3),
    ) {
        walk(coins, JoinStrategy::SameVariety, &steps)?;
    }

    #[test]
    fn exhaustive_joins_preserve_labelings_and_solvedness(
        coins in prop::sample::select(vec![5u8, 7]),
        steps in prop::collection::vec((0usize..64, 0usize..3), 1..=3),
    ) {
        walk(coins, JoinStrategy::All, &steps)?;
    }
}

#[test]
fn permuted_tables_share_a_canonical_state() {
    let mut store = PartitionStore::new();
    let mut canon = Canonicalizer::new(JoinStrategy::SameVariety, 40_320, true);
    let sizes = [1, 1, 1, 2];
    let rows = vec![vec![1, 0, 0, 2], vec![0, 1, 1, 1], vec![1, 1, 0, 0]];
    let permuted: Vec<Vec<Count>> = rows
        .iter()
        .map(|row| vec![row[2], row[0], row[1], row[3]])
        .collect();
    let a = canon.simplify(&mut store, &sizes, rows);
    let b = canon.simplify(&mut store, &sizes, permuted);
    assert_eq!(a, b);
}

#[test]
fn flipped_tables_share_a_canonical_state() {
    let mut store = PartitionStore::new();
    let mut canon = Canonicalizer::new(JoinStrategy::None, 40_320, true);
    let sizes = [1, 2, 2];
    let rows = vec![vec![1, 2, 0], vec![0, 1, 1]];
    let flipped: Vec<Vec<Count>> = rows
        .iter()
        .map(|row| row.iter().zip(&sizes).map(|(&d, &s)| s - d).collect())
        .collect();
    let a = canon.simplify(&mut store, &sizes, rows);
    let b = canon.simplify(&mut store, &sizes, flipped);
    assert_eq!(a, b);
}
