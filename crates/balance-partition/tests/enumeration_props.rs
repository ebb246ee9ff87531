use std::collections::BTreeSet;

use balance_core::Count;
use balance_partition::{
    descriptor_for_selection, selection_for_descriptor, PanSelection, PartitionStore,
    WeighingEnumerator,
};
use proptest::prelude::*;

type Pair = (Vec<Count>, Vec<Count>);

fn vectors_with_caps(caps: &[Count]) -> Vec<Vec<Count>> {
    let mut out = vec![Vec::new()];
    for &cap in caps {
        let mut next = Vec::new();
        for prefix in &out {
            for value in 0..=cap {
                let mut v = prefix.clone();
                v.push(value);
                next.push(v);
            }
        }
        out = next;
    }
    out
}

fn brute_force(parts: &[Count]) -> BTreeSet<Pair> {
    let mut expected = BTreeSet::new();
    for left in vectors_with_caps(parts) {
        let pan: u32 = left.iter().map(|&v| v as u32).sum();
        if pan == 0 {
            continue;
        }
        let residual: Vec<Count> = parts.iter().zip(&left).map(|(p, l)| p - l).collect();
        for right in vectors_with_caps(&residual) {
            let total: u32 = right.iter().map(|&v| v as u32).sum();
            if total == pan && right <= left {
                expected.insert((left.clone(), right));
            }
        }
    }
    expected
}

fn enumerated(parts: &[Count]) -> Vec<Pair> {
    WeighingEnumerator::new(parts)
        .map(|selection| (selection.left, selection.right))
        .collect()
}

fn partitions_of(coins: Count, largest: Count) -> Vec<Vec<Count>> {
    if coins == 0 {
        return vec![Vec::new()];
    }
    let mut out = Vec::new();
    for first in (1..=largest.min(coins)).rev() {
        for mut rest in partitions_of(coins - first, first) {
            rest.push(first);
            out.push(rest);
        }
    }
    out
}

fn check_partition(parts: &[Count]) {
    let got = enumerated(parts);
    let unique: BTreeSet<Pair> = got.iter().cloned().collect();
    assert_eq!(unique.len(), got.len(), "duplicates for {parts:?}");
    assert_eq!(unique, brute_force(parts), "mismatch for {parts:?}");

    for (left, right) in &got {
        if left != right {
            assert!(
                !unique.contains(&(right.clone(), left.clone())),
                "mirror pair for {parts:?}"
            );
        }
    }

    let mut previous: Option<&Pair> = None;
    for pair in &got {
        if let Some((prev_left, prev_right)) = previous {
            let prev_pan: u32 = prev_left.iter().map(|&v| v as u32).sum();
            let pan: u32 = pair.0.iter().map(|&v| v as u32).sum();
            assert!(pan >= prev_pan);
            if pan == prev_pan {
                assert!(pair.0 <= *prev_left);
                if pair.0 == *prev_left {
                    assert!(pair.1 < *prev_right);
                }
            }
        }
        previous = Some(pair);
    }
}

#[test]
fn every_small_partition_matches_brute_force() {
    for coins in 1..=9 {
        for parts in partitions_of(coins, coins) {
            check_partition(&parts);
        }
    }
}

#[test]
fn store_children_of_reachable_partitions_are_mirror_free() {
    for coins in [3u8, 5, 7] {
        let mut store = PartitionStore::new();
        let root = store.get_root(coins);
        let mut frontier = vec![root];
        let mut visited = BTreeSet::new();
        while let Some(id) = frontier.pop() {
            if !visited.insert(id) {
                continue;
            }
            let children = store.children_of(id).to_vec();
            let selections: BTreeSet<PanSelection> = children
                .iter()
                .map(|child| store.selection_of(id, child))
                .collect();
            assert_eq!(selections.len(), children.len());
            for child in &children {
                let selection = store.selection_of(id, child);
                assert_eq!(child.symmetric, selection.is_symmetric());
                if !selection.is_symmetric() {
                    assert!(!selections.contains(&selection.mirrored()));
                }
                if store.partition(child.output).len() <= 4 {
                    frontier.push(child.output);
                }
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn random_partitions_match_brute_force(mut parts in prop::collection::vec(1u8..=3, 1..=4)) {
        parts.sort();
        let got = enumerated(&parts);
        let unique: BTreeSet<Pair> = got.iter().cloned().collect();
        prop_assert_eq!(unique.len(), got.len());
        prop_assert_eq!(unique, brute_force(&parts));
    }

    #[test]
    fn descriptors_round_trip(mut parts in prop::collection::vec(1u8..=4, 1..=5)) {
        parts.sort();
        for selection in WeighingEnumerator::new(&parts) {
            let (output, weighing) = descriptor_for_selection(&parts, &selection);
            prop_assert_eq!(output.coin_count(), parts.iter().map(|&p| p as u32).sum::<u32>());
            let back = selection_for_descriptor(parts.len(), &weighing, &output);
            prop_assert_eq!(&back, &selection);
            let (again, reweighed) = descriptor_for_selection(&parts, &back);
            prop_assert_eq!(again, output);
            prop_assert_eq!(reweighed, weighing);
        }
    }
}
