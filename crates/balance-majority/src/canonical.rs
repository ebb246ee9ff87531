//! Reduction of hypothesis tables to a canonical representative.
//!
//! Three passes run in order: parts whose coins carry no split information
//! are joined, the heavy and light labels are exchanged when that puts more
//! weight on the heavy side, and finally columns of equal size are permuted
//! into the lexicographically smallest table.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::ops::Range;

use balance_core::Count;
use balance_partition::PartitionStore;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::config::{JoinStrategy, RunConfig};
use crate::state::{Distribution, HypothesisState};

/// Orders tried per tied group once the full search is over its limit.
const GROUP_PERMUTATION_CAP: usize = 5040;

/// Counters gathered while canonicalising.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonStats {
    /// Tables reduced.
    pub simplified: u64,
    /// Columns removed by joining.
    pub parts_joined: u64,
    /// Tables checked under the validating join strategy.
    pub join_checks: u64,
    /// Checks where the two join strategies disagreed.
    pub join_mismatches: u64,
    /// Tables whose tied columns exceeded the permutation limit.
    pub permutation_fallbacks: u64,
    /// Largest number of column orders a single table called for.
    pub largest_permutation_search: u64,
}

/// Maps raw outcome tables to canonical hypothesis states.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    strategy: JoinStrategy,
    permutation_limit: usize,
    canonicalize: bool,
    stats: CanonStats,
}

impl Canonicalizer {
    /// Creates a canonicaliser; with `canonicalize` off, tables are only sorted.
    pub fn new(strategy: JoinStrategy, permutation_limit: usize, canonicalize: bool) -> Self {
        Self {
            strategy,
            permutation_limit: permutation_limit.max(1),
            canonicalize,
            stats: CanonStats::default(),
        }
    }

    /// Canonicaliser matching a run configuration.
    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(
            config.join_strategy,
            config.permutation_limit,
            config.canonicalize,
        )
    }

    /// Join strategy in use.
    pub fn strategy(&self) -> JoinStrategy {
        self.strategy
    }

    /// Counters so far.
    pub fn stats(&self) -> CanonStats {
        self.stats
    }

    /// Reduces `rows` over the partition `sizes` to its canonical state.
    ///
    /// An empty row set yields the impossible state over `sizes`.
    pub fn simplify(
        &mut self,
        store: &mut PartitionStore,
        sizes: &[Count],
        rows: Vec<Distribution>,
    ) -> HypothesisState {
        assert!(!sizes.is_empty(), "canonicalising over an empty partition");
        let table = Table::new(sizes.to_vec(), rows);
        if table.rows.is_empty() || !self.canonicalize {
            return table.into_state(store);
        }
        self.stats.simplified += 1;
        let width = table.width();
        let canonical = match self.strategy {
            JoinStrategy::None => self.orient(table),
            JoinStrategy::SameVariety => {
                let joined = join_same_variety(&table);
                self.orient(joined)
            }
            JoinStrategy::All => {
                let joined = join_all(&table);
                self.orient(joined)
            }
            JoinStrategy::Validate => {
                let cheap = join_same_variety(&table);
                let cheap = self.orient(cheap);
                let full = join_all(&table);
                let full = self.orient(full);
                self.stats.join_checks += 1;
                if cheap != full {
                    self.stats.join_mismatches += 1;
                    warn!(
                        same_variety = ?cheap.sizes,
                        all = ?full.sizes,
                        rows = full.rows.len(),
                        "join strategies disagree"
                    );
                }
                full
            }
        };
        self.stats.parts_joined += (width - canonical.width()) as u64;
        canonical.into_state(store)
    }

    /// Re-canonicalises an interned state.
    pub fn canonical_form(
        &mut self,
        store: &mut PartitionStore,
        state: &HypothesisState,
    ) -> HypothesisState {
        let sizes = store.partition(state.partition).parts().to_vec();
        self.simplify(store, &sizes, state.distributions.clone())
    }

    /// Keeps the labelling with more heavy weight; ties keep the smaller ordering.
    fn orient(&mut self, table: Table) -> Table {
        let heavy: u64 = table
            .rows
            .iter()
            .flatten()
            .map(|&count| count as u64)
            .sum();
        let coins: u64 = table.sizes.iter().map(|&size| size as u64).sum();
        let total = coins * table.rows.len() as u64;
        match (2 * heavy).cmp(&total) {
            Ordering::Greater => self.order(table),
            Ordering::Less => self.order(table.flipped()),
            Ordering::Equal => {
                let flipped = self.order(table.flipped());
                let kept = self.order(table);
                kept.min(flipped)
            }
        }
    }

    /// Sorts columns by signature and breaks ties by searching column orders.
    fn order(&mut self, table: Table) -> Table {
        let keys: Vec<(Count, Vec<Count>)> = (0..table.width())
            .map(|column| {
                let mut values: Vec<Count> = table.rows.iter().map(|row| row[column]).collect();
                values.sort_unstable();
                (table.sizes[column], values)
            })
            .collect();
        let mut base: Vec<usize> = (0..table.width()).collect();
        base.sort_by(|&a, &b| keys[a].cmp(&keys[b]));

        let ties = tied_ranges(&base, &keys);
        if ties.is_empty() {
            return table.select(&base);
        }
        let orders = ties
            .iter()
            .map(|range| factorial(range.len()))
            .fold(1u64, u64::saturating_mul);
        self.stats.largest_permutation_search = self.stats.largest_permutation_search.max(orders);

        if orders <= self.permutation_limit as u64 {
            full_order_search(&table, &base, &ties)
        } else {
            self.stats.permutation_fallbacks += 1;
            debug!(
                orders,
                limit = self.permutation_limit,
                groups = ties.len(),
                "column order search over limit, searching groups one at a time"
            );
            grouped_order_search(&table, base, &ties)
        }
    }
}

/// Positions in `base` whose columns share a signature with a neighbour.
fn tied_ranges(base: &[usize], keys: &[(Count, Vec<Count>)]) -> Vec<Range<usize>> {
    let mut ties = Vec::new();
    let mut start = 0;
    while start < base.len() {
        let mut end = start + 1;
        while end < base.len() && keys[base[end]] == keys[base[start]] {
            end += 1;
        }
        if end - start > 1 {
            ties.push(start..end);
        }
        start = end;
    }
    ties
}

fn full_order_search(table: &Table, base: &[usize], ties: &[Range<usize>]) -> Table {
    let choices: Vec<Vec<Vec<usize>>> = ties
        .iter()
        .map(|range| {
            base[range.clone()]
                .iter()
                .copied()
                .permutations(range.len())
                .collect()
        })
        .collect();
    let mut best: Option<Table> = None;
    for choice in choices.iter().map(|group| group.iter()).multi_cartesian_product() {
        let mut order = base.to_vec();
        for (range, columns) in ties.iter().zip(&choice) {
            order[range.clone()].copy_from_slice(columns.as_slice());
        }
        let candidate = table.select(&order);
        if best.as_ref().map_or(true, |current| candidate < *current) {
            best = Some(candidate);
        }
    }
    best.unwrap_or_else(|| table.select(base))
}

fn grouped_order_search(table: &Table, mut order: Vec<usize>, ties: &[Range<usize>]) -> Table {
    for range in ties {
        let mut best: Option<(Table, Vec<usize>)> = None;
        for columns in order[range.clone()]
            .iter()
            .copied()
            .permutations(range.len())
            .take(GROUP_PERMUTATION_CAP)
        {
            let mut candidate_order = order.clone();
            candidate_order[range.clone()].copy_from_slice(&columns);
            let candidate = table.select(&candidate_order);
            if best
                .as_ref()
                .map_or(true, |(current, _)| candidate < *current)
            {
                best = Some((candidate, candidate_order));
            }
        }
        if let Some((_, chosen)) = best {
            order = chosen;
        }
    }
    table.select(&order)
}

fn factorial(n: usize) -> u64 {
    (1..=n as u64).fold(1, u64::saturating_mul)
}

/// Merges parts that are entirely heavy or entirely light in every row,
/// grouping those whose heavy/light pattern matches row by row.
fn join_same_variety(table: &Table) -> Table {
    let mut uniform: BTreeMap<Vec<bool>, Vec<usize>> = BTreeMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for column in 0..table.width() {
        let size = table.sizes[column];
        let is_uniform = table
            .rows
            .iter()
            .all(|row| row[column] == 0 || row[column] == size);
        if is_uniform {
            let pattern = table.rows.iter().map(|row| row[column] == size).collect();
            uniform.entry(pattern).or_default().push(column);
        } else {
            groups.push(vec![column]);
        }
    }
    if uniform.values().all(|columns| columns.len() == 1) {
        return table.clone();
    }
    groups.extend(uniform.into_values());
    trace!(before = table.width(), after = groups.len(), "joined same-variety parts");
    table.regroup(&groups)
}

/// Repeatedly merges any pair of parts whose joint heavy count is all the
/// rows know about them.
fn join_all(table: &Table) -> Table {
    let mut current = table.clone();
    'search: loop {
        let width = current.width();
        for first in 0..width {
            for second in first + 1..width {
                if current.pair_is_interchangeable(first, second) {
                    let mut groups: Vec<Vec<usize>> = (0..width)
                        .filter(|&column| column != first && column != second)
                        .map(|column| vec![column])
                        .collect();
                    groups.push(vec![first, second]);
                    current = current.regroup(&groups);
                    continue 'search;
                }
            }
        }
        if current.width() != table.width() {
            trace!(before = table.width(), after = current.width(), "joined parts");
        }
        return current;
    }
}

/// Distribution table over a partition, rows sorted and distinct.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Table {
    sizes: Vec<Count>,
    rows: Vec<Distribution>,
}

impl Table {
    fn new(sizes: Vec<Count>, mut rows: Vec<Distribution>) -> Self {
        debug_assert!(rows.iter().all(|row| row.len() == sizes.len()));
        rows.sort_unstable();
        rows.dedup();
        Self { sizes, rows }
    }

    fn width(&self) -> usize {
        self.sizes.len()
    }

    /// Replaces each group of columns by one column holding their sums.
    fn regroup(&self, groups: &[Vec<usize>]) -> Table {
        let sizes = groups
            .iter()
            .map(|group| group.iter().map(|&column| self.sizes[column]).sum())
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                groups
                    .iter()
                    .map(|group| group.iter().map(|&column| row[column]).sum())
                    .collect()
            })
            .collect();
        Table::new(sizes, rows)
    }

    /// Exchanges the heavy and light labels.
    fn flipped(&self) -> Table {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&self.sizes)
                    .map(|(&count, &size)| size - count)
                    .collect()
            })
            .collect();
        Table::new(self.sizes.clone(), rows)
    }

    fn select(&self, order: &[usize]) -> Table {
        let sizes = order.iter().map(|&column| self.sizes[column]).collect();
        let rows = self
            .rows
            .iter()
            .map(|row| order.iter().map(|&column| row[column]).collect())
            .collect();
        Table::new(sizes, rows)
    }

    /// True when, for every setting of the other columns and every joint
    /// total, all feasible ways of splitting that total between the two
    /// columns are present.
    fn pair_is_interchangeable(&self, first: usize, second: usize) -> bool {
        let (cap_first, cap_second) = (self.sizes[first], self.sizes[second]);
        let mut entries: Vec<(Vec<Count>, Count, Count)> = self
            .rows
            .iter()
            .map(|row| {
                let others = row
                    .iter()
                    .enumerate()
                    .filter(|&(column, _)| column != first && column != second)
                    .map(|(_, &count)| count)
                    .collect();
                (others, row[first] + row[second], row[first])
            })
            .collect();
        entries.sort_unstable();
        entries.dedup();
        entries
            .chunk_by(|a, b| a.0 == b.0 && a.1 == b.1)
            .all(|group| {
                let total = group[0].1;
                let feasible = total.min(cap_first) - total.saturating_sub(cap_second) + 1;
                group.len() == feasible as usize
            })
    }

    fn into_state(self, store: &mut PartitionStore) -> HypothesisState {
        HypothesisState {
            partition: store.intern_sorted(self.sizes),
            distributions: self.rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical(strategy: JoinStrategy, sizes: &[Count], rows: Vec<Distribution>) -> (Vec<Count>, Vec<Distribution>) {
        let mut store = PartitionStore::new();
        let mut canon = Canonicalizer::new(strategy, 40_320, true);
        let state = canon.simplify(&mut store, sizes, rows);
        (
            store.partition(state.partition).parts().to_vec(),
            state.distributions,
        )
    }

    #[test]
    fn uniform_parts_with_the_same_pattern_join() {
        let (sizes, rows) = canonical(
            JoinStrategy::SameVariety,
            &[1, 1, 2],
            vec![vec![1, 1, 0], vec![0, 0, 2]],
        );
        // The two singletons always agree, so they form one part of two.
        assert_eq!(sizes, vec![2, 2]);
        assert_eq!(rows, vec![vec![0, 2], vec![2, 0]]);
    }

    #[test]
    fn exhaustive_join_merges_freely_split_parts() {
        let rows = vec![vec![0, 1], vec![1, 0]];
        let (sizes, joined) = canonical(JoinStrategy::All, &[1, 1], rows.clone());
        assert_eq!(sizes, vec![2]);
        assert_eq!(joined, vec![vec![1]]);
        let (sizes, _) = canonical(JoinStrategy::SameVariety, &[1, 1], rows);
        assert_eq!(sizes, vec![1, 1]);
    }

    #[test]
    fn light_heavy_tables_are_flipped() {
        let (sizes, rows) = canonical(JoinStrategy::None, &[3], vec![vec![0], vec![1]]);
        assert_eq!(sizes, vec![3]);
        assert_eq!(rows, vec![vec![2], vec![3]]);
    }

    #[test]
    fn equal_size_columns_are_ordered_by_signature() {
        let a = canonical(JoinStrategy::None, &[1, 1, 1], vec![vec![1, 1, 0], vec![1, 0, 1]]);
        let b = canonical(JoinStrategy::None, &[1, 1, 1], vec![vec![0, 1, 1], vec![1, 1, 0]]);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_tables_stay_impossible() {
        let mut store = PartitionStore::new();
        let mut canon = Canonicalizer::new(JoinStrategy::All, 10, true);
        let state = canon.simplify(&mut store, &[1, 2], Vec::new());
        assert!(state.is_impossible());
        assert_eq!(store.partition(state.partition).parts(), &[1, 2]);
        assert_eq!(canon.stats().simplified, 0);
    }

    #[test]
    fn disabled_canonicalisation_only_sorts() {
        let mut store = PartitionStore::new();
        let mut canon = Canonicalizer::new(JoinStrategy::All, 10, false);
        let state = canon.simplify(&mut store, &[1, 1], vec![vec![1, 0], vec![0, 1], vec![1, 0]]);
        assert_eq!(state.distributions, vec![vec![0, 1], vec![1, 0]]);
        assert_eq!(store.partition(state.partition).parts(), &[1, 1]);
    }

    #[test]
    fn tight_limits_fall_back_to_grouped_search() {
        let mut store = PartitionStore::new();
        let mut canon = Canonicalizer::new(JoinStrategy::None, 1, true);
        let rows = vec![vec![1, 0, 1, 0], vec![0, 1, 1, 1]];
        let state = canon.simplify(&mut store, &[1, 1, 2, 2], rows);
        assert_eq!(canon.stats().permutation_fallbacks, 1);
        assert_eq!(state.distributions.len(), 2);
    }
}
