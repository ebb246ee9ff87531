//! Hypothesis states and the predicates evaluated on them.

use balance_core::{Count, PartitionId};
use balance_partition::PartitionStore;

/// Heavy-coin count per part, one entry per part of the owning partition.
pub type Distribution = Vec<Count>;

/// Every distribution still consistent with the observations, over one partition.
///
/// Distributions are distinct. An empty set means the observations
/// contradict each other.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HypothesisState {
    /// Partition the distributions are expressed over.
    pub partition: PartitionId,
    /// Consistent distributions, sorted.
    pub distributions: Vec<Distribution>,
}

impl HypothesisState {
    /// True when no distribution survives.
    pub fn is_impossible(&self) -> bool {
        self.distributions.is_empty()
    }

    /// Number of concrete heavy/light labelings represented by the state.
    pub fn labeling_count(&self, store: &PartitionStore) -> u64 {
        labeling_count(store.partition(self.partition).parts(), &self.distributions)
    }
}

/// Total number of heavy coins in a distribution.
pub fn heavy_total(distribution: &[Count]) -> u32 {
    distribution.iter().map(|&count| count as u32).sum()
}

/// Whether the majority question is settled for these distributions.
///
/// It is settled when every distribution agrees on whether the heavy coins
/// reach `threshold`, or when some part holds only majority-variety coins in
/// every distribution, so that any of its coins can be named as a majority
/// coin.
pub fn is_settled(sizes: &[Count], distributions: &[Distribution], threshold: u32) -> bool {
    let Some(first) = distributions.first() else {
        return false;
    };
    let heavy_majority = heavy_total(first) >= threshold;
    if distributions
        .iter()
        .all(|row| (heavy_total(row) >= threshold) == heavy_majority)
    {
        return true;
    }
    (0..sizes.len()).any(|part| {
        distributions.iter().all(|row| {
            if heavy_total(row) >= threshold {
                row[part] == sizes[part]
            } else {
                row[part] == 0
            }
        })
    })
}

/// `Σ_rows Π_i C(size_i, d_i)`.
pub fn labeling_count(sizes: &[Count], distributions: &[Distribution]) -> u64 {
    distributions
        .iter()
        .map(|row| {
            sizes
                .iter()
                .zip(row)
                .map(|(&size, &count)| binomial(size, count))
                .product::<u64>()
        })
        .sum()
}

/// `C(n, k)` for counts that fit the solver's coin limit.
pub fn binomial(n: Count, k: Count) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k) as u128;
    let n = n as u128;
    let mut value: u128 = 1;
    for i in 0..k {
        value = value * (n - i) / (i + 1);
    }
    value as u64
}
