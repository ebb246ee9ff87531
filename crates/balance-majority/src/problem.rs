use balance_core::errors::BalanceError;
use balance_core::{Count, OutcomeArray, PartitionId};
use balance_partition::{PartitionChild, PartitionStore};
use balance_search::{Problem, SearchEngine};
use tracing::debug;

use crate::canonical::{CanonStats, Canonicalizer};
use crate::config::{validate_coin_count, RunConfig};
use crate::state::{is_settled, Distribution, HypothesisState};
use crate::transition::apply_weighing_to_distributions;

/// Find a coin of the majority variety among an odd number of coins.
#[derive(Debug, Clone)]
pub struct FindMajority {
    coins: Count,
    almost_balanced: bool,
    threshold: u32,
    canonicalizer: Canonicalizer,
}

impl FindMajority {
    /// Puzzle over `coins` coins with default canonicalisation.
    pub fn new(coins: Count, almost_balanced: bool) -> Result<Self, BalanceError> {
        let config = RunConfig {
            coin_count: coins,
            almost_balanced,
            ..RunConfig::default()
        };
        Self::from_config(&config)
    }

    /// Puzzle described by a run configuration.
    pub fn from_config(config: &RunConfig) -> Result<Self, BalanceError> {
        config.validate()?;
        Ok(Self {
            coins: config.coin_count,
            almost_balanced: config.almost_balanced,
            threshold: (config.coin_count as u32 + 1) / 2,
            canonicalizer: Canonicalizer::from_config(config),
        })
    }

    /// Number of coins.
    pub fn coins(&self) -> Count {
        self.coins
    }

    /// Heavy-coin count at which the heavy variety is the majority.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    /// Possible heavy-coin totals before any weighing.
    pub fn heavy_range(&self) -> (Count, Count) {
        let threshold = self.threshold as Count;
        if self.almost_balanced {
            (threshold - 1, threshold)
        } else {
            (1, self.coins - 1)
        }
    }

    /// Canonicalisation counters.
    pub fn canon_stats(&self) -> CanonStats {
        self.canonicalizer.stats()
    }

    /// The canonicaliser shared by every state of the run.
    pub fn canonicalizer(&self) -> &Canonicalizer {
        &self.canonicalizer
    }
}

impl Problem for FindMajority {
    type State = HypothesisState;

    fn make_root(&mut self, store: &mut PartitionStore) -> HypothesisState {
        let (low, high) = self.heavy_range();
        let rows: Vec<Distribution> = (low..=high).map(|heavy| vec![heavy]).collect();
        self.canonicalizer.simplify(store, &[self.coins], rows)
    }

    fn partition_of(&self, state: &HypothesisState) -> PartitionId {
        state.partition
    }

    fn apply_weighing(
        &mut self,
        store: &mut PartitionStore,
        state: &HypothesisState,
        child: &PartitionChild,
    ) -> OutcomeArray<HypothesisState> {
        let out_sizes = store.partition(child.output).parts().to_vec();
        let buckets = apply_weighing_to_distributions(
            store.partition(state.partition).parts(),
            &state.distributions,
            store.weighing(child.weighing),
            &out_sizes,
        );
        let canonicalizer = &mut self.canonicalizer;
        buckets.map(|rows| canonicalizer.simplify(store, &out_sizes, rows))
    }

    fn is_solved(&self, store: &PartitionStore, state: &HypothesisState) -> bool {
        let sizes = store.partition(state.partition).parts();
        is_settled(sizes, &state.distributions, self.threshold)
    }

    fn is_impossible(&self, state: &HypothesisState) -> bool {
        state.is_impossible()
    }

    fn describe(&self) -> String {
        let (low, high) = self.heavy_range();
        format!(
            "Find majority: {} coins, {}..={} heavy, threshold {}, join {}",
            self.coins,
            low,
            high,
            self.threshold,
            self.canonicalizer.strategy()
        )
    }

    fn describe_state(&self, store: &PartitionStore, state: &HypothesisState) -> String {
        format!(
            "{}  Distributions: {:?}",
            store.describe_partition(state.partition),
            state.distributions
        )
    }
}

/// Search engine over the majority puzzle for `coins` coins.
pub fn new_problem(
    coins: Count,
    almost_balanced: bool,
) -> Result<SearchEngine<FindMajority>, BalanceError> {
    validate_coin_count(coins)?;
    let problem = FindMajority::new(coins, almost_balanced)?;
    debug!(problem = %problem.describe(), "created majority problem");
    Ok(SearchEngine::new(problem))
}
