use std::fmt::Debug;
use std::hash::Hash;

use balance_core::{OutcomeArray, PartitionId};
use balance_partition::{PartitionChild, PartitionStore};

/// Puzzle logic plugged into [`SearchEngine`](crate::SearchEngine).
///
/// States must already be canonical when returned: the engine shares nodes
/// purely by value equality.
pub trait Problem {
    /// Knowledge about the coins after some sequence of weighings.
    type State: Clone + Eq + Hash + Debug;

    /// Builds the maximally uncertain starting state over the single-part partition.
    fn make_root(&mut self, store: &mut PartitionStore) -> Self::State;

    /// Partition the state's distributions are expressed over.
    fn partition_of(&self, state: &Self::State) -> PartitionId;

    /// Outcome states of applying `child` to `state`, indexed by [`balance_core::Outcome`].
    fn apply_weighing(
        &mut self,
        store: &mut PartitionStore,
        state: &Self::State,
        child: &PartitionChild,
    ) -> OutcomeArray<Self::State>;

    /// True when no further weighing is needed.
    fn is_solved(&self, store: &PartitionStore, state: &Self::State) -> bool;

    /// True when no coin assignment is consistent with the observations.
    fn is_impossible(&self, state: &Self::State) -> bool;

    /// One-line summary of the problem instance.
    fn describe(&self) -> String;

    /// Human readable summary of a state.
    fn describe_state(&self, store: &PartitionStore, state: &Self::State) -> String;
}
