//! Counterfeit-coin toy problem: exactly one coin is heavier, find it.

use balance_core::{Count, Outcome, OutcomeArray, PartitionId, Placement};
use balance_partition::{PartitionChild, PartitionStore};
use balance_search::Problem;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Suspects {
    pub partition: PartitionId,
    /// Parts that may hold the heavy coin, ascending.
    pub parts: Vec<usize>,
}

pub struct HeavyCoin {
    pub coins: Count,
}

impl Problem for HeavyCoin {
    type State = Suspects;

    fn make_root(&mut self, store: &mut PartitionStore) -> Suspects {
        Suspects {
            partition: store.get_root(self.coins),
            parts: vec![0],
        }
    }

    fn partition_of(&self, state: &Suspects) -> PartitionId {
        state.partition
    }

    fn apply_weighing(
        &mut self,
        store: &mut PartitionStore,
        state: &Suspects,
        child: &PartitionChild,
    ) -> OutcomeArray<Suspects> {
        let weighing = store.weighing(child.weighing);
        let mut buckets: OutcomeArray<Vec<usize>> = Default::default();
        for (output, entry) in weighing.provenance().iter().enumerate() {
            if !state.parts.contains(&(entry.part as usize)) {
                continue;
            }
            let outcome = match entry.placement {
                Placement::Left => Outcome::LeftHeavier,
                Placement::Right => Outcome::RightHeavier,
                Placement::Aside => Outcome::Balances,
            };
            buckets[outcome.index()].push(output);
        }
        buckets.map(|parts| Suspects {
            partition: child.output,
            parts,
        })
    }

    fn is_solved(&self, store: &PartitionStore, state: &Suspects) -> bool {
        let partition = store.partition(state.partition);
        let suspects: u32 = state.parts.iter().map(|&part| partition.size(part) as u32).sum();
        suspects == 1
    }

    fn is_impossible(&self, state: &Suspects) -> bool {
        state.parts.is_empty()
    }

    fn describe(&self) -> String {
        format!("find the heavy coin among {}", self.coins)
    }

    fn describe_state(&self, store: &PartitionStore, state: &Suspects) -> String {
        format!("{} suspects {:?}", store.describe_partition(state.partition), state.parts)
    }
}
