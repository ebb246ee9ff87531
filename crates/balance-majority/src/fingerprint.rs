use balance_core::StateId;
use balance_partition::PartitionStore;
use balance_search::SearchEngine;
use sha2::{Digest, Sha256};

use crate::problem::FindMajority;
use crate::state::HypothesisState;

/// Stable digest of a state's partition sizes and distributions.
pub fn state_fingerprint(store: &PartitionStore, state: &HypothesisState) -> String {
    let mut hasher = Sha256::new();
    encode_state(store, state, &mut hasher);
    hex::encode(hasher.finalize())
}

/// Digest of the whole search graph: states in insertion order, their
/// bounds and the outcome handles of every admitted weighing.
///
/// Two runs with the same configuration produce the same value.
pub fn graph_fingerprint(engine: &SearchEngine<FindMajority>) -> String {
    let mut hasher = Sha256::new();
    hasher.update((engine.len() as u64).to_le_bytes());
    for index in 0..engine.len() {
        let id = StateId::from_raw(index as u32);
        encode_state(engine.store(), engine.state(id), &mut hasher);
        let bounds = engine.bounds(id);
        hasher.update([bounds.min, bounds.max.unwrap_or(u8::MAX)]);
        let children = engine.children(id);
        hasher.update((children.len() as u64).to_le_bytes());
        for child in children {
            hasher.update((child.index as u64).to_le_bytes());
            for outcome in child.outcomes {
                match outcome {
                    Some(state) => {
                        hasher.update(b"s");
                        hasher.update(state.as_raw().to_le_bytes());
                    }
                    None => hasher.update(b"-"),
                }
            }
        }
    }
    hex::encode(hasher.finalize())
}

fn encode_state(store: &PartitionStore, state: &HypothesisState, hasher: &mut Sha256) {
    let sizes = store.partition(state.partition).parts();
    hasher.update((sizes.len() as u64).to_le_bytes());
    hasher.update(sizes);
    hasher.update((state.distributions.len() as u64).to_le_bytes());
    for row in &state.distributions {
        hasher.update(row);
    }
}
