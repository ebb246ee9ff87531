use balance_core::errors::BalanceError;
use balance_core::{Count, PartitionId, WeighingId};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::enumerate::{PanSelection, WeighingEnumerator};
use crate::ids::{make_partition, make_weighing};
use crate::partition::Partition;
use crate::weighing::{descriptor_for_selection, selection_for_descriptor, Weighing};

/// A weighing applicable to a partition together with the partition it induces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartitionChild {
    /// Interned weighing descriptor.
    pub weighing: WeighingId,
    /// Interned output partition.
    pub output: PartitionId,
    /// Both pans receive the same coins from every part.
    pub symmetric: bool,
}

/// Owner of every partition and weighing descriptor created during a run.
///
/// Values are interned: each distinct partition or weighing is stored once
/// and addressed by a stable handle for the lifetime of the store.
#[derive(Debug, Default)]
pub struct PartitionStore {
    partitions: IndexSet<Partition>,
    children: Vec<Option<Vec<PartitionChild>>>,
    weighings: IndexSet<Weighing>,
}

impl PartitionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the single-part partition holding `coins` coins.
    pub fn get_root(&mut self, coins: Count) -> PartitionId {
        assert!(coins > 0, "root partition needs coins");
        self.intern(Partition::from_sorted(vec![coins]))
    }

    /// Interns a validated partition.
    pub fn intern(&mut self, partition: Partition) -> PartitionId {
        let (index, inserted) = self.partitions.insert_full(partition);
        if inserted {
            self.children.push(None);
        }
        make_partition(index)
    }

    /// Validates raw part sizes and interns them.
    pub fn intern_parts(&mut self, parts: Vec<Count>) -> Result<PartitionId, BalanceError> {
        Ok(self.intern(Partition::new(parts)?))
    }

    /// Interns sizes that the caller guarantees are sorted and positive.
    pub fn intern_sorted(&mut self, parts: Vec<Count>) -> PartitionId {
        self.intern(Partition::from_sorted(parts))
    }

    /// Looks up an already interned partition.
    ///
    /// Sizes that do not form a valid partition are never interned.
    pub fn find(&self, parts: &[Count]) -> Option<PartitionId> {
        let partition = Partition::new(parts.to_vec()).ok()?;
        self.partitions.get_index_of(&partition).map(make_partition)
    }

    /// Partition behind a handle.
    pub fn partition(&self, id: PartitionId) -> &Partition {
        &self.partitions[id.index()]
    }

    /// Weighing descriptor behind a handle.
    pub fn weighing(&self, id: WeighingId) -> &Weighing {
        &self.weighings[id.index()]
    }

    /// Number of interned partitions.
    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    /// Number of interned weighing descriptors.
    pub fn weighing_count(&self) -> usize {
        self.weighings.len()
    }

    /// Every weighing reachable from `id`, computed on first request and cached.
    ///
    /// The list is empty only for a single coin.
    pub fn children_of(&mut self, id: PartitionId) -> &[PartitionChild] {
        if self.children[id.index()].is_none() {
            let children = self.enumerate_children(id);
            self.children[id.index()] = Some(children);
        }
        self.children[id.index()].as_deref().unwrap_or_default()
    }

    /// Cached children, if `children_of` already ran for `id`.
    pub fn cached_children(&self, id: PartitionId) -> Option<&[PartitionChild]> {
        self.children[id.index()].as_deref()
    }

    fn enumerate_children(&mut self, id: PartitionId) -> Vec<PartitionChild> {
        let parts = self.partitions[id.index()].parts().to_vec();
        let mut children = Vec::new();
        for selection in WeighingEnumerator::new(&parts) {
            let (output, weighing) = descriptor_for_selection(&parts, &selection);
            let output = self.intern(output);
            let (index, _) = self.weighings.insert_full(weighing);
            children.push(PartitionChild {
                weighing: make_weighing(index),
                output,
                symmetric: selection.is_symmetric(),
            });
        }
        trace!(parts = ?parts, weighings = children.len(), "enumerated weighings");
        children
    }

    /// Pan counts per input part for a child of `from`.
    pub fn selection_of(&self, from: PartitionId, child: &PartitionChild) -> PanSelection {
        selection_for_descriptor(
            self.partition(from).len(),
            self.weighing(child.weighing),
            self.partition(child.output),
        )
    }

    /// Summary such as `Partition: { 3 parts;  Sizes: [1, 1, 1] }`.
    pub fn describe_partition(&self, id: PartitionId) -> String {
        let partition = self.partition(id);
        let noun = if partition.len() == 1 { "part" } else { "parts" };
        format!(
            "Partition: {{ {} {};  Sizes: {} }}",
            partition.len(),
            noun,
            partition
        )
    }

    /// Describes the output partition of a weighing with the provenance of each part.
    ///
    /// Parts copied whole from an input part print as `p[i]`; parts split off
    /// by the weighing also name their pan, e.g. `p[0]@Left`.
    pub fn describe_weighing(&self, from: PartitionId, child: &PartitionChild) -> String {
        let output = self.partition(child.output);
        let weighing = self.weighing(child.weighing);
        let noun = if output.len() == 1 { "part" } else { "parts" };
        let mut text = format!(
            "Partition: {{ {} {};  Sizes: {};  Provenances: [",
            output.len(),
            noun,
            output
        );
        let input_parts = self.partition(from).len();
        for (idx, entry) in weighing.provenance().iter().enumerate() {
            if idx > 0 {
                text.push_str(", ");
            }
            let part = entry.part as usize;
            debug_assert!(part < input_parts);
            if weighing.arity(part) == 1 {
                text.push_str(&format!("p[{part}]"));
            } else {
                text.push_str(&entry.to_string());
            }
        }
        text.push_str("] }");
        text
    }

    /// Compact pan listing such as `L[1, 0] R[0, 1]`.
    pub fn describe_pans(&self, from: PartitionId, child: &PartitionChild) -> String {
        let selection = self.selection_of(from, child);
        format!("L{:?} R{:?}", selection.left, selection.right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_returns_the_same_handle() {
        let mut store = PartitionStore::new();
        let a = store.intern_parts(vec![1, 2, 2]).expect("valid");
        let b = store.intern_parts(vec![1, 2, 2]).expect("valid");
        assert_eq!(a, b);
        assert_eq!(store.partition_count(), 1);
        assert_eq!(store.find(&[1, 2, 2]), Some(a));
        assert_eq!(store.find(&[5]), None);
    }

    #[test]
    fn find_sees_outputs_of_weighings() {
        let mut store = PartitionStore::new();
        let root = store.get_root(3);
        let child = store.children_of(root)[0];
        assert_eq!(store.find(&[1, 1, 1]), Some(child.output));
        assert_eq!(store.find(&[3]), Some(root));
        assert_eq!(store.find(&[2, 1]), None);
        assert_eq!(store.find(&[]), None);
    }

    #[test]
    fn unsorted_parts_are_rejected() {
        let mut store = PartitionStore::new();
        let err = store.intern_parts(vec![2, 1]).unwrap_err();
        assert_eq!(err.code(), "unsorted-partition");
        let err = store.intern_parts(vec![]).unwrap_err();
        assert_eq!(err.code(), "empty-partition");
        let err = store.intern_parts(vec![0, 1]).unwrap_err();
        assert_eq!(err.code(), "empty-part");
    }

    #[test]
    fn children_are_cached() {
        let mut store = PartitionStore::new();
        let root = store.get_root(5);
        assert!(store.cached_children(root).is_none());
        let first = store.children_of(root).to_vec();
        let weighings = store.weighing_count();
        let second = store.children_of(root).to_vec();
        assert_eq!(first, second);
        assert_eq!(store.weighing_count(), weighings);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn descriptions_follow_provenance() {
        let mut store = PartitionStore::new();
        let root = store.get_root(3);
        let child = store.children_of(root)[0];
        assert!(child.symmetric);
        assert_eq!(
            store.describe_partition(root),
            "Partition: { 1 part;  Sizes: [3] }"
        );
        assert_eq!(
            store.describe_weighing(root, &child),
            "Partition: { 3 parts;  Sizes: [1, 1, 1];  Provenances: [p[0]@Left, p[0]@Right, p[0]@Aside] }"
        );
        assert_eq!(store.describe_pans(root, &child), "L[1] R[1]");
    }
}
