use balance_core::{PartitionId, WeighingId};

/// Creates a [`PartitionId`] from a table index.
pub(crate) fn make_partition(index: usize) -> PartitionId {
    PartitionId::from_raw(index as u32)
}

/// Creates a [`WeighingId`] from a table index.
pub(crate) fn make_weighing(index: usize) -> WeighingId {
    WeighingId::from_raw(index as u32)
}
