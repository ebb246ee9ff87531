#![deny(missing_docs)]

//! Interned coin partitions and the mirror-free weighing enumerator.
//!
//! A [`PartitionStore`] owns every partition and weighing descriptor seen
//! during a run. Handles returned by the store compare equal exactly when the
//! underlying values do, so callers never compare partitions structurally.

mod enumerate;
mod ids;
mod partition;
mod store;
mod weighing;

pub use enumerate::{PanSelection, WeighingEnumerator};
pub use partition::Partition;
pub use store::{PartitionChild, PartitionStore};
pub use weighing::{descriptor_for_selection, selection_for_descriptor, Provenance, Weighing};
