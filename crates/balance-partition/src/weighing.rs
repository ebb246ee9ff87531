use std::fmt::{self, Display};

use balance_core::{Count, Placement};
use serde::{Deserialize, Serialize};

use crate::enumerate::PanSelection;
use crate::partition::Partition;

/// Origin of one output part: the input part its coins came from and the pan they sat in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Provenance {
    /// Index of the input part.
    pub part: Count,
    /// Where those coins were placed.
    pub placement: Placement,
}

impl Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p[{}]@{}", self.part, self.placement)
    }
}

/// Weighing recorded as the provenance of every part of the refined partition.
///
/// Entries follow the output partition: ascending size, ties broken by input
/// part and then placement. The descriptor alone does not say how many coins
/// went where; pair it with its output partition for that.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Weighing {
    provenance: Vec<Provenance>,
}

impl Weighing {
    /// Provenance of each output part.
    pub fn provenance(&self) -> &[Provenance] {
        &self.provenance
    }

    /// Number of output parts.
    pub fn len(&self) -> usize {
        self.provenance.len()
    }

    /// True when the weighing has no output parts (never produced by the store).
    pub fn is_empty(&self) -> bool {
        self.provenance.is_empty()
    }

    /// Number of output parts drawn from input part `part`.
    pub fn arity(&self, part: usize) -> usize {
        self.provenance
            .iter()
            .filter(|entry| entry.part as usize == part)
            .count()
    }
}

impl Display for Weighing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (idx, entry) in self.provenance.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{entry}")?;
        }
        write!(f, "]")
    }
}

/// Builds the output partition and descriptor produced by a pan selection.
///
/// Each input part contributes its left, right and set-aside coins as
/// separate output parts; empty contributions are dropped.
pub fn descriptor_for_selection(parts: &[Count], selection: &PanSelection) -> (Partition, Weighing) {
    assert_eq!(parts.len(), selection.left.len());
    assert_eq!(parts.len(), selection.right.len());
    let mut entries = Vec::with_capacity(parts.len() * 3);
    for (index, &size) in parts.iter().enumerate() {
        let left = selection.left[index];
        let right = selection.right[index];
        assert!(left + right <= size, "pan selection exceeds part {index}");
        for (placement, count) in [
            (Placement::Left, left),
            (Placement::Right, right),
            (Placement::Aside, size - left - right),
        ] {
            if count > 0 {
                let provenance = Provenance {
                    part: index as Count,
                    placement,
                };
                entries.push((count, provenance));
            }
        }
    }
    entries.sort();
    let (sizes, provenance): (Vec<_>, Vec<_>) = entries.into_iter().unzip();
    (Partition::from_sorted(sizes), Weighing { provenance })
}

/// Recovers the per-part pan counts from a descriptor and its output partition.
pub fn selection_for_descriptor(
    input_parts: usize,
    weighing: &Weighing,
    output: &Partition,
) -> PanSelection {
    assert_eq!(weighing.len(), output.len());
    let mut selection = PanSelection {
        left: vec![0; input_parts],
        right: vec![0; input_parts],
    };
    for (entry, &size) in weighing.provenance.iter().zip(output.parts()) {
        let part = entry.part as usize;
        match entry.placement {
            Placement::Left => selection.left[part] += size,
            Placement::Right => selection.right[part] += size,
            Placement::Aside => {}
        }
    }
    selection
}
