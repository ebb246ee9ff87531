use std::fmt::{self, Display};

use balance_core::errors::{BalanceError, ErrorInfo};
use balance_core::Count;
use serde::{Deserialize, Serialize};

/// Grouping of the coins into parts whose members are interchangeable.
///
/// Part sizes are positive and non-decreasing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Partition {
    parts: Vec<Count>,
}

impl Partition {
    /// Validates and wraps a list of part sizes.
    pub fn new(parts: Vec<Count>) -> Result<Self, BalanceError> {
        if parts.is_empty() {
            return Err(BalanceError::Partition(ErrorInfo::new(
                "empty-partition",
                "a partition needs at least one part",
            )));
        }
        if let Some(position) = parts.iter().position(|&size| size == 0) {
            return Err(BalanceError::Partition(
                ErrorInfo::new("empty-part", "part sizes must be positive")
                    .with_context("part", position),
            ));
        }
        if let Some(position) = parts.windows(2).position(|pair| pair[0] > pair[1]) {
            return Err(BalanceError::Partition(
                ErrorInfo::new("unsorted-partition", "part sizes must be non-decreasing")
                    .with_context("part", position + 1)
                    .with_hint("sort the sizes before interning"),
            ));
        }
        if parts.iter().map(|&size| size as u32).sum::<u32>() > Count::MAX as u32 {
            return Err(BalanceError::Partition(
                ErrorInfo::new("too-many-coins", "partition holds more coins than a count can name")
                    .with_context("parts", parts.len()),
            ));
        }
        Ok(Self { parts })
    }

    /// Wraps sizes that are already known to be canonical.
    pub(crate) fn from_sorted(parts: Vec<Count>) -> Self {
        assert!(
            !parts.is_empty() && parts[0] > 0 && parts.windows(2).all(|pair| pair[0] <= pair[1]),
            "non-canonical partition {parts:?}"
        );
        Self { parts }
    }

    /// Part sizes in ascending order.
    pub fn parts(&self) -> &[Count] {
        &self.parts
    }

    /// Number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Always false for a valid partition.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Size of part `index`.
    pub fn size(&self, index: usize) -> Count {
        self.parts[index]
    }

    /// Total number of coins.
    pub fn coin_count(&self) -> u32 {
        self.parts.iter().map(|&size| size as u32).sum()
    }
}

impl Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.parts)
    }
}
