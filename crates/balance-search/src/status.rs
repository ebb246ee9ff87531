use balance_core::{OutcomeArray, PartitionId, StateId, WeighingId, DEPTH_UNKNOWN};
use serde::{Deserialize, Serialize};

/// Bracket on the number of further weighings a state needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    /// Proven lower bound.
    pub min: u8,
    /// Best upper bound found so far, `None` while no strategy is known.
    pub max: Option<u8>,
}

impl Bounds {
    /// True once the exact depth is known.
    pub fn is_resolved(&self) -> bool {
        self.max == Some(self.min)
    }
}

/// A weighing admitted at a node and the canonical states it leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
    /// Outcome states; `None` for impossible or mirrored-away outcomes.
    pub outcomes: OutcomeArray<Option<StateId>>,
    /// Weighing applied.
    pub weighing: WeighingId,
    /// Partition the weighing refines the node's partition into.
    pub output: PartitionId,
    /// The weighing is its own mirror, so only the left-heavier branch is kept.
    pub symmetric: bool,
    /// Position of the weighing in the partition's weighing list.
    pub index: usize,
}

impl Child {
    /// Present outcome states.
    pub fn states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.outcomes.iter().flatten().copied()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Status {
    pub(crate) depth_min: u8,
    pub(crate) depth_max: u8,
    pub(crate) expanded: bool,
    pub(crate) children: Vec<Child>,
}

impl Status {
    pub(crate) fn solved() -> Self {
        Self {
            depth_min: 0,
            depth_max: 0,
            expanded: true,
            children: Vec::new(),
        }
    }

    /// Any state other than a solved one needs at least one weighing.
    pub(crate) fn unsolved() -> Self {
        Self {
            depth_min: 1,
            depth_max: DEPTH_UNKNOWN,
            expanded: false,
            children: Vec::new(),
        }
    }

    pub(crate) fn root() -> Self {
        Self {
            depth_min: 0,
            ..Self::unsolved()
        }
    }

    pub(crate) fn is_resolved(&self) -> bool {
        self.depth_min == self.depth_max
    }

    pub(crate) fn is_solved(&self) -> bool {
        self.depth_max == 0
    }

    /// Moves the bounds toward each other; never loosens them.
    pub(crate) fn tighten(&mut self, min: u8, max: u8) {
        self.depth_min = self.depth_min.max(min);
        self.depth_max = self.depth_max.min(max);
        debug_assert!(
            self.depth_min <= self.depth_max,
            "crossed bounds {}..{}",
            self.depth_min,
            self.depth_max
        );
    }

    pub(crate) fn bounds(&self) -> Bounds {
        Bounds {
            min: self.depth_min,
            max: (self.depth_max != DEPTH_UNKNOWN).then_some(self.depth_max),
        }
    }
}
