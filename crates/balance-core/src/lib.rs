#![deny(missing_docs)]
#![doc = "Shared vocabulary for the two-pan balance solver: interned handles, pan placements, weighing outcomes and structured errors."]

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

pub mod errors;

pub use errors::{BalanceError, ErrorInfo};

macro_rules! interned_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an identifier from its raw table index.
            pub fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            /// Returns the raw table index.
            pub fn as_raw(&self) -> u32 {
                self.0
            }

            /// Returns the raw table index widened for slice access.
            pub fn index(&self) -> usize {
                self.0 as usize
            }
        }
    };
}

interned_id!(
    /// Handle of an interned partition. Equal handles mean equal partitions.
    PartitionId
);
interned_id!(
    /// Handle of an interned weighing descriptor.
    WeighingId
);
interned_id!(
    /// Handle of a canonical hypothesis state inside a search graph.
    StateId
);

/// Number of coins, parts or pan selections. Every count in the solver fits a byte.
pub type Count = u8;

/// Depth value meaning "no upper bound found yet".
pub const DEPTH_UNKNOWN: u8 = u8::MAX;

/// Largest coin count accepted by the solver.
///
/// Labeling counts are bounded by `2^coins` and must fit a `u64`.
pub const MAX_COINS: Count = 63;

/// Where the coins of an output part sat during a weighing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Placement {
    /// Coins were on the left pan.
    Left,
    /// Coins were on the right pan.
    Right,
    /// Coins were set aside.
    Aside,
}

impl Placement {
    /// All placements in descriptor order.
    pub const ALL: [Placement; 3] = [Placement::Left, Placement::Right, Placement::Aside];

    /// Swaps the two pans, leaving set-aside coins alone.
    pub fn mirror(self) -> Self {
        match self {
            Placement::Left => Placement::Right,
            Placement::Right => Placement::Left,
            Placement::Aside => Placement::Aside,
        }
    }

    /// Short label used in weighing descriptions.
    pub fn label(self) -> &'static str {
        match self {
            Placement::Left => "Left",
            Placement::Right => "Right",
            Placement::Aside => "Aside",
        }
    }
}

impl Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Observable result of a weighing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// The left pan went down.
    LeftHeavier,
    /// The right pan went down.
    RightHeavier,
    /// The pans balanced.
    Balances,
}

impl Outcome {
    /// All outcomes in [`OutcomeArray`] order.
    pub const ALL: [Outcome; 3] = [Outcome::LeftHeavier, Outcome::RightHeavier, Outcome::Balances];

    /// Position of the outcome inside an [`OutcomeArray`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Classifies a weighing from the heavy-coin counts on each pan.
    pub fn from_pan_counts(left: u32, right: u32) -> Self {
        match left.cmp(&right) {
            std::cmp::Ordering::Greater => Outcome::LeftHeavier,
            std::cmp::Ordering::Less => Outcome::RightHeavier,
            std::cmp::Ordering::Equal => Outcome::Balances,
        }
    }

    /// Label used when printing decision trees.
    pub fn label(self) -> &'static str {
        match self {
            Outcome::LeftHeavier => "Left",
            Outcome::RightHeavier => "Right",
            Outcome::Balances => "Balanced",
        }
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One slot per [`Outcome`], indexed by [`Outcome::index`].
pub type OutcomeArray<T> = [T; 3];
