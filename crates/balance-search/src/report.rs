use balance_core::errors::{BalanceError, ErrorInfo};
use balance_core::Outcome;
use serde::{Deserialize, Serialize};

use crate::engine::SearchStats;
use crate::status::Bounds;

/// Witnessing strategy below a state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionTree {
    /// State summary.
    pub state: String,
    /// Bounds of the state when the tree was extracted.
    pub bounds: Bounds,
    /// No weighing is needed here.
    pub solved: bool,
    /// Weighing to perform next; `None` when solved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<WeighingStep>,
}

/// A weighing inside a [`DecisionTree`] with one branch per possible outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeighingStep {
    /// Coins per part on each pan.
    pub pans: String,
    /// Output partition with provenance.
    pub output: String,
    /// Right-heavier mirrors left-heavier and is not listed.
    pub symmetric: bool,
    /// Possible outcomes.
    pub branches: Vec<Branch>,
}

/// One outcome of a [`WeighingStep`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Observed outcome.
    pub outcome: Outcome,
    /// Strategy after observing it.
    pub tree: DecisionTree,
}

impl DecisionTree {
    /// Weighings needed in the worst case along this tree.
    pub fn height(&self) -> usize {
        match &self.step {
            None => 0,
            Some(step) => 1 + step.branches.iter().map(|b| b.tree.height()).max().unwrap_or(0),
        }
    }

    /// Number of solved leaves.
    pub fn leaves(&self) -> usize {
        match &self.step {
            None => 1,
            Some(step) => step.branches.iter().map(|b| b.tree.leaves()).sum(),
        }
    }
}

/// Summary of a search run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveReport {
    /// Problem summary.
    pub problem: String,
    /// Root lower bound.
    pub depth_min: u8,
    /// Root upper bound, if known.
    pub depth_max: Option<u8>,
    /// Bounds coincide.
    pub resolved: bool,
    /// Graph size after each deepening step.
    pub graph_sizes: Vec<usize>,
    /// Canonical states in the graph.
    pub states: usize,
    /// Interned partitions.
    pub partitions: usize,
    /// Interned weighing descriptors.
    pub weighings: usize,
    /// Expansion counters.
    pub stats: SearchStats,
    /// Witnessing tree, when requested and known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree: Option<DecisionTree>,
}

impl SolveReport {
    /// Pretty JSON rendering.
    pub fn to_json(&self) -> Result<String, BalanceError> {
        serde_json::to_string_pretty(self).map_err(|err| {
            BalanceError::Serde(ErrorInfo::new("report-serialize", err.to_string()))
        })
    }
}
