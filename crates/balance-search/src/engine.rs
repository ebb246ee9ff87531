use std::collections::BTreeSet;

use balance_core::errors::{BalanceError, ErrorInfo};
use balance_core::{Outcome, OutcomeArray, PartitionId, StateId, WeighingId, DEPTH_UNKNOWN};
use balance_partition::{PartitionChild, PartitionStore};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::cursor::Cursor;
use crate::problem::Problem;
use crate::report::{Branch, DecisionTree, SolveReport, WeighingStep};
use crate::status::{Bounds, Child, Status};

/// Counters accumulated while expanding nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Nodes whose weighings have been evaluated.
    pub expanded: usize,
    /// Weighings evaluated across all expansions.
    pub weighings_considered: usize,
    /// Weighings kept after pruning and deduplication.
    pub weighings_admitted: usize,
}

/// Graph of canonical states explored by iterative deepening.
///
/// Node bounds only ever tighten. A caller that stops early through
/// `stop_depth` still holds valid, if loose, bounds.
#[derive(Debug)]
pub struct SearchEngine<P: Problem> {
    problem: P,
    store: PartitionStore,
    states: IndexMap<P::State, Status>,
    root: StateId,
    stats: SearchStats,
}

impl<P: Problem> SearchEngine<P> {
    /// Creates an engine whose graph holds only the problem's root state.
    pub fn new(mut problem: P) -> Self {
        let mut store = PartitionStore::new();
        let root_state = problem.make_root(&mut store);
        let status = if problem.is_solved(&store, &root_state) {
            Status::solved()
        } else {
            Status::root()
        };
        let mut states = IndexMap::new();
        let (index, _) = states.insert_full(root_state, status);
        Self {
            problem,
            store,
            states,
            root: StateId::from_raw(index as u32),
            stats: SearchStats::default(),
        }
    }

    /// Deepens the search until the root resolves or its lower bound passes
    /// `stop_depth`. Returns the graph size after each deepening step.
    pub fn solve_breadth(&mut self, stop_depth: u8) -> Vec<usize> {
        let mut sizes = Vec::new();
        loop {
            let root = &self.states[self.root.index()];
            if root.is_resolved() {
                break;
            }
            let target = root.depth_min;
            if target > stop_depth {
                break;
            }
            self.improve_node(self.root, target);
            sizes.push(self.states.len());
            let bounds = self.bounds(self.root);
            info!(
                depth = target,
                states = self.states.len(),
                depth_min = bounds.min,
                depth_max = ?bounds.max,
                "deepening step finished"
            );
        }
        sizes
    }

    /// Tightens the bounds of `id` until either a strategy of at most
    /// `target` weighings is known or none can exist.
    ///
    /// On return the node satisfies `depth_max <= target` or
    /// `depth_min > target`.
    pub fn improve_node(&mut self, id: StateId, target: u8) {
        if !self.needs_work(id, target) {
            return;
        }
        self.expand(id);
        if !self.needs_work(id, target) {
            return;
        }
        // An unsolved node has depth_min >= 1 once expanded, so target >= 1 here.
        let below = target - 1;
        let count = self.states[id.index()].children.len();
        for position in 0..count {
            let outcomes = self.states[id.index()].children[position].outcomes;
            if outcomes
                .iter()
                .flatten()
                .any(|state| self.states[state.index()].depth_min > below)
            {
                continue;
            }
            for state in outcomes.iter().flatten() {
                self.improve_node(*state, below);
                if self.states[state.index()].depth_min > below {
                    break;
                }
            }
            self.refresh_bounds(id);
            if self.states[id.index()].depth_max <= target {
                return;
            }
        }
        self.refresh_bounds(id);
    }

    fn needs_work(&self, id: StateId, target: u8) -> bool {
        let status = &self.states[id.index()];
        !status.is_resolved() && status.depth_max > target && status.depth_min <= target
    }

    /// Evaluates every weighing of the node's partition once.
    ///
    /// Weighings with two impossible outcomes are dropped, the right-heavier
    /// branch of a self-mirrored weighing is dropped, and weighings leading to
    /// the same set of states as an earlier one are dropped. A weighing whose
    /// outcomes are all solved resolves the node at depth one.
    pub fn expand(&mut self, id: StateId) {
        if self.states[id.index()].expanded {
            return;
        }
        self.stats.expanded += 1;
        let state = self.state(id).clone();
        let partition = self.problem.partition_of(&state);
        let options = self.store.children_of(partition).to_vec();

        let mut seen: BTreeSet<Vec<StateId>> = BTreeSet::new();
        let mut children = Vec::new();
        for (index, option) in options.iter().enumerate() {
            self.stats.weighings_considered += 1;
            let raw = self.problem.apply_weighing(&mut self.store, &state, option);
            let mut outcomes: OutcomeArray<Option<P::State>> = raw.map(|outcome| {
                if self.problem.is_impossible(&outcome) {
                    None
                } else {
                    Some(outcome)
                }
            });
            let impossible = outcomes.iter().filter(|outcome| outcome.is_none()).count();
            if impossible >= 2 {
                trace!(state = id.as_raw(), weighing = index, "weighing carries no information");
                continue;
            }
            if option.symmetric {
                outcomes[Outcome::RightHeavier.index()] = None;
            }
            let ids = outcomes.map(|outcome| outcome.map(|value| self.intern(value)));

            let mut key: Vec<StateId> = ids.iter().flatten().copied().collect();
            key.sort();
            key.dedup();
            if !seen.insert(key) {
                trace!(state = id.as_raw(), weighing = index, "duplicate outcome set");
                continue;
            }
            self.stats.weighings_admitted += 1;

            let child = Child {
                outcomes: ids,
                weighing: option.weighing,
                output: option.output,
                symmetric: option.symmetric,
                index,
            };
            if child
                .states()
                .all(|state| self.states[state.index()].is_solved())
            {
                let status = &mut self.states[id.index()];
                status.children = vec![child];
                status.expanded = true;
                status.tighten(1, 1);
                debug!(state = id.as_raw(), weighings = options.len(), "resolved by a single weighing");
                return;
            }
            children.push(child);
        }
        assert!(
            !children.is_empty(),
            "unsolved state {id:?} admits no informative weighing"
        );
        debug!(
            state = id.as_raw(),
            weighings = options.len(),
            admitted = children.len(),
            states = self.states.len(),
            "expanded state"
        );
        let status = &mut self.states[id.index()];
        status.children = children;
        status.expanded = true;
        self.refresh_bounds(id);
    }

    fn intern(&mut self, state: P::State) -> StateId {
        if let Some(index) = self.states.get_index_of(&state) {
            return StateId::from_raw(index as u32);
        }
        let status = if self.problem.is_solved(&self.store, &state) {
            Status::solved()
        } else {
            Status::unsolved()
        };
        let (index, _) = self.states.insert_full(state, status);
        StateId::from_raw(index as u32)
    }

    /// Worst lower and upper bound over a child's outcomes.
    fn outcome_bounds(&self, child: &Child) -> (u8, u8) {
        child.states().fold((0, 0), |(min, max), state| {
            let status = &self.states[state.index()];
            (min.max(status.depth_min), max.max(status.depth_max))
        })
    }

    fn refresh_bounds(&mut self, id: StateId) {
        let mut best_min = DEPTH_UNKNOWN;
        let mut best_max = DEPTH_UNKNOWN;
        for child in &self.states[id.index()].children {
            let (min, max) = self.outcome_bounds(child);
            best_min = best_min.min(min);
            best_max = best_max.min(max);
        }
        let max = if best_max == DEPTH_UNKNOWN {
            DEPTH_UNKNOWN
        } else {
            best_max + 1
        };
        self.states[id.index()].tighten(best_min.saturating_add(1), max);
    }

    /// Handle of the root state.
    pub fn root(&self) -> StateId {
        self.root
    }

    /// Number of canonical states in the graph.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always false: the root is inserted on construction.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Current bounds of a node.
    pub fn bounds(&self, id: StateId) -> Bounds {
        self.states[id.index()].bounds()
    }

    /// True once the node's children have been computed.
    pub fn is_expanded(&self, id: StateId) -> bool {
        self.states[id.index()].expanded
    }

    /// Admitted weighings of a node; empty until expanded.
    pub fn children(&self, id: StateId) -> &[Child] {
        &self.states[id.index()].children
    }

    /// Weighing applied by the `child`-th admitted weighing of a node.
    pub fn weighing_for_child(&self, id: StateId, child: usize) -> Result<WeighingId, BalanceError> {
        self.children(id)
            .get(child)
            .map(|entry| entry.weighing)
            .ok_or_else(|| {
                BalanceError::Search(
                    ErrorInfo::new("unknown-child", "node has no such child")
                        .with_context("state", id.as_raw())
                        .with_context("child", child)
                        .with_context("children", self.children(id).len()),
                )
            })
    }

    /// State value behind a handle.
    pub fn state(&self, id: StateId) -> &P::State {
        match self.states.get_index(id.index()) {
            Some((state, _)) => state,
            None => panic!("unknown state {id:?}"),
        }
    }

    /// Looks up the handle of an interned state.
    pub fn find(&self, state: &P::State) -> Option<StateId> {
        self.states
            .get_index_of(state)
            .map(|index| StateId::from_raw(index as u32))
    }

    /// Partition of a node's state.
    pub fn partition_of(&self, id: StateId) -> PartitionId {
        self.problem.partition_of(self.state(id))
    }

    /// Problem summary.
    pub fn describe(&self) -> String {
        self.problem.describe()
    }

    /// Summary of a node's state.
    pub fn describe_state(&self, id: StateId) -> String {
        self.problem.describe_state(&self.store, self.state(id))
    }

    /// Pan contents and output partition of an admitted weighing.
    pub fn describe_child(&self, id: StateId, child: &Child) -> (String, String) {
        let from = self.partition_of(id);
        let option = PartitionChild {
            weighing: child.weighing,
            output: child.output,
            symmetric: child.symmetric,
        };
        (
            self.store.describe_pans(from, &option),
            self.store.describe_weighing(from, &option),
        )
    }

    /// Partition and weighing tables.
    pub fn store(&self) -> &PartitionStore {
        &self.store
    }

    /// Problem definition.
    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// Expansion counters.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Cursor positioned at the root.
    pub fn cursor(&self) -> Cursor<'_, P> {
        Cursor::new(self)
    }

    /// Admitted weighing achieving the node's upper bound, if one is known.
    pub fn best_child(&self, id: StateId) -> Option<&Child> {
        let status = &self.states[id.index()];
        if status.is_solved() || status.depth_max == DEPTH_UNKNOWN {
            return None;
        }
        status
            .children
            .iter()
            .filter(|child| {
                let (_, max) = self.outcome_bounds(child);
                max != DEPTH_UNKNOWN && max < status.depth_max
            })
            .min_by_key(|child| self.outcome_bounds(child).1)
    }

    /// Witnessing decision tree below `id`, following [`best_child`](Self::best_child).
    ///
    /// Returns `None` while the node has no known upper bound.
    pub fn decision_tree_from(&self, id: StateId) -> Option<DecisionTree> {
        let bounds = self.bounds(id);
        bounds.max?;
        let solved = self.states[id.index()].is_solved();
        let step = if solved {
            None
        } else {
            let child = self.best_child(id)?;
            let (pans, output) = self.describe_child(id, child);
            let mut branches = Vec::new();
            for outcome in Outcome::ALL {
                if let Some(next) = child.outcomes[outcome.index()] {
                    branches.push(Branch {
                        outcome,
                        tree: self.decision_tree_from(next)?,
                    });
                }
            }
            Some(WeighingStep {
                pans,
                output,
                symmetric: child.symmetric,
                branches,
            })
        };
        Some(DecisionTree {
            state: self.describe_state(id),
            bounds,
            solved,
            step,
        })
    }

    /// Witnessing decision tree for the root.
    pub fn decision_tree(&self) -> Option<DecisionTree> {
        self.decision_tree_from(self.root)
    }

    /// Summary of the run so far.
    pub fn report(&self, graph_sizes: Vec<usize>, with_tree: bool) -> SolveReport {
        let bounds = self.bounds(self.root);
        SolveReport {
            problem: self.describe(),
            depth_min: bounds.min,
            depth_max: bounds.max,
            resolved: bounds.is_resolved(),
            graph_sizes,
            states: self.states.len(),
            partitions: self.store.partition_count(),
            weighings: self.store.weighing_count(),
            stats: self.stats,
            tree: if with_tree { self.decision_tree() } else { None },
        }
    }
}
