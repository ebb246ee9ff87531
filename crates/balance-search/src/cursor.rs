use balance_core::{Outcome, StateId};

use crate::engine::SearchEngine;
use crate::problem::Problem;
use crate::status::{Bounds, Child};

/// Position in the search graph, remembered as the path taken from the root.
///
/// Each step records the admitted weighing and the outcome followed, so a
/// node reached along different paths is visited once per path.
#[derive(Debug, Clone)]
pub struct Cursor<'e, P: Problem> {
    engine: &'e SearchEngine<P>,
    path: Vec<StateId>,
    steps: Vec<(usize, Outcome)>,
}

impl<'e, P: Problem> Cursor<'e, P> {
    pub(crate) fn new(engine: &'e SearchEngine<P>) -> Self {
        Self {
            engine,
            path: vec![engine.root()],
            steps: Vec::new(),
        }
    }

    /// State under the cursor.
    pub fn state(&self) -> StateId {
        self.path[self.path.len() - 1]
    }

    /// Number of weighings between the root and the cursor.
    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    /// Bounds of the state under the cursor.
    pub fn bounds(&self) -> Bounds {
        self.engine.bounds(self.state())
    }

    /// Admitted weighing that led to the cursor, `None` at the root.
    pub fn weighing(&self) -> Option<&'e Child> {
        let (child, _) = *self.steps.last()?;
        let parent = self.path[self.path.len() - 2];
        self.engine.children(parent).get(child)
    }

    /// Outcome followed to reach the cursor, `None` at the root.
    pub fn outcome(&self) -> Option<Outcome> {
        self.steps.last().map(|&(_, outcome)| outcome)
    }

    /// Descends to the first present outcome of the first admitted weighing.
    pub fn first_child(&mut self) -> bool {
        match first_from(self.engine.children(self.state()), 0, 0) {
            Some((child, outcome, next)) => {
                self.steps.push((child, outcome));
                self.path.push(next);
                true
            }
            None => false,
        }
    }

    /// Moves to the next outcome of the same weighing, then to later weighings.
    pub fn next_sibling(&mut self) -> bool {
        let Some(&(child, outcome)) = self.steps.last() else {
            return false;
        };
        let parent = self.path[self.path.len() - 2];
        match first_from(self.engine.children(parent), child, outcome.index() + 1) {
            Some((child, outcome, next)) => {
                self.steps.pop();
                self.path.pop();
                self.steps.push((child, outcome));
                self.path.push(next);
                true
            }
            None => false,
        }
    }

    /// Returns to the node the cursor came from.
    pub fn parent(&mut self) -> bool {
        if self.steps.pop().is_none() {
            return false;
        }
        self.path.pop();
        true
    }
}

fn first_from(children: &[Child], child: usize, outcome: usize) -> Option<(usize, Outcome, StateId)> {
    let mut slot = outcome;
    for (position, entry) in children.iter().enumerate().skip(child) {
        for candidate in Outcome::ALL.into_iter().skip(slot) {
            if let Some(next) = entry.outcomes[candidate.index()] {
                return Some((position, candidate, next));
            }
        }
        slot = 0;
    }
    None
}
