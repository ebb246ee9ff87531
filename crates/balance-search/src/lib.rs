#![deny(missing_docs)]

//! Iterative-deepening AND-OR search over canonical hypothesis states.
//!
//! The engine is generic over a [`Problem`], which supplies the root state,
//! the outcome states of a weighing and the solved test. Every state the
//! problem hands back is interned by value, so equivalent states reached
//! along different weighing sequences share one node and one set of bounds.

mod cursor;
mod engine;
mod problem;
mod report;
mod status;

pub use cursor::Cursor;
pub use engine::{SearchEngine, SearchStats};
pub use problem::Problem;
pub use report::{Branch, DecisionTree, SolveReport, WeighingStep};
pub use status::{Bounds, Child};
