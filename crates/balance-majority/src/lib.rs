#![deny(missing_docs)]

//! Find-the-majority-variety puzzle for the balance search engine.
//!
//! `c` coins (odd) come in a heavier and a lighter variety, one of them in
//! the majority. A [`HypothesisState`] lists every per-part heavy-coin count
//! still consistent with the weighings seen so far; the [`Canonicalizer`]
//! folds equivalent states together before they reach the search graph.

pub mod canonical;
pub mod config;
mod fingerprint;
mod problem;
mod split;
pub mod state;
pub mod transition;

pub use canonical::{CanonStats, Canonicalizer};
pub use config::{JoinStrategy, RunConfig};
pub use fingerprint::{graph_fingerprint, state_fingerprint};
pub use problem::{new_problem, FindMajority};
pub use state::{Distribution, HypothesisState};
