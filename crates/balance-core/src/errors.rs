//! Structured error types shared by every balance crate.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Payload carried by each [`BalanceError`] family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable, machine readable code such as `even-coin-count`.
    pub code: String,
    /// Human readable diagnostic.
    pub message: String,
    /// Key/value pairs naming the offending inputs.
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Records a context entry.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Attaches a remediation hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Renders as `[code] message (key=value, ...); hint: ...`.
impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        let mut context = self.context.iter();
        if let Some((key, value)) = context.next() {
            write!(f, " ({key}={value}")?;
            for (key, value) in context {
                write!(f, ", {key}={value}")?;
            }
            f.write_str(")")?;
        }
        match &self.hint {
            Some(hint) => write!(f, "; hint: {hint}"),
            None => Ok(()),
        }
    }
}

/// Error type returned by the fallible entry points of the solver.
///
/// Only malformed inputs are reported this way. Broken internal invariants
/// (a non-canonical weighing, an unsorted partition) abort with a panic since
/// they would poison every later lookup in the shared tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum BalanceError {
    /// Rejected problem parameters (coin count, stop depth).
    #[error("input error: {0}")]
    Input(ErrorInfo),
    /// Malformed partitions or weighing descriptors handed to the store.
    #[error("partition error: {0}")]
    Partition(ErrorInfo),
    /// Misuse of the search engine or its graph accessors.
    #[error("search error: {0}")]
    Search(ErrorInfo),
    /// Configuration loading and validation failures.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Report serialisation failures.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl BalanceError {
    /// Returns the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            BalanceError::Input(info)
            | BalanceError::Partition(info)
            | BalanceError::Search(info)
            | BalanceError::Config(info)
            | BalanceError::Serde(info) => info,
        }
    }

    /// Shorthand for the stable error code.
    pub fn code(&self) -> &str {
        &self.info().code
    }
}
