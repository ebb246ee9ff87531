//! Run parameters and their YAML loading.

use std::fmt::{self, Display};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use balance_core::errors::{BalanceError, ErrorInfo};
use balance_core::{Count, DEPTH_UNKNOWN, MAX_COINS};
use serde::{Deserialize, Serialize};

/// How aggressively parts are merged during canonicalisation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JoinStrategy {
    /// Never merge parts.
    None,
    /// Merge parts that hold a single variety in every distribution, in lockstep.
    #[default]
    SameVariety,
    /// Merge any pair of parts whose joint counts carry no split information.
    All,
    /// Run both joining strategies, report disagreements and keep `All`.
    Validate,
}

impl JoinStrategy {
    /// Name used in configuration files and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            JoinStrategy::None => "none",
            JoinStrategy::SameVariety => "same-variety",
            JoinStrategy::All => "all",
            JoinStrategy::Validate => "validate",
        }
    }
}

impl Display for JoinStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JoinStrategy {
    type Err = BalanceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "none" => Ok(JoinStrategy::None),
            "same-variety" => Ok(JoinStrategy::SameVariety),
            "all" => Ok(JoinStrategy::All),
            "validate" => Ok(JoinStrategy::Validate),
            other => Err(BalanceError::Config(
                ErrorInfo::new("unknown-join-strategy", "unrecognised join strategy")
                    .with_context("value", other)
                    .with_hint("expected one of none, same-variety, all, validate"),
            )),
        }
    }
}

/// YAML-configurable parameters of a solver run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of coins; must be odd.
    #[serde(default = "default_coin_count")]
    pub coin_count: Count,
    /// Restrict the heavy count to the two values around half the coins.
    #[serde(default = "default_almost_balanced")]
    pub almost_balanced: bool,
    /// Part joining strategy.
    #[serde(default)]
    pub join_strategy: JoinStrategy,
    /// Most column orders tried when breaking signature ties.
    #[serde(default = "default_permutation_limit")]
    pub permutation_limit: usize,
    /// Disable to keep raw states (rows sorted only), for comparisons.
    #[serde(default = "default_canonicalize")]
    pub canonicalize: bool,
    /// Deepening stops once the root's lower bound exceeds this; defaults to the coin count.
    #[serde(default)]
    pub stop_depth: Option<u8>,
}

fn default_coin_count() -> Count {
    7
}

fn default_almost_balanced() -> bool {
    true
}

fn default_permutation_limit() -> usize {
    40_320
}

fn default_canonicalize() -> bool {
    true
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            coin_count: default_coin_count(),
            almost_balanced: default_almost_balanced(),
            join_strategy: JoinStrategy::default(),
            permutation_limit: default_permutation_limit(),
            canonicalize: default_canonicalize(),
            stop_depth: None,
        }
    }
}

impl RunConfig {
    /// Parses a YAML document; absent fields take their defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, BalanceError> {
        let config: RunConfig = serde_yaml::from_str(text).map_err(|err| {
            BalanceError::Config(ErrorInfo::new("config-parse", err.to_string()))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a YAML file.
    pub fn load(path: &Path) -> Result<Self, BalanceError> {
        let text = fs::read_to_string(path).map_err(|err| {
            BalanceError::Config(
                ErrorInfo::new("config-io", err.to_string())
                    .with_context("path", path.display()),
            )
        })?;
        Self::from_yaml_str(&text)
    }

    /// Checks every parameter precondition.
    pub fn validate(&self) -> Result<(), BalanceError> {
        validate_coin_count(self.coin_count)?;
        if self.permutation_limit == 0 {
            return Err(BalanceError::Config(
                ErrorInfo::new(
                    "invalid-permutation-limit",
                    "permutation limit must allow at least one order",
                )
                .with_context("permutation_limit", self.permutation_limit),
            ));
        }
        if let Some(depth) = self.stop_depth {
            if depth == DEPTH_UNKNOWN {
                return Err(BalanceError::Config(
                    ErrorInfo::new("invalid-stop-depth", "stop depth collides with the unknown-depth marker")
                        .with_context("stop_depth", depth)
                        .with_hint("use a value below 255"),
                ));
            }
        }
        Ok(())
    }

    /// Stop depth to pass to the engine.
    pub fn effective_stop_depth(&self) -> u8 {
        self.stop_depth.unwrap_or(self.coin_count)
    }
}

/// Rejects coin counts the puzzle is not defined for.
pub fn validate_coin_count(coins: Count) -> Result<(), BalanceError> {
    if coins < 3 {
        return Err(BalanceError::Input(
            ErrorInfo::new("too-few-coins", "at least three coins are needed")
                .with_context("coins", coins),
        ));
    }
    if coins % 2 == 0 {
        return Err(BalanceError::Input(
            ErrorInfo::new("even-coin-count", "coin count must be odd")
                .with_context("coins", coins)
                .with_hint("an odd count guarantees a strict majority"),
        ));
    }
    if coins > MAX_COINS {
        return Err(BalanceError::Input(
            ErrorInfo::new("too-many-coins", "coin count exceeds the supported maximum")
                .with_context("coins", coins)
                .with_context("max", MAX_COINS),
        ));
    }
    Ok(())
}
