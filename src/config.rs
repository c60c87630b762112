//! Commander configuration.
//!
//! Loaded from JSON with per-field defaults, then validated so that every
//! problem is reported at once instead of one per attempt.

use crate::core::DEFAULT_HISTORY_CAPACITY;
use crate::route::PlannerConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// A single configuration problem.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigViolation {
    #[error("speed_limit must be finite and non-negative (got {0})")]
    InvalidSpeedLimit(f32),

    #[error("max_replan_attempts must be at least 1")]
    NoReplanAttempts,

    #[error("blockage_staleness_ms must be at least 1")]
    NoBlockageStaleness,

    #[error("checkpoint_tolerance must be finite and positive (got {0})")]
    InvalidTolerance(f64),

    #[error("max_expansions must be at least 1")]
    NoExpansionBudget,
}

/// Errors from loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid commander configuration: {}", join_violations(.0))]
    Invalid(Vec<ConfigViolation>),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

fn check(ok: bool, violation: ConfigViolation) -> Validation<(), NonEmptyVec<ConfigViolation>> {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(violation)
    }
}

fn join_violations(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Construction-time settings for a `Commander`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommanderConfig {
    /// Extra logging: 1 adds per-cycle summaries, 2 adds event candidates
    #[serde(default)]
    pub verbosity: u8,

    /// Configured speed limit in m/s (default: 6.0)
    #[serde(default = "default_speed_limit")]
    pub speed_limit: f32,

    /// Failed plans tolerated per mission segment before aborting (default: 3)
    #[serde(default = "default_max_replan_attempts")]
    pub max_replan_attempts: u32,

    /// Age at which a blockage is forgotten, in milliseconds (default: 60000)
    #[serde(default = "default_blockage_staleness_ms")]
    pub blockage_staleness_ms: u64,

    /// Distance at which a checkpoint counts as reached, in meters (default: 2.0)
    #[serde(default = "default_checkpoint_tolerance")]
    pub checkpoint_tolerance: f64,

    /// Route search expansion budget per plan (default: 50000)
    #[serde(default = "default_max_expansions")]
    pub max_expansions: usize,

    /// Plan past the current checkpoint toward the next one (default: true)
    #[serde(default = "default_extend_to_goal2")]
    pub extend_to_goal2: bool,

    /// Behavior transitions retained in history (default: 256)
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

fn default_speed_limit() -> f32 {
    6.0
}

fn default_max_replan_attempts() -> u32 {
    3
}

fn default_blockage_staleness_ms() -> u64 {
    60_000
}

fn default_checkpoint_tolerance() -> f64 {
    2.0
}

fn default_max_expansions() -> usize {
    50_000
}

fn default_extend_to_goal2() -> bool {
    true
}

fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

impl Default for CommanderConfig {
    fn default() -> Self {
        Self {
            verbosity: 0,
            speed_limit: default_speed_limit(),
            max_replan_attempts: default_max_replan_attempts(),
            blockage_staleness_ms: default_blockage_staleness_ms(),
            checkpoint_tolerance: default_checkpoint_tolerance(),
            max_expansions: default_max_expansions(),
            extend_to_goal2: default_extend_to_goal2(),
            history_capacity: default_history_capacity(),
        }
    }
}

impl CommanderConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validated()
    }

    /// Check every field, accumulating all violations.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigViolation>> {
        let checks = vec![
            check(
                self.speed_limit.is_finite() && self.speed_limit >= 0.0,
                ConfigViolation::InvalidSpeedLimit(self.speed_limit),
            ),
            check(self.max_replan_attempts >= 1, ConfigViolation::NoReplanAttempts),
            check(
                self.blockage_staleness_ms >= 1,
                ConfigViolation::NoBlockageStaleness,
            ),
            check(
                self.checkpoint_tolerance.is_finite() && self.checkpoint_tolerance > 0.0,
                ConfigViolation::InvalidTolerance(self.checkpoint_tolerance),
            ),
            check(self.max_expansions >= 1, ConfigViolation::NoExpansionBudget),
        ];

        Validation::all_vec(checks).map(|_| ())
    }

    /// Return `self` if valid, otherwise every violation found.
    pub fn validated(self) -> Result<Self, ConfigError> {
        match self.validate() {
            Validation::Success(()) => Ok(self),
            Validation::Failure(errors) => {
                Err(ConfigError::Invalid(errors.iter().cloned().collect()))
            }
        }
    }

    pub fn blockage_staleness(&self) -> Duration {
        Duration::from_millis(self.blockage_staleness_ms)
    }

    pub fn planner_config(&self) -> PlannerConfig {
        PlannerConfig {
            max_expansions: self.max_expansions,
            extend_to_goal2: self.extend_to_goal2,
        }
    }
}
