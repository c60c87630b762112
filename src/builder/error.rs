//! Build errors for the commander builder.

use crate::config::ConfigError;
use crate::snapshot::SnapshotError;
use thiserror::Error;

/// Errors that can occur when building a commander.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Road graph not specified. Call .graph(graph) before .build()")]
    MissingGraph,

    #[error("Mission not specified. Call .mission(mission) or .resume_from(snapshot)")]
    MissingMission,

    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    #[error("Cannot resume: {0}")]
    Snapshot(#[from] SnapshotError),
}
