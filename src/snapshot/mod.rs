//! Snapshot and resume for the commander.
//!
//! A snapshot records mission progress, the active route, known blockages and
//! the behavior history so a restarted process can continue the mission where
//! it stopped. Map data is not included; the caller supplies it again on
//! resume.

use crate::blockage::Blockage;
use crate::core::{BehaviorState, StateHistory};
use crate::mission::Mission;
use crate::route::Route;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::SnapshotError;

/// Version identifier for the snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable record of commander progress.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommanderSnapshot {
    /// Snapshot format version
    pub version: u32,

    /// Unique snapshot identifier
    pub id: String,

    /// Cycle timestamp the snapshot was taken at
    pub timestamp: DateTime<Utc>,

    pub behavior: BehaviorState,

    pub history: StateHistory<BehaviorState>,

    pub mission: Mission,

    /// Index of the current checkpoint in `mission`
    pub cursor: usize,

    /// Failed plans in the current mission segment
    pub replan_attempts: u32,

    pub route: Route,

    pub blockages: Vec<Blockage>,
}

impl CommanderSnapshot {
    /// Fresh snapshot id.
    pub fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    /// Decode and validate a JSON snapshot.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    /// Decode and validate a binary snapshot.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = bincode::deserialize(bytes)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check the version and internal consistency.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }

        if self.cursor > self.mission.len() {
            return Err(SnapshotError::ValidationFailed(format!(
                "cursor {} is past the end of a {}-checkpoint mission",
                self.cursor,
                self.mission.len()
            )));
        }

        if let Some(last) = self.history.last() {
            if last.to != self.behavior {
                return Err(SnapshotError::ValidationFailed(format!(
                    "behavior {} does not match the last recorded transition to {}",
                    self.behavior, last.to
                )));
            }
        }

        Ok(())
    }
}
