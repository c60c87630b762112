//! Events that drive behavior transitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Triggering events, ordered by urgency.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    /// Fatal fault reported by the vehicle.
    Aborted,
    /// Operator or supervisor asked the vehicle to hold.
    PauseRequested,
    /// Active route crosses a known blockage.
    BlockageDetected,
    /// Route planning failed this cycle.
    ReplanFailed,
    /// No checkpoints remain.
    MissionComplete,
    /// The current checkpoint was reached this cycle.
    CheckpointReached,
    /// Pause condition cleared while paused.
    Resumed,
    #[default]
    None,
}

impl Event {
    pub const ALL: [Event; 8] = [
        Self::Aborted,
        Self::PauseRequested,
        Self::BlockageDetected,
        Self::ReplanFailed,
        Self::MissionComplete,
        Self::CheckpointReached,
        Self::Resumed,
        Self::None,
    ];

    /// Fixed priority; lower is more urgent.
    pub fn priority(self) -> u8 {
        match self {
            Self::Aborted => 0,
            Self::PauseRequested => 1,
            Self::BlockageDetected => 2,
            Self::ReplanFailed => 3,
            Self::MissionComplete => 4,
            Self::CheckpointReached => 5,
            Self::Resumed => 6,
            Self::None => 7,
        }
    }

    /// The more urgent of two events.
    pub fn most_urgent(a: Self, b: Self) -> Self {
        if b.priority() < a.priority() {
            b
        } else {
            a
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Aborted => "Aborted",
            Self::PauseRequested => "PauseRequested",
            Self::BlockageDetected => "BlockageDetected",
            Self::ReplanFailed => "ReplanFailed",
            Self::MissionComplete => "MissionComplete",
            Self::CheckpointReached => "CheckpointReached",
            Self::Resumed => "Resumed",
            Self::None => "None",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
