//! Per-cycle vehicle state reported by the navigator.

use crate::map::{ElementId, Point};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Planar vehicle pose.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Point,
    /// Heading in radians, counter-clockwise from east
    pub heading: f64,
}

/// Snapshot of the vehicle for one control cycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavigatorState {
    /// Time the snapshot was taken
    pub stamp: DateTime<Utc>,
    pub pose: Pose,
    /// Forward speed in m/s
    #[serde(default)]
    pub speed: f32,
    /// Road element the vehicle occupies, if the navigator knows it
    #[serde(default)]
    pub current_element: Option<ElementId>,
    /// Fatal fault; the commander must abort
    #[serde(default)]
    pub fault: bool,
    /// Explicit request to hold position
    #[serde(default)]
    pub pause_requested: bool,
    /// The road ahead is obstructed
    #[serde(default)]
    pub road_blocked: bool,
}

impl NavigatorState {
    /// Healthy vehicle standing on `element` at `position`.
    pub fn at(element: ElementId, position: Point, stamp: DateTime<Utc>) -> Self {
        Self {
            stamp,
            pose: Pose {
                position,
                heading: 0.0,
            },
            speed: 0.0,
            current_element: Some(element),
            fault: false,
            pause_requested: false,
            road_blocked: false,
        }
    }

    pub fn with_fault(mut self) -> Self {
        self.fault = true;
        self
    }

    pub fn with_pause(mut self) -> Self {
        self.pause_requested = true;
        self
    }

    pub fn with_road_blocked(mut self) -> Self {
        self.road_blocked = true;
        self
    }
}
