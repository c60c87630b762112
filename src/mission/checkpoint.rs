//! Mission progress: the checkpoint cursor and its lookahead goals.

use super::Mission;
use crate::map::{ElementId, Point, RoadGraph};

/// Tracks the current checkpoint (`goal`) and the one after it (`goal2`).
///
/// The cursor only moves forward. Once it passes the last checkpoint the
/// mission is exhausted and stays that way.
#[derive(Clone, Debug)]
pub struct CheckpointManager {
    mission: Mission,
    cursor: usize,
    goal: Option<ElementId>,
    goal2: Option<ElementId>,
    tolerance: f64,
}

impl CheckpointManager {
    /// Start at the first checkpoint. `tolerance` is the reach distance in meters.
    pub fn new(mission: Mission, tolerance: f64) -> Self {
        Self::resume(mission, 0, tolerance)
    }

    /// Start at `cursor`, clamped to the mission length.
    pub fn resume(mission: Mission, cursor: usize, tolerance: f64) -> Self {
        let cursor = cursor.min(mission.len());
        let mut manager = Self {
            mission,
            cursor,
            goal: None,
            goal2: None,
            tolerance,
        };
        manager.set_checkpoint_goals();
        manager
    }

    /// Advance past `goal` if the vehicle has reached it.
    ///
    /// Reached means the vehicle is on the goal's element, or within the
    /// tolerance of the goal's position. Always false once exhausted.
    pub fn advance_if_reached<G: RoadGraph + ?Sized>(
        &mut self,
        current: Option<ElementId>,
        position: Point,
        graph: &G,
    ) -> bool {
        let Some(goal) = self.goal else {
            return false;
        };

        let on_element = current == Some(goal);
        let within_tolerance = graph
            .position(goal)
            .is_some_and(|p| p.distance(&position) <= self.tolerance);
        if !(on_element || within_tolerance) {
            return false;
        }

        self.cursor += 1;
        self.set_checkpoint_goals();
        tracing::info!(
            checkpoint = %goal,
            cursor = self.cursor,
            remaining = self.remaining(),
            "checkpoint reached"
        );
        true
    }

    /// Recompute `goal` and `goal2` from the cursor.
    pub fn set_checkpoint_goals(&mut self) {
        self.goal = self.mission.get(self.cursor);
        self.goal2 = self.mission.get(self.cursor + 1);
    }

    /// Install a new mission between cycles, keeping the cursor.
    pub fn replace_mission(&mut self, mission: Mission) {
        self.mission = mission;
        self.set_checkpoint_goals();
    }

    pub fn goal(&self) -> Option<ElementId> {
        self.goal
    }

    pub fn goal2(&self) -> Option<ElementId> {
        self.goal2
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.mission.len()
    }

    /// Checkpoints not yet reached, including `goal`.
    pub fn remaining(&self) -> usize {
        self.mission.len().saturating_sub(self.cursor)
    }

    pub fn mission(&self) -> &Mission {
        &self.mission
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
}
