//! Event detection: the single most urgent condition each cycle.

use crate::blockage::BlockageTracker;
use crate::core::{BehaviorState, Event};
use crate::map::{ElementId, ZonePerimeterList};
use crate::mission::CheckpointManager;
use crate::navigator::NavigatorState;
use crate::route::Route;
use chrono::{DateTime, Utc};

/// What the commander knows about the current cycle.
#[derive(Clone, Copy, Debug)]
pub struct Observation<'a> {
    pub state: &'a NavigatorState,
    /// Behavior going into this cycle
    pub behavior: BehaviorState,
    /// Active route, already anchored at the vehicle
    pub route: &'a Route,
    /// Whether the checkpoint cursor advanced this cycle
    pub reached_checkpoint: bool,
}

/// First element ahead on `route` that is blocked, either by a tracked
/// blockage or by lying inside an impassable zone. The element the vehicle
/// already occupies is never reported.
pub fn route_blockage(
    route: &Route,
    blockages: &BlockageTracker,
    zones: &ZonePerimeterList,
    now: DateTime<Utc>,
) -> Option<ElementId> {
    route
        .waypoints()
        .iter()
        .skip(1)
        .find(|w| blockages.is_blocked(w.id, now) || zones.is_impassable(&w.position))
        .map(|w| w.id)
}

/// Derives events in fixed precedence order.
#[derive(Clone, Copy, Debug, Default)]
pub struct EventDetector;

impl EventDetector {
    pub fn new() -> Self {
        Self
    }

    /// Every candidate event that holds, most urgent first.
    pub fn pending_events(
        &self,
        observation: &Observation<'_>,
        checkpoints: &CheckpointManager,
        blockages: &BlockageTracker,
        zones: &ZonePerimeterList,
    ) -> Vec<Event> {
        let state = observation.state;
        let candidates = [
            (Event::Aborted, state.fault),
            (Event::PauseRequested, state.pause_requested),
            (
                Event::BlockageDetected,
                route_blockage(observation.route, blockages, zones, state.stamp).is_some(),
            ),
            (Event::MissionComplete, checkpoints.is_exhausted()),
            (Event::CheckpointReached, observation.reached_checkpoint),
            (
                Event::Resumed,
                observation.behavior == BehaviorState::Pause && !state.pause_requested,
            ),
        ];
        candidates
            .into_iter()
            .filter_map(|(event, holds)| holds.then_some(event))
            .collect()
    }

    /// The most urgent event, or `Event::None`.
    pub fn current_event(
        &self,
        observation: &Observation<'_>,
        checkpoints: &CheckpointManager,
        blockages: &BlockageTracker,
        zones: &ZonePerimeterList,
    ) -> Event {
        self.pending_events(observation, checkpoints, blockages, zones)
            .first()
            .copied()
            .unwrap_or(Event::None)
    }
}
