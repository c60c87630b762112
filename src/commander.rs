//! The commander facade: one call per control cycle.

use crate::blockage::{BlockageTracker, Severity};
use crate::config::{CommanderConfig, ConfigError};
use crate::core::{BehaviorState, Event, StateHistory};
use crate::detect::{EventDetector, Observation};
use crate::fsm::{CommanderFsm, CycleContext};
use crate::map::{ElementId, RoadGraph, ZonePerimeterList};
use crate::mission::{CheckpointManager, Mission};
use crate::navigator::NavigatorState;
use crate::order::{Order, OrderBuilder};
use crate::route::{Route, RoutePlanner};
use crate::snapshot::{CommanderSnapshot, SNAPSHOT_VERSION};
use chrono::{DateTime, Utc};

/// High-level commander for one vehicle.
///
/// Owns the mission, the known blockages and the active route. The road graph
/// and zones are borrowed for the commander's lifetime and never modified.
///
/// # Example
///
/// ```rust
/// use nav_commander::commander::Commander;
/// use nav_commander::config::CommanderConfig;
/// use nav_commander::core::BehaviorState;
/// use nav_commander::map::{ElementId, Point, RoadNetwork, ZonePerimeterList};
/// use nav_commander::mission::Mission;
/// use nav_commander::navigator::NavigatorState;
/// use chrono::Utc;
///
/// let mut graph = RoadNetwork::new();
/// graph
///     .add_waypoint(ElementId(1), Point::new(0.0, 0.0))
///     .add_waypoint(ElementId(2), Point::new(30.0, 0.0));
/// graph.connect_both(ElementId(1), ElementId(2)).unwrap();
/// let zones = ZonePerimeterList::new();
///
/// let mission = Mission::new(vec![ElementId(2)]);
/// let mut commander =
///     Commander::new(CommanderConfig::default(), &graph, &zones, mission).unwrap();
///
/// let state = NavigatorState::at(ElementId(1), Point::new(0.0, 0.0), Utc::now());
/// let order = commander.command(&state);
/// assert_eq!(order.behavior, BehaviorState::Go);
/// assert_eq!(order.route.len(), 2);
/// ```
#[derive(Debug)]
pub struct Commander<'a, G: RoadGraph + ?Sized> {
    config: CommanderConfig,
    graph: &'a G,
    zones: &'a ZonePerimeterList,
    checkpoints: CheckpointManager,
    blockages: BlockageTracker,
    planner: RoutePlanner,
    detector: EventDetector,
    fsm: CommanderFsm,
    route: Route,
    replan_num: u32,
}

impl<'a, G: RoadGraph + ?Sized> Commander<'a, G> {
    pub fn new(
        config: CommanderConfig,
        graph: &'a G,
        zones: &'a ZonePerimeterList,
        mission: Mission,
    ) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        tracing::info!(checkpoints = mission.len(), "commander created");
        Ok(Self {
            checkpoints: CheckpointManager::new(mission, config.checkpoint_tolerance),
            blockages: BlockageTracker::new(config.blockage_staleness()),
            planner: RoutePlanner::new(config.planner_config()),
            detector: EventDetector::new(),
            fsm: CommanderFsm::new(config.history_capacity),
            route: Route::empty(),
            replan_num: 0,
            graph,
            zones,
            config,
        })
    }

    /// Rebuild from a validated snapshot. `mission` replaces the recorded one.
    pub(crate) fn restore(
        config: CommanderConfig,
        graph: &'a G,
        zones: &'a ZonePerimeterList,
        snapshot: CommanderSnapshot,
        mission: Option<Mission>,
    ) -> Self {
        let mut blockages = BlockageTracker::new(config.blockage_staleness());
        for blockage in &snapshot.blockages {
            blockages.record(blockage.element, blockage.severity, blockage.detected_at);
        }
        let mission = mission.unwrap_or(snapshot.mission);

        Self {
            checkpoints: CheckpointManager::resume(
                mission,
                snapshot.cursor,
                config.checkpoint_tolerance,
            ),
            blockages,
            planner: RoutePlanner::new(config.planner_config()),
            detector: EventDetector::new(),
            fsm: CommanderFsm::resume(snapshot.behavior, snapshot.history),
            route: snapshot.route,
            replan_num: snapshot.replan_attempts,
            graph,
            zones,
            config,
        }
    }

    /// Run one control cycle and return the order for the navigator.
    pub fn command(&mut self, state: &NavigatorState) -> Order {
        let now = state.stamp;
        let position = state.pose.position;
        let current = state
            .current_element
            .or_else(|| self.graph.nearest_element(position));

        self.blockages.expire(now);
        if state.road_blocked {
            self.note_road_blocked(current, now);
        }

        let reached = self.checkpoints.advance_if_reached(current, position, self.graph);
        if reached {
            self.replan_num = 0;
            if self.checkpoints.is_exhausted() {
                self.route = Route::empty();
            }
        }
        if let Some(anchored) = current.and_then(|c| self.route.starting_at(c)) {
            self.route = anchored;
        }

        let observation = Observation {
            state,
            behavior: self.fsm.current(),
            route: &self.route,
            reached_checkpoint: reached,
        };
        let event = self.detector.current_event(
            &observation,
            &self.checkpoints,
            &self.blockages,
            self.zones,
        );
        if self.config.verbosity >= 2 {
            let pending = self.detector.pending_events(
                &observation,
                &self.checkpoints,
                &self.blockages,
                self.zones,
            );
            tracing::trace!(?pending, chosen = %event, "event candidates");
        }

        let behavior = {
            let Self {
                config,
                graph,
                zones,
                checkpoints,
                blockages,
                planner,
                fsm,
                route,
                replan_num,
                ..
            } = self;
            let mut ctx = CycleContext {
                route,
                replan_num,
                checkpoints,
                blockages,
                planner,
                graph: *graph,
                zones: *zones,
                current_element: current,
                max_replan_attempts: config.max_replan_attempts,
                stamp: now,
            };

            let mut behavior = fsm.step(event, &mut ctx);
            if behavior.requires_route() && !ctx.has_active_route() && ctx.plan_route().is_err() {
                behavior = fsm.step(Event::ReplanFailed, &mut ctx);
            }
            behavior
        };

        let order = OrderBuilder::build(behavior, &self.route, self.config.speed_limit, self.zones);
        if self.config.verbosity >= 1 {
            tracing::debug!(
                event = %event,
                behavior = %behavior,
                current = ?current,
                goal = ?self.checkpoints.goal(),
                waypoints = order.route.len(),
                speed_limit = order.speed_limit,
                replan_attempts = self.replan_num,
                "command cycle"
            );
        }
        order
    }

    // The navigator only says the road ahead is blocked; pin it on the next
    // element of the active route.
    fn note_road_blocked(&mut self, current: Option<ElementId>, now: DateTime<Utc>) {
        match current.and_then(|c| self.route.next_after(c)) {
            Some(ahead) => {
                tracing::info!(element = %ahead, "navigator reported road blocked");
                self.blockages.record(ahead, Severity::Full, now);
            }
            None => tracing::warn!(
                current = ?current,
                "road blocked reported with no route element ahead"
            ),
        }
    }

    /// Record a blockage reported out of band.
    pub fn record_blockage(
        &mut self,
        element: ElementId,
        severity: Severity,
        timestamp: DateTime<Utc>,
    ) {
        tracing::debug!(element = %element, ?severity, "blockage recorded");
        self.blockages.record(element, severity, timestamp);
    }

    /// Replace the mission between cycles, keeping checkpoint progress.
    pub fn update_mission(&mut self, mission: Mission) {
        tracing::info!(
            checkpoints = mission.len(),
            cursor = self.checkpoints.cursor(),
            "mission updated"
        );
        self.checkpoints.replace_mission(mission);
    }

    /// Capture progress so the mission can be resumed later.
    pub fn snapshot(&self, timestamp: DateTime<Utc>) -> CommanderSnapshot {
        CommanderSnapshot {
            version: SNAPSHOT_VERSION,
            id: CommanderSnapshot::new_id(),
            timestamp,
            behavior: self.fsm.current(),
            history: self.fsm.history().clone(),
            mission: self.checkpoints.mission().clone(),
            cursor: self.checkpoints.cursor(),
            replan_attempts: self.replan_num,
            route: self.route.clone(),
            blockages: self.blockages.iter().copied().collect(),
        }
    }

    pub fn behavior(&self) -> BehaviorState {
        self.fsm.current()
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn goal(&self) -> Option<ElementId> {
        self.checkpoints.goal()
    }

    pub fn goal2(&self) -> Option<ElementId> {
        self.checkpoints.goal2()
    }

    pub fn checkpoints(&self) -> &CheckpointManager {
        &self.checkpoints
    }

    pub fn blockages(&self) -> &BlockageTracker {
        &self.blockages
    }

    /// Failed plans in the current mission segment.
    pub fn replan_attempts(&self) -> u32 {
        self.replan_num
    }

    pub fn history(&self) -> &StateHistory<BehaviorState> {
        self.fsm.history()
    }

    pub fn config(&self) -> &CommanderConfig {
        &self.config
    }
}
