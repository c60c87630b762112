//! Shared per-cycle context handed to the behavior state machine.

use crate::blockage::BlockageTracker;
use crate::detect::route_blockage;
use crate::map::{ElementId, RoadGraph, ZonePerimeterList};
use crate::mission::CheckpointManager;
use crate::route::{PlanError, PlanRequest, Route, RoutePlanner};
use chrono::{DateTime, Utc};

/// Everything a transition rule may read or update during one cycle.
///
/// The route and the replan counter are the only mutable parts. They are
/// borrowed from the commander for the duration of the cycle.
pub struct CycleContext<'c, G: RoadGraph + ?Sized> {
    pub route: &'c mut Route,
    pub replan_num: &'c mut u32,
    pub checkpoints: &'c CheckpointManager,
    pub blockages: &'c BlockageTracker,
    pub planner: &'c RoutePlanner,
    pub graph: &'c G,
    pub zones: &'c ZonePerimeterList,
    /// Element the vehicle occupies this cycle
    pub current_element: Option<ElementId>,
    pub max_replan_attempts: u32,
    /// Cycle timestamp, taken from the navigator state
    pub stamp: DateTime<Utc>,
}

impl<G: RoadGraph + ?Sized> CycleContext<'_, G> {
    /// True when the route runs from the vehicle's element to the current goal.
    pub fn has_active_route(&self) -> bool {
        match (self.current_element, self.checkpoints.goal()) {
            (Some(current), Some(goal)) => self.route.leads_to(current, goal),
            _ => false,
        }
    }

    pub fn replans_exhausted(&self) -> bool {
        *self.replan_num >= self.max_replan_attempts
    }

    /// Plan a fresh route to the goal around every known blockage.
    pub fn plan_route(&mut self) -> Result<(), PlanError> {
        let result = self.endpoints().and_then(|(from, goal)| {
            let request = self.request(from, goal);
            let avoid = self.blockages.blocked_elements(self.stamp);
            self.planner.plan_avoiding(&request, &avoid)
        });
        self.settle(result)
    }

    /// Replan around the first blocked element ahead on the current route.
    ///
    /// Falls back to a fresh plan when nothing ahead is blocked any more.
    pub fn replan_route(&mut self) -> Result<(), PlanError> {
        let ahead = route_blockage(&*self.route, self.blockages, self.zones, self.stamp);
        let Some(blockage) = ahead else {
            return self.plan_route();
        };

        let result = self.endpoints().and_then(|(from, goal)| {
            let request = self.request(from, goal);
            let known = self.blockages.blocked_elements(self.stamp);
            self.planner.replan(
                &*self.route,
                blockage,
                &request,
                &known,
                *self.replan_num,
                self.max_replan_attempts,
            )
        });
        self.settle(result)
    }

    fn endpoints(&self) -> Result<(ElementId, ElementId), PlanError> {
        let goal = self.checkpoints.goal().ok_or(PlanError::MissingGoal)?;
        let from = self.current_element.ok_or(PlanError::UnknownStart)?;
        Ok((from, goal))
    }

    fn request(&self, from: ElementId, goal: ElementId) -> PlanRequest<'_, G> {
        PlanRequest {
            from,
            goal,
            goal2: self.checkpoints.goal2(),
            graph: self.graph,
            zones: self.zones,
        }
    }

    /// Install a new route, or count the failure.
    ///
    /// The failure that uses up the last attempt is reported as
    /// `ReplanExhausted`. The previous route is kept on failure.
    fn settle(&mut self, result: Result<Route, PlanError>) -> Result<(), PlanError> {
        match result {
            Ok(route) => {
                tracing::debug!(
                    waypoints = route.len(),
                    length = route.length(),
                    goal = ?self.checkpoints.goal(),
                    "route planned"
                );
                *self.route = route;
                Ok(())
            }
            Err(err) => {
                *self.replan_num = self.replan_num.saturating_add(1);
                let err = if self.replans_exhausted() {
                    PlanError::ReplanExhausted {
                        attempts: *self.replan_num,
                    }
                } else {
                    err
                };
                tracing::warn!(
                    error = %err,
                    attempts = *self.replan_num,
                    max_attempts = self.max_replan_attempts,
                    "route planning failed"
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockage::Severity;
    use crate::map::{Point, RoadNetwork};
    use crate::mission::Mission;
    use chrono::TimeZone;
    use std::time::Duration;

    const A: ElementId = ElementId(1);
    const B: ElementId = ElementId(2);
    const X: ElementId = ElementId(3);
    const Y: ElementId = ElementId(4);
    const C: ElementId = ElementId(5);

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn network(with_detour: bool) -> RoadNetwork {
        let mut net = RoadNetwork::new();
        net.add_waypoint(A, Point::new(0.0, 0.0))
            .add_waypoint(B, Point::new(10.0, 0.0))
            .add_waypoint(X, Point::new(15.0, 0.0))
            .add_waypoint(Y, Point::new(15.0, 6.0))
            .add_waypoint(C, Point::new(20.0, 0.0));
        net.connect_chain(&[A, B, X, C]).unwrap();
        if with_detour {
            net.connect_chain(&[B, Y, C]).unwrap();
        }
        net
    }

    struct Fixture {
        net: RoadNetwork,
        zones: ZonePerimeterList,
        checkpoints: CheckpointManager,
        blockages: BlockageTracker,
        planner: RoutePlanner,
        route: Route,
        replan_num: u32,
    }

    impl Fixture {
        fn new(with_detour: bool) -> Self {
            Self {
                net: network(with_detour),
                zones: ZonePerimeterList::new(),
                checkpoints: CheckpointManager::new(Mission::new(vec![C]), 1.0),
                blockages: BlockageTracker::new(Duration::from_secs(60)),
                planner: RoutePlanner::with_defaults(),
                route: Route::empty(),
                replan_num: 0,
            }
        }

        fn ctx(&mut self, current: ElementId) -> CycleContext<'_, RoadNetwork> {
            CycleContext {
                route: &mut self.route,
                replan_num: &mut self.replan_num,
                checkpoints: &self.checkpoints,
                blockages: &self.blockages,
                planner: &self.planner,
                graph: &self.net,
                zones: &self.zones,
                current_element: Some(current),
                max_replan_attempts: 3,
                stamp: now(),
            }
        }
    }

    #[test]
    fn plan_route_installs_route() {
        let mut f = Fixture::new(true);
        let mut ctx = f.ctx(A);
        assert!(!ctx.has_active_route());
        ctx.plan_route().unwrap();
        assert!(ctx.has_active_route());
        assert_eq!(f.route.elements().collect::<Vec<_>>(), vec![A, B, X, C]);
        assert_eq!(f.replan_num, 0);
    }

    #[test]
    fn replan_route_goes_around_blockage() {
        let mut f = Fixture::new(true);
        f.ctx(B).plan_route().unwrap();
        f.blockages.record(X, Severity::Full, now());

        f.ctx(B).replan_route().unwrap();
        assert_eq!(f.route.elements().collect::<Vec<_>>(), vec![B, Y, C]);
    }

    #[test]
    fn failures_accumulate_until_exhausted() {
        let mut f = Fixture::new(false);
        f.ctx(B).plan_route().unwrap();
        let planned = f.route.clone();
        f.blockages.record(X, Severity::Full, now());

        assert_eq!(
            f.ctx(B).replan_route(),
            Err(PlanError::NoPath { from: B, goal: C })
        );
        assert_eq!(f.replan_num, 1);
        assert_eq!(f.route, planned);

        assert!(f.ctx(B).replan_route().is_err());
        assert_eq!(
            f.ctx(B).replan_route(),
            Err(PlanError::ReplanExhausted { attempts: 3 })
        );
        assert!(f.ctx(B).replans_exhausted());
    }

    #[test]
    fn missing_goal_counts_as_failure() {
        let mut f = Fixture::new(true);
        f.checkpoints = CheckpointManager::new(Mission::default(), 1.0);
        assert_eq!(f.ctx(A).plan_route(), Err(PlanError::MissingGoal));
        assert_eq!(f.replan_num, 1);
    }

    #[test]
    fn unknown_start_is_reported() {
        let mut f = Fixture::new(true);
        let mut ctx = f.ctx(A);
        ctx.current_element = None;
        assert_eq!(ctx.plan_route(), Err(PlanError::UnknownStart));
    }
}
