//! A* route planner over the road graph.
//!
//! Search is deterministic (open-set ties break on element id) and bounded by
//! an expansion budget so a plan always finishes within the control cycle.

use super::error::PlanError;
use super::path::Route;
use crate::map::{ElementId, RoadGraph, ZonePerimeterList};
use std::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap, HashMap, HashSet};

/// Configuration for the route planner.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannerConfig {
    /// Maximum node expansions per plan before giving up
    pub max_expansions: usize,
    /// Continue the route past `goal` toward `goal2` when a path exists
    pub extend_to_goal2: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_expansions: 50_000,
            extend_to_goal2: true,
        }
    }
}

/// Endpoints and map references for one planning call.
pub struct PlanRequest<'a, G: RoadGraph + ?Sized> {
    pub from: ElementId,
    pub goal: ElementId,
    pub goal2: Option<ElementId>,
    pub graph: &'a G,
    pub zones: &'a ZonePerimeterList,
}

/// Node in the open set.
#[derive(Clone, Copy, Debug)]
struct SearchNode {
    element: ElementId,
    f_score: f64,
}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap; equal scores pop the lowest id first.
        other
            .f_score
            .total_cmp(&self.f_score)
            .then_with(|| other.element.cmp(&self.element))
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchNode {}

/// Route planner.
#[derive(Clone, Debug, Default)]
pub struct RoutePlanner {
    config: PlannerConfig,
}

impl RoutePlanner {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(PlannerConfig::default())
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan from `request.from` to `request.goal`, extended toward `goal2`.
    pub fn plan<G: RoadGraph + ?Sized>(&self, request: &PlanRequest<'_, G>) -> Result<Route, PlanError> {
        self.plan_avoiding(request, &BTreeSet::new())
    }

    /// Plan while treating every element in `avoid` as impassable.
    ///
    /// The starting element is always allowed, since the vehicle is already
    /// there.
    pub fn plan_avoiding<G: RoadGraph + ?Sized>(
        &self,
        request: &PlanRequest<'_, G>,
        avoid: &BTreeSet<ElementId>,
    ) -> Result<Route, PlanError> {
        if !request.graph.contains(request.from) {
            return Err(PlanError::UnknownElement(request.from));
        }
        if !request.graph.contains(request.goal) {
            return Err(PlanError::UnknownElement(request.goal));
        }

        let mut budget = self.config.max_expansions;
        let mut elements = self.search(request, request.from, request.goal, avoid, &mut budget)?;

        if self.config.extend_to_goal2 {
            if let Some(goal2) = request.goal2.filter(|g| *g != request.goal) {
                match self.search(request, request.goal, goal2, avoid, &mut budget) {
                    Ok(extension) => elements.extend(extension.into_iter().skip(1)),
                    Err(err) => {
                        tracing::debug!(goal2 = %goal2, error = %err, "route not extended past goal")
                    }
                }
            }
        }

        elements
            .into_iter()
            .map(|id| request.graph.waypoint(id).ok_or(PlanError::UnknownElement(id)))
            .collect::<Result<Vec<_>, _>>()
            .map(Route::new)
    }

    /// Plan again around `blockage` and every element in `known_blocked`.
    ///
    /// Fails with `ReplanExhausted` without searching once `attempt_count`
    /// has reached `max_attempts`.
    pub fn replan<G: RoadGraph + ?Sized>(
        &self,
        previous: &Route,
        blockage: ElementId,
        request: &PlanRequest<'_, G>,
        known_blocked: &BTreeSet<ElementId>,
        attempt_count: u32,
        max_attempts: u32,
    ) -> Result<Route, PlanError> {
        if attempt_count >= max_attempts {
            return Err(PlanError::ReplanExhausted {
                attempts: attempt_count,
            });
        }

        let mut avoid = known_blocked.clone();
        avoid.insert(blockage);
        tracing::debug!(
            blockage = %blockage,
            attempt = attempt_count + 1,
            max_attempts,
            previous_len = previous.len(),
            "replanning around blockage"
        );
        self.plan_avoiding(request, &avoid)
    }

    fn is_traversable<G: RoadGraph + ?Sized>(
        request: &PlanRequest<'_, G>,
        element: ElementId,
        avoid: &BTreeSet<ElementId>,
    ) -> bool {
        !avoid.contains(&element)
            && request
                .graph
                .position(element)
                .is_some_and(|p| !request.zones.is_impassable(&p))
    }

    /// A* search between two elements, spending from a shared budget.
    fn search<G: RoadGraph + ?Sized>(
        &self,
        request: &PlanRequest<'_, G>,
        start: ElementId,
        goal: ElementId,
        avoid: &BTreeSet<ElementId>,
        budget: &mut usize,
    ) -> Result<Vec<ElementId>, PlanError> {
        let graph = request.graph;
        let goal_position = graph.position(goal).ok_or(PlanError::UnknownElement(goal))?;
        if start == goal {
            return Ok(vec![start]);
        }
        if !Self::is_traversable(request, goal, avoid) {
            return Err(PlanError::NoPath { from: start, goal });
        }

        let heuristic = |element: ElementId| {
            graph
                .position(element)
                .map_or(0.0, |p| p.distance(&goal_position))
        };

        let mut open_set = BinaryHeap::new();
        let mut g_score: HashMap<ElementId, f64> = HashMap::new();
        let mut parent: HashMap<ElementId, ElementId> = HashMap::new();
        let mut closed_set: HashSet<ElementId> = HashSet::new();

        g_score.insert(start, 0.0);
        open_set.push(SearchNode {
            element: start,
            f_score: heuristic(start),
        });

        while let Some(node) = open_set.pop() {
            let current = node.element;
            if !closed_set.insert(current) {
                continue;
            }
            if current == goal {
                return Ok(Self::reconstruct_path(&parent, start, goal));
            }
            if *budget == 0 {
                tracing::warn!(
                    from = %start,
                    goal = %goal,
                    max_expansions = self.config.max_expansions,
                    "route search exceeded expansion budget"
                );
                return Err(PlanError::Timeout {
                    expansions: self.config.max_expansions,
                });
            }
            *budget -= 1;

            let current_g = g_score.get(&current).copied().unwrap_or(f64::INFINITY);
            for (neighbor, cost) in graph.neighbors(current) {
                if closed_set.contains(&neighbor)
                    || !(cost.is_finite() && cost >= 0.0)
                    || !Self::is_traversable(request, neighbor, avoid)
                {
                    continue;
                }
                let tentative = current_g + cost;
                if tentative < g_score.get(&neighbor).copied().unwrap_or(f64::INFINITY) {
                    g_score.insert(neighbor, tentative);
                    parent.insert(neighbor, current);
                    open_set.push(SearchNode {
                        element: neighbor,
                        f_score: tentative + heuristic(neighbor),
                    });
                }
            }
        }

        Err(PlanError::NoPath { from: start, goal })
    }

    fn reconstruct_path(
        parent: &HashMap<ElementId, ElementId>,
        start: ElementId,
        goal: ElementId,
    ) -> Vec<ElementId> {
        let mut path = vec![goal];
        let mut current = goal;
        while current != start {
            match parent.get(&current) {
                Some(&p) => {
                    path.push(p);
                    current = p;
                }
                None => break,
            }
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{Point, RoadNetwork, Zone};

    const A: ElementId = ElementId(1);
    const B: ElementId = ElementId(2);
    const X: ElementId = ElementId(3);
    const Y: ElementId = ElementId(4);
    const C: ElementId = ElementId(5);

    /// A - B - X - C with a detour B - Y - C.
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

    fn request<'a>(
        net: &'a RoadNetwork,
        zones: &'a ZonePerimeterList,
        from: ElementId,
        goal: ElementId,
        goal2: Option<ElementId>,
    ) -> PlanRequest<'a, RoadNetwork> {
        PlanRequest {
            from,
            goal,
            goal2,
            graph: net,
            zones,
        }
    }

    fn ids(route: &Route) -> Vec<ElementId> {
        route.elements().collect()
    }

    #[test]
    fn plans_shortest_path() {
        let net = network(true);
        let zones = ZonePerimeterList::new();
        let route = RoutePlanner::with_defaults()
            .plan(&request(&net, &zones, A, C, None))
            .unwrap();
        assert_eq!(ids(&route), vec![A, B, X, C]);
        assert_eq!(route.length(), 20.0);
    }

    #[test]
    fn extends_through_goal2() {
        let net = network(false);
        let zones = ZonePerimeterList::new();
        let route = RoutePlanner::with_defaults()
            .plan(&request(&net, &zones, A, B, Some(C)))
            .unwrap();
        assert_eq!(ids(&route), vec![A, B, X, C]);

        let planner = RoutePlanner::new(PlannerConfig {
            extend_to_goal2: false,
            ..PlannerConfig::default()
        });
        let route = planner.plan(&request(&net, &zones, A, B, Some(C))).unwrap();
        assert_eq!(ids(&route), vec![A, B]);
    }

    #[test]
    fn unreachable_goal2_keeps_first_leg() {
        let mut net = network(false);
        net.add_waypoint(ElementId(9), Point::new(50.0, 50.0));
        let zones = ZonePerimeterList::new();
        let route = RoutePlanner::with_defaults()
            .plan(&request(&net, &zones, A, B, Some(ElementId(9))))
            .unwrap();
        assert_eq!(ids(&route), vec![A, B]);
    }

    #[test]
    fn start_at_goal_is_single_waypoint() {
        let net = network(true);
        let zones = ZonePerimeterList::new();
        let planner = RoutePlanner::new(PlannerConfig {
            extend_to_goal2: false,
            ..PlannerConfig::default()
        });
        let route = planner.plan(&request(&net, &zones, B, B, None)).unwrap();
        assert_eq!(ids(&route), vec![B]);
    }

    #[test]
    fn replan_avoids_blockage() {
        let net = network(true);
        let zones = ZonePerimeterList::new();
        let planner = RoutePlanner::with_defaults();
        let req = request(&net, &zones, B, C, None);
        let previous = planner.plan(&req).unwrap();

        let route = planner
            .replan(&previous, X, &req, &BTreeSet::new(), 0, 3)
            .unwrap();
        assert_eq!(ids(&route), vec![B, Y, C]);
    }

    #[test]
    fn replan_without_alternate_fails() {
        let net = network(false);
        let zones = ZonePerimeterList::new();
        let planner = RoutePlanner::with_defaults();
        let req = request(&net, &zones, B, C, None);

        let result = planner.replan(&Route::empty(), X, &req, &BTreeSet::new(), 0, 3);
        assert_eq!(result, Err(PlanError::NoPath { from: B, goal: C }));
    }

    #[test]
    fn replan_is_deterministic() {
        let net = network(true);
        let zones = ZonePerimeterList::new();
        let planner = RoutePlanner::with_defaults();
        let req = request(&net, &zones, A, C, None);
        let known: BTreeSet<_> = [Y].into_iter().collect();

        let first = planner.replan(&Route::empty(), X, &req, &known, 1, 3);
        let second = planner.replan(&Route::empty(), X, &req, &known, 1, 3);
        assert_eq!(first, second);
        assert!(first.is_err());
    }

    #[test]
    fn replan_refuses_when_attempts_spent() {
        let net = network(true);
        let zones = ZonePerimeterList::new();
        let req = request(&net, &zones, A, C, None);
        let result = RoutePlanner::with_defaults().replan(&Route::empty(), X, &req, &BTreeSet::new(), 3, 3);
        assert_eq!(result, Err(PlanError::ReplanExhausted { attempts: 3 }));
    }

    #[test]
    fn impassable_zones_are_excluded() {
        let net = network(true);
        let zones = ZonePerimeterList::from(vec![Zone::new(
            "construction",
            vec![
                Point::new(14.0, -1.0),
                Point::new(16.0, -1.0),
                Point::new(16.0, 1.0),
                Point::new(14.0, 1.0),
            ],
        )
        .impassable()]);
        let route = RoutePlanner::with_defaults()
            .plan(&request(&net, &zones, A, C, None))
            .unwrap();
        assert_eq!(ids(&route), vec![A, B, Y, C]);
    }

    #[test]
    fn budget_exhaustion_times_out() {
        let net = network(true);
        let zones = ZonePerimeterList::new();
        let planner = RoutePlanner::new(PlannerConfig {
            max_expansions: 1,
            extend_to_goal2: false,
        });
        let result = planner.plan(&request(&net, &zones, A, C, None));
        assert_eq!(result, Err(PlanError::Timeout { expansions: 1 }));
    }

    #[test]
    fn unknown_endpoints_are_reported() {
        let net = network(true);
        let zones = ZonePerimeterList::new();
        let planner = RoutePlanner::with_defaults();
        assert_eq!(
            planner.plan(&request(&net, &zones, ElementId(77), C, None)),
            Err(PlanError::UnknownElement(ElementId(77)))
        );
        assert_eq!(
            planner.plan(&request(&net, &zones, A, ElementId(78), None)),
            Err(PlanError::UnknownElement(ElementId(78)))
        );
    }
}
