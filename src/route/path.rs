//! Planned routes.

use crate::map::{ElementId, WayPoint};
use serde::{Deserialize, Serialize};

/// Ordered way points from the vehicle toward its checkpoints.
///
/// Routes are values: the commander replaces its route wholesale and never
/// edits one in place.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    waypoints: Vec<WayPoint>,
}

impl Route {
    pub fn new(waypoints: Vec<WayPoint>) -> Self {
        Self { waypoints }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn waypoints(&self) -> &[WayPoint] {
        &self.waypoints
    }

    pub fn first(&self) -> Option<&WayPoint> {
        self.waypoints.first()
    }

    pub fn last(&self) -> Option<&WayPoint> {
        self.waypoints.last()
    }

    /// Element ids in travel order.
    pub fn elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.waypoints.iter().map(|w| w.id)
    }

    pub fn contains(&self, element: ElementId) -> bool {
        self.position_of(element).is_some()
    }

    /// Index of the first occurrence of `element`.
    pub fn position_of(&self, element: ElementId) -> Option<usize> {
        self.waypoints.iter().position(|w| w.id == element)
    }

    /// True when `goal` appears at or after `from` on this route.
    pub fn leads_to(&self, from: ElementId, goal: ElementId) -> bool {
        match (self.position_of(from), self.position_of(goal)) {
            (Some(start), Some(_)) => self.waypoints[start..].iter().any(|w| w.id == goal),
            _ => false,
        }
    }

    /// The element after `element`, if any.
    pub fn next_after(&self, element: ElementId) -> Option<ElementId> {
        let index = self.position_of(element)?;
        self.waypoints.get(index + 1).map(|w| w.id)
    }

    /// New route beginning at `element`, or `None` if it is not on the route.
    pub fn starting_at(&self, element: ElementId) -> Option<Route> {
        let index = self.position_of(element)?;
        Some(Route::new(self.waypoints[index..].to_vec()))
    }

    /// Planar length in meters.
    pub fn length(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|pair| pair[0].position.distance(&pair[1].position))
            .sum()
    }
}
