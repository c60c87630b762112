//! Road network graph interface.
//!
//! The commander only ever queries the graph: element lookup, neighbors with
//! traversal cost, and nearest-element search. `RoadNetwork` is a small
//! in-memory implementation keyed by element id, with segment costs equal to
//! the planar distance between way points.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Identifier of a road-network element (a way point node).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Planar position in meters (UTM easting/northing).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A road element together with its position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WayPoint {
    pub id: ElementId,
    pub position: Point,
}

/// Read-only query interface over the road network.
pub trait RoadGraph {
    /// Position of an element, `None` if unknown.
    fn position(&self, id: ElementId) -> Option<Point>;

    /// Elements reachable from `id` in one segment, with traversal cost.
    fn neighbors(&self, id: ElementId) -> Vec<(ElementId, f64)>;

    /// Closest known element to `point`.
    fn nearest_element(&self, point: Point) -> Option<ElementId>;

    fn contains(&self, id: ElementId) -> bool {
        self.position(id).is_some()
    }

    fn waypoint(&self, id: ElementId) -> Option<WayPoint> {
        self.position(id).map(|position| WayPoint { id, position })
    }
}

/// Errors raised while building a `RoadNetwork`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("unknown road element {0}")]
    UnknownElement(ElementId),

    #[error("segment {from} -> {to} would be a self loop")]
    SelfLoop { from: ElementId, to: ElementId },
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Segment {
    to: ElementId,
    cost: f64,
}

/// In-memory road network.
///
/// ```rust
/// use nav_commander::map::{ElementId, Point, RoadGraph, RoadNetwork};
///
/// let mut net = RoadNetwork::new();
/// net.add_waypoint(ElementId(1), Point::new(0.0, 0.0));
/// net.add_waypoint(ElementId(2), Point::new(3.0, 4.0));
/// net.connect_both(ElementId(1), ElementId(2)).unwrap();
///
/// assert_eq!(net.neighbors(ElementId(1)), vec![(ElementId(2), 5.0)]);
/// assert_eq!(net.nearest_element(Point::new(2.9, 3.5)), Some(ElementId(2)));
/// ```
#[derive(Clone, Debug, Default)]
pub struct RoadNetwork {
    points: BTreeMap<ElementId, Point>,
    segments: BTreeMap<ElementId, Vec<Segment>>,
}

impl RoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or move a way point.
    pub fn add_waypoint(&mut self, id: ElementId, position: Point) -> &mut Self {
        self.points.insert(id, position);
        self
    }

    /// Add a one-way segment whose cost is the distance between its ends.
    /// Re-adding an existing segment is a no-op.
    pub fn connect(&mut self, from: ElementId, to: ElementId) -> Result<&mut Self, GraphError> {
        if from == to {
            return Err(GraphError::SelfLoop { from, to });
        }
        let a = *self
            .points
            .get(&from)
            .ok_or(GraphError::UnknownElement(from))?;
        let b = *self.points.get(&to).ok_or(GraphError::UnknownElement(to))?;

        let out = self.segments.entry(from).or_default();
        if !out.iter().any(|s| s.to == to) {
            out.push(Segment {
                to,
                cost: a.distance(&b),
            });
        }
        Ok(self)
    }

    /// Add segments in both directions.
    pub fn connect_both(&mut self, a: ElementId, b: ElementId) -> Result<&mut Self, GraphError> {
        self.connect(a, b)?;
        self.connect(b, a)
    }

    /// Connect consecutive elements of `chain` in both directions.
    pub fn connect_chain(&mut self, chain: &[ElementId]) -> Result<&mut Self, GraphError> {
        for pair in chain.windows(2) {
            self.connect_both(pair[0], pair[1])?;
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Element ids in ascending order.
    pub fn elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.points.keys().copied()
    }
}

impl RoadGraph for RoadNetwork {
    fn position(&self, id: ElementId) -> Option<Point> {
        self.points.get(&id).copied()
    }

    fn neighbors(&self, id: ElementId) -> Vec<(ElementId, f64)> {
        self.segments
            .get(&id)
            .map(|out| out.iter().map(|s| (s.to, s.cost)).collect())
            .unwrap_or_default()
    }

    fn nearest_element(&self, point: Point) -> Option<ElementId> {
        // BTreeMap order makes ties resolve to the lowest id.
        self.points
            .iter()
            .map(|(id, p)| (*id, p.distance(&point)))
            .fold(None, |best: Option<(ElementId, f64)>, (id, d)| match best {
                Some((_, best_d)) if best_d <= d => best,
                _ => Some((id, d)),
            })
            .map(|(id, _)| id)
    }
}
