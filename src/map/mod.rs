//! Read-only map collaborators: the road network and zone perimeters.

mod graph;
mod zones;

pub use graph::{ElementId, GraphError, Point, RoadGraph, RoadNetwork, WayPoint};
pub use zones::{Traversal, Zone, ZonePerimeterList};
