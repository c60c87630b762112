//! Zone perimeters with traversal constraints.

use super::graph::Point;
use serde::{Deserialize, Serialize};

/// Whether vehicles may drive through a zone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Traversal {
    #[default]
    Open,
    Impassable,
}

/// A named polygonal region.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub name: String,
    /// Polygon vertices in order; the closing edge is implicit.
    pub perimeter: Vec<Point>,
    #[serde(default)]
    pub traversal: Traversal,
    /// Speed limit inside the zone (m/s).
    #[serde(default)]
    pub speed_limit: Option<f32>,
}

impl Zone {
    pub fn new(name: impl Into<String>, perimeter: Vec<Point>) -> Self {
        Self {
            name: name.into(),
            perimeter,
            traversal: Traversal::Open,
            speed_limit: None,
        }
    }

    pub fn impassable(mut self) -> Self {
        self.traversal = Traversal::Impassable;
        self
    }

    pub fn with_speed_limit(mut self, limit: f32) -> Self {
        self.speed_limit = Some(limit);
        self
    }

    pub fn is_impassable(&self) -> bool {
        self.traversal == Traversal::Impassable
    }

    /// Even-odd point-in-polygon test. Degenerate perimeters contain nothing.
    pub fn contains(&self, point: &Point) -> bool {
        if self.perimeter.len() < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = self.perimeter.len() - 1;
        for i in 0..self.perimeter.len() {
            let (a, b) = (&self.perimeter[i], &self.perimeter[j]);
            if (a.y > point.y) != (b.y > point.y)
                && point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// True when the segment `a`-`b` touches the zone: either end inside, or
    /// crossing any perimeter edge.
    pub fn overlaps_segment(&self, a: &Point, b: &Point) -> bool {
        if self.contains(a) || self.contains(b) {
            return true;
        }
        if self.perimeter.len() < 3 {
            return false;
        }
        let n = self.perimeter.len();
        (0..n).any(|i| segments_intersect(a, b, &self.perimeter[i], &self.perimeter[(i + 1) % n]))
    }
}

fn orientation(p: &Point, q: &Point, r: &Point) -> f64 {
    (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x)
}

fn on_segment(p: &Point, q: &Point, r: &Point) -> bool {
    r.x >= p.x.min(q.x) && r.x <= p.x.max(q.x) && r.y >= p.y.min(q.y) && r.y <= p.y.max(q.y)
}

fn segments_intersect(p1: &Point, p2: &Point, q1: &Point, q2: &Point) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }
    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}

/// Read-only set of zones consulted by planning and order building.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ZonePerimeterList {
    zones: Vec<Zone>,
}

impl ZonePerimeterList {
    pub const fn new() -> Self {
        Self { zones: Vec::new() }
    }

    pub fn push(&mut self, zone: Zone) {
        self.zones.push(zone);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Zones whose perimeter contains `point`.
    pub fn containing<'a>(&'a self, point: &'a Point) -> impl Iterator<Item = &'a Zone> + 'a {
        self.zones.iter().filter(move |z| z.contains(point))
    }

    /// True when `point` lies inside any impassable zone.
    pub fn is_impassable(&self, point: &Point) -> bool {
        self.containing(point).any(Zone::is_impassable)
    }

    /// Lowest speed limit among zones overlapping the segment `a`-`b`.
    pub fn speed_limit_for_segment(&self, a: &Point, b: &Point) -> Option<f32> {
        self.zones
            .iter()
            .filter(|z| z.overlaps_segment(a, b))
            .filter_map(|z| z.speed_limit)
            .reduce(f32::min)
    }
}

impl From<Vec<Zone>> for ZonePerimeterList {
    fn from(zones: Vec<Zone>) -> Self {
        Self { zones }
    }
}
