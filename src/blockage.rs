//! Blockage bookkeeping keyed by road element.

use crate::map::ElementId;
use crate::route::Route;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// How badly an element is obstructed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Passable with care, but the planner still routes around it.
    Partial,
    #[default]
    Full,
}

/// A blockage observed on one road element.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Blockage {
    pub element: ElementId,
    pub severity: Severity,
    pub detected_at: DateTime<Utc>,
}

// A detection stamped after `now` is treated as brand new.
fn is_fresh(blockage: &Blockage, staleness: Duration, now: DateTime<Utc>) -> bool {
    now.signed_duration_since(blockage.detected_at)
        .to_std()
        .map_or(true, |age| age <= staleness)
}

/// Known blockages, forgotten once older than the staleness window.
#[derive(Clone, Debug)]
pub struct BlockageTracker {
    entries: BTreeMap<ElementId, Blockage>,
    staleness: Duration,
}

impl BlockageTracker {
    pub fn new(staleness: Duration) -> Self {
        Self {
            entries: BTreeMap::new(),
            staleness,
        }
    }

    /// Insert or refresh the blockage on `element`, returning the entry it
    /// replaced.
    pub fn record(
        &mut self,
        element: ElementId,
        severity: Severity,
        timestamp: DateTime<Utc>,
    ) -> Option<Blockage> {
        self.entries.insert(
            element,
            Blockage {
                element,
                severity,
                detected_at: timestamp,
            },
        )
    }

    /// First element of `route` with a fresh blockage.
    pub fn is_route_blocked(&self, route: &Route, now: DateTime<Utc>) -> Option<ElementId> {
        route.elements().find(|e| self.is_blocked(*e, now))
    }

    pub fn is_blocked(&self, element: ElementId, now: DateTime<Utc>) -> bool {
        self.entries
            .get(&element)
            .is_some_and(|b| is_fresh(b, self.staleness, now))
    }

    /// Every element with a fresh blockage.
    pub fn blocked_elements(&self, now: DateTime<Utc>) -> BTreeSet<ElementId> {
        self.entries
            .values()
            .filter(|b| is_fresh(b, self.staleness, now))
            .map(|b| b.element)
            .collect()
    }

    /// Drop stale entries, returning how many were removed.
    pub fn expire(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        let staleness = self.staleness;
        self.entries.retain(|_, b| is_fresh(b, staleness, now));
        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = self.entries.len(), "expired stale blockages");
        }
        removed
    }

    pub fn get(&self, element: ElementId) -> Option<&Blockage> {
        self.entries.get(&element)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Blockage> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn staleness(&self) -> Duration {
        self.staleness
    }
}
