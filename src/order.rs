//! Navigation orders handed to the navigator.

use crate::core::BehaviorState;
use crate::map::ZonePerimeterList;
use crate::route::Route;
use serde::{Deserialize, Serialize};

/// One cycle's command to the navigator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub behavior: BehaviorState,
    pub route: Route,
    /// Maximum speed in m/s, never negative
    pub speed_limit: f32,
}

impl Order {
    /// External behavior code; a direct mapping of the behavior ordinal.
    pub fn behavior_code(&self) -> u8 {
        self.behavior.code()
    }

    /// True when the order holds the vehicle still.
    pub fn is_stop(&self) -> bool {
        self.route.is_empty() && self.speed_limit == 0.0
    }
}

/// Assembles orders.
pub struct OrderBuilder;

impl OrderBuilder {
    /// Build the order for `behavior`.
    ///
    /// Halting behaviors (Abort, Quit, Pause) always get an empty route and a
    /// zero speed limit. Otherwise the limit is the configured one, lowered by
    /// any zone overlapping the first route segment.
    pub fn build(
        behavior: BehaviorState,
        route: &Route,
        configured_speed_limit: f32,
        zones: &ZonePerimeterList,
    ) -> Order {
        if behavior.halts_vehicle() {
            return Order {
                behavior,
                route: Route::empty(),
                speed_limit: 0.0,
            };
        }

        let mut limit = non_negative(configured_speed_limit);
        let waypoints = route.waypoints();
        if let Some(first) = waypoints.first() {
            let second = waypoints.get(1).unwrap_or(first);
            if let Some(zone_limit) =
                zones.speed_limit_for_segment(&first.position, &second.position)
            {
                limit = limit.min(non_negative(zone_limit));
            }
        }

        Order {
            behavior,
            route: route.clone(),
            speed_limit: limit,
        }
    }
}

fn non_negative(limit: f32) -> f32 {
    if limit > 0.0 {
        limit
    } else {
        0.0
    }
}
