//! Route planning errors.

use crate::map::ElementId;
use thiserror::Error;

/// Errors that can occur while planning or replanning a route
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// No traversable path exists between the endpoints
    #[error("no path from {from} to {goal}")]
    NoPath { from: ElementId, goal: ElementId },

    /// Search effort exceeded its budget before finding a path
    #[error("route search gave up after {expansions} expansions")]
    Timeout { expansions: usize },

    /// Retry budget for the current mission segment is spent
    #[error("replanning exhausted after {attempts} attempts")]
    ReplanExhausted { attempts: u32 },

    /// An endpoint is not in the road graph
    #[error("road element {0} is not in the graph")]
    UnknownElement(ElementId),

    /// There is no checkpoint to plan toward
    #[error("no checkpoint goal to plan toward")]
    MissingGoal,

    /// The vehicle could not be placed on the road graph
    #[error("vehicle position is not on the road graph")]
    UnknownStart,
}

impl PlanError {
    /// Errors the commander absorbs by pausing and retrying.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::ReplanExhausted { .. })
    }
}
