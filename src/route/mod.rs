//! Routes and blockage-aware route planning.

mod error;
mod path;
mod planner;

pub use error::PlanError;
pub use path::Route;
pub use planner::{PlanRequest, PlannerConfig, RoutePlanner};
