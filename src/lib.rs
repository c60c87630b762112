//! Nav Commander: high-level behavior control for an autonomous ground vehicle
//!
//! Once per control cycle the commander reads the navigator's vehicle state,
//! decides what the vehicle should be doing, and hands back an order: a
//! behavior, a route to follow and a speed limit.
//!
//! # Core Concepts
//!
//! - **Behaviors**: a closed, priority-ordered set (`Abort` outranks everything)
//! - **Events**: at most one per cycle, the most urgent condition detected
//! - **Rules**: a first-match transition table driving the behavior machine
//! - **Routes**: A* plans over the road graph that avoid known blockages and
//!   impassable zones, with bounded retries per mission segment
//!
//! The road graph and zones are borrowed read-only. The mission, blockages
//! and active route are owned by the `Commander`.
//!
//! # Example
//!
//! ```rust
//! use nav_commander::{
//!     BehaviorState, CommanderBuilder, ElementId, Mission, NavigatorState, Point, RoadNetwork,
//! };
//! use chrono::Utc;
//!
//! let mut graph = RoadNetwork::new();
//! graph
//!     .add_waypoint(ElementId(1), Point::new(0.0, 0.0))
//!     .add_waypoint(ElementId(2), Point::new(40.0, 0.0))
//!     .add_waypoint(ElementId(3), Point::new(80.0, 0.0));
//! graph
//!     .connect_chain(&[ElementId(1), ElementId(2), ElementId(3)])
//!     .unwrap();
//!
//! let mut commander = CommanderBuilder::new()
//!     .graph(&graph)
//!     .mission(Mission::new(vec![ElementId(2), ElementId(3)]))
//!     .build()
//!     .unwrap();
//!
//! let order = commander.command(&NavigatorState::at(
//!     ElementId(1),
//!     Point::new(0.0, 0.0),
//!     Utc::now(),
//! ));
//! assert_eq!(order.behavior, BehaviorState::Go);
//! assert_eq!(order.route.elements().last(), Some(ElementId(3)));
//! ```

pub mod blockage;
pub mod builder;
pub mod commander;
pub mod config;
pub mod core;
pub mod detect;
pub mod fsm;
pub mod map;
pub mod mission;
pub mod navigator;
pub mod order;
pub mod route;
pub mod snapshot;

// Re-export commonly used types
pub use blockage::{Blockage, BlockageTracker, Severity};
pub use builder::{BuildError, CommanderBuilder};
pub use commander::Commander;
pub use config::{CommanderConfig, ConfigError};
pub use self::core::{BehaviorState, Event, State};
pub use detect::EventDetector;
pub use map::{ElementId, Point, RoadGraph, RoadNetwork, Zone, ZonePerimeterList};
pub use mission::{CheckpointManager, Mission};
pub use navigator::NavigatorState;
pub use order::{Order, OrderBuilder};
pub use route::{PlanError, Route, RoutePlanner};
pub use snapshot::{CommanderSnapshot, SnapshotError};
