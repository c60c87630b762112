//! Fluent construction of a `Commander`.
//!
//! # Example
//!
//! ```rust
//! use nav_commander::builder::CommanderBuilder;
//! use nav_commander::config::CommanderConfig;
//! use nav_commander::core::BehaviorState;
//! use nav_commander::map::{ElementId, Point, RoadNetwork};
//! use nav_commander::mission::Mission;
//!
//! let mut graph = RoadNetwork::new();
//! graph
//!     .add_waypoint(ElementId(1), Point::new(0.0, 0.0))
//!     .add_waypoint(ElementId(2), Point::new(25.0, 0.0));
//! graph.connect_both(ElementId(1), ElementId(2)).unwrap();
//!
//! let commander = CommanderBuilder::new()
//!     .graph(&graph)
//!     .mission(Mission::new(vec![ElementId(2)]))
//!     .config(CommanderConfig::default())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(commander.behavior(), BehaviorState::Initialize);
//! ```

pub mod error;

pub use error::BuildError;

use crate::commander::Commander;
use crate::config::CommanderConfig;
use crate::map::{RoadGraph, ZonePerimeterList};
use crate::mission::Mission;
use crate::snapshot::CommanderSnapshot;

static NO_ZONES: ZonePerimeterList = ZonePerimeterList::new();

/// Builder for constructing a commander with a fluent API.
pub struct CommanderBuilder<'a, G: RoadGraph + ?Sized> {
    graph: Option<&'a G>,
    zones: &'a ZonePerimeterList,
    mission: Option<Mission>,
    config: CommanderConfig,
    snapshot: Option<CommanderSnapshot>,
}

impl<'a, G: RoadGraph + ?Sized> CommanderBuilder<'a, G> {
    /// Create a new builder with default configuration and no zones.
    pub fn new() -> Self {
        Self {
            graph: None,
            zones: &NO_ZONES,
            mission: None,
            config: CommanderConfig::default(),
            snapshot: None,
        }
    }

    /// Set the road graph (required).
    pub fn graph(mut self, graph: &'a G) -> Self {
        self.graph = Some(graph);
        self
    }

    pub fn zones(mut self, zones: &'a ZonePerimeterList) -> Self {
        self.zones = zones;
        self
    }

    /// Set the mission. Required unless resuming from a snapshot.
    pub fn mission(mut self, mission: Mission) -> Self {
        self.mission = Some(mission);
        self
    }

    pub fn config(mut self, config: CommanderConfig) -> Self {
        self.config = config;
        self
    }

    /// Continue from a snapshot instead of starting the mission over.
    ///
    /// A mission set with `.mission()` replaces the snapshot's mission; the
    /// snapshot cursor is kept.
    pub fn resume_from(mut self, snapshot: CommanderSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self
    }

    /// Build the commander.
    /// Returns an error if required fields are missing or invalid.
    pub fn build(self) -> Result<Commander<'a, G>, BuildError> {
        let graph = self.graph.ok_or(BuildError::MissingGraph)?;
        let config = self.config.validated()?;

        match self.snapshot {
            Some(snapshot) => {
                snapshot.validate()?;
                tracing::info!(
                    snapshot = %snapshot.id,
                    behavior = %snapshot.behavior,
                    cursor = snapshot.cursor,
                    "resuming commander from snapshot"
                );
                Ok(Commander::restore(
                    config,
                    graph,
                    self.zones,
                    snapshot,
                    self.mission,
                ))
            }
            None => {
                let mission = self.mission.ok_or(BuildError::MissingMission)?;
                Ok(Commander::new(config, graph, self.zones, mission)?)
            }
        }
    }
}

impl<G: RoadGraph + ?Sized> Default for CommanderBuilder<'_, G> {
    fn default() -> Self {
        Self::new()
    }
}
