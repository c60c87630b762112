//! State transition history tracking.
//!
//! Keeps a bounded, ordered record of behavior changes so the commander can
//! explain how it reached its current behavior without growing without limit
//! over a long mission.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of transitions retained.
pub const DEFAULT_HISTORY_CAPACITY: usize = 256;

/// Record of a single state transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state being transitioned from
    pub from: S,
    /// The state being transitioned to
    pub to: S,
    /// Control-cycle timestamp of the transition
    pub timestamp: DateTime<Utc>,
    /// Replan attempts accumulated when the transition happened
    pub attempt: u32,
    /// Name of the event that caused the transition
    pub reason: String,
}

/// Ordered history of state transitions, oldest first.
///
/// Once `capacity` transitions are stored, recording a new one drops the
/// oldest.
///
/// # Example
///
/// ```rust
/// use nav_commander::core::{BehaviorState, StateHistory, StateTransition};
/// use chrono::Utc;
///
/// let mut history = StateHistory::with_capacity(8);
/// history.record(StateTransition {
///     from: BehaviorState::Initialize,
///     to: BehaviorState::Go,
///     timestamp: Utc::now(),
///     attempt: 0,
///     reason: "CheckpointReached".to_string(),
/// });
///
/// let path = history.get_path();
/// assert_eq!(path, vec![&BehaviorState::Initialize, &BehaviorState::Go]);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: Vec<StateTransition<S>>,
    capacity: usize,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    /// Create an empty history with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create an empty history retaining at most `capacity` transitions.
    /// A capacity of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            transitions: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record a transition, evicting the oldest when full.
    pub fn record(&mut self, transition: StateTransition<S>) {
        if self.transitions.len() >= self.capacity {
            let excess = self.transitions.len() + 1 - self.capacity;
            self.transitions.drain(..excess);
        }
        self.transitions.push(transition);
    }

    /// Get the path of states traversed.
    ///
    /// Returns the `from` state of the oldest retained transition followed by
    /// the `to` state of each transition.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Duration between the oldest and newest retained transitions.
    ///
    /// `None` when empty or when timestamps run backwards.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.first()?, self.transitions.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// All retained transitions in order.
    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }

    /// Most recent transition.
    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.last()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
