//! Core state machine vocabulary.
//!
//! - Behaviors and events as closed, priority-ordered enumerations
//! - The `State` trait behaviors implement
//! - Guard predicates used by transition rules
//! - Bounded transition history
//!
//! Everything here is pure; no planning or I/O happens in this module.

mod behavior;
mod event;
mod guard;
mod history;
mod state;

pub use behavior::{BehaviorState, InvalidBehaviorCode};
pub use event::Event;
pub use guard::Guard;
pub use history::{StateHistory, StateTransition, DEFAULT_HISTORY_CAPACITY};
pub use state::State;
