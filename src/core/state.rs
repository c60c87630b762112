//! Core State trait for state machine states.
//!
//! Behaviors driven by the commander implement this trait so that guards and
//! transition history can be written once, independent of the concrete enum.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for state machine states.
///
/// All methods are pure. States are small immutable values describing where
/// the machine currently is.
///
/// # Example
///
/// ```rust
/// use nav_commander::core::{BehaviorState, State};
///
/// assert_eq!(BehaviorState::Run.name(), "Run");
/// assert!(BehaviorState::Quit.is_final());
/// assert!(BehaviorState::Abort.is_error());
/// assert!(!BehaviorState::Pause.is_final());
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Stable name for display and logging.
    fn name(&self) -> &'static str;

    /// Check if this is a final (terminal) state.
    ///
    /// Final states have no outgoing transitions.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if this is an error state.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}
