//! Navigator behaviors issued by the commander.

use super::state::State;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// An external behavior code outside the known set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid behavior code {code} (expected a value below {count})", count = BehaviorState::COUNT)]
pub struct InvalidBehaviorCode {
    pub code: u8,
}

/// Navigator behaviors.
///
/// Declaration order is priority order: a lower ordinal always outranks a
/// higher one, so `Abort` preempts everything. The derived `Ord` follows the
/// same order, which means the *smallest* value is the most urgent.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum BehaviorState {
    Abort = 0,
    Quit = 1,
    Pause = 2,
    Run = 3,
    Initialize = 4,
    Go = 5,
    #[default]
    None = 6,
}

impl BehaviorState {
    /// Number of behaviors.
    pub const COUNT: u8 = 7;

    /// Every behavior, highest priority first.
    pub const ALL: [BehaviorState; 7] = [
        Self::Abort,
        Self::Quit,
        Self::Pause,
        Self::Run,
        Self::Initialize,
        Self::Go,
        Self::None,
    ];

    /// Decode an external behavior code.
    ///
    /// ```rust
    /// use nav_commander::core::BehaviorState;
    ///
    /// assert_eq!(BehaviorState::from_code(3), Ok(BehaviorState::Run));
    /// assert!(BehaviorState::from_code(7).is_err());
    /// ```
    pub fn from_code(code: u8) -> Result<Self, InvalidBehaviorCode> {
        Self::ALL
            .get(usize::from(code))
            .copied()
            .ok_or(InvalidBehaviorCode { code })
    }

    /// External code of this behavior (its ordinal).
    pub fn code(self) -> u8 {
        self as u8
    }

    /// The higher-priority of two behaviors.
    pub fn priority_of(a: Self, b: Self) -> Self {
        a.min(b)
    }

    /// True when `self` strictly outranks `other`.
    pub fn outranks(self, other: Self) -> bool {
        self < other
    }

    /// Behaviors that drive the vehicle along a route.
    pub fn requires_route(self) -> bool {
        matches!(self, Self::Go | Self::Run)
    }

    /// Behaviors whose orders must hold the vehicle still.
    pub fn halts_vehicle(self) -> bool {
        matches!(self, Self::Abort | Self::Quit | Self::Pause)
    }
}

impl State for BehaviorState {
    fn name(&self) -> &'static str {
        match self {
            Self::Abort => "Abort",
            Self::Quit => "Quit",
            Self::Pause => "Pause",
            Self::Run => "Run",
            Self::Initialize => "Initialize",
            Self::Go => "Go",
            Self::None => "None",
        }
    }

    fn is_final(&self) -> bool {
        matches!(self, Self::Abort | Self::Quit)
    }

    fn is_error(&self) -> bool {
        matches!(self, Self::Abort)
    }
}

impl TryFrom<u8> for BehaviorState {
    type Error = InvalidBehaviorCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code)
    }
}

impl From<BehaviorState> for u8 {
    fn from(behavior: BehaviorState) -> Self {
        behavior.code()
    }
}

impl fmt::Display for BehaviorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
