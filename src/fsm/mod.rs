//! Behavior state machine: the transition table, the per-cycle context it
//! reads, and the machine that applies it.

mod context;
mod machine;
mod rules;

pub use context::CycleContext;
pub use machine::CommanderFsm;
pub use rules::{default_rules, Action, Rule};
