//! Rule-driven behavior state machine.

use super::context::CycleContext;
use super::rules::{default_rules, Action, Rule};
use crate::core::{BehaviorState, Event, StateHistory, StateTransition};
use crate::map::RoadGraph;
use crate::route::PlanError;

/// The commander's behavior state machine.
///
/// Starts in `Initialize`. Each `step` evaluates the rule table against the
/// current behavior and one event. When a rule's replan fails, the same step
/// evaluates the table once more with `ReplanFailed`.
#[derive(Debug)]
pub struct CommanderFsm {
    current: BehaviorState,
    rules: Vec<Rule>,
    history: StateHistory<BehaviorState>,
}

impl CommanderFsm {
    pub fn new(history_capacity: usize) -> Self {
        Self::resume(
            BehaviorState::Initialize,
            StateHistory::with_capacity(history_capacity),
        )
    }

    /// Continue from a previously recorded behavior and history.
    pub fn resume(behavior: BehaviorState, history: StateHistory<BehaviorState>) -> Self {
        Self {
            current: behavior,
            rules: default_rules(),
            history,
        }
    }

    pub fn current(&self) -> BehaviorState {
        self.current
    }

    pub fn history(&self) -> &StateHistory<BehaviorState> {
        &self.history
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Apply `event` and return the resulting behavior.
    pub fn step<G: RoadGraph + ?Sized>(
        &mut self,
        event: Event,
        ctx: &mut CycleContext<'_, G>,
    ) -> BehaviorState {
        let (next, cause) = match self.fire(event, ctx) {
            Ok(next) => (next, event),
            Err(err) => {
                tracing::debug!(error = %err, behavior = %self.current, "replan failed during transition");
                // ReplanFailed rules never plan, so this pass cannot fail.
                let next = self
                    .fire(Event::ReplanFailed, ctx)
                    .unwrap_or(BehaviorState::Abort);
                (next, Event::ReplanFailed)
            }
        };
        self.enter(next, cause, ctx);
        self.current
    }

    fn fire<G: RoadGraph + ?Sized>(
        &self,
        event: Event,
        ctx: &mut CycleContext<'_, G>,
    ) -> Result<BehaviorState, PlanError> {
        let current = self.current;
        let Some(rule) = self.rules.iter().find(|r| r.matches(current, event)) else {
            return Ok(current);
        };

        match rule.action {
            Action::Stay => Ok(current),
            Action::Enter(next) => Ok(next),
            Action::Resume => Ok(if ctx.has_active_route() {
                BehaviorState::Run
            } else {
                BehaviorState::Go
            }),
            Action::Replan => {
                ctx.replan_route()?;
                Ok(if current == BehaviorState::Go {
                    BehaviorState::Go
                } else {
                    BehaviorState::Run
                })
            }
            Action::ReplanFailed => Ok(if ctx.replans_exhausted() {
                BehaviorState::Abort
            } else {
                BehaviorState::Pause
            }),
        }
    }

    fn enter<G: RoadGraph + ?Sized>(
        &mut self,
        next: BehaviorState,
        cause: Event,
        ctx: &CycleContext<'_, G>,
    ) {
        if next == self.current {
            return;
        }

        tracing::info!(
            from = %self.current,
            to = %next,
            event = %cause,
            replan_attempts = *ctx.replan_num,
            "behavior changed"
        );
        self.history.record(StateTransition {
            from: self.current,
            to: next,
            timestamp: ctx.stamp,
            attempt: *ctx.replan_num,
            reason: cause.name().to_string(),
        });
        self.current = next;
    }
}
