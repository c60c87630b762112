//! The behavior transition table.

use crate::core::{BehaviorState, Event, Guard, State};

/// What a matching rule does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Keep the current behavior
    Stay,
    /// Switch to the given behavior
    Enter(BehaviorState),
    /// Leave Pause: Run with an active route, Go otherwise
    Resume,
    /// Replan around the blockage; Go stays Go, anything else becomes Run
    Replan,
    /// Abort once replans are exhausted, otherwise Pause
    ReplanFailed,
}

/// One row of the transition table.
#[derive(Debug)]
pub struct Rule {
    /// Behaviors this rule applies to
    pub when: Guard<BehaviorState>,
    /// Triggering event; `None` matches any event
    pub on: Option<Event>,
    pub action: Action,
}

impl Rule {
    pub fn new(when: Guard<BehaviorState>, on: Option<Event>, action: Action) -> Self {
        Self { when, on, action }
    }

    pub fn matches(&self, behavior: BehaviorState, event: Event) -> bool {
        self.on.map_or(true, |on| on == event) && self.when.check(&behavior)
    }
}

/// The commander's transition table. The first matching rule wins.
///
/// Abort and Quit are sinks. An event no rule handles leaves the behavior
/// unchanged.
pub fn default_rules() -> Vec<Rule> {
    use BehaviorState::{Abort, Go, Initialize, Pause, Quit, Run};

    let driving = || Guard::one_of(&[Go, Run]);
    let en_route = || Guard::one_of(&[Go, Run, Pause]);

    vec![
        Rule::new(Guard::new(|b: &BehaviorState| b.is_final()), None, Action::Stay),
        Rule::new(Guard::any(), Some(Event::Aborted), Action::Enter(Abort)),
        Rule::new(Guard::except(Abort), Some(Event::PauseRequested), Action::Enter(Pause)),
        Rule::new(
            Guard::one_of(&[Initialize]),
            Some(Event::MissionComplete),
            Action::Enter(Quit),
        ),
        Rule::new(Guard::one_of(&[Initialize]), None, Action::Enter(Go)),
        Rule::new(Guard::one_of(&[Pause]), Some(Event::Resumed), Action::Resume),
        Rule::new(driving(), Some(Event::CheckpointReached), Action::Enter(Run)),
        Rule::new(en_route(), Some(Event::MissionComplete), Action::Enter(Quit)),
        Rule::new(en_route(), Some(Event::BlockageDetected), Action::Replan),
        Rule::new(en_route(), Some(Event::ReplanFailed), Action::ReplanFailed),
    ]
}
