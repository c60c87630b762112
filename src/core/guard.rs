//! Guard predicates for controlling state transitions.
//!
//! Guards are pure boolean functions over the current state. Transition rules
//! use them to say which behaviors a rule applies to.

use super::state::State;

/// Pure predicate that determines if a transition rule applies.
///
/// # Example
///
/// ```rust
/// use nav_commander::core::{BehaviorState, Guard, State};
///
/// let driving = Guard::one_of(&[BehaviorState::Go, BehaviorState::Run]);
/// assert!(driving.check(&BehaviorState::Run));
/// assert!(!driving.check(&BehaviorState::Pause));
///
/// let live = Guard::new(|b: &BehaviorState| !b.is_final());
/// assert!(!live.check(&BehaviorState::Quit));
/// ```
pub struct Guard<S: State> {
    predicate: Box<dyn Fn(&S) -> bool + Send + Sync>,
}

impl<S: State> Guard<S> {
    /// Create a guard from a pure predicate function.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// Guard that accepts every state.
    pub fn any() -> Self {
        Self::new(|_| true)
    }

    /// Guard that accepts exactly the listed states.
    pub fn one_of(states: &[S]) -> Self
    where
        S: 'static,
    {
        let states = states.to_vec();
        Self::new(move |s| states.contains(s))
    }

    /// Guard that accepts every state except `excluded`.
    pub fn except(excluded: S) -> Self
    where
        S: 'static,
    {
        Self::new(move |s| *s != excluded)
    }

    /// Check if the guard allows transition from this state.
    pub fn check(&self, state: &S) -> bool {
        (self.predicate)(state)
    }
}

impl<S: State> std::fmt::Debug for Guard<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::BehaviorState;

    #[test]
    fn guard_allows_matching_states() {
        let guard = Guard::new(|s: &BehaviorState| matches!(s, BehaviorState::Initialize));

        assert!(guard.check(&BehaviorState::Initialize));
        assert!(!guard.check(&BehaviorState::Go));
    }

    #[test]
    fn guard_checks_non_final_states() {
        let guard = Guard::new(|s: &BehaviorState| !s.is_final());

        assert!(guard.check(&BehaviorState::Run));
        assert!(guard.check(&BehaviorState::Pause));
        assert!(!guard.check(&BehaviorState::Abort));
        assert!(!guard.check(&BehaviorState::Quit));
    }

    #[test]
    fn one_of_matches_only_listed_states() {
        let guard = Guard::one_of(&[BehaviorState::Go, BehaviorState::Run, BehaviorState::Pause]);

        let accepted: Vec<_> = BehaviorState::ALL
            .into_iter()
            .filter(|b| guard.check(b))
            .collect();
        assert_eq!(
            accepted,
            vec![BehaviorState::Pause, BehaviorState::Run, BehaviorState::Go]
        );
    }

    #[test]
    fn except_rejects_single_state() {
        let guard = Guard::except(BehaviorState::Abort);

        assert!(!guard.check(&BehaviorState::Abort));
        assert!(guard.check(&BehaviorState::Quit));
        assert!(guard.check(&BehaviorState::None));
    }

    #[test]
    fn any_accepts_all() {
        let guard = Guard::<BehaviorState>::any();
        assert!(BehaviorState::ALL.iter().all(|b| guard.check(b)));
    }
}
