//! Finite State Machine (FSM) bookkeeping
//!
//! Transition rules live with the behaviour that owns the machine; this
//! type only tracks the current and previous state, how long the current
//! state has been active, and refuses to leave terminal states.

use std::fmt::Debug;

/// A state in the state machine
pub trait State: Copy + Eq + Debug {
    /// Terminal states have no outgoing transitions
    fn is_terminal(&self) -> bool {
        false
    }
}

/// Finite State Machine
#[derive(Debug, Clone)]
pub struct StateMachine<S: State> {
    /// Current state
    current: S,
    /// Previous state
    previous: Option<S>,
    /// Seconds spent in the current state
    time_in_state: f32,
    /// Number of transitions taken
    transitions: u32,
}

impl<S: State> StateMachine<S> {
    /// Create a new state machine
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            previous: None,
            time_in_state: 0.0,
            transitions: 0,
        }
    }

    /// Get current state
    #[inline]
    pub fn current(&self) -> S {
        self.current
    }

    /// Get previous state
    #[inline]
    pub fn previous(&self) -> Option<S> {
        self.previous
    }

    /// Seconds since the last transition
    #[inline]
    pub fn time_in_state(&self) -> f32 {
        self.time_in_state
    }

    /// Total transitions taken
    #[inline]
    pub fn transition_count(&self) -> u32 {
        self.transitions
    }

    /// Advance the state clock
    pub fn tick(&mut self, delta_time: f32) {
        self.time_in_state += delta_time.max(0.0);
    }

    /// Move to `to`.
    ///
    /// Returns false when already in `to` or when the current state is terminal.
    pub fn transition(&mut self, to: S) -> bool {
        if self.current == to || self.current.is_terminal() {
            return false;
        }
        self.previous = Some(self.current);
        self.current = to;
        self.time_in_state = 0.0;
        self.transitions += 1;
        true
    }

    /// Check if in a specific state
    #[inline]
    pub fn is_in(&self, state: S) -> bool {
        self.current == state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestState {
        Idle,
        Walking,
        Gone,
    }

    impl State for TestState {
        fn is_terminal(&self) -> bool {
            matches!(self, TestState::Gone)
        }
    }

    #[test]
    fn test_state_machine() {
        let fsm = StateMachine::new(TestState::Idle);
        assert!(fsm.is_in(TestState::Idle));
        assert_eq!(fsm.previous(), None);
        assert_eq!(fsm.transition_count(), 0);
    }

    #[test]
    fn test_transitions_reset_clock() {
        let mut fsm = StateMachine::new(TestState::Idle);
        fsm.tick(1.5);
        assert_eq!(fsm.time_in_state(), 1.5);

        assert!(fsm.transition(TestState::Walking));
        assert_eq!(fsm.time_in_state(), 0.0);
        assert_eq!(fsm.previous(), Some(TestState::Idle));

        // Self-transition is a no-op
        assert!(!fsm.transition(TestState::Walking));
        assert_eq!(fsm.transition_count(), 1);
    }

    #[test]
    fn test_terminal_state_is_sticky() {
        let mut fsm = StateMachine::new(TestState::Walking);
        assert!(fsm.transition(TestState::Gone));
        assert!(!fsm.transition(TestState::Idle));
        assert!(fsm.is_in(TestState::Gone));
    }
}
