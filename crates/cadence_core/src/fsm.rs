//! Animation Lifecycle State Machine
//!
//! A flat, table-driven state machine for the lifecycle of a single
//! animation:
//!
//! ```text
//! Armed --Start--> Running --Stop---> Stopped
//!                          --Finish-> Complete
//! ```
//!
//! `Stopped` and `Complete` are terminal. Events without a matching
//! transition from the current state are ignored, which is what makes
//! redundant `start`/`stop` calls idempotent.

use smallvec::SmallVec;

/// A state in the animation lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Created, not yet started
    #[default]
    Armed,
    /// Advancing on every frame
    Running,
    /// Cancelled before reaching its duration
    Stopped,
    /// Reached its duration
    Complete,
}

impl LifecycleState {
    /// Whether no further transitions are possible from this state
    pub fn is_terminal(self) -> bool {
        matches!(self, LifecycleState::Stopped | LifecycleState::Complete)
    }
}

/// An event driving the lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    Start,
    Stop,
    Finish,
}

/// A transition in the lifecycle table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from_state: LifecycleState,
    pub event: LifecycleEvent,
    pub to_state: LifecycleState,
}

impl Transition {
    pub const fn new(from: LifecycleState, event: LifecycleEvent, to: LifecycleState) -> Self {
        Self {
            from_state: from,
            event,
            to_state: to,
        }
    }
}

/// The complete transition table
pub static TRANSITIONS: [Transition; 3] = [
    Transition::new(
        LifecycleState::Armed,
        LifecycleEvent::Start,
        LifecycleState::Running,
    ),
    Transition::new(
        LifecycleState::Running,
        LifecycleEvent::Stop,
        LifecycleState::Stopped,
    ),
    Transition::new(
        LifecycleState::Running,
        LifecycleEvent::Finish,
        LifecycleState::Complete,
    ),
];

/// A lifecycle instance
#[derive(Clone, Debug, Default)]
pub struct Lifecycle {
    current_state: LifecycleState,
    /// History of state transitions (for debugging)
    history: SmallVec<[(LifecycleState, LifecycleEvent, LifecycleState); 2]>,
}

impl Lifecycle {
    /// Create a lifecycle in the `Armed` state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current state
    pub fn current(&self) -> LifecycleState {
        self.current_state
    }

    /// Check if we're in a specific state
    pub fn is_in(&self, state: LifecycleState) -> bool {
        self.current_state == state
    }

    /// Check if the lifecycle has ended
    pub fn is_terminal(&self) -> bool {
        self.current_state.is_terminal()
    }

    /// Get transition history
    pub fn history(&self) -> &[(LifecycleState, LifecycleEvent, LifecycleState)] {
        &self.history
    }

    /// Check if an event can trigger a transition from current state
    pub fn can_send(&self, event: LifecycleEvent) -> bool {
        self.find(event).is_some()
    }

    /// Send an event, returning the new state if a transition was taken
    pub fn send(&mut self, event: LifecycleEvent) -> Option<LifecycleState> {
        let current = self.current_state;
        let transition = self.find(event)?;

        self.current_state = transition.to_state;
        self.history.push((current, event, transition.to_state));

        tracing::trace!(?current, ?event, to = ?transition.to_state, "lifecycle transition");

        Some(transition.to_state)
    }

    fn find(&self, event: LifecycleEvent) -> Option<&'static Transition> {
        TRANSITIONS
            .iter()
            .find(|t| t.from_state == self.current_state && t.event == event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_then_finish() {
        let mut lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.current(), LifecycleState::Armed);

        assert_eq!(
            lifecycle.send(LifecycleEvent::Start),
            Some(LifecycleState::Running)
        );
        assert_eq!(
            lifecycle.send(LifecycleEvent::Finish),
            Some(LifecycleState::Complete)
        );
        assert!(lifecycle.is_terminal());
    }

    #[test]
    fn test_invalid_event_no_transition() {
        let mut lifecycle = Lifecycle::new();

        // Stop is not valid before start
        assert_eq!(lifecycle.send(LifecycleEvent::Stop), None);
        assert_eq!(lifecycle.send(LifecycleEvent::Finish), None);
        assert!(lifecycle.is_in(LifecycleState::Armed));
    }

    #[test]
    fn test_redundant_events_are_ignored() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.send(LifecycleEvent::Start);
        assert_eq!(lifecycle.send(LifecycleEvent::Start), None);

        lifecycle.send(LifecycleEvent::Stop);
        assert_eq!(lifecycle.send(LifecycleEvent::Stop), None);
        assert_eq!(lifecycle.current(), LifecycleState::Stopped);
    }

    #[test]
    fn test_terminal_states_do_not_restart() {
        for end in [LifecycleEvent::Stop, LifecycleEvent::Finish] {
            let mut lifecycle = Lifecycle::new();
            lifecycle.send(LifecycleEvent::Start);
            lifecycle.send(end);

            assert!(!lifecycle.can_send(LifecycleEvent::Start));
            assert_eq!(lifecycle.send(LifecycleEvent::Start), None);
            assert!(lifecycle.is_terminal());
        }
    }

    #[test]
    fn test_history() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.send(LifecycleEvent::Start);
        lifecycle.send(LifecycleEvent::Start);
        lifecycle.send(LifecycleEvent::Stop);

        let history = lifecycle.history();
        assert_eq!(history.len(), 2);
        assert_eq!(
            history[0],
            (
                LifecycleState::Armed,
                LifecycleEvent::Start,
                LifecycleState::Running
            )
        );
        assert_eq!(
            history[1],
            (
                LifecycleState::Running,
                LifecycleEvent::Stop,
                LifecycleState::Stopped
            )
        );
    }

    #[test]
    fn test_can_send() {
        let lifecycle = Lifecycle::new();

        assert!(lifecycle.can_send(LifecycleEvent::Start));
        assert!(!lifecycle.can_send(LifecycleEvent::Stop));
    }
}
