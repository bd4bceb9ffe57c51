//! Explicit execution control (ECC) driver for stateful function blocks.

use tracing::error;

use crate::interface::EventId;

/// Condition under which a transition fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// The delivered input event.
    Event(EventId),
    /// Fires without an event once the source state has been entered.
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub guard: Guard,
    pub target: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EccState {
    pub name: &'static str,
    pub transitions: &'static [Transition],
}

/// State machine over a static state table. State 0 is initial.
#[derive(Debug, Clone)]
pub struct Ecc {
    states: &'static [EccState],
    current: usize,
}

impl Ecc {
    #[must_use]
    pub const fn new(states: &'static [EccState]) -> Self {
        Self { states, current: 0 }
    }

    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_name(&self) -> Option<&'static str> {
        self.states.get(self.current).map(|state| state.name)
    }

    /// Overrides the current state without running entry actions.
    pub fn set_current(&mut self, state: usize) {
        self.current = state;
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }

    /// Applies `event` and then any event-less transitions, calling `enter`
    /// for each state entered. An event not accepted in the current state is
    /// dropped. Returns true if at least one transition fired.
    pub fn run(&mut self, event: EventId, mut enter: impl FnMut(usize)) -> bool {
        let mut trigger = Some(event);
        let mut fired = false;
        loop {
            let Some(state) = self.states.get(self.current) else {
                error!(
                    "ECC state {} out of range, resetting to initial state",
                    self.current
                );
                self.current = 0;
                return fired;
            };
            let next = state.transitions.iter().find(|transition| match transition.guard {
                Guard::Event(expected) => trigger == Some(expected),
                Guard::Always => true,
            });
            let Some(transition) = next else {
                return fired;
            };
            self.current = transition.target;
            trigger = None;
            fired = true;
            enter(transition.target);
        }
    }
}
