use std::sync::{Arc, Weak};

use tracing::trace;

use crate::exec::{EventEntry, ExecutionContext};
use crate::fb::FbCell;
use crate::interface::EventId;

/// Event input of a function block instance.
#[derive(Debug, Clone)]
pub struct EventTarget {
    pub fb: Weak<FbCell>,
    pub event: EventId,
}

impl EventTarget {
    fn is(&self, fb: &Arc<FbCell>, event: EventId) -> bool {
        self.event == event && std::ptr::eq(self.fb.as_ptr(), Arc::as_ptr(fb))
    }
}

/// Wiring from one event output to any number of event inputs.
#[derive(Debug, Default)]
pub struct EventConnection {
    destinations: Vec<EventTarget>,
}

impl EventConnection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a destination. Returns false if it is already attached.
    pub fn add_destination(&mut self, fb: &Arc<FbCell>, event: EventId) -> bool {
        if self.destinations.iter().any(|target| target.is(fb, event)) {
            return false;
        }
        self.destinations.push(EventTarget {
            fb: Arc::downgrade(fb),
            event,
        });
        true
    }

    /// Detaches a destination. Returns false if it was not attached.
    pub fn remove_destination(&mut self, fb: &Arc<FbCell>, event: EventId) -> bool {
        let before = self.destinations.len();
        self.destinations.retain(|target| !target.is(fb, event));
        self.destinations.len() != before
    }

    /// Drops every destination on `fb` and any whose instance is gone.
    pub fn remove_instance(&mut self, fb: &Arc<FbCell>) {
        self.destinations.retain(|target| {
            target.fb.strong_count() > 0 && !std::ptr::eq(target.fb.as_ptr(), Arc::as_ptr(fb))
        });
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        !self.destinations.is_empty()
    }

    #[must_use]
    pub fn destinations(&self) -> &[EventTarget] {
        &self.destinations
    }

    /// Queues delivery to every live destination.
    pub fn trigger(&self, exec: &dyn ExecutionContext) {
        for target in &self.destinations {
            match target.fb.upgrade() {
                Some(fb) => exec.add_entry(EventEntry {
                    fb,
                    event: target.event,
                }),
                None => trace!("event destination {} dropped", target.event),
            }
        }
    }
}
