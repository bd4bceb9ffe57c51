//! Event delivery boundary.
//!
//! The core never schedules: firing an output event hands one [`EventEntry`]
//! per destination to an [`ExecutionContext`]. [`EventChain`] is a FIFO
//! context that delivers entries on the calling thread.

#![allow(missing_docs)]

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::fb::FbCell;
use crate::interface::EventId;

/// One pending delivery.
#[derive(Clone)]
pub struct EventEntry {
    pub fb: Arc<FbCell>,
    pub event: EventId,
}

impl fmt::Debug for EventEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEntry")
            .field("fb", &self.fb.instance_name())
            .field("event", &self.event)
            .finish()
    }
}

/// Accepts events for eventual, in-order delivery.
pub trait ExecutionContext: Send + Sync {
    fn add_entry(&self, entry: EventEntry);
}

/// FIFO event chain.
#[derive(Debug, Default)]
pub struct EventChain {
    queue: Mutex<VecDeque<EventEntry>>,
}

impl EventChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    /// Delivers the oldest entry. Returns false when the chain is empty.
    pub fn step(&self) -> bool {
        let next = self.queue.lock().pop_front();
        match next {
            Some(entry) => {
                trace!(
                    "deliver event {} to {}",
                    entry.event,
                    entry.fb.instance_name()
                );
                entry.fb.receive_input_event(entry.event, self);
                true
            }
            None => false,
        }
    }

    /// Delivers entries until the chain is empty, including entries queued
    /// during delivery. Returns the number delivered.
    pub fn process_all(&self) -> usize {
        let mut delivered = 0;
        while self.step() {
            delivered += 1;
        }
        delivered
    }

    /// Drops all pending entries.
    pub fn clear(&self) {
        self.queue.lock().clear();
    }
}

impl ExecutionContext for EventChain {
    fn add_entry(&self, entry: EventEntry) {
        self.queue.lock().push_back(entry);
    }
}
