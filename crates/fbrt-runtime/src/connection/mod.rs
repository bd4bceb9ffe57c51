//! Data and event wiring between function block instances.
//!
//! A connection belongs to the output port it starts from and fans out to any
//! number of input ports. Destinations are held weakly so a deleted instance
//! never stays alive through its upstream wiring.

#![allow(missing_docs)]

mod data;
mod event;

pub use data::DataConnection;
pub use event::{EventConnection, EventTarget};

use std::sync::{Arc, Weak};

use crate::fb::FbCell;
use crate::interface::PortId;

/// Input port of a function block instance.
#[derive(Debug, Clone)]
pub struct ConnectionPoint {
    pub fb: Weak<FbCell>,
    pub port: PortId,
}

impl ConnectionPoint {
    #[must_use]
    pub fn new(fb: &Arc<FbCell>, port: PortId) -> Self {
        Self {
            fb: Arc::downgrade(fb),
            port,
        }
    }

    /// Returns true if this point addresses `port` of `fb`.
    #[must_use]
    pub fn refers_to(&self, fb: &Arc<FbCell>, port: PortId) -> bool {
        self.port == port && std::ptr::eq(self.fb.as_ptr(), Arc::as_ptr(fb))
    }
}
