//! Function block instances and the event execution contract.
//!
//! Delivery of an input event to a running instance follows a fixed order:
//! read the event's WITH inputs from their connections, run the body, and for
//! every output event the body fires write its WITH outputs and queue the
//! event at the connected inputs.

#![allow(missing_docs)]

mod body;
mod ecc;
mod instance;
mod state;

pub use body::{FbBody, FbContext};
pub use ecc::{Ecc, EccState, Guard, Transition};
pub use instance::{AdapterPeer, AdapterSlot, DataSlot, FbCore};
pub use state::{FbState, MgmCommand, MgmResponse};

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use smol_str::SmolStr;
use tracing::{debug, trace};

use crate::exec::ExecutionContext;
use crate::interface::{split_adapter_event, EventId};

/// A function block instance: runtime state plus type-specific body.
pub struct FunctionBlock {
    core: FbCore,
    body: Box<dyn FbBody>,
}

impl FunctionBlock {
    #[must_use]
    pub fn new(core: FbCore, body: Box<dyn FbBody>) -> Self {
        Self { core, body }
    }

    /// Delivers input event `event`. Ignored unless the instance is running.
    pub fn receive_input_event(&mut self, event: EventId, exec: &dyn ExecutionContext) {
        if self.core.state() != FbState::Running {
            trace!(
                "{}: dropping event {event} in state {}",
                self.core.instance_name(),
                self.core.state()
            );
            return;
        }
        if usize::from(event) < self.core.spec().num_eis() {
            self.core.read_inputs_for(event);
            self.core.count_input_event(event);
        } else {
            let in_range = split_adapter_event(event)
                .is_some_and(|(adapter, _)| usize::from(adapter) < self.core.spec().num_adapters());
            if !in_range {
                trace!("{}: ignoring event {event}", self.core.instance_name());
                return;
            }
        }
        trace!("{}: execute event {event}", self.core.instance_name());
        let mut ctx = FbContext::new(&mut self.core, exec);
        self.body.execute_event(event, &mut ctx);
    }

    /// Applies a management command. Entering idle re-applies initial values.
    pub fn change_execution_state(&mut self, command: MgmCommand) -> MgmResponse {
        let current = self.core.state();
        let Some(next) = command.target_state(current) else {
            debug!(
                "{}: {command:?} rejected in state {current}",
                self.core.instance_name()
            );
            return MgmResponse::InvalidState;
        };
        if next == FbState::Idle {
            self.core.initialize();
            self.body.on_reset();
        }
        self.core.set_state(next);
        debug!("{}: {current} -> {next}", self.core.instance_name());
        MgmResponse::Ready
    }
}

impl Deref for FunctionBlock {
    type Target = FbCore;

    fn deref(&self) -> &FbCore {
        &self.core
    }
}

impl DerefMut for FunctionBlock {
    fn deref_mut(&mut self) -> &mut FbCore {
        &mut self.core
    }
}

impl fmt::Debug for FunctionBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionBlock")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

/// Shared handle to an instance. The instance is locked for the whole of one
/// event delivery.
pub struct FbCell {
    instance_name: SmolStr,
    type_name: SmolStr,
    block: Mutex<FunctionBlock>,
}

impl FbCell {
    #[must_use]
    pub fn new(block: FunctionBlock) -> Arc<Self> {
        Arc::new(Self {
            instance_name: SmolStr::new(block.instance_name()),
            type_name: SmolStr::new(block.type_name()),
            block: Mutex::new(block),
        })
    }

    #[must_use]
    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn lock(&self) -> MutexGuard<'_, FunctionBlock> {
        self.block.lock()
    }

    pub fn receive_input_event(&self, event: EventId, exec: &dyn ExecutionContext) {
        self.block.lock().receive_input_event(event, exec);
    }
}

impl fmt::Debug for FbCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FbCell")
            .field("instance_name", &self.instance_name)
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}
