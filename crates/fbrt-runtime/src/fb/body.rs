use crate::exec::ExecutionContext;
use crate::interface::{EventId, PortId};
use crate::value::AnyValue;

use super::FbCore;

/// Behavior of a function block type.
///
/// The instance reads the WITH inputs of an event before calling
/// [`execute_event`](Self::execute_event); the body computes outputs and fires
/// output events through the context.
pub trait FbBody: Send {
    fn execute_event(&mut self, event: EventId, ctx: &mut FbContext<'_>);

    /// Called when a reset command returns the instance to idle.
    fn on_reset(&mut self) {}
}

/// View of an instance handed to its body for one event delivery.
pub struct FbContext<'a> {
    core: &'a mut FbCore,
    exec: &'a dyn ExecutionContext,
}

impl<'a> FbContext<'a> {
    pub(crate) fn new(core: &'a mut FbCore, exec: &'a dyn ExecutionContext) -> Self {
        Self { core, exec }
    }

    #[must_use]
    pub fn instance_name(&self) -> &str {
        self.core.instance_name()
    }

    /// Data input `port`.
    ///
    /// # Panics
    ///
    /// Panics if `port` is not a data input of the interface.
    #[must_use]
    pub fn di(&self, port: PortId) -> &AnyValue {
        match self.core.di(port) {
            Some(value) => value,
            None => panic!("{}: no data input {port}", self.core.instance_name()),
        }
    }

    /// Data output `port`.
    ///
    /// # Panics
    ///
    /// Panics if `port` is not a data output of the interface.
    #[must_use]
    pub fn do_(&self, port: PortId) -> &AnyValue {
        match self.core.do_(port) {
            Some(value) => value,
            None => panic!("{}: no data output {port}", self.core.instance_name()),
        }
    }

    /// Mutable data output `port`.
    ///
    /// # Panics
    ///
    /// Panics if `port` is not a data output of the interface.
    pub fn do_mut(&mut self, port: PortId) -> &mut AnyValue {
        self.core.do_value_at(port)
    }

    pub fn send_output_event(&mut self, eo: EventId) {
        self.core.send_output_event(eo, self.exec);
    }

    pub fn send_adapter_event(&mut self, adapter: PortId, event: EventId) {
        self.core.send_adapter_event(adapter, event, self.exec);
    }

    #[must_use]
    pub fn core(&self) -> &FbCore {
        self.core
    }
}
