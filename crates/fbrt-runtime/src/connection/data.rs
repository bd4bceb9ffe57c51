use std::sync::Arc;

use fbrt_types::TypeId;
use parking_lot::Mutex;

use crate::fb::FbCell;
use crate::interface::PortId;
use crate::value::AnyValue;

use super::ConnectionPoint;

#[derive(Debug)]
struct DataState {
    value: AnyValue,
    type_open: bool,
    forced: bool,
    destinations: Vec<ConnectionPoint>,
}

/// Wiring from one data output to any number of data inputs, carrying the
/// most recently written value.
#[derive(Debug)]
pub struct DataConnection {
    state: Mutex<DataState>,
}

impl DataConnection {
    /// Creates a connection holding `initial`. A type-open connection starts
    /// from a generic output whose concrete type is not yet known.
    #[must_use]
    pub fn new(initial: AnyValue, type_open: bool) -> Self {
        Self {
            state: Mutex::new(DataState {
                value: initial,
                type_open,
                forced: false,
                destinations: Vec::new(),
            }),
        }
    }

    /// Snapshot of the carried value.
    #[must_use]
    pub fn value(&self) -> AnyValue {
        self.state.lock().value.clone()
    }

    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.state.lock().value.type_id()
    }

    #[must_use]
    pub fn is_type_open(&self) -> bool {
        self.state.lock().type_open
    }

    /// Fixes the carried type to that of `prototype`.
    pub fn set_type(&self, prototype: &AnyValue) {
        let mut state = self.state.lock();
        state.value = prototype.zeroed();
        state.type_open = false;
    }

    /// Returns true once at least one destination is attached.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        !self.state.lock().destinations.is_empty()
    }

    #[must_use]
    pub fn destinations(&self) -> Vec<ConnectionPoint> {
        self.state.lock().destinations.clone()
    }

    /// Attaches a destination. Returns false if it is already attached.
    pub fn add_destination(&self, point: ConnectionPoint) -> bool {
        let mut state = self.state.lock();
        if state
            .destinations
            .iter()
            .any(|existing| existing.port == point.port && existing.fb.ptr_eq(&point.fb))
        {
            return false;
        }
        state.destinations.push(point);
        true
    }

    /// Detaches `port` of `fb`. Returns false if it was not attached.
    pub fn remove_destination(&self, fb: &Arc<FbCell>, port: PortId) -> bool {
        let mut state = self.state.lock();
        let before = state.destinations.len();
        state
            .destinations
            .retain(|point| !point.refers_to(fb, port));
        state.destinations.len() != before
    }

    /// Copies the source output into the connection. When the connection is
    /// forced the write is dropped and the forced value is copied back into
    /// `source` instead.
    pub fn write(&self, source: &mut AnyValue) {
        let mut state = self.state.lock();
        if state.forced {
            source.set_value(&state.value);
        } else if state.type_open {
            state.value.assign(source);
        } else {
            state.value.set_value(source);
        }
    }

    /// Copies the carried value into `target`. Generic destinations take the
    /// value's own type; typed destinations coerce it.
    pub fn read_into(&self, target: &mut AnyValue, generic: bool) {
        let state = self.state.lock();
        if generic {
            target.assign(&state.value);
        } else {
            target.set_value(&state.value);
        }
    }

    /// Freezes the connection at `value` until [`release`](Self::release).
    pub fn force(&self, value: &AnyValue) {
        let mut state = self.state.lock();
        state.value.set_value(value);
        state.forced = true;
    }

    pub fn release(&self) {
        self.state.lock().forced = false;
    }

    #[must_use]
    pub fn is_forced(&self) -> bool {
        self.state.lock().forced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forced_connection_echoes_back_into_source() {
        let connection = DataConnection::new(AnyValue::Int(0), false);
        connection.force(&AnyValue::Int(42));
        let mut source = AnyValue::Int(7);
        connection.write(&mut source);
        assert_eq!(source, AnyValue::Int(42));
        assert_eq!(connection.value(), AnyValue::Int(42));

        connection.release();
        source = AnyValue::Int(9);
        connection.write(&mut source);
        assert_eq!(connection.value(), AnyValue::Int(9));
    }

    #[test]
    fn typed_reads_coerce_and_generic_reads_assign() {
        let connection = DataConnection::new(AnyValue::Int(-3), false);
        let mut typed = AnyValue::DInt(0);
        connection.read_into(&mut typed, false);
        assert_eq!(typed, AnyValue::DInt(-3));

        let mut generic = AnyValue::SInt(0);
        connection.read_into(&mut generic, true);
        assert_eq!(generic, AnyValue::Int(-3));
    }

    #[test]
    fn set_type_closes_open_connection() {
        let connection = DataConnection::new(AnyValue::SInt(0), true);
        assert!(connection.is_type_open());
        connection.set_type(&AnyValue::LReal(1.0));
        assert!(!connection.is_type_open());
        assert_eq!(connection.value(), AnyValue::LReal(0.0));
    }
}
