use std::sync::{Arc, Weak};

use fbrt_types::{StringId, TypeId};
use smol_str::SmolStr;
use tracing::{debug, trace, warn};

use crate::connection::{DataConnection, EventConnection};
use crate::error::RuntimeError;
use crate::exec::{EventEntry, ExecutionContext};
use crate::interface::{adapter_event_id, AdapterDecl, EventId, PortId, SpecHandle};
use crate::resource::ResourceSync;
use crate::typelib::TypeLibrary;
use crate::value::AnyValue;

use super::{FbCell, FbState};

/// Storage of one data port.
#[derive(Debug, Clone)]
pub struct DataSlot {
    value: AnyValue,
    initial: AnyValue,
    declared: TypeId,
    configured: Option<TypeId>,
    forced: bool,
}

impl DataSlot {
    fn new(declared: TypeId, value: AnyValue) -> Self {
        Self {
            initial: value.clone(),
            value,
            declared,
            configured: None,
            forced: false,
        }
    }

    #[must_use]
    pub fn value(&self) -> &AnyValue {
        &self.value
    }

    /// Type written in the interface, possibly a generic family.
    #[must_use]
    pub fn declared_type(&self) -> TypeId {
        self.declared
    }

    /// Concrete type pushed into a generic port by configuration.
    #[must_use]
    pub fn configured_type(&self) -> Option<TypeId> {
        self.configured
    }

    #[must_use]
    pub fn is_generic(&self) -> bool {
        self.declared.is_generic()
    }

    /// Generic port without a configured concrete type.
    #[must_use]
    pub fn is_type_open(&self) -> bool {
        self.is_generic() && self.configured.is_none()
    }

    #[must_use]
    pub fn is_forced(&self) -> bool {
        self.forced
    }

    fn configure(&mut self, reference: &AnyValue) {
        self.configured = Some(reference.type_id());
        self.initial = reference.zeroed();
        self.value = self.initial.clone();
    }
}

/// Adapter instance of a function block and the adapter it is linked to.
#[derive(Debug, Clone)]
pub struct AdapterSlot {
    decl: AdapterDecl,
    peer: Option<AdapterPeer>,
}

impl AdapterSlot {
    #[must_use]
    pub fn decl(&self) -> &AdapterDecl {
        &self.decl
    }

    #[must_use]
    pub fn peer(&self) -> Option<&AdapterPeer> {
        self.peer.as_ref()
    }
}

/// Far end of an adapter link.
#[derive(Debug, Clone)]
pub struct AdapterPeer {
    pub fb: Weak<FbCell>,
    pub adapter: PortId,
}

/// Runtime state of a function block instance, independent of its body.
///
/// Port arrays are sized from the interface at construction. Data values are
/// stored inputs first, then outputs.
#[derive(Debug)]
pub struct FbCore {
    spec: SpecHandle,
    instance_name: SmolStr,
    instance_id: StringId,
    type_name: SmolStr,
    state: FbState,
    deletable: bool,
    library: Arc<TypeLibrary>,
    sync: Arc<ResourceSync>,
    eo_conns: Box<[EventConnection]>,
    di_conns: Box<[Option<Arc<DataConnection>>]>,
    do_conns: Box<[Arc<DataConnection>]>,
    vars: Box<[DataSlot]>,
    adapters: Box<[AdapterSlot]>,
    ei_counts: Box<[u32]>,
    eo_counts: Box<[u32]>,
}

impl FbCore {
    /// Builds the port storage for `spec`. Every port starts at the default
    /// value of its declared type.
    pub fn new(
        spec: SpecHandle,
        instance_name: &str,
        type_name: &str,
        library: Arc<TypeLibrary>,
        sync: Arc<ResourceSync>,
    ) -> Result<Self, RuntimeError> {
        spec.validate()?;
        let mut vars = Vec::with_capacity(spec.num_dis() + spec.num_dos());
        for type_name in spec.di_type_names.iter().chain(spec.do_type_names.iter()) {
            let name = library.dictionary().name(*type_name);
            let declared = library
                .resolve_type(&name)
                .ok_or_else(|| RuntimeError::UnknownType(name.clone()))?;
            let value = library.default_port_value(declared)?;
            vars.push(DataSlot::new(declared, value));
        }
        let do_conns = vars[spec.num_dis()..]
            .iter()
            .map(|slot| Arc::new(DataConnection::new(slot.value.clone(), slot.is_type_open())))
            .collect();
        let adapters = spec
            .adapters
            .iter()
            .map(|decl| AdapterSlot {
                decl: *decl,
                peer: None,
            })
            .collect();
        let instance_id = library.dictionary().insert(instance_name);

        Ok(Self {
            eo_conns: (0..spec.num_eos()).map(|_| EventConnection::new()).collect(),
            di_conns: vec![None; spec.num_dis()].into_boxed_slice(),
            do_conns,
            vars: vars.into_boxed_slice(),
            adapters,
            ei_counts: vec![0; spec.num_eis()].into_boxed_slice(),
            eo_counts: vec![0; spec.num_eos()].into_boxed_slice(),
            spec,
            instance_name: SmolStr::new(instance_name),
            instance_id,
            type_name: SmolStr::new(type_name),
            state: FbState::Idle,
            deletable: true,
            library,
            sync,
        })
    }

    #[must_use]
    pub fn spec(&self) -> &SpecHandle {
        &self.spec
    }

    #[must_use]
    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }

    #[must_use]
    pub fn instance_id(&self) -> StringId {
        self.instance_id
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    #[must_use]
    pub fn state(&self) -> FbState {
        self.state
    }

    pub(crate) fn set_state(&mut self, state: FbState) {
        self.state = state;
    }

    #[must_use]
    pub fn library(&self) -> &Arc<TypeLibrary> {
        &self.library
    }

    /// Re-applies every port's initial value.
    pub fn initialize(&mut self) {
        for slot in self.vars.iter_mut() {
            slot.value.clone_from(&slot.initial);
        }
    }

    pub fn set_deletable(&mut self, deletable: bool) {
        self.deletable = deletable;
    }

    #[must_use]
    pub fn is_deletable(&self) -> bool {
        self.deletable
    }

    /// Deletable flag set and not running.
    #[must_use]
    pub fn is_currently_deletable(&self) -> bool {
        self.deletable && self.state != FbState::Running
    }

    fn lookup(&self, name: &str, find: impl Fn(StringId) -> PortId) -> PortId {
        find(self.library.dictionary().get_id(name))
    }

    #[must_use]
    pub fn get_eiid(&self, name: &str) -> PortId {
        self.lookup(name, |id| self.spec.ei_id(id))
    }

    #[must_use]
    pub fn get_eoid(&self, name: &str) -> PortId {
        self.lookup(name, |id| self.spec.eo_id(id))
    }

    #[must_use]
    pub fn get_diid(&self, name: &str) -> PortId {
        self.lookup(name, |id| self.spec.di_id(id))
    }

    #[must_use]
    pub fn get_doid(&self, name: &str) -> PortId {
        self.lookup(name, |id| self.spec.do_id(id))
    }

    #[must_use]
    pub fn get_adapter_port_id(&self, name: &str) -> PortId {
        self.lookup(name, |id| self.spec.adapter_id(id))
    }

    #[must_use]
    pub fn di(&self, port: PortId) -> Option<&AnyValue> {
        self.di_slot(port).map(DataSlot::value)
    }

    #[must_use]
    pub fn do_(&self, port: PortId) -> Option<&AnyValue> {
        self.do_slot(port).map(DataSlot::value)
    }

    #[must_use]
    pub fn di_slot(&self, port: PortId) -> Option<&DataSlot> {
        let port = usize::from(port);
        (port < self.spec.num_dis()).then(|| &self.vars[port])
    }

    #[must_use]
    pub fn do_slot(&self, port: PortId) -> Option<&DataSlot> {
        let port = usize::from(port);
        (port < self.spec.num_dos()).then(|| &self.vars[self.spec.num_dis() + port])
    }

    fn di_slot_mut(&mut self, port: PortId) -> Option<&mut DataSlot> {
        let port = usize::from(port);
        if port < self.spec.num_dis() {
            Some(&mut self.vars[port])
        } else {
            None
        }
    }

    fn do_slot_mut(&mut self, port: PortId) -> Option<&mut DataSlot> {
        let port = usize::from(port);
        if port < self.spec.num_dos() {
            let offset = self.spec.num_dis();
            Some(&mut self.vars[offset + port])
        } else {
            None
        }
    }

    pub(crate) fn do_value_at(&mut self, port: PortId) -> &mut AnyValue {
        let port = usize::from(port);
        assert!(
            port < self.spec.num_dos(),
            "{}: no data output {port}",
            self.instance_name
        );
        let offset = self.spec.num_dis();
        &mut self.vars[offset + port].value
    }

    #[must_use]
    pub fn data_input(&self, name: &str) -> Option<&AnyValue> {
        self.di(self.get_diid(name))
    }

    #[must_use]
    pub fn data_output(&self, name: &str) -> Option<&AnyValue> {
        self.do_(self.get_doid(name))
    }

    /// Effective type name of a data input: the configured type for a
    /// configured generic port, the declared type otherwise.
    #[must_use]
    pub fn di_type_name(&self, port: PortId) -> Option<SmolStr> {
        self.di_slot(port).map(|slot| self.slot_type_name(slot))
    }

    #[must_use]
    pub fn do_type_name(&self, port: PortId) -> Option<SmolStr> {
        self.do_slot(port).map(|slot| self.slot_type_name(slot))
    }

    fn slot_type_name(&self, slot: &DataSlot) -> SmolStr {
        self.library
            .type_name(slot.configured.unwrap_or(slot.declared))
    }

    #[must_use]
    pub fn di_connection(&self, port: PortId) -> Option<&Arc<DataConnection>> {
        self.di_conns.get(usize::from(port))?.as_ref()
    }

    #[must_use]
    pub fn do_connection(&self, port: PortId) -> Option<&Arc<DataConnection>> {
        self.do_conns.get(usize::from(port))
    }

    #[must_use]
    pub fn eo_connection(&self, port: PortId) -> Option<&EventConnection> {
        self.eo_conns.get(usize::from(port))
    }

    pub fn eo_connection_mut(&mut self, port: PortId) -> Option<&mut EventConnection> {
        self.eo_conns.get_mut(usize::from(port))
    }

    /// Attaches `connection` to a data input, or detaches with `None`.
    ///
    /// A port already holding a different connection is left untouched and
    /// the call fails; passing the held connection again re-applies its type
    /// to a generic port.
    pub fn connect_di(
        &mut self,
        port: PortId,
        connection: Option<Arc<DataConnection>>,
    ) -> Result<(), RuntimeError> {
        let index = usize::from(port);
        if index >= self.di_conns.len() {
            return Err(RuntimeError::UnknownPort(SmolStr::new(format!(
                "{}.{port}",
                self.instance_name
            ))));
        }
        let Some(connection) = connection else {
            let _guard = self.sync.lock();
            self.di_conns[index] = None;
            return Ok(());
        };
        if let Some(existing) = &self.di_conns[index] {
            if !Arc::ptr_eq(existing, &connection) {
                warn!(
                    "{}: data input {port} already connected, rejecting new connection",
                    self.instance_name
                );
                return Err(RuntimeError::AlreadyConnected(self.di_port_name(port)));
            }
        }
        if !connection.is_type_open() && !self.configure_generic_di(port, &connection.value()) {
            return Err(RuntimeError::TypeMismatch {
                source_type: self.library.type_name(connection.type_id()),
                target_type: self.di_type_name(port).unwrap_or_default(),
            });
        }
        let _guard = self.sync.lock();
        self.di_conns[index] = Some(connection);
        Ok(())
    }

    fn di_port_name(&self, port: PortId) -> SmolStr {
        let name = self
            .spec
            .di_names
            .get(usize::from(port))
            .map_or_else(|| SmolStr::new_inline("?"), |id| self.library.dictionary().name(*id));
        SmolStr::new(format!("{}.{name}", self.instance_name))
    }

    /// Pushes the type of `reference` into a generic data input. Typed inputs
    /// accept any reference they can be assigned from.
    pub fn configure_generic_di(&mut self, port: PortId, reference: &AnyValue) -> bool {
        let library = Arc::clone(&self.library);
        let Some(slot) = self.di_slot_mut(port) else {
            return false;
        };
        configure_slot(slot, reference, &library)
    }

    /// Pushes the type of `reference` into a generic data output and its
    /// connection.
    pub fn configure_generic_do(&mut self, port: PortId, reference: &AnyValue) -> bool {
        let library = Arc::clone(&self.library);
        let Some(slot) = self.do_slot_mut(port) else {
            return false;
        };
        let was_open = slot.is_type_open();
        if !configure_slot(slot, reference, &library) {
            return false;
        }
        if was_open {
            self.do_conns[usize::from(port)].set_type(reference);
        }
        true
    }

    /// Sets a data input and its initial value from a literal.
    pub fn set_di_literal(&mut self, port: PortId, literal: &str) -> Result<(), RuntimeError> {
        let slot = self
            .di_slot_mut(port)
            .ok_or_else(|| RuntimeError::UnknownPort(SmolStr::new(port.to_string())))?;
        if slot.is_type_open() {
            slot.value = AnyValue::parse_typed(literal)?;
        } else {
            slot.value.from_string(literal)?;
        }
        slot.initial = slot.value.clone();
        Ok(())
    }

    /// Freezes a data input at `value`; reads from its connection are
    /// suppressed until released.
    pub fn force_data_input(&mut self, port: PortId, value: &AnyValue) -> bool {
        let Some(slot) = self.di_slot_mut(port) else {
            return false;
        };
        store(slot, value);
        slot.forced = true;
        true
    }

    /// Freezes a data output and its connection at `value`.
    pub fn force_data_output(&mut self, port: PortId, value: &AnyValue) -> bool {
        let Some(slot) = self.do_slot_mut(port) else {
            return false;
        };
        store(slot, value);
        slot.forced = true;
        let forced = slot.value.clone();
        self.do_conns[usize::from(port)].force(&forced);
        true
    }

    pub fn release_data_input(&mut self, port: PortId) -> bool {
        let Some(slot) = self.di_slot_mut(port) else {
            return false;
        };
        slot.forced = false;
        true
    }

    pub fn release_data_output(&mut self, port: PortId) -> bool {
        let Some(slot) = self.do_slot_mut(port) else {
            return false;
        };
        slot.forced = false;
        self.do_conns[usize::from(port)].release();
        true
    }

    /// Copies a data input's connection value into its storage. No-op when
    /// unconnected or forced.
    pub fn read_data(&mut self, port: PortId) {
        let Some(Some(connection)) = self.di_conns.get(usize::from(port)) else {
            return;
        };
        let connection = Arc::clone(connection);
        let Some(slot) = self.di_slot_mut(port) else {
            return;
        };
        if slot.forced {
            return;
        }
        let generic = slot.is_generic();
        connection.read_into(&mut slot.value, generic);
    }

    /// Copies a data output into its connection. No-op when nothing is
    /// attached to the connection.
    pub fn write_data(&mut self, port: PortId) {
        let Some(connection) = self.do_conns.get(usize::from(port)).map(Arc::clone) else {
            return;
        };
        if !connection.is_connected() {
            return;
        }
        if let Some(slot) = self.do_slot_mut(port) {
            connection.write(&mut slot.value);
        }
    }

    /// Reads the WITH inputs of `event` under the resource region.
    pub(crate) fn read_inputs_for(&mut self, event: EventId) {
        let spec = self.spec.clone();
        let sync = Arc::clone(&self.sync);
        let _guard = sync.lock();
        for port in spec.ei_with(event) {
            self.read_data(*port);
        }
    }

    /// Writes the WITH outputs of `eo` (and the outputs tied to no event) and
    /// queues the event at every destination. Out-of-range ids are ignored.
    pub fn send_output_event(&mut self, eo: EventId, exec: &dyn ExecutionContext) {
        let index = usize::from(eo);
        if index >= self.spec.num_eos() {
            trace!("{}: ignoring output event {eo}", self.instance_name);
            return;
        }
        let spec = self.spec.clone();
        {
            let sync = Arc::clone(&self.sync);
            let _guard = sync.lock();
            for port in spec.eo_with(eo).iter().chain(spec.eo_unassociated()) {
                self.write_data(*port);
            }
        }
        self.eo_counts[index] = self.eo_counts[index].saturating_add(1);
        trace!("{}: fire output event {eo}", self.instance_name);
        self.eo_conns[index].trigger(exec);
    }

    /// Relays `event` through adapter `adapter` to the linked peer.
    pub fn send_adapter_event(
        &mut self,
        adapter: PortId,
        event: EventId,
        exec: &dyn ExecutionContext,
    ) {
        let Some(peer) = self
            .adapters
            .get(usize::from(adapter))
            .and_then(|slot| slot.peer.as_ref())
        else {
            trace!("{}: adapter {adapter} not linked", self.instance_name);
            return;
        };
        if let Some(fb) = peer.fb.upgrade() {
            exec.add_entry(EventEntry {
                fb,
                event: adapter_event_id(peer.adapter, event),
            });
        }
    }

    #[must_use]
    pub fn adapter(&self, port: PortId) -> Option<&AdapterSlot> {
        self.adapters.get(usize::from(port))
    }

    /// Links or unlinks an adapter. Linking fails if a peer is already set.
    pub fn set_adapter_peer(&mut self, port: PortId, peer: Option<AdapterPeer>) -> bool {
        let Some(slot) = self.adapters.get_mut(usize::from(port)) else {
            return false;
        };
        if peer.is_some() && slot.peer.is_some() {
            return false;
        }
        slot.peer = peer;
        true
    }

    pub(crate) fn count_input_event(&mut self, event: EventId) {
        if let Some(count) = self.ei_counts.get_mut(usize::from(event)) {
            *count = count.saturating_add(1);
        }
    }

    /// Events received on an input since creation.
    #[must_use]
    pub fn ei_count(&self, event: EventId) -> u32 {
        self.ei_counts.get(usize::from(event)).copied().unwrap_or(0)
    }

    /// Events fired on an output since creation.
    #[must_use]
    pub fn eo_count(&self, event: EventId) -> u32 {
        self.eo_counts.get(usize::from(event)).copied().unwrap_or(0)
    }

    /// Unlinks every connection held by this instance. Used before deletion.
    pub(crate) fn detach_all(&mut self, me: &Arc<FbCell>) {
        let _guard = self.sync.lock();
        for (port, connection) in self.di_conns.iter_mut().enumerate() {
            if let Some(connection) = connection.take() {
                connection.remove_destination(me, port as PortId);
            }
        }
        for slot in self.adapters.iter_mut() {
            slot.peer = None;
        }
        debug!("{}: detached all connections", self.instance_name);
    }
}

fn store(slot: &mut DataSlot, value: &AnyValue) {
    if slot.is_type_open() {
        slot.value.assign(value);
    } else {
        slot.value.set_value(value);
    }
}

fn configure_slot(slot: &mut DataSlot, reference: &AnyValue, library: &TypeLibrary) -> bool {
    let source = reference.type_id();
    if !slot.is_generic() {
        return library.is_assignable(slot.declared, source);
    }
    if !library.is_assignable(slot.declared, source) {
        return false;
    }
    if slot.configured != Some(source) {
        slot.configure(reference);
    }
    true
}
