//! Resource: container of function block instances.
//!
//! The resource owns the instances, the event chain that delivers their
//! events and the critical region guarding data transfer through
//! connections. Ports are addressed as `INSTANCE.PORT`.
//!
//! Lock order: an instance lock may be taken before the resource region, and
//! at most one instance is locked at a time by management calls.

#![allow(missing_docs)]

use std::sync::Arc;

use fbrt_types::{is_valid_identifier, StringDictionary, TypeId};
use indexmap::IndexMap;
use parking_lot::{Mutex, MutexGuard, RwLock};
use smol_str::SmolStr;
use tracing::{debug, warn};

use crate::config::RuntimeConfig;
use crate::connection::ConnectionPoint;
use crate::error::RuntimeError;
use crate::exec::{EventChain, EventEntry, ExecutionContext};
use crate::fb::{AdapterPeer, FbCell, FbCore, FunctionBlock, MgmCommand, MgmResponse};
use crate::interface::{EventId, PortId, INVALID_PORT_ID};
use crate::typelib::TypeLibrary;
use crate::value::AnyValue;

/// Critical region for data transfer through the connections of one
/// resource.
#[derive(Debug, Default)]
pub struct ResourceSync {
    region: Mutex<()>,
}

impl ResourceSync {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, ()> {
        self.region.lock()
    }
}

/// Port kinds addressable by `INSTANCE.PORT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortRef {
    EventInput(PortId),
    EventOutput(PortId),
    DataInput(PortId),
    DataOutput(PortId),
    Adapter(PortId),
}

/// Container of function block instances.
#[derive(Debug)]
pub struct Resource {
    name: SmolStr,
    library: Arc<TypeLibrary>,
    sync: Arc<ResourceSync>,
    fbs: RwLock<IndexMap<SmolStr, Arc<FbCell>>>,
    chain: Arc<EventChain>,
}

impl Resource {
    #[must_use]
    pub fn new(name: &str, library: Arc<TypeLibrary>) -> Self {
        Self {
            name: SmolStr::new(name),
            library,
            sync: Arc::new(ResourceSync::new()),
            fbs: RwLock::new(IndexMap::new()),
            chain: Arc::new(EventChain::new()),
        }
    }

    /// Resource with the standard library and the configured data types.
    pub fn from_config(config: &RuntimeConfig) -> Result<Self, RuntimeError> {
        let library = TypeLibrary::standard(StringDictionary::shared());
        config.register_types(&library)?;
        Ok(Self::new(&config.resource_name, Arc::new(library)))
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn library(&self) -> &Arc<TypeLibrary> {
        &self.library
    }

    #[must_use]
    pub fn chain(&self) -> &Arc<EventChain> {
        &self.chain
    }

    #[must_use]
    pub fn sync(&self) -> &Arc<ResourceSync> {
        &self.sync
    }

    /// Creates an instance of `type_name`. The instance starts idle.
    pub fn create_fb(&self, instance: &str, type_name: &str) -> Result<Arc<FbCell>, RuntimeError> {
        if !is_valid_identifier(instance) {
            return Err(RuntimeError::InvalidInstanceName(SmolStr::new(instance)));
        }
        if self.fbs.read().contains_key(instance) {
            return Err(RuntimeError::DuplicateInstance(SmolStr::new(instance)));
        }
        let (spec, body) = self.library.instantiate(type_name)?;
        let core = FbCore::new(
            spec,
            instance,
            type_name,
            Arc::clone(&self.library),
            Arc::clone(&self.sync),
        )?;
        let cell = FbCell::new(FunctionBlock::new(core, body));
        let mut fbs = self.fbs.write();
        if fbs.contains_key(instance) {
            return Err(RuntimeError::DuplicateInstance(SmolStr::new(instance)));
        }
        fbs.insert(SmolStr::new(instance), Arc::clone(&cell));
        debug!("{}: created {instance} : {type_name}", self.name);
        Ok(cell)
    }

    /// Deletes an instance that is deletable and not running, unlinking all
    /// of its connections.
    pub fn delete_fb(&self, instance: &str) -> Result<(), RuntimeError> {
        let cell = self.instance(instance)?;
        if !cell.lock().is_currently_deletable() {
            warn!("{}: refusing to delete {instance}", self.name);
            return Err(RuntimeError::NotDeletable(SmolStr::new(instance)));
        }
        self.fbs.write().shift_remove(instance);

        let outgoing: Vec<_> = {
            let mut fb = cell.lock();
            fb.detach_all(&cell);
            (0..fb.spec().num_dos())
                .filter_map(|port| fb.do_connection(port as PortId).cloned())
                .collect()
        };
        for connection in outgoing {
            for point in connection.destinations() {
                if let Some(target) = point.fb.upgrade() {
                    let _ = target.lock().connect_di(point.port, None);
                }
            }
        }
        for other in self.instances() {
            let mut fb = other.lock();
            for port in 0..fb.spec().num_eos() {
                if let Some(connection) = fb.eo_connection_mut(port as PortId) {
                    connection.remove_instance(&cell);
                }
            }
            for port in 0..fb.spec().num_adapters() {
                let linked = fb
                    .adapter(port as PortId)
                    .and_then(|slot| slot.peer())
                    .is_some_and(|peer| std::ptr::eq(peer.fb.as_ptr(), Arc::as_ptr(&cell)));
                if linked {
                    fb.set_adapter_peer(port as PortId, None);
                }
            }
        }
        debug!("{}: deleted {instance}", self.name);
        Ok(())
    }

    #[must_use]
    pub fn fb(&self, instance: &str) -> Option<Arc<FbCell>> {
        self.fbs.read().get(instance).cloned()
    }

    /// Instances in creation order.
    #[must_use]
    pub fn instances(&self) -> Vec<Arc<FbCell>> {
        self.fbs.read().values().cloned().collect()
    }

    fn instance(&self, instance: &str) -> Result<Arc<FbCell>, RuntimeError> {
        self.fb(instance)
            .ok_or_else(|| RuntimeError::UnknownInstance(SmolStr::new(instance)))
    }

    /// Resolves `INSTANCE.PORT`.
    pub fn resolve(&self, address: &str) -> Result<(Arc<FbCell>, PortRef), RuntimeError> {
        let (instance, port) = address
            .split_once('.')
            .ok_or_else(|| RuntimeError::UnknownPort(SmolStr::new(address)))?;
        let cell = self.instance(instance)?;
        let fb = cell.lock();
        let candidates: [(PortId, fn(PortId) -> PortRef); 5] = [
            (fb.get_eiid(port), PortRef::EventInput),
            (fb.get_eoid(port), PortRef::EventOutput),
            (fb.get_diid(port), PortRef::DataInput),
            (fb.get_doid(port), PortRef::DataOutput),
            (fb.get_adapter_port_id(port), PortRef::Adapter),
        ];
        let port_ref = candidates
            .into_iter()
            .find(|(id, _)| *id != INVALID_PORT_ID)
            .map(|(id, make)| make(id))
            .ok_or_else(|| RuntimeError::UnknownPort(SmolStr::new(address)))?;
        drop(fb);
        Ok((cell, port_ref))
    }

    /// Connects an event output, data output or plug adapter to an event
    /// input, data input or socket adapter.
    pub fn connect(&self, source: &str, destination: &str) -> Result<(), RuntimeError> {
        let (src, src_port) = self.resolve(source)?;
        let (dst, dst_port) = self.resolve(destination)?;
        match (src_port, dst_port) {
            (PortRef::EventOutput(eo), PortRef::EventInput(ei)) => {
                if let Some(connection) = src.lock().eo_connection_mut(eo) {
                    connection.add_destination(&dst, EventId::from(ei));
                }
                debug!("{}: connected {source} -> {destination}", self.name);
                Ok(())
            }
            (PortRef::DataOutput(out), PortRef::DataInput(input)) => {
                self.connect_data(&src, out, &dst, input, destination)?;
                debug!("{}: connected {source} -> {destination}", self.name);
                Ok(())
            }
            (PortRef::Adapter(plug), PortRef::Adapter(socket)) => {
                self.connect_adapters(&src, plug, &dst, socket, source)?;
                debug!("{}: linked {source} -> {destination}", self.name);
                Ok(())
            }
            _ => {
                warn!("{}: cannot connect {source} to {destination}", self.name);
                Err(RuntimeError::UnknownPort(SmolStr::new(destination)))
            }
        }
    }

    fn connect_data(
        &self,
        src: &Arc<FbCell>,
        out: PortId,
        dst: &Arc<FbCell>,
        input: PortId,
        destination: &str,
    ) -> Result<(), RuntimeError> {
        let Some(connection) = src.lock().do_connection(out).cloned() else {
            return Err(RuntimeError::UnknownPort(SmolStr::new(destination)));
        };
        let (target_value, target_open, target_type, held) = {
            let fb = dst.lock();
            let Some(slot) = fb.di_slot(input) else {
                return Err(RuntimeError::UnknownPort(SmolStr::new(destination)));
            };
            let held = fb.di_connection(input).cloned();
            (
                slot.value().clone(),
                slot.is_type_open(),
                slot.configured_type().unwrap_or(slot.declared_type()),
                held,
            )
        };
        if held.is_some_and(|held| !Arc::ptr_eq(&held, &connection)) {
            warn!("{}: {destination} is already connected", self.name);
            return Err(RuntimeError::AlreadyConnected(SmolStr::new(destination)));
        }

        if connection.is_type_open() && !target_open {
            if !src.lock().configure_generic_do(out, &target_value) {
                return Err(self.mismatch(connection.type_id(), target_type));
            }
        } else if !connection.is_type_open()
            && !target_open
            && !self.library.is_assignable(target_type, connection.type_id())
        {
            warn!(
                "{}: cannot connect {} to {destination}",
                self.name,
                self.library.type_name(connection.type_id())
            );
            return Err(self.mismatch(connection.type_id(), target_type));
        }

        dst.lock().connect_di(input, Some(Arc::clone(&connection)))?;
        connection.add_destination(ConnectionPoint::new(dst, input));
        Ok(())
    }

    fn mismatch(&self, source: TypeId, target: TypeId) -> RuntimeError {
        RuntimeError::TypeMismatch {
            source_type: self.library.type_name(source),
            target_type: self.library.type_name(target),
        }
    }

    fn connect_adapters(
        &self,
        src: &Arc<FbCell>,
        plug: PortId,
        dst: &Arc<FbCell>,
        socket: PortId,
        source: &str,
    ) -> Result<(), RuntimeError> {
        let plug_decl = src.lock().adapter(plug).map(|slot| *slot.decl());
        let socket_decl = dst.lock().adapter(socket).map(|slot| *slot.decl());
        let (Some(plug_decl), Some(socket_decl)) = (plug_decl, socket_decl) else {
            return Err(RuntimeError::UnknownPort(SmolStr::new(source)));
        };
        if !plug_decl.is_plug || socket_decl.is_plug {
            return Err(RuntimeError::UnknownPort(SmolStr::new(source)));
        }
        if plug_decl.type_name != socket_decl.type_name {
            let dictionary = self.library.dictionary();
            return Err(RuntimeError::TypeMismatch {
                source_type: dictionary.name(plug_decl.type_name),
                target_type: dictionary.name(socket_decl.type_name),
            });
        }
        let linked = src.lock().set_adapter_peer(
            plug,
            Some(AdapterPeer {
                fb: Arc::downgrade(dst),
                adapter: socket,
            }),
        );
        if !linked {
            return Err(RuntimeError::AlreadyConnected(SmolStr::new(source)));
        }
        let linked = dst.lock().set_adapter_peer(
            socket,
            Some(AdapterPeer {
                fb: Arc::downgrade(src),
                adapter: plug,
            }),
        );
        if !linked {
            src.lock().set_adapter_peer(plug, None);
            return Err(RuntimeError::AlreadyConnected(SmolStr::new(source)));
        }
        Ok(())
    }

    /// Removes a connection made by [`connect`](Self::connect).
    pub fn disconnect(&self, source: &str, destination: &str) -> Result<(), RuntimeError> {
        let (src, src_port) = self.resolve(source)?;
        let (dst, dst_port) = self.resolve(destination)?;
        let removed = match (src_port, dst_port) {
            (PortRef::EventOutput(eo), PortRef::EventInput(ei)) => src
                .lock()
                .eo_connection_mut(eo)
                .is_some_and(|connection| connection.remove_destination(&dst, EventId::from(ei))),
            (PortRef::DataOutput(out), PortRef::DataInput(input)) => {
                let connection = src.lock().do_connection(out).cloned();
                match connection {
                    Some(connection) if connection.remove_destination(&dst, input) => {
                        dst.lock().connect_di(input, None)?;
                        true
                    }
                    _ => false,
                }
            }
            (PortRef::Adapter(plug), PortRef::Adapter(socket)) => {
                let linked = src
                    .lock()
                    .adapter(plug)
                    .and_then(|slot| slot.peer())
                    .is_some_and(|peer| {
                        peer.adapter == socket && std::ptr::eq(peer.fb.as_ptr(), Arc::as_ptr(&dst))
                    });
                if linked {
                    src.lock().set_adapter_peer(plug, None);
                    dst.lock().set_adapter_peer(socket, None);
                }
                linked
            }
            _ => false,
        };
        if removed {
            debug!("{}: disconnected {source} -> {destination}", self.name);
            Ok(())
        } else {
            Err(RuntimeError::NotConnected(SmolStr::new(format!(
                "{source} -> {destination}"
            ))))
        }
    }

    /// Applies a management command to one instance.
    #[must_use]
    pub fn change_execution_state(&self, instance: &str, command: MgmCommand) -> MgmResponse {
        match self.fb(instance) {
            Some(cell) => cell.lock().change_execution_state(command),
            None => MgmResponse::NoSuchObject,
        }
    }

    /// Applies a management command given by name (`START`, `STOP`, `KILL`,
    /// `RESET`).
    #[must_use]
    pub fn execute_command(&self, instance: &str, command: &str) -> MgmResponse {
        match command.parse::<MgmCommand>() {
            Ok(command) => self.change_execution_state(instance, command),
            Err(_) => MgmResponse::UnsupportedCommand,
        }
    }

    /// Starts every instance that can be started.
    pub fn start(&self) {
        for cell in self.instances() {
            let _ = cell.lock().change_execution_state(MgmCommand::Start);
        }
    }

    /// Stops every running instance.
    pub fn stop(&self) {
        for cell in self.instances() {
            let _ = cell.lock().change_execution_state(MgmCommand::Stop);
        }
    }

    /// Queues an input event addressed as `INSTANCE.EVENT`.
    pub fn send_event(&self, address: &str) -> Result<(), RuntimeError> {
        match self.resolve(address)? {
            (fb, PortRef::EventInput(ei)) => {
                self.chain.add_entry(EventEntry {
                    fb,
                    event: EventId::from(ei),
                });
                Ok(())
            }
            _ => Err(RuntimeError::UnknownPort(SmolStr::new(address))),
        }
    }

    /// Delivers queued events until none remain.
    pub fn run(&self) -> usize {
        self.chain.process_all()
    }

    /// Sets a data input (value and initial value) from a literal.
    pub fn write_parameter(&self, address: &str, literal: &str) -> Result<(), RuntimeError> {
        match self.resolve(address)? {
            (fb, PortRef::DataInput(port)) => fb.lock().set_di_literal(port, literal),
            _ => Err(RuntimeError::UnknownPort(SmolStr::new(address))),
        }
    }

    /// Current value of a data input or output.
    pub fn read(&self, address: &str) -> Result<AnyValue, RuntimeError> {
        let (fb, port) = self.resolve(address)?;
        let fb = fb.lock();
        let value = match port {
            PortRef::DataInput(port) => fb.di(port),
            PortRef::DataOutput(port) => fb.do_(port),
            _ => None,
        };
        value
            .cloned()
            .ok_or_else(|| RuntimeError::UnknownPort(SmolStr::new(address)))
    }

    /// Forces a data input or output to a literal.
    pub fn force(&self, address: &str, literal: &str) -> Result<(), RuntimeError> {
        let (fb, port) = self.resolve(address)?;
        let mut fb = fb.lock();
        let mut value = match port {
            PortRef::DataInput(port) => fb.di(port).cloned(),
            PortRef::DataOutput(port) => fb.do_(port).cloned(),
            _ => None,
        }
        .ok_or_else(|| RuntimeError::UnknownPort(SmolStr::new(address)))?;
        value.from_string(literal)?;
        let forced = match port {
            PortRef::DataInput(port) => fb.force_data_input(port, &value),
            PortRef::DataOutput(port) => fb.force_data_output(port, &value),
            _ => false,
        };
        if forced {
            Ok(())
        } else {
            Err(RuntimeError::UnknownPort(SmolStr::new(address)))
        }
    }

    /// Releases a forced data input or output.
    pub fn release(&self, address: &str) -> Result<(), RuntimeError> {
        let (fb, port) = self.resolve(address)?;
        let mut fb = fb.lock();
        let released = match port {
            PortRef::DataInput(port) => fb.release_data_input(port),
            PortRef::DataOutput(port) => fb.release_data_output(port),
            _ => false,
        };
        if released {
            Ok(())
        } else {
            Err(RuntimeError::UnknownPort(SmolStr::new(address)))
        }
    }
}
