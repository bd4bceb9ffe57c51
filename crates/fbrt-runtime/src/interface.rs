//! Function block interface tables and port addressing.
//!
//! An [`InterfaceSpec`] lists a function block type's ports in order. Ports
//! are addressed by their position ([`PortId`]) within one direction. Each
//! event has a WITH list: the data ports read (event inputs) or written (event
//! outputs) together with that event. All WITH lists of one direction live in
//! one flat array, each terminated by [`WITH_END`]; a parallel index table
//! gives, per event, where its list starts (`-1` for none). The event output
//! index table may carry one extra trailing slot for outputs that are written
//! on every output event.

#![allow(missing_docs)]

use std::borrow::Cow;
use std::fmt::Write as _;
use std::ops::Deref;
use std::sync::Arc;

use fbrt_types::{StringDictionary, StringId};
use smol_str::SmolStr;

use crate::error::RuntimeError;

/// Position of a port within one direction.
pub type PortId = u8;

/// Port lookup miss.
pub const INVALID_PORT_ID: PortId = PortId::MAX;

/// Terminator of a WITH list.
pub const WITH_END: PortId = INVALID_PORT_ID;

/// Event id. Ids below 256 address interface events; larger ids are relayed
/// adapter events (see [`adapter_event_id`]).
pub type EventId = u16;

/// Interface events per direction are limited to ids below this value.
pub const MAX_INTERFACE_EVENTS: EventId = 255;

/// Encodes event `event` of adapter `adapter` for delivery to the adapter's
/// owner: the high byte holds the adapter index plus one.
#[must_use]
pub fn adapter_event_id(adapter: PortId, event: EventId) -> EventId {
    ((EventId::from(adapter) + 1) << 8) | (event & 0xFF)
}

/// Splits an adapter-relayed event id into adapter index and event.
#[must_use]
pub fn split_adapter_event(id: EventId) -> Option<(PortId, EventId)> {
    let high = id >> 8;
    if high == 0 {
        return None;
    }
    Some(((high - 1) as PortId, id & 0xFF))
}

/// Adapter instance declared by an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterDecl {
    pub type_name: StringId,
    pub instance_name: StringId,
    /// Plugs initiate the connection; sockets accept it.
    pub is_plug: bool,
}

/// Port tables of a function block type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceSpec {
    pub ei_names: Cow<'static, [StringId]>,
    pub ei_with: Cow<'static, [PortId]>,
    pub ei_with_indexes: Cow<'static, [i16]>,
    pub eo_names: Cow<'static, [StringId]>,
    pub eo_with: Cow<'static, [PortId]>,
    pub eo_with_indexes: Cow<'static, [i16]>,
    pub di_names: Cow<'static, [StringId]>,
    pub di_type_names: Cow<'static, [StringId]>,
    pub do_names: Cow<'static, [StringId]>,
    pub do_type_names: Cow<'static, [StringId]>,
    pub adapters: Cow<'static, [AdapterDecl]>,
}

impl InterfaceSpec {
    /// Interface without any ports.
    pub const EMPTY: Self = Self {
        ei_names: Cow::Borrowed(&[]),
        ei_with: Cow::Borrowed(&[]),
        ei_with_indexes: Cow::Borrowed(&[]),
        eo_names: Cow::Borrowed(&[]),
        eo_with: Cow::Borrowed(&[]),
        eo_with_indexes: Cow::Borrowed(&[]),
        di_names: Cow::Borrowed(&[]),
        di_type_names: Cow::Borrowed(&[]),
        do_names: Cow::Borrowed(&[]),
        do_type_names: Cow::Borrowed(&[]),
        adapters: Cow::Borrowed(&[]),
    };

    #[must_use]
    pub fn num_eis(&self) -> usize {
        self.ei_names.len()
    }

    #[must_use]
    pub fn num_eos(&self) -> usize {
        self.eo_names.len()
    }

    #[must_use]
    pub fn num_dis(&self) -> usize {
        self.di_names.len()
    }

    #[must_use]
    pub fn num_dos(&self) -> usize {
        self.do_names.len()
    }

    #[must_use]
    pub fn num_adapters(&self) -> usize {
        self.adapters.len()
    }

    /// Data inputs read when event input `event` arrives.
    #[must_use]
    pub fn ei_with(&self, event: EventId) -> &[PortId] {
        with_list(&self.ei_with, &self.ei_with_indexes, usize::from(event))
    }

    /// Data outputs written when event output `event` fires.
    #[must_use]
    pub fn eo_with(&self, event: EventId) -> &[PortId] {
        with_list(&self.eo_with, &self.eo_with_indexes, usize::from(event))
    }

    /// Data outputs written on every output event, if the interface declares
    /// the trailing slot.
    #[must_use]
    pub fn eo_unassociated(&self) -> &[PortId] {
        with_list(&self.eo_with, &self.eo_with_indexes, self.num_eos())
    }

    #[must_use]
    pub fn ei_id(&self, name: StringId) -> PortId {
        get_port_id(name, &self.ei_names)
    }

    #[must_use]
    pub fn eo_id(&self, name: StringId) -> PortId {
        get_port_id(name, &self.eo_names)
    }

    #[must_use]
    pub fn di_id(&self, name: StringId) -> PortId {
        get_port_id(name, &self.di_names)
    }

    #[must_use]
    pub fn do_id(&self, name: StringId) -> PortId {
        get_port_id(name, &self.do_names)
    }

    #[must_use]
    pub fn adapter_id(&self, name: StringId) -> PortId {
        self.adapters
            .iter()
            .position(|adapter| adapter.instance_name == name)
            .and_then(|idx| PortId::try_from(idx).ok())
            .unwrap_or(INVALID_PORT_ID)
    }

    /// Checks the structural invariants of the tables.
    pub fn validate(&self) -> Result<(), RuntimeError> {
        for (label, count) in [
            ("event inputs", self.num_eis()),
            ("event outputs", self.num_eos()),
            ("data inputs", self.num_dis()),
            ("data outputs", self.num_dos()),
            ("adapters", self.num_adapters()),
        ] {
            if count >= usize::from(INVALID_PORT_ID) {
                return Err(invalid(format!("too many {label} ({count})")));
            }
        }
        if self.di_type_names.len() != self.num_dis() {
            return Err(invalid("data input names and types differ in length"));
        }
        if self.do_type_names.len() != self.num_dos() {
            return Err(invalid("data output names and types differ in length"));
        }
        check_with_table(
            "event input",
            &self.ei_with,
            &self.ei_with_indexes,
            &[self.num_eis()],
            self.num_dis(),
        )?;
        check_with_table(
            "event output",
            &self.eo_with,
            &self.eo_with_indexes,
            &[self.num_eos(), self.num_eos() + 1],
            self.num_dos(),
        )
    }

    /// Human readable port listing.
    #[must_use]
    pub fn describe(&self, dictionary: &StringDictionary) -> String {
        let name = |id: StringId| dictionary.name(id);
        let port_list = |ports: &[PortId], names: &[StringId]| -> String {
            ports
                .iter()
                .map(|port| {
                    names
                        .get(usize::from(*port))
                        .map_or_else(|| SmolStr::new_inline("?"), |id| name(*id))
                })
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut out = String::new();
        if self.num_eis() > 0 {
            out.push_str("EVENT_INPUT\n");
            for (event, ei) in self.ei_names.iter().enumerate() {
                let _ = write!(out, "  {}", name(*ei));
                let with = self.ei_with(event as EventId);
                if !with.is_empty() {
                    let _ = write!(out, " WITH {}", port_list(with, &self.di_names));
                }
                out.push('\n');
            }
        }
        if self.num_eos() > 0 {
            out.push_str("EVENT_OUTPUT\n");
            for (event, eo) in self.eo_names.iter().enumerate() {
                let _ = write!(out, "  {}", name(*eo));
                let with = self.eo_with(event as EventId);
                if !with.is_empty() {
                    let _ = write!(out, " WITH {}", port_list(with, &self.do_names));
                }
                out.push('\n');
            }
        }
        for (header, names, types) in [
            ("VAR_INPUT", &self.di_names, &self.di_type_names),
            ("VAR_OUTPUT", &self.do_names, &self.do_type_names),
        ] {
            if names.is_empty() {
                continue;
            }
            out.push_str(header);
            out.push('\n');
            for (port, ty) in names.iter().zip(types.iter()) {
                let _ = writeln!(out, "  {} : {}", name(*port), name(*ty));
            }
        }
        for adapter in self.adapters.iter() {
            let _ = writeln!(
                out,
                "{} {} : {}",
                if adapter.is_plug { "PLUG" } else { "SOCKET" },
                name(adapter.instance_name),
                name(adapter.type_name)
            );
        }
        out
    }
}

/// Linear scan of an interned name list.
#[must_use]
pub fn get_port_id(name: StringId, names: &[StringId]) -> PortId {
    names
        .iter()
        .position(|candidate| *candidate == name)
        .and_then(|idx| PortId::try_from(idx).ok())
        .filter(|id| *id != INVALID_PORT_ID)
        .unwrap_or(INVALID_PORT_ID)
}

fn with_list<'a>(with: &'a [PortId], indexes: &[i16], slot: usize) -> &'a [PortId] {
    let Some(start) = indexes.get(slot).and_then(|idx| usize::try_from(*idx).ok()) else {
        return &[];
    };
    let Some(tail) = with.get(start..) else {
        return &[];
    };
    let end = tail
        .iter()
        .position(|port| *port == WITH_END)
        .unwrap_or(tail.len());
    &tail[..end]
}

fn check_with_table(
    label: &str,
    with: &[PortId],
    indexes: &[i16],
    allowed_lengths: &[usize],
    num_ports: usize,
) -> Result<(), RuntimeError> {
    if indexes.is_empty() && with.is_empty() {
        return Ok(());
    }
    if !allowed_lengths.contains(&indexes.len()) {
        return Err(invalid(format!(
            "{label} WITH index table has {} entries",
            indexes.len()
        )));
    }
    for (event, index) in indexes.iter().enumerate() {
        if *index < 0 {
            continue;
        }
        let start = *index as usize;
        let Some(tail) = with.get(start..).filter(|tail| !tail.is_empty()) else {
            return Err(invalid(format!(
                "{label} {event} WITH list starts outside the table"
            )));
        };
        let Some(end) = tail.iter().position(|port| *port == WITH_END) else {
            return Err(invalid(format!("{label} {event} WITH list is not terminated")));
        };
        if let Some(port) = tail[..end].iter().find(|port| usize::from(**port) >= num_ports) {
            return Err(invalid(format!(
                "{label} {event} WITH list names missing port {port}"
            )));
        }
    }
    Ok(())
}

fn invalid(message: impl Into<SmolStr>) -> RuntimeError {
    RuntimeError::InvalidConfig(message.into())
}

/// Reference to an interface: a `'static` table shared by every instance of a
/// compiled type, or a synthesized table shared by instances of one generic
/// configuration.
#[derive(Debug, Clone)]
pub enum SpecHandle {
    Static(&'static InterfaceSpec),
    Shared(Arc<InterfaceSpec>),
}

impl SpecHandle {
    /// Returns true if both handles refer to the same table.
    #[must_use]
    pub fn ptr_eq(&self, other: &SpecHandle) -> bool {
        std::ptr::eq(&**self, &**other)
    }
}

impl Deref for SpecHandle {
    type Target = InterfaceSpec;

    fn deref(&self) -> &InterfaceSpec {
        match self {
            Self::Static(spec) => spec,
            Self::Shared(spec) => spec,
        }
    }
}

impl From<&'static InterfaceSpec> for SpecHandle {
    fn from(value: &'static InterfaceSpec) -> Self {
        Self::Static(value)
    }
}

impl From<Arc<InterfaceSpec>> for SpecHandle {
    fn from(value: Arc<InterfaceSpec>) -> Self {
        Self::Shared(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbrt_types::names;

    fn two_event_spec() -> InterfaceSpec {
        InterfaceSpec {
            ei_names: Cow::Borrowed(&[names::REQ, names::INIT]),
            ei_with: Cow::Borrowed(&[0, 1, WITH_END, 1, WITH_END]),
            ei_with_indexes: Cow::Borrowed(&[0, 3]),
            eo_names: Cow::Borrowed(&[names::CNF]),
            eo_with: Cow::Borrowed(&[0, WITH_END, 1, WITH_END]),
            eo_with_indexes: Cow::Borrowed(&[0, 2]),
            di_names: Cow::Borrowed(&[names::IN1, names::IN2]),
            di_type_names: Cow::Borrowed(&[names::INT, names::INT]),
            do_names: Cow::Borrowed(&[names::OUT, names::Q]),
            do_type_names: Cow::Borrowed(&[names::INT, names::BOOL]),
            ..InterfaceSpec::EMPTY
        }
    }

    #[test]
    fn with_lists_stop_at_terminator() {
        let spec = two_event_spec();
        assert_eq!(spec.ei_with(0), &[0, 1]);
        assert_eq!(spec.ei_with(1), &[1]);
        assert_eq!(spec.ei_with(7), &[] as &[PortId]);
        assert_eq!(spec.eo_with(0), &[0]);
        assert_eq!(spec.eo_unassociated(), &[1]);
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn unterminated_lists_fail_validation() {
        let mut spec = two_event_spec();
        spec.ei_with = Cow::Owned(vec![0, 1, WITH_END, 1]);
        assert!(spec.validate().is_err());
    }

    #[test]
    fn adapter_ids_round_trip() {
        let id = adapter_event_id(2, 5);
        assert_eq!(id, 0x0305);
        assert_eq!(split_adapter_event(id), Some((2, 5)));
        assert_eq!(split_adapter_event(4), None);
    }

    #[test]
    fn port_lookup_misses_return_sentinel() {
        let spec = two_event_spec();
        assert_eq!(spec.di_id(names::IN2), 1);
        assert_eq!(spec.di_id(names::PV), INVALID_PORT_ID);
    }
}
