//! Struct multiplexers with interfaces synthesized from a struct type.
//!
//! The requested type name selects the struct: `STRUCT_MUX_1POINT` builds a
//! multiplexer for `POINT`. Ports follow the struct's member order.

use std::borrow::Cow;

use fbrt_types::{names, StringId};
use smol_str::SmolStr;
use tracing::debug;

use crate::error::RuntimeError;
use crate::fb::{FbBody, FbContext};
use crate::interface::{EventId, InterfaceSpec, PortId, WITH_END};
use crate::typelib::{GenericFbType, TypeLibrary};
use crate::value::{AnyValue, StructValue};

/// Struct type named by a generic configuration: the text after the second
/// `_` and the single separating digit that follows it.
#[must_use]
pub fn struct_type_name(config: &str) -> Option<&str> {
    let (_, rest) = config.split_once('_')?;
    let (_, rest) = rest.split_once('_')?;
    let mut chars = rest.chars();
    chars.next()?;
    let name = chars.as_str();
    (!name.is_empty()).then_some(name)
}

/// Resolves the configured struct to its interned name and a prototype.
fn resolve_struct(
    kind: &str,
    config: &str,
    library: &TypeLibrary,
) -> Result<(StringId, StructValue), RuntimeError> {
    let name = struct_type_name(config)
        .ok_or_else(|| RuntimeError::InvalidGenericConfig(SmolStr::new(config)))?;
    let id = library.dictionary().get_id(name);
    let Some(prototype) = library.create_data_type_instance(id) else {
        debug!("{kind}: couldn't create struct of type {name}");
        return Err(RuntimeError::UnknownType(SmolStr::new(name)));
    };
    match prototype {
        AnyValue::Struct(value) => Ok((id, *value)),
        _ => {
            debug!("{kind}: data type is not a struct: {name}");
            Err(RuntimeError::NotAStruct(SmolStr::new(name)))
        }
    }
}

/// Interned member names and member type names, in declaration order.
fn member_tables(value: &StructValue, library: &TypeLibrary) -> (Vec<StringId>, Vec<StringId>) {
    let dictionary = library.dictionary();
    value
        .fields
        .iter()
        .map(|(name, member)| (dictionary.insert(name), dictionary.insert(&member.type_name())))
        .unzip()
}

fn port_list(count: usize) -> Vec<PortId> {
    (0..count)
        .filter_map(|port| PortId::try_from(port).ok())
        .chain(std::iter::once(WITH_END))
        .collect()
}

/// `GEN_STRUCT_MUX`: one data input per struct member, `OUT` of the struct
/// type.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructMux;

impl GenericFbType for StructMux {
    fn create_interface_spec(
        &self,
        config: &str,
        library: &TypeLibrary,
    ) -> Result<InterfaceSpec, RuntimeError> {
        let (struct_id, prototype) = resolve_struct("GEN_STRUCT_MUX", config, library)?;
        let (di_names, di_type_names) = member_tables(&prototype, library);
        Ok(InterfaceSpec {
            ei_names: Cow::Borrowed(&[names::REQ]),
            ei_with: Cow::Owned(port_list(di_names.len())),
            ei_with_indexes: Cow::Borrowed(&[0]),
            eo_names: Cow::Borrowed(&[names::CNF]),
            eo_with: Cow::Borrowed(&[0, WITH_END]),
            eo_with_indexes: Cow::Borrowed(&[0]),
            di_names: Cow::Owned(di_names),
            di_type_names: Cow::Owned(di_type_names),
            do_names: Cow::Borrowed(&[names::OUT]),
            do_type_names: Cow::Owned(vec![struct_id]),
            adapters: Cow::Borrowed(&[]),
        })
    }

    fn create_body(&self, _spec: &InterfaceSpec) -> Box<dyn FbBody> {
        Box::new(StructMuxBody)
    }
}

#[derive(Debug)]
struct StructMuxBody;

impl FbBody for StructMuxBody {
    fn execute_event(&mut self, event: EventId, ctx: &mut FbContext<'_>) {
        if event != 0 {
            return;
        }
        let inputs: Vec<AnyValue> = (0..ctx.core().spec().num_dis())
            .filter_map(|port| PortId::try_from(port).ok())
            .map(|port| ctx.di(port).clone())
            .collect();
        if let Some(out) = ctx.do_mut(0).as_struct_mut() {
            for (index, input) in inputs.iter().enumerate() {
                if let Some((_, member)) = out.member_at_mut(index) {
                    member.set_value(input);
                }
            }
        }
        ctx.send_output_event(0);
    }
}

/// `GEN_STRUCT_DEMUX`: `IN` of the struct type, one data output per member.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructDemux;

impl GenericFbType for StructDemux {
    fn create_interface_spec(
        &self,
        config: &str,
        library: &TypeLibrary,
    ) -> Result<InterfaceSpec, RuntimeError> {
        let (struct_id, prototype) = resolve_struct("GEN_STRUCT_DEMUX", config, library)?;
        let (do_names, do_type_names) = member_tables(&prototype, library);
        Ok(InterfaceSpec {
            ei_names: Cow::Borrowed(&[names::REQ]),
            ei_with: Cow::Borrowed(&[0, WITH_END]),
            ei_with_indexes: Cow::Borrowed(&[0]),
            eo_names: Cow::Borrowed(&[names::CNF]),
            eo_with: Cow::Owned(port_list(do_names.len())),
            eo_with_indexes: Cow::Borrowed(&[0]),
            di_names: Cow::Borrowed(&[names::IN]),
            di_type_names: Cow::Owned(vec![struct_id]),
            do_names: Cow::Owned(do_names),
            do_type_names: Cow::Owned(do_type_names),
            adapters: Cow::Borrowed(&[]),
        })
    }

    fn create_body(&self, _spec: &InterfaceSpec) -> Box<dyn FbBody> {
        Box::new(StructDemuxBody)
    }
}

#[derive(Debug)]
struct StructDemuxBody;

impl FbBody for StructDemuxBody {
    fn execute_event(&mut self, event: EventId, ctx: &mut FbContext<'_>) {
        if event != 0 {
            return;
        }
        let Some(input) = ctx.di(0).as_struct().cloned() else {
            return;
        };
        for (index, member) in input.fields.values().enumerate() {
            if let Ok(port) = PortId::try_from(index) {
                ctx.do_mut(port).set_value(member);
            }
        }
        ctx.send_output_event(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn struct_name_follows_the_numbered_separator() {
        assert_eq!(struct_type_name("STRUCT_MUX_1POINT"), Some("POINT"));
        assert_eq!(struct_type_name("STRUCT_DEMUX_2MY_POINT"), Some("MY_POINT"));
        assert_eq!(struct_type_name("STRUCT_MUX"), None);
        assert_eq!(struct_type_name("STRUCT_MUX_1"), None);
    }
}
