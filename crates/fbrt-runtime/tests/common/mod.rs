#![allow(dead_code)]

use std::borrow::Cow;
use std::sync::Arc;

use fbrt_runtime::fb::FbContext;
use fbrt_runtime::interface::{split_adapter_event, AdapterDecl, EventId, InterfaceSpec, WITH_END};
use fbrt_runtime::{AnyValue, FbBody, Resource, TypeLibrary};
use fbrt_types::{names, StringDictionary, StructField, TypeId};

/// Standard library plus a `POINT` struct (`X : INT`, `Y : INT`), a
/// `NAMES` array of three strings and the `PROBE` test block.
pub fn library() -> Arc<TypeLibrary> {
    let library = TypeLibrary::standard(StringDictionary::shared());
    library.register_struct(
        "POINT",
        vec![
            StructField::new("X", TypeId::INT),
            StructField::new("Y", TypeId::INT),
        ],
    );
    library.register_array("NAMES", TypeId::STRING, 1, 3);
    register_probe(&library);
    Arc::new(library)
}

pub fn resource() -> Resource {
    Resource::new("RES", library())
}

/// Creates and starts `instance`.
pub fn started(resource: &Resource, instance: &str, type_name: &str) {
    resource
        .create_fb(instance, type_name)
        .unwrap_or_else(|err| panic!("create {instance}: {err}"));
    assert!(resource.execute_command(instance, "START").is_ready());
}

/// Queues `address` and runs the chain to completion.
pub fn fire(resource: &Resource, address: &str) -> usize {
    resource
        .send_event(address)
        .unwrap_or_else(|err| panic!("send {address}: {err}"));
    resource.run()
}

pub fn read(resource: &Resource, address: &str) -> AnyValue {
    resource
        .read(address)
        .unwrap_or_else(|err| panic!("read {address}: {err}"))
}

pub fn eo_count(resource: &Resource, instance: &str, eo: &str) -> u32 {
    let fb = resource.fb(instance).expect("instance");
    let fb = fb.lock();
    let id = fb.get_eoid(eo);
    fb.eo_count(EventId::from(id))
}

pub fn ei_count(resource: &Resource, instance: &str, ei: &str) -> u32 {
    let fb = resource.fb(instance).expect("instance");
    let fb = fb.lock();
    let id = fb.get_eiid(ei);
    fb.ei_count(EventId::from(id))
}

/// PROBE interface:
///
/// ```text
/// EVENT_INPUT  REQ WITH IN1, INIT
/// EVENT_OUTPUT CNF WITH OUT, INITO
/// VAR_INPUT    IN1 : INT, IN : ANY
/// VAR_OUTPUT   OUT : DINT, Q : BOOL  (Q written on every output event)
/// PLUG PLG : ADP, SOCKET SKT : ADP
/// ```
///
/// `REQ` sets `OUT := 2 * IN1` and `Q := TRUE`, then fires `CNF`. `INIT`
/// relays event 0 through `PLG` and fires `INITO`. An adapter event `e` on
/// adapter `a` sets `OUT := 100 + 10 * a + e` and fires `CNF`.
pub fn probe_spec(dictionary: &StringDictionary) -> InterfaceSpec {
    let adapter_type = dictionary.insert("ADP");
    InterfaceSpec {
        ei_names: Cow::Borrowed(&[names::REQ, names::INIT]),
        ei_with: Cow::Borrowed(&[0, WITH_END]),
        ei_with_indexes: Cow::Borrowed(&[0, -1]),
        eo_names: Cow::Borrowed(&[names::CNF, names::INITO]),
        eo_with: Cow::Borrowed(&[0, WITH_END, 1, WITH_END]),
        eo_with_indexes: Cow::Borrowed(&[0, -1, 2]),
        di_names: Cow::Borrowed(&[names::IN1, names::IN]),
        di_type_names: Cow::Borrowed(&[names::INT, names::ANY]),
        do_names: Cow::Borrowed(&[names::OUT, names::Q]),
        do_type_names: Cow::Borrowed(&[names::DINT, names::BOOL]),
        adapters: Cow::Owned(vec![
            AdapterDecl {
                type_name: adapter_type,
                instance_name: dictionary.insert("PLG"),
                is_plug: true,
            },
            AdapterDecl {
                type_name: adapter_type,
                instance_name: dictionary.insert("SKT"),
                is_plug: false,
            },
        ]),
    }
}

pub fn register_probe(library: &TypeLibrary) {
    let spec: &'static InterfaceSpec = Box::leak(Box::new(probe_spec(library.dictionary())));
    library.register_fb_type("PROBE", spec, || Box::new(Probe));
}

#[derive(Debug)]
pub struct Probe;

impl FbBody for Probe {
    fn execute_event(&mut self, event: EventId, ctx: &mut FbContext<'_>) {
        match event {
            0 => {
                let input = ctx.di(0).as_i128().unwrap_or(0);
                *ctx.do_mut(0) = AnyValue::DInt(i32::try_from(input * 2).unwrap_or(0));
                *ctx.do_mut(1) = AnyValue::Bool(true);
                ctx.send_output_event(0);
            }
            1 => {
                ctx.send_adapter_event(0, 0);
                ctx.send_output_event(1);
            }
            other => {
                if let Some((adapter, e)) = split_adapter_event(other) {
                    let code = 100 + 10 * i32::from(adapter) + i32::from(e);
                    *ctx.do_mut(0) = AnyValue::DInt(code);
                    ctx.send_output_event(0);
                }
            }
        }
    }
}
