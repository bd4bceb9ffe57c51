mod common;

use std::borrow::Cow;

use expect_test::expect;
use fbrt_runtime::interface::{get_port_id, InterfaceSpec, INVALID_PORT_ID, WITH_END};
use fbrt_runtime::RuntimeError;
use fbrt_types::names;

#[test]
fn describe_lists_ports_with_their_associations() {
    let library = common::library();
    let spec = library.interface_of("FB_CTD_UDINT").expect("counter");
    expect![[r#"
        EVENT_INPUT
          REQ WITH CD, PV, LD
        EVENT_OUTPUT
          CNF WITH Q, CV
        VAR_INPUT
          CD : BOOL
          LD : BOOL
          PV : UDINT
        VAR_OUTPUT
          Q : BOOL
          CV : UDINT
    "#]]
    .assert_eq(&spec.describe(library.dictionary()));
}

#[test]
fn describe_includes_adapters() {
    let library = common::library();
    let spec = library.interface_of("PROBE").expect("probe");
    expect![[r#"
        EVENT_INPUT
          REQ WITH IN1
          INIT
        EVENT_OUTPUT
          CNF WITH OUT
          INITO
        VAR_INPUT
          IN1 : INT
          IN : ANY
        VAR_OUTPUT
          OUT : DINT
          Q : BOOL
        PLUG PLG : ADP
        SOCKET SKT : ADP
    "#]]
    .assert_eq(&spec.describe(library.dictionary()));
}

#[test]
fn port_names_resolve_by_linear_scan() {
    let library = common::library();
    let spec = library.interface_of("F_ADD").expect("add");
    assert_eq!(spec.di_id(names::IN2), 1);
    assert_eq!(spec.do_id(names::OUT), 0);
    assert_eq!(spec.ei_id(names::CNF), INVALID_PORT_ID);
    assert_eq!(get_port_id(names::Q, &[names::OUT, names::Q]), 1);
    assert_eq!(get_port_id(names::Q, &[]), INVALID_PORT_ID);
}

#[test]
fn trailing_slot_lists_outputs_written_on_every_event() {
    let library = common::library();
    let spec = library.interface_of("PROBE").expect("probe");
    assert_eq!(spec.eo_with(0), &[0]);
    assert!(spec.eo_with(1).is_empty());
    assert_eq!(spec.eo_unassociated(), &[1]);
    assert!(spec.ei_with(1).is_empty());
}

#[test]
fn validation_rejects_inconsistent_tables() {
    let spec = InterfaceSpec {
        ei_names: Cow::Borrowed(&[names::REQ]),
        ei_with: Cow::Borrowed(&[3, WITH_END]),
        ei_with_indexes: Cow::Borrowed(&[0]),
        di_names: Cow::Borrowed(&[names::IN]),
        di_type_names: Cow::Borrowed(&[names::INT]),
        ..InterfaceSpec::EMPTY
    };
    assert!(matches!(spec.validate(), Err(RuntimeError::InvalidConfig(_))));

    let spec = InterfaceSpec {
        di_names: Cow::Borrowed(&[names::IN, names::IN1]),
        di_type_names: Cow::Borrowed(&[names::INT]),
        ..InterfaceSpec::EMPTY
    };
    assert!(spec.validate().is_err());

    let spec = InterfaceSpec {
        eo_names: Cow::Borrowed(&[names::CNF]),
        eo_with: Cow::Borrowed(&[0, WITH_END]),
        eo_with_indexes: Cow::Borrowed(&[0, 0, 0]),
        do_names: Cow::Borrowed(&[names::OUT]),
        do_type_names: Cow::Borrowed(&[names::INT]),
        ..InterfaceSpec::EMPTY
    };
    assert!(spec.validate().is_err());
    assert!(InterfaceSpec::EMPTY.validate().is_ok());
}
