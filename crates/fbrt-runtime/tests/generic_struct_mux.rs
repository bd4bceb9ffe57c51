mod common;

use fbrt_runtime::{AnyValue, RuntimeError};

#[test]
fn mux_ports_follow_the_struct_members() {
    let resource = common::resource();
    let mux = resource.create_fb("M", "STRUCT_MUX_1POINT").expect("mux");
    let fb = mux.lock();
    assert_eq!(fb.get_diid("X"), 0);
    assert_eq!(fb.get_diid("Y"), 1);
    assert_eq!(fb.di_type_name(0).as_deref(), Some("INT"));
    assert_eq!(fb.do_type_name(0).as_deref(), Some("POINT"));
    assert_eq!(fb.spec().ei_with(0), &[0, 1]);
    assert_eq!(fb.type_name(), "STRUCT_MUX_1POINT");
}

#[test]
fn mux_and_demux_carry_a_struct_across_a_connection() {
    let resource = common::resource();
    common::started(&resource, "M", "STRUCT_MUX_1POINT");
    common::started(&resource, "D", "STRUCT_DEMUX_1POINT");
    resource.connect("M.OUT", "D.IN").expect("data");
    resource.connect("M.CNF", "D.REQ").expect("event");

    resource.write_parameter("M.X", "3").expect("x");
    resource.write_parameter("M.Y", "-4").expect("y");
    common::fire(&resource, "M.REQ");

    let out = common::read(&resource, "M.OUT");
    let point = out.as_struct().expect("struct");
    assert_eq!(point.fields.get("X"), Some(&AnyValue::Int(3)));
    assert_eq!(point.fields.get("Y"), Some(&AnyValue::Int(-4)));

    assert_eq!(common::read(&resource, "D.X"), AnyValue::Int(3));
    assert_eq!(common::read(&resource, "D.Y"), AnyValue::Int(-4));
    assert_eq!(common::eo_count(&resource, "D", "CNF"), 1);
}

#[test]
fn configuration_must_name_a_struct() {
    let resource = common::resource();
    assert!(matches!(
        resource.create_fb("A", "STRUCT_MUX_1NAMES"),
        Err(RuntimeError::NotAStruct(name)) if name == "NAMES"
    ));
    assert!(matches!(
        resource.create_fb("B", "STRUCT_DEMUX_1INT"),
        Err(RuntimeError::NotAStruct(_))
    ));
    assert!(matches!(
        resource.create_fb("C", "STRUCT_MUX_1NOPE"),
        Err(RuntimeError::UnknownType(name)) if name == "NOPE"
    ));
    assert!(matches!(
        resource.create_fb("D", "STRUCT_MUX_1"),
        Err(RuntimeError::InvalidGenericConfig(_))
    ));
    assert!(resource.instances().is_empty());
    assert_eq!(resource.library().live_generic_specs(), 0);
}

#[test]
fn instances_of_one_configuration_share_an_interface() {
    let resource = common::resource();
    let first = resource.create_fb("M1", "STRUCT_MUX_1POINT").expect("m1");
    let second = resource.create_fb("M2", "STRUCT_MUX_1POINT").expect("m2");
    assert!(first.lock().spec().ptr_eq(second.lock().spec()));
    resource.create_fb("D1", "STRUCT_DEMUX_1POINT").expect("d1");
    assert_eq!(resource.library().live_generic_specs(), 2);
    drop((first, second));

    resource.delete_fb("M1").expect("delete m1");
    assert_eq!(resource.library().live_generic_specs(), 2);
    resource.delete_fb("M2").expect("delete m2");
    assert_eq!(resource.library().live_generic_specs(), 1);
    resource.delete_fb("D1").expect("delete d1");
    assert_eq!(resource.library().live_generic_specs(), 0);
}

#[test]
fn rejected_struct_parameters_leave_the_input_unchanged() {
    let resource = common::resource();
    resource.create_fb("D", "STRUCT_DEMUX_1POINT").expect("demux");
    resource.write_parameter("D.IN", "(X:=1,Y:=2)").expect("point");
    let before = common::read(&resource, "D.IN");

    assert!(matches!(
        resource.write_parameter("D.IN", "(X:=5,Y:=abc)"),
        Err(RuntimeError::InvalidLiteral(_))
    ));
    assert!(matches!(
        resource.write_parameter("D.IN", "(X:=5,Z:=1)"),
        Err(RuntimeError::InvalidLiteral(_))
    ));
    assert_eq!(common::read(&resource, "D.IN"), before);
    assert_eq!(before.to_string(), "(X:=1,Y:=2)");
}
