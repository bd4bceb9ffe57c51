use fbrt_runtime::value::{
    default_value_for_port, default_value_for_type_id, generic_representative, AnyValue,
    DefaultValueError,
};
use fbrt_types::{StructField, TypeId, TypeRegistry};

#[test]
fn every_elementary_type_has_a_zero_default() {
    for type_id in TypeId::ELEMENTARY {
        let value = AnyValue::default_for(type_id)
            .unwrap_or_else(|| panic!("no default for {type_id:?}"));
        assert_eq!(value.type_id(), type_id);
        assert_eq!(value.zeroed(), value);
    }
}

#[test]
fn defaults_round_trip_through_their_literal() {
    for type_id in TypeId::ELEMENTARY {
        let value = AnyValue::default_for(type_id).expect("default");
        let text = value.to_string();
        let mut parsed = AnyValue::default_for(type_id).expect("default");
        parsed
            .from_string(&text)
            .unwrap_or_else(|err| panic!("{text}: {err}"));
        assert_eq!(parsed, value, "{text}");
        assert!(text.len() <= value.to_string_buffer_size(), "{text}");
    }
}

#[test]
fn set_default_value_rejects_generic_and_unknown_tags() {
    let mut value = AnyValue::Int(7);
    assert!(!value.set_default_value(TypeId::ANY_NUM));
    assert!(!value.set_default_value(TypeId::UNKNOWN));
    assert_eq!(value, AnyValue::Int(7));

    assert!(value.set_default_value(TypeId::LREAL));
    assert_eq!(value, AnyValue::LReal(0.0));
}

#[test]
fn reset_keeps_the_active_variant() {
    let mut value = AnyValue::String("abc".into());
    value.reset();
    assert_eq!(value, AnyValue::String("".into()));
}

#[test]
fn struct_and_array_defaults_follow_the_registry() {
    let mut registry = TypeRegistry::new();
    let point = registry.register_struct(
        "POINT",
        vec![
            StructField::new("X", TypeId::INT),
            StructField::new("Y", TypeId::LREAL),
        ],
    );
    let names = registry.register_array("NAMES", TypeId::STRING, 1, 3);

    let value = default_value_for_type_id(point, &registry).expect("struct default");
    let fields = value.as_struct().expect("struct");
    let members: Vec<&str> = fields.member_names().map(|name| name.as_str()).collect();
    assert_eq!(members, ["X", "Y"]);
    assert_eq!(fields.member("X"), Some(&AnyValue::Int(0)));
    assert_eq!(fields.member("Y"), Some(&AnyValue::LReal(0.0)));

    let value = default_value_for_type_id(names, &registry).expect("array default");
    let array = value.as_array().expect("array");
    assert_eq!(array.len(), 3);
    assert_eq!(array.get(1), Some(&AnyValue::String("".into())));
    assert_eq!(array.get(0), None);
}

#[test]
fn generic_ports_start_at_their_family_representative() {
    let registry = TypeRegistry::new();
    assert_eq!(generic_representative(TypeId::ANY_REAL), Some(TypeId::REAL));
    assert_eq!(generic_representative(TypeId::ANY_UNSIGNED), Some(TypeId::USINT));
    assert_eq!(generic_representative(TypeId::INT), None);
    assert_eq!(
        default_value_for_port(TypeId::ANY_NUM, &registry),
        Ok(AnyValue::SInt(0))
    );
    assert_eq!(
        default_value_for_port(TypeId::ANY_DURATION, &registry).map(|v| v.type_id()),
        Ok(TypeId::TIME)
    );
    assert_eq!(
        default_value_for_type_id(TypeId(500), &registry),
        Err(DefaultValueError::UnknownType)
    );
}
