use fbrt_runtime::value::{convert, is_implicit_conversion, AnyValue, StructValue};
use fbrt_types::TypeId;
use indexmap::IndexMap;

fn point(x: AnyValue, y: AnyValue) -> AnyValue {
    let mut fields = IndexMap::new();
    fields.insert("X".into(), x);
    fields.insert("Y".into(), y);
    AnyValue::Struct(Box::new(StructValue {
        type_id: TypeId(100),
        type_name: "POINT".into(),
        fields,
    }))
}

#[test]
fn set_value_widens_within_the_active_variant() {
    let mut target = AnyValue::DInt(0);
    target.set_value(&AnyValue::Int(-3));
    assert_eq!(target, AnyValue::DInt(-3));

    let mut target = AnyValue::LReal(0.0);
    target.set_value(&AnyValue::Real(1.5));
    assert_eq!(target, AnyValue::LReal(1.5));
}

#[test]
fn incompatible_set_value_resets_to_zero() {
    let mut target = AnyValue::Int(9);
    target.set_value(&AnyValue::DInt(70_000));
    assert_eq!(target, AnyValue::Int(0));

    let mut target = AnyValue::Bool(true);
    target.set_value(&AnyValue::String("x".into()));
    assert_eq!(target, AnyValue::Bool(false));
}

#[test]
fn assign_switches_the_variant() {
    let mut target = AnyValue::SInt(1);
    target.assign(&AnyValue::LReal(2.0));
    assert_eq!(target, AnyValue::LReal(2.0));
}

#[test]
fn equality_is_strict_about_types() {
    assert!(AnyValue::Int(1).equals(&AnyValue::Int(1)));
    assert!(!AnyValue::Int(1).equals(&AnyValue::DInt(1)));
    assert!(point(AnyValue::Int(1), AnyValue::Int(2)).equals(&point(AnyValue::Int(1), AnyValue::Int(2))));
    assert!(!point(AnyValue::Int(1), AnyValue::Int(2)).equals(&point(AnyValue::Int(2), AnyValue::Int(1))));
}

#[test]
fn structs_copy_member_wise() {
    let mut target = point(AnyValue::Int(0), AnyValue::Int(0));
    target.set_value(&point(AnyValue::Int(4), AnyValue::Int(5)));
    assert_eq!(target, point(AnyValue::Int(4), AnyValue::Int(5)));
}

#[test]
fn implicit_conversions_follow_iec_widening() {
    assert!(is_implicit_conversion(TypeId::LINT, TypeId::UDINT));
    assert!(is_implicit_conversion(TypeId::LTIME, TypeId::TIME));
    assert!(!is_implicit_conversion(TypeId::UINT, TypeId::SINT));
    assert!(!is_implicit_conversion(TypeId::INT, TypeId::DINT));
    assert_eq!(
        convert(&AnyValue::UInt(7), TypeId::REAL),
        Some(AnyValue::Real(7.0))
    );
    assert_eq!(convert(&AnyValue::LInt(7), TypeId::INT), None);
}
