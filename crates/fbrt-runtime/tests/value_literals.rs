use fbrt_runtime::value::{AnyValue, DateTimeValue, Duration, LDateTimeValue, ValueParseError};
use fbrt_types::TypeId;

fn parse_into(type_id: TypeId, text: &str) -> Result<AnyValue, ValueParseError> {
    let mut value = AnyValue::default_for(type_id).expect("elementary type");
    value.from_string(text)?;
    Ok(value)
}

#[test]
fn integers_accept_based_and_typed_literals() {
    assert_eq!(parse_into(TypeId::INT, "-42"), Ok(AnyValue::Int(-42)));
    assert_eq!(parse_into(TypeId::DINT, "1_000_000"), Ok(AnyValue::DInt(1_000_000)));
    assert_eq!(parse_into(TypeId::BYTE, "16#FF"), Ok(AnyValue::Byte(0xFF)));
    assert_eq!(parse_into(TypeId::WORD, "2#1010"), Ok(AnyValue::Word(10)));
    assert_eq!(parse_into(TypeId::DINT, "INT#7"), Ok(AnyValue::DInt(7)));
}

#[test]
fn out_of_range_and_narrowing_literals_are_rejected() {
    assert!(matches!(
        parse_into(TypeId::SINT, "200"),
        Err(ValueParseError::OutOfRange { .. })
    ));
    assert!(matches!(
        parse_into(TypeId::INT, "DINT#5"),
        Err(ValueParseError::TypeMismatch { .. })
    ));
    assert!(matches!(
        parse_into(TypeId::BOOL, "maybe"),
        Err(ValueParseError::Invalid { .. })
    ));
}

#[test]
fn durations_and_dates_use_iec_prefixes() {
    assert_eq!(
        parse_into(TypeId::TIME, "T#1s500ms"),
        Ok(AnyValue::Time(Duration::from_millis(1500)))
    );
    let value = parse_into(TypeId::DT, "DT#2024-01-02-03:04:05").expect("date and time");
    assert_eq!(value.to_string(), "DT#2024-01-02-03:04:05");
    let value = parse_into(TypeId::TOD, "TOD#12:30:00.25").expect("time of day");
    assert_eq!(value.to_string(), "TOD#12:30:00.25");
    assert_eq!(
        AnyValue::Time(Duration::from_millis(90_061_001)).to_string(),
        "T#1d1h1m1s1ms"
    );
}

#[test]
fn strings_escape_quotes_and_controls() {
    let value = parse_into(TypeId::STRING, "'it$'s$N'").expect("string");
    assert_eq!(value, AnyValue::String("it's\n".into()));
    assert_eq!(value.to_string(), "'it$'s$N'");

    let value = parse_into(TypeId::WSTRING, "\"$00E4\"").expect("wstring");
    assert_eq!(value, AnyValue::WString("\u{e4}".into()));
}

#[test]
fn typed_strings_carry_their_type() {
    assert_eq!(AnyValue::Int(5).to_typed_string(), "INT#5");
    assert_eq!(AnyValue::Byte(0x1F).to_typed_string(), "BYTE#16#1F");
    assert_eq!(AnyValue::Real(1.0).to_typed_string(), "REAL#1.0");
    assert_eq!(
        AnyValue::Dt(DateTimeValue::new(0)).to_typed_string(),
        "DT#1970-01-01-00:00:00"
    );
}

#[test]
fn self_describing_literals_pick_their_own_type() {
    assert_eq!(AnyValue::parse_typed("5"), Ok(AnyValue::DInt(5)));
    assert_eq!(
        AnyValue::parse_typed("5000000000"),
        Ok(AnyValue::LInt(5_000_000_000))
    );
    assert_eq!(AnyValue::parse_typed("2.5"), Ok(AnyValue::LReal(2.5)));
    assert_eq!(AnyValue::parse_typed("USINT#3"), Ok(AnyValue::USInt(3)));
    assert_eq!(AnyValue::parse_typed("TRUE"), Ok(AnyValue::Bool(true)));
    assert_eq!(AnyValue::parse_typed("'ab'"), Ok(AnyValue::String("ab".into())));
}

#[test]
fn buffers_receive_the_literal_when_large_enough() {
    let value = AnyValue::Int(-1234);
    let mut buffer = [0u8; 16];
    let len = value.to_buffer(&mut buffer).expect("fits");
    assert_eq!(&buffer[..len], b"-1234");

    let mut small = [0u8; 3];
    assert_eq!(value.to_buffer(&mut small), None);
}

#[test]
fn impossible_calendar_dates_are_rejected() {
    for text in ["D#2023-02-31", "D#2023-02-29", "DT#2023-04-31-10:00:00", "D#2023-00-10"] {
        assert!(
            matches!(
                AnyValue::parse_typed(text),
                Err(ValueParseError::Invalid { .. })
            ),
            "accepted: {text}"
        );
    }
    let leap = AnyValue::parse_typed("D#2024-02-29").expect("leap day");
    assert_eq!(leap.to_string(), "D#2024-02-29");
}

#[test]
fn long_date_times_round_trip_at_the_storage_limits() {
    for nanos in [i64::MIN, i64::MAX, -1] {
        let value = AnyValue::Ldt(LDateTimeValue::new(nanos));
        let text = value.to_string();
        assert_eq!(AnyValue::parse_typed(&text), Ok(value), "{text}");
    }
    assert_eq!(
        AnyValue::Ldt(LDateTimeValue::new(i64::MIN)).to_string(),
        "LDT#1677-09-21-00:12:43.145224192"
    );
}
