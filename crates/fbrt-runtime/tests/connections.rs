mod common;

use std::sync::Arc;

use fbrt_runtime::connection::{ConnectionPoint, DataConnection};
use fbrt_runtime::{AnyValue, RuntimeError};

#[test]
fn data_input_keeps_its_first_connection() {
    let resource = common::resource();
    let fb = resource.create_fb("P", "PROBE").expect("probe");
    let first = Arc::new(DataConnection::new(AnyValue::Int(1), false));
    let second = Arc::new(DataConnection::new(AnyValue::Int(2), false));

    let mut block = fb.lock();
    assert!(block.connect_di(0, Some(Arc::clone(&first))).is_ok());
    assert!(matches!(
        block.connect_di(0, Some(Arc::clone(&second))),
        Err(RuntimeError::AlreadyConnected(_))
    ));
    assert!(Arc::ptr_eq(block.di_connection(0).expect("held"), &first));

    // reconnecting the held connection is a reconfiguration
    assert!(block.connect_di(0, Some(Arc::clone(&first))).is_ok());
    assert!(block.connect_di(0, None).is_ok());
    assert!(block.di_connection(0).is_none());
}

#[test]
fn typed_input_rejects_an_incompatible_connection() {
    let resource = common::resource();
    let fb = resource.create_fb("P", "PROBE").expect("probe");
    let wide = Arc::new(DataConnection::new(AnyValue::LReal(1.0), false));
    let err = fb.lock().connect_di(0, Some(wide)).unwrap_err();
    assert_eq!(
        err,
        RuntimeError::TypeMismatch {
            source_type: "LREAL".into(),
            target_type: "INT".into(),
        }
    );
}

#[test]
fn reads_skip_forced_inputs_and_unconnected_ports() {
    let resource = common::resource();
    let fb = resource.create_fb("P", "PROBE").expect("probe");
    let connection = Arc::new(DataConnection::new(AnyValue::Int(5), false));
    let mut block = fb.lock();

    block.read_data(0);
    assert_eq!(block.di(0), Some(&AnyValue::Int(0)));

    block.connect_di(0, Some(Arc::clone(&connection))).expect("connect");
    assert!(block.force_data_input(0, &AnyValue::Int(-1)));
    block.read_data(0);
    assert_eq!(block.di(0), Some(&AnyValue::Int(-1)));

    assert!(block.release_data_input(0));
    block.read_data(0);
    assert_eq!(block.di(0), Some(&AnyValue::Int(5)));
}

#[test]
fn destinations_are_unique_per_port() {
    let resource = common::resource();
    let fb = resource.create_fb("P", "PROBE").expect("probe");
    let connection = DataConnection::new(AnyValue::Int(0), false);
    assert!(connection.add_destination(ConnectionPoint::new(&fb, 0)));
    assert!(!connection.add_destination(ConnectionPoint::new(&fb, 0)));
    assert!(connection.is_connected());
    assert!(connection.remove_destination(&fb, 0));
    assert!(!connection.remove_destination(&fb, 0));
    assert!(!connection.is_connected());
}
