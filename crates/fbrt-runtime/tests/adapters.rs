mod common;

use fbrt_runtime::{AnyValue, RuntimeError};

#[test]
fn plug_events_reach_the_linked_socket() {
    let resource = common::resource();
    common::started(&resource, "A", "PROBE");
    common::started(&resource, "B", "PROBE");
    resource.connect("A.PLG", "B.SKT").expect("link");

    common::fire(&resource, "A.INIT");
    assert_eq!(common::eo_count(&resource, "A", "INITO"), 1);
    assert_eq!(common::read(&resource, "B.OUT"), AnyValue::DInt(110));
    assert_eq!(common::eo_count(&resource, "B", "CNF"), 1);

    // B's own plug is unlinked
    common::fire(&resource, "B.INIT");
    assert_eq!(common::eo_count(&resource, "B", "INITO"), 1);
    assert_eq!(common::eo_count(&resource, "A", "CNF"), 0);
}

#[test]
fn adapters_link_plug_to_socket_once() {
    let resource = common::resource();
    common::started(&resource, "A", "PROBE");
    common::started(&resource, "B", "PROBE");
    common::started(&resource, "C", "PROBE");

    assert!(matches!(
        resource.connect("B.SKT", "A.PLG"),
        Err(RuntimeError::UnknownPort(_))
    ));
    resource.connect("A.PLG", "B.SKT").expect("link");
    assert!(matches!(
        resource.connect("A.PLG", "C.SKT"),
        Err(RuntimeError::AlreadyConnected(_))
    ));
    let c = resource.fb("C").expect("C");
    assert!(c.lock().adapter(1).expect("socket").peer().is_none());

    resource.disconnect("A.PLG", "B.SKT").expect("unlink");
    assert!(matches!(
        resource.disconnect("A.PLG", "B.SKT"),
        Err(RuntimeError::NotConnected(_))
    ));
    resource.connect("A.PLG", "C.SKT").expect("relink");
    common::fire(&resource, "A.INIT");
    assert_eq!(common::read(&resource, "C.OUT"), AnyValue::DInt(110));
    assert_eq!(common::eo_count(&resource, "B", "CNF"), 0);
}

#[test]
fn deleting_a_peer_unlinks_the_plug() {
    let resource = common::resource();
    common::started(&resource, "A", "PROBE");
    resource.create_fb("B", "PROBE").expect("B");
    resource.connect("A.PLG", "B.SKT").expect("link");
    resource.delete_fb("B").expect("delete");

    let a = resource.fb("A").expect("A");
    assert!(a.lock().adapter(0).expect("plug").peer().is_none());
    common::fire(&resource, "A.INIT");
    assert_eq!(common::eo_count(&resource, "A", "INITO"), 1);
}
