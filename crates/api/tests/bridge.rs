#![forbid(unsafe_code)]

use std::sync::Arc;

use ntdash_api::{MockTable, Scalar, TableClient, WriteBridge, WriteError, WriteKind};

fn connected_mock() -> MockTable {
    let t = MockTable::new();
    t.set_connected(true);
    t
}

#[test]
fn number_commit_writes_once() {
    let table = connected_mock();
    let bridge = WriteBridge::new(Arc::new(table.clone()));
    bridge.commit("/foo", "42", WriteKind::Number).unwrap();
    assert_eq!(table.writes(), vec![("/foo".to_string(), Scalar::Number(42.0))]);
}

#[test]
fn unparsable_number_writes_nothing() {
    let table = connected_mock();
    let bridge = WriteBridge::new(Arc::new(table.clone()));
    let err = bridge.commit("/foo", "abc", WriteKind::Number).unwrap_err();
    assert_eq!(err, WriteError::InvalidValue { raw: "abc".into(), kind: WriteKind::Number });
    assert!(table.writes().is_empty());
}

#[test]
fn disconnected_commit_fails() {
    let table = MockTable::new();
    let bridge = WriteBridge::new(Arc::new(table.clone()));
    assert_eq!(bridge.commit("/foo", "1", WriteKind::Number), Err(WriteError::NotConnected));
    assert!(table.writes().is_empty());
}

#[test]
fn each_kind_dispatches_to_its_setter() {
    let table = connected_mock();
    let bridge = WriteBridge::new(Arc::new(table.clone()));
    bridge.commit("/b", "true", WriteKind::Boolean).unwrap();
    bridge.commit("/n", "-1.5", WriteKind::Number).unwrap();
    bridge.commit("/s", "hello world", WriteKind::String).unwrap();
    assert_eq!(
        table.writes(),
        vec![
            ("/b".to_string(), Scalar::Boolean(true)),
            ("/n".to_string(), Scalar::Number(-1.5)),
            ("/s".to_string(), Scalar::String("hello world".into())),
        ]
    );
}

#[test]
fn refused_write_is_reported_not_retried() {
    let table = connected_mock();
    table.refuse("/locked");
    let bridge = WriteBridge::new(Arc::new(table.clone()));
    assert_eq!(
        bridge.commit("/locked", "x", WriteKind::String),
        Err(WriteError::Rejected { path: "/locked".into() })
    );
    assert!(table.writes().is_empty());
}

#[test]
fn empty_path_is_rejected() {
    let table = connected_mock();
    let bridge = WriteBridge::new(Arc::new(table.clone()));
    assert_eq!(bridge.commit("  ", "1", WriteKind::Number), Err(WriteError::InvalidPath("  ".into())));
}

#[test]
fn prepared_write_can_be_sent_later() {
    let table = connected_mock();
    let bridge = WriteBridge::new(Arc::new(table.clone()));
    let pending = bridge.prepare("/later", "off", WriteKind::Boolean).unwrap();
    assert!(table.writes().is_empty());
    let client: Arc<dyn TableClient> = bridge.client();
    pending.send(client.as_ref()).unwrap();
    assert_eq!(table.writes(), vec![("/later".to_string(), Scalar::Boolean(false))]);
}
