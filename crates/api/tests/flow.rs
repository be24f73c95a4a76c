#![forbid(unsafe_code)]

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use ntdash_api::{
    attach, connect, ConnectionInfo, InProcTable, MockTable, TableClient, TableValue, TransportInitError, WriteBridge,
    WriteError, WriteKind,
};
use ntdash_core::dashboard::Dashboard;
use ntdash_core::marshal::{channel, UpdateQueue};
use ntdash_core::ShellCommand;

/// Drain until `pred` holds or a second passes.
fn pump_until(dash: &mut Dashboard, rx: &UpdateQueue, mut pred: impl FnMut(&Dashboard) -> bool) -> Vec<ShellCommand> {
    let t0 = Instant::now();
    let mut out = Vec::new();
    loop {
        out.extend(dash.drain(rx, 256));
        if pred(dash) || t0.elapsed() > Duration::from_secs(1) {
            return out;
        }
        thread::sleep(Duration::from_millis(2));
    }
}

#[test]
fn immediate_notify_reflects_prior_state_then_transitions() {
    let table = MockTable::new();
    let (tx, rx) = channel();
    attach(&table, tx);
    let mut dash = Dashboard::new();

    // immediate notify: the pre-existing (disconnected) state
    let cmds = dash.drain(&rx, 16);
    assert_eq!(cmds, vec![ShellCommand::SetConnection { text: "Disconnected", connected: false }]);

    let info = ConnectionInfo { remote_id: "rio".into(), remote_ip: "10.0.0.2".into(), remote_port: 1735, protocol_version: 0x0300 };
    table.emit_connection(true, info.clone());
    assert_eq!(dash.drain(&rx, 16), vec![ShellCommand::SetConnection { text: "Connected", connected: true }]);
    assert_eq!(dash.indicator().info(), info.to_string());

    table.emit_connection(false, info);
    assert_eq!(dash.drain(&rx, 16), vec![ShellCommand::SetConnection { text: "Disconnected", connected: false }]);
    assert_eq!(dash.indicator().transitions(), 2);
}

#[test]
fn immediate_notify_when_already_connected() {
    let table = MockTable::new();
    table.set_connected(true);
    let (tx, rx) = channel();
    attach(&table, tx);
    let mut dash = Dashboard::new();
    assert_eq!(dash.drain(&rx, 16), vec![ShellCommand::SetConnection { text: "Connected", connected: true }]);
}

#[test]
fn two_transport_threads_feed_one_dashboard() {
    let table = MockTable::new();
    let (tx, rx) = channel();
    attach(&table, tx);
    let producers: Vec<_> = ["/A", "/B"]
        .into_iter()
        .map(|key| {
            let t = table.clone();
            thread::spawn(move || {
                for i in 0..300 {
                    t.emit_entry(key, TableValue::Double(i as f64), i == 0);
                }
            })
        })
        .collect();
    for p in producers {
        p.join().unwrap();
    }
    let mut dash = Dashboard::new();
    let mut seen_a = Vec::new();
    for cmd in dash.drain(&rx, usize::MAX) {
        match cmd {
            ShellCommand::CreateRow { key, value, .. } | ShellCommand::UpdateText { key, text: value } if key == "/A" => {
                seen_a.push(value.parse::<f64>().unwrap())
            }
            _ => {}
        }
    }
    assert_eq!(seen_a.len(), 300);
    assert!(seen_a.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(dash.registry().get("/B").unwrap().value, "299");
}

#[test]
fn inproc_end_to_end() {
    let table = InProcTable::new();
    table.put("/Preexisting", TableValue::String("hello".into()));
    table.initialize("127.0.0.1").unwrap();

    let (tx, rx) = channel();
    attach(&table, tx);
    let mut dash = Dashboard::new();

    let cmds = pump_until(&mut dash, &rx, |d| d.registry().len() == 1);
    assert_eq!(cmds[0], ShellCommand::SetConnection { text: "Connected", connected: true });
    assert!(cmds.contains(&ShellCommand::CreateRow { row: 0, key: "/Preexisting".into(), value: "hello".into(), visible: true }));

    // operator write comes back through the entry listener
    let client: Arc<dyn TableClient> = Arc::new(table.clone());
    let bridge = WriteBridge::new(client);
    bridge.commit("/foo", "42", WriteKind::Number).unwrap();
    pump_until(&mut dash, &rx, |d| d.registry().get("/foo").is_some());
    let foo = dash.registry().get("/foo").unwrap();
    assert_eq!((foo.row, foo.value.as_str()), (1, "42"));
    assert_eq!(table.get("/foo"), Some(TableValue::Double(42.0)));

    // type-locked entry refuses a string
    assert!(bridge.commit("/foo", "x", WriteKind::String).is_err());

    table.set_link(false);
    pump_until(&mut dash, &rx, |d| !d.indicator().state().is_connected());
    assert!(!dash.indicator().state().is_connected());
    assert_eq!(bridge.commit("/foo", "1", WriteKind::Number), Err(ntdash_api::WriteError::NotConnected));

    table.shutdown();
}

#[test]
fn failed_initialize_leaves_dashboard_disconnected() {
    let table = MockTable::new();
    table.fail_initialize_with(TransportInitError::InvalidAddress("no such host".into()));
    let rx = connect(&table, "no such host");
    assert_eq!(table.server(), None);
    assert!(!table.is_connected());

    let mut dash = Dashboard::new();
    let cmds = dash.drain(&rx, 16);
    assert_eq!(cmds.first(), Some(&ShellCommand::SetConnection { text: "Disconnected", connected: false }));
    assert!(!dash.indicator().state().is_connected());

    // the app keeps running: entries still flow, writes report NotConnected
    table.emit_entry("/late", TableValue::Double(1.0), true);
    dash.drain(&rx, 16);
    assert_eq!(dash.registry().len(), 1);
    let bridge = WriteBridge::new(Arc::new(table.clone()));
    assert_eq!(bridge.commit("/late", "2", WriteKind::Number), Err(WriteError::NotConnected));

    table.shutdown();
    assert_eq!(table.shutdowns(), 1);
}

#[test]
fn connect_against_bad_address_on_inproc_table() {
    let table = InProcTable::new();
    let rx = connect(&table, "not a host");
    assert!(!table.is_connected());
    assert_eq!(table.server(), None);
    let mut dash = Dashboard::new();
    let cmds = pump_until(&mut dash, &rx, |d| d.applied() >= 1);
    assert_eq!(cmds.first(), Some(&ShellCommand::SetConnection { text: "Disconnected", connected: false }));
    table.shutdown();
}

#[test]
fn connect_initializes_then_attaches() {
    let table = MockTable::new();
    table.set_connected(true);
    let rx = connect(&table, "10.2.54.2");
    assert_eq!(table.server().as_deref(), Some("10.2.54.2"));
    let mut dash = Dashboard::new();
    let cmds = dash.drain(&rx, 16);
    assert_eq!(cmds, vec![ShellCommand::SetConnection { text: "Connected", connected: true }]);
}
