//! Recording table client for tests.
//!
//! Listeners fire synchronously on whichever thread calls `emit_*`, which lets
//! tests play the part of the transport's notification thread(s).

#![forbid(unsafe_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::bridge::Scalar;
use crate::{ConnectionInfo, ConnectionListener, EntryHandle, EntryListener, TableClient, TableValue, TransportInitError};

#[derive(Default)]
struct MockState {
    connected: bool,
    info: ConnectionInfo,
    server: Option<String>,
    init_error: Option<TransportInitError>,
    writes: Vec<(String, Scalar)>,
    refused: HashSet<String>,
    conn_listeners: Vec<Arc<ConnectionListener>>,
    entry_listeners: Vec<Arc<EntryListener>>,
    shutdowns: usize,
}

#[derive(Clone, Default)]
pub struct MockTable {
    inner: Arc<Mutex<MockState>>,
}

impl MockTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make the next `initialize` fail with `err`.
    pub fn fail_initialize_with(&self, err: TransportInitError) {
        self.state().init_error = Some(err);
    }

    /// Refuse writes to `path` as a type conflict would.
    pub fn refuse(&self, path: &str) {
        self.state().refused.insert(path.to_string());
    }

    pub fn set_connected(&self, connected: bool) {
        self.state().connected = connected;
    }

    pub fn server(&self) -> Option<String> {
        self.state().server.clone()
    }

    pub fn writes(&self) -> Vec<(String, Scalar)> {
        self.state().writes.clone()
    }

    pub fn shutdowns(&self) -> usize {
        self.state().shutdowns
    }

    pub fn emit_connection(&self, connected: bool, info: ConnectionInfo) {
        let listeners = {
            let mut st = self.state();
            st.connected = connected;
            st.info = info.clone();
            st.conn_listeners.clone()
        };
        for l in listeners {
            l(connected, &info);
        }
    }

    pub fn emit_entry(&self, key: &str, value: TableValue, is_new: bool) {
        let listeners = self.state().entry_listeners.clone();
        for l in listeners {
            l(key, &value, is_new);
        }
    }

    fn record(&self, path: &str, value: Scalar) -> bool {
        let mut st = self.state();
        if st.refused.contains(path) {
            return false;
        }
        st.writes.push((path.to_string(), value));
        true
    }
}

impl TableClient for MockTable {
    fn initialize(&self, server: &str) -> Result<(), TransportInitError> {
        let mut st = self.state();
        if let Some(err) = st.init_error.take() {
            return Err(err);
        }
        st.server = Some(server.to_string());
        Ok(())
    }

    fn add_connection_listener(&self, listener: ConnectionListener, immediate_notify: bool) {
        let (connected, info) = {
            let st = self.state();
            (st.connected, st.info.clone())
        };
        if immediate_notify {
            listener(connected, &info);
        }
        self.state().conn_listeners.push(Arc::new(listener));
    }

    fn add_entry_listener(&self, listener: EntryListener) {
        self.state().entry_listeners.push(Arc::new(listener));
    }

    fn entry(&self, path: &str) -> Box<dyn EntryHandle> {
        Box::new(MockEntry { path: path.to_string(), table: self.clone() })
    }

    fn is_connected(&self) -> bool {
        self.state().connected
    }

    fn shutdown(&self) {
        let mut st = self.state();
        st.connected = false;
        st.shutdowns += 1;
    }
}

struct MockEntry {
    path: String,
    table: MockTable,
}

impl EntryHandle for MockEntry {
    fn path(&self) -> &str {
        &self.path
    }

    fn set_boolean(&self, v: bool) -> bool {
        self.table.record(&self.path, Scalar::Boolean(v))
    }

    fn set_number(&self, v: f64) -> bool {
        self.table.record(&self.path, Scalar::Number(v))
    }

    fn set_string(&self, v: &str) -> bool {
        self.table.record(&self.path, Scalar::String(v.to_string()))
    }
}
