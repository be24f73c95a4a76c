//! In-process table service.
//!
//! Holds the table in memory and delivers notifications from a dedicated
//! notifier thread, the same way a networked client would. `initialize`
//! validates the server address and reports it in [`ConnectionInfo`]; no
//! socket is opened.

#![forbid(unsafe_code)]

use std::collections::BTreeMap;
use std::sync::{mpsc, Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use crate::{
    parse_server, ConnectionInfo, ConnectionListener, EntryHandle, EntryListener, TableClient, TableValue,
    TransportInitError,
};

const PROTOCOL_VERSION: u16 = 0x0300;

enum Notice {
    Connection { connected: bool, info: ConnectionInfo },
    Entry { key: String, value: TableValue, is_new: bool },
    /// `ready` holds the listener back until its immediate notify has run.
    AddConnectionListener { listener: Arc<ConnectionListener>, ready: Option<mpsc::Receiver<()>> },
    AddEntryListener { listener: EntryListener, replay: Vec<(String, TableValue)> },
    Stop,
}

#[derive(Default)]
struct State {
    entries: BTreeMap<String, TableValue>,
    connected: bool,
    info: ConnectionInfo,
    server: Option<String>,
    shut_down: bool,
    notify: Option<mpsc::Sender<Notice>>,
}

impl State {
    // Called with the lock held so notices leave in mutation order.
    fn post(&self, n: Notice) {
        if let Some(tx) = &self.notify {
            let _ = tx.send(n);
        }
    }
}

struct Inner {
    state: Mutex<State>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

#[derive(Clone)]
pub struct InProcTable {
    inner: Arc<Inner>,
}

impl Default for InProcTable {
    fn default() -> Self {
        Self::new()
    }
}

impl InProcTable {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<Notice>();
        let spawned = thread::Builder::new()
            .name("ntdash-notify".into())
            .spawn(move || run_notifier(rx));
        let (notify, worker) = match spawned {
            Ok(h) => (Some(tx), Some(h)),
            Err(e) => {
                warn!(error = %e, "inproc: notifier thread failed to start; listeners will not fire");
                (None, None)
            }
        };
        let state = State { notify, ..State::default() };
        Self { inner: Arc::new(Inner { state: Mutex::new(state), worker: Mutex::new(worker) }) }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn server(&self) -> Option<String> {
        self.state().server.clone()
    }

    pub fn get(&self, key: &str) -> Option<TableValue> {
        self.state().entries.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.state().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Publish a value. Returns false if the key already holds a value of a
    /// different type or the table is shut down. Unchanged values are stored
    /// silently.
    pub fn put(&self, key: &str, value: TableValue) -> bool {
        let mut st = self.state();
        if st.shut_down {
            return false;
        }
        let is_new = match st.entries.get(key) {
            Some(old) if !old.same_type(&value) => {
                warn!(key = %key, have = old.type_name(), got = value.type_name(), "inproc: type conflict");
                return false;
            }
            Some(old) if *old == value => return true,
            Some(_) => false,
            None => true,
        };
        st.entries.insert(key.to_string(), value.clone());
        st.post(Notice::Entry { key: key.to_string(), value, is_new });
        true
    }

    /// Simulate the link to the server going up or down after initialization.
    pub fn set_link(&self, up: bool) {
        let mut st = self.state();
        if st.server.is_none() || st.shut_down {
            debug!(up, "inproc: link change ignored (not initialized)");
            return;
        }
        if st.connected == up {
            return;
        }
        st.connected = up;
        let info = st.info.clone();
        st.post(Notice::Connection { connected: up, info });
    }
}

impl TableClient for InProcTable {
    fn initialize(&self, server: &str) -> Result<(), TransportInitError> {
        let (host, port) = parse_server(server)?;
        let mut st = self.state();
        if st.shut_down {
            return Err(TransportInitError::Shutdown);
        }
        if let Some(prev) = &st.server {
            return Err(TransportInitError::AlreadyInitialized(prev.clone()));
        }
        st.server = Some(format!("{}:{}", host, port));
        st.info = ConnectionInfo { remote_id: "inproc".into(), remote_ip: host, remote_port: port, protocol_version: PROTOCOL_VERSION };
        st.connected = true;
        let info = st.info.clone();
        st.post(Notice::Connection { connected: true, info });
        info!(server = %server, "inproc: initialized");
        Ok(())
    }

    fn add_connection_listener(&self, listener: ConnectionListener, immediate_notify: bool) {
        let listener = Arc::new(listener);
        if !immediate_notify {
            self.state().post(Notice::AddConnectionListener { listener, ready: None });
            return;
        }
        // Snapshot and registration share one critical section; the notifier
        // waits on `gate` so later changes reach the listener after this call.
        let (gate, ready) = mpsc::channel::<()>();
        let (connected, info) = {
            let st = self.state();
            st.post(Notice::AddConnectionListener { listener: listener.clone(), ready: Some(ready) });
            (st.connected, st.info.clone())
        };
        listener(connected, &info);
        drop(gate);
    }

    fn add_entry_listener(&self, listener: EntryListener) {
        let st = self.state();
        let replay: Vec<(String, TableValue)> = st.entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        st.post(Notice::AddEntryListener { listener, replay });
    }

    fn entry(&self, path: &str) -> Box<dyn EntryHandle> {
        Box::new(InProcEntry { path: path.to_string(), table: self.clone() })
    }

    fn is_connected(&self) -> bool {
        self.state().connected
    }

    fn shutdown(&self) {
        {
            let mut st = self.state();
            if st.shut_down {
                return;
            }
            st.shut_down = true;
            if st.connected {
                st.connected = false;
                let info = st.info.clone();
                st.post(Notice::Connection { connected: false, info });
            }
            st.post(Notice::Stop);
            st.notify = None;
        }
        let handle = self.inner.worker.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(h) = handle {
            if h.thread().id() != thread::current().id() {
                let _ = h.join();
            }
        }
        info!("inproc: shut down");
    }
}

struct InProcEntry {
    path: String,
    table: InProcTable,
}

impl EntryHandle for InProcEntry {
    fn path(&self) -> &str {
        &self.path
    }

    fn set_boolean(&self, v: bool) -> bool {
        self.table.put(&self.path, TableValue::Boolean(v))
    }

    fn set_number(&self, v: f64) -> bool {
        self.table.put(&self.path, TableValue::Double(v))
    }

    fn set_string(&self, v: &str) -> bool {
        self.table.put(&self.path, TableValue::String(v.to_string()))
    }
}

fn run_notifier(rx: mpsc::Receiver<Notice>) {
    let mut conn: Vec<Arc<ConnectionListener>> = Vec::new();
    let mut entry: Vec<EntryListener> = Vec::new();
    while let Ok(n) = rx.recv() {
        match n {
            Notice::Connection { connected, info } => {
                for l in &conn {
                    l(connected, &info);
                }
            }
            Notice::Entry { key, value, is_new } => {
                for l in &entry {
                    l(&key, &value, is_new);
                }
            }
            Notice::AddConnectionListener { listener, ready } => {
                if let Some(r) = ready {
                    // Err once the registering caller drops its end.
                    let _ = r.recv();
                }
                conn.push(listener);
            }
            Notice::AddEntryListener { listener, replay } => {
                for (k, v) in &replay {
                    listener(k, v, true);
                }
                entry.push(listener);
            }
            Notice::Stop => break,
        }
    }
    debug!("inproc: notifier stopped");
}
