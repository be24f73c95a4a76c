//! ntdash table-service façade.
//!
//! Defines the client surface the dashboard consumes (connection and entry
//! listeners, addressable entry handles), the write bridge on top of it, and
//! two implementations: an in-process table service and a recording mock.

#![forbid(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod bridge;
pub mod inproc;
pub mod listen;
pub mod mock;
pub mod sim;

pub use bridge::{PendingWrite, Scalar, WriteBridge, WriteError, WriteKind};
pub use inproc::InProcTable;
pub use listen::{attach, connect};
pub use mock::MockTable;

/// Port a NetworkTables 3 server listens on unless told otherwise.
pub const DEFAULT_PORT: u16 = 1735;

/// A value stored in the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TableValue {
    Boolean(bool),
    Double(f64),
    String(String),
    BooleanArray(Vec<bool>),
    DoubleArray(Vec<f64>),
    StringArray(Vec<String>),
    Raw(Vec<u8>),
}

impl TableValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "boolean",
            Self::Double(_) => "double",
            Self::String(_) => "string",
            Self::BooleanArray(_) => "boolean[]",
            Self::DoubleArray(_) => "double[]",
            Self::StringArray(_) => "string[]",
            Self::Raw(_) => "raw",
        }
    }

    pub fn same_type(&self, other: &TableValue) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    f.write_str("[")?;
    for (i, it) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", it)?;
    }
    f.write_str("]")
}

/// Display form shown in the value column.
impl fmt::Display for TableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Double(d) => write!(f, "{}", d),
            Self::String(s) => f.write_str(s),
            Self::BooleanArray(v) => write_list(f, v),
            Self::DoubleArray(v) => write_list(f, v),
            Self::StringArray(v) => write_list(f, v),
            Self::Raw(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

/// Metadata reported with every connection notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ConnectionInfo {
    pub remote_id: String,
    pub remote_ip: String,
    pub remote_port: u16,
    pub protocol_version: u16,
}

impl fmt::Display for ConnectionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ConnectionInfo(remote_id={}, remote_ip={}, remote_port={}, protocol_version={:#06x})",
            self.remote_id, self.remote_ip, self.remote_port, self.protocol_version
        )
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TransportInitError {
    #[error("invalid server address {0:?}")]
    InvalidAddress(String),
    #[error("already initialized against {0}")]
    AlreadyInitialized(String),
    #[error("client has been shut down")]
    Shutdown,
}

pub type ConnectionListener = Box<dyn Fn(bool, &ConnectionInfo) + Send + Sync>;
pub type EntryListener = Box<dyn Fn(&str, &TableValue, bool) + Send + Sync>;

/// Handle to one addressable entry. Setters return false when the table
/// refuses the write (type conflict or client gone).
pub trait EntryHandle: Send {
    fn path(&self) -> &str;
    fn set_boolean(&self, v: bool) -> bool;
    fn set_number(&self, v: f64) -> bool;
    fn set_string(&self, v: &str) -> bool;
}

/// Pub/sub key-value store client. Listeners run on the client's own
/// notification thread, never on the caller's, except for the immediate
/// connection notify which fires synchronously during registration.
pub trait TableClient: Send + Sync {
    fn initialize(&self, server: &str) -> Result<(), TransportInitError>;

    fn add_connection_listener(&self, listener: ConnectionListener, immediate_notify: bool);

    /// Existing entries are replayed to the new listener as `is_new = true`.
    fn add_entry_listener(&self, listener: EntryListener);

    fn entry(&self, path: &str) -> Box<dyn EntryHandle>;

    fn is_connected(&self) -> bool;

    /// Release the transport. Undelivered notifications may be dropped.
    fn shutdown(&self);
}

/// Split `host[:port]`, defaulting the port.
pub fn parse_server(addr: &str) -> Result<(String, u16), TransportInitError> {
    let bad = || TransportInitError::InvalidAddress(addr.to_string());
    let addr_t = addr.trim();
    if addr_t.is_empty() || addr_t.chars().any(char::is_whitespace) {
        return Err(bad());
    }
    let (host, port) = match addr_t.rsplit_once(':') {
        Some((h, p)) => (h, p.parse::<u16>().map_err(|_| bad())?),
        None => (addr_t, DEFAULT_PORT),
    };
    if host.is_empty() || port == 0 {
        return Err(bad());
    }
    Ok((host.to_string(), port))
}
