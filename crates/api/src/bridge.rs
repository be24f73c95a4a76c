//! Operator writes: (path, raw text, kind) -> one typed write on the table.

#![forbid(unsafe_code)]

use std::fmt;
use std::sync::Arc;

use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{EntryHandle, TableClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WriteKind {
    Boolean,
    #[default]
    Number,
    String,
}

impl WriteKind {
    pub const ALL: [WriteKind; 3] = [WriteKind::Boolean, WriteKind::Number, WriteKind::String];

    pub fn label(self) -> &'static str {
        match self {
            Self::Boolean => "Boolean",
            Self::Number => "Number",
            Self::String => "String",
        }
    }

    /// Convert operator text into the typed value for this kind.
    pub fn encode(self, raw: &str) -> Result<Scalar, WriteError> {
        let invalid = || WriteError::InvalidValue { raw: raw.to_string(), kind: self };
        match self {
            Self::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => Ok(Scalar::Boolean(true)),
                "false" | "0" | "no" | "off" => Ok(Scalar::Boolean(false)),
                _ => Err(invalid()),
            },
            Self::Number => match raw.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(Scalar::Number(v)),
                _ => Err(invalid()),
            },
            Self::String => Ok(Scalar::String(raw.to_string())),
        }
    }
}

impl fmt::Display for WriteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Boolean(bool),
    Number(f64),
    String(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WriteError {
    #[error("{raw:?} is not a valid {kind} value")]
    InvalidValue { raw: String, kind: WriteKind },
    #[error("not connected to the table service")]
    NotConnected,
    #[error("invalid path {0:?}")]
    InvalidPath(String),
    #[error("table refused write to {path} (existing entry has another type)")]
    Rejected { path: String },
}

/// A validated write, not yet sent. Consumed by [`PendingWrite::send`].
#[derive(Debug, Clone, PartialEq)]
pub struct PendingWrite {
    pub path: String,
    pub raw: String,
    pub kind: WriteKind,
    pub value: Scalar,
}

impl PendingWrite {
    /// Perform exactly one write through `client`. Never retried.
    pub fn send(self, client: &dyn TableClient) -> Result<(), WriteError> {
        let handle = client.entry(&self.path);
        self.send_to(handle.as_ref())
    }

    pub fn send_to(self, handle: &dyn EntryHandle) -> Result<(), WriteError> {
        let accepted = match &self.value {
            Scalar::Boolean(b) => handle.set_boolean(*b),
            Scalar::Number(n) => handle.set_number(*n),
            Scalar::String(s) => handle.set_string(s),
        };
        if !accepted {
            counter!("ntdash_writes_rejected_total", 1);
            return Err(WriteError::Rejected { path: self.path });
        }
        counter!("ntdash_writes_total", 1);
        info!(path = %self.path, kind = %self.kind, value = %self.raw, "bridge: write sent");
        Ok(())
    }
}

pub struct WriteBridge {
    client: Arc<dyn TableClient>,
}

impl WriteBridge {
    pub fn new(client: Arc<dyn TableClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> Arc<dyn TableClient> {
        Arc::clone(&self.client)
    }

    /// Local validation only: path, value encoding, then session state.
    pub fn prepare(&self, path: &str, raw: &str, kind: WriteKind) -> Result<PendingWrite, WriteError> {
        if path.trim().is_empty() {
            return Err(WriteError::InvalidPath(path.to_string()));
        }
        let value = kind.encode(raw)?;
        if !self.client.is_connected() {
            return Err(WriteError::NotConnected);
        }
        debug!(path = %path, kind = %kind, "bridge: write prepared");
        Ok(PendingWrite { path: path.to_string(), raw: raw.to_string(), kind, value })
    }

    pub fn commit(&self, path: &str, raw: &str, kind: WriteKind) -> Result<(), WriteError> {
        self.prepare(path, raw, kind)?.send(self.client.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_booleans_loosely() {
        for t in ["true", "TRUE", " 1 ", "yes", "On"] {
            assert_eq!(WriteKind::Boolean.encode(t).unwrap(), Scalar::Boolean(true), "{t}");
        }
        for f in ["false", "0", "No", "off"] {
            assert_eq!(WriteKind::Boolean.encode(f).unwrap(), Scalar::Boolean(false), "{f}");
        }
        assert!(WriteKind::Boolean.encode("maybe").is_err());
        assert!(WriteKind::Boolean.encode("").is_err());
    }

    #[test]
    fn encodes_numbers() {
        assert_eq!(WriteKind::Number.encode("42").unwrap(), Scalar::Number(42.0));
        assert_eq!(WriteKind::Number.encode(" -0.25 ").unwrap(), Scalar::Number(-0.25));
        assert_eq!(WriteKind::Number.encode("1e3").unwrap(), Scalar::Number(1000.0));
        assert_eq!(
            WriteKind::Number.encode("abc"),
            Err(WriteError::InvalidValue { raw: "abc".into(), kind: WriteKind::Number })
        );
        assert!(WriteKind::Number.encode("NaN").is_err());
        assert!(WriteKind::Number.encode("inf").is_err());
    }

    #[test]
    fn strings_pass_through_untrimmed() {
        assert_eq!(WriteKind::String.encode("  spaced ").unwrap(), Scalar::String("  spaced ".into()));
        assert_eq!(WriteKind::String.encode("").unwrap(), Scalar::String(String::new()));
    }
}
