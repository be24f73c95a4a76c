#![forbid(unsafe_code)]

use tracing::info;

use crate::ConnectionCommand;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    Connected,
    #[default]
    Disconnected,
}

impl ConnectionState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Connected => "Connected",
            Self::Disconnected => "Disconnected",
        }
    }

    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}

/// Two-state connection indicator plus the last metadata string seen.
#[derive(Debug, Default)]
pub struct ConnectionIndicator {
    state: ConnectionState,
    info: String,
    transitions: u64,
}

impl ConnectionIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn info(&self) -> &str {
        &self.info
    }

    /// Number of actual state changes (repeats are not counted).
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Apply a connection notification. Always yields a command, even for a
    /// repeat of the current state; the metadata is refreshed either way.
    pub fn apply(&mut self, connected: bool, info: &str) -> ConnectionCommand {
        info!("{}: Connected={}", info, connected);
        let next = if connected { ConnectionState::Connected } else { ConnectionState::Disconnected };
        if next != self.state {
            self.transitions += 1;
        }
        self.state = next;
        self.info.clear();
        self.info.push_str(info);
        ConnectionCommand { text: next.label(), connected }
    }
}
