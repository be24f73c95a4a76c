//! ntdash core types
//!
//! Everything in here is transport- and toolkit-agnostic: the table client
//! pushes [`TableEvent`]s through the [`marshal`] queue, the UI thread applies
//! them to a [`dashboard::Dashboard`], and the resulting [`ShellCommand`]s are
//! handed to whatever renders the grid.

#![forbid(unsafe_code)]

pub mod dashboard;
pub mod filter;
pub mod indicator;
pub mod marshal;
pub mod registry;

/// Notification produced on the table client's thread.
///
/// Values are already rendered to their display string; nothing fallible
/// crosses the hand-off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableEvent {
    Connection { connected: bool, info: String },
    Entry { key: String, value: String, is_new: bool },
}

/// Result of an upsert: either a fresh row or a text update for an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCommand {
    Create { row: usize, key: String, value: String, visible: bool },
    UpdateText { key: String, value: String },
}

/// Emitted for every entry whose visibility flipped after a filter change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityCommand {
    pub key: String,
    pub visible: bool,
}

/// Text and style flag for the connection label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionCommand {
    pub text: &'static str,
    pub connected: bool,
}

/// Everything the presentation shell has to understand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    CreateRow { row: usize, key: String, value: String, visible: bool },
    UpdateText { key: String, text: String },
    SetVisible { key: String, visible: bool },
    SetConnection { text: &'static str, connected: bool },
}

impl From<RenderCommand> for ShellCommand {
    fn from(c: RenderCommand) -> Self {
        match c {
            RenderCommand::Create { row, key, value, visible } => ShellCommand::CreateRow { row, key, value, visible },
            RenderCommand::UpdateText { key, value } => ShellCommand::UpdateText { key, text: value },
        }
    }
}

impl From<VisibilityCommand> for ShellCommand {
    fn from(c: VisibilityCommand) -> Self {
        ShellCommand::SetVisible { key: c.key, visible: c.visible }
    }
}

impl From<ConnectionCommand> for ShellCommand {
    fn from(c: ConnectionCommand) -> Self {
        ShellCommand::SetConnection { text: c.text, connected: c.connected }
    }
}

pub mod prelude {
    pub use super::dashboard::Dashboard;
    pub use super::filter::{FilterEngine, PatternError, Predicate};
    pub use super::indicator::{ConnectionIndicator, ConnectionState};
    pub use super::marshal::{channel, UpdateQueue, UpdateSender};
    pub use super::registry::{Entry, EntryRegistry};
    pub use super::{ConnectionCommand, RenderCommand, ShellCommand, TableEvent, VisibilityCommand};
}
