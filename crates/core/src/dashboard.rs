//! UI-thread state: registry + filter + connection indicator.
//!
//! A `Dashboard` is owned by whatever composes the UI and is only ever touched
//! from that thread, so filter application and upserts cannot interleave.

#![forbid(unsafe_code)]

use tracing::debug;

use crate::filter::{FilterEngine, PatternError};
use crate::indicator::ConnectionIndicator;
use crate::marshal::UpdateQueue;
use crate::registry::EntryRegistry;
use crate::{ShellCommand, TableEvent};

#[derive(Debug, Default)]
pub struct Dashboard {
    registry: EntryRegistry,
    filter: FilterEngine,
    indicator: ConnectionIndicator,
    applied: u64,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &EntryRegistry {
        &self.registry
    }

    pub fn filter(&self) -> &FilterEngine {
        &self.filter
    }

    pub fn indicator(&self) -> &ConnectionIndicator {
        &self.indicator
    }

    /// Total events applied since start.
    pub fn applied(&self) -> u64 {
        self.applied
    }

    pub fn apply(&mut self, ev: TableEvent) -> ShellCommand {
        self.applied += 1;
        match ev {
            TableEvent::Entry { key, value, is_new } => {
                self.registry.upsert(&key, &value, is_new, self.filter.predicate()).into()
            }
            TableEvent::Connection { connected, info } => self.indicator.apply(connected, &info).into(),
        }
    }

    /// Drain up to `budget` queued events and return the commands in order.
    pub fn drain(&mut self, queue: &UpdateQueue, budget: usize) -> Vec<ShellCommand> {
        let events = queue.drain(budget);
        if !events.is_empty() {
            debug!(events = events.len(), left = queue.pending(), "dashboard: drained");
        }
        events.into_iter().map(|ev| self.apply(ev)).collect()
    }

    pub fn set_filter(&mut self, text: &str) -> Result<Vec<ShellCommand>, PatternError> {
        let flips = self.filter.set_pattern(text, &mut self.registry)?;
        Ok(flips.into_iter().map(Into::into).collect())
    }

    pub fn clear_filter(&mut self) -> Vec<ShellCommand> {
        self.filter.clear(&mut self.registry).into_iter().map(Into::into).collect()
    }
}
