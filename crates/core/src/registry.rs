//! Key -> row registry.
//!
//! Rows are handed out in first-seen order and never reused: there is no
//! removal, so a row index is simply the entry's position in `rows`.

#![forbid(unsafe_code)]

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::filter::Predicate;
use crate::{RenderCommand, VisibilityCommand};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: String,
    pub row: usize,
    pub visible: bool,
}

#[derive(Debug, Default)]
pub struct EntryRegistry {
    rows: Vec<Entry>,
    index: FxHashMap<String, usize>,
}

impl EntryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn visible_count(&self) -> usize {
        self.rows.iter().filter(|e| e.visible).count()
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.index.get(key).and_then(|&i| self.rows.get(i))
    }

    /// Entries in row order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.rows.iter()
    }

    /// Create-if-absent, otherwise overwrite the value in place.
    ///
    /// `is_new` is the transport's opinion and only used for logging; presence
    /// in the registry decides. Must be called from the UI thread only.
    pub fn upsert(&mut self, key: &str, value: &str, is_new: bool, predicate: &Predicate) -> RenderCommand {
        if let Some(&row) = self.index.get(key) {
            if is_new {
                debug!(key = %key, row, "registry: transport flagged known key as new");
            }
            let entry = &mut self.rows[row];
            entry.value.clear();
            entry.value.push_str(value);
            trace!(key = %key, row, "registry: value updated");
            return RenderCommand::UpdateText { key: key.to_string(), value: value.to_string() };
        }
        let row = self.rows.len();
        let visible = predicate.matches(key);
        self.rows.push(Entry { key: key.to_string(), value: value.to_string(), row, visible });
        self.index.insert(key.to_string(), row);
        debug!(key = %key, row, visible, "registry: row created");
        RenderCommand::Create { row, key: key.to_string(), value: value.to_string(), visible }
    }

    /// Re-evaluate visibility against `predicate`; report only the flips.
    pub fn apply_filter(&mut self, predicate: &Predicate) -> Vec<VisibilityCommand> {
        let mut out = Vec::new();
        for e in self.rows.iter_mut() {
            let visible = predicate.matches(&e.key);
            if visible != e.visible {
                e.visible = visible;
                out.push(VisibilityCommand { key: e.key.clone(), visible });
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_update_in_place() {
        let all = Predicate::match_all();
        let mut reg = EntryRegistry::new();
        assert_eq!(
            reg.upsert("/a", "1", true, &all),
            RenderCommand::Create { row: 0, key: "/a".into(), value: "1".into(), visible: true }
        );
        assert_eq!(
            reg.upsert("/b", "x", true, &all),
            RenderCommand::Create { row: 1, key: "/b".into(), value: "x".into(), visible: true }
        );
        assert_eq!(
            reg.upsert("/a", "2", false, &all),
            RenderCommand::UpdateText { key: "/a".into(), value: "2".into() }
        );
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.get("/a").unwrap().value, "2");
        assert_eq!(reg.get("/a").unwrap().row, 0);
    }

    #[test]
    fn repeated_is_new_does_not_duplicate() {
        let all = Predicate::match_all();
        let mut reg = EntryRegistry::new();
        reg.upsert("/a", "1", true, &all);
        let cmd = reg.upsert("/a", "1", true, &all);
        assert!(matches!(cmd, RenderCommand::UpdateText { .. }));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn new_rows_respect_active_predicate() {
        let p = Predicate::compile("drive").unwrap();
        let mut reg = EntryRegistry::new();
        match reg.upsert("/Vision/targets", "3", true, &p) {
            RenderCommand::Create { visible, .. } => assert!(!visible),
            other => panic!("unexpected {other:?}"),
        }
        match reg.upsert("/Drive/left", "0.5", true, &p) {
            RenderCommand::Create { visible, row, .. } => {
                assert!(visible);
                assert_eq!(row, 1);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(reg.visible_count(), 1);
    }

    #[test]
    fn apply_filter_reports_only_flips() {
        let all = Predicate::match_all();
        let mut reg = EntryRegistry::new();
        for k in ["/Drive/left", "/Drive/right", "/Arm/angle"] {
            reg.upsert(k, "0", true, &all);
        }
        let drive = Predicate::compile("DRIVE").unwrap();
        let flips = reg.apply_filter(&drive);
        assert_eq!(flips, vec![VisibilityCommand { key: "/Arm/angle".into(), visible: false }]);
        // same predicate again: nothing to do
        assert!(reg.apply_filter(&drive).is_empty());
        let back = reg.apply_filter(&all);
        assert_eq!(back, vec![VisibilityCommand { key: "/Arm/angle".into(), visible: true }]);
        // rows untouched by filtering
        let rows: Vec<usize> = reg.iter().map(|e| e.row).collect();
        assert_eq!(rows, vec![0, 1, 2]);
    }
}
