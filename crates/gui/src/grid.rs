//! Widget-side mirror of the registry.
//!
//! The grid never decides anything: it only applies [`ShellCommand`]s. Rows
//! are keyed by the same key the registry uses and kept in row order.

#![forbid(unsafe_code)]

use std::collections::HashMap;
use std::time::Instant;

use ntdash_core::ShellCommand;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct RowWidget {
    pub row: usize,
    pub key: String,
    pub value: String,
    pub visible: bool,
    pub changed_at: Instant,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionLabel {
    pub text: &'static str,
    pub connected: bool,
}

impl Default for ConnectionLabel {
    fn default() -> Self {
        Self { text: "Disconnected", connected: false }
    }
}

#[derive(Debug, Default)]
pub struct Grid {
    rows: Vec<RowWidget>,
    index: HashMap<String, usize>,
    connection: ConnectionLabel,
    // positions into `rows` of visible widgets; rebuilt lazily
    visible: Vec<usize>,
    visible_dirty: bool,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn connection(&self) -> &ConnectionLabel {
        &self.connection
    }

    pub fn get(&self, key: &str) -> Option<&RowWidget> {
        self.index.get(key).and_then(|&i| self.rows.get(i))
    }

    pub fn row(&self, pos: usize) -> Option<&RowWidget> {
        self.rows.get(pos)
    }

    pub fn apply(&mut self, cmd: ShellCommand) {
        match cmd {
            ShellCommand::CreateRow { row, key, value, visible } => {
                if self.index.contains_key(&key) {
                    warn!(key = %key, "grid: create for existing row, treating as update");
                    self.set_text(&key, value);
                    return;
                }
                if row != self.rows.len() {
                    warn!(key = %key, row, len = self.rows.len(), "grid: row out of sequence");
                }
                let pos = self.rows.partition_point(|r| r.row < row);
                self.rows.insert(pos, RowWidget { row, key, value, visible, changed_at: Instant::now() });
                if pos + 1 != self.rows.len() {
                    for (i, r) in self.rows.iter().enumerate().skip(pos) {
                        self.index.insert(r.key.clone(), i);
                    }
                } else {
                    self.index.insert(self.rows[pos].key.clone(), pos);
                }
                self.visible_dirty = true;
            }
            ShellCommand::UpdateText { key, text } => self.set_text(&key, text),
            ShellCommand::SetVisible { key, visible } => match self.index.get(&key) {
                Some(&i) => {
                    self.rows[i].visible = visible;
                    self.visible_dirty = true;
                }
                None => warn!(key = %key, "grid: visibility for unknown row"),
            },
            ShellCommand::SetConnection { text, connected } => {
                self.connection = ConnectionLabel { text, connected };
            }
        }
    }

    fn set_text(&mut self, key: &str, text: String) {
        match self.index.get(key) {
            Some(&i) => {
                let r = &mut self.rows[i];
                r.value = text;
                r.changed_at = Instant::now();
            }
            None => warn!(key = %key, "grid: text update for unknown row"),
        }
    }

    /// Positions of visible rows, in row order.
    pub fn visible(&mut self) -> &[usize] {
        if self.visible_dirty {
            self.visible = self.rows.iter().enumerate().filter(|(_, r)| r.visible).map(|(i, _)| i).collect();
            self.visible_dirty = false;
        }
        &self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(row: usize, key: &str, value: &str, visible: bool) -> ShellCommand {
        ShellCommand::CreateRow { row, key: key.into(), value: value.into(), visible }
    }

    #[test]
    fn applies_create_update_and_visibility() {
        let mut g = Grid::new();
        g.apply(create(0, "/a", "1", true));
        g.apply(create(1, "/b", "2", false));
        g.apply(ShellCommand::UpdateText { key: "/a".into(), text: "3".into() });
        assert_eq!(g.get("/a").unwrap().value, "3");
        assert_eq!(g.visible(), &[0]);
        g.apply(ShellCommand::SetVisible { key: "/b".into(), visible: true });
        assert_eq!(g.visible(), &[0, 1]);
        g.apply(ShellCommand::SetVisible { key: "/a".into(), visible: false });
        assert_eq!(g.visible(), &[1]);
    }

    #[test]
    fn connection_label_follows_commands() {
        let mut g = Grid::new();
        assert_eq!(g.connection(), &ConnectionLabel { text: "Disconnected", connected: false });
        g.apply(ShellCommand::SetConnection { text: "Connected", connected: true });
        assert!(g.connection().connected);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let mut g = Grid::new();
        g.apply(ShellCommand::UpdateText { key: "/nope".into(), text: "x".into() });
        g.apply(ShellCommand::SetVisible { key: "/nope".into(), visible: false });
        assert!(g.is_empty());
    }

    #[test]
    fn duplicate_create_becomes_update() {
        let mut g = Grid::new();
        g.apply(create(0, "/a", "1", true));
        g.apply(create(1, "/a", "2", true));
        assert_eq!(g.len(), 1);
        assert_eq!(g.get("/a").unwrap().value, "2");
    }

    #[test]
    fn out_of_sequence_rows_stay_ordered() {
        let mut g = Grid::new();
        g.apply(create(2, "/c", "", true));
        g.apply(create(0, "/a", "", true));
        g.apply(create(1, "/b", "", true));
        let keys: Vec<&str> = (0..g.len()).map(|i| g.row(i).unwrap().key.as_str()).collect();
        assert_eq!(keys, ["/a", "/b", "/c"]);
        assert_eq!(g.get("/c").unwrap().row, 2);
    }
}
