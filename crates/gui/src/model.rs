#![forbid(unsafe_code)]

use std::path::PathBuf;
use std::time::Instant;

use ntdash_api::{WriteError, WriteKind};

/// Results of background work, delivered back to the UI thread.
#[derive(Debug)]
pub enum UiUpdate {
    WriteDone { path: String, kind: WriteKind, raw: String },
    WriteFailed { path: String, error: WriteError },
}

/// GUI knobs; the binary fills these from CLI/env.
#[derive(Debug, Clone)]
pub struct GuiConfig {
    pub title: String,
    pub stylesheet: Option<PathBuf>,
    /// Max table events applied per frame.
    pub drain_budget: usize,
    pub idle_repaint_ms: u64,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            title: "NT Dashboard".into(),
            stylesheet: None,
            drain_budget: std::env::var("NTDASH_DRAIN_BUDGET")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(512),
            idle_repaint_ms: std::env::var("NTDASH_IDLE_REPAINT_MS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(250),
        }
    }
}

#[derive(Default)]
pub struct FilterState {
    pub text: String,
    pub error: Option<String>,
}

pub struct WriteState {
    pub path: String,
    pub value: String,
    pub kind: WriteKind,
    pub in_flight: usize,
    pub status: String,
    pub need_focus: bool,
}

impl Default for WriteState {
    fn default() -> Self {
        Self {
            path: String::new(),
            value: String::new(),
            kind: WriteKind::Number,
            in_flight: 0,
            status: String::new(),
            need_focus: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Warn,
    Error,
}

pub struct Toast {
    pub text: String,
    pub kind: ToastKind,
    pub created: Instant,
    pub duration_ms: u64,
    /// Identical messages raised while this one is alive.
    pub repeats: u32,
}
