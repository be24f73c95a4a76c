#![forbid(unsafe_code)]

use std::time::Instant;

use eframe::egui;
use metrics::{counter, histogram};
use tracing::debug;

use crate::model::ToastKind;
use crate::{NtDashApp, UiUpdate};

/// Drain the marshaller inside the frame. Bounded by the drain budget; if
/// anything is left we ask for another frame right away.
pub(crate) fn process_table_events(app: &mut NtDashApp, ctx: &egui::Context) {
    let t0 = Instant::now();
    let cmds = app.dash.drain(&app.queue, app.cfg.drain_budget);
    if cmds.is_empty() {
        return;
    }
    let n = cmds.len();
    for cmd in cmds {
        app.grid.apply(cmd);
    }
    app.last_activity = Some(Instant::now());
    counter!("ntdash_ui_events_applied_total", n as u64);
    histogram!("ntdash_ui_drain_ms", t0.elapsed().as_secs_f64() * 1000.0);
    let left = app.queue.pending();
    if left > 0 {
        debug!(applied = n, left, "ui: drain budget hit");
        ctx.request_repaint();
    }
}

pub(crate) fn process_ui_updates(app: &mut NtDashApp) {
    let mut toasts = Vec::new();
    while let Ok(u) = app.updates_rx.try_recv() {
        app.write.in_flight = app.write.in_flight.saturating_sub(1);
        match u {
            UiUpdate::WriteDone { path, kind, raw } => {
                app.write.status = format!("wrote {} = {} ({})", path, raw, kind);
                toasts.push((format!("{} = {}", path, raw), ToastKind::Success));
            }
            UiUpdate::WriteFailed { path, error } => {
                app.write.status = format!("write {} failed: {}", path, error);
                toasts.push((format!("{}", error), ToastKind::Error));
            }
        }
    }
    for (text, kind) in toasts {
        app.toast(text, kind);
    }
}
