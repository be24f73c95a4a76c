#![forbid(unsafe_code)]

use eframe::egui;
use std::time::Instant;

use crate::model::{Toast, ToastKind};
use crate::NtDashApp;

const MAX_TOASTS: usize = 4;

impl NtDashApp {
    /// Queue a transient message. A repeat of the newest live toast bumps its
    /// counter and restarts its timer instead of stacking.
    pub(crate) fn toast(&mut self, text: impl Into<String>, kind: ToastKind) {
        let text = text.into();
        let duration_ms = match kind {
            ToastKind::Error => 5000,
            ToastKind::Warn => 4000,
            ToastKind::Success => 2000,
        };
        if let Some(last) = self.toasts.last_mut() {
            if last.kind == kind && last.text == text {
                last.repeats += 1;
                last.created = Instant::now();
                return;
            }
        }
        self.toasts.push(Toast { text, kind, created: Instant::now(), duration_ms, repeats: 0 });
        if self.toasts.len() > MAX_TOASTS {
            let excess = self.toasts.len() - MAX_TOASTS;
            self.toasts.drain(..excess);
        }
    }
}

pub(crate) fn draw_toasts(app: &mut NtDashApp, ctx: &egui::Context) {
    let now = Instant::now();
    app.toasts.retain(|t| now.duration_since(t.created).as_millis() < t.duration_ms as u128);
    if app.toasts.is_empty() {
        return;
    }
    let ok = app.style.connection_color(true);
    let bad = app.style.connection_color(false);
    // keep clear of the write panel and status bar
    egui::Area::new(egui::Id::new("ntdash_toasts"))
        .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-12.0, -84.0))
        .show(ctx, |ui| {
            ui.spacing_mut().item_spacing.y = 4.0;
            for t in app.toasts.iter() {
                let (accent, prefix) = match t.kind {
                    ToastKind::Success => (ok, "✔"),
                    ToastKind::Warn => (ui.visuals().warn_fg_color, "⚠"),
                    ToastKind::Error => (bad, "✖"),
                };
                let mut line = format!("{} {}", prefix, t.text);
                if t.repeats > 0 {
                    line.push_str(&format!(" (x{})", t.repeats + 1));
                }
                egui::Frame::new()
                    .fill(ui.visuals().extreme_bg_color)
                    .stroke(egui::Stroke::new(1.5, accent))
                    .corner_radius(4)
                    .inner_margin(egui::Margin::symmetric(8, 5))
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(line).color(accent));
                    });
            }
        });
}
