#![forbid(unsafe_code)]

use eframe::egui;

use crate::NtDashApp;

pub(crate) fn ui_statusbar(app: &mut NtDashApp, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("bottom_bar")
        .default_height(22.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                let reg = app.dash.registry();
                ui.label(format!("keys: {}", reg.len()));
                ui.separator();
                ui.label(format!("visible: {}", reg.visible_count()));
                ui.separator();
                ui.label(format!("updates: {}", app.dash.applied()));
                let pending = app.queue.pending();
                if pending > 0 {
                    ui.separator();
                    ui.colored_label(ui.visuals().warn_fg_color, format!("queued: {}", pending));
                }
                if app.write.in_flight > 0 {
                    ui.separator();
                    ui.label(format!("writes in flight: {}", app.write.in_flight));
                }
                let info = app.dash.indicator().info();
                if !info.is_empty() {
                    ui.separator();
                    ui.label(egui::RichText::new(info).weak());
                }
            });
        });
}
