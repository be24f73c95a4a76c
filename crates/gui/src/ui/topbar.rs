#![forbid(unsafe_code)]

use eframe::egui;

use crate::NtDashApp;

pub(crate) fn ui_topbar(app: &mut NtDashApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
        ui_connection_row(app, ui);
        ui.separator();
        ui_filter_row(app, ui);
        ui.add_space(2.0);
    });
}

fn ui_connection_row(app: &mut NtDashApp, ui: &mut egui::Ui) {
    let label = app.grid.connection().clone();
    let color = app.style.connection_color(label.connected);
    ui.horizontal(|ui| {
        ui.label("Connection Status");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let info = app.dash.indicator().info();
            let resp = ui.label(egui::RichText::new(label.text).strong().color(color));
            if !info.is_empty() {
                resp.on_hover_text(info);
            }
        });
    });
}

fn ui_filter_row(app: &mut NtDashApp, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.label("Filter:");
        let te = egui::TextEdit::singleline(&mut app.filter.text)
            .hint_text("regex over keys, case-insensitive")
            .desired_width(320.0);
        let resp = ui.add(te);
        // TextEdit gives up focus on Escape, so check for the key after the fact
        let escaped = escape_pressed(&resp, ui);
        let cleared = ui.button("×").on_hover_text("Clear filter").clicked();
        if escaped || cleared {
            app.reset_filter();
        } else if resp.changed() {
            app.commit_filter();
        }
        if let Some(err) = &app.filter.error {
            ui.separator();
            ui.colored_label(ui.visuals().error_fg_color, err.as_str());
        }
    });
}

pub(crate) fn escape_pressed(resp: &egui::Response, ui: &egui::Ui) -> bool {
    resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Escape))
}

impl NtDashApp {
    /// Swap in the typed pattern. A bad pattern keeps the previous filter and
    /// only surfaces the error next to the box.
    pub(crate) fn commit_filter(&mut self) {
        match self.dash.set_filter(&self.filter.text) {
            Ok(cmds) => {
                self.filter.error = None;
                for c in cmds {
                    self.grid.apply(c);
                }
            }
            Err(e) => {
                self.filter.error = Some(e.source.to_string().lines().last().unwrap_or("invalid pattern").to_string());
            }
        }
    }

    /// Back to match-all, emptying the box and any pending error.
    pub(crate) fn reset_filter(&mut self) {
        self.filter.text.clear();
        self.filter.error = None;
        for c in self.dash.clear_filter() {
            self.grid.apply(c);
        }
    }
}
