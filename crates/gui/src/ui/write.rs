#![forbid(unsafe_code)]

use eframe::egui;
use ntdash_api::WriteKind;

use crate::model::ToastKind;
use crate::NtDashApp;

pub(crate) fn ui_write_panel(app: &mut NtDashApp, ctx: &egui::Context) {
    egui::TopBottomPanel::bottom("write_panel").show(ctx, |ui| {
        ui.add_space(4.0);
        let mut submit = false;
        ui.horizontal(|ui| {
            ui.label("Path:");
            let path = ui.add(
                egui::TextEdit::singleline(&mut app.write.path)
                    .hint_text("/SmartDashboard/key")
                    .desired_width(260.0),
            );
            if app.write.need_focus {
                path.request_focus();
                app.write.need_focus = false;
            }
            ui.label("Value:");
            let value = ui.add(egui::TextEdit::singleline(&mut app.write.value).desired_width(180.0));
            if value.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                submit = true;
            }
            egui::ComboBox::from_label("Type")
                .selected_text(app.write.kind.label())
                .show_ui(ui, |ui| {
                    for k in WriteKind::ALL {
                        ui.selectable_value(&mut app.write.kind, k, k.label());
                    }
                });
            let can_send = !app.write.path.trim().is_empty();
            if ui.add_enabled(can_send, egui::Button::new("Set")).clicked() {
                submit = true;
            }
        });
        if !app.write.status.is_empty() {
            ui.label(egui::RichText::new(&app.write.status).weak());
        }
        ui.add_space(2.0);
        if submit {
            app.submit_write();
        }
    });
}

impl NtDashApp {
    /// Validate on the UI thread, send in the background.
    pub(crate) fn submit_write(&mut self) {
        let (path, raw, kind) = (self.write.path.clone(), self.write.value.clone(), self.write.kind);
        match self.bridge.prepare(&path, &raw, kind) {
            Ok(pending) => {
                self.write.status = format!("sending {} = {} ({})…", path, raw, kind);
                self.start_write_task(pending);
            }
            Err(e) => {
                self.write.status = format!("write {} rejected: {}", path, e);
                self.toast(e.to_string(), ToastKind::Warn);
            }
        }
    }

    /// Path selector: clicking a key copies it into the path field.
    pub(crate) fn select_path(&mut self, key: &str) {
        self.write.path = key.to_string();
        if let Some(row) = self.grid.get(key) {
            self.write.value = row.value.clone();
        }
        self.write.need_focus = true;
    }
}
