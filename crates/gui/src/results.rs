#![forbid(unsafe_code)]

use eframe::egui;
use egui_table::{CellInfo, Column, HeaderCellInfo, HeaderRow, Table, TableDelegate};

use super::NtDashApp;

const HEADERS: [&str; 2] = ["Key", "Value"];

impl NtDashApp {
    pub(crate) fn ui_results(&mut self, ui: &mut egui::Ui) {
        let total = self.grid.len();
        let visible_ix = self.grid.visible().to_vec();
        ui.horizontal(|ui| {
            ui.heading("Entries");
            ui.separator();
            ui.label(format!("Showing {} of {}", visible_ix.len(), total));
        });
        if total == 0 {
            ui.add_space(8.0);
            let hint = if self.grid.connection().connected { "Waiting for entries…" } else { "Not connected" };
            ui.label(egui::RichText::new(hint).italics().weak());
            return;
        }
        if visible_ix.is_empty() {
            ui.add_space(8.0);
            ui.label(egui::RichText::new("No matches").italics().weak());
            return;
        }
        let cols = vec![
            Column::new(self.style.key_width).resizable(true),
            Column::new(self.style.value_width).resizable(true),
        ];
        let rows_len = visible_ix.len() as u64;
        let mut delegate = EntriesDelegate { app: self, visible_ix };
        Table::new()
            .id_salt("entries_table")
            .headers(vec![HeaderRow::new(20.0)])
            .num_rows(rows_len)
            .columns(cols)
            .show(ui, &mut delegate);
    }
}

struct EntriesDelegate<'a> {
    app: &'a mut NtDashApp,
    visible_ix: Vec<usize>,
}

impl<'a> TableDelegate for EntriesDelegate<'a> {
    fn prepare(&mut self, _info: &egui_table::PrefetchInfo) {}

    fn header_cell_ui(&mut self, ui: &mut egui::Ui, cell: &HeaderCellInfo) {
        if cell.row_nr != 0 {
            return;
        }
        let rect = ui.max_rect();
        let bg = ui.visuals().widgets.inactive.bg_fill;
        ui.painter().rect_filled(rect, 0.0, bg);
        let col_idx = cell.col_range.start as usize;
        if let Some(label) = HEADERS.get(col_idx) {
            ui.add_space(2.0);
            ui.label(egui::RichText::new(*label).strong());
        }
    }

    fn cell_ui(&mut self, ui: &mut egui::Ui, cell: &CellInfo) {
        let idx = cell.row_nr as usize;
        let Some(&pos) = self.visible_ix.get(idx) else { return };
        let Some(row) = self.app.grid.row(pos) else { return };
        let (key, value) = (row.key.clone(), row.value.clone());
        if self.app.style.zebra && idx % 2 == 0 {
            let rect = ui.max_rect();
            ui.painter().rect_filled(rect, 0.0, ui.visuals().faint_bg_color);
        }
        match cell.col_nr as usize {
            0 => {
                let selected = self.app.write.path == key;
                let mut text = egui::RichText::new(&key);
                if self.app.style.monospace_keys {
                    text = text.monospace();
                }
                let resp = ui.selectable_label(selected, text).on_hover_text("Copy key into the write path");
                if resp.clicked() {
                    self.app.select_path(&key);
                }
            }
            _ => {
                ui.label(egui::RichText::new(value).monospace());
            }
        }
    }

    fn default_row_height(&self) -> f32 {
        self.app.style.row_height
    }
}
