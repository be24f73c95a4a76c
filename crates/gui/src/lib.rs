#![forbid(unsafe_code)]

use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};

use eframe::egui;
use ntdash_api::{TableClient, WriteBridge};
use ntdash_core::dashboard::Dashboard;
use ntdash_core::marshal::UpdateQueue;
use tracing::info;

mod grid;
mod model;
mod results;
mod style;
mod tasks;
mod ui;

pub use grid::{ConnectionLabel, Grid, RowWidget};
pub use model::{GuiConfig, UiUpdate};
pub use style::{StyleError, Stylesheet, DEFAULT_STYLESHEET};
use model::{FilterState, Toast, WriteState};

/// Launch the dashboard window. Blocks until it is closed.
///
/// `queue` must be the consumer side of the channel the client's listeners
/// were attached to; events queued before the window exists are kept.
pub fn run_native(client: Arc<dyn TableClient>, queue: UpdateQueue, cfg: GuiConfig) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 640.0])
            .with_min_inner_size([520.0, 320.0])
            .with_title(cfg.title.clone()),
        ..Default::default()
    };
    let title = cfg.title.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            let ctx = cc.egui_ctx.clone();
            queue.attach_waker(move || ctx.request_repaint());
            Ok(Box::new(NtDashApp::new(client, queue, cfg, &cc.egui_ctx)))
        }),
    )
}

pub struct NtDashApp {
    bridge: WriteBridge,
    queue: UpdateQueue,
    dash: Dashboard,
    grid: Grid,
    style: Stylesheet,
    filter: FilterState,
    write: WriteState,
    updates_tx: mpsc::Sender<UiUpdate>,
    updates_rx: mpsc::Receiver<UiUpdate>,
    toasts: Vec<Toast>,
    cfg: GuiConfig,
    last_activity: Option<Instant>,
}

impl NtDashApp {
    pub fn new(client: Arc<dyn TableClient>, queue: UpdateQueue, cfg: GuiConfig, ctx: &egui::Context) -> Self {
        info!(pending = queue.pending(), "ntdash gui starting");
        let style = Stylesheet::load_or_default(cfg.stylesheet.as_deref());
        style.apply(ctx);
        let (updates_tx, updates_rx) = mpsc::channel::<UiUpdate>();
        Self {
            bridge: WriteBridge::new(client),
            queue,
            dash: Dashboard::new(),
            grid: Grid::new(),
            style,
            filter: FilterState::default(),
            write: WriteState::default(),
            updates_tx,
            updates_rx,
            toasts: Vec::new(),
            cfg,
            last_activity: None,
        }
    }
}

impl eframe::App for NtDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply table events and background results before drawing anything
        ui::updates::process_table_events(self, ctx);
        ui::updates::process_ui_updates(self);

        ui::topbar::ui_topbar(self, ctx);
        ui::statusbar::ui_statusbar(self, ctx);
        ui::write::ui_write_panel(self, ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            self.ui_results(ui);
        });
        ui::toasts::draw_toasts(self, ctx);

        let busy = self.last_activity.map(|t| t.elapsed() < Duration::from_secs(1)).unwrap_or(false);
        if busy || !self.toasts.is_empty() || self.write.in_flight > 0 {
            ctx.request_repaint_after(Duration::from_millis(50));
        } else {
            ctx.request_repaint_after(Duration::from_millis(self.cfg.idle_repaint_ms));
        }
    }
}
