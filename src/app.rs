use eframe::egui;

use crate::config::Config;
use crate::fetch::Fetcher;
use crate::fonts;
use crate::state::AppState;
use crate::ui::{panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ScoreExplorerApp {
    pub state: AppState,
    fetcher: Fetcher,
}

impl ScoreExplorerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        fonts::install_cjk_font(&cc.egui_ctx, config.font_path.as_deref());

        let mut state = AppState::new(config);
        state.select_initial_year();
        Self {
            state,
            fetcher: Fetcher::default(),
        }
    }

    /// Start the queued year fetch, if any.
    fn dispatch_pending(&mut self, ctx: &egui::Context) {
        if let Some(request) = self.state.take_pending_load() {
            self.fetcher
                .spawn(self.state.source.clone(), request, Some(ctx.clone()));
        }
    }
}

impl eframe::App for ScoreExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Some(outcome) = self.fetcher.poll() {
            self.state.apply_load(outcome);
        }
        self.dispatch_pending(ctx);

        // ---- Top panel: menu bar, year, search ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Info strip: score lines ----
        egui::TopBottomPanel::top("info_bar").show(ctx, |ui| {
            panels::info_bar(ui, &self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: results ----
        egui::CentralPanel::default().show(ctx, |ui| {
            table::results_table(ui, &self.state);
        });

        // Year picked this frame.
        self.dispatch_pending(ctx);
    }
}
