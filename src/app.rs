use eframe::egui;

use crate::config::AppConfig;
use crate::state::AppState;
use crate::ui::{panels, results};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct BookscapeApp {
    pub state: AppState,
}

impl BookscapeApp {
    /// Build the app, opening the configured snapshot if there is one.
    pub fn new(config: AppConfig) -> Self {
        let mut state = AppState::new(config.query_params);
        if let Some(path) = &config.snapshot {
            state.load(path);
        }
        Self { state }
    }
}

impl Default for BookscapeApp {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl eframe::App for BookscapeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: analytics + search ----
        egui::CentralPanel::default().show(ctx, |ui| {
            results::central_panel(ui, &mut self.state);
        });
    }
}
