use anyhow::Context;
use bookscape::app::BookscapeApp;
use bookscape::config::AppConfig;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env(std::env::args().skip(1)).context("resolving configuration")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size(config.min_window_size),
        ..Default::default()
    };

    eframe::run_native(
        "Bookscape Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(BookscapeApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
}
