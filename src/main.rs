mod app;
mod color;
mod config;
mod data;
mod error;
mod selection;
mod state;
mod ui;

use std::path::Path;

use app::StudentLensApp;
use config::ViewerConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = ViewerConfig::load(Path::new(config::CONFIG_FILE));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config::WINDOW_SIZE)
            .with_min_inner_size(config::MIN_WINDOW_SIZE),
        ..Default::default()
    };

    eframe::run_native(
        config::APP_TITLE,
        options,
        Box::new(|cc| {
            ui::fonts::install_cjk_font(&cc.egui_ctx);
            Ok(Box::new(StudentLensApp::new(config)))
        }),
    )
}
