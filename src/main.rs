mod app;
mod canvas;
#[cfg(test)]
mod fixtures;
mod instrument;
mod scanner;
mod store;
mod ui_state;
mod utils;

use anyhow::{anyhow, Result};
use app::CatalogApp;
use eframe::egui;
use utils::config::Config;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    let app = CatalogApp::new(config)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Instrument Catalog",
        options,
        Box::new(|_cc| Box::new(app)),
    )
    .map_err(|e| anyhow!("Failed to start the window: {}", e))
}
