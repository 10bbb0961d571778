mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;
mod volcano;

use std::path::PathBuf;

use anyhow::Context;
use app::TimecourseApp;
use config::DashboardConfig;
use eframe::egui;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::discover(std::env::args_os().nth(1).map(PathBuf::from))
        .context("loading dashboard configuration")?;
    log::info!("Reading data from {}", config.data_dir.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "RNA Timecourse Viewer",
        options,
        Box::new(move |cc| {
            // Install image loaders so egui can render the UMAP pngs.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(TimecourseApp::new(&cc.egui_ctx, config)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("running the viewer: {e}"))
}
