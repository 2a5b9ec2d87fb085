//! Faculty Loadings - Course load dashboard
//!
//! Loads the Fall and Spring section rosters, aggregates enrollment by
//! department and instructor, and exports instructor data as CSV.

mod auth;
mod charts;
mod config;
mod data;
mod gui;
mod stats;

use anyhow::anyhow;
use auth::LocalIdentity;
use config::AppConfig;
use eframe::egui;
use gui::LoadingsApp;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let (config, source) = AppConfig::load()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &source {
        Some(path) => info!(path = %path.display(), "loaded configuration"),
        None => warn!("no configuration file found, using defaults"),
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.ui.window_width, config.ui.window_height])
            .with_min_inner_size([1000.0, 650.0])
            .with_title("Faculty Loadings"),
        ..Default::default()
    };

    let identity = Box::new(LocalIdentity::new(config.auth.display_name.clone()));

    eframe::run_native(
        "Faculty Loadings",
        options,
        Box::new(|cc| Ok(Box::new(LoadingsApp::new(cc, config, identity)))),
    )
    .map_err(|e| anyhow!("failed to run dashboard: {e}"))
}
