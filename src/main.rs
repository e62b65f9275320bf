//! Likert Dashboard - Questionnaire Data Visualization
//!
//! Loads a CSV or Excel questionnaire and shows the answer distribution,
//! proportions, per-question distribution, mean scores and sentiment buckets.

mod charts;
mod config;
mod dashboard;
mod data;
mod gui;
mod stats;

use anyhow::{anyhow, Context};
use clap::Parser;
use config::{Args, DashboardConfig};
use eframe::egui;
use gui::DashboardApp;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = DashboardConfig::resolve(&args).context("failed to load configuration")?;
    log::debug!("Configuration: {:?}", config);
    let startup_file = args.file.clone().map(|path| (path, args.format));

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("Likert Dashboard"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Likert Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, config, startup_file)))),
    )
    .map_err(|e| anyhow!("dashboard window failed: {e}"))
}
