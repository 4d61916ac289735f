use std::{path::PathBuf, sync::Arc};

mod backend_bridge;
mod controller;
mod ui;

use anyhow::Context as _;
use clap::Parser;
use client_core::{load_settings, HttpScoringClient};
use crossbeam_channel::bounded;
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::{HmpiCalculatorApp, StartupConfig};

#[derive(Debug, Parser)]
#[command(name = "hmpi-desktop", about = "Heavy metal pollution indices calculator")]
struct Args {
    /// Base URL of the scoring service; overrides config and environment.
    #[arg(long)]
    scoring_url: Option<String>,
    /// Settings file (defaults to ./hmpi.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args = Args::parse();
    let settings = load_settings(args.config.as_deref())
        .context("failed to load settings")?
        .with_scoring_url(args.scoring_url);
    let endpoint = settings
        .calculate_endpoint()
        .context("invalid scoring service url")?;
    tracing::info!(%endpoint, "using scoring service");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    let _worker = backend_bridge::runtime::launch(
        cmd_rx,
        ui_tx,
        Arc::new(HttpScoringClient::new(endpoint)),
    );

    let startup = StartupConfig {
        scoring_url: settings.scoring_url.clone(),
    };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("HMPI Calculator")
            .with_inner_size([760.0, 860.0])
            .with_min_inner_size([660.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "HMPI Calculator",
        options,
        Box::new(|_cc| Ok(Box::new(HmpiCalculatorApp::new(cmd_tx, ui_rx, startup)))),
    )
    .map_err(|err| anyhow::anyhow!("desktop window failed: {err}"))
}
