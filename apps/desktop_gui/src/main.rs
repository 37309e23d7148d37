use std::path::PathBuf;

mod backend_bridge;
mod controller;
mod ui;

use anyhow::Context as _;
use clap::Parser;
use client_core::config::load_settings;
use crossbeam_channel::bounded;
use tracing_subscriber::EnvFilter;

use backend_bridge::commands::BackendCommand;
use controller::{events::UiEvent, AppController};
use ui::{DesktopGuiApp, StartupConfig};

#[derive(Parser, Debug)]
#[command(about = "Type a money expression, see it converted")]
struct Args {
    /// Base URL of the conversion service.
    #[arg(long)]
    server_url: Option<String>,
    /// Per-request timeout; 0 disables it.
    #[arg(long)]
    timeout_ms: Option<u64>,
    /// TOML config file (defaults to ./money.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Convert this text as soon as the window opens.
    #[arg(long)]
    input: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let settings = load_settings(args.config.as_deref())
        .context("failed to load settings")?
        .with_overrides(args.server_url, args.timeout_ms);
    tracing::info!(server_url = %settings.server_url, "starting desktop client");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    let _worker = backend_bridge::runtime::launch(&settings, cmd_rx, ui_tx);

    let controller = AppController::new(cmd_tx, ui_rx);
    let startup = StartupConfig {
        server_url: settings.server_url.clone(),
        initial_input: args.input,
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Money")
            .with_inner_size([640.0, 260.0])
            .with_min_inner_size([420.0, 200.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Money",
        options,
        Box::new(move |_cc| Ok(Box::new(DesktopGuiApp::bootstrap(controller, startup)))),
    )
    .map_err(|err| anyhow::anyhow!("failed to open window: {err}"))
}
