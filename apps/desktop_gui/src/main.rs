use std::{path::PathBuf, sync::Arc};

mod backend_bridge;
mod controller;
mod media;
mod ui;

use anyhow::{anyhow, Context};
use clap::Parser;
use client_core::{load_settings, CountryClient, LookupController};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::{commands::BackendCommand, runtime};
use crate::controller::events::UiEvent;
use crate::ui::CountryLookupApp;

#[derive(Parser, Debug)]
#[command(name = "desktop_gui", about = "Country lookup desktop window")]
struct Args {
    #[arg(long)]
    api_base_url: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = load_settings(args.config.as_deref()).with_api_base_url(args.api_base_url);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .init();

    let api_base_url = settings
        .validated_api_base_url()
        .context("invalid country api configuration")?;
    let controller = Arc::new(
        LookupController::new(CountryClient::new(api_base_url))
            .with_grouping_separator(settings.grouping_separator),
    );

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    runtime::launch(cmd_rx, ui_tx, Arc::clone(&controller));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Country Explorer")
            .with_inner_size([720.0, 520.0])
            .with_min_inner_size([480.0, 360.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Country Explorer",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(CountryLookupApp::bootstrap(
                cmd_tx, ui_rx, controller,
            )))
        }),
    )
    .map_err(|err| anyhow!("desktop window failed: {err}"))
}
