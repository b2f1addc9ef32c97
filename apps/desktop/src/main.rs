use std::{collections::BTreeMap, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{load_settings, CountryClient, DisplaySurface, LookupController};
use shared::domain::{DisplayField, FlagRef};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "country-lookup", about = "Look up a country by name")]
struct Args {
    /// Country name; several words are joined with spaces.
    query: Vec<String>,
    #[arg(long)]
    api_base_url: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
    /// Print the display state as JSON instead of text.
    #[arg(long)]
    json: bool,
}

/// Collects rendered fields and prints them in panel order.
#[derive(Debug, Default)]
struct TerminalSurface {
    fields: BTreeMap<&'static str, String>,
    flag: Option<FlagRef>,
    flag_visible: bool,
}

impl DisplaySurface for TerminalSurface {
    fn set_field(&mut self, field: DisplayField, value: &str) {
        self.fields.insert(field.element_id(), value.to_string());
    }

    fn set_flag_visible(&mut self, visible: bool) {
        self.flag_visible = visible;
    }

    fn set_flag_source(&mut self, flag: &FlagRef) {
        self.flag = Some(flag.clone());
    }

    fn set_info_visible(&mut self, _visible: bool) {}
}

impl TerminalSurface {
    fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let error = self.value(DisplayField::ErrorMessage);
        if !error.is_empty() {
            lines.push(format!("error: {error}"));
            return lines;
        }

        for field in DisplayField::COUNTRY {
            let value = self.value(field);
            if !value.is_empty() {
                lines.push(value.to_string());
            }
        }
        if let (true, Some(flag)) = (self.flag_visible, &self.flag) {
            lines.push(format!("Flag: {}", flag.svg_url));
        }
        lines
    }

    fn value(&self, field: DisplayField) -> &str {
        self.fields
            .get(field.element_id())
            .map(String::as_str)
            .unwrap_or("")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = load_settings(args.config.as_deref()).with_api_base_url(args.api_base_url);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let api_base_url = settings
        .validated_api_base_url()
        .context("invalid country api configuration")?;
    tracing::debug!(api_base_url = %api_base_url, "using country api");
    let controller = LookupController::new(CountryClient::new(api_base_url))
        .with_grouping_separator(settings.grouping_separator);

    let mut surface = TerminalSurface::default();
    let completed = controller
        .lookup_and_render(&args.query.join(" "), &mut surface)
        .await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&completed.state)?);
    } else {
        for line in surface.lines() {
            println!("{line}");
        }
    }

    Ok(())
}
