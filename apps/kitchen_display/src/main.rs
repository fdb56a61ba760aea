use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    run_board, websocket_url, BoardCommand, BoardController, DisplaySurface, HttpOrdersApi,
    Locale, PushChannel, RuntimeOptions,
};
use shared::domain::Filter;
use tokio::{
    io::{self, BufReader},
    sync::mpsc,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod input;
mod surface;

use config::{load_settings, Settings};
use surface::{HtmlFileSurface, TerminalSurface};

#[derive(Parser, Debug)]
#[command(about = "Live kitchen order board")]
struct Args {
    #[arg(long)]
    server_url: Option<String>,
    /// all, pending, received, cooking, ready or completed
    #[arg(long)]
    filter: Option<Filter>,
    /// zh-TW or en
    #[arg(long)]
    locale: Option<Locale>,
    /// Also keep an HTML rendition of the board at this path.
    #[arg(long)]
    html_out: Option<PathBuf>,
    /// Delete orders without asking.
    #[arg(long)]
    assume_yes: bool,
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Args {
    fn apply(self, mut settings: Settings) -> Settings {
        if let Some(v) = self.server_url {
            settings.server_url = v;
        }
        if let Some(v) = self.filter {
            settings.filter = v;
        }
        if let Some(v) = self.locale {
            settings.locale = v;
        }
        if self.html_out.is_some() {
            settings.html_out = self.html_out;
        }
        settings.assume_yes |= self.assume_yes;
        settings
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = Args::parse();
    let settings = load_settings(args.config.take());
    let settings = args.apply(settings);
    let ws_url = websocket_url(&settings.server_url)
        .with_context(|| format!("invalid server url '{}'", settings.server_url))?;
    info!(
        server_url = %settings.server_url,
        filter = %settings.filter,
        locale = %settings.locale,
        "kitchen display starting"
    );

    let mut surfaces: Vec<Box<dyn DisplaySurface>> =
        vec![Box::new(TerminalSurface::new(settings.locale))];
    if let Some(path) = settings.html_out.clone() {
        info!(path = %path.display(), "writing html board");
        surfaces.push(Box::new(HtmlFileSurface::new(path, settings.locale)));
    }

    let mut controller = BoardController::new(
        HttpOrdersApi::new(settings.server_url.clone()),
        Box::new(surfaces),
        settings.locale,
        settings.filter,
    )
    .with_confirmation_timeout(settings.confirmation_timeout());

    let (channel_tx, channel_rx) = mpsc::channel(256);
    let push_task = PushChannel::new(ws_url)
        .with_reconnect_delay(settings.reconnect_delay())
        .spawn(channel_tx);

    let (command_tx, command_rx) = mpsc::channel(32);
    let input_task = tokio::spawn(input::read_commands(
        BufReader::new(io::stdin()),
        io::stderr(),
        command_tx.clone(),
        settings.locale,
        settings.assume_yes,
    ));
    let signal_task = tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = command_tx.send(BoardCommand::Shutdown).await;
            }
            Err(err) => warn!(error = %err, "cannot listen for ctrl-c"),
        }
    });

    let options = RuntimeOptions {
        reload_interval: settings.reload_interval(),
        ..RuntimeOptions::default()
    };
    run_board(&mut controller, channel_rx, command_rx, options).await;

    push_task.abort();
    input_task.abort();
    signal_task.abort();
    info!("kitchen display stopped");
    // A pending stdin read keeps the blocking pool, and so the runtime, alive.
    std::process::exit(0)
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
