use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

use touchpanel::{config::Config, net::ConnectionManager, surface::TextSurface, App, PanelEvent};

#[derive(Parser, Debug)]
#[command(name = "touchpanel")]
#[command(about = "Touch control panel client for a server-defined button grid")]
#[command(version)]
struct Cli {
    /// Server host (overrides the config file)
    #[arg(long)]
    host: Option<String>,

    /// Server websocket port (overrides the config file)
    #[arg(long)]
    port: Option<u16>,

    /// Use an alternate config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print the effective websocket endpoint and exit
    #[arg(long)]
    endpoint: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    if cli.endpoint {
        println!("{}", config.server.websocket_url());
        return Ok(());
    }

    let endpoint = Url::parse(&config.server.websocket_url())?;
    info!("Starting touchpanel against {endpoint}");

    let manager = ConnectionManager::new(
        endpoint,
        Duration::from_secs(config.connection.reconnect_delay_secs),
    );
    let (press_tx, mut net_events) = manager.spawn();

    // Headless runs have no local input source; the channel stays idle.
    let (_input_tx, mut inputs) = mpsc::unbounded_channel::<PanelEvent>();

    let mut app = App::new(&config, TextSurface, press_tx);

    // Run until the connection task dies or a shutdown signal arrives
    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;
    tokio::select! {
        _ = app.run(&mut net_events, &mut inputs) => {}
        _ = signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down...");
        }
    }

    Ok(())
}
