/*!
 * bttoggle
 * Toggle, pick and report a Bluetooth device from a status bar or keybinding
 */

use anyhow::{Context, Result};
use bttoggle_core::{
    pick, probe, toggle, BluetoothControl, Bluetoothctl, FeedWriter, LastDeviceStore,
    SelectionMenu,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod refresh;

use config::AppConfig;
use refresh::notify_status_bar;

#[derive(Parser)]
#[command(name = "bttoggle")]
#[command(about = "Toggle, pick and report a Bluetooth device")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Text to display when connected
    #[arg(short = 'c', long)]
    connected: Option<String>,

    /// Text to display when disconnected
    #[arg(short = 'd', long)]
    disconnected: Option<String>,

    /// Text to display when powered off
    #[arg(short = 'o', long)]
    off: Option<String>,

    /// Path to store the last picked device
    #[arg(long)]
    store_path: Option<PathBuf>,

    /// Device address to toggle instead of the stored one
    #[arg(long)]
    device: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
enum Commands {
    /// Connect the device, or power off when it is already connected
    Toggle,
    /// Pick a device from a live menu and connect to it
    Pick,
    /// Print the connection status text
    Status,
}

impl Cli {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(text) = &self.connected {
            config.display.connected = text.clone();
        }
        if let Some(text) = &self.disconnected {
            config.display.disconnected = text.clone();
        }
        if let Some(text) = &self.off {
            config.display.off = text.clone();
        }
        if let Some(path) = &self.store_path {
            config.store_path = path.clone();
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let debug = cli.debug;

    // Logs go to stderr; stdout carries the status text
    let default_filter = if debug {
        "bttoggle=debug,bttoggle_core=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(output) => {
            if let Some(text) = output {
                println!("{}", text);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            if debug {
                error!("{:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}

/// Runs the chosen command and returns the text to print, if any.
async fn run(cli: Cli) -> Result<Option<String>> {
    let mut config = match cli.config.clone().or_else(AppConfig::default_path) {
        Some(path) => AppConfig::load(&path)?,
        None => {
            warn!("No config directory found, using defaults");
            AppConfig::default()
        }
    };
    cli.apply(&mut config);

    let command = cli.command.unwrap_or(Commands::Toggle);

    config.tools.control.ensure_available()?;
    if command == Commands::Pick {
        config.tools.menu.ensure_available()?;
    }

    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupted, stopping");
            interrupt.cancel();
        }
    });

    let control: Arc<dyn BluetoothControl> = Arc::new(
        Bluetoothctl::new(config.tools.control.clone(), cancel.clone())
            .with_timeout(config.command_timeout())
            .with_interpreter(config.indicators.clone()),
    );
    let store = LastDeviceStore::new(&config.store_path);

    let status = probe(control.as_ref())
        .await
        .context("failed to read bluetooth status")?;

    match command {
        Commands::Toggle => {
            let device = match cli.device {
                Some(device) => device,
                None => store
                    .load()
                    .with_context(|| format!("failed to read {}", store.path().display()))?
                    .with_context(|| format!("no device set in {:?}", store.path()))?,
            };

            let action = toggle(control.as_ref(), status, &device).await?;
            info!("Toggled {}: {:?}", device, action);
        }
        Commands::Pick => {
            let menu = SelectionMenu::new(
                config.tools.menu.clone(),
                FeedWriter::new(config.feed_interval()),
            );
            if pick(control.clone(), &menu, &store, status, &cancel)
                .await?
                .is_none()
            {
                return Ok(None);
            }
        }
        Commands::Status => return Ok(Some(status.render(&config.display).to_string())),
    }

    if let Some(refresh) = &config.refresh {
        notify_status_bar(&config.tools.signal, refresh, config.command_timeout(), &cancel).await;
    }

    Ok(None)
}
