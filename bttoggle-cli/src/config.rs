use anyhow::{Context, Result};
use bttoggle_core::menu::default_menu_command;
use bttoggle_core::{DisplayText, IndicatorInterpreter, ToolCommand};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub store_path: PathBuf,
    pub feed_interval_secs: u64,
    pub command_timeout_secs: u64,
    pub display: DisplayText,
    pub tools: ToolsConfig,
    pub indicators: IndicatorInterpreter,
    pub refresh: Option<RefreshConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub control: ToolCommand,
    pub menu: ToolCommand,
    pub signal: ToolCommand,
}

/// Status bar process to poke after the connection state changed.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RefreshConfig {
    pub process: String,
    #[serde(default = "default_refresh_signal")]
    pub signal: String,
}

fn default_refresh_signal() -> String {
    "SIGUSR1".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("/tmp/.btdev"),
            feed_interval_secs: 5,
            command_timeout_secs: 5,
            display: DisplayText::default(),
            tools: ToolsConfig::default(),
            indicators: IndicatorInterpreter::default(),
            refresh: None,
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            control: ToolCommand::new("bluetoothctl"),
            menu: default_menu_command(),
            signal: ToolCommand::new("pkill"),
        }
    }
}

impl AppConfig {
    /// `$XDG_CONFIG_HOME/bttoggle/config.toml`, if a config directory is known.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("bttoggle").join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content)
                .with_context(|| format!("invalid config file {}", path.display())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                // Create default config if not found
                let config = Self::default();
                let _ = fs::write(path, toml::to_string_pretty(&config)?);
                Ok(config)
            }
            Err(e) => {
                Err(e).with_context(|| format!("failed to read config file {}", path.display()))
            }
        }
    }

    pub fn feed_interval(&self) -> Duration {
        Duration::from_secs(self.feed_interval_secs.max(1))
    }

    /// Per-command deadline for the control tool; zero disables it.
    pub fn command_timeout(&self) -> Option<Duration> {
        (self.command_timeout_secs > 0).then(|| Duration::from_secs(self.command_timeout_secs))
    }
}
