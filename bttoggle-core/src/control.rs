/*!
 * Bluetooth Control
 * Power, connection and device queries through bluetoothctl
 */

use async_trait::async_trait;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::directory::DeviceDirectory;
use crate::error::{CtlError, Result};
use crate::process::{run_captured, ToolCommand};
use crate::status::{IndicatorInterpreter, StatusInterpreter};

pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(5);

#[async_trait]
pub trait BluetoothControl: Send + Sync {
    async fn power_on(&self) -> Result<()>;
    async fn power_off(&self) -> Result<()>;
    async fn connect(&self, address: &str) -> Result<()>;
    async fn disconnect(&self) -> Result<()>;
    async fn is_powered(&self) -> Result<bool>;
    /// `None` asks about the default device, which fails when nothing is
    /// connected; that failure reads as "not connected".
    async fn is_connected(&self, address: Option<&str>) -> Result<bool>;
    async fn devices(&self) -> Result<DeviceDirectory>;
    /// Enables discovery. Runs until the adapter's token is cancelled or the
    /// returned future is dropped.
    async fn start_discovery(&self) -> Result<()>;
}

pub struct Bluetoothctl {
    tool: ToolCommand,
    timeout: Option<Duration>,
    interpreter: Box<dyn StatusInterpreter>,
    cancel: CancellationToken,
}

impl Bluetoothctl {
    pub fn new(tool: ToolCommand, cancel: CancellationToken) -> Self {
        Self {
            tool,
            timeout: Some(DEFAULT_COMMAND_TIMEOUT),
            interpreter: Box::new(IndicatorInterpreter::default()),
            cancel,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_interpreter(mut self, interpreter: impl StatusInterpreter + 'static) -> Self {
        self.interpreter = Box::new(interpreter);
        self
    }

    async fn run(&self, args: &[&str]) -> Result<String> {
        run_captured(&self.tool, args, self.timeout, &self.cancel).await
    }
}

#[async_trait]
impl BluetoothControl for Bluetoothctl {
    async fn power_on(&self) -> Result<()> {
        tracing::info!("Powering adapter on");
        self.run(&["power", "on"]).await.map(drop)
    }

    async fn power_off(&self) -> Result<()> {
        tracing::info!("Powering adapter off");
        self.run(&["power", "off"]).await.map(drop)
    }

    async fn connect(&self, address: &str) -> Result<()> {
        tracing::info!("Connecting to device: {}", address);
        self.run(&["connect", address]).await.map(drop)
    }

    async fn disconnect(&self) -> Result<()> {
        tracing::info!("Disconnecting");
        self.run(&["disconnect"]).await.map(drop)
    }

    async fn is_powered(&self) -> Result<bool> {
        let output = self.run(&["show"]).await?;
        Ok(self.interpreter.is_powered(&output))
    }

    async fn is_connected(&self, address: Option<&str>) -> Result<bool> {
        match address {
            Some(address) => {
                let output = self.run(&["info", address]).await?;
                Ok(self.interpreter.is_connected(&output))
            }
            None => match self.run(&["info"]).await {
                Ok(output) => Ok(self.interpreter.is_connected(&output)),
                Err(CtlError::ProcessFailed { output, .. }) => {
                    tracing::debug!("No default device: {}", output);
                    Ok(false)
                }
                Err(e) => Err(e),
            },
        }
    }

    async fn devices(&self) -> Result<DeviceDirectory> {
        let output = self.run(&["devices"]).await?;
        DeviceDirectory::parse(&output)
    }

    async fn start_discovery(&self) -> Result<()> {
        tracing::debug!("Enabling discovery");
        run_captured(&self.tool, &["scan", "on"], None, &self.cancel)
            .await
            .map(drop)
    }
}

/// Powers on and connects to `address`, dropping any current connection
/// first. A failed disconnect is ignored.
pub async fn connect_device<C>(control: &C, address: &str, currently_connected: bool) -> Result<()>
where
    C: BluetoothControl + ?Sized,
{
    control.power_on().await?;
    if currently_connected {
        if let Err(e) = control.disconnect().await {
            tracing::debug!("Disconnect before connect failed: {}", e);
        }
    }
    control.connect(address).await
}
