/*!
 * Live Device Feed
 * Streams newly discovered devices into the menu's stdin as name/address rows
 */

use std::collections::HashMap;
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

use crate::control::BluetoothControl;
use crate::directory::{Device, DeviceDirectory};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Devices already written during one feed run, keyed by address.
#[derive(Debug, Default)]
pub struct SeenSet {
    entries: HashMap<String, String>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Devices in `snapshot` that have not been recorded yet.
    pub fn unseen(&self, snapshot: &DeviceDirectory) -> Vec<Device> {
        snapshot
            .iter()
            .filter(|device| !self.entries.contains_key(&device.address))
            .cloned()
            .collect()
    }

    pub fn record<'a>(&mut self, devices: impl IntoIterator<Item = &'a Device>) {
        for device in devices {
            self.entries
                .insert(device.address.clone(), device.name.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedExit {
    Cancelled,
    ConsumerClosed,
}

#[derive(Debug, Clone)]
pub struct FeedWriter {
    interval: Duration,
}

impl Default for FeedWriter {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

impl FeedWriter {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Polls the directory and writes unseen devices to `sink` until `cancel`
    /// fires or the sink stops accepting writes. Failed polls are skipped.
    pub async fn run<C, W>(&self, control: &C, sink: &mut W, cancel: CancellationToken) -> FeedExit
    where
        C: BluetoothControl + ?Sized,
        W: AsyncWrite + Unpin,
    {
        let mut seen = SeenSet::new();

        loop {
            let snapshot = tokio::select! {
                biased;
                _ = cancel.cancelled() => return FeedExit::Cancelled,
                snapshot = control.devices() => snapshot,
            };

            match snapshot {
                Ok(snapshot) => {
                    let fresh = seen.unseen(&snapshot);
                    if !fresh.is_empty() {
                        if let Err(e) = write_rows(sink, &fresh).await {
                            tracing::debug!("Menu stopped reading: {}", e);
                            return FeedExit::ConsumerClosed;
                        }
                        tracing::debug!("Fed {} new device(s) to menu", fresh.len());
                        seen.record(&fresh);
                    }
                }
                Err(e) => tracing::debug!("Device poll failed: {}", e),
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return FeedExit::Cancelled,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }
}

async fn write_rows<W>(sink: &mut W, devices: &[Device]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    for device in devices {
        sink.write_all(format!("{}\n{}\n", device.name, device.address).as_bytes())
            .await?;
    }
    sink.flush().await
}
