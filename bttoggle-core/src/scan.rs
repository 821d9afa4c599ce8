use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::control::BluetoothControl;

/// Enables discovery in the background for as long as `cancel` is live.
///
/// Failures are logged only: discovery may already be running or be
/// unsupported, and the menu still lists known devices without it.
pub fn spawn_discovery(
    control: Arc<dyn BluetoothControl>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = cancel.cancelled() => tracing::debug!("Discovery stopped"),
            result = control.start_discovery() => {
                if let Err(e) = result {
                    tracing::debug!("Could not enable discovery: {}", e);
                }
            }
        }
    })
}
