use bttoggle_core::process::run_captured;
use bttoggle_core::ToolCommand;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::config::RefreshConfig;

/// Signals the status bar so it re-runs `bttoggle status`. Best-effort: a bar
/// that is not running is not an error.
pub async fn notify_status_bar(
    signal_tool: &ToolCommand,
    refresh: &RefreshConfig,
    timeout: Option<Duration>,
    cancel: &CancellationToken,
) {
    let signal = format!("-{}", refresh.signal);
    let args = [signal.as_str(), refresh.process.as_str()];

    match run_captured(signal_tool, &args, timeout, cancel).await {
        Ok(_) => tracing::debug!("Sent {} to {}", refresh.signal, refresh.process),
        Err(e) => tracing::debug!("Could not signal {}: {}", refresh.process, e),
    }
}
