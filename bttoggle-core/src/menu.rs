/*!
 * Device Selection Menu
 * Listening list fed by the live device feed; returns the row the user picks
 */

use std::process::Stdio;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::control::BluetoothControl;
use crate::error::{CtlError, Result};
use crate::feed::FeedWriter;
use crate::process::ToolCommand;
use crate::reader::spawn_line_reader;

/// yad in listening two-column list mode without buttons.
pub fn default_menu_command() -> ToolCommand {
    ToolCommand::new("yad").args([
        "--list",
        "--column=name",
        "--column=device",
        "--no-buttons",
        "--listen",
    ])
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub name: String,
    pub address: String,
}

/// Parses the menu's output. No output, an empty first line, or a bare `|`
/// row means the menu was closed without a pick.
pub fn parse_selection(lines: &[String]) -> Result<Option<Selection>> {
    let Some(line) = lines.first().filter(|line| !line.is_empty()) else {
        return Ok(None);
    };

    // yad terminates every column with the separator
    let row = line.strip_suffix('|').unwrap_or(line);
    if row.is_empty() {
        return Ok(None);
    }
    match row.rsplit_once('|') {
        Some((name, address)) => Ok(Some(Selection {
            name: name.to_string(),
            address: address.to_string(),
        })),
        None => Err(CtlError::MalformedSelection { line: line.clone() }),
    }
}

pub struct SelectionMenu {
    command: ToolCommand,
    feed: FeedWriter,
}

impl SelectionMenu {
    pub fn new(command: ToolCommand, feed: FeedWriter) -> Self {
        Self { command, feed }
    }

    /// Opens the menu, streams devices into it and waits for it to exit.
    ///
    /// The feed task lives exactly as long as the menu: it is cancelled and
    /// awaited before this returns.
    pub async fn run(
        &self,
        control: Arc<dyn BluetoothControl>,
        cancel: &CancellationToken,
    ) -> Result<Option<Selection>> {
        tracing::debug!("Opening menu `{}`", self.command.describe(&[]));

        let mut child = self
            .command
            .command(&[])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| CtlError::Spawn {
                program: self.command.program.clone(),
                source,
            })?;

        let mut stdin = child.stdin.take().ok_or(CtlError::PipeUnavailable("stdin"))?;
        let stdout = child.stdout.take().ok_or(CtlError::PipeUnavailable("stdout"))?;

        let reader = spawn_line_reader(stdout);

        let feed_cancel = cancel.child_token();
        let feed = self.feed.clone();
        let feed_token = feed_cancel.clone();
        let feed_task = tokio::spawn(async move {
            feed.run(control.as_ref(), &mut stdin, feed_token).await
        });

        let lines = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!("Menu cancelled");
                let _ = child.kill().await;
                feed_cancel.cancel();
                let _ = feed_task.await;
                return Err(CtlError::Cancelled);
            }
            lines = reader => lines.unwrap_or_else(|e| {
                tracing::warn!("Menu reader task failed: {}", e);
                Vec::new()
            }),
        };

        let waited = child.wait().await;

        feed_cancel.cancel();
        match feed_task.await {
            Ok(exit) => tracing::debug!("Device feed stopped: {:?}", exit),
            Err(e) => tracing::warn!("Device feed task failed: {}", e),
        }

        tracing::debug!("Menu exited with {}", waited?);
        parse_selection(&lines)
    }
}
