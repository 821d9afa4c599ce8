/*!
 * External Tool Invocation
 * One-shot subprocess runs with combined output capture, deadlines and cancellation
 */

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

use crate::error::{CtlError, Result};

/// A program plus the leading arguments every invocation starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Builds a tokio command with the leading arguments followed by `extra`.
    pub fn command(&self, extra: &[&str]) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).args(extra).kill_on_drop(true);
        command
    }

    pub fn describe(&self, extra: &[&str]) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .chain(extra.iter().copied())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Fails with `ToolMissing` unless the program can be found.
    pub fn ensure_available(&self) -> Result<PathBuf> {
        find_in_path(&self.program).ok_or_else(|| CtlError::ToolMissing {
            tool: self.program.clone(),
        })
    }
}

/// Resolves `program` the way the shell would: paths are checked directly,
/// bare names are searched for in `PATH`.
pub fn find_in_path(program: &str) -> Option<PathBuf> {
    if program.contains('/') {
        let path = PathBuf::from(program);
        return is_executable(&path).then_some(path);
    }

    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Runs `tool extra...` to completion and returns stdout followed by stderr.
///
/// A non-zero exit becomes `ProcessFailed` carrying that output. The child is
/// killed if `cancel` fires or `timeout` elapses first.
pub async fn run_captured(
    tool: &ToolCommand,
    extra: &[&str],
    timeout: Option<Duration>,
    cancel: &CancellationToken,
) -> Result<String> {
    let describe = tool.describe(extra);
    tracing::debug!("Running `{}`", describe);

    let child = tool
        .command(extra)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| CtlError::Spawn {
            program: tool.program.clone(),
            source,
        })?;

    let wait = child.wait_with_output();
    let output = tokio::select! {
        _ = cancel.cancelled() => return Err(CtlError::Cancelled),
        output = async {
            match timeout {
                Some(limit) => match tokio::time::timeout(limit, wait).await {
                    Ok(result) => result.map_err(CtlError::from),
                    Err(_) => Err(CtlError::TimedOut { command: describe.clone() }),
                },
                None => wait.await.map_err(CtlError::from),
            }
        } => output?,
    };

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    if !output.status.success() {
        return Err(CtlError::ProcessFailed {
            command: describe,
            status: output.status,
            output: combined.trim_end().to_string(),
        });
    }

    Ok(combined)
}
