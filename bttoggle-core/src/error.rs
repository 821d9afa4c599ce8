use std::process::ExitStatus;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CtlError>;

#[derive(Debug, Error)]
pub enum CtlError {
    #[error("required tool {tool:?} not found in PATH")]
    ToolMissing { tool: String },

    #[error("failed to start {program:?}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {output}")]
    ProcessFailed {
        command: String,
        status: ExitStatus,
        output: String,
    },

    #[error("`{command}` timed out")]
    TimedOut { command: String },

    #[error("operation cancelled")]
    Cancelled,

    #[error("malformed device line {line:?}: expected `Device <address> <name>`")]
    MalformedOutput { line: String },

    #[error("malformed selection {line:?}: missing '|' delimiter")]
    MalformedSelection { line: String },

    #[error("wrong device format {address:?}: expected 17 characters")]
    InvalidAddress { address: String },

    #[error("{0} pipe of menu process unavailable")]
    PipeUnavailable(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
