use std::path::PathBuf;

use thiserror::Error;

/// Fatal configuration failures. A partially-loaded check catalog is worse
/// than none, so these abort the run before any check executes.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid check catalog: {0}")]
    Invalid(String),
}

/// Failures while obtaining a measurement. Never aborts the run; the check
/// degrades to UNKNOWN with the error text as its message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("failed to spawn command: {0}")]
    Spawn(String),
    #[error("command exited with status {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },
    #[error("command timed out after {0}s")]
    Timeout(u64),
    #[error("command produced no output")]
    EmptyOutput,
    #[error("check has no command to execute")]
    MissingCommand,
}

/// Per-channel notification failures. Isolated at the dispatcher boundary;
/// one channel failing never affects the others or the process exit code.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("endpoint returned status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("smtp send failed: {0}")]
    Smtp(String),
    #[error("failed to read attachment {}: {source}", path.display())]
    Attachment {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
