use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use crate::demo;
use crate::error::ExecutionError;
use crate::types::{CheckDefinition, CheckStatus};

/// Default bound on a single check command. Observed default from the
/// periodic-inspection deployments this replaces.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// How measurements are obtained. Threaded explicitly through the executor
/// so live and demo runs can coexist in one process (tests rely on this).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Run the definition's command in a subprocess.
    Live,
    /// Serve canned measurements from the demo tables; never spawns.
    Demo,
}

/// One raw measurement for one check.
#[derive(Debug, Clone, PartialEq)]
pub enum Measurement {
    /// Live command output (trimmed stdout).
    Observed { raw_value: String },
    /// Demo-table row: value plus a pre-assigned verdict.
    Canned {
        raw_value: String,
        status: CheckStatus,
        message: String,
    },
    /// The command could not produce a usable value.
    Failed { error: ExecutionError },
}

/// Runs one check definition and returns its raw measurement. Each
/// execution is self-contained: the spawned subprocess is the only side
/// effect and is released (killed on timeout) before `execute` returns.
pub struct CheckExecutor {
    mode: ExecutionMode,
    command_timeout: Duration,
}

impl CheckExecutor {
    pub fn new(mode: ExecutionMode) -> Self {
        Self {
            mode,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    pub fn with_timeout(mode: ExecutionMode, command_timeout: Duration) -> Self {
        Self {
            mode,
            command_timeout,
        }
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub async fn execute(&self, definition: &CheckDefinition) -> Measurement {
        match self.mode {
            ExecutionMode::Demo => demo::lookup(&definition.id),
            ExecutionMode::Live => self.run_command(definition).await,
        }
    }

    async fn run_command(&self, definition: &CheckDefinition) -> Measurement {
        let Some(command) = definition.command.as_deref() else {
            return Measurement::Failed {
                error: ExecutionError::MissingCommand,
            };
        };
        debug!("running check {}: {}", definition.id, command);

        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.command_timeout, output).await {
            Err(_) => {
                return Measurement::Failed {
                    error: ExecutionError::Timeout(self.command_timeout.as_secs()),
                }
            }
            Ok(Err(e)) => {
                return Measurement::Failed {
                    error: ExecutionError::Spawn(e.to_string()),
                }
            }
            Ok(Ok(output)) => output,
        };

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Measurement::Failed {
                error: ExecutionError::NonZeroExit {
                    code: output.status.code().unwrap_or(-1),
                    stderr,
                },
            };
        }
        if stdout.is_empty() {
            return Measurement::Failed {
                error: ExecutionError::EmptyOutput,
            };
        }
        Measurement::Observed { raw_value: stdout }
    }
}
