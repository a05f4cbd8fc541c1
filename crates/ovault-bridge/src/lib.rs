//! # ovault-bridge
//!
//! Drives the external `obsidian` CLI binary. Commands take positional
//! `key=value` arguments plus bare flags; an optional `vault=<name>`
//! selector must be the first argument. Every invocation runs under a
//! hard wall-clock timeout, and any failure becomes a typed
//! [`BridgeError`] carrying the exit code and captured stderr.

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::debug;

use ovault_core::BridgeError;

/// Name of the Obsidian CLI binary, resolved on `PATH`.
pub const OBSIDIAN_CMD: &str = "obsidian";

/// Wall-clock timeout per invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Handle for invoking the Obsidian CLI.
#[derive(Debug, Clone)]
pub struct ObsidianCli {
    binary: String,
    timeout: Duration,
}

impl Default for ObsidianCli {
    fn default() -> Self {
        Self::new()
    }
}

impl ObsidianCli {
    pub fn new() -> Self {
        Self {
            binary: OBSIDIAN_CMD.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Use a different binary path; test harnesses point this at a
    /// script.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run an Obsidian CLI command and return its trimmed stdout.
    ///
    /// # Errors
    ///
    /// [`BridgeError::BinaryMissing`] when the binary cannot be spawned,
    /// [`BridgeError::Timeout`] when the wall clock expires (the child
    /// is killed), and [`BridgeError::CommandFailed`] on a non-zero
    /// exit, carrying stderr (or stdout when stderr is empty).
    pub async fn run(&self, vault: Option<&str>, args: &[String]) -> Result<String, BridgeError> {
        let mut cmd_args: Vec<String> = Vec::with_capacity(args.len() + 1);
        // The vault selector must precede the command.
        if let Some(vault) = vault {
            cmd_args.push(format!("vault={vault}"));
        }
        cmd_args.extend(args.iter().cloned());
        debug!(binary = %self.binary, args = ?cmd_args, "running obsidian command");

        let future = Command::new(&self.binary)
            .args(&cmd_args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, future).await {
            Err(_) => {
                return Err(BridgeError::Timeout {
                    command: format!("{} {}", self.binary, cmd_args.join(" ")),
                    timeout_secs: self.timeout.as_secs(),
                })
            }
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BridgeError::BinaryMissing)
            }
            Ok(Err(e)) => return Err(BridgeError::Io(e)),
            Ok(Ok(output)) => output,
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
            return Err(BridgeError::CommandFailed {
                code: output.status.code().unwrap_or(-1),
                detail: if stderr.is_empty() { stdout } else { stderr },
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
