//! Error types for ovault.

use thiserror::Error;

/// Top-level result type for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;

/// Errors from the filesystem backend.
///
/// These never cross the MCP boundary as faults; the tool layer renders
/// them as `Error: ...` strings.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("path traversal detected: {0}")]
    PathTraversal(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the external `obsidian` CLI bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(
        "Obsidian CLI not found. Make sure Obsidian 1.12+ is installed \
         and CLI is enabled in Settings → General → Command line interface."
    )]
    BinaryMissing,

    #[error("command timed out after {timeout_secs}s: {command}")]
    Timeout { command: String, timeout_secs: u64 },

    #[error("command failed (exit {code}): {detail}")]
    CommandFailed { code: i32, detail: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
