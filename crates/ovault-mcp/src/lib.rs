//! # ovault-mcp
//!
//! MCP servers exposing Obsidian vault operations to agents.
//!
//! Two independent backends share one tool surface:
//! - [`FsServer`] operates directly on the vault's files and adds
//!   derived features (tags, backlinks, tasks); it also registers
//!   `obsidian_*` aliases so it can stand in for the bridge.
//! - [`BridgeServer`] forwards each tool to the external `obsidian`
//!   CLI binary.
//!
//! Tools return strings; every failure renders as an `Error: ...`
//! message rather than a protocol fault.

pub mod bridge_tools;
pub mod fs_tools;
pub mod serve;

pub use bridge_tools::BridgeServer;
pub use fs_tools::FsServer;
pub use serve::{serve_bridge, serve_fs};
