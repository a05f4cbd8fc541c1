//! Serving the MCP servers over the stdio transport.

use std::sync::Arc;

use anyhow::Result;
use rmcp::transport::io::stdio;
use rmcp::ServiceExt;
use tracing::info;

use ovault_core::FrontmatterCodec;
use ovault_vault::VaultContext;

use crate::bridge_tools::BridgeServer;
use crate::fs_tools::FsServer;

/// Serve the filesystem backend on stdio until the client disconnects.
pub async fn serve_fs(ctx: VaultContext, codec: Arc<dyn FrontmatterCodec>) -> Result<()> {
    info!(vault = %ctx.root().display(), "starting filesystem MCP server on stdio");
    let service = FsServer::new(ctx, codec).serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}

/// Serve the Obsidian CLI bridge backend on stdio.
pub async fn serve_bridge() -> Result<()> {
    info!("starting obsidian CLI bridge MCP server on stdio");
    let service = BridgeServer::new().serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}
