//! ovault CLI — Obsidian vault MCP servers.
//!
//! `serve-fs` serves the filesystem backend (requires
//! `OBSIDIAN_VAULT_PATH`); `serve-cli` serves the bridge backend
//! through the Obsidian CLI binary.

use std::sync::Arc;

use clap::Parser;

use ovault_core::{FrontmatterCodec, NullCodec, YamlCodec};
use ovault_mcp::{serve_bridge, serve_fs};
use ovault_vault::VaultContext;

#[derive(Parser)]
#[command(name = "ovault")]
#[command(version)]
#[command(about = "Obsidian vault tools for AI agents over MCP")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Serve the filesystem backend on stdio (reads OBSIDIAN_VAULT_PATH)
    ServeFs {
        /// Disable structured front-matter parsing
        #[arg(long)]
        no_frontmatter: bool,
    },
    /// Serve the Obsidian CLI bridge backend on stdio
    ServeCli,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout belongs to the MCP stdio transport.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::ServeFs { no_frontmatter } => {
            // A bad vault path is fatal here rather than an error on
            // every call.
            let ctx = VaultContext::from_env()?;
            let codec: Arc<dyn FrontmatterCodec> = if no_frontmatter {
                Arc::new(NullCodec)
            } else {
                Arc::new(YamlCodec)
            };
            serve_fs(ctx, codec).await
        }
        Commands::ServeCli => serve_bridge().await,
    }
}
