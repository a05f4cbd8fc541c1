//! MCP tool definitions backed by the external `obsidian` CLI.
//!
//! Each tool assembles a positional argument list and forwards it to
//! the binary; failures (non-zero exit, timeout, missing binary) render
//! as `Error: ...` strings.

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use serde::Deserialize;

use ovault_bridge::ObsidianCli;

// === Tool request types ===

/// Common vault selector.
#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct VaultRequest {
    /// Vault name. Defaults to the active vault if omitted.
    #[serde(default)]
    pub vault: Option<String>,
}

/// Request to append content to the daily note.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DailyAppendRequest {
    /// Vault name. Defaults to the active vault if omitted.
    #[serde(default)]
    pub vault: Option<String>,
    /// Text to append to the daily note.
    pub content: String,
    /// If true, append without a leading newline.
    #[serde(default)]
    pub inline: bool,
}

/// Request to list tasks.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TasksListRequest {
    /// Vault name. Defaults to the active vault if omitted.
    #[serde(default)]
    pub vault: Option<String>,
    /// Filter by file name.
    #[serde(default)]
    pub file: Option<String>,
    /// Show only incomplete tasks.
    #[serde(default)]
    pub todo: bool,
    /// Show only completed tasks.
    #[serde(default)]
    pub done: bool,
    /// Show tasks from the daily note.
    #[serde(default)]
    pub daily: bool,
    /// List all tasks in the vault.
    #[serde(default)]
    pub all_vault: bool,
}

/// Request to toggle a task.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TaskToggleRequest {
    /// Vault name. Defaults to the active vault if omitted.
    #[serde(default)]
    pub vault: Option<String>,
    /// Task reference in 'path:line' format (e.g. 'Recipe.md:8').
    pub r#ref: String,
}

/// Request to search the vault.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// Vault name. Defaults to the active vault if omitted.
    #[serde(default)]
    pub vault: Option<String>,
    /// Search query text.
    pub query: String,
    /// Limit search to a folder.
    #[serde(default)]
    pub path: Option<String>,
    /// Max number of results.
    #[serde(default)]
    #[schemars(range(min = 1, max = 200))]
    pub limit: Option<u32>,
    /// Show match context.
    #[serde(default = "default_true")]
    pub matches: bool,
}

fn default_true() -> bool {
    true
}

/// Request for details about a specific tag.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TagInfoRequest {
    /// Vault name. Defaults to the active vault if omitted.
    #[serde(default)]
    pub vault: Option<String>,
    /// Tag name (with or without #).
    pub name: String,
}

// === Server ===

/// MCP server forwarding vault operations to the Obsidian CLI.
#[derive(Clone)]
pub struct BridgeServer {
    cli: ObsidianCli,
    tool_router: ToolRouter<Self>,
}

impl Default for BridgeServer {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgeServer {
    pub fn new() -> Self {
        Self::with_cli(ObsidianCli::new())
    }

    /// Build with a specific CLI handle; test harnesses point it at a
    /// fake binary.
    pub fn with_cli(cli: ObsidianCli) -> Self {
        Self {
            cli,
            tool_router: Self::tool_router(),
        }
    }

    async fn run(&self, vault: Option<&str>, args: Vec<String>) -> String {
        match self.cli.run(vault, &args).await {
            Ok(output) => output,
            Err(e) => format!("Error: {e}"),
        }
    }
}

#[tool_router]
impl BridgeServer {
    /// Read the contents of today's daily note.
    #[tool(
        name = "obsidian_daily_read",
        description = "Read the contents of today's daily note (created from the configured template if missing)"
    )]
    async fn daily_read(&self, Parameters(req): Parameters<VaultRequest>) -> String {
        self.run(req.vault.as_deref(), vec!["daily:read".to_string()])
            .await
    }

    /// Append text to today's daily note.
    #[tool(
        name = "obsidian_daily_append",
        description = "Append text to today's daily note"
    )]
    async fn daily_append(&self, Parameters(req): Parameters<DailyAppendRequest>) -> String {
        let mut args = vec![
            "daily:append".to_string(),
            format!("content={}", req.content),
            "silent".to_string(),
        ];
        if req.inline {
            args.push("inline".to_string());
        }
        let output = self.run(req.vault.as_deref(), args).await;
        if output.is_empty() {
            "Content appended to daily note.".to_string()
        } else {
            output
        }
    }

    /// List tasks from the vault, a specific file, or the daily note.
    #[tool(
        name = "obsidian_tasks_list",
        description = "List tasks from the vault, a specific file, or the daily note"
    )]
    async fn tasks_list(&self, Parameters(req): Parameters<TasksListRequest>) -> String {
        let mut args = vec!["tasks".to_string()];
        if let Some(file) = &req.file {
            args.push(format!("file={file}"));
        }
        if req.all_vault {
            args.push("all".to_string());
        }
        if req.daily {
            args.push("daily".to_string());
        }
        if req.todo {
            args.push("todo".to_string());
        }
        if req.done {
            args.push("done".to_string());
        }
        args.push("verbose".to_string());
        self.run(req.vault.as_deref(), args).await
    }

    /// Toggle a task between complete and incomplete.
    #[tool(
        name = "obsidian_task_toggle",
        description = "Toggle a task between complete and incomplete"
    )]
    async fn task_toggle(&self, Parameters(req): Parameters<TaskToggleRequest>) -> String {
        let args = vec![
            "task".to_string(),
            format!("ref={}", req.r#ref),
            "toggle".to_string(),
        ];
        self.run(req.vault.as_deref(), args).await
    }

    /// Search the vault for text.
    #[tool(
        name = "obsidian_search",
        description = "Search the vault for text, returning matching files and context"
    )]
    async fn search(&self, Parameters(req): Parameters<SearchRequest>) -> String {
        let mut args = vec!["search".to_string(), format!("query={}", req.query)];
        if let Some(path) = &req.path {
            args.push(format!("path={path}"));
        }
        if let Some(limit) = req.limit {
            args.push(format!("limit={limit}"));
        }
        if req.matches {
            args.push("matches".to_string());
        }
        self.run(req.vault.as_deref(), args).await
    }

    /// List all tags in the vault with occurrence counts.
    #[tool(
        name = "obsidian_tags_list",
        description = "List all tags in the vault with occurrence counts"
    )]
    async fn tags_list(&self, Parameters(req): Parameters<VaultRequest>) -> String {
        let args = vec!["tags".to_string(), "all".to_string(), "counts".to_string()];
        self.run(req.vault.as_deref(), args).await
    }

    /// Get details about a specific tag, including which files use it.
    #[tool(
        name = "obsidian_tag_info",
        description = "Get details about a specific tag, including which files use it"
    )]
    async fn tag_info(&self, Parameters(req): Parameters<TagInfoRequest>) -> String {
        let tag = req.name.trim_start_matches('#');
        let args = vec![
            "tag".to_string(),
            format!("name={tag}"),
            "verbose".to_string(),
        ];
        self.run(req.vault.as_deref(), args).await
    }

    /// Show vault information.
    #[tool(
        name = "obsidian_vault_info",
        description = "Show vault information (name, path, file/folder counts, size)"
    )]
    async fn vault_info(&self, Parameters(req): Parameters<VaultRequest>) -> String {
        self.run(req.vault.as_deref(), vec!["vault".to_string()])
            .await
    }
}

#[tool_handler]
impl ServerHandler for BridgeServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Obsidian CLI bridge server. Daily notes, tasks, search, and tags, \
                 executed through the Obsidian 1.12+ command line interface."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_request_defaults() {
        let req: SearchRequest = serde_json::from_str(r#"{"query": "x"}"#).unwrap();
        assert!(req.matches);
        assert!(req.vault.is_none());
        assert!(req.limit.is_none());
    }

    #[test]
    fn task_ref_field_deserializes() {
        let req: TaskToggleRequest =
            serde_json::from_str(r#"{"ref": "Recipe.md:8"}"#).unwrap();
        assert_eq!(req.r#ref, "Recipe.md:8");
    }

    #[cfg(unix)]
    mod with_fake_binary {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use tempfile::TempDir;

        fn echo_server() -> (TempDir, BridgeServer) {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("obsidian");
            std::fs::write(&path, "#!/bin/sh\necho \"$@\"\n").unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            let cli = ObsidianCli::with_binary(path.to_string_lossy().into_owned());
            (dir, BridgeServer::with_cli(cli))
        }

        #[tokio::test]
        async fn tasks_list_assembles_flags_in_order() {
            let (_dir, server) = echo_server();
            let req = TasksListRequest {
                vault: Some("work".to_string()),
                file: Some("Recipe.md".to_string()),
                todo: true,
                done: false,
                daily: false,
                all_vault: true,
            };
            let out = server.tasks_list(Parameters(req)).await;
            assert_eq!(out, "vault=work tasks file=Recipe.md all todo verbose");
        }

        #[tokio::test]
        async fn tag_info_strips_the_hash_prefix() {
            let (_dir, server) = echo_server();
            let req = TagInfoRequest {
                vault: None,
                name: "#recipes".to_string(),
            };
            let out = server.tag_info(Parameters(req)).await;
            assert_eq!(out, "tag name=recipes verbose");
        }

        #[tokio::test]
        async fn daily_append_reports_success_on_silent_output() {
            // A silent script stands in for the CLI's `silent` flag.
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("obsidian");
            std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            let quiet =
                BridgeServer::with_cli(ObsidianCli::with_binary(path.to_string_lossy().into_owned()));

            let req = DailyAppendRequest {
                vault: None,
                content: "hello".to_string(),
                inline: false,
            };
            let out = quiet.daily_append(Parameters(req)).await;
            assert_eq!(out, "Content appended to daily note.");
        }
    }
}
