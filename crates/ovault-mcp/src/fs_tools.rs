//! MCP tool definitions for the filesystem backend.
//!
//! Handlers never raise to the transport: every failure renders as an
//! `Error: ...` string. Where a tool takes a `response_format`, the
//! JSON form is the canonical structure and the Markdown form is a
//! projection of the same fields.

use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ServerHandler,
};
use serde::{Deserialize, Serialize};

use ovault_core::{FrontmatterCodec, VaultError};
use ovault_vault::{
    collect_tags, create_note, daily_note, delete_note, edit_note, find_backlinks, list_folder,
    list_tasks, move_note, read_note, search, toggle_task, vault_info, EditOp, SearchParams,
    SearchType, TaskFilter, VaultContext,
};

const DEFAULT_SEARCH_LIMIT: usize = 20;
const MAX_SEARCH_RESULTS: usize = 100;
const MAX_LIST_DEPTH: usize = 5;

/// Output format for tool responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Markdown,
    Json,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchTypeArg {
    Filename,
    Content,
    #[default]
    Both,
}

impl From<SearchTypeArg> for SearchType {
    fn from(arg: SearchTypeArg) -> Self {
        match arg {
            SearchTypeArg::Filename => SearchType::Filename,
            SearchTypeArg::Content => SearchType::Content,
            SearchTypeArg::Both => SearchType::Both,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum EditOpArg {
    Append,
    Prepend,
    Replace,
}

impl From<EditOpArg> for EditOp {
    fn from(arg: EditOpArg) -> Self {
        match arg {
            EditOpArg::Append => EditOp::Append,
            EditOpArg::Prepend => EditOp::Prepend,
            EditOpArg::Replace => EditOp::Replace,
        }
    }
}

// === Tool request types ===

/// Request to search notes by filename or content.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// Search query string
    pub query: String,
    /// Search type: 'filename', 'content', or 'both'
    #[serde(default)]
    pub search_type: SearchTypeArg,
    /// Limit search to a specific folder
    #[serde(default)]
    pub folder: Option<String>,
    /// Max results to return
    #[serde(default = "default_search_limit")]
    #[schemars(range(min = 1, max = 100))]
    pub limit: usize,
    /// Output format
    #[serde(default)]
    pub response_format: ResponseFormat,
}

fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

/// Request to read a note.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ReadRequest {
    /// Relative path to the note (e.g., 'folder/note.md')
    pub path: String,
}

/// Request to create a new note.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateRequest {
    /// Relative path for the new note (e.g., 'folder/note.md')
    pub path: String,
    /// Initial content for the note
    #[serde(default)]
    pub content: String,
    /// Overwrite if the note already exists
    #[serde(default)]
    pub overwrite: bool,
}

/// Request to edit an existing note.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EditRequest {
    /// Relative path to the note
    pub path: String,
    /// Edit operation: 'append', 'prepend', or 'replace'
    pub operation: EditOpArg,
    /// Content to add or replace with
    pub content: String,
    /// For 'replace': the text to find and replace (first occurrence)
    #[serde(default)]
    pub find: Option<String>,
}

/// Request to delete a note.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteRequest {
    /// Relative path to the note to delete
    pub path: String,
    /// Must be true to confirm deletion
    #[serde(default)]
    pub confirm: bool,
}

/// Request to list folder contents.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListFolderRequest {
    /// Folder path relative to vault root
    #[serde(default)]
    pub folder: Option<String>,
    /// Max depth to list
    #[serde(default = "default_depth")]
    #[schemars(range(min = 1, max = 5))]
    pub depth: usize,
    /// Output format
    #[serde(default)]
    pub response_format: ResponseFormat,
}

fn default_depth() -> usize {
    2
}

/// Request to list all tags in the vault.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetTagsRequest {
    /// Limit to a specific folder
    #[serde(default)]
    pub folder: Option<String>,
    /// Output format
    #[serde(default)]
    pub response_format: ResponseFormat,
}

/// Request to find backlinks to a note.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BacklinksRequest {
    /// Note name (without .md extension) to find backlinks for
    pub note_name: String,
    /// Output format
    #[serde(default)]
    pub response_format: ResponseFormat,
}

/// Request to create a daily note.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DailyNoteRequest {
    /// Date in YYYY-MM-DD format (defaults to today)
    #[serde(default)]
    pub date: Option<String>,
    /// Folder for daily notes
    #[serde(default)]
    pub folder: Option<String>,
    /// Path to a template note to use for content
    #[serde(default)]
    pub template: Option<String>,
}

/// Request to list tasks.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TasksListRequest {
    /// Limit to a specific folder
    #[serde(default)]
    pub folder: Option<String>,
    /// Show only incomplete tasks
    #[serde(default)]
    pub todo: bool,
    /// Show only completed tasks
    #[serde(default)]
    pub done: bool,
}

/// Request to toggle a task's status.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct TaskToggleRequest {
    /// Path to the note containing the task
    pub path: String,
    /// Line number of the task (1-indexed)
    #[schemars(range(min = 1))]
    pub line: usize,
}

/// Request to move or rename a note/folder.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MoveRequest {
    /// Current path of the note or folder
    pub source: String,
    /// New path for the note or folder
    pub destination: String,
    /// Overwrite if destination exists
    #[serde(default)]
    pub overwrite: bool,
}

/// Request to append to today's daily note.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DailyAppendRequest {
    /// Content to append
    pub content: String,
}

// === Server ===

/// Filesystem MCP server over a single Obsidian vault.
#[derive(Clone)]
pub struct FsServer {
    ctx: Arc<VaultContext>,
    codec: Arc<dyn FrontmatterCodec>,
    tool_router: ToolRouter<Self>,
}

impl FsServer {
    /// Build a server over an opened vault with the front-matter codec
    /// chosen at startup.
    pub fn new(ctx: VaultContext, codec: Arc<dyn FrontmatterCodec>) -> Self {
        Self {
            ctx: Arc::new(ctx),
            codec,
            tool_router: Self::tool_router(),
        }
    }

    fn render<T: Serialize>(
        format: ResponseFormat,
        value: &T,
        to_markdown: impl FnOnce(&T) -> String,
    ) -> String {
        match format {
            ResponseFormat::Json => to_json(value),
            ResponseFormat::Markdown => to_markdown(value),
        }
    }

    // --- Handlers, shared between canonical tools and aliases ---

    fn handle_search(&self, req: &SearchRequest) -> String {
        let params = SearchParams {
            query: &req.query,
            search_type: req.search_type.into(),
            folder: req.folder.as_deref(),
            limit: req.limit.clamp(1, MAX_SEARCH_RESULTS),
        };
        match search(&self.ctx, self.codec.as_ref(), &params) {
            Ok(results) => Self::render(req.response_format, &results, |r| r.to_markdown()),
            Err(e) => error_string(&e),
        }
    }

    fn handle_read(&self, req: &ReadRequest) -> String {
        match read_note(&self.ctx, self.codec.as_ref(), &req.path) {
            Ok(note) => to_json(&note),
            Err(e) => error_string(&e),
        }
    }

    fn handle_create(&self, req: &CreateRequest) -> String {
        match create_note(&self.ctx, &req.path, &req.content, req.overwrite) {
            Ok(outcome) => to_json(&outcome),
            Err(e) => error_string(&e),
        }
    }

    fn handle_edit(&self, req: &EditRequest) -> String {
        match edit_note(
            &self.ctx,
            &req.path,
            req.operation.into(),
            &req.content,
            req.find.as_deref(),
        ) {
            Ok(outcome) => to_json(&outcome),
            Err(e) => error_string(&e),
        }
    }

    fn handle_delete(&self, req: &DeleteRequest) -> String {
        match delete_note(&self.ctx, &req.path, req.confirm) {
            Ok(outcome) => to_json(&outcome),
            Err(e) => error_string(&e),
        }
    }

    fn handle_list_folder(&self, req: &ListFolderRequest) -> String {
        let depth = req.depth.clamp(1, MAX_LIST_DEPTH);
        match list_folder(&self.ctx, req.folder.as_deref(), depth) {
            Ok(listing) => Self::render(req.response_format, &listing, |l| l.to_markdown()),
            Err(e) => error_string(&e),
        }
    }

    fn handle_get_tags(&self, req: &GetTagsRequest) -> String {
        match collect_tags(&self.ctx, self.codec.as_ref(), req.folder.as_deref()) {
            Ok(listing) => Self::render(req.response_format, &listing, |l| l.to_markdown()),
            Err(e) => error_string(&e),
        }
    }

    fn handle_backlinks(&self, req: &BacklinksRequest) -> String {
        match find_backlinks(&self.ctx, self.codec.as_ref(), &req.note_name) {
            Ok(listing) => Self::render(req.response_format, &listing, |l| l.to_markdown()),
            Err(e) => error_string(&e),
        }
    }

    fn handle_daily_note(&self, req: &DailyNoteRequest) -> String {
        match daily_note(
            &self.ctx,
            req.date.as_deref(),
            req.folder.as_deref(),
            req.template.as_deref(),
        ) {
            Ok(outcome) => to_json(&outcome),
            Err(e) => error_string(&e),
        }
    }

    fn handle_tasks_list(&self, req: &TasksListRequest) -> String {
        let filter = TaskFilter {
            todo: req.todo,
            done: req.done,
        };
        match list_tasks(&self.ctx, req.folder.as_deref(), filter) {
            Ok(listing) => listing.to_markdown(),
            Err(e) => error_string(&e),
        }
    }

    fn handle_task_toggle(&self, req: &TaskToggleRequest) -> String {
        match toggle_task(&self.ctx, &req.path, req.line) {
            Ok(outcome) => outcome.to_message(),
            Err(e) => error_string(&e),
        }
    }

    fn handle_move(&self, req: &MoveRequest) -> String {
        match move_note(&self.ctx, &req.source, &req.destination, req.overwrite) {
            Ok(outcome) => to_json(&outcome),
            Err(e) => error_string(&e),
        }
    }

    fn handle_daily_read(&self) -> String {
        match daily_note(&self.ctx, None, None, None) {
            Ok(outcome) => to_json(&outcome),
            Err(e) => error_string(&e),
        }
    }

    fn handle_daily_append(&self, content: &str) -> String {
        // Ensure today's note exists, then append to it.
        let daily = match daily_note(&self.ctx, None, None, None) {
            Ok(outcome) => outcome,
            Err(e) => return error_string(&e),
        };
        match edit_note(&self.ctx, &daily.path, EditOp::Append, content, None) {
            Ok(outcome) => to_json(&outcome),
            Err(e) => error_string(&e),
        }
    }

    fn handle_vault_info(&self) -> String {
        match vault_info(&self.ctx) {
            Ok(info) => to_json(&info),
            Err(e) => error_string(&e),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("Error: {e}"))
}

fn error_string(e: &VaultError) -> String {
    format!("Error: {e}")
}

#[tool_router]
impl FsServer {
    /// Search notes in the Obsidian vault by filename, content, or both.
    #[tool(
        name = "obsidian_fs_search",
        description = "Search notes in the Obsidian vault by filename, content, or both"
    )]
    fn fs_search(&self, Parameters(req): Parameters<SearchRequest>) -> String {
        self.handle_search(&req)
    }

    /// Read the full content of a note including metadata, tags, and wikilinks.
    #[tool(
        name = "obsidian_fs_read",
        description = "Read the full content of a note including metadata, tags, and wikilinks"
    )]
    fn fs_read(&self, Parameters(req): Parameters<ReadRequest>) -> String {
        self.handle_read(&req)
    }

    /// Create a new note in the vault.
    #[tool(name = "obsidian_fs_create", description = "Create a new note in the vault")]
    fn fs_create(&self, Parameters(req): Parameters<CreateRequest>) -> String {
        self.handle_create(&req)
    }

    /// Edit an existing note (append, prepend, or replace).
    #[tool(
        name = "obsidian_fs_edit",
        description = "Edit an existing note (append, prepend, or replace)"
    )]
    fn fs_edit(&self, Parameters(req): Parameters<EditRequest>) -> String {
        self.handle_edit(&req)
    }

    /// Delete a note from the vault. Requires confirm=true.
    #[tool(
        name = "obsidian_fs_delete",
        description = "Delete a note from the vault. Requires confirm=true"
    )]
    fn fs_delete(&self, Parameters(req): Parameters<DeleteRequest>) -> String {
        self.handle_delete(&req)
    }

    /// List the folder structure and notes in the vault.
    #[tool(
        name = "obsidian_fs_list_folder",
        description = "List the folder structure and notes in the vault"
    )]
    fn fs_list_folder(&self, Parameters(req): Parameters<ListFolderRequest>) -> String {
        self.handle_list_folder(&req)
    }

    /// Get all tags used across notes in the vault with counts.
    #[tool(
        name = "obsidian_fs_get_tags",
        description = "Get all tags used across notes in the vault with counts"
    )]
    fn fs_get_tags(&self, Parameters(req): Parameters<GetTagsRequest>) -> String {
        self.handle_get_tags(&req)
    }

    /// Find all notes that link to a specific note via wikilinks.
    #[tool(
        name = "obsidian_fs_get_backlinks",
        description = "Find all notes that link to a specific note via [[wikilinks]]"
    )]
    fn fs_get_backlinks(&self, Parameters(req): Parameters<BacklinksRequest>) -> String {
        self.handle_backlinks(&req)
    }

    /// Create a daily note for the specified date (defaults to today).
    #[tool(
        name = "obsidian_fs_daily_note",
        description = "Create a daily note for the specified date (defaults to today)"
    )]
    fn fs_daily_note(&self, Parameters(req): Parameters<DailyNoteRequest>) -> String {
        self.handle_daily_note(&req)
    }

    /// List tasks from the vault.
    #[tool(name = "obsidian_fs_tasks_list", description = "List tasks from the vault")]
    fn fs_tasks_list(&self, Parameters(req): Parameters<TasksListRequest>) -> String {
        self.handle_tasks_list(&req)
    }

    /// Toggle the status of a task at a specific line.
    #[tool(
        name = "obsidian_fs_task_toggle",
        description = "Toggle the status of a task at a specific line"
    )]
    fn fs_task_toggle(&self, Parameters(req): Parameters<TaskToggleRequest>) -> String {
        self.handle_task_toggle(&req)
    }

    /// Move or rename a note or folder.
    #[tool(name = "obsidian_fs_move", description = "Move or rename a note or folder")]
    fn fs_move(&self, Parameters(req): Parameters<MoveRequest>) -> String {
        self.handle_move(&req)
    }

    // --- Aliases: drop-in replacements for the bridge server's tools ---

    #[tool(name = "obsidian_search", description = "Alias for obsidian_fs_search")]
    fn search_alias(&self, Parameters(req): Parameters<SearchRequest>) -> String {
        self.handle_search(&req)
    }

    #[tool(name = "obsidian_read", description = "Alias for obsidian_fs_read")]
    fn read_alias(&self, Parameters(req): Parameters<ReadRequest>) -> String {
        self.handle_read(&req)
    }

    #[tool(name = "obsidian_create", description = "Alias for obsidian_fs_create")]
    fn create_alias(&self, Parameters(req): Parameters<CreateRequest>) -> String {
        self.handle_create(&req)
    }

    #[tool(name = "obsidian_edit", description = "Alias for obsidian_fs_edit")]
    fn edit_alias(&self, Parameters(req): Parameters<EditRequest>) -> String {
        self.handle_edit(&req)
    }

    #[tool(name = "obsidian_delete", description = "Alias for obsidian_fs_delete")]
    fn delete_alias(&self, Parameters(req): Parameters<DeleteRequest>) -> String {
        self.handle_delete(&req)
    }

    #[tool(
        name = "obsidian_list_folder",
        description = "Alias for obsidian_fs_list_folder"
    )]
    fn list_folder_alias(&self, Parameters(req): Parameters<ListFolderRequest>) -> String {
        self.handle_list_folder(&req)
    }

    #[tool(
        name = "obsidian_tags_list",
        description = "Alias for obsidian_fs_get_tags. Lists all tags"
    )]
    fn tags_list_alias(&self, Parameters(req): Parameters<GetTagsRequest>) -> String {
        self.handle_get_tags(&req)
    }

    #[tool(
        name = "obsidian_backlinks",
        description = "Alias for obsidian_fs_get_backlinks"
    )]
    fn backlinks_alias(&self, Parameters(req): Parameters<BacklinksRequest>) -> String {
        self.handle_backlinks(&req)
    }

    #[tool(
        name = "obsidian_tasks_list",
        description = "Alias for obsidian_fs_tasks_list"
    )]
    fn tasks_list_alias(&self, Parameters(req): Parameters<TasksListRequest>) -> String {
        self.handle_tasks_list(&req)
    }

    #[tool(
        name = "obsidian_task_toggle",
        description = "Alias for obsidian_fs_task_toggle"
    )]
    fn task_toggle_alias(&self, Parameters(req): Parameters<TaskToggleRequest>) -> String {
        self.handle_task_toggle(&req)
    }

    // --- Composite conveniences ---

    /// Read today's daily note (creates it if missing).
    #[tool(
        name = "obsidian_daily_read",
        description = "Read today's daily note (creates it if missing)"
    )]
    fn daily_read(&self) -> String {
        self.handle_daily_read()
    }

    /// Append content to today's daily note.
    #[tool(
        name = "obsidian_daily_append",
        description = "Append content to today's daily note"
    )]
    fn daily_append(&self, Parameters(req): Parameters<DailyAppendRequest>) -> String {
        self.handle_daily_append(&req.content)
    }

    /// Get vault statistics.
    #[tool(name = "obsidian_vault_info", description = "Get vault statistics")]
    fn vault_info_tool(&self) -> String {
        self.handle_vault_info()
    }
}

#[tool_handler]
impl ServerHandler for FsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Obsidian vault filesystem server. Search, read, create, edit, move, and \
                 delete notes; list folders, tags, backlinks, and tasks; manage daily notes. \
                 Operates directly on vault files — Obsidian does not need to be running."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
