//! # ovault-vault
//!
//! Filesystem backend for ovault. Operates directly on the vault's
//! markdown files: every operation re-reads the files it touches, so
//! there is no index to maintain or invalidate.
//!
//! Operations return typed outcome structs whose JSON form (via serde)
//! is the canonical response shape; the Markdown renderings are
//! projections of the same fields.

pub mod context;
pub mod daily;
pub mod folder;
pub mod index;
pub mod links;
pub mod meta;
pub mod notes;
pub mod search;
pub mod tags;
pub mod tasks;

pub use context::{ensure_note_extension, VaultContext, NOTE_EXTENSION, VAULT_PATH_ENV};
pub use daily::{daily_note, DailyNoteOutcome};
pub use folder::{list_folder, FolderEntry, FolderListing};
pub use index::{list_notes, vault_info, VaultInfo};
pub use links::{find_backlinks, BacklinkListing};
pub use meta::{note_metadata, NoteMeta};
pub use notes::{
    create_note, delete_note, edit_note, move_note, read_note, CreateOutcome, DeleteOutcome,
    EditOp, EditOutcome, MoveOutcome, NoteContent,
};
pub use search::{search, SearchHit, SearchParams, SearchResults, SearchType};
pub use tags::{collect_tags, TagCount, TagListing};
pub use tasks::{list_tasks, toggle_task, TaskFilter, TaskItem, TaskListing, ToggleOutcome};
