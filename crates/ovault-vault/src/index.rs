//! Note enumeration over the vault tree.

use std::path::Path;

use serde::Serialize;
use tracing::debug;
use walkdir::WalkDir;

use ovault_core::{Result, VaultError};

use crate::context::{VaultContext, NOTE_EXTENSION};

/// Whether any component of a vault-relative path is hidden (starts
/// with `.`). Hidden paths are excluded from enumeration, search,
/// scans, and listings.
pub fn is_hidden(relative: &Path) -> bool {
    relative
        .components()
        .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
}

/// List every note under the vault, or under a subfolder, sorted by the
/// string form of the vault-relative path for a platform-stable order.
///
/// Unreadable directory entries are skipped, not fatal.
///
/// # Errors
///
/// [`VaultError::NotFound`] when the scope folder does not exist,
/// [`VaultError::PathTraversal`] when it escapes the vault.
pub fn list_notes(ctx: &VaultContext, folder: Option<&str>) -> Result<Vec<std::path::PathBuf>> {
    let base = match folder {
        Some(f) => {
            let resolved = ctx.resolve(f)?;
            if !resolved.is_dir() {
                return Err(VaultError::NotFound(format!("Folder not found: '{f}'")));
            }
            resolved
        }
        None => ctx.root().to_path_buf(),
    };

    let mut notes = Vec::new();
    for entry in WalkDir::new(&base).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some(NOTE_EXTENSION) {
            continue;
        }
        let rel = path.strip_prefix(ctx.root()).unwrap_or(path);
        if is_hidden(rel) {
            continue;
        }
        notes.push(path.to_path_buf());
    }
    notes.sort_by_key(|p| ctx.relative(p));
    debug!(count = notes.len(), folder = ?folder, "listed notes");
    Ok(notes)
}

/// Vault statistics: name, location, note count, total size.
#[derive(Debug, Clone, Serialize)]
pub struct VaultInfo {
    pub name: String,
    pub path: String,
    pub total_notes: usize,
    pub total_size_bytes: u64,
}

/// Collect vault statistics by walking every note.
pub fn vault_info(ctx: &VaultContext) -> Result<VaultInfo> {
    let notes = list_notes(ctx, None)?;
    let total_size_bytes = notes
        .iter()
        .filter_map(|p| std::fs::metadata(p).ok())
        .map(|m| m.len())
        .sum();
    Ok(VaultInfo {
        name: ctx.name(),
        path: ctx.root().display().to_string(),
        total_notes: notes.len(),
        total_size_bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn vault() -> (TempDir, VaultContext) {
        let dir = TempDir::new().unwrap();
        let ctx = VaultContext::open(dir.path()).unwrap();
        (dir, ctx)
    }

    fn write(ctx: &VaultContext, rel: &str, content: &str) {
        let path = ctx.root().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn lists_notes_sorted_by_relative_path() {
        let (_dir, ctx) = vault();
        write(&ctx, "b.md", "");
        write(&ctx, "a/nested.md", "");
        write(&ctx, "a.md", "");
        write(&ctx, "not-a-note.txt", "");

        let notes = list_notes(&ctx, None).unwrap();
        let rels: Vec<String> = notes.iter().map(|p| ctx.relative(p)).collect();
        assert_eq!(rels, vec!["a.md", "a/nested.md", "b.md"]);
    }

    #[test]
    fn hidden_components_are_excluded() {
        let (_dir, ctx) = vault();
        write(&ctx, "visible.md", "");
        write(&ctx, ".obsidian/config.md", "");
        write(&ctx, "folder/.hidden.md", "");

        let notes = list_notes(&ctx, None).unwrap();
        let rels: Vec<String> = notes.iter().map(|p| ctx.relative(p)).collect();
        assert_eq!(rels, vec!["visible.md"]);
    }

    #[test]
    fn folder_scope_restricts_the_walk() {
        let (_dir, ctx) = vault();
        write(&ctx, "top.md", "");
        write(&ctx, "projects/one.md", "");
        write(&ctx, "projects/two.md", "");

        let notes = list_notes(&ctx, Some("projects")).unwrap();
        assert_eq!(notes.len(), 2);
    }

    #[test]
    fn missing_folder_is_not_found() {
        let (_dir, ctx) = vault();
        let err = list_notes(&ctx, Some("nope")).unwrap_err();
        assert!(matches!(err, VaultError::NotFound(_)));
    }

    #[test]
    fn vault_info_sums_note_sizes() {
        let (_dir, ctx) = vault();
        write(&ctx, "a.md", "12345");
        write(&ctx, "b.md", "678");

        let info = vault_info(&ctx).unwrap();
        assert_eq!(info.total_notes, 2);
        assert_eq!(info.total_size_bytes, 8);
    }
}
