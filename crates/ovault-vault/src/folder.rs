//! Folder tree listing.

use std::path::Path;

use serde::Serialize;

use ovault_core::{Result, VaultError};

use crate::context::{VaultContext, NOTE_EXTENSION};
use crate::index::is_hidden;

/// A node in the folder tree.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FolderEntry {
    Folder {
        name: String,
        path: String,
        children: Vec<FolderEntry>,
    },
    Note {
        name: String,
        path: String,
    },
}

/// The listed tree, rooted at the requested folder.
#[derive(Debug, Clone, Serialize)]
pub struct FolderListing {
    pub root: String,
    pub items: Vec<FolderEntry>,
}

impl FolderListing {
    pub fn to_markdown(&self) -> String {
        let mut lines = Vec::new();
        render_into(&self.items, 0, &mut lines);
        format!("# Vault Structure: {}\n{}", self.root, lines.join("\n"))
    }
}

fn render_into(items: &[FolderEntry], indent: usize, lines: &mut Vec<String>) {
    let prefix = "  ".repeat(indent);
    for item in items {
        match item {
            FolderEntry::Folder { name, children, .. } => {
                lines.push(format!("{prefix}📁 **{name}/**"));
                render_into(children, indent + 1, lines);
            }
            FolderEntry::Note { name, path } => {
                lines.push(format!("{prefix}📄 {name} (`{path}`)"));
            }
        }
    }
}

/// List the folder structure up to `depth` levels. Directories sort
/// before files, each level alphabetical case-insensitively; hidden
/// entries are excluded. Folders at the depth limit appear with empty
/// children.
pub fn list_folder(
    ctx: &VaultContext,
    folder: Option<&str>,
    depth: usize,
) -> Result<FolderListing> {
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
    let items = walk(ctx, &base, 1, depth);
    Ok(FolderListing {
        root: folder.unwrap_or("/").to_string(),
        items,
    })
}

fn walk(ctx: &VaultContext, dir: &Path, current_depth: usize, max_depth: usize) -> Vec<FolderEntry> {
    let mut entries: Vec<_> = match std::fs::read_dir(dir) {
        Ok(rd) => rd.filter_map(|e| e.ok()).collect(),
        Err(_) => return Vec::new(),
    };
    entries.sort_by_key(|e| {
        (
            !e.path().is_dir(),
            e.file_name().to_string_lossy().to_lowercase(),
        )
    });

    let mut items = Vec::new();
    for entry in entries {
        let path = entry.path();
        let rel = ctx.relative(&path);
        if is_hidden(Path::new(&rel)) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if path.is_dir() {
            let children = if current_depth < max_depth {
                walk(ctx, &path, current_depth + 1, max_depth)
            } else {
                Vec::new()
            };
            items.push(FolderEntry::Folder {
                name,
                path: rel,
                children,
            });
        } else if path.extension().and_then(|e| e.to_str()) == Some(NOTE_EXTENSION) {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or(name);
            items.push(FolderEntry::Note { name: stem, path: rel });
        }
    }
    items
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

    fn write(ctx: &VaultContext, rel: &str) {
        let path = ctx.root().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "").unwrap();
    }

    #[test]
    fn folders_sort_before_notes() {
        let (_dir, ctx) = vault();
        write(&ctx, "aaa.md");
        write(&ctx, "zfolder/inner.md");

        let listing = list_folder(&ctx, None, 2).unwrap();
        assert!(matches!(listing.items[0], FolderEntry::Folder { .. }));
        assert!(matches!(listing.items[1], FolderEntry::Note { .. }));
    }

    #[test]
    fn depth_limits_recursion() {
        let (_dir, ctx) = vault();
        write(&ctx, "a/b/c/deep.md");

        let listing = list_folder(&ctx, None, 2).unwrap();
        let FolderEntry::Folder { children, .. } = &listing.items[0] else {
            panic!("expected folder");
        };
        // Level 2 folder 'b' is listed but its children are not walked.
        let FolderEntry::Folder { children: inner, .. } = &children[0] else {
            panic!("expected folder");
        };
        assert!(inner.is_empty());
    }

    #[test]
    fn hidden_entries_are_excluded() {
        let (_dir, ctx) = vault();
        write(&ctx, "visible.md");
        write(&ctx, ".obsidian/app.md");

        let listing = list_folder(&ctx, None, 3).unwrap();
        assert_eq!(listing.items.len(), 1);
    }

    #[test]
    fn markdown_rendering_indents_by_level() {
        let (_dir, ctx) = vault();
        write(&ctx, "folder/note.md");

        let text = list_folder(&ctx, None, 2).unwrap().to_markdown();
        assert!(text.starts_with("# Vault Structure: /\n"));
        assert!(text.contains("📁 **folder/**"));
        assert!(text.contains("  📄 note (`folder/note.md`)"));
    }

    #[test]
    fn missing_folder_is_an_error() {
        let (_dir, ctx) = vault();
        let err = list_folder(&ctx, Some("ghost"), 2).unwrap_err();
        assert!(matches!(err, VaultError::NotFound(_)));
    }
}
