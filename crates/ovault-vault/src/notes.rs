//! Note CRUD: read, create, edit, delete, move.

use std::fs;

use serde::Serialize;

use ovault_core::extract::{extract_tags, extract_wikilinks};
use ovault_core::{FmMap, FrontmatterCodec, Result, VaultError};

use crate::context::{ensure_note_extension, VaultContext, NOTE_EXTENSION};
use crate::meta::{note_metadata, NoteMeta};

/// Full read of a note: metadata, verbatim content, and everything
/// derived from it.
#[derive(Debug, Clone, Serialize)]
pub struct NoteContent {
    #[serde(flatten)]
    pub meta: NoteMeta,
    pub content: String,
    pub frontmatter: FmMap,
    pub tags: Vec<String>,
    pub wikilinks: Vec<String>,
    /// Whitespace-split token count.
    pub word_count: usize,
    pub char_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateOutcome {
    pub status: &'static str,
    pub path: String,
    pub size_bytes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct EditOutcome {
    pub status: &'static str,
    pub path: String,
    pub operation: &'static str,
    pub original_size: usize,
    pub new_size: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteOutcome {
    pub status: &'static str,
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MoveOutcome {
    pub status: &'static str,
    #[serde(rename = "from")]
    pub from_path: String,
    #[serde(rename = "to")]
    pub to_path: String,
}

/// Edit operations on an existing note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOp {
    Append,
    Prepend,
    Replace,
}

impl EditOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditOp::Append => "append",
            EditOp::Prepend => "prepend",
            EditOp::Replace => "replace",
        }
    }
}

/// Read a note in full, deriving front-matter, tags, wikilinks, and
/// word/character counts from the content.
pub fn read_note(
    ctx: &VaultContext,
    codec: &dyn FrontmatterCodec,
    path_raw: &str,
) -> Result<NoteContent> {
    let path = ctx.resolve_note(path_raw)?;
    if !path.is_file() {
        return Err(VaultError::NotFound(format!(
            "Note not found at '{path_raw}'."
        )));
    }
    let content = fs::read_to_string(&path)?;
    let meta = note_metadata(ctx, &path, false, codec)?;
    let frontmatter = codec.parse(&content).unwrap_or_default();
    let tags = extract_tags(&content, codec);
    let wikilinks = extract_wikilinks(&content);
    let word_count = content.split_whitespace().count();
    let char_count = content.chars().count();

    Ok(NoteContent {
        meta,
        content,
        frontmatter,
        tags,
        wikilinks,
        word_count,
        char_count,
    })
}

/// Create a note, writing `content` verbatim. Parent directories are
/// created as needed.
pub fn create_note(
    ctx: &VaultContext,
    path_raw: &str,
    content: &str,
    overwrite: bool,
) -> Result<CreateOutcome> {
    let path = ctx.resolve_note(path_raw)?;
    if path.exists() && !overwrite {
        return Err(VaultError::AlreadyExists(format!(
            "Note already exists at '{path_raw}'. Set overwrite=true to replace."
        )));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, content)?;
    Ok(CreateOutcome {
        status: "created",
        path: ctx.relative(&path),
        size_bytes: content.len(),
    })
}

/// Edit an existing note in place.
///
/// `Replace` without `find` replaces the whole note; with `find` it
/// replaces exactly the first occurrence and fails when the text is
/// absent rather than silently writing the original back.
pub fn edit_note(
    ctx: &VaultContext,
    path_raw: &str,
    operation: EditOp,
    content: &str,
    find: Option<&str>,
) -> Result<EditOutcome> {
    let path = ctx.resolve_note(path_raw)?;
    if !path.is_file() {
        return Err(VaultError::NotFound(format!(
            "Note not found at '{path_raw}'."
        )));
    }
    let original = fs::read_to_string(&path)?;
    let new_content = match operation {
        EditOp::Append => format!("{original}\n{content}"),
        EditOp::Prepend => format!("{content}\n{original}"),
        EditOp::Replace => match find {
            None => content.to_string(),
            Some(find_text) => {
                if !original.contains(find_text) {
                    return Err(VaultError::InvalidInput(format!(
                        "Text to replace not found in '{path_raw}'."
                    )));
                }
                original.replacen(find_text, content, 1)
            }
        },
    };
    fs::write(&path, &new_content)?;
    Ok(EditOutcome {
        status: "edited",
        path: ctx.relative(&path),
        operation: operation.as_str(),
        original_size: original.chars().count(),
        new_size: new_content.chars().count(),
    })
}

/// Delete a note. Refuses without explicit confirmation.
pub fn delete_note(ctx: &VaultContext, path_raw: &str, confirm: bool) -> Result<DeleteOutcome> {
    if !confirm {
        return Err(VaultError::InvalidInput(
            "Deletion not confirmed. Set confirm=true to proceed.".to_string(),
        ));
    }
    let path = ctx.resolve_note(path_raw)?;
    if !path.is_file() {
        return Err(VaultError::NotFound(format!(
            "Note not found at '{path_raw}'."
        )));
    }
    let rel = ctx.relative(&path);
    fs::remove_file(&path)?;
    Ok(DeleteOutcome {
        status: "deleted",
        path: rel,
    })
}

/// Move or rename a note or folder.
///
/// A missing source is retried with the note extension; a file source
/// with an extensionless destination gets the extension appended.
/// Files land via `rename`, an atomic replace on POSIX; directories
/// move with ordinary rename semantics.
pub fn move_note(
    ctx: &VaultContext,
    source: &str,
    destination: &str,
    overwrite: bool,
) -> Result<MoveOutcome> {
    let mut src = ctx.resolve(source)?;
    let mut dest = ctx.resolve(destination)?;

    if !src.exists() {
        let with_ext = ensure_note_extension(src.clone());
        if with_ext != src && with_ext.exists() {
            src = with_ext;
        } else {
            return Err(VaultError::NotFound(format!(
                "Source not found: '{source}'"
            )));
        }
    }
    if src.is_file() && dest.extension().is_none() {
        dest = dest.with_extension(NOTE_EXTENSION);
    }
    if dest.exists() && !overwrite {
        return Err(VaultError::AlreadyExists(format!(
            "Destination already exists: '{destination}'. Set overwrite=true to force."
        )));
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::rename(&src, &dest)?;
    Ok(MoveOutcome {
        status: "moved",
        from_path: ctx.relative(&src),
        to_path: ctx.relative(&dest),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ovault_core::YamlCodec;
    use tempfile::TempDir;

    fn vault() -> (TempDir, VaultContext) {
        let dir = TempDir::new().unwrap();
        let ctx = VaultContext::open(dir.path()).unwrap();
        (dir, ctx)
    }

    #[test]
    fn create_then_read_round_trips_content() {
        let (_dir, ctx) = vault();
        let content = "# Title\n\nBody with ümlaut";
        create_note(&ctx, "folder/Note", content, false).unwrap();

        let note = read_note(&ctx, &YamlCodec, "folder/Note.md").unwrap();
        assert_eq!(note.content, content);
        assert_eq!(note.meta.size_bytes as usize, content.len());
        assert_eq!(note.char_count, content.chars().count());
        assert_eq!(note.word_count, 5);
    }

    #[test]
    fn create_refuses_existing_without_overwrite() {
        let (_dir, ctx) = vault();
        create_note(&ctx, "Note.md", "first", false).unwrap();
        let err = create_note(&ctx, "Note.md", "second", false).unwrap_err();
        assert!(matches!(err, VaultError::AlreadyExists(_)));

        let outcome = create_note(&ctx, "Note.md", "second", true).unwrap();
        assert_eq!(outcome.status, "created");
        assert_eq!(
            std::fs::read_to_string(ctx.root().join("Note.md")).unwrap(),
            "second"
        );
    }

    #[test]
    fn read_derives_tags_links_and_frontmatter() {
        let (_dir, ctx) = vault();
        let content = "---\ntags: [meta]\n---\nSee [[Other]] and #inline\n";
        create_note(&ctx, "Note.md", content, false).unwrap();

        let note = read_note(&ctx, &YamlCodec, "Note").unwrap();
        assert_eq!(note.tags, vec!["inline", "meta"]);
        assert_eq!(note.wikilinks, vec!["Other"]);
        assert!(note.frontmatter.contains_key("tags"));
    }

    #[test]
    fn append_and_prepend_join_with_a_newline() {
        let (_dir, ctx) = vault();
        create_note(&ctx, "Note.md", "A", false).unwrap();

        edit_note(&ctx, "Note.md", EditOp::Append, "B", None).unwrap();
        assert_eq!(
            std::fs::read_to_string(ctx.root().join("Note.md")).unwrap(),
            "A\nB"
        );

        edit_note(&ctx, "Note.md", EditOp::Prepend, "C", None).unwrap();
        assert_eq!(
            std::fs::read_to_string(ctx.root().join("Note.md")).unwrap(),
            "C\nA\nB"
        );
    }

    #[test]
    fn replace_hits_only_the_first_occurrence() {
        let (_dir, ctx) = vault();
        create_note(&ctx, "Note.md", "x y x", false).unwrap();

        edit_note(&ctx, "Note.md", EditOp::Replace, "z", Some("x")).unwrap();
        assert_eq!(
            std::fs::read_to_string(ctx.root().join("Note.md")).unwrap(),
            "z y x"
        );
    }

    #[test]
    fn replace_with_missing_find_is_an_error() {
        let (_dir, ctx) = vault();
        create_note(&ctx, "Note.md", "content", false).unwrap();

        let err = edit_note(&ctx, "Note.md", EditOp::Replace, "z", Some("absent")).unwrap_err();
        assert!(matches!(err, VaultError::InvalidInput(_)));
        // The note is untouched.
        assert_eq!(
            std::fs::read_to_string(ctx.root().join("Note.md")).unwrap(),
            "content"
        );
    }

    #[test]
    fn replace_without_find_rewrites_the_note() {
        let (_dir, ctx) = vault();
        create_note(&ctx, "Note.md", "old", false).unwrap();
        edit_note(&ctx, "Note.md", EditOp::Replace, "new", None).unwrap();
        assert_eq!(
            std::fs::read_to_string(ctx.root().join("Note.md")).unwrap(),
            "new"
        );
    }

    #[test]
    fn delete_requires_confirmation() {
        let (_dir, ctx) = vault();
        create_note(&ctx, "Note.md", "", false).unwrap();

        let err = delete_note(&ctx, "Note.md", false).unwrap_err();
        assert!(matches!(err, VaultError::InvalidInput(_)));
        assert!(ctx.root().join("Note.md").exists());

        delete_note(&ctx, "Note", true).unwrap();
        assert!(!ctx.root().join("Note.md").exists());
    }

    #[test]
    fn move_renames_a_note_appending_extensions() {
        let (_dir, ctx) = vault();
        create_note(&ctx, "Old.md", "body", false).unwrap();

        let outcome = move_note(&ctx, "Old", "sub/New", false).unwrap();
        assert_eq!(outcome.from_path, "Old.md");
        assert_eq!(outcome.to_path, "sub/New.md");
        assert_eq!(
            std::fs::read_to_string(ctx.root().join("sub/New.md")).unwrap(),
            "body"
        );
    }

    #[test]
    fn move_renames_a_folder_with_contents() {
        let (_dir, ctx) = vault();
        create_note(&ctx, "Folder/SubNote.md", "content", false).unwrap();

        move_note(&ctx, "Folder", "RenamedFolder", false).unwrap();
        assert!(!ctx.root().join("Folder").exists());
        assert_eq!(
            std::fs::read_to_string(ctx.root().join("RenamedFolder/SubNote.md")).unwrap(),
            "content"
        );
    }

    #[test]
    fn move_refuses_existing_destination_without_overwrite() {
        let (_dir, ctx) = vault();
        create_note(&ctx, "A.md", "a", false).unwrap();
        create_note(&ctx, "B.md", "b", false).unwrap();

        let err = move_note(&ctx, "A.md", "B.md", false).unwrap_err();
        assert!(matches!(err, VaultError::AlreadyExists(_)));

        move_note(&ctx, "A.md", "B.md", true).unwrap();
        assert_eq!(
            std::fs::read_to_string(ctx.root().join("B.md")).unwrap(),
            "a"
        );
        assert!(!ctx.root().join("A.md").exists());
    }
}
