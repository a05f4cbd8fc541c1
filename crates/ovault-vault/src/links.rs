//! Backlink discovery: which notes link to a given note.

use serde::Serialize;

use ovault_core::extract::extract_wikilinks;
use ovault_core::{FrontmatterCodec, Result};

use crate::context::VaultContext;
use crate::index::list_notes;
use crate::meta::{note_metadata, NoteMeta};

#[derive(Debug, Clone, Serialize)]
pub struct BacklinkListing {
    pub target: String,
    pub total: usize,
    pub backlinks: Vec<NoteMeta>,
}

impl BacklinkListing {
    pub fn to_markdown(&self) -> String {
        if self.backlinks.is_empty() {
            return format!("No backlinks found for '{}'.", self.target);
        }
        let mut lines = vec![format!(
            "# Backlinks to '{}' ({} found)\n",
            self.target, self.total
        )];
        for meta in &self.backlinks {
            lines.push(format!("- **{}** (`{}`)", meta.name, meta.path));
        }
        lines.join("\n")
    }
}

/// Scan every note's wikilinks for the target name, case-insensitively.
/// Unreadable notes are skipped.
pub fn find_backlinks(
    ctx: &VaultContext,
    codec: &dyn FrontmatterCodec,
    note_name: &str,
) -> Result<BacklinkListing> {
    let notes = list_notes(ctx, None)?;
    let target = note_name.to_lowercase();
    let mut backlinks = Vec::new();
    for path in notes {
        let Ok(content) = std::fs::read_to_string(&path) else {
            continue;
        };
        if extract_wikilinks(&content)
            .iter()
            .any(|link| link.to_lowercase() == target)
        {
            if let Ok(meta) = note_metadata(ctx, &path, false, codec) {
                backlinks.push(meta);
            }
        }
    }
    Ok(BacklinkListing {
        target: note_name.to_string(),
        total: backlinks.len(),
        backlinks,
    })
}
