//! Vault-wide tag aggregation.

use std::collections::HashMap;

use serde::Serialize;

use ovault_core::extract::extract_tags;
use ovault_core::{FrontmatterCodec, Result};

use crate::context::VaultContext;
use crate::index::list_notes;

/// A tag and the number of notes using it. Each note contributes one
/// occurrence per tag regardless of repetitions within the note.
#[derive(Debug, Clone, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagListing {
    pub total_tags: usize,
    pub tags: Vec<TagCount>,
}

impl TagListing {
    pub fn to_markdown(&self) -> String {
        if self.tags.is_empty() {
            return "No tags found in the vault.".to_string();
        }
        let mut lines = vec![format!("# Tags ({} found)\n", self.total_tags)];
        for entry in &self.tags {
            lines.push(format!("- #{} ({} notes)", entry.tag, entry.count));
        }
        lines.join("\n")
    }
}

/// Aggregate tag counts across the vault (or a subfolder), sorted by
/// descending count then ascending tag name. Unreadable notes are
/// skipped.
pub fn collect_tags(
    ctx: &VaultContext,
    codec: &dyn FrontmatterCodec,
    folder: Option<&str>,
) -> Result<TagListing> {
    let notes = list_notes(ctx, folder)?;
    let mut counts: HashMap<String, usize> = HashMap::new();
    for path in notes {
        let Ok(content) = std::fs::read_to_string(&path) else {
            continue;
        };
        for tag in extract_tags(&content, codec) {
            *counts.entry(tag).or_insert(0) += 1;
        }
    }
    let mut tags: Vec<TagCount> = counts
        .into_iter()
        .map(|(tag, count)| TagCount { tag, count })
        .collect();
    tags.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    Ok(TagListing {
        total_tags: tags.len(),
        tags,
    })
}
