//! Substring search over note names and contents.

use serde::Serialize;

use ovault_core::{FrontmatterCodec, Result};

use crate::context::VaultContext;
use crate::index::list_notes;
use crate::meta::{note_metadata, NoteMeta};

/// Characters of context captured on each side of a content match.
const CONTEXT_WINDOW: usize = 50;

/// What a query is matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchType {
    Filename,
    Content,
    #[default]
    Both,
}

/// Search parameters after validation at the tool boundary.
#[derive(Debug, Clone)]
pub struct SearchParams<'a> {
    pub query: &'a str,
    pub search_type: SearchType,
    pub folder: Option<&'a str>,
    /// Hard cap on collected results.
    pub limit: usize,
}

/// One matching note, with content context when the match was in the
/// body.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub meta: NoteMeta,
    pub match_context: String,
}

/// The full result set of a search call.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub total: usize,
    pub query: String,
    pub results: Vec<SearchHit>,
}

impl SearchResults {
    pub fn to_markdown(&self) -> String {
        if self.results.is_empty() {
            return format!("No results found for '{}'.", self.query);
        }
        let mut lines = vec![format!(
            "# Search Results for '{}' ({} found)\n",
            self.query, self.total
        )];
        for hit in &self.results {
            let mut line = format!("- **{}** (`{}`)", hit.meta.name, hit.meta.path);
            if !hit.match_context.is_empty() {
                line.push_str(&format!("\n  > ...{}...", hit.match_context));
            }
            lines.push(line);
        }
        lines.join("\n")
    }
}

/// Scan the vault (or a subfolder) for notes matching the query,
/// case-insensitively, by filename and/or content. A filename match
/// short-circuits the content test. Unreadable notes are skipped.
pub fn search(
    ctx: &VaultContext,
    codec: &dyn FrontmatterCodec,
    params: &SearchParams<'_>,
) -> Result<SearchResults> {
    let notes = list_notes(ctx, params.folder)?;
    let query = params.query.to_lowercase();
    let mut results = Vec::new();

    for path in notes {
        if results.len() >= params.limit {
            break;
        }
        let mut matched = false;
        let mut match_context = String::new();

        if matches!(params.search_type, SearchType::Filename | SearchType::Both) {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            matched = stem.contains(&query);
        }
        if matches!(params.search_type, SearchType::Content | SearchType::Both) && !matched {
            let Ok(content) = std::fs::read_to_string(&path) else {
                continue;
            };
            if let Some(idx) = content.to_lowercase().find(&query) {
                matched = true;
                match_context = context_window(&content, idx, query.len());
            }
        }
        if matched {
            let meta = note_metadata(ctx, &path, true, codec)?;
            results.push(SearchHit {
                meta,
                match_context,
            });
        }
    }

    Ok(SearchResults {
        total: results.len(),
        query: params.query.to_string(),
        results,
    })
}

/// A fixed-width window around the first match offset, with embedded
/// newlines normalized to spaces. Indices come from the lowercased
/// text, so they are clamped to character boundaries of the original.
fn context_window(content: &str, idx: usize, query_len: usize) -> String {
    let mut start = idx.saturating_sub(CONTEXT_WINDOW).min(content.len());
    while start > 0 && !content.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (idx + query_len + CONTEXT_WINDOW).min(content.len());
    while end < content.len() && !content.is_char_boundary(end) {
        end += 1;
    }
    content[start..end].replace('\n', " ").trim().to_string()
}
