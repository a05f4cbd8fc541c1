//! Per-note metadata assembly.

use std::fs::Metadata;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::Serialize;

use ovault_core::{FmMap, FrontmatterCodec, Result};

use crate::context::VaultContext;

/// Metadata descriptor for a note. The JSON form is the canonical
/// structure embedded in read, search, and backlink responses.
#[derive(Debug, Clone, Serialize)]
pub struct NoteMeta {
    /// Vault-relative path, `/`-separated.
    pub path: String,
    /// Filename without extension.
    pub name: String,
    /// Parent folder, empty string at the vault root.
    pub folder: String,
    pub size_bytes: u64,
    /// Last modification time, UTC RFC 3339.
    pub modified: String,
    /// Birth time where the platform records one (macOS, Windows);
    /// the inode change time on Linux.
    pub created: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frontmatter: Option<FmMap>,
}

/// Build the metadata descriptor for a note on disk.
///
/// With `include_frontmatter`, a corrupt or unreadable front-matter
/// block records an empty mapping — metadata retrieval never fails on
/// bad front-matter.
pub fn note_metadata(
    ctx: &VaultContext,
    path: &Path,
    include_frontmatter: bool,
    codec: &dyn FrontmatterCodec,
) -> Result<NoteMeta> {
    let stat = std::fs::metadata(path)?;
    let rel = ctx.relative(path);
    let folder = match rel.rsplit_once('/') {
        Some((parent, _)) => parent.to_string(),
        None => String::new(),
    };
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let frontmatter = include_frontmatter.then(|| {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|content| codec.parse(&content))
            .unwrap_or_default()
    });

    Ok(NoteMeta {
        path: rel,
        name,
        folder,
        size_bytes: stat.len(),
        modified: to_utc_rfc3339(stat.modified()?),
        created: created_time(&stat),
        frontmatter,
    })
}

fn to_utc_rfc3339(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339()
}

fn created_time(stat: &Metadata) -> String {
    match stat.created() {
        Ok(time) => to_utc_rfc3339(time),
        Err(_) => to_utc_rfc3339(fallback_created(stat)),
    }
}

/// Linux has no birth time in `stat(2)`; fall back to the inode change
/// time, the same divergence the `created` field documents.
#[cfg(unix)]
fn fallback_created(stat: &Metadata) -> SystemTime {
    use std::os::unix::fs::MetadataExt;
    SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(stat.ctime().max(0) as u64)
}

#[cfg(not(unix))]
fn fallback_created(stat: &Metadata) -> SystemTime {
    stat.modified().unwrap_or(SystemTime::UNIX_EPOCH)
}
