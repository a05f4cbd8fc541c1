//! Vault root resolution and safe path handling.
//!
//! The vault root is validated and canonicalized exactly once, into an
//! owned [`VaultContext`] that is passed to every operation. Callers
//! that change the backing environment construct a fresh context; there
//! is no hidden process-global cache to invalidate.

use std::ffi::OsString;
use std::io;
use std::path::{Component, Path, PathBuf};

use ovault_core::{Result, VaultError};

/// Environment variable naming the vault directory.
pub const VAULT_PATH_ENV: &str = "OBSIDIAN_VAULT_PATH";

/// Extension appended to extensionless note paths.
pub const NOTE_EXTENSION: &str = "md";

/// An opened vault: an absolute, symlink-resolved root directory.
#[derive(Debug, Clone)]
pub struct VaultContext {
    root: PathBuf,
}

impl VaultContext {
    /// Open a vault at the given directory.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::NotFound`] when the path does not exist or
    /// is not a directory. Misconfiguration is fatal at startup by
    /// design; operations never see an unvalidated root.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_dir() {
            return Err(VaultError::NotFound(format!(
                "Vault path does not exist or is not a directory: {}",
                path.display()
            )));
        }
        let root = path.canonicalize()?;
        Ok(Self { root })
    }

    /// Open the vault named by `OBSIDIAN_VAULT_PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidInput`] when the variable is unset
    /// or empty, and the [`Self::open`] errors otherwise.
    pub fn from_env() -> Result<Self> {
        let raw = std::env::var(VAULT_PATH_ENV).unwrap_or_default();
        if raw.is_empty() {
            return Err(VaultError::InvalidInput(format!(
                "{VAULT_PATH_ENV} environment variable is not set. \
                 Please set it to your Obsidian vault directory."
            )));
        }
        Self::open(&expand_tilde(&raw))
    }

    /// The canonical vault root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The vault's name (the root directory's file name).
    pub fn name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root.display().to_string())
    }

    /// Resolve a vault-relative path, rejecting anything that escapes
    /// the vault — including in-vault symlinks pointing outside it.
    ///
    /// The target itself may not exist yet (create and move need that);
    /// the deepest existing ancestor is symlink-resolved and checked.
    ///
    /// # Errors
    ///
    /// [`VaultError::PathTraversal`] when the resolved path is not a
    /// descendant of the root; [`VaultError::Io`] when canonicalization
    /// fails for reasons other than a missing tail.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf> {
        let joined = self.root.join(relative);
        let resolved = canonicalize_allowing_missing(&normalize_lexical(&joined))?;
        if resolved.starts_with(&self.root) {
            Ok(resolved)
        } else {
            Err(VaultError::PathTraversal(relative.to_string()))
        }
    }

    /// Resolve a vault-relative note path, normalizing the extension.
    pub fn resolve_note(&self, relative: &str) -> Result<PathBuf> {
        Ok(ensure_note_extension(self.resolve(relative)?))
    }

    /// The vault-relative form of an absolute path, with `/` separators
    /// on every platform. The root itself maps to the empty string.
    pub fn relative(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Append the default note extension when the path has none.
pub fn ensure_note_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_none() {
        path.with_extension(NOTE_EXTENSION)
    } else {
        path
    }
}

fn expand_tilde(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix('~') {
        if let Some(home) = dirs::home_dir() {
            if rest.is_empty() {
                return home;
            }
            if let Some(tail) = rest.strip_prefix('/') {
                return home.join(tail);
            }
        }
    }
    PathBuf::from(raw)
}

/// Resolve `.` and `..` lexically. `..` at the filesystem root stays at
/// the root, mirroring how absolute paths resolve.
fn normalize_lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other),
        }
    }
    out
}

/// `fs::canonicalize` requires the full path to exist; create and move
/// target paths that do not yet. Canonicalize the deepest existing
/// ancestor and re-append the missing tail.
fn canonicalize_allowing_missing(path: &Path) -> Result<PathBuf> {
    let mut existing = path.to_path_buf();
    let mut missing: Vec<OsString> = Vec::new();
    loop {
        match existing.canonicalize() {
            Ok(canon) => {
                let mut out = canon;
                for name in missing.iter().rev() {
                    out.push(name);
                }
                return Ok(out);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                match (existing.file_name().map(OsString::from), existing.parent()) {
                    (Some(name), Some(parent)) => {
                        missing.push(name);
                        existing = parent.to_path_buf();
                    }
                    _ => return Err(VaultError::Io(e)),
                }
            }
            Err(e) => return Err(VaultError::Io(e)),
        }
    }
}
