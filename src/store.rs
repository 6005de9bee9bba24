//! Best-effort persistence: extraction cache and resumable sessions.
//!
//! Everything lives under `~/.commit-theatre/`. Nothing in here is allowed to
//! fail a performance; read and write problems are logged and skipped.

pub mod cache;
pub mod session;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

pub use cache::{CacheKey, ExtractionCache};
pub use session::{resume_token, Session, SessionStore};

use crate::utils::settings::Settings;

/// Subdirectory holding cached extractions.
pub const CACHE_DIR: &str = "cache";

/// Subdirectory holding session checkpoints.
pub const SESSIONS_DIR: &str = "sessions";

/// Locations of the on-disk stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    /// Extraction cache directory.
    pub cache: PathBuf,
    /// Session checkpoint directory.
    pub sessions: PathBuf,
}

impl StorePaths {
    /// Stores under the given state directory.
    pub fn under(root: &Path) -> Self {
        Self {
            cache: root.join(CACHE_DIR),
            sessions: root.join(SESSIONS_DIR),
        }
    }

    /// Stores under `~/.commit-theatre`.
    pub fn default_paths() -> Result<Self> {
        Ok(Self::under(&Settings::state_dir()?))
    }

    /// Removes every cache and session file, returning how many were deleted.
    pub fn clear(&self) -> Result<usize> {
        let removed = clear_json_files(&self.cache)? + clear_json_files(&self.sessions)?;
        debug!(removed, "Cleared stored files");
        Ok(removed)
    }
}

fn clear_json_files(dir: &Path) -> Result<usize> {
    if !dir.exists() {
        return Ok(0);
    }

    let mut removed = 0;
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read directory: {}", dir.display()))?;
    for entry in entries {
        let path = entry
            .with_context(|| format!("Failed to read directory entry in {}", dir.display()))?
            .path();
        if path.extension().is_some_and(|ext| ext == "json") {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove file: {}", path.display()))?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// Turns arbitrary text into a file-name-safe slug.
pub(crate) fn slug(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn clear_removes_only_json() {
        let root = TempDir::new().unwrap();
        let paths = StorePaths::under(root.path());
        fs::create_dir_all(&paths.cache).unwrap();
        fs::create_dir_all(&paths.sessions).unwrap();
        fs::write(paths.cache.join("a.json"), "{}").unwrap();
        fs::write(paths.sessions.join("b.json"), "{}").unwrap();
        fs::write(paths.sessions.join("notes.txt"), "keep").unwrap();

        assert_eq!(paths.clear().unwrap(), 2);
        assert!(paths.sessions.join("notes.txt").exists());
        assert_eq!(paths.clear().unwrap(), 0);
    }

    #[test]
    fn clear_without_directories() {
        let root = TempDir::new().unwrap();
        assert_eq!(StorePaths::under(&root.path().join("none")).clear().unwrap(), 0);
    }

    #[test]
    fn slug_replaces_separators() {
        assert_eq!(slug("v1.0..HEAD~3"), "v1_0__HEAD_3");
    }
}
