//! TTL cache of extracted commit histories.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::git::{CommitInfo, ExtractOptions};
use crate::store::slug;

/// What an extraction depends on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheKey {
    /// Commit HEAD pointed at when extracting.
    pub head: String,
    /// Requested range, if any.
    pub range: Option<String>,
    /// Extraction filters.
    pub options: ExtractOptions,
}

impl CacheKey {
    /// Key for extracting `range` with `options` while HEAD is at `head`.
    pub fn new(head: impl Into<String>, range: Option<&str>, options: &ExtractOptions) -> Self {
        Self {
            head: head.into(),
            range: range.map(str::to_string),
            options: options.clone(),
        }
    }

    fn file_name(&self) -> String {
        format!(
            "{}-{}-{}-{}.json",
            self.head,
            slug(self.range.as_deref().unwrap_or("HEAD")),
            if self.options.include_merges { "merges" } else { "nomerges" },
            self.options
                .max_commits
                .map_or_else(|| "all".to_string(), |max| max.to_string()),
        )
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    key: CacheKey,
    stored_at: DateTime<Utc>,
    commits: Vec<CommitInfo>,
}

/// JSON-file cache of commit extractions.
pub struct ExtractionCache {
    dir: PathBuf,
    ttl: Duration,
}

impl ExtractionCache {
    /// Cache in `dir` whose entries expire after `ttl`.
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    /// Directory holding the cache files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Cached commits for `key`, if present and fresh.
    pub fn get(&self, key: &CacheKey) -> Option<Vec<CommitInfo>> {
        self.get_at(key, Utc::now())
    }

    fn get_at(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<Vec<CommitInfo>> {
        let path = self.dir.join(key.file_name());
        if !path.exists() {
            debug!(path = %path.display(), "Extraction cache miss");
            return None;
        }

        let entry = match read_entry(&path) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Ignoring unreadable cache entry");
                return None;
            }
        };

        if entry.key != *key {
            debug!(path = %path.display(), "Cache entry belongs to a different key");
            return None;
        }

        let age = now.signed_duration_since(entry.stored_at);
        let expired = age.to_std().is_ok_and(|age| age > self.ttl);
        if expired {
            debug!(path = %path.display(), age_secs = age.num_seconds(), "Cache entry expired");
            return None;
        }

        debug!(path = %path.display(), commits = entry.commits.len(), "Extraction cache hit");
        Some(entry.commits)
    }

    /// Stores `commits` under `key`. Failures are logged, not returned.
    pub fn put(&self, key: &CacheKey, commits: &[CommitInfo]) {
        if let Err(e) = self.write_entry(key, commits) {
            warn!(error = %e, "Failed to write extraction cache");
        }
    }

    fn write_entry(&self, key: &CacheKey, commits: &[CommitInfo]) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create cache directory: {}", self.dir.display()))?;

        let entry = CacheEntry {
            key: key.clone(),
            stored_at: Utc::now(),
            commits: commits.to_vec(),
        };
        let path = self.dir.join(key.file_name());
        let json = serde_json::to_string(&entry).context("Failed to serialize cache entry")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write cache file: {}", path.display()))?;

        debug!(path = %path.display(), commits = commits.len(), "Stored extraction");
        Ok(())
    }
}

fn read_entry(path: &Path) -> Result<CacheEntry> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read cache file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse cache file: {}", path.display()))
}
