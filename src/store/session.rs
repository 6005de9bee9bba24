//! Resumable performance checkpoints.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::density::DensityMode;
use crate::git::CommitInfo;
use crate::screenplay::Scene;
use crate::store::slug;

/// Token identifying a performance of `commits` in `mode`.
///
/// Built from the first and last commit's short hash, so the same range
/// staged the same way resumes the same session.
pub fn resume_token(commits: &[CommitInfo], mode: DensityMode) -> Option<String> {
    let first = commits.first()?;
    let last = commits.last()?;
    Some(format!("{}-{}-{mode}", first.short_hash, last.short_hash))
}

/// Scenes written so far for one performance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Resume token.
    pub token: String,
    /// Density mode the scenes were planned with.
    pub mode: DensityMode,
    /// Last checkpoint time.
    pub updated_at: DateTime<Utc>,
    /// Completed scenes in order.
    #[serde(default)]
    pub scenes: Vec<Scene>,
}

impl Session {
    /// An empty session.
    pub fn new(token: impl Into<String>, mode: DensityMode) -> Self {
        Self {
            token: token.into(),
            mode,
            updated_at: Utc::now(),
            scenes: Vec::new(),
        }
    }
}

/// Directory of session files, one JSON file per token.
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Store rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the session files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, token: &str) -> PathBuf {
        self.dir.join(format!("{}.json", slug(token)))
    }

    /// The saved session for `token`, if one can be read.
    pub fn load(&self, token: &str) -> Option<Session> {
        let path = self.path_for(token);
        if !path.exists() {
            return None;
        }

        let session = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read session file: {}", path.display()))
            .and_then(|content| {
                serde_json::from_str::<Session>(&content)
                    .with_context(|| format!("Failed to parse session file: {}", path.display()))
            });

        match session {
            Ok(session) if session.token == token => {
                debug!(token, scenes = session.scenes.len(), "Loaded session");
                Some(session)
            }
            Ok(_) => {
                warn!(path = %path.display(), "Session file holds a different token");
                None
            }
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable session");
                None
            }
        }
    }

    /// Writes `session`, replacing any earlier checkpoint for its token.
    pub fn save(&self, session: &Session) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create session directory: {}", self.dir.display())
        })?;

        let path = self.path_for(&session.token);
        let json = serde_json::to_string_pretty(session).context("Failed to serialize session")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write session file: {}", path.display()))?;

        debug!(token = %session.token, scenes = session.scenes.len(), "Saved session");
        Ok(())
    }

    /// Deletes the checkpoint for `token`, if any.
    pub fn remove(&self, token: &str) -> Result<()> {
        let path = self.path_for(token);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove session file: {}", path.display()))?;
        }
        Ok(())
    }
}
