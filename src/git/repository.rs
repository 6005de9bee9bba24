//! Git repository operations

use std::path::Path;

use anyhow::{Context, Result};
use git2::{Oid, Repository, Revwalk};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::git::{CommitInfo, ExtractionError};

/// Filters applied while walking history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Keep commits with more than one parent.
    pub include_merges: bool,
    /// Keep only the most recent N commits of the range.
    pub max_commits: Option<usize>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            include_merges: true,
            max_commits: None,
        }
    }
}

/// Git repository wrapper
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Open repository at current directory
    pub fn open() -> Result<Self> {
        let repo = Repository::discover(".").context("Not in a git repository")?;

        Ok(Self { repo })
    }

    /// Open repository at specified path
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Repository::discover(path)
            .with_context(|| format!("Failed to open git repository at {}", path.display()))?;

        Ok(Self { repo })
    }

    /// Get access to the underlying git2::Repository
    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    /// Get workdir path
    pub fn workdir(&self) -> Option<&Path> {
        self.repo.workdir()
    }

    /// Name used on the title card: the working directory's folder name.
    pub fn name(&self) -> String {
        self.workdir()
            .and_then(|dir| dir.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "repository".to_string())
    }

    /// Full hash of the commit HEAD points at.
    pub fn head_id(&self) -> Result<String> {
        let head = self.repo.head().context("Failed to get HEAD reference")?;
        let commit = head
            .peel_to_commit()
            .context("Failed to peel HEAD to commit")?;
        Ok(commit.id().to_string())
    }

    /// Collects the commits of a range, oldest first.
    ///
    /// `None` walks all history reachable from HEAD, a single revision walks
    /// all history reachable from it, and `START..END` walks commits reachable
    /// from END but not from START.
    pub fn get_commits(
        &self,
        range: Option<&str>,
        options: &ExtractOptions,
    ) -> Result<Vec<CommitInfo>> {
        let label = range.unwrap_or("HEAD");
        let walker = self.walker_for(range)?;

        // Newest first, so the max_commits cut keeps the most recent ones.
        let mut oids = Vec::new();
        for oid in walker {
            let oid = oid.context("Failed to get commit OID from walker")?;
            if !options.include_merges {
                let commit = self
                    .repo
                    .find_commit(oid)
                    .context("Failed to find commit")?;
                if commit.parent_count() > 1 {
                    continue;
                }
            }
            oids.push(oid);
            if options.max_commits.is_some_and(|max| oids.len() >= max) {
                break;
            }
        }

        if oids.is_empty() {
            return Err(ExtractionError::EmptyRange(label.to_string()).into());
        }

        let mut commits = oids
            .iter()
            .map(|oid| {
                let commit = self
                    .repo
                    .find_commit(*oid)
                    .context("Failed to find commit")?;
                CommitInfo::from_git_commit(&self.repo, &commit)
            })
            .collect::<Result<Vec<_>>>()?;

        // Reverse to get chronological order (oldest first)
        commits.reverse();

        debug!(range = label, count = commits.len(), "Extracted commits");

        Ok(commits)
    }

    fn walker_for(&self, range: Option<&str>) -> Result<Revwalk<'_>> {
        let mut walker = self.repo.revwalk().context("Failed to create revwalk")?;
        walker
            .set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)
            .context("Failed to configure revwalk")?;

        match range {
            None => {
                walker.push_head().context("Failed to push HEAD")?;
            }
            Some(range) if range.contains("..") => {
                let (start_spec, end_spec) = range
                    .split_once("..")
                    .ok_or_else(|| ExtractionError::InvalidRange(range.to_string()))?;
                if start_spec.is_empty() || end_spec.is_empty() || end_spec.starts_with('.') {
                    return Err(ExtractionError::InvalidRange(range.to_string()).into());
                }

                let start = self.resolve(start_spec)?;
                let end = self.resolve(end_spec)?;
                walker.push(end).context("Failed to push end commit")?;
                walker.hide(start).context("Failed to hide start commit")?;
            }
            Some(rev) => {
                let oid = self.resolve(rev)?;
                walker.push(oid).context("Failed to push commit")?;
            }
        }

        Ok(walker)
    }

    fn resolve(&self, spec: &str) -> Result<Oid> {
        let obj = self
            .repo
            .revparse_single(spec)
            .with_context(|| format!("Failed to parse commit: {spec}"))?;
        let commit = obj
            .peel_to_commit()
            .with_context(|| format!("Failed to peel {spec} to a commit"))?;
        Ok(commit.id())
    }
}
