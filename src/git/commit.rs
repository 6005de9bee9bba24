//! Commit records and per-file diff statistics.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Offset, Utc};
use git2::{Commit, Delta, Patch, Repository};
use serde::{Deserialize, Serialize};

use crate::git::SHORT_HASH_LEN;

/// How a file was touched by a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// File was created.
    Added,
    /// File contents changed.
    Modified,
    /// File was removed.
    Deleted,
    /// File was moved, possibly with edits.
    Renamed,
}

impl FileStatus {
    /// Maps a git2 delta onto the four statuses the stage cares about.
    ///
    /// Copies and type changes are reported as modifications.
    pub fn from_delta(delta: Delta) -> Self {
        match delta {
            Delta::Added | Delta::Untracked => Self::Added,
            Delta::Deleted => Self::Deleted,
            Delta::Renamed => Self::Renamed,
            _ => Self::Modified,
        }
    }

    /// Single-letter status code in `git status` style.
    pub fn code(self) -> char {
        match self {
            Self::Added => 'A',
            Self::Modified => 'M',
            Self::Deleted => 'D',
            Self::Renamed => 'R',
        }
    }
}

/// A single file touched by a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    /// Path relative to the repository root (new path for renames).
    pub path: String,
    /// Lines added in this file.
    pub additions: usize,
    /// Lines removed from this file.
    pub deletions: usize,
    /// How the file was touched.
    pub status: FileStatus,
}

/// Commit author identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Author {
    /// Display name.
    pub name: String,
    /// Email address, used as the identity key.
    pub email: String,
}

/// One commit with the metadata and diff stats the stage needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Full SHA-1 hash.
    pub hash: String,
    /// Abbreviated hash.
    pub short_hash: String,
    /// Full commit message, subject and body.
    pub message: String,
    /// Commit author.
    pub author: Author,
    /// Author date with its original offset.
    pub date: DateTime<FixedOffset>,
    /// Files touched, in diff order.
    pub files: Vec<FileChange>,
    /// Total lines added across all files.
    pub additions: usize,
    /// Total lines removed across all files.
    pub deletions: usize,
    /// Parent hashes.
    pub parents: Vec<String>,
}

impl CommitInfo {
    /// Creates a `CommitInfo` from a git2 commit, diffing against its first parent.
    pub fn from_git_commit(repo: &Repository, commit: &Commit) -> Result<Self> {
        let hash = commit.id().to_string();
        let short_hash = hash.chars().take(SHORT_HASH_LEN).collect();

        let signature = commit.author();
        let author = Author {
            name: signature.name().unwrap_or("Unknown").to_string(),
            email: signature.email().unwrap_or("unknown@example.com").to_string(),
        };

        let when = signature.when();
        let offset = FixedOffset::east_opt(when.offset_minutes() * 60).unwrap_or_else(|| Utc.fix());
        let date = DateTime::from_timestamp(when.seconds(), 0)
            .context("Invalid commit timestamp")?
            .with_timezone(&offset);

        let message = commit.message().unwrap_or("").trim_end().to_string();
        let parents = commit.parent_ids().map(|id| id.to_string()).collect();

        let files = collect_file_changes(repo, commit)?;
        let additions = files.iter().map(|f| f.additions).sum();
        let deletions = files.iter().map(|f| f.deletions).sum();

        Ok(Self {
            hash,
            short_hash,
            message,
            author,
            date,
            files,
            additions,
            deletions,
            parents,
        })
    }

    /// First line of the message.
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("").trim()
    }

    /// Message text after the subject line, trimmed.
    pub fn body(&self) -> &str {
        match self.message.split_once('\n') {
            Some((_, rest)) => rest.trim(),
            None => "",
        }
    }

    /// Lines added plus lines removed.
    pub fn changed_lines(&self) -> usize {
        self.additions + self.deletions
    }

    /// Whether this commit has more than one parent.
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

/// Diffs a commit against its first parent (or the empty tree) and collects
/// per-file line statistics.
fn collect_file_changes(repo: &Repository, commit: &Commit) -> Result<Vec<FileChange>> {
    let commit_tree = commit.tree().context("Failed to get commit tree")?;

    let parent_tree = if commit.parent_count() > 0 {
        Some(
            commit
                .parent(0)
                .context("Failed to get parent commit")?
                .tree()
                .context("Failed to get parent tree")?,
        )
    } else {
        None
    };

    let mut diff = repo
        .diff_tree_to_tree(parent_tree.as_ref(), Some(&commit_tree), None)
        .context("Failed to create diff")?;
    diff.find_similar(None)
        .context("Failed to detect renamed files")?;

    let delta_count = diff.deltas().len();
    let mut files = Vec::with_capacity(delta_count);

    for idx in 0..delta_count {
        let Some(delta) = diff.get_delta(idx) else {
            continue;
        };

        let path = delta
            .new_file()
            .path()
            .or_else(|| delta.old_file().path())
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();

        // Binary files have no patch and count as zero lines.
        let (additions, deletions) = match Patch::from_diff(&diff, idx)
            .with_context(|| format!("Failed to build patch for {path}"))?
        {
            Some(patch) => {
                let (_, additions, deletions) = patch
                    .line_stats()
                    .with_context(|| format!("Failed to count lines for {path}"))?;
                (additions, deletions)
            }
            None => (0, 0),
        };

        files.push(FileChange {
            path,
            additions,
            deletions,
            status: FileStatus::from_delta(delta.status()),
        });
    }

    Ok(files)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn commit_with_message(message: &str) -> CommitInfo {
        CommitInfo {
            hash: "a".repeat(40),
            short_hash: "a".repeat(SHORT_HASH_LEN),
            message: message.to_string(),
            author: Author {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
            },
            date: DateTime::parse_from_rfc3339("2024-01-01T00:00:00+00:00").unwrap(),
            files: Vec::new(),
            additions: 3,
            deletions: 4,
            parents: vec!["b".repeat(40)],
        }
    }

    #[test]
    fn subject_and_body_split() {
        let commit = commit_with_message("feat: add stage\n\nLonger explanation.\nMore.");
        assert_eq!(commit.subject(), "feat: add stage");
        assert_eq!(commit.body(), "Longer explanation.\nMore.");
    }

    #[test]
    fn body_empty_for_single_line() {
        let commit = commit_with_message("fix: typo");
        assert_eq!(commit.body(), "");
    }

    #[test]
    fn changed_lines_sums_both_directions() {
        assert_eq!(commit_with_message("x").changed_lines(), 7);
    }

    #[test]
    fn merge_detection() {
        let mut commit = commit_with_message("Merge branch 'x'");
        assert!(!commit.is_merge());
        commit.parents.push("c".repeat(40));
        assert!(commit.is_merge());
    }

    #[test]
    fn status_codes() {
        assert_eq!(FileStatus::from_delta(Delta::Added).code(), 'A');
        assert_eq!(FileStatus::from_delta(Delta::Deleted).code(), 'D');
        assert_eq!(FileStatus::from_delta(Delta::Renamed).code(), 'R');
        assert_eq!(FileStatus::from_delta(Delta::Copied), FileStatus::Modified);
        assert_eq!(FileStatus::from_delta(Delta::Typechange), FileStatus::Modified);
    }
}
