//! Commit fixtures shared by unit tests.

#![allow(clippy::unwrap_used)]

use chrono::{DateTime, Duration};

use crate::git::{Author, CommitInfo, FileChange, FileStatus};

/// Builds a small commit whose hash and timestamp derive from `seq`.
///
/// Commits built with increasing `seq` are in chronological order.
pub(crate) fn commit(seq: usize, message: &str) -> CommitInfo {
    let hash = format!("{seq:040x}");
    let base = DateTime::parse_from_rfc3339("2024-01-01T09:00:00+00:00").unwrap();

    CommitInfo {
        short_hash: hash[hash.len() - 8..].to_string(),
        hash,
        message: message.to_string(),
        author: Author {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        },
        date: base + Duration::hours(seq as i64),
        files: vec![FileChange {
            path: "src/lib.rs".to_string(),
            additions: 5,
            deletions: 1,
            status: FileStatus::Modified,
        }],
        additions: 5,
        deletions: 1,
        parents: Vec::new(),
    }
}

/// Replaces a commit's diff stats with `files` files totalling `lines`
/// added lines.
pub(crate) fn with_stats(mut commit: CommitInfo, lines: usize, files: usize) -> CommitInfo {
    commit.files = (0..files)
        .map(|i| FileChange {
            path: format!("src/module_{i}.rs"),
            additions: if i == 0 { lines } else { 0 },
            deletions: 0,
            status: FileStatus::Modified,
        })
        .collect();
    commit.additions = lines;
    commit.deletions = 0;
    commit
}

/// Replaces a commit's files with the given paths.
pub(crate) fn with_paths(mut commit: CommitInfo, paths: &[&str]) -> CommitInfo {
    commit.files = paths
        .iter()
        .map(|p| FileChange {
            path: (*p).to_string(),
            additions: 1,
            deletions: 0,
            status: FileStatus::Modified,
        })
        .collect();
    commit.additions = paths.len();
    commit.deletions = 0;
    commit
}

/// Sets the author of a commit.
pub(crate) fn by(mut commit: CommitInfo, name: &str, email: &str) -> CommitInfo {
    commit.author = Author {
        name: name.to_string(),
        email: email.to_string(),
    };
    commit
}

/// A commit that scores well above the pivotal threshold.
pub(crate) fn pivotal(seq: usize, message: &str) -> CommitInfo {
    with_stats(commit(seq, message), 600, 25)
}

/// Builds commits numbered from 0 with the given messages.
pub(crate) fn commits(messages: &[&str]) -> Vec<CommitInfo> {
    messages
        .iter()
        .enumerate()
        .map(|(i, m)| commit(i, m))
        .collect()
}
