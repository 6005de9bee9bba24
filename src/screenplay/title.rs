//! Title card shown before the first scene.

use crate::density::{DensityMode, DensityResult};
use crate::git::CommitInfo;

/// Facts printed on the title card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleCard {
    /// Repository name.
    pub repository: String,
    /// Density mode of the production.
    pub mode: DensityMode,
    /// Commits covered.
    pub commit_count: usize,
    /// Scenes to be staged.
    pub scene_count: usize,
    /// Characters in the cast.
    pub cast_size: usize,
    /// `(short hash, date)` of the first commit.
    pub opening: Option<(String, String)>,
    /// `(short hash, date)` of the last commit.
    pub closing: Option<(String, String)>,
}

impl TitleCard {
    /// Title card for staging `commits` as `plan`.
    pub fn new(
        repository: impl Into<String>,
        commits: &[CommitInfo],
        plan: &DensityResult<'_>,
        cast_size: usize,
    ) -> Self {
        let mark = |c: &CommitInfo| (c.short_hash.clone(), c.date.format("%Y-%m-%d").to_string());
        Self {
            repository: repository.into(),
            mode: plan.mode,
            commit_count: plan.total_commits,
            scene_count: plan.scenes_count,
            cast_size,
            opening: commits.first().map(mark),
            closing: commits.last().map(mark),
        }
    }

    /// "A play in N scenes" line.
    pub fn subtitle(&self) -> String {
        let scenes = if self.scene_count == 1 { "scene" } else { "scenes" };
        format!("A {} play in {} {scenes}", self.mode, self.scene_count)
    }

    /// Commit span line, e.g. `a1b2c3d4 (2024-01-01) .. e5f6a7b8 (2024-03-09)`.
    pub fn span(&self) -> Option<String> {
        let (first, first_date) = self.opening.as_ref()?;
        let (last, last_date) = self.closing.as_ref()?;
        Some(format!("{first} ({first_date}) .. {last} ({last_date})"))
    }
}
