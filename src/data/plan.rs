//! Human-readable scene plan, printed by `commit-theatre plan`.

use serde::Serialize;

use crate::density::{infer_theme, score_commit, DensityMode, DensityResult, SceneGroup, SceneKind};
use crate::git::CommitInfo;

/// Owned, serializable view of a [`DensityResult`].
#[derive(Debug, Clone, Serialize)]
pub struct ScenePlan {
    /// Density strategy that produced the plan.
    pub mode: DensityMode,
    /// Number of input commits.
    pub total_commits: usize,
    /// Number of scenes.
    pub scenes_count: usize,
    /// Number of highlight scenes.
    pub pivotal_count: usize,
    /// Scenes in emission order.
    pub scenes: Vec<PlannedScene>,
}

/// One planned scene.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedScene {
    /// 1-based position in the production.
    pub number: usize,
    /// Staging kind.
    pub kind: SceneKind,
    /// Montage title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Theme of the wrapped commits.
    pub theme: String,
    /// Whether this is a pivotal highlight.
    pub pivotal: bool,
    /// Wrapped commits.
    pub commits: Vec<PlannedCommit>,
}

/// One commit line in the plan.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedCommit {
    /// Abbreviated hash.
    pub hash: String,
    /// First line of the message.
    pub subject: String,
    /// Author display name.
    pub author: String,
    /// Dramatic weight.
    pub score: u32,
}

impl From<&CommitInfo> for PlannedCommit {
    fn from(commit: &CommitInfo) -> Self {
        Self {
            hash: commit.short_hash.clone(),
            subject: commit.subject().to_string(),
            author: commit.author.name.clone(),
            score: score_commit(commit),
        }
    }
}

impl PlannedScene {
    fn new(number: usize, group: &SceneGroup<'_>) -> Self {
        Self {
            number,
            kind: group.kind,
            title: group.title.clone(),
            theme: infer_theme(&group.commits).to_string(),
            pivotal: group.is_pivotal,
            commits: group.commits.iter().map(|c| PlannedCommit::from(*c)).collect(),
        }
    }
}

impl From<&DensityResult<'_>> for ScenePlan {
    fn from(result: &DensityResult<'_>) -> Self {
        Self {
            mode: result.mode,
            total_commits: result.total_commits,
            scenes_count: result.scenes_count,
            pivotal_count: result.pivotal_count(),
            scenes: result
                .scenes
                .iter()
                .enumerate()
                .map(|(i, group)| PlannedScene::new(i + 1, group))
                .collect(),
        }
    }
}
