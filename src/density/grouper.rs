//! Partitioning a commit history into scene groups.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::density::scorer::{is_pivotal, rank_pivotal_indices};
use crate::density::theme::infer_theme;
use crate::density::{DensityConfig, DensityMode};
use crate::git::CommitInfo;

/// How a scene group is dramatized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneKind {
    /// One ordinary commit, staged on its own.
    Single,
    /// Several commits compressed into one summary scene.
    Montage,
    /// One pivotal commit given the full treatment.
    Highlight,
}

/// A unit of dramatization wrapping one or more commits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneGroup<'a> {
    /// How the group is staged.
    pub kind: SceneKind,
    /// Theme label; only montages carry one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Wrapped commits in chronological order. Never empty.
    pub commits: Vec<&'a CommitInfo>,
    /// Set for highlights only.
    pub is_pivotal: bool,
}

impl<'a> SceneGroup<'a> {
    /// A scene for one ordinary commit.
    pub fn single(commit: &'a CommitInfo) -> Self {
        Self {
            kind: SceneKind::Single,
            title: None,
            commits: vec![commit],
            is_pivotal: false,
        }
    }

    /// A titled summary scene.
    pub fn montage(title: impl Into<String>, commits: Vec<&'a CommitInfo>) -> Self {
        Self {
            kind: SceneKind::Montage,
            title: Some(title.into()),
            commits,
            is_pivotal: false,
        }
    }

    /// A scene for one pivotal commit.
    pub fn highlight(commit: &'a CommitInfo) -> Self {
        Self {
            kind: SceneKind::Highlight,
            title: None,
            commits: vec![commit],
            is_pivotal: true,
        }
    }
}

/// The scene plan for one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityResult<'a> {
    /// Strategy used to build the scenes.
    pub mode: DensityMode,
    /// Scene groups in emission order.
    pub scenes: Vec<SceneGroup<'a>>,
    /// Number of input commits.
    pub total_commits: usize,
    /// Number of scene groups.
    pub scenes_count: usize,
}

impl<'a> DensityResult<'a> {
    /// All wrapped commits in emission order.
    pub fn flattened(&self) -> impl Iterator<Item = &'a CommitInfo> + '_ {
        self.scenes.iter().flat_map(|s| s.commits.iter().copied())
    }

    /// Number of highlight scenes.
    pub fn pivotal_count(&self) -> usize {
        self.scenes.iter().filter(|s| s.is_pivotal).count()
    }
}

/// Partitions `commits` into scene groups using the strategy for `mode`.
///
/// Empty input produces an empty plan.
pub fn build_scene_groups<'a>(
    commits: &'a [CommitInfo],
    mode: DensityMode,
    config: &DensityConfig,
) -> DensityResult<'a> {
    let scenes = match mode {
        DensityMode::Full => full_scenes(commits),
        DensityMode::Montage => montage_scenes(commits, config),
        DensityMode::Highlights => highlight_scenes(commits, config),
    };

    debug!(
        %mode,
        total_commits = commits.len(),
        scenes = scenes.len(),
        "Built scene groups"
    );

    DensityResult {
        mode,
        total_commits: commits.len(),
        scenes_count: scenes.len(),
        scenes,
    }
}

fn full_scenes(commits: &[CommitInfo]) -> Vec<SceneGroup<'_>> {
    commits.iter().map(SceneGroup::single).collect()
}

/// A contiguous stretch of commits under one title.
struct ThemeRun<'a> {
    title: String,
    commits: Vec<&'a CommitInfo>,
}

fn montage_scenes<'a>(commits: &'a [CommitInfo], config: &DensityConfig) -> Vec<SceneGroup<'a>> {
    let runs = merge_small_runs(theme_runs(commits), config.merge_below);
    let mut scenes = Vec::with_capacity(runs.len());

    for run in runs {
        if let [only] = run.commits.as_slice() {
            scenes.push(SceneGroup::single(*only));
            continue;
        }

        // Only the first pivotal commit of a run is pulled out.
        match run.commits.iter().position(|c| is_pivotal(c, config)) {
            None => scenes.push(SceneGroup::montage(run.title, run.commits)),
            Some(idx) => {
                let mut rest = run.commits;
                let pivotal = rest.remove(idx);
                if !rest.is_empty() {
                    scenes.push(SceneGroup::montage(run.title, rest));
                }
                scenes.push(SceneGroup::highlight(pivotal));
            }
        }
    }

    scenes
}

/// Splits commits into maximal runs of consecutive commits sharing a theme.
///
/// Each commit's theme is inferred on its own.
fn theme_runs(commits: &[CommitInfo]) -> Vec<ThemeRun<'_>> {
    let mut runs: Vec<ThemeRun<'_>> = Vec::new();

    for commit in commits {
        let theme = infer_theme(&[commit]);
        match runs.last_mut() {
            Some(run) if run.title == theme => run.commits.push(commit),
            _ => runs.push(ThemeRun {
                title: theme.to_string(),
                commits: vec![commit],
            }),
        }
    }

    runs
}

/// Greedily folds adjacent runs that are both shorter than `merge_below`.
///
/// The accumulated run keeps absorbing small neighbours until it reaches
/// `merge_below` commits.
fn merge_small_runs(runs: Vec<ThemeRun<'_>>, merge_below: usize) -> Vec<ThemeRun<'_>> {
    let mut merged: Vec<ThemeRun<'_>> = Vec::with_capacity(runs.len());

    for run in runs {
        match merged.last_mut() {
            Some(acc) if acc.commits.len() < merge_below && run.commits.len() < merge_below => {
                acc.title = format!("{} & {}", acc.title, run.title);
                acc.commits.extend(run.commits);
            }
            _ => merged.push(run),
        }
    }

    merged
}

fn highlight_scenes<'a>(commits: &'a [CommitInfo], config: &DensityConfig) -> Vec<SceneGroup<'a>> {
    let checkpoints = rank_pivotal_indices(commits, config.highlight_count);
    let mut scenes = Vec::with_capacity(checkpoints.len() * 2 + 1);
    let mut cursor = 0;

    for idx in checkpoints {
        push_montage_span(&mut scenes, &commits[cursor..idx]);
        scenes.push(SceneGroup::highlight(&commits[idx]));
        cursor = idx + 1;
    }
    push_montage_span(&mut scenes, &commits[cursor..]);

    scenes
}

fn push_montage_span<'a>(scenes: &mut Vec<SceneGroup<'a>>, span: &'a [CommitInfo]) {
    if span.is_empty() {
        return;
    }
    let commits: Vec<&CommitInfo> = span.iter().collect();
    let title = infer_theme(&commits);
    scenes.push(SceneGroup::montage(title, commits));
}
