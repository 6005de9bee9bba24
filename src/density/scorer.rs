//! Dramatic weight of a commit.
//!
//! A commit's score is the sum of independent signals over its diff stats
//! and its lower-cased message. Commits at or above
//! [`DensityConfig::pivotal_threshold`] are pivotal and earn a scene of
//! their own.

use crate::density::DensityConfig;
use crate::git::CommitInfo;

/// Changed-line count above which a commit is large.
const LARGE_CHANGE_LINES: usize = 200;

/// Changed-line count above which a commit is huge (scored on top of large).
const HUGE_CHANGE_LINES: usize = 500;

/// File count above which a commit is wide.
const WIDE_CHANGE_FILES: usize = 10;

/// File count above which a commit is sweeping (scored on top of wide).
const SWEEPING_CHANGE_FILES: usize = 20;

/// Points per size threshold crossed.
const SIZE_POINTS: u32 = 2;

/// Message keywords and the points each contributes when present.
const KEYWORD_SIGNALS: &[(&str, u32)] = &[
    ("breaking", 3),
    ("major", 2),
    ("release", 2),
    ("revert", 2),
    ("merge", 1),
    ("hotfix", 2),
    ("security", 2),
];

/// Points for a message mentioning both "fix" and "critical".
const CRITICAL_FIX_POINTS: u32 = 2;

/// Points for a message starting with "feat".
const FEATURE_PREFIX_POINTS: u32 = 1;

/// Scores a commit's dramatic weight.
pub fn score_commit(commit: &CommitInfo) -> u32 {
    let message = commit.message.to_lowercase();
    let lines = commit.changed_lines();
    let files = commit.files.len();

    let mut score = 0;

    if lines > LARGE_CHANGE_LINES {
        score += SIZE_POINTS;
    }
    if lines > HUGE_CHANGE_LINES {
        score += SIZE_POINTS;
    }
    if files > WIDE_CHANGE_FILES {
        score += SIZE_POINTS;
    }
    if files > SWEEPING_CHANGE_FILES {
        score += SIZE_POINTS;
    }

    score += KEYWORD_SIGNALS
        .iter()
        .filter(|(keyword, _)| message.contains(keyword))
        .map(|(_, points)| points)
        .sum::<u32>();

    if message.contains("fix") && message.contains("critical") {
        score += CRITICAL_FIX_POINTS;
    }
    if message.starts_with("feat") {
        score += FEATURE_PREFIX_POINTS;
    }

    score
}

/// Whether a commit scores at or above the pivotal threshold.
pub fn is_pivotal(commit: &CommitInfo, config: &DensityConfig) -> bool {
    score_commit(commit) >= config.pivotal_threshold
}

/// Picks the `limit` highest-scoring commits and returns them in
/// chronological order.
///
/// Ties keep their original order, so earlier commits win a tie at the cut.
pub fn rank_pivotal(commits: &[CommitInfo], limit: usize) -> Vec<&CommitInfo> {
    rank_pivotal_indices(commits, limit)
        .into_iter()
        .map(|idx| &commits[idx])
        .collect()
}

/// Same selection as [`rank_pivotal`], as ascending indices into `commits`.
pub(crate) fn rank_pivotal_indices(commits: &[CommitInfo], limit: usize) -> Vec<usize> {
    let mut ranked: Vec<(usize, u32)> = commits
        .iter()
        .enumerate()
        .map(|(idx, commit)| (idx, score_commit(commit)))
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let mut selected: Vec<usize> = ranked.into_iter().take(limit).map(|(idx, _)| idx).collect();
    selected.sort_unstable();
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::density::test_utils::{commit, commits, with_stats};

    #[test]
    fn plain_commit_scores_zero() {
        assert_eq!(score_commit(&commit(0, "tweak wording")), 0);
    }

    #[test]
    fn every_signal_fires_together() {
        let c = with_stats(
            commit(0, "breaking: major release hotfix for critical fix"),
            600,
            25,
        );
        // 4 (lines) + 4 (files) + 3 + 2 + 2 + 2 (fix+critical) + 2 (hotfix)
        assert_eq!(score_commit(&c), 19);
        assert!(score_commit(&c) >= 19);
    }

    #[test]
    fn scoring_is_deterministic() {
        let c = with_stats(commit(0, "Revert security patch"), 300, 12);
        let first = score_commit(&c);
        for _ in 0..10 {
            assert_eq!(score_commit(&c), first);
        }
        // 2 (lines) + 2 (files) + 2 (revert) + 2 (security)
        assert_eq!(first, 8);
    }

    #[test]
    fn size_thresholds_are_exclusive() {
        assert_eq!(score_commit(&with_stats(commit(0, "x"), 200, 10)), 0);
        assert_eq!(score_commit(&with_stats(commit(0, "x"), 201, 11)), 4);
        assert_eq!(score_commit(&with_stats(commit(0, "x"), 500, 20)), 4);
        assert_eq!(score_commit(&with_stats(commit(0, "x"), 501, 21)), 8);
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(score_commit(&commit(0, "BREAKING change")), 3);
        assert_eq!(score_commit(&commit(0, "Merge branch 'main'")), 1);
    }

    #[test]
    fn fix_and_critical_both_required() {
        assert_eq!(score_commit(&commit(0, "critical path docs")), 0);
        assert_eq!(score_commit(&commit(0, "fix critical crash")), 2);
    }

    #[test]
    fn feat_only_counts_as_prefix() {
        assert_eq!(score_commit(&commit(0, "feat: add stage")), 1);
        assert_eq!(score_commit(&commit(0, "add feat flag")), 0);
    }

    #[test]
    fn pivotal_threshold_is_inclusive() {
        let config = DensityConfig::default();
        // 3 (breaking) + 2 (major) = 5
        assert!(is_pivotal(&commit(0, "breaking major"), &config));
        // 3 (breaking) + 1 (merge) = 4
        assert!(!is_pivotal(&commit(0, "breaking merge"), &config));

        let strict = DensityConfig {
            pivotal_threshold: 6,
            ..DensityConfig::default()
        };
        assert!(!is_pivotal(&commit(0, "breaking major"), &strict));
    }

    #[test]
    fn rank_returns_chronological_order() {
        let mut input = commits(&["a", "b", "c", "d", "e"]);
        input[0] = with_stats(input[0].clone(), 10, 1);
        input[1] = with_stats(input[1].clone(), 600, 25);
        input[3] = with_stats(input[3].clone(), 300, 1);
        input[4] = with_stats(input[4].clone(), 600, 11);

        let ranked = rank_pivotal(&input, 3);
        let hashes: Vec<&str> = ranked.iter().map(|c| c.hash.as_str()).collect();
        assert_eq!(
            hashes,
            vec![
                input[1].hash.as_str(),
                input[3].hash.as_str(),
                input[4].hash.as_str()
            ]
        );
        assert!(ranked.windows(2).all(|w| w[0].date <= w[1].date));
    }

    #[test]
    fn rank_ties_prefer_earlier_commits() {
        let input = commits(&["release one", "release two", "release three"]);
        let ranked = rank_pivotal(&input, 2);
        assert_eq!(ranked[0].hash, input[0].hash);
        assert_eq!(ranked[1].hash, input[1].hash);
    }

    #[test]
    fn rank_limit_larger_than_input() {
        let input = commits(&["a", "b"]);
        assert_eq!(rank_pivotal(&input, 25).len(), 2);
        assert!(rank_pivotal(&[], 25).is_empty());
    }
}
