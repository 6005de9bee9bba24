use chrono::{DateTime, Duration};
use commit_theatre::density::{
    build_scene_groups, rank_pivotal, score_commit, select_mode, DensityConfig, DensityMode,
    ModeOverrides, SceneKind,
};
use commit_theatre::git::{Author, CommitInfo, FileChange, FileStatus};
use proptest::prelude::*;

const MESSAGES: &[&str] = &[
    "fix: null check",
    "feat: add exporter",
    "refactor parser",
    "test: cover edge cases",
    "docs: update readme",
    "perf: optimize lookup",
    "chore: bump version for release",
    "breaking: drop legacy api",
    "hotfix for critical fix",
    "tweak wording",
];

fn build_commit(seq: usize, message: &str, lines: usize, files: usize) -> CommitInfo {
    let hash = format!("{seq:040x}");
    let base = DateTime::parse_from_rfc3339("2024-01-01T09:00:00+00:00").unwrap();
    let files: Vec<FileChange> = (0..files.max(1))
        .map(|i| FileChange {
            path: format!("src/file_{i}.rs"),
            additions: if i == 0 { lines } else { 0 },
            deletions: 0,
            status: FileStatus::Modified,
        })
        .collect();

    CommitInfo {
        short_hash: hash[hash.len() - 8..].to_string(),
        hash,
        message: message.to_string(),
        author: Author {
            name: format!("Author {}", seq % 3),
            email: format!("author{}@example.com", seq % 3),
        },
        date: base + Duration::minutes(seq as i64),
        files,
        additions: lines,
        deletions: 0,
        parents: Vec::new(),
    }
}

fn history() -> impl Strategy<Value = Vec<CommitInfo>> {
    prop::collection::vec(
        (0..MESSAGES.len(), 0usize..700, 1usize..30),
        0..120,
    )
    .prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(seq, (msg, lines, files))| build_commit(seq, MESSAGES[msg], lines, files))
            .collect()
    })
}

fn config() -> impl Strategy<Value = DensityConfig> {
    (1usize..10, 0u32..12, 1usize..6).prop_map(|(highlight_count, pivotal_threshold, merge_below)| {
        DensityConfig {
            highlight_count,
            pivotal_threshold,
            merge_below,
            ..DensityConfig::default()
        }
    })
}

fn hashes<'a>(commits: impl Iterator<Item = &'a CommitInfo>) -> Vec<&'a str> {
    commits.map(|c| c.hash.as_str()).collect()
}

proptest! {
    #[test]
    fn every_commit_appears_exactly_once(commits in history(), config in config()) {
        for mode in [DensityMode::Full, DensityMode::Montage, DensityMode::Highlights] {
            let result = build_scene_groups(&commits, mode, &config);

            let mut flat = hashes(result.flattened());
            let mut expected = hashes(commits.iter());
            flat.sort_unstable();
            expected.sort_unstable();

            prop_assert_eq!(flat, expected);
            prop_assert_eq!(result.scenes_count, result.scenes.len());
            prop_assert_eq!(result.total_commits, commits.len());
            prop_assert!(result.scenes.iter().all(|s| !s.commits.is_empty()));
        }
    }

    #[test]
    fn full_and_highlights_keep_chronological_order(commits in history(), config in config()) {
        for mode in [DensityMode::Full, DensityMode::Highlights] {
            let result = build_scene_groups(&commits, mode, &config);
            prop_assert_eq!(hashes(result.flattened()), hashes(commits.iter()));
        }
    }

    #[test]
    fn highlights_stage_the_top_ranked_commits(commits in history(), config in config()) {
        let result = build_scene_groups(&commits, DensityMode::Highlights, &config);
        let highlighted: Vec<&str> = result
            .scenes
            .iter()
            .filter(|s| s.kind == SceneKind::Highlight)
            .flat_map(|s| s.commits.iter().map(|c| c.hash.as_str()))
            .collect();

        prop_assert_eq!(highlighted.len(), config.highlight_count.min(commits.len()));
        prop_assert_eq!(highlighted, hashes(rank_pivotal(&commits, config.highlight_count).into_iter()));
        prop_assert!(result
            .scenes
            .windows(2)
            .all(|pair| !(pair[0].kind == SceneKind::Montage && pair[1].kind == SceneKind::Montage)));
    }

    #[test]
    fn montage_highlights_are_pivotal(commits in history(), config in config()) {
        let result = build_scene_groups(&commits, DensityMode::Montage, &config);
        for scene in result.scenes.iter().filter(|s| s.kind == SceneKind::Highlight) {
            prop_assert!(scene.is_pivotal);
            prop_assert!(score_commit(scene.commits[0]) >= config.pivotal_threshold);
        }
    }

    #[test]
    fn ranking_is_chronological_and_outscores_the_rest(commits in history(), limit in 0usize..15) {
        let ranked = rank_pivotal(&commits, limit);
        prop_assert_eq!(ranked.len(), limit.min(commits.len()));
        prop_assert!(ranked.windows(2).all(|pair| pair[0].date <= pair[1].date));

        let lowest_kept = ranked.iter().map(|c| score_commit(c)).min();
        if let Some(lowest_kept) = lowest_kept {
            let kept = hashes(ranked.iter().copied());
            let best_dropped = commits
                .iter()
                .filter(|c| !kept.contains(&c.hash.as_str()))
                .map(score_commit)
                .max();
            prop_assert!(best_dropped <= Some(lowest_kept));
        }
    }

    #[test]
    fn mode_follows_commit_count(count in 0usize..500) {
        let config = DensityConfig::default();
        let mode = select_mode(count, &ModeOverrides::default(), &config);
        let expected = if count <= config.full_max {
            DensityMode::Full
        } else if count <= config.montage_max {
            DensityMode::Montage
        } else {
            DensityMode::Highlights
        };
        prop_assert_eq!(mode, expected);
    }
}
