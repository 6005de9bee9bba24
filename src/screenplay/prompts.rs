//! Prompt templates for scene writing.

use std::fmt::Write as _;

use crate::density::{infer_theme, SceneGroup, SceneKind};
use crate::git::CommitInfo;
use crate::screenplay::cast::Cast;

/// Longest commit body quoted in a highlight prompt.
const BODY_EXCERPT_CHARS: usize = 600;

/// System prompt shared by every scene request.
pub const SYSTEM_PROMPT: &str = r#"You are a playwright adapting the history of a software project into a stage screenplay. Each request describes one scene: the commits it covers, the theme, and the characters on stage. Characters are the commit authors; refer to them only by the stage names given.

Write with dry wit and real technical understanding. Ground every beat in the commits provided; never invent features, files or people that are not listed.

Respond with YAML only, in exactly this shape:

```yaml
heading: "INT. LOCATION - TIME"
narration: |
  Two to four sentences of action, present tense.
dialogue:
  - character: STAGE NAME
    direction: optional parenthetical, without parentheses
    line: What they say.
```

Rules:
- Use only the stage names listed under CAST for `character`.
- Keep dialogue to between two and six lines.
- Omit `direction` when it adds nothing.
- Do not wrap the YAML in any other prose.
"#;

/// Builds the user prompt for one scene.
pub fn scene_prompt(group: &SceneGroup<'_>, number: usize, total: usize, cast: &Cast) -> String {
    let mut prompt = String::new();

    let _ = writeln!(prompt, "SCENE {number} OF {total}");
    let _ = writeln!(prompt, "THEME: {}", infer_theme(&group.commits));
    prompt.push('\n');
    prompt.push_str(kind_instructions(group));
    prompt.push_str("\n\nCAST:\n");
    for character in cast.present_in(&group.commits) {
        let _ = writeln!(
            prompt,
            "- {} ({}), played by {}",
            character.name, character.archetype, character.author.name
        );
    }

    prompt.push_str("\nCOMMITS:\n");
    for commit in &group.commits {
        let _ = writeln!(prompt, "- {}", commit_line(commit, cast));
    }

    if group.kind == SceneKind::Highlight {
        if let Some(commit) = group.commits.first() {
            append_highlight_detail(&mut prompt, commit);
        }
    }

    prompt
}

fn kind_instructions(group: &SceneGroup<'_>) -> &'static str {
    match group.kind {
        SceneKind::Single => {
            "Stage this single commit as a short, self-contained scene. The author \
             explains or defends the change; others may react if present."
        }
        SceneKind::Montage => {
            "Stage these commits as a MONTAGE: quick cuts, time passing, the work \
             piling up. Summarize rather than walk through every commit."
        }
        SceneKind::Highlight => {
            "This is a PIVOTAL MOMENT in the project's history. Give it full \
             dramatic weight: stakes, tension, and a turning point."
        }
    }
}

fn commit_line(commit: &CommitInfo, cast: &Cast) -> String {
    let speaker = cast
        .character_for(&commit.author)
        .map_or_else(|| commit.author.name.clone(), |c| c.name.clone());
    format!(
        "{} \"{}\" by {} on {} [{} files, +{} -{}]",
        commit.short_hash,
        commit.subject(),
        speaker,
        commit.date.format("%Y-%m-%d %H:%M"),
        commit.files.len(),
        commit.additions,
        commit.deletions
    )
}

fn append_highlight_detail(prompt: &mut String, commit: &CommitInfo) {
    let body = commit.body();
    if !body.is_empty() {
        let excerpt: String = body.chars().take(BODY_EXCERPT_CHARS).collect();
        let _ = writeln!(prompt, "\nCOMMIT MESSAGE BODY:\n{excerpt}");
    }

    prompt.push_str("\nFILES TOUCHED:\n");
    for file in commit.files.iter().take(15) {
        let _ = writeln!(
            prompt,
            "- {} {} (+{} -{})",
            file.status.code(),
            file.path,
            file.additions,
            file.deletions
        );
    }
    if commit.files.len() > 15 {
        let _ = writeln!(prompt, "- ... and {} more", commit.files.len() - 15);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::density::test_utils::{by, commit, pivotal};

    #[test]
    fn single_prompt_lists_cast_and_commit() {
        let c = by(commit(0, "fix: off-by-one"), "Grace Hopper", "grace@example.com");
        let cast = Cast::from_commits(std::slice::from_ref(&c));
        let prompt = scene_prompt(&SceneGroup::single(&c), 1, 3, &cast);

        assert!(prompt.starts_with("SCENE 1 OF 3\nTHEME: Bug Fixes\n"));
        assert!(prompt.contains("- GRACE (The Fixer), played by Grace Hopper"));
        assert!(prompt.contains(
            "- 00000000 \"fix: off-by-one\" by GRACE on 2024-01-01 09:00 [1 files, +5 -1]"
        ));
        assert!(!prompt.contains("FILES TOUCHED"));
    }

    #[test]
    fn highlight_prompt_includes_body_and_files() {
        let mut p = pivotal(0, "breaking: new storage engine\n\nReplaces the B-tree.");
        p.author.name = "Ada Lovelace".to_string();
        let cast = Cast::from_commits(std::slice::from_ref(&p));
        let prompt = scene_prompt(&SceneGroup::highlight(&p), 2, 2, &cast);

        assert!(prompt.contains("PIVOTAL MOMENT"));
        assert!(prompt.contains("COMMIT MESSAGE BODY:\nReplaces the B-tree."));
        assert!(prompt.contains("- M src/module_0.rs (+600 -0)"));
        assert!(prompt.contains("- ... and 10 more"));
    }

    #[test]
    fn montage_prompt_only_casts_present_authors() {
        let commits = vec![
            by(commit(0, "test: a"), "Grace Hopper", "grace@example.com"),
            by(commit(1, "test: b"), "Ada Lovelace", "ada@example.com"),
        ];
        let cast = Cast::from_commits(&commits);
        let group = SceneGroup::montage("Testing", vec![&commits[1]]);
        let prompt = scene_prompt(&group, 1, 1, &cast);

        assert!(prompt.contains("MONTAGE"));
        assert!(prompt.contains("ADA (The Skeptic)"));
        assert!(!prompt.contains("GRACE"));
    }
}
