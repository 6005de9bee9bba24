//! Finished scenes and how they are read out of model responses.

use chrono::Timelike;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::{extract_yaml_block, from_yaml};
use crate::density::{SceneGroup, SceneKind};
use crate::git::CommitInfo;
use crate::screenplay::cast::Cast;

/// Where a scene's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneSource {
    /// Written by the AI backend.
    Ai,
    /// Built from commit data without a backend.
    Scripted,
}

/// One spoken line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLine {
    /// Stage name of the speaker.
    pub character: String,
    /// Parenthetical, without the parentheses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    /// What is said.
    #[serde(default)]
    pub line: String,
}

/// A scene ready for the stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// 1-based position in the production.
    pub number: usize,
    /// Staging kind of the underlying group.
    pub kind: SceneKind,
    /// Montage title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Whether this is a pivotal highlight.
    pub pivotal: bool,
    /// Short hashes of the wrapped commits.
    pub commits: Vec<String>,
    /// Slug line, e.g. `INT. SRC - NIGHT`.
    pub heading: String,
    /// Action text.
    #[serde(default)]
    pub narration: String,
    /// Spoken lines in order.
    #[serde(default)]
    pub dialogue: Vec<DialogueLine>,
    /// Origin of the text.
    pub source: SceneSource,
}

impl Scene {
    /// Builds a scene for `group` from a parsed model response.
    pub fn from_script(number: usize, group: &SceneGroup<'_>, script: SceneScript) -> Self {
        let heading = if script.heading.trim().is_empty() {
            scene_heading(group)
        } else {
            script.heading.trim().to_string()
        };

        Self {
            number,
            kind: group.kind,
            title: group.title.clone(),
            pivotal: group.is_pivotal,
            commits: short_hashes(group),
            heading,
            narration: script.narration.trim().to_string(),
            dialogue: script
                .dialogue
                .into_iter()
                .filter(|d| !d.line.trim().is_empty())
                .collect(),
            source: SceneSource::Ai,
        }
    }

    /// Whether this scene was staged from `group` at position `number`.
    ///
    /// Used to decide if a checkpointed scene can be reused.
    pub fn matches(&self, number: usize, group: &SceneGroup<'_>) -> bool {
        self.number == number && self.kind == group.kind && self.commits == short_hashes(group)
    }
}

/// The part of a scene a model writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SceneScript {
    /// Slug line.
    #[serde(default)]
    pub heading: String,
    /// Action text.
    #[serde(default)]
    pub narration: String,
    /// Spoken lines.
    #[serde(default)]
    pub dialogue: Vec<DialogueLine>,
}

impl SceneScript {
    fn is_empty(&self) -> bool {
        self.heading.trim().is_empty()
            && self.narration.trim().is_empty()
            && self.dialogue.is_empty()
    }
}

/// Reads a scene out of a model response.
///
/// The YAML may be fenced or bare. Anything that does not parse into a
/// scene becomes plain narration.
pub fn parse_scene_script(response: &str) -> SceneScript {
    match from_yaml::<SceneScript>(extract_yaml_block(response)) {
        Ok(script) if !script.is_empty() => script,
        Ok(_) => narration_only(response),
        Err(e) => {
            debug!(error = %e, "Scene response is not YAML, using it as narration");
            narration_only(response)
        }
    }
}

fn narration_only(response: &str) -> SceneScript {
    SceneScript {
        narration: response.trim().to_string(),
        ..SceneScript::default()
    }
}

/// Writes a scene from commit data alone.
pub fn scripted_scene(number: usize, group: &SceneGroup<'_>, cast: &Cast) -> Scene {
    let (narration, dialogue) = match group.kind {
        SceneKind::Montage => montage_script(group, cast),
        SceneKind::Single | SceneKind::Highlight => solo_script(group, cast),
    };

    Scene {
        number,
        kind: group.kind,
        title: group.title.clone(),
        pivotal: group.is_pivotal,
        commits: short_hashes(group),
        heading: scene_heading(group),
        narration,
        dialogue,
        source: SceneSource::Scripted,
    }
}

/// Most montages name at most this many speakers.
const MONTAGE_SPEAKERS: usize = 4;

fn solo_script(group: &SceneGroup<'_>, cast: &Cast) -> (String, Vec<DialogueLine>) {
    let mut narration = String::new();
    let mut dialogue = Vec::new();

    for commit in &group.commits {
        let speaker = speaker_name(commit, cast);
        let stats = diff_summary(commit);
        if group.is_pivotal {
            narration.push_str(&format!(
                "The room falls silent. {speaker} pushes {}: {stats}. Nothing will be the same.",
                commit.short_hash
            ));
        } else {
            let archetype = cast
                .character_for(&commit.author)
                .map_or("", |c| c.archetype);
            narration.push_str(&format!(
                "{speaker}{}{} commits {}: {stats}.",
                if archetype.is_empty() { "" } else { ", " },
                archetype.to_lowercase(),
                commit.short_hash
            ));
        }
        dialogue.push(DialogueLine {
            character: speaker,
            direction: group.is_pivotal.then(|| "gravely".to_string()),
            line: commit.subject().to_string(),
        });
    }

    (narration, dialogue)
}

fn montage_script(group: &SceneGroup<'_>, cast: &Cast) -> (String, Vec<DialogueLine>) {
    let title = group.title.as_deref().unwrap_or("Development");
    let (first, last) = match (group.commits.first(), group.commits.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return (String::new(), Vec::new()),
    };

    let narration = format!(
        "MONTAGE: {} commits of {} from {} to {}.",
        group.commits.len(),
        title.to_lowercase(),
        first.date.format("%b %-d, %Y"),
        last.date.format("%b %-d, %Y"),
    );

    let mut dialogue = Vec::new();
    for commit in &group.commits {
        let speaker = speaker_name(commit, cast);
        if dialogue.iter().any(|d: &DialogueLine| d.character == speaker) {
            continue;
        }
        dialogue.push(DialogueLine {
            character: speaker,
            direction: None,
            line: commit.subject().to_string(),
        });
        if dialogue.len() == MONTAGE_SPEAKERS {
            break;
        }
    }

    (narration, dialogue)
}

fn speaker_name(commit: &CommitInfo, cast: &Cast) -> String {
    cast.character_for(&commit.author)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| commit.author.name.to_uppercase())
}

fn diff_summary(commit: &CommitInfo) -> String {
    let files = commit.files.len();
    format!(
        "{files} {}, +{} -{}",
        if files == 1 { "file" } else { "files" },
        commit.additions,
        commit.deletions
    )
}

fn short_hashes(group: &SceneGroup<'_>) -> Vec<String> {
    group.commits.iter().map(|c| c.short_hash.clone()).collect()
}

/// Screenplay slug line for a group.
///
/// Montages are labelled as such. Other scenes take place in the top-level
/// directory that changed most, at the time of day of the commit.
pub fn scene_heading(group: &SceneGroup<'_>) -> String {
    if group.kind == SceneKind::Montage {
        let title = group.title.as_deref().unwrap_or("Development");
        return format!("MONTAGE - {}", title.to_uppercase());
    }

    let Some(commit) = group.commits.first() else {
        return "INT. REPOSITORY - DAY".to_string();
    };
    let prefix = if group.is_pivotal { "EXT." } else { "INT." };
    format!("{prefix} {} - {}", location(commit), time_of_day(commit))
}

fn location(commit: &CommitInfo) -> String {
    commit
        .files
        .iter()
        .max_by_key(|f| f.additions + f.deletions)
        .map(|f| match f.path.split_once('/') {
            Some((dir, _)) => dir.to_uppercase(),
            None => "PROJECT ROOT".to_string(),
        })
        .unwrap_or_else(|| "EMPTY STAGE".to_string())
}

fn time_of_day(commit: &CommitInfo) -> &'static str {
    match commit.date.hour() {
        5..=11 => "MORNING",
        12..=16 => "AFTERNOON",
        17..=20 => "EVENING",
        _ => "NIGHT",
    }
}
