//! Theme labels for groups of commits.

use crate::git::CommitInfo;

/// Themes and their message keywords, in priority order.
///
/// Messages often match several themes; the first match wins, so a message
/// mentioning both "fix" and "test" is a bug fix.
pub const THEMES: &[(&str, &[&str])] = &[
    ("Bug Fixes", &["fix", "bug", "issue", "patch"]),
    ("New Features", &["feat", "add", "implement", "new"]),
    ("Refactoring", &["refactor", "clean", "reorganize"]),
    ("Testing", &["test", "spec", "coverage"]),
    ("Documentation", &["doc", "readme", "comment"]),
    ("Code Style", &["style", "format", "lint"]),
    ("Performance", &["perf", "optimize", "speed"]),
    ("Security", &["security", "auth", "permission"]),
    ("Deployment", &["deploy", "release", "version"]),
    ("Configuration", &["config", "setup", "install"]),
];

/// Label used when neither messages nor paths suggest a theme.
pub const FALLBACK_THEME: &str = "Development";

const TESTING_THEME: &str = "Testing";
const DOCUMENTATION_THEME: &str = "Documentation";

/// Infers the theme shared by a set of commits.
///
/// Message keywords are checked first; only when none match do the changed
/// file paths decide between testing, documentation and general development.
pub fn infer_theme(commits: &[&CommitInfo]) -> &'static str {
    let messages: Vec<String> = commits.iter().map(|c| c.message.to_lowercase()).collect();

    let by_message = THEMES.iter().find(|(_, keywords)| {
        messages
            .iter()
            .any(|message| keywords.iter().any(|keyword| message.contains(keyword)))
    });
    if let Some((theme, _)) = by_message {
        return theme;
    }

    let paths: Vec<&str> = commits
        .iter()
        .flat_map(|c| c.files.iter().map(|f| f.path.as_str()))
        .collect();

    if paths
        .iter()
        .any(|p| p.contains("test") || p.contains("spec"))
    {
        TESTING_THEME
    } else if paths.iter().any(|p| p.ends_with(".md") || p.contains("doc")) {
        DOCUMENTATION_THEME
    } else {
        FALLBACK_THEME
    }
}

/// Infers the theme of an owned slice of commits.
pub fn classify_theme(commits: &[CommitInfo]) -> &'static str {
    let refs: Vec<&CommitInfo> = commits.iter().collect();
    infer_theme(&refs)
}
