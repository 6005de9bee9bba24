//! Casting commit authors as characters.

use std::collections::HashMap;

use termcolor::Color;

use crate::density::infer_theme;
use crate::git::{Author, CommitInfo};

/// Colors handed out to characters in billing order, wrapping around.
pub const PALETTE: &[Color] = &[
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Green,
    Color::Blue,
    Color::Red,
];

/// Maps a theme label onto a character archetype.
pub fn archetype_for(theme: &str) -> &'static str {
    match theme {
        "Bug Fixes" => "The Fixer",
        "New Features" => "The Visionary",
        "Refactoring" => "The Sculptor",
        "Testing" => "The Skeptic",
        "Documentation" => "The Scribe",
        "Code Style" => "The Perfectionist",
        "Performance" => "The Speedster",
        "Security" => "The Guardian",
        "Deployment" => "The Herald",
        "Configuration" => "The Tinkerer",
        _ => "The Builder",
    }
}

/// An author as they appear on stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Character {
    /// Upper-cased stage name, unique within the cast.
    pub name: String,
    /// Who the character stands for.
    pub author: Author,
    /// Role derived from the author's commits.
    pub archetype: &'static str,
    /// Color used for the character's name.
    pub color: Color,
    /// Commits by this author in the production.
    pub commit_count: usize,
}

/// Every character in a production, in billing order.
#[derive(Debug, Clone, Default)]
pub struct Cast {
    characters: Vec<Character>,
    by_email: HashMap<String, usize>,
}

impl Cast {
    /// Casts the authors of `commits`.
    ///
    /// Authors are identified by email. Billing is by commit count, most
    /// first, with ties going to whoever appeared first.
    pub fn from_commits(commits: &[CommitInfo]) -> Self {
        let mut order: Vec<&Author> = Vec::new();
        let mut work: HashMap<&str, Vec<&CommitInfo>> = HashMap::new();

        for commit in commits {
            let email = commit.author.email.as_str();
            let entry = work.entry(email).or_default();
            if entry.is_empty() {
                order.push(&commit.author);
            }
            entry.push(commit);
        }

        // Stable sort keeps first appearance among equal counts.
        order.sort_by_key(|author| std::cmp::Reverse(work[author.email.as_str()].len()));

        let mut cast = Self::default();
        for (i, author) in order.into_iter().enumerate() {
            let authored = &work[author.email.as_str()];
            let name = cast.unique_stage_name(author);
            cast.by_email.insert(author.email.clone(), i);
            cast.characters.push(Character {
                name,
                author: author.clone(),
                archetype: archetype_for(infer_theme(authored)),
                color: PALETTE[i % PALETTE.len()],
                commit_count: authored.len(),
            });
        }
        cast
    }

    /// Characters in billing order.
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    /// Whether nobody was cast.
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// The character playing `author`.
    pub fn character_for(&self, author: &Author) -> Option<&Character> {
        self.by_email
            .get(&author.email)
            .map(|&idx| &self.characters[idx])
    }

    /// Looks a character up by stage name, ignoring case.
    pub fn by_name(&self, name: &str) -> Option<&Character> {
        self.characters
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Characters whose authors wrote any of `commits`, in billing order.
    pub fn present_in(&self, commits: &[&CommitInfo]) -> Vec<&Character> {
        self.characters
            .iter()
            .filter(|character| {
                commits
                    .iter()
                    .any(|c| c.author.email == character.author.email)
            })
            .collect()
    }

    /// First name, then full name, then a numbered full name.
    fn unique_stage_name(&self, author: &Author) -> String {
        let full = if author.name.trim().is_empty() {
            author
                .email
                .split('@')
                .next()
                .unwrap_or("stranger")
                .to_uppercase()
        } else {
            author.name.trim().to_uppercase()
        };
        let first = full.split_whitespace().next().unwrap_or(&full).to_string();

        if !self.is_taken(&first) {
            return first;
        }
        if !self.is_taken(&full) {
            return full;
        }
        (2..)
            .map(|n| format!("{full} {n}"))
            .find(|candidate| !self.is_taken(candidate))
            .unwrap_or(full)
    }

    fn is_taken(&self, name: &str) -> bool {
        self.characters.iter().any(|c| c.name == name)
    }
}
