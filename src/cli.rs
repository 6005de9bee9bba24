//! CLI interface for commit-theatre.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

pub mod cache;
pub mod perform;
pub mod plan;

use crate::density::{
    build_scene_groups, select_mode, DensityConfig, DensityResult, ModeOverrides,
};
use crate::git::{CommitInfo, ExtractOptions, GitRepository};
use crate::store::{CacheKey, ExtractionCache};
use crate::utils::check_git_repository;

/// commit-theatre: your git history, staged as a screenplay.
#[derive(Parser)]
#[command(name = "commit-theatre")]
#[command(about = "Stage a repository's commit history as a screenplay", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Main commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Performs the screenplay in the terminal.
    Perform(perform::PerformCommand),
    /// Prints the scene plan as YAML without contacting an AI backend.
    Plan(plan::PlanCommand),
    /// Manages cached extractions and saved sessions.
    Cache(cache::CacheCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Perform(cmd) => cmd.execute().await,
            Commands::Plan(cmd) => cmd.execute(),
            Commands::Cache(cmd) => cmd.execute(),
        }
    }
}

/// Which history to stage and how densely.
#[derive(Args, Debug, Clone, Default)]
pub struct HistoryArgs {
    /// Commit range to stage (e.g., v1.0..HEAD, main~50..main). Defaults to all of HEAD.
    #[arg(value_name = "RANGE")]
    pub range: Option<String>,

    /// Repository to read instead of the current directory.
    #[arg(long, value_name = "PATH")]
    pub repo: Option<PathBuf>,

    /// Stages every commit as its own scene.
    #[arg(long, conflicts_with = "highlights_only")]
    pub full: bool,

    /// Stages only the most pivotal commits, with montages in between.
    #[arg(long)]
    pub highlights_only: bool,

    /// Keeps only the most recent N commits of the range.
    #[arg(long, value_name = "N")]
    pub max_commits: Option<usize>,

    /// Leaves merge commits out.
    #[arg(long)]
    pub no_merges: bool,
}

/// Commits read from a repository.
pub struct History {
    /// Repository name for the title card.
    pub name: String,
    /// Commits, oldest first.
    pub commits: Vec<CommitInfo>,
}

impl HistoryArgs {
    /// Extraction filters from the flags.
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            include_merges: !self.no_merges,
            max_commits: self.max_commits,
        }
    }

    /// Mode overrides from the flags.
    pub fn overrides(&self) -> ModeOverrides {
        ModeOverrides {
            full: self.full,
            highlights_only: self.highlights_only,
        }
    }

    fn open(&self) -> Result<GitRepository> {
        check_git_repository(self.repo.as_deref())?;
        match &self.repo {
            Some(path) => GitRepository::open_at(path),
            None => GitRepository::open(),
        }
    }

    /// Reads the requested commits, going through `cache` when given.
    pub fn load(&self, cache: Option<&ExtractionCache>) -> Result<History> {
        let repo = self.open()?;
        let options = self.extract_options();
        let range = self.range.as_deref();

        let key = match (cache, repo.head_id()) {
            (Some(_), Ok(head)) => Some(CacheKey::new(head, range, &options)),
            (Some(_), Err(e)) => {
                debug!(error = %e, "No HEAD to key the cache on");
                None
            }
            (None, _) => None,
        };

        if let (Some(cache), Some(key)) = (cache, key.as_ref()) {
            if let Some(commits) = cache.get(key) {
                return Ok(History {
                    name: repo.name(),
                    commits,
                });
            }
        }

        let commits = repo
            .get_commits(range, &options)
            .with_context(|| format!("Failed to read commits for {}", range.unwrap_or("HEAD")))?;

        if let (Some(cache), Some(key)) = (cache, key.as_ref()) {
            cache.put(key, &commits);
        }

        Ok(History {
            name: repo.name(),
            commits,
        })
    }

    /// Plans scenes for `commits` using the flags and `config`.
    pub fn plan<'a>(&self, commits: &'a [CommitInfo], config: &DensityConfig) -> DensityResult<'a> {
        let mode = select_mode(commits.len(), &self.overrides(), config);
        build_scene_groups(commits, mode, config)
    }
}

/// Extraction cache for `ttl_secs`, unless disabled.
pub(crate) fn extraction_cache(
    enabled: bool,
    dir: PathBuf,
    ttl_secs: u64,
) -> Option<ExtractionCache> {
    enabled.then(|| ExtractionCache::new(dir, Duration::from_secs(ttl_secs)))
}
