//! Perform command: the whole show, from history to curtain call.

use std::io::{self, IsTerminal};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use crate::ai::{create_default_client, AiClient};
use crate::cli::{extraction_cache, HistoryArgs};
use crate::density::DensityMode;
use crate::render::{stdout_stream, terminal_width, Renderer, Typewriter};
use crate::screenplay::{Cast, Orchestrator, StageDirections, TitleCard};
use crate::store::{resume_token, Session, SessionStore, StorePaths};
use crate::utils::{Settings, StageConfig};

/// Perform command options.
#[derive(Parser)]
pub struct PerformCommand {
    /// History selection and density flags.
    #[command(flatten)]
    pub history: HistoryArgs,

    /// AI model to use (overrides environment configuration).
    #[arg(long)]
    pub model: Option<String>,

    /// Stages scripted scenes without contacting an AI backend.
    #[arg(long)]
    pub offline: bool,

    /// Continues an interrupted performance of the same range.
    #[arg(long)]
    pub resume: bool,

    /// Typewriter delay per character in milliseconds.
    #[arg(long, value_name = "MS")]
    pub speed: Option<u64>,

    /// Prints text at once instead of typing it out.
    #[arg(long)]
    pub no_typewriter: bool,

    /// Reads history from git even when a cached extraction exists.
    #[arg(long)]
    pub no_cache: bool,
}

impl PerformCommand {
    /// Executes the perform command.
    pub async fn execute(self) -> Result<()> {
        let settings = Settings::load()?;
        let paths = StorePaths::default_paths()?;

        let cache = extraction_cache(
            !self.no_cache,
            paths.cache.clone(),
            settings.stage.cache_ttl_secs,
        );
        let history = self.history.load(cache.as_ref())?;
        let plan = self.history.plan(&history.commits, &settings.density);
        let cast = Cast::from_commits(&history.commits);

        let client = self.client()?;

        let sessions = SessionStore::new(paths.sessions);
        let token = resume_token(&history.commits, plan.mode)
            .context("No commits to perform")?;
        let session = self.session(&sessions, &token, plan.mode);

        info!(
            repository = %history.name,
            commits = history.commits.len(),
            mode = %plan.mode,
            scenes = plan.scenes_count,
            "Curtain up"
        );

        let mut renderer = Renderer::new(
            stdout_stream(),
            terminal_width(),
            self.typewriter(&settings.stage),
        );
        renderer.title_card(&TitleCard::new(
            history.name.as_str(),
            &history.commits,
            &plan,
            cast.len(),
        ))?;

        Orchestrator::new(client.as_deref(), StageDirections::from_stage(&settings.stage))
            .with_checkpoint(&sessions, session)
            .stage(&plan, &cast, |scene| renderer.scene(scene, &cast))
            .await?;

        renderer.curtain_call(&cast)?;
        eprintln!("Resume token: {token}");
        Ok(())
    }

    fn client(&self) -> Result<Option<Box<dyn AiClient>>> {
        if self.offline {
            return Ok(None);
        }

        let client = create_default_client(self.model.as_deref())
            .context("No AI backend available; pass --offline to stage scripted scenes")?;
        let metadata = client.get_metadata();
        eprintln!(
            "Connected to {} (model: {})",
            metadata.provider, metadata.model
        );
        Ok(Some(client))
    }

    fn session(
        &self,
        sessions: &SessionStore,
        token: &str,
        mode: DensityMode,
    ) -> Session {
        if self.resume {
            if let Some(session) = sessions.load(token) {
                eprintln!(
                    "Resuming {token} with {} scene(s) already written",
                    session.scenes.len()
                );
                return session;
            }
            eprintln!("No saved session for {token}; starting fresh");
        }
        Session::new(token, mode)
    }

    fn typewriter(&self, stage: &StageConfig) -> Typewriter {
        if self.no_typewriter || !io::stdout().is_terminal() {
            return Typewriter::instant();
        }
        let delay = self.speed.unwrap_or(stage.typewriter_delay_ms);
        Typewriter::new(Duration::from_millis(delay))
    }
}
