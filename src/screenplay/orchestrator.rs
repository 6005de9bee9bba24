//! Drives scene writing over a density plan.

use std::time::Duration;

use anyhow::Result;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::ai::{AiClient, AiError};
use crate::density::{DensityResult, SceneGroup};
use crate::screenplay::cast::Cast;
use crate::screenplay::prompts::{scene_prompt, SYSTEM_PROMPT};
use crate::screenplay::scene::{parse_scene_script, scripted_scene, Scene};
use crate::store::{Session, SessionStore};
use crate::utils::settings::StageConfig;

/// Pacing and retry policy for AI requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageDirections {
    /// Minimum time between the starts of two requests.
    pub request_interval: Duration,
    /// Additional attempts after a failed request.
    pub retries: u32,
    /// Wait before the first retry; doubles on each further retry.
    pub backoff: Duration,
}

impl StageDirections {
    /// Directions from the `stage` settings section.
    pub fn from_stage(stage: &StageConfig) -> Self {
        Self {
            request_interval: Duration::from_millis(stage.request_interval_ms),
            retries: stage.retries,
            backoff: Duration::from_secs(1),
        }
    }
}

impl Default for StageDirections {
    fn default() -> Self {
        Self::from_stage(&StageConfig::default())
    }
}

struct Checkpoint<'a> {
    store: &'a SessionStore,
    session: Session,
}

/// Writes one scene per scene group, in order.
///
/// Without a client every scene is scripted from commit data. With one,
/// each group gets a single request (plus retries); a group whose requests
/// all fail is scripted instead.
pub struct Orchestrator<'a> {
    client: Option<&'a dyn AiClient>,
    directions: StageDirections,
    checkpoint: Option<Checkpoint<'a>>,
    last_request: Option<Instant>,
}

impl<'a> Orchestrator<'a> {
    /// Orchestrator using `client`, or scripting everything when `None`.
    pub fn new(client: Option<&'a dyn AiClient>, directions: StageDirections) -> Self {
        Self {
            client,
            directions,
            checkpoint: None,
            last_request: None,
        }
    }

    /// Checkpoints every finished scene into `store`.
    ///
    /// Scenes already in `session` are reused as long as they still line up
    /// with the plan.
    pub fn with_checkpoint(mut self, store: &'a SessionStore, session: Session) -> Self {
        self.checkpoint = Some(Checkpoint { store, session });
        self
    }

    /// Stages every group of `plan`, calling `on_scene` as each scene is ready.
    pub async fn stage<F>(
        &mut self,
        plan: &DensityResult<'_>,
        cast: &Cast,
        mut on_scene: F,
    ) -> Result<Vec<Scene>>
    where
        F: FnMut(&Scene) -> Result<()>,
    {
        let total = plan.scenes.len();
        let mut resumed = match self.checkpoint.as_mut() {
            Some(checkpoint) => std::mem::take(&mut checkpoint.session.scenes).into_iter(),
            None => Vec::new().into_iter(),
        };
        let mut resuming = true;
        let mut scenes = Vec::with_capacity(total);

        info!(
            mode = %plan.mode,
            scenes = total,
            offline = self.client.is_none(),
            "Staging production"
        );

        for (idx, group) in plan.scenes.iter().enumerate() {
            let number = idx + 1;

            let reused = if resuming {
                resumed.next().filter(|scene| scene.matches(number, group))
            } else {
                None
            };

            let scene = match reused {
                Some(scene) => {
                    debug!(scene = number, "Reusing checkpointed scene");
                    scene
                }
                None => {
                    resuming = false;
                    self.write_scene(group, number, total, cast).await
                }
            };

            self.save_checkpoint(&scene);
            on_scene(&scene)?;
            scenes.push(scene);
        }

        Ok(scenes)
    }

    async fn write_scene(
        &mut self,
        group: &SceneGroup<'_>,
        number: usize,
        total: usize,
        cast: &Cast,
    ) -> Scene {
        let Some(client) = self.client else {
            return scripted_scene(number, group, cast);
        };

        let prompt = scene_prompt(group, number, total, cast);
        let attempts = self.directions.retries + 1;

        for attempt in 0..attempts {
            self.pace().await;
            debug!(scene = number, attempt = attempt + 1, "Requesting scene");

            match client.send_request(SYSTEM_PROMPT, &prompt).await {
                Ok(response) => {
                    return Scene::from_script(number, group, parse_scene_script(&response));
                }
                Err(e) => {
                    let transient = e
                        .downcast_ref::<AiError>()
                        .map_or(true, AiError::is_transient);
                    warn!(
                        scene = number,
                        attempt = attempt + 1,
                        transient,
                        error = %e,
                        "Scene request failed"
                    );
                    if !transient {
                        break;
                    }
                    if attempt + 1 < attempts {
                        let wait = self.directions.backoff * 2u32.saturating_pow(attempt);
                        if !wait.is_zero() {
                            sleep(wait).await;
                        }
                    }
                }
            }
        }

        warn!(scene = number, "Falling back to a scripted scene");
        scripted_scene(number, group, cast)
    }

    /// Waits until the request interval has passed since the last request.
    async fn pace(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.directions.request_interval {
                sleep(self.directions.request_interval - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }

    fn save_checkpoint(&mut self, scene: &Scene) {
        let Some(checkpoint) = self.checkpoint.as_mut() else {
            return;
        };
        checkpoint.session.scenes.push(scene.clone());
        checkpoint.session.updated_at = chrono::Utc::now();
        if let Err(e) = checkpoint.store.save(&checkpoint.session) {
            warn!(error = %e, "Failed to checkpoint session");
        }
    }
}
