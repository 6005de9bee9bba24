//! Turning a scene plan into a screenplay: cast, prompts, scenes, and the
//! orchestrator that asks the AI backend for each scene.

pub mod cast;
pub mod orchestrator;
pub mod prompts;
pub mod scene;
pub mod title;

pub use cast::{archetype_for, Cast, Character};
pub use orchestrator::{Orchestrator, StageDirections};
pub use scene::{parse_scene_script, scripted_scene, DialogueLine, Scene, SceneScript, SceneSource};
pub use title::TitleCard;
