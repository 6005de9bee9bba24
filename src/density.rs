//! Scene density: how a commit history is compressed into a bounded
//! number of dramatizable scenes.
//!
//! Everything in here is pure and synchronous. Commits are borrowed, never
//! reordered, and every input commit lands in exactly one scene group.

pub mod config;
pub mod grouper;
pub mod mode;
pub mod scorer;
pub mod theme;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::DensityConfig;
pub use grouper::{build_scene_groups, DensityResult, SceneGroup, SceneKind};
pub use mode::{select_mode, DensityMode, ModeOverrides};
pub use scorer::{is_pivotal, rank_pivotal, score_commit};
pub use theme::{classify_theme, infer_theme};
