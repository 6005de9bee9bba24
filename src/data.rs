//! Data views and serialization.

pub mod plan;
pub mod yaml;

pub use plan::{PlannedCommit, PlannedScene, ScenePlan};
pub use yaml::{extract_yaml_block, from_yaml, to_yaml};
