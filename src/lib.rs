//! # commit-theatre
//!
//! Stages a git repository's commit history as a screenplay in the terminal.
//!
//! The interesting part is [`density`]: it decides how an arbitrarily long
//! history is compressed into a bounded number of scenes. Around it sit
//! history extraction ([`git`]), the AI backends ([`ai`]), scene writing
//! ([`screenplay`]), terminal output ([`render`]) and best-effort
//! persistence ([`store`]).
//!
//! ## Quick Start
//!
//! ```rust
//! use commit_theatre::density::{select_mode, DensityConfig, DensityMode, ModeOverrides};
//!
//! let mode = select_mode(120, &ModeOverrides::default(), &DensityConfig::default());
//! assert_eq!(mode, DensityMode::Montage);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod ai;
pub mod cli;
pub mod data;
pub mod density;
pub mod git;
pub mod render;
pub mod screenplay;
pub mod store;
pub mod utils;

pub use crate::cli::Cli;

/// The current version of commit-theatre.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
