//! Density mode selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::density::DensityConfig;

/// Overall compression strategy for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DensityMode {
    /// One scene per commit.
    Full,
    /// Themed montages with pivotal commits pulled out.
    Montage,
    /// Top-ranked commits highlighted, everything between summarized.
    Highlights,
}

impl fmt::Display for DensityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "full"),
            Self::Montage => write!(f, "montage"),
            Self::Highlights => write!(f, "highlights"),
        }
    }
}

impl FromStr for DensityMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "montage" => Ok(Self::Montage),
            "highlights" => Ok(Self::Highlights),
            other => Err(anyhow::anyhow!(
                "Unknown density mode '{other}'. Expected full, montage or highlights"
            )),
        }
    }
}

/// Explicit mode requests from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeOverrides {
    /// Stage every commit, whatever the count.
    pub full: bool,
    /// Stage only the highlights, whatever the count.
    pub highlights_only: bool,
}

/// Chooses the density mode for a history of `commit_count` commits.
///
/// Overrides win over the count thresholds, and `full` wins over
/// `highlights_only`.
pub fn select_mode(
    commit_count: usize,
    overrides: &ModeOverrides,
    config: &DensityConfig,
) -> DensityMode {
    if overrides.full {
        DensityMode::Full
    } else if overrides.highlights_only {
        DensityMode::Highlights
    } else if commit_count <= config.full_max {
        DensityMode::Full
    } else if commit_count <= config.montage_max {
        DensityMode::Montage
    } else {
        DensityMode::Highlights
    }
}
