//! Density thresholds.

use serde::{Deserialize, Serialize};

/// Thresholds that steer mode selection and scene grouping.
///
/// The defaults keep output comparable between runs; the settings file may
/// override any field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DensityConfig {
    /// Largest commit count staged one scene per commit.
    pub full_max: usize,
    /// Largest commit count staged as themed montages.
    pub montage_max: usize,
    /// Number of commits highlighted when the history is larger still.
    pub highlight_count: usize,
    /// Minimum score for a commit to count as pivotal.
    pub pivotal_threshold: u32,
    /// Adjacent theme runs both shorter than this are merged.
    pub merge_below: usize,
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            full_max: 50,
            montage_max: 200,
            highlight_count: 25,
            pivotal_threshold: 5,
            merge_below: 3,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config: DensityConfig = serde_json::from_str(r#"{"full_max": 10}"#).unwrap();
        assert_eq!(config.full_max, 10);
        assert_eq!(config.montage_max, 200);
        assert_eq!(config.highlight_count, 25);
        assert_eq!(config.pivotal_threshold, 5);
        assert_eq!(config.merge_below, 3);
    }
}
