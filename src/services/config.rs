//! Duplicate-detection configuration.

use super::similarity::DUPLICATE_THRESHOLD;

/// Configuration for the save coordinator's duplicate detection.
///
/// # Environment Variables
///
/// | Variable | Type | Default | Description |
/// |----------|------|---------|-------------|
/// | `PROMPTHIVE_DEDUP_ENABLED` | bool | `true` | Enable the fuzzy-duplicate scan |
/// | `PROMPTHIVE_DEDUP_THRESHOLD` | f64 | `0.9` | Similarity ratio above which content is a duplicate |
/// | `PROMPTHIVE_DEDUP_LENGTH_PREFILTER` | bool | `true` | Skip candidates whose length rules the threshold out |
///
/// # Example
///
/// ```rust
/// use prompthive::DedupConfig;
///
/// let config = DedupConfig::default();
/// assert!(config.enabled);
/// assert_eq!(config.threshold, 0.9);
/// ```
#[derive(Debug, Clone)]
pub struct DedupConfig {
    /// Enable/disable the duplicate scan on create.
    pub enabled: bool,

    /// Similarity ratio above which content counts as a duplicate.
    pub threshold: f64,

    /// Skip the edit-distance computation for candidates whose length ratio
    /// already caps similarity below the threshold.
    ///
    /// Sound, not heuristic: distance is at least the length difference, so
    /// similarity can never exceed `shorter_len / longer_len`.
    pub length_prefilter: bool,
}

impl DedupConfig {
    /// Creates a configuration from environment variables.
    ///
    /// Falls back to defaults for any unset variables.
    #[must_use]
    pub fn from_env() -> Self {
        let enabled = std::env::var("PROMPTHIVE_DEDUP_ENABLED")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true);

        let threshold = std::env::var("PROMPTHIVE_DEDUP_THRESHOLD")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DUPLICATE_THRESHOLD);

        let length_prefilter = std::env::var("PROMPTHIVE_DEDUP_LENGTH_PREFILTER")
            .map(|v| v.to_lowercase() != "false" && v != "0")
            .unwrap_or(true);

        Self {
            enabled,
            threshold,
            length_prefilter,
        }
    }

    /// Builder method to set enabled state.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Builder method to set the similarity threshold.
    #[must_use]
    pub const fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Builder method to toggle the length pre-filter.
    #[must_use]
    pub const fn with_length_prefilter(mut self, enabled: bool) -> Self {
        self.length_prefilter = enabled;
        self
    }
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: DUPLICATE_THRESHOLD,
            length_prefilter: true,
        }
    }
}
