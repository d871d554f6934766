//! Tunable constants for the analysis passes.

use crate::error::{AtlasError, Result};
use serde::{Deserialize, Serialize};

/// Thresholds and grid sizes used by the visual pipeline and DOM grouping.
///
/// Every field has a default, so a partial JSON document deserializes into a
/// complete config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Side length of the grayscale grid used for perceptual hashing.
    pub hash_grid_size: u32,
    /// Side length of the grayscale grid used for SSIM and pixel diffs.
    pub ssim_grid_size: u32,
    /// SSIM window side length.
    pub ssim_window: u32,
    /// Minimum hash similarity for the provisional grouping pass.
    pub hash_threshold: f64,
    /// Minimum SSIM against the group representative to stay in a group.
    pub ssim_threshold: f64,
    /// Minimum DOM similarity for merging leftover singletons.
    pub dom_threshold: f64,
    /// Default threshold for standalone DOM grouping.
    pub dom_group_threshold: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            hash_grid_size: 32,
            ssim_grid_size: 128,
            ssim_window: 8,
            hash_threshold: 0.85,
            ssim_threshold: 0.75,
            dom_threshold: 0.6,
            dom_group_threshold: 0.7,
        }
    }
}

impl AnalysisConfig {
    /// Parse a config from JSON, filling unspecified fields with defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| AtlasError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that thresholds are ratios and grid sizes are usable.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("hash_threshold", self.hash_threshold),
            ("ssim_threshold", self.ssim_threshold),
            ("dom_threshold", self.dom_threshold),
            ("dom_group_threshold", self.dom_group_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AtlasError::Config(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }

        if self.hash_grid_size == 0 || self.ssim_grid_size == 0 {
            return Err(AtlasError::Config("grid sizes must be non-zero".into()));
        }
        // Hash hex encoding packs 4 bits per digit.
        if (self.hash_grid_size * self.hash_grid_size) % 4 != 0 {
            return Err(AtlasError::Config(format!(
                "hash_grid_size {} does not yield a whole number of hex digits",
                self.hash_grid_size
            )));
        }
        if self.ssim_window == 0 || self.ssim_window > self.ssim_grid_size {
            return Err(AtlasError::Config(format!(
                "ssim_window {} must be within 1..={}",
                self.ssim_window, self.ssim_grid_size
            )));
        }

        Ok(())
    }
}
