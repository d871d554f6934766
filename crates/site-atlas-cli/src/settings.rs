//! Resolve the analysis config from an optional file plus flag overrides.

use anyhow::{Context, Result};
use site_atlas::AnalysisConfig;
use std::path::Path;

/// Per-run threshold overrides from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConfigOverrides {
    pub hash_threshold: Option<f64>,
    pub ssim_threshold: Option<f64>,
    pub dom_threshold: Option<f64>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut AnalysisConfig) {
        if let Some(value) = self.hash_threshold {
            config.hash_threshold = value;
        }
        if let Some(value) = self.ssim_threshold {
            config.ssim_threshold = value;
        }
        if let Some(value) = self.dom_threshold {
            config.dom_threshold = value;
        }
    }
}

/// Load `path` (JSON) if given, otherwise start from defaults, then apply
/// overrides and validate the result.
pub fn load_config(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<AnalysisConfig> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            AnalysisConfig::from_json(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => AnalysisConfig::default(),
    };

    overrides.apply(&mut config);
    config.validate().context("invalid threshold override")?;
    tracing::debug!("analysis config resolved: {config:?}");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = load_config(None, &ConfigOverrides::default()).unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_file_then_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("atlas.json");
        std::fs::write(&path, r#"{"ssim_threshold": 0.9, "dom_threshold": 0.5}"#).unwrap();

        let overrides = ConfigOverrides {
            dom_threshold: Some(0.65),
            ..ConfigOverrides::default()
        };
        let config = load_config(Some(&path), &overrides).unwrap();
        assert_eq!(config.ssim_threshold, 0.9);
        assert_eq!(config.dom_threshold, 0.65);
        assert_eq!(config.hash_threshold, 0.85);
    }

    #[test]
    fn test_rejects_bad_override() {
        let overrides = ConfigOverrides {
            hash_threshold: Some(1.5),
            ..ConfigOverrides::default()
        };
        assert!(load_config(None, &overrides).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(
            Some(Path::new("/nonexistent/atlas.json")),
            &ConfigOverrides::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }
}
