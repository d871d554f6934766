//! Reading URL lists and snapshot manifests from disk.

use anyhow::{Context, Result};
use serde::Deserialize;
use site_atlas::visual::{ImageRef, PageSnapshot, SimplifiedDomNode, SnapshotStatus};
use std::path::{Path, PathBuf};

/// Lines of a URL list, minus `#` comments. Blank and malformed lines are
/// left for the normalizer to drop.
pub fn url_lines(text: &str) -> Vec<&str> {
    text.lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect()
}

pub fn read_url_list(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read URL list {}", path.display()))?;
    Ok(url_lines(&text).into_iter().map(String::from).collect())
}

/// One page in a snapshot manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestEntry {
    pub url: String,
    #[serde(default = "default_status")]
    pub status: SnapshotStatus,
    /// Image path relative to the manifest, or a `data:` URL.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub dom: Option<SimplifiedDomNode>,
}

fn default_status() -> SnapshotStatus {
    SnapshotStatus::Success
}

impl ManifestEntry {
    pub fn into_snapshot(self, base_dir: &Path) -> PageSnapshot {
        let image = self.image.map(|image| {
            if image.starts_with("data:") {
                ImageRef::DataUrl(image)
            } else {
                ImageRef::Path(resolve(base_dir, &image))
            }
        });
        PageSnapshot {
            url: self.url,
            status: self.status,
            image,
            dom_tree: self.dom,
        }
    }
}

fn resolve(base_dir: &Path, image: &str) -> PathBuf {
    let path = Path::new(image);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Parse manifest JSON; relative image paths resolve against `base_dir`.
pub fn parse_manifest(json: &str, base_dir: &Path) -> Result<Vec<PageSnapshot>> {
    let entries: Vec<ManifestEntry> =
        serde_json::from_str(json).context("manifest must be a JSON array of pages")?;
    Ok(entries
        .into_iter()
        .map(|entry| entry.into_snapshot(base_dir))
        .collect())
}

pub fn load_manifest(path: &Path) -> Result<Vec<PageSnapshot>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_manifest(&json, base_dir).with_context(|| format!("invalid manifest {}", path.display()))
}
