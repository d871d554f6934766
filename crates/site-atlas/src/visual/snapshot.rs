//! Captured pages handed to the visual classifier.

use crate::visual::dom::SimplifiedDomNode;
use crate::visual::image_ref::ImageRef;
use serde::{Deserialize, Serialize};

/// Capture state reported by whatever fetched the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotStatus {
    Pending,
    Fetching,
    Success,
    Error,
    Blocked,
}

/// One rendered page: URL, capture status, screenshot and DOM outline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub url: String,
    pub status: SnapshotStatus,
    #[serde(default)]
    pub image: Option<ImageRef>,
    #[serde(default, rename = "dom")]
    pub dom_tree: Option<SimplifiedDomNode>,
}

impl PageSnapshot {
    pub fn new(url: impl Into<String>, status: SnapshotStatus) -> Self {
        Self {
            url: url.into(),
            status,
            image: None,
            dom_tree: None,
        }
    }

    pub fn with_image(mut self, image: ImageRef) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_dom(mut self, dom: SimplifiedDomNode) -> Self {
        self.dom_tree = Some(dom);
        self
    }

    /// Captured successfully and carries an image.
    pub fn is_classifiable(&self) -> bool {
        self.status == SnapshotStatus::Success && self.image.is_some()
    }
}
