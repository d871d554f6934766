//! URL pattern group types.

use crate::patterns::page_type::PageType;
use crate::patterns::segment::SegmentShape;
use crate::urls::NormalizedUrl;
use serde::{Deserialize, Serialize};

/// How a group was formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Siblings whose segment values look generated (IDs, slugs, UUIDs).
    Dynamic,
    /// Three or more fixed-name leaf pages under a common parent.
    StaticSiblings,
}

/// Shape of one path position within a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentAnalysis {
    pub position: usize,
    pub shape: SegmentShape,
    /// Up to five distinct values in first-seen order.
    pub sample_values: Vec<String>,
    pub unique_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternExplanation {
    pub summary: String,
    pub page_type_reason: String,
    pub segment_breakdown: Vec<SegmentAnalysis>,
}

/// A set of URLs sharing a parent path and a trailing segment shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlPatternGroup {
    /// `pattern-<n>` in discovery order.
    pub id: String,
    pub kind: PatternKind,
    /// Host whose subtree produced the group.
    pub hostname: Option<String>,
    pub parent_path: String,
    /// e.g. `/products/{id}`.
    pub display_pattern: String,
    pub matched_urls: Vec<NormalizedUrl>,
    pub page_type: PageType,
    pub color: String,
    pub explanation: PatternExplanation,
}

impl UrlPatternGroup {
    /// Shape of the varying (last) position.
    pub fn trailing_shape(&self) -> Option<SegmentShape> {
        self.explanation.segment_breakdown.last().map(|s| s.shape)
    }

    pub fn contains_path(&self, hostname: &str, path: &str) -> bool {
        self.matched_urls
            .iter()
            .any(|u| u.hostname == hostname && u.path == path)
    }
}
