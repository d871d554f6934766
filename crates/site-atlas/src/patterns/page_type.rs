//! Classify a path node into the role it likely plays on the site.

use crate::patterns::segment::{is_dynamic_value, is_numeric};
use crate::tree::PathTreeNode;
use crate::urls::split_segments;
use serde::{Deserialize, Serialize};

const LISTING_KEYWORDS: &[&str] = &[
    "list",
    "index",
    "archive",
    "category",
    "tag",
    "search",
    "categories",
    "tags",
];

const DETAIL_KEYWORDS: &[&str] = &["detail", "item", "view", "post", "article"];

const PAGINATION_PARENT_KEYWORDS: &[&str] = &["page", "p"];

/// Likely site role of a path node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageType {
    Listing,
    Detail,
    Static,
    Pagination,
    Unknown,
}

/// A page type plus the evidence that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTypeVerdict {
    pub page_type: PageType,
    pub reason: String,
}

impl PageTypeVerdict {
    fn new(page_type: PageType, reason: impl Into<String>) -> Self {
        Self {
            page_type,
            reason: reason.into(),
        }
    }
}

/// Whether a segment names a pagination container (`page`, `p`).
pub fn is_pagination_parent(segment: &str) -> bool {
    let lower = segment.to_lowercase();
    PAGINATION_PARENT_KEYWORDS.contains(&lower.as_str())
}

/// Classify `node` given how many siblings it has and its parent's segment.
///
/// Rules are checked in order and the first match wins; nodes matching none
/// come back as [`PageType::Unknown`].
pub fn classify_page_type(
    node: &PathTreeNode,
    sibling_count: usize,
    parent_segment: &str,
) -> PageTypeVerdict {
    let segment = node.segment.as_str();

    if is_pagination_parent(parent_segment) && is_numeric(segment) {
        return PageTypeVerdict::new(
            PageType::Pagination,
            format!("matches the pagination pattern /{parent_segment}/{{number}}"),
        );
    }

    if !node.children.is_empty() {
        return PageTypeVerdict::new(
            PageType::Listing,
            format!(
                "has {} child pages, so it is treated as a listing or category page",
                node.children.len()
            ),
        );
    }

    if node.terminal_urls.is_empty() {
        return PageTypeVerdict::new(PageType::Unknown, "no rule matched this node");
    }

    let path_segments: Vec<String> = split_segments(&node.full_path.to_lowercase());
    let dynamic = is_dynamic_value(segment);

    if let Some(keyword) = find_keyword(&path_segments, LISTING_KEYWORDS) {
        return PageTypeVerdict::new(
            PageType::Listing,
            format!("path contains the listing keyword \"{keyword}\""),
        );
    }

    if sibling_count >= 2 && dynamic {
        return PageTypeVerdict::new(
            PageType::Detail,
            format!(
                "{sibling_count} similar pages share this parent and the path ends in the dynamic segment \"{segment}\""
            ),
        );
    }

    if let Some(keyword) = find_keyword(&path_segments, DETAIL_KEYWORDS) {
        return PageTypeVerdict::new(
            PageType::Detail,
            format!("path contains the detail keyword \"{keyword}\""),
        );
    }

    if !dynamic && sibling_count <= 2 {
        return PageTypeVerdict::new(
            PageType::Static,
            format!("fixed segment name \"{segment}\" with only {sibling_count} sibling page(s)"),
        );
    }

    if dynamic {
        return PageTypeVerdict::new(
            PageType::Detail,
            format!("path ends in the dynamic segment \"{segment}\""),
        );
    }

    PageTypeVerdict::new(PageType::Unknown, "no rule matched this node")
}

fn find_keyword<'a>(path_segments: &[String], keywords: &[&'a str]) -> Option<&'a str> {
    keywords
        .iter()
        .find(|kw| path_segments.iter().any(|s| s == *kw))
        .copied()
}
