//! Flatten a path tree into per-node records for diagram rendering.

use crate::palette::UNGROUPED_COLOR;
use crate::patterns::page_type::{classify_page_type, PageType};
use crate::patterns::types::UrlPatternGroup;
use crate::tree::{NodeKind, PathTreeNode};
use serde::Serialize;
use std::collections::HashMap;

/// One diagram node: a tree node plus its page type and pattern membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SitemapNode {
    /// Slash-joined chain of segments from the top-level host.
    pub id: String,
    pub parent_id: Option<String>,
    pub label: String,
    pub hostname: Option<String>,
    /// Host-relative path, `/` for host roots.
    pub full_path: String,
    pub depth: usize,
    /// Terminal URLs in this node's subtree.
    pub url_count: usize,
    pub page_type: PageType,
    pub is_leaf: bool,
    pub pattern_id: Option<String>,
    /// Legend color of the owning pattern, or the ungrouped color.
    pub color: String,
}

struct Frame<'a> {
    node: &'a PathTreeNode,
    parent_id: Option<String>,
    parent_segment: &'a str,
    sibling_count: usize,
    hostname: Option<&'a str>,
}

/// Flatten `root` in preorder. The synthetic root is not emitted; its hosts
/// become top-level nodes.
pub fn summarize_tree(root: &PathTreeNode, patterns: &[UrlPatternGroup]) -> Vec<SitemapNode> {
    let mut membership: HashMap<(&str, &str), &UrlPatternGroup> = HashMap::new();
    for group in patterns {
        for url in &group.matched_urls {
            membership
                .entry((url.hostname.as_str(), url.path.as_str()))
                .or_insert(group);
        }
    }

    let mut stack: Vec<Frame<'_>> = Vec::new();
    if root.is_synthetic_root() {
        let count = root.children.len();
        for host in root.children.iter().rev() {
            stack.push(Frame {
                node: host,
                parent_id: None,
                parent_segment: "",
                sibling_count: count,
                hostname: None,
            });
        }
    } else {
        stack.push(Frame {
            node: root,
            parent_id: None,
            parent_segment: "",
            sibling_count: 1,
            hostname: None,
        });
    }

    let mut nodes = Vec::new();
    while let Some(frame) = stack.pop() {
        let node = frame.node;
        let hostname = match node.kind {
            NodeKind::Host => Some(node.segment.as_str()),
            NodeKind::SyntheticRoot | NodeKind::Segment => frame.hostname,
        };
        let id = match &frame.parent_id {
            Some(parent) => format!("{parent}/{}", node.segment),
            None => node.segment.clone(),
        };
        let full_path = if node.full_path.is_empty() {
            "/".to_string()
        } else {
            node.full_path.clone()
        };
        let group = hostname.and_then(|host| membership.get(&(host, full_path.as_str())));
        let pattern_id = group.map(|g| g.id.clone());
        let color = group.map_or(UNGROUPED_COLOR, |g| g.color.as_str()).to_string();
        let verdict = classify_page_type(node, frame.sibling_count, frame.parent_segment);

        for child in node.children.iter().rev() {
            stack.push(Frame {
                node: child,
                parent_id: Some(id.clone()),
                parent_segment: &node.segment,
                sibling_count: node.children.len(),
                hostname,
            });
        }

        nodes.push(SitemapNode {
            id,
            parent_id: frame.parent_id,
            label: node.segment.clone(),
            hostname: hostname.map(String::from),
            full_path,
            depth: node.depth,
            url_count: node.url_count(),
            page_type: verdict.page_type,
            is_leaf: node.is_leaf(),
            pattern_id,
            color,
        });
    }

    nodes
}
