//! Path tree node type.

use crate::urls::NormalizedUrl;
use serde::Serialize;
use std::collections::HashMap;

/// Segment label of the synthetic root that joins several hosts.
pub const ROOT_SENTINEL: &str = "(root)";

/// What a tree node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Synthetic root over several hosts, or the root of an empty tree.
    SyntheticRoot,
    /// Per-host root; its segment is the hostname.
    Host,
    /// One path segment below a host.
    Segment,
}

/// One level of the path hierarchy.
#[derive(Debug, Clone, Serialize)]
pub struct PathTreeNode {
    pub kind: NodeKind,
    pub segment: String,
    /// Host-relative path from the host root; empty for roots.
    pub full_path: String,
    pub depth: usize,
    /// Children in first-seen order, unique by segment.
    pub children: Vec<PathTreeNode>,
    /// URLs whose path ends exactly here.
    pub terminal_urls: Vec<NormalizedUrl>,
    #[serde(skip)]
    child_index: HashMap<String, usize>,
}

impl PathTreeNode {
    pub(crate) fn new(kind: NodeKind, segment: &str, full_path: String, depth: usize) -> Self {
        Self {
            kind,
            segment: segment.to_string(),
            full_path,
            depth,
            children: Vec::new(),
            terminal_urls: Vec::new(),
            child_index: HashMap::new(),
        }
    }

    pub(crate) fn synthetic_root() -> Self {
        Self::new(NodeKind::SyntheticRoot, ROOT_SENTINEL, String::new(), 0)
    }

    /// Look up a direct child by exact segment value.
    pub fn child(&self, segment: &str) -> Option<&PathTreeNode> {
        self.child_index.get(segment).map(|&i| &self.children[i])
    }

    /// Return the child for `segment`, creating it on first sight.
    pub(crate) fn child_or_insert(
        &mut self,
        segment: &str,
        full_path: impl FnOnce() -> String,
    ) -> &mut PathTreeNode {
        let idx = match self.child_index.get(segment).copied() {
            Some(idx) => idx,
            None => {
                let node =
                    PathTreeNode::new(NodeKind::Segment, segment, full_path(), self.depth + 1);
                self.children.push(node);
                let idx = self.children.len() - 1;
                self.child_index.insert(segment.to_string(), idx);
                idx
            }
        };
        &mut self.children[idx]
    }

    pub(crate) fn push_child(&mut self, node: PathTreeNode) {
        self.child_index.insert(node.segment.clone(), self.children.len());
        self.children.push(node);
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_synthetic_root(&self) -> bool {
        self.kind == NodeKind::SyntheticRoot
    }

    /// Number of terminal URLs in this subtree, this node included.
    pub fn url_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += node.terminal_urls.len();
            stack.extend(node.children.iter());
        }
        count
    }

    /// Terminal URLs of this subtree in preorder.
    pub fn collect_urls(&self) -> Vec<&NormalizedUrl> {
        let mut urls = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            urls.extend(node.terminal_urls.iter());
            stack.extend(node.children.iter().rev());
        }
        urls
    }
}
