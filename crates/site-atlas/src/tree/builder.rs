//! Build a path tree from normalized URLs.

use crate::tree::types::{NodeKind, PathTreeNode};
use crate::urls::NormalizedUrl;
use std::collections::HashMap;

/// Accumulates URLs and assembles the tree in one go.
///
/// Hosts are kept in first-seen order so that the resulting tree is stable
/// between runs on identical input.
#[derive(Debug, Default)]
pub struct PathTreeBuilder {
    hosts: Vec<(String, Vec<NormalizedUrl>)>,
    host_index: HashMap<String, usize>,
}

impl PathTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_url(&mut self, url: NormalizedUrl) {
        let idx = match self.host_index.get(&url.hostname) {
            Some(&idx) => idx,
            None => {
                self.hosts.push((url.hostname.clone(), Vec::new()));
                self.host_index
                    .insert(url.hostname.clone(), self.hosts.len() - 1);
                self.hosts.len() - 1
            }
        };
        self.hosts[idx].1.push(url);
    }

    /// Assemble the tree.
    ///
    /// One host: that host is the root. Several hosts: a synthetic root with
    /// one depth-1 child per host. No URLs: a bare synthetic root.
    pub fn build(self) -> PathTreeNode {
        match self.hosts.len() {
            0 => PathTreeNode::synthetic_root(),
            1 => {
                let (hostname, urls) = self.hosts.into_iter().next().unwrap_or_default();
                host_subtree(&hostname, urls, 0)
            }
            _ => {
                let mut root = PathTreeNode::synthetic_root();
                for (hostname, urls) in self.hosts {
                    root.push_child(host_subtree(&hostname, urls, 1));
                }
                root
            }
        }
    }
}

/// Build a tree for a deduplicated URL set.
pub fn build_tree(urls: &[NormalizedUrl]) -> PathTreeNode {
    let mut builder = PathTreeBuilder::new();
    for url in urls {
        builder.add_url(url.clone());
    }
    let tree = builder.build();
    tracing::debug!(
        "built path tree from {} URLs: root {:?} with {} children",
        urls.len(),
        tree.segment,
        tree.children.len()
    );
    tree
}

fn host_subtree(hostname: &str, urls: Vec<NormalizedUrl>, depth: usize) -> PathTreeNode {
    let mut host = PathTreeNode::new(NodeKind::Host, hostname, String::new(), depth);
    for url in urls {
        insert_url(&mut host, url);
    }
    host
}

fn insert_url(host: &mut PathTreeNode, url: NormalizedUrl) {
    let mut current = host;
    for (i, segment) in url.path_segments.iter().enumerate() {
        let segments = &url.path_segments;
        current = current.child_or_insert(segment, || format!("/{}", segments[..=i].join("/")));
    }
    current.terminal_urls.push(url);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::types::ROOT_SENTINEL;
    use crate::urls::{parse_list, split_segments};

    fn tree_from(urls: &[&str]) -> PathTreeNode {
        build_tree(&parse_list(urls))
    }

    fn sorted_segments(node: &PathTreeNode) -> Vec<String> {
        let mut segs: Vec<String> = node.children.iter().map(|c| c.segment.clone()).collect();
        segs.sort();
        segs
    }

    #[test]
    fn test_single_level() {
        let tree = tree_from(&["https://example.com/about", "https://example.com/contact"]);
        assert_eq!(tree.segment, "example.com");
        assert_eq!(tree.kind, NodeKind::Host);
        assert_eq!(sorted_segments(&tree), vec!["about", "contact"]);
    }

    #[test]
    fn test_multi_level() {
        let tree = tree_from(&[
            "https://example.com/products/shoes/nike",
            "https://example.com/products/shoes/adidas",
            "https://example.com/products/hats",
        ]);
        let products = tree.child("products").unwrap();
        assert_eq!(products.children.len(), 2);
        let shoes = products.child("shoes").unwrap();
        assert_eq!(shoes.children.len(), 2);
    }

    #[test]
    fn test_root_url_attaches_to_host() {
        let tree = tree_from(&["https://example.com/"]);
        assert_eq!(tree.segment, "example.com");
        assert_eq!(tree.terminal_urls.len(), 1);
        assert!(tree.children.is_empty());
    }

    #[test]
    fn test_multiple_hosts_get_synthetic_root() {
        let tree = tree_from(&["https://example.com/page1", "https://other.com/page2"]);
        assert_eq!(tree.segment, ROOT_SENTINEL);
        assert!(tree.is_synthetic_root());
        assert_eq!(tree.depth, 0);
        assert_eq!(sorted_segments(&tree), vec!["example.com", "other.com"]);
        for host in &tree.children {
            assert_eq!(host.depth, 1);
            assert_eq!(host.kind, NodeKind::Host);
            assert_eq!(host.children[0].depth, 2);
        }
    }

    #[test]
    fn test_full_paths_and_depths() {
        let tree = tree_from(&["https://example.com/blog/2024/post"]);
        assert_eq!(tree.depth, 0);
        assert_eq!(tree.full_path, "");
        let blog = &tree.children[0];
        assert_eq!((blog.full_path.as_str(), blog.depth), ("/blog", 1));
        let year = &blog.children[0];
        assert_eq!((year.full_path.as_str(), year.depth), ("/blog/2024", 2));
        let post = &year.children[0];
        assert_eq!((post.full_path.as_str(), post.depth), ("/blog/2024/post", 3));
    }

    #[test]
    fn test_intermediate_node_can_be_terminal() {
        let tree = tree_from(&["https://example.com/products", "https://example.com/products/123"]);
        let products = tree.child("products").unwrap();
        assert_eq!(products.terminal_urls.len(), 1);
        assert_eq!(products.children.len(), 1);
        assert_eq!(
            products.child("123").unwrap().terminal_urls[0].original,
            "https://example.com/products/123"
        );
    }

    #[test]
    fn test_deep_nesting() {
        let tree = tree_from(&["https://example.com/a/b/c/d/e/f/g/h/i/j"]);
        let mut node = &tree;
        for seg in ["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"] {
            assert_eq!(node.children.len(), 1);
            node = &node.children[0];
            assert_eq!(node.segment, seg);
        }
        assert_eq!(tree.url_count(), 1);
    }

    #[test]
    fn test_empty_input() {
        let tree = build_tree(&[]);
        assert_eq!(tree.segment, ROOT_SENTINEL);
        assert!(tree.children.is_empty());
    }

    #[test]
    fn test_full_path_round_trip() {
        let tree = tree_from(&[
            "https://example.com/docs/guide/intro",
            "https://example.com/docs/api",
            "https://example.com/blog/2024/hello-world",
        ]);
        let mut stack: Vec<(&PathTreeNode, Vec<String>)> = vec![(&tree, Vec::new())];
        while let Some((node, segments)) = stack.pop() {
            assert_eq!(split_segments(&node.full_path), segments);
            assert_eq!(node.depth, segments.len());
            for child in &node.children {
                let mut next = segments.clone();
                next.push(child.segment.clone());
                stack.push((child, next));
            }
        }
    }
}
