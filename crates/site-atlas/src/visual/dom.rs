//! Template-level comparison of simplified DOM trees.
//!
//! Tag text only; attributes other than `id` and class names are dropped by
//! whoever captures the tree. All walks use explicit stacks so a deeply
//! nested document cannot exhaust the call stack.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Depth beyond which `structural_signature` stops descending.
pub const SIGNATURE_MAX_DEPTH: usize = 4;

/// Classes kept per node in labels.
const LABEL_MAX_CLASSES: usize = 3;

/// A stripped-down element: tag, optional id, classes and children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifiedDomNode {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub class_names: Vec<String>,
    #[serde(default)]
    pub children: Vec<SimplifiedDomNode>,
}

impl SimplifiedDomNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            class_names: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.class_names = classes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_children(mut self, children: Vec<SimplifiedDomNode>) -> Self {
        self.children = children;
        self
    }

    /// `tag#id.c1.c2.c3`
    pub fn label(&self) -> String {
        let mut label = self.tag.clone();
        if let Some(id) = &self.id {
            label.push('#');
            label.push_str(id);
        }
        if !self.class_names.is_empty() {
            let classes: Vec<&str> = self
                .class_names
                .iter()
                .take(LABEL_MAX_CLASSES)
                .map(String::as_str)
                .collect();
            label.push('.');
            label.push_str(&classes.join("."));
        }
        label
    }
}

/// Preorder `depth:tag` tokens, one per node.
pub fn structural_fingerprint(root: &SimplifiedDomNode) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut stack = vec![(root, 0usize)];
    while let Some((node, depth)) = stack.pop() {
        tokens.push(format!("{depth}:{}", node.tag));
        for child in node.children.iter().rev() {
            stack.push((child, depth + 1));
        }
    }
    tokens
}

/// Jaccard index of the two fingerprint sets; 0 when both are empty.
pub fn dom_similarity(a: &SimplifiedDomNode, b: &SimplifiedDomNode) -> f64 {
    let set_a: HashSet<String> = structural_fingerprint(a).into_iter().collect();
    let set_b: HashSet<String> = structural_fingerprint(b).into_iter().collect();
    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.len() + set_b.len() - intersection;
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Canonical `tag(child,child)` rendering with children sorted, cut off
/// below [`SIGNATURE_MAX_DEPTH`]. Equal signatures mean the same template
/// skeleton regardless of sibling order.
pub fn structural_signature(root: &SimplifiedDomNode) -> String {
    // Postorder: a node is rendered once all its children have been.
    let mut rendered: Vec<Vec<String>> = vec![Vec::new()];
    let mut stack: Vec<(&SimplifiedDomNode, usize, bool)> = vec![(root, 0, false)];

    while let Some((node, depth, expanded)) = stack.pop() {
        if !expanded {
            stack.push((node, depth, true));
            rendered.push(Vec::new());
            if depth < SIGNATURE_MAX_DEPTH {
                for child in &node.children {
                    stack.push((child, depth + 1, false));
                }
            }
            continue;
        }

        let mut children = rendered.pop().unwrap_or_default();
        children.sort();
        let sig = format!("{}({})", node.tag, children.join(","));
        if let Some(parent) = rendered.last_mut() {
            parent.push(sig);
        }
    }

    rendered.pop().and_then(|mut top| top.pop()).unwrap_or_default()
}

/// Preorder node labels (`tag#id.c1.c2.c3`).
pub fn flatten_labels(root: &SimplifiedDomNode) -> Vec<String> {
    let mut labels = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        labels.push(node.label());
        stack.extend(node.children.iter().rev());
    }
    labels
}

/// Preorder selector paths, `html > body > div#main`.
pub fn selector_fingerprint(root: &SimplifiedDomNode) -> Vec<String> {
    let mut selectors = Vec::new();
    let mut stack = vec![(root, String::new())];
    while let Some((node, parent_path)) = stack.pop() {
        let path = if parent_path.is_empty() {
            node.label()
        } else {
            format!("{parent_path} > {}", node.label())
        };
        for child in node.children.iter().rev() {
            stack.push((child, path.clone()));
        }
        selectors.push(path);
    }
    selectors
}

/// URLs sharing a DOM template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomGroup {
    pub urls: Vec<String>,
    /// Lowest similarity at which any member joined.
    pub similarity: f64,
    pub representative_url: String,
}

/// Greedy single-pass grouping. Each item joins the group whose
/// representative it resembles most, provided the similarity is strictly
/// above `threshold`; otherwise it seeds a new group. Earlier groups win ties.
pub fn group_by_dom_similarity<'a, I>(items: I, threshold: f64) -> Vec<DomGroup>
where
    I: IntoIterator<Item = (&'a str, &'a SimplifiedDomNode)>,
{
    let mut groups: Vec<(DomGroup, &SimplifiedDomNode)> = Vec::new();

    for (url, dom) in items {
        let mut best: Option<(usize, f64)> = None;
        for (idx, (_, representative)) in groups.iter().enumerate() {
            let sim = dom_similarity(dom, representative);
            if sim > threshold && best.map_or(true, |(_, best_sim)| sim > best_sim) {
                best = Some((idx, sim));
            }
        }

        match best {
            Some((idx, sim)) => {
                let group = &mut groups[idx].0;
                group.urls.push(url.to_string());
                group.similarity = group.similarity.min(sim);
            }
            None => groups.push((
                DomGroup {
                    urls: vec![url.to_string()],
                    similarity: 1.0,
                    representative_url: url.to_string(),
                },
                dom,
            )),
        }
    }

    groups.into_iter().map(|(group, _)| group).collect()
}
