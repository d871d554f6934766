//! Walk a path tree and group sibling subtrees into URL patterns.

use crate::palette::pattern_color;
use crate::patterns::page_type::{classify_page_type, PageType, PageTypeVerdict};
use crate::patterns::segment::{classify_segment, is_dynamic_value, SegmentShape};
use crate::patterns::types::{PatternExplanation, PatternKind, SegmentAnalysis, UrlPatternGroup};
use crate::tree::{NodeKind, PathTreeNode};
use crate::urls::{split_segments, NormalizedUrl};
use std::collections::HashSet;

/// Minimum number of URLs (and dynamic siblings) for a pattern.
const MIN_GROUP_SIZE: usize = 2;

/// Minimum number of fixed-name leaf siblings for a static group.
const STATIC_GROUP_MIN_SIZE: usize = 3;

const MAX_SAMPLE_VALUES: usize = 5;

const SUMMARY_SAMPLES: usize = 3;

/// A group found during the walk, before labelling.
struct RawGroup<'a> {
    kind: PatternKind,
    hostname: Option<&'a str>,
    anchor: &'a PathTreeNode,
    members: Vec<&'a PathTreeNode>,
    urls: Vec<NormalizedUrl>,
}

/// Detect URL pattern groups in a path tree.
///
/// Groups come back in discovery order (preorder walk; at each node the
/// dynamic group precedes the static one, and fixed-name children are
/// visited before dynamic ones). Ids and colors follow that order, so two
/// runs over the same tree yield identical output.
pub fn detect_patterns(root: &PathTreeNode) -> Vec<UrlPatternGroup> {
    let groups: Vec<UrlPatternGroup> = collect_groups(root)
        .into_iter()
        .enumerate()
        .map(|(index, raw)| label_group(index, raw))
        .collect();

    tracing::info!(
        "detected {} URL patterns across {} URLs",
        groups.len(),
        root.url_count()
    );
    groups
}

fn collect_groups(root: &PathTreeNode) -> Vec<RawGroup<'_>> {
    let mut groups = Vec::new();
    let mut stack: Vec<(&PathTreeNode, Option<&str>)> = vec![(root, None)];

    while let Some((node, host)) = stack.pop() {
        let host = match node.kind {
            NodeKind::Host => Some(node.segment.as_str()),
            NodeKind::SyntheticRoot | NodeKind::Segment => host,
        };

        if node.children.len() < MIN_GROUP_SIZE {
            stack.extend(node.children.iter().rev().map(|c| (c, host)));
            continue;
        }

        let (dynamic, fixed): (Vec<&PathTreeNode>, Vec<&PathTreeNode>) = node
            .children
            .iter()
            .partition(|c| is_dynamic_value(&c.segment));

        if dynamic.len() >= MIN_GROUP_SIZE {
            let urls: Vec<NormalizedUrl> = dynamic
                .iter()
                .flat_map(|c| c.collect_urls())
                .cloned()
                .collect();
            if urls.len() >= MIN_GROUP_SIZE {
                groups.push(RawGroup {
                    kind: PatternKind::Dynamic,
                    hostname: host,
                    anchor: node,
                    members: dynamic.clone(),
                    urls,
                });
            }
        }

        if node.depth >= 1 {
            let leaves: Vec<&PathTreeNode> = fixed
                .iter()
                .copied()
                .filter(|c| c.is_leaf() && !c.terminal_urls.is_empty())
                .collect();
            if leaves.len() >= STATIC_GROUP_MIN_SIZE {
                let urls = leaves
                    .iter()
                    .flat_map(|c| c.terminal_urls.iter())
                    .cloned()
                    .collect();
                groups.push(RawGroup {
                    kind: PatternKind::StaticSiblings,
                    hostname: host,
                    anchor: node,
                    members: leaves,
                    urls,
                });
            }
        }

        // Pushed in reverse so fixed-name children pop first, in order.
        for child in dynamic.iter().rev().chain(fixed.iter().rev()) {
            stack.push((child, host));
        }
    }

    groups
}

fn label_group(index: usize, raw: RawGroup<'_>) -> UrlPatternGroup {
    let parent_path = raw.anchor.full_path.clone();
    let values: Vec<&str> = raw.members.iter().map(|m| m.segment.as_str()).collect();
    let shape = classify_segment(&values);

    let mut breakdown: Vec<SegmentAnalysis> = split_segments(&parent_path)
        .into_iter()
        .enumerate()
        .map(|(position, value)| SegmentAnalysis {
            position,
            shape: SegmentShape::Static,
            sample_values: vec![value],
            unique_count: 1,
        })
        .collect();
    let trailing = trailing_analysis(breakdown.len(), shape, &values);
    let token = segment_token(&trailing);
    let samples = trailing
        .sample_values
        .iter()
        .take(SUMMARY_SAMPLES)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    breakdown.push(trailing);

    let display_pattern = format!("{parent_path}/{token}");
    let verdict = group_page_type(&raw);
    let count = raw.urls.len();

    let summary = match raw.kind {
        PatternKind::Dynamic => format!(
            "These {count} URLs follow {parent_path}/ with {} in the next segment (e.g. {samples}).",
            shape.describe()
        ),
        PatternKind::StaticSiblings => format!(
            "These {count} URLs are fixed-name sibling pages under {parent_path}/ (e.g. {samples})."
        ),
    };

    tracing::debug!(
        "pattern {display_pattern}: {count} URLs, page type {:?}",
        verdict.page_type
    );

    UrlPatternGroup {
        id: format!("pattern-{index}"),
        kind: raw.kind,
        hostname: raw.hostname.map(String::from),
        parent_path,
        display_pattern,
        matched_urls: raw.urls,
        page_type: verdict.page_type,
        color: pattern_color(index).to_string(),
        explanation: PatternExplanation {
            summary,
            page_type_reason: verdict.reason,
            segment_breakdown: breakdown,
        },
    }
}

/// Page type of a group, judged on its first member.
fn group_page_type(raw: &RawGroup<'_>) -> PageTypeVerdict {
    let Some(representative) = raw.members.first() else {
        return PageTypeVerdict {
            page_type: PageType::Unknown,
            reason: "group has no members".to_string(),
        };
    };

    let verdict = classify_page_type(representative, raw.members.len(), &raw.anchor.segment);
    match (raw.kind, verdict.page_type) {
        (PatternKind::StaticSiblings, PageType::Unknown) => PageTypeVerdict {
            page_type: PageType::Static,
            reason: format!(
                "{} fixed-name sibling pages under {}/",
                raw.members.len(),
                raw.anchor.full_path
            ),
        },
        _ => verdict,
    }
}

fn trailing_analysis(position: usize, shape: SegmentShape, values: &[&str]) -> SegmentAnalysis {
    let mut seen = HashSet::new();
    let unique: Vec<&str> = values.iter().copied().filter(|v| seen.insert(*v)).collect();
    SegmentAnalysis {
        position,
        shape,
        sample_values: unique
            .iter()
            .take(MAX_SAMPLE_VALUES)
            .map(|v| v.to_string())
            .collect(),
        unique_count: unique.len(),
    }
}

/// Placeholder for a position, or its literal value when fixed.
fn segment_token(analysis: &SegmentAnalysis) -> String {
    match analysis.shape.placeholder() {
        Some(placeholder) => placeholder.to_string(),
        None => analysis.sample_values.first().cloned().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::build_tree;
    use crate::urls::parse_list;
    use std::time::Instant;

    fn patterns_from(urls: &[&str]) -> Vec<UrlPatternGroup> {
        detect_patterns(&build_tree(&parse_list(urls)))
    }

    #[test]
    fn test_numeric_id_pattern() {
        let groups = patterns_from(&[
            "https://example.com/products/1",
            "https://example.com/products/2",
            "https://example.com/products/3",
        ]);
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.display_pattern, "/products/{id}");
        assert_eq!(group.matched_urls.len(), 3);
        assert_eq!(group.page_type, PageType::Detail);
        assert_eq!(group.kind, PatternKind::Dynamic);
        assert_eq!(group.hostname.as_deref(), Some("example.com"));
        assert_eq!(group.trailing_shape(), Some(SegmentShape::Numeric));
        assert_eq!(group.explanation.segment_breakdown[0].shape, SegmentShape::Static);
        assert!(group.explanation.summary.len() > 10);
    }

    #[test]
    fn test_slug_pattern() {
        let groups = patterns_from(&[
            "https://example.com/blog/my-first-post",
            "https://example.com/blog/hello-world",
            "https://example.com/blog/another-article",
        ]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].display_pattern, "/blog/{slug}");
    }

    #[test]
    fn test_uuid_pattern() {
        let groups = patterns_from(&[
            "https://shop.example.com/orders/550e8400-e29b-41d4-a716-446655440000",
            "https://shop.example.com/orders/6ba7b810-9dad-11d1-80b4-00c04fd430c8",
        ]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].display_pattern, "/orders/{uuid}");
        assert_eq!(groups[0].kind, PatternKind::Dynamic);
        assert_eq!(groups[0].trailing_shape(), Some(SegmentShape::Uuid));
        assert_eq!(groups[0].matched_urls.len(), 2);
    }

    #[test]
    fn test_mixed_dynamic_values_use_name_token() {
        let groups = patterns_from(&[
            "https://example.com/items/1",
            "https://example.com/items/2",
            "https://example.com/items/blue-widget",
        ]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].display_pattern, "/items/{name}");
        assert_eq!(groups[0].kind, PatternKind::Dynamic);
        assert_eq!(groups[0].trailing_shape(), Some(SegmentShape::Mixed));
    }

    #[test]
    fn test_nested_year_pattern_covers_descendants() {
        let groups = patterns_from(&[
            "https://example.com/blog/2024/01/post-one",
            "https://example.com/blog/2024/02/post-two",
            "https://example.com/blog/2023/12/year-review",
        ]);
        assert_eq!(groups[0].display_pattern, "/blog/{year}");
        assert_eq!(groups[0].matched_urls.len(), 3);
        // The months under 2024 form their own nested group.
        assert!(groups.iter().any(|g| g.display_pattern == "/blog/2024/{id}"));
    }

    #[test]
    fn test_unrelated_static_pages_not_grouped() {
        let groups = patterns_from(&["https://example.com/about", "https://example.com/contact"]);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_single_url_not_grouped() {
        assert!(patterns_from(&["https://example.com/products/1"]).is_empty());
    }

    #[test]
    fn test_multiple_groups_distinct_ids_and_colors() {
        let groups = patterns_from(&[
            "https://example.com/products/1",
            "https://example.com/products/2",
            "https://example.com/products/3",
            "https://example.com/blog/post-one",
            "https://example.com/blog/post-two",
            "https://example.com/about",
        ]);
        assert_eq!(groups.len(), 2);
        let products = groups.iter().find(|g| g.display_pattern.contains("products")).unwrap();
        let blog = groups.iter().find(|g| g.display_pattern.contains("blog")).unwrap();
        assert_eq!(products.matched_urls.len(), 3);
        assert_eq!(blog.matched_urls.len(), 2);
        assert_eq!(groups[0].id, "pattern-0");
        assert_eq!(groups[1].id, "pattern-1");
        assert_ne!(groups[0].color, groups[1].color);
    }

    #[test]
    fn test_pagination_group() {
        let groups = patterns_from(&[
            "https://example.com/blog/page/1",
            "https://example.com/blog/page/2",
            "https://example.com/blog/page/3",
        ]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].page_type, PageType::Pagination);
        assert_eq!(groups[0].display_pattern, "/blog/page/{id}");
    }

    #[test]
    fn test_mixed_static_and_dynamic_children() {
        let groups = patterns_from(&[
            "https://example.com/products/sale",
            "https://example.com/products/1",
            "https://example.com/products/2",
            "https://example.com/products/3",
        ]);
        let numeric = groups
            .iter()
            .find(|g| g.trailing_shape() == Some(SegmentShape::Numeric))
            .unwrap();
        assert_eq!(numeric.matched_urls.len(), 3);
        assert!(!numeric.contains_path("example.com", "/products/sale"));
    }

    #[test]
    fn test_static_sibling_group() {
        let groups = patterns_from(&[
            "https://example.com/help/faq",
            "https://example.com/help/billing",
            "https://example.com/help/shipping",
        ]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].kind, PatternKind::StaticSiblings);
        assert_eq!(groups[0].display_pattern, "/help/{name}");
        assert_eq!(groups[0].page_type, PageType::Static);
        assert_eq!(groups[0].matched_urls.len(), 3);
    }

    #[test]
    fn test_no_static_group_at_root() {
        let groups = patterns_from(&[
            "https://example.com/about",
            "https://example.com/contact",
            "https://example.com/pricing",
        ]);
        assert!(groups.is_empty());
    }

    #[test]
    fn test_root_level_dynamic_group() {
        let groups = patterns_from(&["https://example.com/10", "https://example.com/11"]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].display_pattern, "/{id}");
        assert_eq!(groups[0].parent_path, "");
    }

    #[test]
    fn test_sample_values_capped() {
        let urls: Vec<String> = (0..20).map(|i| format!("https://example.com/items/{i}")).collect();
        let refs: Vec<&str> = urls.iter().map(String::as_str).collect();
        let groups = patterns_from(&refs);
        let trailing = groups[0].explanation.segment_breakdown.last().unwrap();
        assert_eq!(trailing.sample_values, vec!["0", "1", "2", "3", "4"]);
        assert_eq!(trailing.unique_count, 20);
    }

    #[test]
    fn test_deterministic_output() {
        let urls = [
            "https://example.com/products/1",
            "https://example.com/products/2",
            "https://example.com/blog/a-b",
            "https://example.com/blog/c-d",
            "https://other.org/docs/x-y",
            "https://other.org/docs/z-w",
        ];
        let first: Vec<String> = patterns_from(&urls).into_iter().map(|g| g.display_pattern).collect();
        let second: Vec<String> = patterns_from(&urls).into_iter().map(|g| g.display_pattern).collect();
        assert_eq!(first, second);
        assert_eq!(first, vec!["/products/{id}", "/blog/{slug}", "/docs/{slug}"]);
    }

    #[test]
    fn test_large_sibling_set() {
        let mut urls: Vec<String> = (0..500)
            .map(|i| format!("https://example.com/products/{i}"))
            .collect();
        urls.push("https://example.com/about".to_string());
        urls.push("https://example.com/contact".to_string());

        let start = Instant::now();
        let groups = detect_patterns(&build_tree(&parse_list(&urls)));
        let elapsed = start.elapsed();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].matched_urls.len(), 500);
        assert!(elapsed.as_secs() < 2, "took {elapsed:?}");
    }
}
