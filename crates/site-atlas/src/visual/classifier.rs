//! Three-phase visual pattern classification.
//!
//! 1. Hashing: decode each usable screenshot, hash it and greedily gather
//!    pages whose hashes are close to a seed page.
//! 2. SSIM refinement: check every member of a multi-page group against the
//!    group's first member; members that fall short become singletons.
//! 3. DOM enhancement: try to merge the remaining singletons by DOM
//!    structure, for pages that render differently from a shared template.
//!
//! Grouping is greedy and follows input order, so results are reproducible.
//! A page that fails to decode is left out; it never aborts the run.

use crate::config::AnalysisConfig;
use crate::palette::pattern_color;
use crate::visual::dom::{dom_similarity, SimplifiedDomNode};
use crate::visual::grayscale::GrayGrid;
use crate::visual::phash::{hash_grid, phash_similarity};
use crate::visual::snapshot::PageSnapshot;
use crate::visual::ssim::ssim;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Pipeline progress, reported once per stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifyStage {
    Hashing,
    SsimRefinement,
    DomEnhancement,
    Complete,
}

impl ClassifyStage {
    pub fn label(self) -> &'static str {
        match self {
            ClassifyStage::Hashing => "grouping screenshots by perceptual hash",
            ClassifyStage::SsimRefinement => "confirming groups with SSIM",
            ClassifyStage::DomEnhancement => "merging leftovers by DOM structure",
            ClassifyStage::Complete => "classification complete",
        }
    }
}

/// What a visual group's membership rests on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Evidence {
    /// Screenshots matched; DOM trees were missing or disagreed.
    Visual,
    /// Screenshots differed but DOM structure matched.
    Structural,
    /// Screenshots matched and every member's DOM resembles the representative's.
    Both,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisualPatternGroup {
    pub id: String,
    pub label: String,
    pub color: &'static str,
    pub member_urls: Vec<String>,
    pub representative_url: String,
    pub evidence: Evidence,
    pub ssim_threshold: f64,
    pub dom_threshold: f64,
    pub explanation: String,
}

/// A decoded page that made it into the hashing phase.
struct Candidate<'a> {
    snapshot: &'a PageSnapshot,
    hash: String,
    ssim_grid: GrayGrid,
}

impl Candidate<'_> {
    fn dom(&self) -> Option<&SimplifiedDomNode> {
        self.snapshot.dom_tree.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Visual,
    Dom,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Cluster {
    members: Vec<usize>,
    origin: Origin,
}

pub struct VisualPatternClassifier {
    config: AnalysisConfig,
}

impl VisualPatternClassifier {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Classify `snapshots`, calling `on_stage` as each phase starts and
    /// once more on completion.
    pub fn classify<F>(
        &self,
        snapshots: &[PageSnapshot],
        mut on_stage: F,
    ) -> Vec<VisualPatternGroup>
    where
        F: FnMut(ClassifyStage),
    {
        let usable: Vec<&PageSnapshot> =
            snapshots.iter().filter(|s| s.is_classifiable()).collect();
        if usable.is_empty() {
            debug!("no successful snapshots with images to classify");
            on_stage(ClassifyStage::Complete);
            return Vec::new();
        }

        on_stage(ClassifyStage::Hashing);
        let candidates = self.decode_candidates(&usable);
        let hash_groups = group_by_seed(candidates.len(), |seed, other| {
            phash_similarity(&candidates[seed].hash, &candidates[other].hash)
                >= self.config.hash_threshold
        });
        debug!(
            "hash phase: {} candidates in {} provisional groups",
            candidates.len(),
            hash_groups.len()
        );

        on_stage(ClassifyStage::SsimRefinement);
        let refined = refine_against_first(hash_groups, |first, member| {
            let score = ssim(
                &candidates[first].ssim_grid,
                &candidates[member].ssim_grid,
                self.config.ssim_window,
            );
            debug!(
                "ssim {} vs {}: {score:.3}",
                candidates[first].snapshot.url, candidates[member].snapshot.url
            );
            score >= self.config.ssim_threshold
        });

        on_stage(ClassifyStage::DomEnhancement);
        let clusters = merge_singletons(
            refined,
            |idx| candidates[idx].dom().is_some(),
            |seed, other| match (candidates[seed].dom(), candidates[other].dom()) {
                (Some(a), Some(b)) => dom_similarity(a, b) >= self.config.dom_threshold,
                _ => false,
            },
        );

        let groups: Vec<VisualPatternGroup> = clusters
            .into_iter()
            .filter(|cluster| cluster.members.len() >= 2)
            .enumerate()
            .map(|(k, cluster)| self.describe(k, &cluster, &candidates))
            .collect();

        info!(
            "classified {} snapshots into {} visual patterns",
            snapshots.len(),
            groups.len()
        );
        on_stage(ClassifyStage::Complete);
        groups
    }

    fn decode_candidates<'a>(&self, usable: &[&'a PageSnapshot]) -> Vec<Candidate<'a>> {
        let mut candidates = Vec::with_capacity(usable.len());
        for &snapshot in usable {
            let Some(image_ref) = &snapshot.image else {
                continue;
            };
            match image_ref.decode() {
                Ok(image) => {
                    let hash = hash_grid(&GrayGrid::from_image(&image, self.config.hash_grid_size));
                    let ssim_grid = GrayGrid::from_image(&image, self.config.ssim_grid_size);
                    candidates.push(Candidate {
                        snapshot,
                        hash,
                        ssim_grid,
                    });
                }
                Err(e) => warn!("skipping {}: {e}", snapshot.url),
            }
        }
        candidates
    }

    fn evidence(&self, cluster: &Cluster, candidates: &[Candidate<'_>]) -> Evidence {
        if cluster.origin == Origin::Dom {
            return Evidence::Structural;
        }
        let Some(rep_dom) = candidates[cluster.members[0]].dom() else {
            return Evidence::Visual;
        };
        let structural = cluster.members[1..].iter().all(|&idx| {
            candidates[idx]
                .dom()
                .is_some_and(|dom| dom_similarity(rep_dom, dom) >= self.config.dom_threshold)
        });
        if structural {
            Evidence::Both
        } else {
            Evidence::Visual
        }
    }

    fn describe(
        &self,
        k: usize,
        cluster: &Cluster,
        candidates: &[Candidate<'_>],
    ) -> VisualPatternGroup {
        let member_urls: Vec<String> = cluster
            .members
            .iter()
            .map(|&idx| candidates[idx].snapshot.url.clone())
            .collect();
        let representative_url = member_urls[0].clone();
        let evidence = self.evidence(cluster, candidates);

        let basis = match evidence {
            Evidence::Visual => "look alike in their screenshots",
            Evidence::Structural => "share the same DOM structure",
            Evidence::Both => "look alike in their screenshots and share DOM structure",
        };
        let explanation = format!(
            "These {} pages {basis}. Representative page: {representative_url}",
            member_urls.len()
        );

        VisualPatternGroup {
            id: format!("visual-pattern-{k}"),
            label: format!("Visual pattern {}", k + 1),
            color: pattern_color(k),
            member_urls,
            representative_url,
            evidence,
            ssim_threshold: self.config.ssim_threshold,
            dom_threshold: self.config.dom_threshold,
            explanation,
        }
    }
}

/// Classify with no progress reporting.
pub fn classify_visual_patterns(
    snapshots: &[PageSnapshot],
    config: &AnalysisConfig,
) -> Vec<VisualPatternGroup> {
    VisualPatternClassifier::new(config.clone()).classify(snapshots, |_| {})
}

/// Each unassigned index in turn seeds a group and pulls in every later
/// unassigned index that `joins(seed, other)` accepts.
fn group_by_seed<F>(count: usize, mut joins: F) -> Vec<Vec<usize>>
where
    F: FnMut(usize, usize) -> bool,
{
    let mut assigned = vec![false; count];
    let mut groups = Vec::new();
    for seed in 0..count {
        if assigned[seed] {
            continue;
        }
        assigned[seed] = true;
        let mut group = vec![seed];
        for other in seed + 1..count {
            if !assigned[other] && joins(seed, other) {
                assigned[other] = true;
                group.push(other);
            }
        }
        groups.push(group);
    }
    groups
}

/// Keep members that `confirms(first, member)` accepts; the rest follow their
/// group as singletons. Only the first member is ever used as reference.
fn refine_against_first<F>(groups: Vec<Vec<usize>>, mut confirms: F) -> Vec<Vec<usize>>
where
    F: FnMut(usize, usize) -> bool,
{
    let mut refined = Vec::with_capacity(groups.len());
    for group in groups {
        let Some((&first, rest)) = group.split_first() else {
            continue;
        };
        let mut confirmed = vec![first];
        let mut rejected = Vec::new();
        for &member in rest {
            if confirms(first, member) {
                confirmed.push(member);
            } else {
                rejected.push(member);
            }
        }
        refined.push(confirmed);
        refined.extend(rejected.into_iter().map(|idx| vec![idx]));
    }
    refined
}

/// Multi-member groups pass through first, in order. Singletons with a DOM
/// are then regrouped seed-first; singletons without one stay alone.
fn merge_singletons<H, F>(groups: Vec<Vec<usize>>, has_dom: H, mut joins: F) -> Vec<Cluster>
where
    H: Fn(usize) -> bool,
    F: FnMut(usize, usize) -> bool,
{
    let (multi, singles): (Vec<Vec<usize>>, Vec<Vec<usize>>) =
        groups.into_iter().partition(|g| g.len() > 1);

    let mut clusters: Vec<Cluster> = multi
        .into_iter()
        .map(|members| Cluster {
            members,
            origin: Origin::Visual,
        })
        .collect();

    let singles: Vec<usize> = singles.into_iter().flatten().collect();
    let mut assigned = vec![false; singles.len()];
    for i in 0..singles.len() {
        if assigned[i] {
            continue;
        }
        assigned[i] = true;
        let seed = singles[i];
        let mut members = vec![seed];
        if has_dom(seed) {
            for j in i + 1..singles.len() {
                let other = singles[j];
                if !assigned[j] && has_dom(other) && joins(seed, other) {
                    assigned[j] = true;
                    members.push(other);
                }
            }
        }
        let origin = if members.len() > 1 {
            Origin::Dom
        } else {
            Origin::Visual
        };
        clusters.push(Cluster { members, origin });
    }
    clusters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual::image_ref::ImageRef;
    use crate::visual::snapshot::SnapshotStatus;
    use image::{DynamicImage, Rgb, RgbImage};

    #[test]
    fn test_group_by_seed_is_not_transitive() {
        // 0~1 and 1~2, but 0 and 2 are apart: 2 must seed its own group.
        let close = |a: usize, b: usize| a.abs_diff(b) == 1;
        let groups = group_by_seed(3, |a, b| close(a, b));
        assert_eq!(groups, vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn test_group_by_seed_keeps_input_order() {
        let groups = group_by_seed(5, |a, b| a % 2 == b % 2);
        assert_eq!(groups, vec![vec![0, 2, 4], vec![1, 3]]);
    }

    #[test]
    fn test_refine_compares_with_first_member_only() {
        // Scores against member 0 drift downward; 1 and 2 would match each
        // other, yet 2 is ejected because only member 0 is consulted.
        let mut calls = Vec::new();
        let refined = refine_against_first(vec![vec![0, 1, 2], vec![3]], |first, member| {
            calls.push((first, member));
            let score = match (first, member) {
                (0, 1) => 0.8,
                (0, 2) => 0.7,
                (1, 2) => 0.95,
                _ => 0.0,
            };
            score >= 0.75
        });
        assert_eq!(refined, vec![vec![0, 1], vec![2], vec![3]]);
        assert_eq!(calls, vec![(0, 1), (0, 2)]);
    }

    #[test]
    fn test_refine_rejected_members_follow_their_group() {
        let refined = refine_against_first(vec![vec![0, 1, 2], vec![3, 4]], |_, m| m == 4);
        assert_eq!(refined, vec![vec![0], vec![1], vec![2], vec![3, 4]]);
    }

    #[test]
    fn test_merge_singletons() {
        let groups = vec![vec![0], vec![1, 2], vec![3], vec![4], vec![5]];
        // 3 has no DOM; 0, 4 and 5 share a template.
        let clusters = merge_singletons(groups, |idx| idx != 3, |_, _| true);
        assert_eq!(
            clusters,
            vec![
                Cluster {
                    members: vec![1, 2],
                    origin: Origin::Visual
                },
                Cluster {
                    members: vec![0, 4, 5],
                    origin: Origin::Dom
                },
                Cluster {
                    members: vec![3],
                    origin: Origin::Visual
                },
            ]
        );
    }

    fn solid_ref(value: u8) -> ImageRef {
        ImageRef::Decoded(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            16,
            16,
            Rgb([value, value, value]),
        )))
    }

    #[test]
    fn test_stages_reported_in_order() {
        let snapshots = vec![
            PageSnapshot::new("https://a.com/1", SnapshotStatus::Success).with_image(solid_ref(0)),
            PageSnapshot::new("https://a.com/2", SnapshotStatus::Success).with_image(solid_ref(0)),
        ];
        let mut stages = Vec::new();
        let groups = VisualPatternClassifier::new(AnalysisConfig::default())
            .classify(&snapshots, |stage| stages.push(stage));
        assert_eq!(
            stages,
            vec![
                ClassifyStage::Hashing,
                ClassifyStage::SsimRefinement,
                ClassifyStage::DomEnhancement,
                ClassifyStage::Complete,
            ]
        );
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, "visual-pattern-0");
        assert_eq!(groups[0].label, "Visual pattern 1");
        assert_eq!(groups[0].evidence, Evidence::Visual);
        assert_eq!(groups[0].representative_url, "https://a.com/1");
        assert!(groups[0].explanation.contains("https://a.com/1"));
    }

    #[test]
    fn test_nothing_usable() {
        let snapshots = vec![
            PageSnapshot::new("https://a.com/1", SnapshotStatus::Error).with_image(solid_ref(0)),
            PageSnapshot::new("https://a.com/2", SnapshotStatus::Success),
        ];
        let mut stages = Vec::new();
        let groups = VisualPatternClassifier::new(AnalysisConfig::default())
            .classify(&snapshots, |stage| stages.push(stage));
        assert!(groups.is_empty());
        assert_eq!(stages, vec![ClassifyStage::Complete]);
    }

    #[test]
    fn test_stage_labels() {
        assert_eq!(ClassifyStage::Complete.label(), "classification complete");
        assert!(ClassifyStage::Hashing.label().contains("hash"));
    }
}
