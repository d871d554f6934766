//! Screenshot and DOM comparison, and the visual pattern pipeline built on them.

pub mod classifier;
pub mod dom;
pub mod grayscale;
pub mod image_ref;
pub mod phash;
pub mod snapshot;
pub mod ssim;

pub use classifier::{
    classify_visual_patterns, ClassifyStage, Evidence, VisualPatternClassifier, VisualPatternGroup,
};
pub use dom::{
    dom_similarity, flatten_labels, group_by_dom_similarity, selector_fingerprint,
    structural_fingerprint, structural_signature, DomGroup, SimplifiedDomNode,
};
pub use grayscale::GrayGrid;
pub use image_ref::ImageRef;
pub use phash::{compute_perceptual_hash, hamming_distance, phash_similarity};
pub use snapshot::{PageSnapshot, SnapshotStatus};
pub use ssim::{compute_ssim, pixel_diff, PixelDiff};
