//! Structural URL patterns: segment shapes, page types, and pattern groups.

pub mod aggregator;
pub mod page_type;
pub mod segment;
pub mod summary;
pub mod types;

pub use aggregator::detect_patterns;
pub use page_type::{classify_page_type, PageType, PageTypeVerdict};
pub use segment::{classify_segment, is_dynamic_value, SegmentShape};
pub use summary::{summarize_tree, SitemapNode};
pub use types::{PatternExplanation, PatternKind, SegmentAnalysis, UrlPatternGroup};
