//! Site Atlas core: turn a flat list of URLs into a path tree and structural
//! URL patterns, and cluster rendered page snapshots by visual and DOM
//! similarity.
//!
//! Everything here is synchronous and allocation-local: each call builds its
//! own structures from the input it is handed, so independent analyses never
//! share mutable state.

pub mod config;
pub mod error;
pub mod palette;
pub mod patterns;
pub mod tree;
pub mod urls;
pub mod visual;

pub use config::AnalysisConfig;
pub use error::{AtlasError, Result};
pub use patterns::{detect_patterns, PageType, SegmentShape, UrlPatternGroup};
pub use tree::{build_tree, PathTreeNode};
pub use urls::{parse_list, parse_url, NormalizedUrl};
pub use visual::{classify_visual_patterns, PageSnapshot, VisualPatternGroup};
