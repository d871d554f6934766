//! URL normalization and deduplication.

pub mod normalize;

pub use normalize::{parse_list, parse_url, split_segments, NormalizedUrl};
