//! Prefix tree of URL paths, one subtree per host.

pub mod builder;
pub mod types;

pub use builder::{build_tree, PathTreeBuilder};
pub use types::{NodeKind, PathTreeNode, ROOT_SENTINEL};
