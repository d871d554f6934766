//! Site Atlas command-line front end.
//!
//! Reads URL lists and snapshot manifests from disk, runs the `site_atlas`
//! analyses and prints styled text or JSON.

pub mod cli;
pub mod input;
pub mod logging;
pub mod settings;
