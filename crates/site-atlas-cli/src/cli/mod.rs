//! Command-line definition and subcommand implementations.

pub mod output;
pub mod patterns_cmd;
pub mod progress;
pub mod tree_cmd;
pub mod visual_cmd;

use crate::cli::output::OutputMode;
use crate::settings::{load_config, ConfigOverrides};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "site-atlas",
    version,
    about = "Map URL lists into path trees and patterns, and cluster page snapshots"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Emit JSON on stdout instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress status lines on stderr.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Debug-level logging for the analysis crates.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON file with analysis thresholds and grid sizes.
    #[arg(long, global = true, env = "SITE_ATLAS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Perceptual-hash similarity needed to group screenshots.
    #[arg(long, global = true)]
    pub hash_threshold: Option<f64>,

    /// SSIM needed to stay in a screenshot group.
    #[arg(long, global = true)]
    pub ssim_threshold: Option<f64>,

    /// DOM similarity needed to merge leftover pages.
    #[arg(long, global = true)]
    pub dom_threshold: Option<f64>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the path tree of a newline-delimited URL list.
    Tree {
        /// URL list, one per line; `#` starts a comment line.
        file: PathBuf,
    },
    /// Detect URL patterns and page types in a URL list.
    Patterns { file: PathBuf },
    /// Cluster captured pages from a snapshot manifest.
    Visual {
        /// JSON array of `{url, status, image, dom}` entries.
        manifest: PathBuf,
    },
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            hash_threshold: self.hash_threshold,
            ssim_threshold: self.ssim_threshold,
            dom_threshold: self.dom_threshold,
        }
    }

    pub fn output_mode(&self) -> OutputMode {
        OutputMode::resolve(self.json, self.quiet, self.no_color)
    }

    pub async fn run(self) -> Result<()> {
        let mode = self.output_mode();
        match &self.command {
            Command::Tree { file } => tree_cmd::run(file, mode),
            Command::Patterns { file } => patterns_cmd::run(file, mode),
            Command::Visual { manifest } => {
                let config = load_config(self.config.as_deref(), &self.overrides())?;
                visual_cmd::run(manifest, config, mode).await
            }
        }
    }
}
