//! Tracing subscriber setup for the binary.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Log to stderr, filtered by `RUST_LOG` (default `warn`). `verbose` adds
/// debug output for the Site Atlas crates.
pub fn init(verbose: bool) -> Result<()> {
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if verbose {
        filter = filter
            .add_directive("site_atlas=debug".parse()?)
            .add_directive("site_atlas_cli=debug".parse()?);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    Ok(())
}
