use clap::Parser;
use site_atlas_cli::cli::Cli;
use site_atlas_cli::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    tracing::debug!("site-atlas v{}", env!("CARGO_PKG_VERSION"));
    cli.run().await
}
