use anyhow::Context;
use clap::Parser;

use story_ranker::app;
use story_ranker::config::{Cli, Settings};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    app::tracing::init_tracing();

    let settings = Settings::from_cli(cli).context("failed to load configuration")?;
    ::tracing::info!(source = ?settings.source, "loaded settings");

    app::run(&settings).await.context("story ranking failed")?;
    Ok(())
}
