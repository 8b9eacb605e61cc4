//! CLI entry-point for analysing a single snippet offline.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::config::Settings;

/// Args for the `analyze` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Snippet text to analyse.
    #[arg(long)]
    pub text: String,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let analyzer = super::build_analyzer(settings).await?;
    let result = analyzer.analyze(&args.text);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
