//! Command-line interface wiring for call-insights.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::{config::Settings, nlp::Analyzer};

pub mod analyze;
pub mod generate;
pub mod serve;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Call snippet tagging and entity extraction", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Generate(args) => generate::run(args, settings).await,
            Commands::Serve(args) => serve::run(args, settings).await,
            Commands::Analyze(args) => analyze::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Write the synthetic call snippet dataset.
    Generate(generate::Args),
    /// Fit the classifier and serve the analysis API.
    Serve(serve::Args),
    /// Analyse one snippet and print the result as JSON.
    Analyze(analyze::Args),
}

/// Build the analysis context off the async runtime; model loading and the
/// forest fit are blocking.
pub(crate) async fn build_analyzer(settings: Settings) -> Result<Arc<Analyzer>> {
    let analyzer = tokio::task::spawn_blocking(move || Analyzer::build(&settings))
        .await
        .context("startup task panicked")??;
    Ok(Arc::new(analyzer))
}
