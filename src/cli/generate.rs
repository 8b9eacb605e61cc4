//! CLI entry-point for writing the synthetic dataset.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args as ClapArgs;
use rand::{rngs::StdRng, SeedableRng};
use tracing::instrument;

use crate::{config::Settings, data::generator};

/// Args for the `generate` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Output CSV path; defaults to the configured dataset path.
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Seed for reproducible sampling.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let path = args.output.unwrap_or(settings.dataset_path);
    let rows = match args.seed {
        Some(seed) => generator::generate(&mut StdRng::seed_from_u64(seed)),
        None => generator::generate(&mut rand::thread_rng()),
    };
    let df = generator::write_dataset(&rows, &path)?;
    println!("Dataset generated successfully:");
    println!("{}", df.head(Some(5)));
    Ok(())
}
