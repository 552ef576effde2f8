//! Column Inspector
//!
//! Prints the feature-column names the price model was trained on, in
//! stored order.

use anyhow::{Context, Result};
use autoprice::{config::AppConfig, logging, models::FeatureSchema};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing::error;

#[derive(Parser)]
#[command(author, version, about = "List the price model's feature columns", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = autoprice::config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Column file to read instead of the configured one
    #[arg(long)]
    columns: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from_path(&cli.config)?;
    logging::init(&config.logging)?;

    let path = cli
        .columns
        .unwrap_or_else(|| PathBuf::from(&config.models.columns_path));

    match FeatureSchema::load(&path) {
        Ok(schema) => schema
            .write_listing(&mut io::stdout().lock())
            .context("Failed to write column listing"),
        Err(e) => {
            error!(path = %path.display(), error = %e, "Failed to load column file");
            println!("Failed to load column file: {:#}", e);
            Err(e)
        }
    }
}
