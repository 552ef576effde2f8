//! AutoPrice - Main Entry Point
//!
//! Loads the price model once, then estimates car prices from an
//! interactive form or command-line flags, or browses the sample catalog.

use anyhow::{bail, Context, Result};
use autoprice::{
    catalog::{self, CatalogFilter, PriceBand},
    config::AppConfig,
    form::PriceForm,
    logging,
    models::{PredictionContext, PricePredictor},
    types::{format_currency, CarInput},
};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about = "Car price estimation from a pre-trained regression model", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = autoprice::config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill in the car details interactively (default)
    Form,
    /// Estimate prices from flags or a JSON file
    Predict {
        /// Brand, e.g. Toyota
        #[arg(long, default_value = "")]
        brand: String,

        /// Model name, e.g. Avanza
        #[arg(long = "model", default_value = "")]
        model_name: String,

        /// Production year
        #[arg(long)]
        year: Option<i32>,

        /// Mileage in km
        #[arg(long)]
        mileage: Option<u32>,

        /// Automatic or Manual
        #[arg(long)]
        transmission: Option<String>,

        /// Petrol, Diesel, Hybrid or Electric
        #[arg(long)]
        fuel: Option<String>,

        /// Engine size in cc
        #[arg(long)]
        engine_size: Option<u32>,

        /// Excellent, Good, Fair or Poor
        #[arg(long)]
        condition: Option<String>,

        /// JSON file with one car object or an array of them (overrides the flags)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Browse the sample car collection
    Catalog {
        /// Only this brand
        #[arg(long)]
        brand: Option<String>,

        /// under300m, 300m-600m or over600m
        #[arg(long)]
        price: Option<PriceBand>,

        /// Only this body type, e.g. SUV
        #[arg(long)]
        body_type: Option<String>,
    },
}

/// Contents of a `--input` file
#[derive(Deserialize)]
#[serde(untagged)]
enum InputFile {
    One(CarInput),
    Many(Vec<CarInput>),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_from_path(&cli.config)?;
    logging::init(&config.logging)?;
    info!(config = %cli.config.display(), "Configuration loaded");

    match cli.command.unwrap_or(Commands::Form) {
        Commands::Catalog {
            brand,
            price,
            body_type,
        } => {
            show_catalog(
                &CatalogFilter {
                    brand,
                    price,
                    body_type,
                },
                &config,
            );
            Ok(())
        }
        Commands::Form => {
            let predictor = load_predictor(&config);
            let stdin = io::stdin();
            let stdout = io::stdout();
            println!("AutoPrice - car price estimation");
            println!();

            let mut form = PriceForm::new(stdin.lock(), stdout.lock(), &config.form);
            let Some(input) = form.collect()? else {
                println!();
                println!("Form cancelled.");
                return Ok(());
            };
            drop(form);

            println!();
            if !report(&predictor, &input, &config) {
                bail!("Failed to get a prediction, check the input or the log output");
            }
            Ok(())
        }
        Commands::Predict {
            brand,
            model_name,
            year,
            mileage,
            transmission,
            fuel,
            engine_size,
            condition,
            input,
        } => {
            let predictor = load_predictor(&config);

            let inputs = match input {
                Some(path) => read_input_file(&path)?,
                None => {
                    let defaults = CarInput::default();
                    vec![CarInput {
                        brand,
                        model_name,
                        year: year.unwrap_or(defaults.year),
                        mileage: mileage.unwrap_or(defaults.mileage),
                        transmission: transmission.unwrap_or(defaults.transmission),
                        fuel: fuel.unwrap_or(defaults.fuel),
                        engine_size_cc: engine_size.unwrap_or(defaults.engine_size_cc),
                        condition: condition.unwrap_or(defaults.condition),
                    }]
                }
            };

            let failures = inputs
                .iter()
                .filter(|input| !report(&predictor, input, &config))
                .count();

            if failures > 0 {
                bail!("{} of {} estimates failed", failures, inputs.len());
            }
            Ok(())
        }
    }
}

fn load_predictor(config: &AppConfig) -> PricePredictor {
    let predictor = PricePredictor::new(
        PredictionContext::load(&config.models),
        config.form.bounds.clone(),
    );

    match predictor.context().ready() {
        Ok((_, engine)) => info!(
            model = engine.model_name(),
            features = engine.expected_features(),
            "Price model ready"
        ),
        Err(_) => eprintln!(
            "Model or column file could not be loaded (looked in {} and {}).",
            config.models.model_path, config.models.columns_path
        ),
    }
    predictor
}

fn read_input_file(path: &Path) -> Result<Vec<CarInput>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let parsed: InputFile = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse car details in {}", path.display()))?;

    Ok(match parsed {
        InputFile::One(input) => vec![input],
        InputFile::Many(inputs) => inputs,
    })
}

/// Print one estimate, or why it could not be produced. Returns whether it succeeded.
fn report(predictor: &PricePredictor, input: &CarInput, config: &AppConfig) -> bool {
    let label = format!("{} {} ({})", input.brand, input.model_name, input.year);

    match predictor.estimate(input) {
        Ok(estimate) => {
            for notice in &estimate.unrecognized {
                println!("warning: {}", notice);
            }
            println!(
                "{}: predicted price {}",
                label.trim(),
                estimate.formatted(&config.display.currency_symbol)
            );
            true
        }
        Err(e) => {
            eprintln!("{}: could not estimate a price: {}", label.trim(), e);
            false
        }
    }
}

fn show_catalog(filter: &CatalogFilter, config: &AppConfig) {
    let cars = catalog::sample_cars();
    let found = filter.apply(&cars);

    if found.is_empty() {
        println!("No cars match the filter.");
        println!("Brands: {}", catalog::brands(&cars).join(", "));
        println!("Body types: {}", catalog::body_types(&cars).join(", "));
        return;
    }

    for car in found {
        println!(
            "{:<10} {:<10} {:<14} {}",
            car.brand,
            car.model,
            car.body_type,
            format_currency(car.price as f64, &config.display.currency_symbol)
        );
    }
}
