//! Command-line interface
//!
//! `train` is the offline step: fit from the CSV, report held-out metrics,
//! persist both artifacts. `predict` and `catalog` exercise the serving
//! paths through the same runtime the web layer would hold.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use crate::dataset;
use crate::error::Result;
use crate::input::{convert, LaptopInput, RawInput};
use crate::preprocessing::choice_manifest;
use crate::runtime::{PredictorRuntime, RuntimeConfig};
use crate::training::{self, TrainingConfig};

#[derive(Parser)]
#[command(name = "pricer", about = "Laptop price prediction", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fit the pipeline from a CSV dataset and persist the artifacts
    Train {
        /// Path to the dataset CSV
        #[arg(long, default_value = "laptop_price.csv")]
        data: PathBuf,
        /// Directory for the model and choice artifacts
        #[arg(long, default_value = "artifacts")]
        artifacts: PathBuf,
        /// Number of trees
        #[arg(long, default_value_t = 300)]
        n_estimators: usize,
        /// Maximum tree depth
        #[arg(long)]
        max_depth: Option<usize>,
        /// Random seed
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Predict a price from feature values
    Predict {
        #[arg(long, default_value = "laptop_price.csv")]
        data: PathBuf,
        #[arg(long, default_value = "artifacts")]
        artifacts: PathBuf,
        #[arg(long, default_value = "")]
        company: String,
        #[arg(long, default_value = "")]
        type_name: String,
        #[arg(long, default_value = "")]
        inches: String,
        #[arg(long, default_value = "")]
        cpu_company: String,
        #[arg(long, default_value = "")]
        cpu_frequency: String,
        #[arg(long, default_value = "")]
        ram: String,
        #[arg(long, default_value = "")]
        memory: String,
        #[arg(long, default_value = "")]
        weight: String,
        #[arg(long, default_value = "")]
        opsys: String,
        /// Fixed exchange rate for a second display currency
        #[arg(long)]
        rate: Option<f64>,
    },
    /// Print the per-manufacturer dataset summary
    Catalog {
        #[arg(long, default_value = "laptop_price.csv")]
        data: PathBuf,
    },
}

pub fn cmd_train(
    data: &PathBuf,
    artifacts: &PathBuf,
    n_estimators: usize,
    max_depth: Option<usize>,
    seed: u64,
) -> Result<()> {
    let set = dataset::load_training_set(data)?;
    println!(
        "{} {} rows loaded from {}",
        "✓".green(),
        set.len(),
        data.display()
    );

    let mut config = TrainingConfig::default()
        .with_n_estimators(n_estimators)
        .with_seed(seed);
    if let Some(depth) = max_depth {
        config = config.with_max_depth(depth);
    }

    let pipeline = training::fit(&set, &config)?;
    let choices = choice_manifest(&set.records)?;

    let store = crate::artifact::ArtifactStore::new(artifacts);
    store.save(&pipeline, &choices)?;

    let metrics = pipeline.metrics();
    println!("{} training done", "✓".green());
    println!("  model:   {}", store.model_path().display());
    println!("  choices: {}", store.choices_path().display());
    println!("  MAE:     {:.2}", metrics.mae);
    println!("  RMSE:    {:.2}", metrics.rmse);
    println!("  R²:      {:.3}", metrics.r2);
    Ok(())
}

pub fn cmd_predict(
    data: &PathBuf,
    artifacts: &PathBuf,
    raw: RawInput,
    rate: Option<f64>,
) -> Result<()> {
    let runtime = PredictorRuntime::new(RuntimeConfig {
        dataset_path: data.clone(),
        artifacts_dir: artifacts.clone(),
    });

    let Some(pipeline) = runtime.pipeline() else {
        println!(
            "{} no trained model found in {}; run `pricer train` first",
            "!".yellow(),
            artifacts.display()
        );
        return Ok(());
    };

    let input = LaptopInput::from_form(&raw)?;
    let price = pipeline.predict(&input.to_record())?;

    println!("{} estimated price: {:.2}", "✓".green(), price);
    if let Some(rate) = rate {
        println!("  converted: {:.2}", convert(price, rate));
    }
    Ok(())
}

pub fn cmd_catalog(data: &PathBuf) -> Result<()> {
    let catalog = crate::catalog::Catalog::from_path(data);

    if let Some(reason) = &catalog.error {
        println!("{} catalog unavailable: {reason}", "!".yellow());
        return Ok(());
    }

    println!(
        "{} companies across {} rows",
        catalog.company_count, catalog.row_count
    );
    for company in &catalog.companies {
        println!(
            "  {:<12} {} products, {} types  [{}]",
            company.name.bold(),
            company.product_count,
            company.type_count,
            company.sample_products.join(", ")
        );
    }
    Ok(())
}
