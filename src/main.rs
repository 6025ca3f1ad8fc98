//! Laptop price predictor - main entry point

use clap::Parser;
use laptop_pricer::cli::{cmd_catalog, cmd_predict, cmd_train, Cli, Commands};
use laptop_pricer::input::RawInput;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "laptop_pricer=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            data,
            artifacts,
            n_estimators,
            max_depth,
            seed,
        } => {
            cmd_train(&data, &artifacts, n_estimators, max_depth, seed)?;
        }
        Commands::Predict {
            data,
            artifacts,
            company,
            type_name,
            inches,
            cpu_company,
            cpu_frequency,
            ram,
            memory,
            weight,
            opsys,
            rate,
        } => {
            let raw = RawInput {
                product_name: String::new(),
                company,
                type_name,
                inches,
                cpu_company,
                cpu_frequency,
                ram,
                memory,
                weight,
                opsys,
            };
            cmd_predict(&data, &artifacts, raw, rate)?;
        }
        Commands::Catalog { data } => {
            cmd_catalog(&data)?;
        }
    }

    Ok(())
}
