use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ob_cli::commands::{catalog, compute};
use ob_cli::{Cli, Commands, Config};
use ob_core::{Catalog, EncounterContext};

/// Load config and resolve the fee catalog: an explicit JSON file when
/// configured, the built-in master table otherwise.
fn load_catalog(config_path: Option<&Path>) -> Result<Catalog> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    match &config.catalog_path {
        Some(path) => {
            let payload = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read catalog file {}", path.display()))?;
            let catalog = Catalog::from_json_str(&payload)
                .with_context(|| format!("invalid catalog file {}", path.display()))?;
            tracing::debug!(entries = catalog.len(), "loaded catalog from file");
            Ok(catalog)
        }
        None => Ok(Catalog::standard()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    match &cli.command {
        Some(Commands::Compute {
            visit,
            time_band,
            arrival,
            age,
            copay,
            add,
            auto,
            json,
        }) => {
            let catalog = load_catalog(cli.config.as_deref())?;
            let context = EncounterContext {
                visit_type: *visit,
                time_band: *time_band,
                arrival_method: *arrival,
                patient_age_years: EncounterContext::clamp_age(*age),
                copay_ratio: *copay,
            };
            compute::run(&catalog, context, add, *auto, *json)?;
        }
        Some(Commands::Catalog {
            category,
            tag,
            hidden,
            json,
        }) => {
            let loaded = load_catalog(cli.config.as_deref())?;
            catalog::run(&loaded, *category, *tag, *hidden, *json)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
