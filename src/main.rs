use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use resource_access_core::domain::{CreateRuleInput, FilterType, NewRule};
use resource_access_core::repository::{
    InMemoryResourceAccessRepository, WriteResourceAccessRepository,
};
use resource_access_core::{telemetry, AppError, Config};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use validator::Validate;

/// Resource access rule tooling
#[derive(Parser)]
#[command(name = "resource-access")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a JSON array of rule definitions for structural errors and
    /// formatted name collisions
    #[command(name = "validate")]
    Validate {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Print which filter types may narrow which
    #[command(name = "compatibility")]
    Compatibility,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    let _metrics = telemetry::init(&config.telemetry);
    info!(service = %config.telemetry.service_name, "Resource access tooling started");

    match cli.command {
        Commands::Validate { file } => {
            let invalid = validate_file(&file).await?;
            if invalid > 0 {
                anyhow::bail!("{} invalid rule definition(s) in {}", invalid, file.display());
            }
            Ok(())
        }
        Commands::Compatibility => {
            print_compatibility();
            Ok(())
        }
    }
}

/// Returns the number of rejected definitions.
async fn validate_file(path: &Path) -> Result<usize> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let inputs: Vec<CreateRuleInput> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse rule definitions in {}", path.display()))?;

    // The in-memory store rejects formatted-name clashes between entries
    let store = InMemoryResourceAccessRepository::new();
    let mut invalid = 0;

    for (index, input) in inputs.into_iter().enumerate() {
        let name = input.name.clone();
        match check_definition(&store, input).await {
            Ok(()) => println!("#{index} '{name}': ok"),
            Err(err) => {
                invalid += 1;
                warn!(index, name = %name, kind = err.kind(), "Rejected rule definition");
                println!("#{index} '{name}': {err}");
            }
        }
    }

    info!(file = %path.display(), invalid, "Validation finished");
    Ok(invalid)
}

async fn check_definition(
    store: &InMemoryResourceAccessRepository,
    input: CreateRuleInput,
) -> Result<(), AppError> {
    input.validate()?;
    let rule = NewRule::new(input.into_definition()?)?;
    store.add(&rule).await?;
    Ok(())
}

fn print_compatibility() {
    for filter_type in FilterType::ALL {
        let children = filter_type
            .allowed_children()
            .iter()
            .map(FilterType::as_str)
            .collect::<Vec<_>>();
        if children.is_empty() {
            println!("{:<17} (leaf)", filter_type.as_str());
        } else {
            println!("{:<17} -> {}", filter_type.as_str(), children.join(", "));
        }
    }
}
