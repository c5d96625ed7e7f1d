//! ApiGuard CLI - Command-line interface for model registration and request validation

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use apiguard_core::{Guard, GuardConfig, IncomingRequest, Model};

#[derive(Parser)]
#[command(name = "apiguard")]
#[command(about = "ApiGuard - request-schema registration and anomaly detection")]
struct Cli {
    /// Path to the durable model database
    #[arg(long, default_value = "./apiguard_models.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Register a validation model from a JSON file
    Register {
        /// Path to the model JSON
        model: PathBuf,
    },
    /// Validate a request from a JSON file and print the report
    Validate {
        /// Path to the request JSON
        request: PathBuf,
    },
    /// Check a model file for structural validity without registering it
    Check {
        /// Path to the model JSON
        model: PathBuf,
    },
}

fn read_json<T: serde::de::DeserializeOwned>(path: &PathBuf) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn open_guard(db: PathBuf) -> anyhow::Result<Guard> {
    let mut config = GuardConfig::default();
    config.registry.db_path = db;
    Guard::new(config).context("opening model database")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Register { model }) => {
            let model: Model = read_json(&model)?;
            let key = model.storage_key();
            let guard = open_guard(cli.db)?;
            guard.register_model(model).await?;
            println!("registered model for {key}");
        }
        Some(Commands::Validate { request }) => {
            let request: IncomingRequest = read_json(&request)?;
            let guard = open_guard(cli.db)?;
            let report = guard.validate_request(&request).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Some(Commands::Check { model }) => {
            let model: Model = read_json(&model)?;
            match model.validate() {
                Ok(()) => println!("model ok: {}", model.storage_key()),
                Err(err) => anyhow::bail!("model invalid: {err}"),
            }
        }
        None => {
            println!("ApiGuard v0.1.0 - Use --help for commands");
        }
    }

    Ok(())
}
