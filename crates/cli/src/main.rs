//! SSH Check CLI - runs the SSH command compliance check from a config file
//!
//! Stands in for the assessment host: it builds the configuration map,
//! wires the adapters and prints the structured result.

mod logging;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

use output::OutputFormat;
use sshcheck_core::application::CheckService;
use sshcheck_core::domain::{Configuration, ExecutionStatus, CONFIGURATION_KEY};
use sshcheck_core::port::cancel_channel;
use sshcheck_core::port::id_provider::UuidProvider;
use sshcheck_core::port::time_provider::SystemTimeProvider;
use sshcheck_infra_ssh::RusshExecutor;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Process exit code when the check could not run
const EXIT_CHECK_ERROR: u8 = 2;

#[derive(Parser)]
#[command(name = "sshcheck")]
#[command(about = "SSH command compliance check", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// YAML check configuration (username, password, host, port, command, ...)
    #[arg(long, short, global = true, env = "SSHCHECK_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, global = true, default_value = "json")]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the subject this check assesses (no network access)
    Identify,

    /// Run the command on the remote host and print the evidence
    Execute,
}

fn load_configuration(path: Option<&PathBuf>) -> Result<Configuration> {
    let path = path.context("no configuration file given (use --config or SSHCHECK_CONFIG)")?;
    let blob = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    Ok(Configuration::from([(CONFIGURATION_KEY.to_string(), blob)]))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    logging::init()?;

    let cli = Cli::parse();
    info!("sshcheck v{} starting...", VERSION);

    let input = load_configuration(cli.config.as_ref())?;

    // DI wiring
    let time_provider = Arc::new(SystemTimeProvider);
    let executor = Arc::new(RusshExecutor::new(time_provider.clone()));
    let service = CheckService::new(executor, Arc::new(UuidProvider), time_provider);

    match cli.command {
        Commands::Identify => {
            let subjects = service.identify(&input)?;
            println!("{}", output::render_subjects(&subjects, cli.format)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Execute => {
            let (cancel_handle, cancel_token) = cancel_channel();

            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Interrupt received, cancelling check");
                    cancel_handle.cancel();
                }
            });

            let result = service.report(&input, cancel_token).await?;
            println!("{}", output::render_result(&result, cli.format)?);

            match result.status {
                ExecutionStatus::Success => Ok(ExitCode::SUCCESS),
                ExecutionStatus::Error => Ok(ExitCode::from(EXIT_CHECK_ERROR)),
            }
        }
    }
}
