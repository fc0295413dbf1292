//! curlgen command-line interface.
//!
//! Turns OpenAPI and Swagger documents into runnable cURL request scripts.
//!
//! # Architecture
//!
//! The CLI is organized around subcommands:
//! - `generate` - Write one request script per operation (or one combined file)
//! - `inspect` - Show the operations and names a document would produce
//! - `config` - Manage the configuration file
//! - `completions` - Generate shell completions
//!
//! # Examples
//!
//! ```bash
//! # PowerShell scripts for every operation, in ./requests
//! curlgen generate https://petstore3.swagger.io/api/v3/openapi.json -o requests
//!
//! # One Bash file with an Authorization header on every request
//! curlgen generate ./openapi.yaml --bash --combined --authorization-header "Bearer $TOKEN"
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use curlgen_cli::commands::generate::GenerateArgs;
use curlgen_cli::{ConfigAction, LogFormat, commands, exit_code_for};
use curlgen_core::cli::{ExitCode, OutputFormat};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Generate cURL request scripts from OpenAPI documents.
#[derive(Parser, Debug)]
#[command(name = "curlgen")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (json, text, pretty)
    #[arg(long = "format", global = true, default_value = "pretty")]
    format: String,

    /// Disable logging entirely
    #[arg(long, global = true)]
    no_logging: bool,

    /// Log line format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, env = "CURLGEN_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate request scripts from an API description
    Generate(GenerateArgs),

    /// Show the operations and script names of an API description
    Inspect {
        /// Path or HTTP(S) URL of the OpenAPI or Swagger document
        source: String,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.no_logging, cli.log_format);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            exit_code_for(&err)
        }
    };

    std::process::exit(exit_code.as_i32());
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let output_format = cli.format.parse::<OutputFormat>()?;

    execute_command(cli.command, cli.config, output_format).await
}

fn init_logging(verbose: bool, no_logging: bool, log_format: LogFormat) {
    if no_logging {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let registry = tracing_subscriber::registry().with(filter);
    // A subscriber may already be installed when embedded; keep it.
    let _ = match log_format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };
}

async fn execute_command(
    command: Commands,
    config: Option<PathBuf>,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    match command {
        Commands::Generate(args) => commands::generate::run(args, config, output_format).await,
        Commands::Inspect { source } => commands::inspect::run(source, output_format).await,
        Commands::Config { action } => commands::config::run(action, config, output_format).await,
        Commands::Completions { shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            commands::completions::run(shell, &mut cmd).await
        }
    }
}
