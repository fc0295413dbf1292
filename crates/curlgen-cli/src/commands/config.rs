//! Config command implementation.
//!
//! Manages the CLI configuration file.
//!
//! Configuration is stored in TOML format at:
//! - Linux: `~/.config/curlgen/config.toml`
//! - macOS: `~/Library/Application Support/curlgen/config.toml`
//! - Windows: `%APPDATA%\curlgen\config.toml`
//!
//! `--config PATH` selects another file.

use crate::actions::ConfigAction;
use crate::formatters::format_output;
use anyhow::{Context, Result};
use curlgen_core::cli::{ExitCode, OutputFormat};
use curlgen_core::{Error, GeneratorSettings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// CLI configuration.
///
/// # Examples
///
/// ```toml
/// [generator]
/// content_type = "application/json"
/// dialect = "shell"
/// output_mode = "per-operation"
/// authorization_header = "Bearer secret"
/// base_url = "https://staging.example.com"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    /// Defaults for `curlgen generate`
    #[serde(default)]
    pub generator: GeneratorSettings,
}

impl Config {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        self.generator.validate()?;
        Ok(())
    }
}

/// Returns the default configuration file path.
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or_else(|| Error::ConfigError {
        message: "failed to determine config directory".to_string(),
    })?;

    Ok(config_dir.join("curlgen").join("config.toml"))
}

/// Returns `explicit` or the default configuration file path.
pub fn resolve_config_path(explicit: Option<&Path>) -> Result<PathBuf> {
    explicit.map_or_else(default_config_path, |path| Ok(path.to_path_buf()))
}

/// Loads the configuration.
///
/// A missing default file yields the defaults; a missing file given with
/// `--config` is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let config_path = resolve_config_path(explicit)?;

    if !config_path.exists() {
        if explicit.is_some() {
            return Err(Error::ConfigError {
                message: format!("config file not found: {}", config_path.display()),
            }
            .into());
        }
        debug!("Config file not found, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("failed to read config file {}", config_path.display()))?;

    let config: Config = toml::from_str(&content).map_err(|err| Error::ConfigError {
        message: format!("failed to parse {}: {err}", config_path.display()),
    })?;

    config.validate()?;
    debug!("Loaded config from {}", config_path.display());

    Ok(config)
}

/// Saves the configuration to `path`, creating parent directories.
pub fn save_config(config: &Config, path: &Path) -> Result<()> {
    config.validate()?;

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }

    let toml_str = toml::to_string_pretty(config).context("failed to serialize config")?;

    fs::write(path, toml_str).context("failed to write config file")?;

    debug!("Saved config to {}", path.display());

    Ok(())
}

/// Initialization result.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InitResult {
    /// Whether a file was written
    pub success: bool,
    /// Status message
    pub message: String,
    /// Configuration file path
    pub path: String,
}

/// Effective configuration.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ShowResult {
    /// Configuration file path
    pub path: String,
    /// Whether the file exists
    pub exists: bool,
    /// Settings in effect
    pub generator: GeneratorSettings,
}

/// Configuration file location.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PathResult {
    /// Configuration file path
    pub path: String,
}

/// Runs the config command.
///
/// # Examples
///
/// ```no_run
/// use curlgen_cli::{ConfigAction, commands::config};
/// use curlgen_core::cli::OutputFormat;
///
/// # #[tokio::main]
/// # async fn main() {
/// let result = config::run(ConfigAction::Path, None, OutputFormat::Json).await;
/// assert!(result.is_ok());
/// # }
/// ```
pub async fn run(
    action: ConfigAction,
    config_path: Option<PathBuf>,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    info!("Config action: {:?}", action);

    let path = resolve_config_path(config_path.as_deref())?;
    let output = match action {
        ConfigAction::Init { force } => format_output(&init_config(&path, force)?, output_format)?,
        ConfigAction::Show => {
            let config = load_config(config_path.as_deref())?;
            let result = ShowResult {
                path: path.display().to_string(),
                exists: path.exists(),
                generator: config.generator,
            };
            format_output(&result, output_format)?
        }
        ConfigAction::Path => format_output(
            &PathResult {
                path: path.display().to_string(),
            },
            output_format,
        )?,
    };

    println!("{output}");
    Ok(ExitCode::SUCCESS)
}

/// Writes a default configuration file unless one exists and `force` is off.
fn init_config(path: &Path, force: bool) -> Result<InitResult> {
    if path.exists() && !force {
        return Ok(InitResult {
            success: false,
            message: "config file already exists, use --force to overwrite".to_string(),
            path: path.display().to_string(),
        });
    }

    save_config(&Config::default(), path)?;
    info!("Wrote default config to {}", path.display());

    Ok(InitResult {
        success: true,
        message: "config file created".to_string(),
        path: path.display().to_string(),
    })
}
