//! Generate command implementation.
//!
//! Turns an API description into request scripts:
//! 1. Merges command-line flags over the config file settings
//! 2. Loads and parses the description from a file or URL
//! 3. Reports document statistics and duplicate operation names
//! 4. Renders one script per operation (or one combined script)
//! 5. Writes the scripts to the output directory

use crate::commands::config::Config;
use crate::formatters::format_output;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use curlgen_codegen::naming::duplicate_names;
use curlgen_codegen::{GeneratedScripts, ScriptSetAssembler};
use curlgen_core::cli::{ExitCode, OutputFormat, SourceLocation};
use curlgen_core::{Error, GeneratorSettings, OutputMode, ScriptDialect};
use curlgen_openapi::{DocumentStats, load_document};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Arguments of `curlgen generate`.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct GenerateArgs {
    /// Path or HTTP(S) URL of the OpenAPI or Swagger document
    pub source: String,

    /// Directory the scripts are written to (created if missing)
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Write Bash scripts (.sh) instead of PowerShell scripts (.ps1)
    #[arg(long)]
    pub bash: bool,

    /// Write every request into a single file
    #[arg(long)]
    pub combined: bool,

    /// Value of the Authorization header added to every request
    #[arg(long, env = "CURLGEN_AUTHORIZATION_HEADER", hide_env_values = true)]
    pub authorization_header: Option<String>,

    /// Preferred Content-Type for request bodies
    #[arg(long)]
    pub content_type: Option<String>,

    /// Prefix for every request URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Do not collect document statistics before generating
    #[arg(long)]
    pub skip_validation: bool,

    /// Fail when two operations resolve to the same script name
    #[arg(long)]
    pub fail_on_duplicates: bool,
}

impl GenerateArgs {
    /// Creates arguments for `source` with every option at its default.
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            output: PathBuf::from("."),
            bash: false,
            combined: false,
            authorization_header: None,
            content_type: None,
            base_url: None,
            skip_validation: false,
            fail_on_duplicates: false,
        }
    }
}

/// One file on disk after a generation run.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WrittenFile {
    /// File name inside the output directory
    pub name: String,
    /// Size of the final content in bytes
    pub bytes: usize,
}

/// Result of a generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    /// Location the description was loaded from
    pub source: String,
    /// Script dialect
    pub dialect: ScriptDialect,
    /// File layout
    pub output_mode: OutputMode,
    /// Directory the scripts were written to
    pub output_dir: String,
    /// Distinct files written, in the order they were first written
    pub files: Vec<WrittenFile>,
    /// Names shared by more than one operation
    pub duplicates: Vec<String>,
    /// Document statistics, absent with `--skip-validation`
    pub stats: Option<DocumentStats>,
    /// Wall-clock time of the run in milliseconds
    pub duration_ms: u64,
    /// Completion time
    pub generated_at: DateTime<Utc>,
}

/// Merges command-line flags over the configured settings.
///
/// Flags win over the config file, which wins over built-in defaults. The
/// source location always comes from the command line.
pub fn resolve_settings(args: &GenerateArgs, config: &Config) -> Result<GeneratorSettings> {
    let mut settings = config.generator.clone();

    if args.bash {
        settings.dialect = ScriptDialect::Shell;
    }
    if args.combined {
        settings.output_mode = OutputMode::Combined;
    }
    if let Some(authorization) = &args.authorization_header {
        settings.authorization_header = Some(authorization.clone());
    }
    if let Some(content_type) = &args.content_type {
        settings.content_type.clone_from(content_type);
    }
    if let Some(base_url) = &args.base_url {
        settings.base_url = Some(base_url.clone());
    }
    settings.source_location = Some(args.source.trim().to_string());

    settings.validate().context("invalid generator settings")?;
    Ok(settings)
}

/// Loads the document, renders the scripts and writes them to disk.
///
/// # Errors
///
/// Returns an error if the settings are invalid, the document cannot be
/// loaded, duplicate names are found with `--fail-on-duplicates`, or a
/// file cannot be written.
pub async fn execute(args: &GenerateArgs, config: &Config) -> Result<GenerationResult> {
    let started = Instant::now();
    let source = SourceLocation::new(args.source.as_str()).context("invalid source")?;
    let settings = resolve_settings(args, config)?;

    let document = load_document(&source)
        .await
        .with_context(|| format!("failed to load API description from {source}"))?;

    let stats = if args.skip_validation {
        None
    } else {
        let stats = DocumentStats::collect(&document);
        info!(
            path_items = stats.path_items,
            operations = stats.operations,
            parameters = stats.parameters,
            request_bodies = stats.request_bodies,
            schemas = stats.schemas,
            "document statistics"
        );
        Some(stats)
    };

    let duplicates = duplicate_names(&document);
    if !duplicates.is_empty() {
        warn!(names = %duplicates.join(", "), "operations share a script name");
        if args.fail_on_duplicates {
            return Err(Error::DocumentInvalid {
                source_location: source.to_string(),
                reason: format!("duplicate operation names: {}", duplicates.join(", ")),
            }
            .into());
        }
    }

    let assembler = ScriptSetAssembler::new(settings);
    let scripts = assembler.assemble(&document);
    let files = write_scripts(&args.output, &scripts)
        .await
        .context("failed to write request scripts")?;

    let settings = assembler.settings();
    Ok(GenerationResult {
        source: source.to_string(),
        dialect: settings.dialect,
        output_mode: settings.output_mode,
        output_dir: args.output.display().to_string(),
        files,
        duplicates,
        stats,
        duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        generated_at: Utc::now(),
    })
}

/// Writes every script into `dir`, creating it if needed.
///
/// Later scripts overwrite earlier ones with the same file name, so each
/// name is reported once with the size of the content left on disk.
pub async fn write_scripts(
    dir: &Path,
    scripts: &GeneratedScripts,
) -> curlgen_core::Result<Vec<WrittenFile>> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| Error::Io {
            path: dir.to_path_buf(),
            source,
        })?;

    let mut written: Vec<WrittenFile> = Vec::with_capacity(scripts.len());
    for script in scripts.iter() {
        let path = dir.join(&script.filename);
        tokio::fs::write(&path, &script.content)
            .await
            .map_err(|source| Error::Io {
                path: path.clone(),
                source,
            })?;

        let bytes = script.content.len();
        match written.iter_mut().find(|file| file.name == script.filename) {
            Some(file) => file.bytes = bytes,
            None => written.push(WrittenFile {
                name: script.filename.clone(),
                bytes,
            }),
        }
    }

    info!(files = written.len(), dir = %dir.display(), "request scripts written");
    Ok(written)
}

/// Runs the generate command.
///
/// # Examples
///
/// ```no_run
/// use curlgen_cli::commands::generate::{self, GenerateArgs};
/// use curlgen_core::cli::{ExitCode, OutputFormat};
///
/// # async fn example() -> Result<(), anyhow::Error> {
/// let mut args = GenerateArgs::new("https://petstore3.swagger.io/api/v3/openapi.json");
/// args.bash = true;
///
/// let code = generate::run(args, None, OutputFormat::Pretty).await?;
/// assert_eq!(code, ExitCode::SUCCESS);
/// # Ok(())
/// # }
/// ```
pub async fn run(
    args: GenerateArgs,
    config_path: Option<PathBuf>,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let config = crate::commands::config::load_config(config_path.as_deref())?;
    let result = execute(&args, &config).await?;

    let formatted = format_output(&result, output_format)?;
    println!("{formatted}");

    Ok(ExitCode::SUCCESS)
}
