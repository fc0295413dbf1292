//! curlgen CLI library.
//!
//! Command implementations, configuration handling and output formatting
//! for the `curlgen` binary, exposed as a library so they can be tested.

#![allow(clippy::format_push_string)]
#![allow(clippy::unused_async)]
#![allow(clippy::missing_errors_doc)]

use clap::ValueEnum;
use curlgen_core::cli::ExitCode;

pub mod actions;
pub mod commands;
pub mod formatters;

pub use actions::ConfigAction;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Maps a command failure to the process exit code.
///
/// The first [`curlgen_core::Error`] in the cause chain decides the code;
/// anything else is a generic failure.
///
/// # Examples
///
/// ```
/// use anyhow::Context;
/// use curlgen_cli::exit_code_for;
/// use curlgen_core::{Error, cli::ExitCode};
///
/// let err = Err::<(), _>(Error::DocumentInvalid {
///     source_location: "api.yaml".to_string(),
///     reason: "not OpenAPI".to_string(),
/// })
/// .context("failed to load API description")
/// .unwrap_err();
///
/// assert_eq!(exit_code_for(&err), ExitCode::INVALID_INPUT);
/// assert_eq!(exit_code_for(&anyhow::anyhow!("boom")), ExitCode::ERROR);
/// ```
#[must_use]
pub fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<curlgen_core::Error>())
        .map_or(ExitCode::ERROR, ExitCode::for_error)
}
