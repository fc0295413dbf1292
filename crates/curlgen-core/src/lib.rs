//! Core types, settings, and errors for curlgen.
//!
//! This crate provides the foundational types shared by the document
//! loader, the script synthesis engine, and the command-line interface.
//!
//! # Architecture
//!
//! The core consists of:
//! - Error hierarchy with contextual information
//! - Generation settings (`GeneratorSettings`, `ScriptDialect`, `OutputMode`)
//! - CLI-facing types (`cli::OutputFormat`, `cli::ExitCode`, `cli::SourceLocation`)

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod error;
mod settings;

pub mod cli;

pub use error::{Error, Result};
pub use settings::{
    DEFAULT_CONTENT_TYPE, GeneratorSettings, GeneratorSettingsBuilder, OutputMode, ScriptDialect,
};
