//! CLI command implementations.
//!
//! Each subcommand lives in its own module and returns the exit code to
//! report on success.

pub mod completions;
pub mod config;
pub mod generate;
pub mod inspect;
