//! API description loading for curlgen.
//!
//! Reads OpenAPI 3.0/3.1 and Swagger 2.0 documents from disk or over HTTP
//! and lowers them into a reference-free model for script synthesis.
//!
//! # Examples
//!
//! ```no_run
//! use curlgen_core::cli::SourceLocation;
//! use curlgen_openapi::{DocumentStats, load_document};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = SourceLocation::new("https://petstore3.swagger.io/api/v3/openapi.json")?;
//! let document = load_document(&source).await?;
//!
//! let stats = DocumentStats::collect(&document);
//! println!("{} operations", stats.operations);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod convert;
mod loader;
mod model;
mod stats;

pub mod normalize;

pub use loader::{load_document, parse_document};
pub use model::{
    ApiDocument, HttpMethod, Operation, Parameter, ParameterLocation, PathItem, RequestBody,
    Schema, SchemaArena, SchemaId, SchemaKind,
};
pub use stats::DocumentStats;
