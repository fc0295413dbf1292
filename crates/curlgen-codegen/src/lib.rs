//! cURL request script synthesis for curlgen.
//!
//! Turns an [`ApiDocument`](curlgen_openapi::ApiDocument) into one runnable
//! curl script per operation, in PowerShell or bash syntax:
//!
//! - [`naming`] derives each operation's display and file name
//! - [`SampleSynthesizer`] builds example payloads from schemas
//! - [`render`] holds the two dialects behind one [`Dialect`](render::Dialect) trait
//! - [`ScriptSetAssembler`] drives the whole run
//!
//! # Examples
//!
//! ```
//! use curlgen_codegen::{ScriptSetAssembler, naming};
//! use curlgen_core::GeneratorSettings;
//! use curlgen_openapi::{ApiDocument, HttpMethod, Operation, PathItem};
//!
//! let mut document = ApiDocument::new();
//! let mut health = PathItem::new("/health");
//! health.operations.push(Operation::new(HttpMethod::Get));
//! document.paths.push(health);
//!
//! assert!(!naming::has_duplicates(&document));
//!
//! let scripts = ScriptSetAssembler::new(GeneratorSettings::default()).assemble(&document);
//! assert_eq!(scripts.scripts[0].filename, "GetHealth.ps1");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod assembler;
mod sample;
mod types;

pub mod naming;
pub mod render;

pub use assembler::{COMBINED_FILE_STEM, ScriptSetAssembler, assemble, compute_base_url};
pub use sample::{SAMPLE_EMAIL, SAMPLE_URI, SampleSynthesizer};
pub use types::{GeneratedScript, GeneratedScripts};
