//! Inspect command implementation.
//!
//! Loads an API description and reports what `generate` would produce from
//! it without writing anything.

use crate::formatters::format_output;
use anyhow::{Context, Result};
use curlgen_codegen::naming::{capitalize_first, duplicate_names, resolve_operation_name};
use curlgen_core::cli::{ExitCode, OutputFormat, SourceLocation};
use curlgen_openapi::{ApiDocument, DocumentStats, load_document};
use serde::Serialize;
use tracing::info;

/// One operation as `generate` would name it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OperationSummary {
    /// Uppercase HTTP verb
    pub verb: String,
    /// Path template
    pub path: String,
    /// Script file stem
    pub name: String,
    /// Whether the name was derived from the verb and path
    pub fallback: bool,
}

/// Result of inspecting a document.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct InspectResult {
    /// Location the description was loaded from
    pub source: String,
    /// Declared server URLs
    pub servers: Vec<String>,
    /// Document statistics
    pub stats: DocumentStats,
    /// Operations in generation order
    pub operations: Vec<OperationSummary>,
    /// Names shared by more than one operation
    pub duplicates: Vec<String>,
}

impl InspectResult {
    /// Summarizes a loaded document.
    #[must_use]
    pub fn from_document(source: &str, document: &ApiDocument) -> Self {
        let operations = document
            .operations()
            .map(|(path, operation)| {
                let name = resolve_operation_name(path, operation);
                let fallback = name.is_fallback();
                let name = name.into_inner();
                OperationSummary {
                    verb: operation.method.as_upper().to_string(),
                    path: path.to_string(),
                    name: capitalize_first(&name).unwrap_or(name),
                    fallback,
                }
            })
            .collect();

        Self {
            source: source.to_string(),
            servers: document.servers.clone(),
            stats: DocumentStats::collect(document),
            operations,
            duplicates: duplicate_names(document),
        }
    }
}

/// Runs the inspect command.
pub async fn run(source: String, output_format: OutputFormat) -> Result<ExitCode> {
    let source = SourceLocation::new(source).context("invalid source")?;
    let document = load_document(&source)
        .await
        .with_context(|| format!("failed to load API description from {source}"))?;

    let result = InspectResult::from_document(source.as_str(), &document);
    info!(operations = result.operations.len(), "inspected API description");

    println!("{}", format_output(&result, output_format)?);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use curlgen_openapi::parse_document;

    const DOCUMENT: &str = r#"{
      "openapi": "3.0.3",
      "info": { "title": "Inventory", "version": "1.0" },
      "servers": [{ "url": "https://inventory.example.com/v1" }],
      "paths": {
        "/items": {
          "get": { "operationId": "listItems", "responses": {} }
        },
        "/stock": {
          "get": { "operationId": "listItems", "responses": {} }
        },
        "/items/{itemId}": {
          "delete": {
            "parameters": [{ "name": "itemId", "in": "path", "required": true, "schema": { "type": "string" } }],
            "responses": {}
          }
        }
      }
    }"#;

    #[test]
    fn test_from_document() {
        let document = parse_document(DOCUMENT, "inventory.json").unwrap();
        let result = InspectResult::from_document("inventory.json", &document);

        assert_eq!(result.servers, ["https://inventory.example.com/v1"]);
        assert_eq!(result.stats.operations, 3);
        assert_eq!(result.stats.parameters, 1);
        assert_eq!(result.duplicates, ["GetListItems"]);

        let names: Vec<_> = result.operations.iter().map(|op| op.name.as_str()).collect();
        assert_eq!(names[..2], ["GetListItems", "GetListItems"]);
        assert!(!result.operations[0].fallback);

        let delete = &result.operations[2];
        assert_eq!(delete.verb, "DELETE");
        assert_eq!(delete.path, "/items/{itemId}");
        assert!(delete.fallback);
    }

    #[tokio::test]
    async fn test_run_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json").display().to_string();

        let err = run(missing, OutputFormat::Json).await.unwrap_err();
        assert_eq!(crate::exit_code_for(&err), ExitCode::DOCUMENT_ERROR);
    }
}
