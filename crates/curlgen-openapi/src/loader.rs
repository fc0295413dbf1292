//! Acquisition and parsing of API descriptions.
//!
//! Remote descriptions are fetched with `reqwest`; local ones are read with
//! `tokio::fs`. Content is parsed as JSON first, then YAML, normalized to
//! OpenAPI 3.0 and lowered into an [`ApiDocument`].
//!
//! # Examples
//!
//! ```
//! use curlgen_openapi::parse_document;
//!
//! let yaml = r#"
//! openapi: 3.0.0
//! info: { title: Health, version: "1" }
//! paths:
//!   /health:
//!     get:
//!       operationId: check-health
//!       responses: {}
//! "#;
//!
//! let document = parse_document(yaml, "health.yaml").unwrap();
//! assert_eq!(document.operation_count(), 1);
//! ```

use crate::convert::{declared_verbs, lower_document};
use crate::model::ApiDocument;
use crate::normalize::to_openapi30;
use curlgen_core::cli::SourceLocation;
use curlgen_core::{Error, Result};
use openapiv3::OpenAPI;
use serde_json::Value;
use std::time::Duration;

const FETCH_TIMEOUT_SECS: u64 = 30;

/// Loads and parses an API description from a file path or HTTP(S) URL.
///
/// # Errors
///
/// Returns [`Error::DocumentUnavailable`] if the file cannot be read or the
/// request fails, and [`Error::DocumentInvalid`] if the content is not a
/// supported OpenAPI or Swagger document.
pub async fn load_document(source: &SourceLocation) -> Result<ApiDocument> {
    tracing::info!(source = %source, "loading API description");

    let content = match source {
        SourceLocation::Remote(url) => fetch(url).await?,
        SourceLocation::Local(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|err| Error::DocumentUnavailable {
                    source_location: source.to_string(),
                    source: Box::new(err),
                })?
        }
    };

    tracing::debug!(bytes = content.len(), "API description acquired");
    parse_document(&content, &source.to_string())
}

async fn fetch(url: &str) -> Result<String> {
    let unavailable = |err: reqwest::Error| Error::DocumentUnavailable {
        source_location: url.to_string(),
        source: Box::new(err),
    };

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()
        .map_err(unavailable)?;

    tracing::debug!(%url, "fetching API description");
    client
        .get(url)
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(unavailable)?
        .text()
        .await
        .map_err(unavailable)
}

/// Parses API description text into the document model.
///
/// `source_location` is recorded on the document and used in error messages.
///
/// # Errors
///
/// Returns [`Error::DocumentInvalid`] if the content is neither JSON nor
/// YAML, declares an unsupported version, or does not match the OpenAPI
/// structure.
pub fn parse_document(content: &str, source_location: &str) -> Result<ApiDocument> {
    let invalid = |reason: String| Error::DocumentInvalid {
        source_location: source_location.to_string(),
        reason,
    };

    let raw: Value = match serde_json::from_str(content) {
        Ok(value) => value,
        Err(json_err) => serde_yaml::from_str(content).map_err(|yaml_err| {
            invalid(format!(
                "content is neither JSON ({json_err}) nor YAML ({yaml_err})"
            ))
        })?,
    };

    let normalized = to_openapi30(raw).map_err(invalid)?;
    let declared = declared_verbs(&normalized);
    let spec: OpenAPI = serde_json::from_value(normalized)
        .map_err(|err| invalid(format!("not a valid OpenAPI document: {err}")))?;

    let document = lower_document(&spec, &declared, Some(source_location.to_string()));
    tracing::info!(
        paths = document.paths.len(),
        operations = document.operation_count(),
        "API description parsed"
    );
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HttpMethod, ParameterLocation, SchemaKind};
    use serde_json::json;

    fn petstore() -> Value {
        json!({
            "openapi": "3.0.3",
            "info": {"title": "Petstore", "version": "1.0.0"},
            "servers": [{"url": "https://petstore.example.com/v1"}],
            "paths": {
                "/pets/{petId}": {
                    "parameters": [
                        {"name": "petId", "in": "path", "required": true, "schema": {"type": "string"}}
                    ],
                    "get": {
                        "operationId": "show-pet-by-id",
                        "summary": "Info for a specific pet",
                        "parameters": [
                            {"$ref": "#/components/parameters/Verbose"}
                        ],
                        "responses": {}
                    },
                    "put": {
                        "operationId": "update-pet",
                        "requestBody": {"$ref": "#/components/requestBodies/PetBody"},
                        "responses": {}
                    }
                }
            },
            "components": {
                "parameters": {
                    "Verbose": {"name": "verbose", "in": "query", "description": "More output", "schema": {"type": "boolean"}}
                },
                "requestBodies": {
                    "PetBody": {"content": {"application/json": {"schema": {"$ref": "#/components/schemas/Pet"}}}}
                },
                "schemas": {
                    "Pet": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "born": {"type": "string", "format": "date"},
                            "parent": {"$ref": "#/components/schemas/Pet"}
                        }
                    }
                }
            }
        })
    }

    #[test]
    fn test_parse_json_document() {
        let document = parse_document(&petstore().to_string(), "petstore.json").unwrap();

        assert_eq!(document.source_location.as_deref(), Some("petstore.json"));
        assert_eq!(document.first_server(), Some("https://petstore.example.com/v1"));
        assert_eq!(document.component_schema_count, 1);

        let operations: Vec<_> = document.operations().collect();
        assert_eq!(operations.len(), 2);
        let (path, get) = operations[0];
        assert_eq!(path, "/pets/{petId}");
        assert_eq!(get.method, HttpMethod::Get);
        assert_eq!(get.operation_id.as_deref(), Some("show-pet-by-id"));

        let names: Vec<_> = get
            .parameters
            .iter()
            .map(|p| (p.name.as_str(), p.location))
            .collect();
        assert_eq!(
            names,
            [("petId", ParameterLocation::Path), ("verbose", ParameterLocation::Query)]
        );
        assert_eq!(get.parameters[1].description.as_deref(), Some("More output"));
    }

    #[test]
    fn test_recursive_schema_forms_cycle() {
        let document = parse_document(&petstore().to_string(), "petstore.json").unwrap();
        let (_, put) = document.operations().nth(1).unwrap();
        let body = put.request_body.as_ref().unwrap();
        let pet_id = body.schema_for("application/json").unwrap();
        let pet = document.schemas.get(pet_id).unwrap();

        assert_eq!(pet.kind, Some(SchemaKind::Object));
        assert_eq!(pet.properties["parent"], pet_id);
        let born = document.schemas.get(pet.properties["born"]).unwrap();
        assert_eq!(born.format.as_deref(), Some("date"));
    }

    #[test]
    fn test_parse_yaml_document() {
        let yaml = r"
openapi: 3.0.0
info:
  title: Todo
  version: '1'
paths:
  /todos:
    post:
      requestBody:
        content:
          application/x-www-form-urlencoded:
            schema:
              type: object
              properties:
                title: { type: string }
      responses:
        '201': { description: created }
";
        let document = parse_document(yaml, "todo.yaml").unwrap();
        let (_, post) = document.operations().next().unwrap();
        let body = post.request_body.as_ref().unwrap();
        assert_eq!(body.first_media_type(), Some("application/x-www-form-urlencoded"));
    }

    #[test]
    fn test_all_of_merges_and_one_of_takes_first() {
        let doc = json!({
            "openapi": "3.0.0",
            "info": {"title": "t", "version": "1"},
            "paths": {"/x": {"post": {
                "requestBody": {"content": {
                    "application/json": {"schema": {"allOf": [
                        {"$ref": "#/components/schemas/Base"},
                        {"type": "object", "properties": {"extra": {"type": "integer"}}}
                    ]}},
                    "text/plain": {"schema": {"oneOf": [
                        {"type": "boolean"},
                        {"type": "string"}
                    ]}}
                }},
                "responses": {}
            }}},
            "components": {"schemas": {
                "Base": {"type": "object", "properties": {"id": {"type": "string"}}}
            }}
        });

        let document = parse_document(&doc.to_string(), "x.json").unwrap();
        let (_, post) = document.operations().next().unwrap();
        let body = post.request_body.as_ref().unwrap();

        let merged = document
            .schemas
            .get(body.schema_for("application/json").unwrap())
            .unwrap();
        let keys: Vec<_> = merged.properties.keys().map(String::as_str).collect();
        assert_eq!(keys, ["id", "extra"]);
        assert_eq!(merged.kind, Some(SchemaKind::Object));

        let first = document
            .schemas
            .get(body.schema_for("text/plain").unwrap())
            .unwrap();
        assert_eq!(first.kind, Some(SchemaKind::Boolean));
    }

    #[test]
    fn test_swagger2_document() {
        let doc = json!({
            "swagger": "2.0",
            "info": {"title": "Petstore", "version": "1.0.0"},
            "host": "petstore.swagger.io",
            "basePath": "/v2",
            "paths": {"/pet": {"post": {
                "operationId": "addPet",
                "consumes": ["application/json"],
                "parameters": [{"in": "body", "name": "body", "schema": {"$ref": "#/definitions/Pet"}}],
                "responses": {"405": {"description": "Invalid input"}}
            }}},
            "definitions": {"Pet": {"type": "object", "properties": {"name": {"type": "string"}}}}
        });

        let document = parse_document(&doc.to_string(), "swagger.json").unwrap();
        assert_eq!(document.first_server(), Some("https://petstore.swagger.io/v2"));
        let (_, post) = document.operations().next().unwrap();
        let schema_id = post
            .request_body
            .as_ref()
            .and_then(|body| body.schema_for("application/json"))
            .unwrap();
        assert!(document.schemas.get(schema_id).unwrap().properties.contains_key("name"));
    }

    #[test]
    fn test_operations_follow_declared_verb_order() {
        let yaml = r"
openapi: 3.0.0
info: { title: Pets, version: '1' }
paths:
  /pets:
    post: { operationId: createPet, responses: {} }
    parameters:
      - { name: tenant, in: header, schema: { type: string } }
    delete: { operationId: purgePets, responses: {} }
    get: { operationId: listPets, responses: {} }
  /pets/{petId}:
    patch: { operationId: patchPet, responses: {} }
    get: { operationId: showPet, responses: {} }
";
        let document = parse_document(yaml, "pets.yaml").unwrap();
        let order: Vec<_> = document
            .operations()
            .map(|(path, op)| (path, op.method, op.operation_id.as_deref().unwrap()))
            .collect();
        assert_eq!(
            order,
            [
                ("/pets", HttpMethod::Post, "createPet"),
                ("/pets", HttpMethod::Delete, "purgePets"),
                ("/pets", HttpMethod::Get, "listPets"),
                ("/pets/{petId}", HttpMethod::Patch, "patchPet"),
                ("/pets/{petId}", HttpMethod::Get, "showPet"),
            ]
        );
    }

    #[test]
    fn test_declared_verbs_skip_other_keys() {
        let root = json!({"paths": {"/a": {
            "summary": "A",
            "x-internal": true,
            "head": {},
            "GET": {},
            "options": {}
        }}});
        let declared = declared_verbs(&root);
        assert_eq!(declared["/a"], [HttpMethod::Head, HttpMethod::Options]);
        assert!(declared_verbs(&json!({})).is_empty());
    }

    #[test]
    fn test_invalid_content_is_document_invalid() {
        let err = parse_document("{ this is: [not valid", "broken.json").unwrap_err();
        assert!(err.is_document_invalid());

        let err = parse_document(r#"{"info": {}}"#, "noversion.json").unwrap_err();
        assert!(err.is_document_invalid());
        assert!(err.to_string().contains("noversion.json"));
    }

    #[tokio::test]
    async fn test_missing_file_is_document_unavailable() {
        let source = SourceLocation::new("/definitely/not/here/openapi.json").unwrap();
        let err = load_document(&source).await.unwrap_err();
        assert!(err.is_document_unavailable());
    }
}
