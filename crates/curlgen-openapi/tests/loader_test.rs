//! Integration tests for document loading.
//!
//! These tests write API descriptions to temporary files and load them
//! through the public async entry point.

use curlgen_core::cli::SourceLocation;
use curlgen_openapi::{DocumentStats, HttpMethod, ParameterLocation, SchemaKind, load_document};
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn source_for(file: &NamedTempFile) -> SourceLocation {
    SourceLocation::new(file.path().to_string_lossy().into_owned()).unwrap()
}

/// Tests loading a JSON document from disk
#[tokio::test]
async fn test_load_json_file() {
    let doc = json!({
        "openapi": "3.0.2",
        "info": {"title": "Store", "version": "1"},
        "servers": [{"url": "/api/v3"}],
        "paths": {
            "/store/order": {
                "post": {
                    "operationId": "placeOrder",
                    "requestBody": {"content": {"application/json": {"schema": {
                        "type": "object",
                        "properties": {
                            "id": {"type": "integer", "format": "int64"},
                            "shipDate": {"type": "string", "format": "date-time"},
                            "complete": {"type": "boolean"}
                        }
                    }}}},
                    "responses": {"200": {"description": "ok"}}
                }
            },
            "/store/order/{orderId}": {
                "get": {
                    "operationId": "getOrderById",
                    "parameters": [{"name": "orderId", "in": "path", "required": true, "schema": {"type": "integer"}}],
                    "responses": {"200": {"description": "ok"}}
                },
                "delete": {
                    "operationId": "deleteOrder",
                    "parameters": [{"name": "orderId", "in": "path", "required": true, "schema": {"type": "integer"}}],
                    "responses": {"200": {"description": "ok"}}
                }
            }
        }
    });
    let file = write_temp(&doc.to_string(), ".json");

    let document = load_document(&source_for(&file)).await.unwrap();

    assert_eq!(document.first_server(), Some("/api/v3"));
    let visited: Vec<_> = document
        .operations()
        .map(|(path, op)| (path.to_string(), op.method))
        .collect();
    assert_eq!(
        visited,
        [
            ("/store/order".to_string(), HttpMethod::Post),
            ("/store/order/{orderId}".to_string(), HttpMethod::Get),
            ("/store/order/{orderId}".to_string(), HttpMethod::Delete),
        ]
    );

    let (_, place_order) = document.operations().next().unwrap();
    let body_id = place_order
        .request_body
        .as_ref()
        .and_then(|body| body.schema_for("application/json"))
        .unwrap();
    let body = document.schemas.get(body_id).unwrap();
    let ship_date = document.schemas.get(body.properties["shipDate"]).unwrap();
    assert_eq!(ship_date.kind, Some(SchemaKind::String));
    assert_eq!(ship_date.format.as_deref(), Some("date-time"));
}

/// Tests loading a YAML OpenAPI 3.1 document from disk
#[tokio::test]
async fn test_load_yaml_31_file() {
    let yaml = r"
openapi: 3.1.0
info:
  title: Users
  version: '2'
paths:
  /users:
    get:
      summary: List users
      parameters:
        - name: page
          in: query
          schema:
            type: [integer, 'null']
      responses:
        '200':
          description: ok
";
    let file = write_temp(yaml, ".yaml");

    let document = load_document(&source_for(&file)).await.unwrap();
    let (_, list) = document.operations().next().unwrap();

    assert_eq!(list.summary.as_deref(), Some("List users"));
    assert_eq!(list.parameters[0].location, ParameterLocation::Query);
}

/// Tests statistics for a Swagger 2.0 document
#[tokio::test]
async fn test_swagger2_statistics() {
    let doc = json!({
        "swagger": "2.0",
        "info": {"title": "Petstore", "version": "1"},
        "host": "petstore.swagger.io",
        "basePath": "/v2",
        "schemes": ["https"],
        "paths": {
            "/pet": {
                "post": {
                    "operationId": "addPet",
                    "parameters": [{"in": "body", "name": "body", "schema": {"$ref": "#/definitions/Pet"}}],
                    "responses": {"405": {"description": "Invalid input"}}
                },
                "put": {
                    "operationId": "updatePet",
                    "parameters": [{"in": "body", "name": "body", "schema": {"$ref": "#/definitions/Pet"}}],
                    "responses": {"400": {"description": "Invalid ID"}}
                }
            },
            "/pet/findByStatus": {
                "get": {
                    "operationId": "findPetsByStatus",
                    "parameters": [{"in": "query", "name": "status", "type": "array", "items": {"type": "string"}}],
                    "responses": {"200": {"description": "ok", "schema": {"type": "array", "items": {"$ref": "#/definitions/Pet"}}}}
                }
            }
        },
        "definitions": {
            "Pet": {"type": "object", "properties": {"name": {"type": "string"}, "category": {"$ref": "#/definitions/Category"}}},
            "Category": {"type": "object", "properties": {"id": {"type": "integer"}}}
        }
    });
    let file = write_temp(&doc.to_string(), ".json");

    let document = load_document(&source_for(&file)).await.unwrap();
    let stats = DocumentStats::collect(&document);

    assert_eq!(stats.path_items, 2);
    assert_eq!(stats.operations, 3);
    assert_eq!(stats.parameters, 1);
    assert_eq!(stats.request_bodies, 2);
    assert_eq!(stats.schemas, 2);
    assert_eq!(document.first_server(), Some("https://petstore.swagger.io/v2"));
}

/// Tests that unreadable content is reported as invalid, not unavailable
#[tokio::test]
async fn test_garbage_file_is_invalid() {
    let file = write_temp("<html><body>not an api</body></html>", ".json");

    let err = load_document(&source_for(&file)).await.unwrap_err();
    assert!(err.is_document_invalid());
}

/// Tests that a missing file is reported as unavailable
#[tokio::test]
async fn test_missing_file_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.yaml");
    let source = SourceLocation::new(missing.to_string_lossy().into_owned()).unwrap();

    let err = load_document(&source).await.unwrap_err();
    assert!(err.is_document_unavailable());
}
