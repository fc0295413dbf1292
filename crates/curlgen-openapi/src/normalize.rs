//! Normalization of raw API descriptions to the OpenAPI 3.0 shape.
//!
//! `openapiv3` only understands OpenAPI 3.0. Swagger 2.0 documents are
//! rewritten structurally and OpenAPI 3.1 documents have their JSON Schema
//! 2020-12 constructs reduced to 3.0 equivalents before typed parsing.

use serde_json::{Map, Value, json};

const TARGET_VERSION: &str = "3.0.3";
const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const MULTIPART: &str = "multipart/form-data";
const VERBS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Version family of a raw document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecVersion {
    /// `swagger: "2.0"`
    Swagger2,
    /// `openapi: "3.0.x"`
    OpenApi30,
    /// `openapi: "3.1.x"`
    OpenApi31,
}

/// Detects the version family from the root `swagger`/`openapi` field.
///
/// # Errors
///
/// Returns a reason string if the version field is missing or unsupported.
pub fn detect_version(root: &Value) -> Result<SpecVersion, String> {
    if let Some(swagger) = root.get("swagger").and_then(Value::as_str) {
        return if swagger.starts_with("2.") {
            Ok(SpecVersion::Swagger2)
        } else {
            Err(format!("unsupported Swagger version {swagger}"))
        };
    }

    match root.get("openapi").and_then(Value::as_str) {
        Some(version) if version.starts_with("3.0") => Ok(SpecVersion::OpenApi30),
        Some(version) if version.starts_with("3.1") => Ok(SpecVersion::OpenApi31),
        Some(version) => Err(format!("unsupported OpenAPI version {version}")),
        None => Err("missing 'openapi' or 'swagger' version field".to_string()),
    }
}

/// Rewrites any supported document into the OpenAPI 3.0 shape.
///
/// # Errors
///
/// Returns a reason string if the version is unsupported or the root is
/// not an object.
pub fn to_openapi30(root: Value) -> Result<Value, String> {
    if !root.is_object() {
        return Err("document root is not an object".to_string());
    }

    match detect_version(&root)? {
        SpecVersion::OpenApi30 => Ok(root),
        SpecVersion::OpenApi31 => Ok(downgrade_31(root)),
        SpecVersion::Swagger2 => Ok(convert_swagger2(root)),
    }
}

fn downgrade_31(mut root: Value) -> Value {
    reduce_schema_keywords(&mut root);
    if let Some(object) = root.as_object_mut() {
        object.insert("openapi".to_string(), json!(TARGET_VERSION));
        object.remove("webhooks");
        object.remove("jsonSchemaDialect");
        object.entry("paths").or_insert_with(|| json!({}));
    }
    root
}

/// Reduces 3.1 schema keywords in place, at any depth.
///
/// - `type: [T, "null"]` becomes `type: T` plus `nullable: true`
/// - numeric `exclusiveMinimum`/`exclusiveMaximum` become the 3.0 boolean form
/// - an `examples` array becomes a single `example`
fn reduce_schema_keywords(value: &mut Value) {
    match value {
        Value::Object(object) => {
            reduce_type_array(object);
            reduce_exclusive_bound(object, "exclusiveMinimum", "minimum");
            reduce_exclusive_bound(object, "exclusiveMaximum", "maximum");
            if object.get("examples").is_some_and(Value::is_array) {
                if let Some(Value::Array(mut examples)) = object.remove("examples") {
                    if !object.contains_key("example") && !examples.is_empty() {
                        object.insert("example".to_string(), examples.swap_remove(0));
                    }
                }
            }
            for child in object.values_mut() {
                reduce_schema_keywords(child);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(reduce_schema_keywords),
        _ => {}
    }
}

fn reduce_type_array(object: &mut Map<String, Value>) {
    let Some(Value::Array(types)) = object.get("type") else {
        return;
    };

    let nullable = types.iter().any(|t| t.as_str() == Some("null"));
    let first = types
        .iter()
        .filter_map(Value::as_str)
        .find(|t| *t != "null")
        .map(str::to_string);

    match first {
        Some(single) => {
            object.insert("type".to_string(), Value::String(single));
        }
        None => {
            object.remove("type");
        }
    }
    if nullable {
        object.insert("nullable".to_string(), Value::Bool(true));
    }
}

fn reduce_exclusive_bound(object: &mut Map<String, Value>, exclusive: &str, inclusive: &str) {
    if let Some(bound) = object.get(exclusive).filter(|v| v.is_number()).cloned() {
        object.insert(inclusive.to_string(), bound);
        object.insert(exclusive.to_string(), Value::Bool(true));
    }
}

fn convert_swagger2(root: Value) -> Value {
    let mut object = match root {
        Value::Object(object) => object,
        other => return other,
    };

    object.remove("swagger");
    object.insert("openapi".to_string(), json!(TARGET_VERSION));

    if let Some(server) = server_url(&object) {
        object.insert("servers".to_string(), json!([{ "url": server }]));
    }
    object.remove("host");
    object.remove("basePath");
    object.remove("schemes");

    let global_consumes = string_list(object.remove("consumes").as_ref());
    object.remove("produces");

    if let Some(Value::Object(paths)) = object.get_mut("paths") {
        for item in paths.values_mut() {
            if let Value::Object(item) = item {
                convert_path_item(item, &global_consumes);
            }
        }
    } else {
        object.insert("paths".to_string(), json!({}));
    }

    let mut components = Map::new();
    if let Some(definitions) = object.remove("definitions") {
        components.insert("schemas".to_string(), definitions);
    }
    if let Some(Value::Object(parameters)) = object.remove("parameters") {
        let converted: Map<String, Value> = parameters
            .into_iter()
            .filter(|(_, param)| !is_body_or_form(param))
            .map(|(name, mut param)| {
                convert_simple_parameter(&mut param);
                (name, param)
            })
            .collect();
        components.insert("parameters".to_string(), Value::Object(converted));
    }
    object.remove("responses");
    object.remove("securityDefinitions");
    object.remove("security");
    if !components.is_empty() {
        object.insert("components".to_string(), Value::Object(components));
    }

    let mut converted = Value::Object(object);
    rewrite_swagger_schemas(&mut converted);
    converted
}

fn server_url(object: &Map<String, Value>) -> Option<String> {
    let base_path = object.get("basePath").and_then(Value::as_str).unwrap_or("");
    let Some(host) = object.get("host").and_then(Value::as_str) else {
        return (!base_path.is_empty()).then(|| base_path.to_string());
    };

    let scheme = object
        .get("schemes")
        .and_then(Value::as_array)
        .and_then(|schemes| schemes.first())
        .and_then(Value::as_str)
        .unwrap_or("https");

    let separator = if base_path.is_empty() || base_path.starts_with('/') {
        ""
    } else {
        "/"
    };
    Some(format!("{scheme}://{host}{separator}{base_path}"))
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn is_body_or_form(param: &Value) -> bool {
    matches!(
        param.get("in").and_then(Value::as_str),
        Some("body" | "formData")
    )
}

fn convert_path_item(item: &mut Map<String, Value>, global_consumes: &[String]) {
    if let Some(Value::Array(params)) = item.get_mut("parameters") {
        params.retain(|param| !is_body_or_form(param));
        params.iter_mut().for_each(convert_simple_parameter);
    }

    for verb in VERBS {
        if let Some(Value::Object(operation)) = item.get_mut(verb) {
            convert_operation(operation, global_consumes);
        }
    }
}

fn convert_operation(operation: &mut Map<String, Value>, global_consumes: &[String]) {
    let mut consumes = string_list(operation.remove("consumes").as_ref());
    if consumes.is_empty() {
        consumes = global_consumes.to_vec();
    }
    operation.remove("produces");
    operation.remove("schemes");

    let params = match operation.remove("parameters") {
        Some(Value::Array(params)) => params,
        _ => Vec::new(),
    };

    let mut body = None;
    let mut form_fields = Vec::new();
    let mut remaining = Vec::new();
    for mut param in params {
        match param.get("in").and_then(Value::as_str) {
            Some("body") => body = Some(param),
            Some("formData") => form_fields.push(param),
            _ => {
                convert_simple_parameter(&mut param);
                remaining.push(param);
            }
        }
    }

    if !remaining.is_empty() {
        operation.insert("parameters".to_string(), Value::Array(remaining));
    }

    if let Some(request_body) = body
        .map(|body| body_request(&body, &consumes))
        .or_else(|| (!form_fields.is_empty()).then(|| form_request(&form_fields, &consumes)))
    {
        operation.insert("requestBody".to_string(), request_body);
    }

    match operation.get_mut("responses") {
        Some(Value::Object(responses)) => responses.values_mut().for_each(convert_response),
        _ => {
            operation.insert("responses".to_string(), json!({}));
        }
    }
}

fn body_request(body: &Value, consumes: &[String]) -> Value {
    let schema = body.get("schema").cloned().unwrap_or_else(|| json!({}));
    let media_types: Vec<&str> = if consumes.is_empty() {
        vec!["application/json"]
    } else {
        consumes.iter().map(String::as_str).collect()
    };

    let content: Map<String, Value> = media_types
        .into_iter()
        .map(|media_type| (media_type.to_string(), json!({ "schema": schema })))
        .collect();

    let mut request = Map::new();
    if let Some(description) = body.get("description") {
        request.insert("description".to_string(), description.clone());
    }
    if let Some(required) = body.get("required") {
        request.insert("required".to_string(), required.clone());
    }
    request.insert("content".to_string(), Value::Object(content));
    Value::Object(request)
}

fn form_request(fields: &[Value], consumes: &[String]) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();
    let mut has_file = false;

    for field in fields {
        let Some(name) = field.get("name").and_then(Value::as_str) else {
            continue;
        };
        let mut property = Map::new();
        match field.get("type").and_then(Value::as_str) {
            Some("file") => {
                has_file = true;
                property.insert("type".to_string(), json!("string"));
                property.insert("format".to_string(), json!("binary"));
            }
            Some(other) => {
                property.insert("type".to_string(), json!(other));
            }
            None => {
                property.insert("type".to_string(), json!("string"));
            }
        }
        for key in ["format", "description", "items", "enum", "default"] {
            if let Some(value) = field.get(key) {
                property.entry(key).or_insert_with(|| value.clone());
            }
        }
        properties.insert(name.to_string(), Value::Object(property));
        if field.get("required").and_then(Value::as_bool) == Some(true) {
            required.push(json!(name));
        }
    }

    let mut schema = Map::new();
    schema.insert("type".to_string(), json!("object"));
    schema.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".to_string(), Value::Array(required));
    }
    let schema = Value::Object(schema);

    let declared: Vec<&str> = consumes
        .iter()
        .map(String::as_str)
        .filter(|media_type| *media_type == FORM_URLENCODED || *media_type == MULTIPART)
        .collect();
    let media_types = if !declared.is_empty() {
        declared
    } else if has_file {
        vec![MULTIPART]
    } else {
        vec![FORM_URLENCODED]
    };

    let content: Map<String, Value> = media_types
        .into_iter()
        .map(|media_type| (media_type.to_string(), json!({ "schema": schema })))
        .collect();
    json!({ "content": content })
}

/// Moves the inline type keywords of a non-body parameter into `schema`.
fn convert_simple_parameter(param: &mut Value) {
    let Some(object) = param.as_object_mut() else {
        return;
    };
    if object.contains_key("$ref") || object.contains_key("schema") || object.contains_key("content")
    {
        return;
    }

    let mut schema = Map::new();
    for key in [
        "type",
        "format",
        "items",
        "default",
        "enum",
        "minimum",
        "maximum",
        "minLength",
        "maxLength",
        "pattern",
    ] {
        if let Some(value) = object.remove(key) {
            schema.insert(key.to_string(), value);
        }
    }
    object.remove("collectionFormat");
    object.remove("allowEmptyValue");

    if !schema.contains_key("type") {
        schema.insert("type".to_string(), json!("string"));
    }
    object.insert("schema".to_string(), Value::Object(schema));
}

fn convert_response(response: &mut Value) {
    let Some(object) = response.as_object_mut() else {
        return;
    };
    if object.contains_key("$ref") {
        return;
    }

    let description = object
        .remove("description")
        .unwrap_or_else(|| json!(""));
    let schema = object.remove("schema");
    object.clear();
    object.insert("description".to_string(), description);
    if let Some(schema) = schema {
        object.insert(
            "content".to_string(),
            json!({ "application/json": { "schema": schema } }),
        );
    }
}

/// Rewrites 2.0-only schema constructs at any depth.
///
/// - `#/definitions/` and `#/parameters/` references move under `components`
/// - `type: file` becomes a binary string
/// - string-valued `discriminator` is dropped (3.0 expects an object)
fn rewrite_swagger_schemas(value: &mut Value) {
    match value {
        Value::Object(object) => {
            let moved = object.get("$ref").and_then(Value::as_str).and_then(|reference| {
                reference
                    .strip_prefix("#/definitions/")
                    .map(|name| format!("#/components/schemas/{name}"))
                    .or_else(|| {
                        reference
                            .strip_prefix("#/parameters/")
                            .map(|name| format!("#/components/parameters/{name}"))
                    })
            });
            if let Some(reference) = moved {
                object.insert("$ref".to_string(), Value::String(reference));
            }
            if object.get("type").and_then(Value::as_str) == Some("file") {
                object.insert("type".to_string(), json!("string"));
                object.insert("format".to_string(), json!("binary"));
            }
            if object.get("discriminator").is_some_and(Value::is_string) {
                object.remove("discriminator");
            }
            object.values_mut().for_each(rewrite_swagger_schemas);
        }
        Value::Array(items) => items.iter_mut().for_each(rewrite_swagger_schemas),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_version() {
        assert_eq!(
            detect_version(&json!({"swagger": "2.0"})).unwrap(),
            SpecVersion::Swagger2
        );
        assert_eq!(
            detect_version(&json!({"openapi": "3.0.1"})).unwrap(),
            SpecVersion::OpenApi30
        );
        assert_eq!(
            detect_version(&json!({"openapi": "3.1.0"})).unwrap(),
            SpecVersion::OpenApi31
        );
        assert!(detect_version(&json!({"openapi": "4.0.0"})).is_err());
        assert!(detect_version(&json!({"info": {}})).is_err());
    }

    #[test]
    fn test_31_type_arrays_reduced() {
        let doc = json!({
            "openapi": "3.1.0",
            "info": {"title": "t", "version": "1"},
            "components": {"schemas": {"Pet": {
                "type": ["object", "null"],
                "properties": {
                    "age": {"type": ["null", "integer"], "exclusiveMinimum": 0},
                    "tag": {"type": "string", "examples": ["dog", "cat"]}
                }
            }}}
        });

        let converted = to_openapi30(doc).unwrap();
        let pet = &converted["components"]["schemas"]["Pet"];
        assert_eq!(converted["openapi"], "3.0.3");
        assert_eq!(pet["type"], "object");
        assert_eq!(pet["nullable"], true);
        assert_eq!(pet["properties"]["age"]["type"], "integer");
        assert_eq!(pet["properties"]["age"]["minimum"], 0);
        assert_eq!(pet["properties"]["age"]["exclusiveMinimum"], true);
        assert_eq!(pet["properties"]["tag"]["example"], "dog");
        assert_eq!(converted["paths"], json!({}));
    }

    #[test]
    fn test_swagger_server_from_host() {
        let doc = json!({
            "swagger": "2.0",
            "info": {"title": "t", "version": "1"},
            "host": "petstore.swagger.io",
            "basePath": "/v2",
            "schemes": ["https", "http"],
            "paths": {}
        });

        let converted = to_openapi30(doc).unwrap();
        assert_eq!(converted["servers"][0]["url"], "https://petstore.swagger.io/v2");
        assert!(converted.get("host").is_none());
    }

    #[test]
    fn test_swagger_relative_server_without_host() {
        let doc = json!({
            "swagger": "2.0",
            "info": {"title": "t", "version": "1"},
            "basePath": "/api",
            "paths": {}
        });

        let converted = to_openapi30(doc).unwrap();
        assert_eq!(converted["servers"][0]["url"], "/api");
    }

    #[test]
    fn test_swagger_body_parameter_becomes_request_body() {
        let doc = json!({
            "swagger": "2.0",
            "info": {"title": "t", "version": "1"},
            "consumes": ["application/json", "application/xml"],
            "paths": {"/pet": {"post": {
                "parameters": [
                    {"in": "body", "name": "body", "schema": {"$ref": "#/definitions/Pet"}},
                    {"in": "query", "name": "dryRun", "type": "boolean"}
                ],
                "responses": {"200": {"description": "ok", "schema": {"$ref": "#/definitions/Pet"}}}
            }}},
            "definitions": {"Pet": {"type": "object"}}
        });

        let converted = to_openapi30(doc).unwrap();
        let post = &converted["paths"]["/pet"]["post"];
        let content = post["requestBody"]["content"].as_object().unwrap();
        let media_types: Vec<&str> = content.keys().map(String::as_str).collect();
        assert_eq!(media_types, ["application/json", "application/xml"]);
        assert_eq!(
            content["application/json"]["schema"]["$ref"],
            "#/components/schemas/Pet"
        );
        assert_eq!(post["parameters"][0]["schema"]["type"], "boolean");
        assert!(post["parameters"][0].get("type").is_none());
        assert_eq!(
            post["responses"]["200"]["content"]["application/json"]["schema"]["$ref"],
            "#/components/schemas/Pet"
        );
        assert!(converted["components"]["schemas"]["Pet"].is_object());
    }

    #[test]
    fn test_swagger_form_data_becomes_form_body() {
        let doc = json!({
            "swagger": "2.0",
            "info": {"title": "t", "version": "1"},
            "paths": {"/pet/{petId}/uploadImage": {"post": {
                "consumes": ["multipart/form-data"],
                "parameters": [
                    {"in": "path", "name": "petId", "type": "integer", "required": true},
                    {"in": "formData", "name": "additionalMetadata", "type": "string"},
                    {"in": "formData", "name": "file", "type": "file", "required": true}
                ],
                "responses": {}
            }}}
        });

        let converted = to_openapi30(doc).unwrap();
        let post = &converted["paths"]["/pet/{petId}/uploadImage"]["post"];
        let schema = &post["requestBody"]["content"]["multipart/form-data"]["schema"];
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["file"]["format"], "binary");
        assert_eq!(schema["required"], json!(["file"]));
        assert_eq!(post["parameters"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_swagger_form_defaults_to_urlencoded() {
        let doc = json!({
            "swagger": "2.0",
            "info": {"title": "t", "version": "1"},
            "paths": {"/login": {"post": {
                "parameters": [{"in": "formData", "name": "user", "type": "string"}],
                "responses": {}
            }}}
        });

        let converted = to_openapi30(doc).unwrap();
        assert!(
            converted["paths"]["/login"]["post"]["requestBody"]["content"]
                .get(FORM_URLENCODED)
                .is_some()
        );
    }

    #[test]
    fn test_swagger_string_discriminator_dropped() {
        let doc = json!({
            "swagger": "2.0",
            "info": {"title": "t", "version": "1"},
            "paths": {},
            "definitions": {"Pet": {"type": "object", "discriminator": "petType"}}
        });

        let converted = to_openapi30(doc).unwrap();
        assert!(converted["components"]["schemas"]["Pet"].get("discriminator").is_none());
    }

    #[test]
    fn test_non_object_root_rejected() {
        assert!(to_openapi30(json!(["openapi"])).is_err());
    }
}
