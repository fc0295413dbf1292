//! PowerShell dialect.
//!
//! Path and query parameters become a typed, mandatory `param(...)` block.
//! The curl command uses backtick continuation and single-quoted header
//! and payload arguments.

use super::{
    Dialect, RenderRequest, comment_text, has_placeholders, labelled_lines,
    substitute_placeholders, variable_name,
};
use curlgen_core::ScriptDialect;
use curlgen_openapi::ParameterLocation;

const LOCATIONS: [ParameterLocation; 2] = [ParameterLocation::Path, ParameterLocation::Query];
const INDENT: &str = "   ";

/// Interactive (PowerShell) renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Interactive;

impl Dialect for Interactive {
    fn extension(&self) -> &'static str {
        ScriptDialect::Interactive.extension()
    }

    fn continuation(&self) -> &'static str {
        " `"
    }

    fn header(&self, name: &str, value: &str) -> String {
        format!("  -H '{}'", single_quoted(&format!("{name}: {value}")))
    }

    fn content_type(&self, request: &RenderRequest<'_>) -> String {
        request.settings.content_type.clone()
    }

    fn render_summary(&self, request: &RenderRequest<'_>) -> Vec<String> {
        let operation = request.operation;
        let mut lines = vec![
            "<#".to_string(),
            format!("  Request: {} {}", request.verb(), request.path),
        ];
        lines.extend(labelled_lines("  ", "Summary", operation.summary.as_deref()));
        lines.extend(labelled_lines("  ", "Description", operation.description.as_deref()));
        lines.push("#>".to_string());
        lines
    }

    fn render_parameters(&self, request: &RenderRequest<'_>) -> Vec<String> {
        let parameters: Vec<_> = request.parameters_in(&LOCATIONS).collect();
        if parameters.is_empty() {
            return vec![String::new()];
        }

        let mut lines = vec!["param(".to_string()];
        for (index, parameter) in parameters.iter().enumerate() {
            if index > 0 {
                lines.push(String::new());
            }
            if let Some(description) = parameter
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
            {
                lines.push(format!("{INDENT}<# {} #>", comment_text(description)));
            }
            lines.push(format!("{INDENT}[Parameter(Mandatory=$True)]"));

            let separator = if index + 1 < parameters.len() { "," } else { "" };
            lines.push(format!(
                "{INDENT}[String] ${}{separator}",
                variable_name(&parameter.name)
            ));
        }
        lines.push(")".to_string());
        lines.push(String::new());
        lines
    }

    fn render_url(&self, request: &RenderRequest<'_>) -> String {
        let route = if has_placeholders(request.path) {
            substitute_placeholders(request.path, |var| format!("${var}"))
        } else {
            let query = request
                .parameters_in(&LOCATIONS)
                .map(|p| format!("{}=${}", p.name, variable_name(&p.name)))
                .collect::<Vec<_>>()
                .join("&");
            if query.is_empty() {
                request.path.to_string()
            } else {
                format!("{}?{query}", request.path)
            }
        };

        format!("curl -X {} {}{route}", request.verb(), request.base_url)
    }

    fn render_body(&self, request: &RenderRequest<'_>) -> Vec<String> {
        let Some(body) = request.operation.request_body.as_ref() else {
            return Vec::new();
        };
        let Some(media_type) = body.find_media_type(&request.settings.content_type) else {
            tracing::debug!(
                path = request.path,
                preferred = %request.settings.content_type,
                "no matching media type, body omitted"
            );
            return Vec::new();
        };

        request
            .sample_for(media_type)
            .map(|json| vec![format!("  -d '{}'", single_quoted(&json))])
            .unwrap_or_default()
    }
}

// Inside a single-quoted PowerShell string a quote is written twice.
fn single_quoted(text: &str) -> String {
    text.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render_script;
    use crate::sample::SampleSynthesizer;
    use chrono::{TimeZone, Utc};
    use curlgen_core::GeneratorSettings;
    use curlgen_openapi::{
        HttpMethod, Operation, Parameter, RequestBody, Schema, SchemaArena, SchemaKind,
    };
    use serde_json::json;

    const BASE: &str = "https://api.example.com";

    fn render(settings: &GeneratorSettings, path: &str, operation: &Operation, schemas: &SchemaArena) -> String {
        let samples = SampleSynthesizer::at(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
        let request = RenderRequest {
            settings,
            base_url: BASE,
            path,
            operation,
            schemas,
            samples: &samples,
        };
        render_script(&Interactive, &request)
    }

    #[test]
    fn test_no_parameters_no_body() {
        let operation = Operation::new(HttpMethod::Get)
            .with_id("listPets")
            .with_summary("List pets")
            .with_description("   ");

        let script = render(&GeneratorSettings::default(), "/pets", &operation, &SchemaArena::new());

        assert_eq!(
            script,
            "<#\n\
             \x20 Request: GET /pets\n\
             \x20 Summary: List pets\n\
             #>\n\
             \n\
             curl -X GET https://api.example.com/pets `\n\
             \x20 -H 'Accept: application/json' `\n\
             \x20 -H 'Content-Type: application/json'\n"
        );
    }

    #[test]
    fn test_path_parameters_substituted_in_place() {
        let settings = GeneratorSettings::builder()
            .authorization_header("Bearer token")
            .build();
        let operation = Operation::new(HttpMethod::Delete)
            .with_parameter(
                Parameter::new("petId", ParameterLocation::Path).with_description("ID of pet"),
            )
            .with_parameter(Parameter::new("verbose", ParameterLocation::Query))
            .with_parameter(Parameter::new("X-Trace", ParameterLocation::Header));

        let script = render(&settings, "/pets/{petId}", &operation, &SchemaArena::new());

        assert_eq!(
            script,
            "<#\n\
             \x20 Request: DELETE /pets/{petId}\n\
             #>\n\
             param(\n\
             \x20  <# ID of pet #>\n\
             \x20  [Parameter(Mandatory=$True)]\n\
             \x20  [String] $petId,\n\
             \n\
             \x20  [Parameter(Mandatory=$True)]\n\
             \x20  [String] $verbose\n\
             )\n\
             \n\
             curl -X DELETE https://api.example.com/pets/$petId `\n\
             \x20 -H 'Accept: application/json' `\n\
             \x20 -H 'Content-Type: application/json' `\n\
             \x20 -H 'Authorization: Bearer token'\n"
        );
    }

    #[test]
    fn test_query_string_in_declared_order() {
        let operation = Operation::new(HttpMethod::Get)
            .with_parameter(Parameter::new("status", ParameterLocation::Query))
            .with_parameter(Parameter::new("page-size", ParameterLocation::Query))
            .with_parameter(Parameter::new("session", ParameterLocation::Cookie));

        let script = render(
            &GeneratorSettings::default(),
            "/pets/findByStatus",
            &operation,
            &SchemaArena::new(),
        );

        assert!(script.contains(
            "curl -X GET https://api.example.com/pets/findByStatus?status=$status&page-size=$page_size `\n"
        ));
        assert!(!script.contains("session"));
    }

    #[test]
    fn test_json_body_embedded_and_quotes_escaped() {
        let mut schemas = SchemaArena::new();
        let name = schemas.push(Schema::of(SchemaKind::String));
        let tag = schemas.push(Schema::of(SchemaKind::String).with_example(json!("it's")));
        let pet = schemas.push(
            Schema::of(SchemaKind::Object)
                .with_property("name", name)
                .with_property("tag", tag),
        );
        let operation = Operation::new(HttpMethod::Post).with_body(RequestBody::single(
            "application/json; charset=utf-8",
            Some(pet),
        ));

        let script = render(&GeneratorSettings::default(), "/pets", &operation, &schemas);

        assert!(script.ends_with(
            "  -H 'Content-Type: application/json' `\n\
             \x20 -d '{\n\
             \x20 \"name\": \"string\",\n\
             \x20 \"tag\": \"it''s\"\n\
             }'\n"
        ));
    }

    #[test]
    fn test_unmatched_media_type_omits_body() {
        let mut schemas = SchemaArena::new();
        let pet = schemas.push(Schema::of(SchemaKind::Object));
        let operation = Operation::new(HttpMethod::Put)
            .with_body(RequestBody::single("application/xml", Some(pet)));

        let script = render(&GeneratorSettings::default(), "/pets", &operation, &schemas);

        assert!(script.ends_with("  -H 'Content-Type: application/json'\n"));
        assert!(!script.contains("-d "));
    }

    #[test]
    fn test_form_media_type_not_special_cased() {
        let mut schemas = SchemaArena::new();
        let field = schemas.push(Schema::of(SchemaKind::String));
        let form = schemas.push(Schema::of(SchemaKind::Object).with_property("name", field));
        let settings = GeneratorSettings::builder()
            .content_type("application/x-www-form-urlencoded")
            .build();
        let operation = Operation::new(HttpMethod::Post).with_body(RequestBody::single(
            "application/x-www-form-urlencoded",
            Some(form),
        ));

        let script = render(&settings, "/pets", &operation, &schemas);

        assert!(script.contains("  -d '{\n  \"name\": \"string\"\n}'\n"));
        assert!(!script.contains("-F"));
    }

    #[test]
    fn test_media_type_without_schema_attaches_nothing() {
        let operation = Operation::new(HttpMethod::Post)
            .with_body(RequestBody::single("application/json", None));

        let script = render(&GeneratorSettings::default(), "/ping", &operation, &SchemaArena::new());

        assert!(script.ends_with("  -H 'Content-Type: application/json'\n"));
    }

    #[test]
    fn test_header_and_comment_text_escaped() {
        let settings = GeneratorSettings::builder()
            .authorization_header("Basic 'secret'")
            .build();
        let operation = Operation::new(HttpMethod::Get)
            .with_summary("Ends early #> here")
            .with_parameter(
                Parameter::new("petId", ParameterLocation::Path).with_description("Use <# or #>"),
            );

        let script = render(&settings, "/pets/{petId}", &operation, &SchemaArena::new());

        assert!(script.contains("  Summary: Ends early # > here\n#>\n"));
        assert!(script.contains("   <# Use <# or # > #>\n"));
        assert!(script.ends_with("  -H 'Authorization: Basic ''secret'''\n"));
        assert_eq!(script.matches("#>").count(), 2);
    }
}
