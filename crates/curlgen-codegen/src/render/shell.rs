//! Bash dialect.
//!
//! Every path, query, header and cookie parameter becomes an empty shell
//! variable preceded by a comment. Form bodies add one variable per field.
//! The curl command uses backslash continuation, a double-quoted URL and
//! double-quoted headers.

use super::{
    Dialect, RenderRequest, is_binary_media_type, is_form_media_type, labelled_lines,
    substitute_placeholders, variable_name,
};
use curlgen_core::{DEFAULT_CONTENT_TYPE, ScriptDialect};
use curlgen_openapi::{ParameterLocation, RequestBody};

const LOCATIONS: [ParameterLocation; 4] = [
    ParameterLocation::Path,
    ParameterLocation::Query,
    ParameterLocation::Header,
    ParameterLocation::Cookie,
];
const BINARY_PLACEHOLDER: &str = "  --data-binary '@filename'";

/// Shell (bash) renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct Shell;

impl Dialect for Shell {
    fn extension(&self) -> &'static str {
        ScriptDialect::Shell.extension()
    }

    fn continuation(&self) -> &'static str {
        " \\"
    }

    fn header(&self, name: &str, value: &str) -> String {
        format!("  -H \"{}\"", double_quoted(&format!("{name}: {value}")))
    }

    /// First declared body media type, else `application/json`.
    ///
    /// The configured preference is not consulted.
    fn content_type(&self, request: &RenderRequest<'_>) -> String {
        request
            .operation
            .request_body
            .as_ref()
            .and_then(RequestBody::first_media_type)
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string()
    }

    fn render_summary(&self, request: &RenderRequest<'_>) -> Vec<String> {
        let operation = request.operation;
        let mut lines = vec![
            "#".to_string(),
            format!("# Request: {} {}", request.verb(), request.path),
        ];
        lines.extend(labelled_lines("# ", "Summary", operation.summary.as_deref()));
        lines.extend(labelled_lines("# ", "Description", operation.description.as_deref()));
        lines.push("#".to_string());
        lines
    }

    fn render_parameters(&self, request: &RenderRequest<'_>) -> Vec<String> {
        let mut declarations = Vec::new();

        for parameter in request.parameters_in(&LOCATIONS) {
            match parameter
                .description
                .as_deref()
                .map(str::trim)
                .filter(|d| !d.is_empty())
            {
                Some(description) => {
                    declarations.extend(description.lines().map(|line| format!("# {line}")));
                }
                None => declarations.push(format!(
                    "# {} parameter: {}",
                    parameter.location, parameter.name
                )),
            }
            declarations.push(format!("{}=\"\"", variable_name(&parameter.name)));
        }

        let media_type = self.content_type(request);
        declarations.extend(
            form_fields(request, &media_type)
                .into_iter()
                .map(|field| format!("{}=\"\"", variable_name(field))),
        );

        if declarations.is_empty() {
            return vec![String::new()];
        }

        let mut lines = Vec::with_capacity(declarations.len() + 2);
        lines.push(String::new());
        lines.extend(declarations);
        lines.push(String::new());
        lines
    }

    fn render_url(&self, request: &RenderRequest<'_>) -> String {
        let route = substitute_placeholders(request.path, |var| format!("${{{var}}}"));
        let query = request
            .parameters_in(&[ParameterLocation::Query])
            .map(|p| format!("{}=${{{}}}", p.name, variable_name(&p.name)))
            .collect::<Vec<_>>()
            .join("&");
        let query = if query.is_empty() {
            query
        } else {
            format!("?{query}")
        };

        format!(
            "curl -X {} \"{}{route}{query}\"",
            request.verb(),
            request.base_url
        )
    }

    fn render_body(&self, request: &RenderRequest<'_>) -> Vec<String> {
        if request.operation.request_body.is_none() {
            return Vec::new();
        }

        let media_type = self.content_type(request);
        if is_form_media_type(&media_type) {
            form_fields(request, &media_type)
                .into_iter()
                .map(|field| format!("  -F \"{field}=${{{}}}\"", variable_name(field)))
                .collect()
        } else if is_binary_media_type(&media_type) {
            vec![BINARY_PLACEHOLDER.to_string()]
        } else {
            request
                .sample_for(&media_type)
                .map(|json| vec![format!("  -d '{}'", json.replace('\'', r"'\''"))])
                .unwrap_or_default()
        }
    }
}

/// Property names of a form body schema; empty for non-form media types.
fn form_fields<'r>(request: &RenderRequest<'r>, media_type: &str) -> Vec<&'r str> {
    if !is_form_media_type(media_type) {
        return Vec::new();
    }

    let operation = request.operation;
    let schemas = request.schemas;
    operation
        .request_body
        .as_ref()
        .and_then(|body| body.schema_for(media_type))
        .and_then(|id| schemas.get(id))
        .map(|schema| schema.properties.keys().map(String::as_str).collect())
        .unwrap_or_default()
}

// Characters bash still expands inside double quotes.
fn double_quoted(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '\\' | '"' | '$' | '`') {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted
}
