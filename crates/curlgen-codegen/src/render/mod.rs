//! Request script rendering.
//!
//! A [`Dialect`] turns one operation into script text by producing ordered
//! line fragments for each section (summary, parameters, URL, headers,
//! body). [`render_script`] owns the assembly: it places line continuation
//! markers between the fragments of the curl command, so the last fragment
//! never carries one regardless of which sections were present.
//!
//! # Examples
//!
//! ```
//! use curlgen_codegen::SampleSynthesizer;
//! use curlgen_codegen::render::{RenderRequest, Shell, render_script};
//! use curlgen_core::GeneratorSettings;
//! use curlgen_openapi::{HttpMethod, Operation, SchemaArena};
//!
//! let settings = GeneratorSettings::default();
//! let operation = Operation::new(HttpMethod::Get);
//! let schemas = SchemaArena::new();
//! let samples = SampleSynthesizer::new();
//! let request = RenderRequest {
//!     settings: &settings,
//!     base_url: "https://api.example.com",
//!     path: "/health",
//!     operation: &operation,
//!     schemas: &schemas,
//!     samples: &samples,
//! };
//!
//! let script = render_script(&Shell, &request);
//! assert!(script.ends_with("  -H \"Content-Type: application/json\"\n"));
//! ```

mod interactive;
mod shell;

pub use interactive::Interactive;
pub use shell::Shell;

use crate::sample::SampleSynthesizer;
use curlgen_core::{GeneratorSettings, ScriptDialect};
use curlgen_openapi::{Operation, Parameter, ParameterLocation, SchemaArena};

/// Everything a dialect needs to render one operation.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    /// Generation settings
    pub settings: &'a GeneratorSettings,
    /// Base URL computed once per run
    pub base_url: &'a str,
    /// Raw path template
    pub path: &'a str,
    /// Operation to render
    pub operation: &'a Operation,
    /// Schema storage of the document
    pub schemas: &'a SchemaArena,
    /// Sample payload source
    pub samples: &'a SampleSynthesizer,
}

impl RenderRequest<'_> {
    /// Uppercase HTTP verb.
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        self.operation.method.as_upper()
    }

    /// Parameters carried in one of `locations`, in declared order.
    pub fn parameters_in<'s>(
        &'s self,
        locations: &'s [ParameterLocation],
    ) -> impl Iterator<Item = &'s Parameter> + 's {
        self.operation
            .parameters
            .iter()
            .filter(move |parameter| locations.contains(&parameter.location))
    }

    /// Pretty-printed sample payload for the schema declared under `media_type`.
    ///
    /// Returns `None` when the body declares no schema for it.
    #[must_use]
    pub fn sample_for(&self, media_type: &str) -> Option<String> {
        let schema = self.operation.request_body.as_ref()?.schema_for(media_type)?;
        Some(self.samples.sample_json(self.schemas, Some(schema)))
    }
}

/// One script output syntax.
///
/// Section renderers return line fragments without continuation markers.
/// The curl command is the URL line followed by the header and body
/// fragments; [`render_script`] joins them.
pub trait Dialect {
    /// File extension without the dot.
    fn extension(&self) -> &'static str;

    /// Marker appended to every command line that is continued.
    fn continuation(&self) -> &'static str;

    /// One `-H` header fragment.
    fn header(&self, name: &str, value: &str) -> String;

    /// Media type announced in the `Accept` and `Content-Type` headers.
    fn content_type(&self, request: &RenderRequest<'_>) -> String;

    /// Comment block naming the request.
    fn render_summary(&self, request: &RenderRequest<'_>) -> Vec<String>;

    /// Parameter declarations, including surrounding blank lines.
    fn render_parameters(&self, request: &RenderRequest<'_>) -> Vec<String>;

    /// The `curl -X VERB url` line.
    fn render_url(&self, request: &RenderRequest<'_>) -> String;

    /// `Accept`, `Content-Type`, then `Authorization` when configured.
    fn render_headers(&self, request: &RenderRequest<'_>) -> Vec<String> {
        let content_type = self.content_type(request);
        let mut headers = vec![
            self.header("Accept", &content_type),
            self.header("Content-Type", &content_type),
        ];
        if let Some(authorization) = request.settings.authorization() {
            headers.push(self.header("Authorization", authorization));
        }
        headers
    }

    /// Body attachment fragments; empty when nothing is attached.
    fn render_body(&self, request: &RenderRequest<'_>) -> Vec<String>;
}

/// Returns the renderer for `dialect`.
#[must_use]
pub fn dialect_for(dialect: ScriptDialect) -> &'static dyn Dialect {
    match dialect {
        ScriptDialect::Interactive => &Interactive,
        ScriptDialect::Shell => &Shell,
    }
}

/// Renders one operation into script text ending with a newline.
#[must_use]
pub fn render_script<D: Dialect + ?Sized>(dialect: &D, request: &RenderRequest<'_>) -> String {
    let mut lines = dialect.render_summary(request);
    lines.extend(dialect.render_parameters(request));

    let mut command = vec![dialect.render_url(request)];
    command.extend(dialect.render_headers(request));
    command.extend(dialect.render_body(request));

    let last = command.len() - 1;
    lines.extend(command.into_iter().enumerate().map(|(index, fragment)| {
        if index < last {
            format!("{fragment}{}", dialect.continuation())
        } else {
            fragment
        }
    }));

    let mut script = lines.join("\n");
    script.push('\n');
    script
}

/// Script variable name for a parameter or form field.
///
/// Characters outside `[A-Za-z0-9_]` become `_`; a leading digit gets a
/// `_` prefix.
#[must_use]
pub fn variable_name(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if sanitized.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{sanitized}")
    } else {
        sanitized
    }
}

/// Returns `true` if the path template contains a `{name}` placeholder.
#[must_use]
pub fn has_placeholders(path: &str) -> bool {
    path.find('{')
        .is_some_and(|open| path[open..].contains('}'))
}

/// Rewrites every `{name}` placeholder with `reference(variable_name(name))`.
///
/// An unmatched `{` is copied verbatim.
#[must_use]
pub fn substitute_placeholders(path: &str, reference: impl Fn(&str) -> String) -> String {
    let mut result = String::with_capacity(path.len());
    let mut rest = path;

    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        result.push_str(&rest[..open]);
        result.push_str(&reference(&variable_name(&rest[open + 1..open + close])));
        rest = &rest[open + close + 1..];
    }

    result.push_str(rest);
    result
}

/// Breaks up `#>` so document text cannot close a `<# ... #>` block.
pub(crate) fn comment_text(text: &str) -> String {
    text.replace("#>", "# >")
}

/// Comment lines for a labelled text, one per line of `text`.
///
/// Blank text yields nothing.
pub(crate) fn labelled_lines(lead: &str, label: &str, text: Option<&str>) -> Vec<String> {
    let Some(text) = text.filter(|text| !text.trim().is_empty()) else {
        return Vec::new();
    };

    text.trim_end()
        .lines()
        .enumerate()
        .map(|(index, line)| {
            let line = comment_text(line);
            if index == 0 {
                format!("{lead}{label}: {line}")
            } else {
                format!("{lead}{line}")
            }
        })
        .collect()
}

/// `application/x-www-form-urlencoded` or `multipart/form-data`, parameters allowed.
#[must_use]
pub fn is_form_media_type(media_type: &str) -> bool {
    media_type.starts_with("application/x-www-form-urlencoded")
        || media_type.starts_with("multipart/form-data")
}

/// `application/octet-stream`, parameters allowed.
#[must_use]
pub fn is_binary_media_type(media_type: &str) -> bool {
    media_type.starts_with("application/octet-stream")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_name() {
        assert_eq!(variable_name("petId"), "petId");
        assert_eq!(variable_name("api-key"), "api_key");
        assert_eq!(variable_name("filter[name]"), "filter_name_");
        assert_eq!(variable_name("2fa"), "_2fa");
    }

    #[test]
    fn test_substitute_placeholders() {
        let shell = substitute_placeholders("/users/{user-id}/posts/{postId}", |v| {
            format!("${{{v}}}")
        });
        assert_eq!(shell, "/users/${user_id}/posts/${postId}");

        let interactive = substitute_placeholders("/pets/{petId}", |v| format!("${v}"));
        assert_eq!(interactive, "/pets/$petId");

        assert_eq!(substitute_placeholders("/broken/{id", |v| v.to_string()), "/broken/{id");
    }

    #[test]
    fn test_has_placeholders() {
        assert!(has_placeholders("/pets/{petId}"));
        assert!(!has_placeholders("/pets"));
        assert!(!has_placeholders("/pets/{"));
    }

    #[test]
    fn test_labelled_lines() {
        assert_eq!(
            labelled_lines("# ", "Summary", Some("Find pets")),
            ["# Summary: Find pets"]
        );
        assert_eq!(
            labelled_lines("# ", "Description", Some("first\nsecond\n")),
            ["# Description: first", "# second"]
        );
        assert!(labelled_lines("  ", "Summary", Some("  \t")).is_empty());
        assert!(labelled_lines("  ", "Summary", None).is_empty());
    }

    #[test]
    fn test_labelled_lines_cannot_close_block_comment() {
        assert_eq!(
            labelled_lines("  ", "Summary", Some("Returns <#>\nthen #>")),
            ["  Summary: Returns <# >", "  then # >"]
        );
        assert_eq!(comment_text("a #>#> b"), "a # ># > b");
    }

    #[test]
    fn test_media_type_classes() {
        assert!(is_form_media_type("multipart/form-data"));
        assert!(is_form_media_type("application/x-www-form-urlencoded; charset=utf-8"));
        assert!(!is_form_media_type("application/json"));
        assert!(is_binary_media_type("application/octet-stream"));
        assert!(!is_binary_media_type("image/png"));
    }
}
