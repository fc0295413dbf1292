//! Script set assembly.
//!
//! Walks a document in order, names each operation, renders it through the
//! configured dialect and collects the results. The base URL and the
//! sample clock are fixed once per assembler, so repeated runs over the
//! same document produce identical output.
//!
//! # Examples
//!
//! ```
//! use curlgen_codegen::ScriptSetAssembler;
//! use curlgen_core::{GeneratorSettings, ScriptDialect};
//! use curlgen_openapi::{ApiDocument, HttpMethod, Operation, PathItem};
//!
//! let mut document = ApiDocument::new();
//! document.servers.push("https://api.example.com".to_string());
//! let mut pets = PathItem::new("/pets");
//! pets.operations.push(Operation::new(HttpMethod::Get).with_id("listPets"));
//! document.paths.push(pets);
//!
//! let settings = GeneratorSettings::builder().dialect(ScriptDialect::Shell).build();
//! let scripts = ScriptSetAssembler::new(settings).assemble(&document);
//!
//! assert_eq!(scripts.scripts[0].filename, "GetListPets.sh");
//! ```

use crate::naming::{capitalize_first, resolve_operation_name};
use crate::render::{RenderRequest, dialect_for, render_script};
use crate::sample::SampleSynthesizer;
use crate::types::{GeneratedScript, GeneratedScripts};
use chrono::{DateTime, Utc};
use curlgen_core::{GeneratorSettings, OutputMode};
use curlgen_openapi::ApiDocument;
use url::Url;

/// File stem used in combined-file mode.
pub const COMBINED_FILE_STEM: &str = "Requests";

/// Produces the script set for a document.
#[derive(Debug, Clone)]
pub struct ScriptSetAssembler {
    settings: GeneratorSettings,
    samples: SampleSynthesizer,
}

impl ScriptSetAssembler {
    /// Creates an assembler whose date samples use the current time.
    #[must_use]
    pub fn new(settings: GeneratorSettings) -> Self {
        Self::with_clock(settings, Utc::now())
    }

    /// Creates an assembler whose date samples use `now`.
    #[must_use]
    pub const fn with_clock(settings: GeneratorSettings, now: DateTime<Utc>) -> Self {
        Self {
            settings,
            samples: SampleSynthesizer::at(now),
        }
    }

    /// Returns the settings in use.
    #[must_use]
    pub const fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Generates one script per operation, or one combined script.
    ///
    /// Duplicate names are not resolved here; check with
    /// [`crate::naming::has_duplicates`] first.
    #[must_use]
    pub fn assemble(&self, document: &ApiDocument) -> GeneratedScripts {
        let dialect = dialect_for(self.settings.dialect);
        let base_url = compute_base_url(&self.settings, document);

        tracing::info!(
            dialect = %self.settings.dialect,
            mode = self.settings.output_mode.as_str(),
            base_url = %base_url,
            operations = document.operation_count(),
            "generating request scripts"
        );

        let mut scripts = GeneratedScripts::new();
        for (path, operation) in document.operations() {
            let name = resolve_operation_name(path, operation).into_inner();
            let stem = capitalize_first(&name).unwrap_or(name);

            let request = RenderRequest {
                settings: &self.settings,
                base_url: &base_url,
                path,
                operation,
                schemas: &document.schemas,
                samples: &self.samples,
            };
            let filename = format!("{stem}.{}", dialect.extension());
            tracing::debug!(path, verb = request.verb(), filename = %filename, "rendering operation");

            scripts.add(GeneratedScript {
                content: render_script(dialect, &request),
                filename,
            });
        }

        if self.settings.output_mode == OutputMode::Combined {
            let content = scripts
                .iter()
                .map(|script| script.content.as_str())
                .collect::<Vec<_>>()
                .join("\n");
            let mut combined = GeneratedScripts::new();
            combined.add(GeneratedScript {
                filename: format!("{COMBINED_FILE_STEM}.{}", dialect.extension()),
                content,
            });
            scripts = combined;
        }

        tracing::info!(files = scripts.len(), "request scripts generated");
        scripts
    }
}

/// Generates the script set for `document` with `settings`.
#[must_use]
pub fn assemble(settings: &GeneratorSettings, document: &ApiDocument) -> GeneratedScripts {
    ScriptSetAssembler::new(settings.clone()).assemble(document)
}

/// Computes the base URL prepended to every path.
///
/// The configured base URL is concatenated with the first server URL. When
/// the result is not absolute and the document came from an `http(s)`
/// location, that location's origin is prepended. A trailing `/` is
/// removed so paths join cleanly.
///
/// # Examples
///
/// ```
/// use curlgen_codegen::compute_base_url;
/// use curlgen_core::GeneratorSettings;
/// use curlgen_openapi::ApiDocument;
///
/// let mut document = ApiDocument::new();
/// document.servers.push("/api/v3".to_string());
/// document.source_location = Some("https://petstore3.swagger.io/api/v3/openapi.json".to_string());
///
/// let base = compute_base_url(&GeneratorSettings::default(), &document);
/// assert_eq!(base, "https://petstore3.swagger.io/api/v3");
/// ```
#[must_use]
pub fn compute_base_url(settings: &GeneratorSettings, document: &ApiDocument) -> String {
    let mut base = format!(
        "{}{}",
        settings.base_url.as_deref().unwrap_or_default(),
        document.first_server().unwrap_or_default()
    );

    if Url::parse(&base).is_err() {
        let source = settings
            .source_location
            .as_deref()
            .or(document.source_location.as_deref())
            .filter(|source| is_network_location(source));

        if let Some(source) = source {
            match Url::parse(source) {
                Ok(url) if url.origin().is_tuple() => {
                    base = format!("{}{base}", url.origin().ascii_serialization());
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(source, error = %err, "source location is not a valid URL");
                }
            }
        }
    }

    if base.ends_with('/') {
        base.pop();
    }
    base
}

fn is_network_location(source: &str) -> bool {
    source
        .get(..4)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("http"))
}
