//! Sample payload synthesis.
//!
//! Turns a schema node into a representative JSON value: literal examples
//! win, objects and arrays recurse, primitives map to fixed placeholders.
//! Recursion tracks the schema ids on the current path, so a schema that
//! refers back to one of its ancestors terminates with an empty object or
//! array at the point of re-entry.
//!
//! # Examples
//!
//! ```
//! use curlgen_codegen::SampleSynthesizer;
//! use curlgen_openapi::{Schema, SchemaArena, SchemaKind};
//! use serde_json::json;
//!
//! let mut arena = SchemaArena::new();
//! let a = arena.push(Schema::of(SchemaKind::String));
//! let b = arena.push(Schema::of(SchemaKind::Integer));
//! let root = arena.push(Schema::default().with_property("a", a).with_property("b", b));
//!
//! let value = SampleSynthesizer::new().synthesize(&arena, root);
//! assert_eq!(value, json!({"a": "string", "b": 0}));
//! ```

use chrono::{DateTime, Utc};
use curlgen_openapi::{SchemaArena, SchemaId, SchemaKind};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Placeholder for `format: email`.
pub const SAMPLE_EMAIL: &str = "user@example.com";
/// Placeholder for `format: uri`.
pub const SAMPLE_URI: &str = "https://example.com";
const SAMPLE_STRING: &str = "string";
const SAMPLE_UNKNOWN: &str = "value";
const EMPTY_OBJECT_TEXT: &str = "{}";

/// Synthesizes sample values for schema nodes.
///
/// Date and date-time samples use the instant captured at construction,
/// so every sample produced by one synthesizer is consistent.
#[derive(Debug, Clone, Copy)]
pub struct SampleSynthesizer {
    now: DateTime<Utc>,
}

impl SampleSynthesizer {
    /// Creates a synthesizer using the current time.
    #[must_use]
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Creates a synthesizer pinned to `now`.
    #[must_use]
    pub const fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }

    /// Returns the instant used for date samples.
    #[must_use]
    pub const fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Synthesizes a sample value for the schema stored at `id`.
    #[must_use]
    pub fn synthesize(&self, arena: &SchemaArena, id: SchemaId) -> Value {
        let mut visiting = HashSet::new();
        self.visit(arena, id, &mut visiting)
    }

    /// Synthesizes a pretty-printed JSON sample.
    ///
    /// Returns `{}` when no schema is given or serialization fails.
    #[must_use]
    pub fn sample_json(&self, arena: &SchemaArena, id: Option<SchemaId>) -> String {
        let Some(id) = id else {
            return EMPTY_OBJECT_TEXT.to_string();
        };

        serde_json::to_string_pretty(&self.synthesize(arena, id)).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "sample serialization failed");
            EMPTY_OBJECT_TEXT.to_string()
        })
    }

    fn visit(&self, arena: &SchemaArena, id: SchemaId, visiting: &mut HashSet<SchemaId>) -> Value {
        let Some(schema) = arena.get(id) else {
            return Value::String(SAMPLE_UNKNOWN.to_string());
        };

        if let Some(example) = &schema.example {
            return example.clone();
        }

        let kind = schema.effective_kind();
        if !visiting.insert(id) {
            tracing::debug!(schema = id.index(), "recursive schema, stopping descent");
            return match kind {
                Some(SchemaKind::Array) => Value::Array(Vec::new()),
                _ => Value::Object(Map::new()),
            };
        }

        let value = match kind {
            Some(SchemaKind::Object) => Value::Object(
                schema
                    .properties
                    .iter()
                    .map(|(name, child)| (name.clone(), self.visit(arena, *child, visiting)))
                    .collect(),
            ),
            Some(SchemaKind::Array) => Value::Array(
                schema
                    .items
                    .map(|items| vec![self.visit(arena, items, visiting)])
                    .unwrap_or_default(),
            ),
            Some(SchemaKind::String) => Value::String(self.string_sample(schema.format.as_deref())),
            Some(SchemaKind::Integer) => Value::from(0),
            Some(SchemaKind::Number) => Value::from(0.0),
            Some(SchemaKind::Boolean) => Value::Bool(false),
            None => Value::String(SAMPLE_UNKNOWN.to_string()),
        };

        visiting.remove(&id);
        value
    }

    fn string_sample(&self, format: Option<&str>) -> String {
        match format {
            Some("date") => self.now.format("%Y-%m-%d").to_string(),
            Some("date-time") => self.now.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            Some("email") => SAMPLE_EMAIL.to_string(),
            Some("uri") => SAMPLE_URI.to_string(),
            _ => SAMPLE_STRING.to_string(),
        }
    }
}

impl Default for SampleSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}
