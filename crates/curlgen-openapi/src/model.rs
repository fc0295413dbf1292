//! Document model consumed by the script synthesis engine.
//!
//! The model is a flattened, reference-free view of an API description:
//! paths and operations keep document order, and every schema lives in a
//! [`SchemaArena`] addressed by [`SchemaId`]. References in the source
//! document become shared ids, so recursive schemas are representable
//! without reference counting.
//!
//! # Examples
//!
//! ```
//! use curlgen_openapi::{ApiDocument, HttpMethod, Operation, PathItem, Schema, SchemaKind};
//!
//! let mut document = ApiDocument::new();
//! let name = document.schemas.push(Schema::of(SchemaKind::String));
//! let pet = document
//!     .schemas
//!     .push(Schema::of(SchemaKind::Object).with_property("name", name));
//!
//! let mut path = PathItem::new("/pets");
//! path.operations
//!     .push(Operation::new(HttpMethod::Post).with_json_body(pet));
//! document.paths.push(path);
//!
//! assert_eq!(document.operation_count(), 1);
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// HTTP verb bound to a path.
///
/// Variant order is the fallback order for verbs a document does not list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    /// GET
    Get,
    /// PUT
    Put,
    /// POST
    Post,
    /// DELETE
    Delete,
    /// OPTIONS
    Options,
    /// HEAD
    Head,
    /// PATCH
    Patch,
    /// TRACE
    Trace,
}

impl HttpMethod {
    /// All verbs in fallback order.
    pub const ALL: [Self; 8] = [
        Self::Get,
        Self::Put,
        Self::Post,
        Self::Delete,
        Self::Options,
        Self::Head,
        Self::Patch,
        Self::Trace,
    ];

    /// Lowercase verb as it appears in an API description.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Post => "post",
            Self::Delete => "delete",
            Self::Options => "options",
            Self::Head => "head",
            Self::Patch => "patch",
            Self::Trace => "trace",
        }
    }

    /// Uppercase verb as sent on the wire.
    #[must_use]
    pub const fn as_upper(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
            Self::Patch => "PATCH",
            Self::Trace => "TRACE",
        }
    }

    /// Verb with only the first letter capitalized, used in operation names.
    #[must_use]
    pub const fn capitalized(&self) -> &'static str {
        match self {
            Self::Get => "Get",
            Self::Put => "Put",
            Self::Post => "Post",
            Self::Delete => "Delete",
            Self::Options => "Options",
            Self::Head => "Head",
            Self::Patch => "Patch",
            Self::Trace => "Trace",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_upper())
    }
}

impl FromStr for HttpMethod {
    type Err = curlgen_core::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| curlgen_core::Error::InvalidArgument(format!("unknown HTTP verb: '{s}'")))
    }
}

/// Where a parameter is carried in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// `{name}` placeholder in the path template
    Path,
    /// Query string
    Query,
    /// Request header
    Header,
    /// Cookie
    Cookie,
}

impl ParameterLocation {
    /// Returns the location as written in an API description.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Header => "header",
            Self::Cookie => "cookie",
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Parameter name as declared
    pub name: String,
    /// Where the parameter is carried
    pub location: ParameterLocation,
    /// Human-readable description
    pub description: Option<String>,
}

impl Parameter {
    /// Creates a parameter without a description.
    #[must_use]
    pub fn new(name: impl Into<String>, location: ParameterLocation) -> Self {
        Self {
            name: name.into(),
            location,
            description: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Identity of a schema node within a [`SchemaArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(usize);

impl SchemaId {
    /// Returns the arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Schema type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaKind {
    /// JSON object
    Object,
    /// JSON array
    Array,
    /// String
    String,
    /// Integer number
    Integer,
    /// Floating-point number
    Number,
    /// Boolean
    Boolean,
}

impl SchemaKind {
    /// Parses a JSON Schema type name.
    #[must_use]
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "object" => Some(Self::Object),
            "array" => Some(Self::Array),
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            _ => None,
        }
    }
}

/// Schema node.
///
/// Children are arena ids. Two properties pointing at the same named
/// component share one id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    /// Declared type, if any
    pub kind: Option<SchemaKind>,
    /// Format qualifier (`date`, `date-time`, `email`, `uri`, ...)
    pub format: Option<String>,
    /// Object properties in declaration order
    pub properties: IndexMap<String, SchemaId>,
    /// Array item schema
    pub items: Option<SchemaId>,
    /// Literal example
    pub example: Option<serde_json::Value>,
}

impl Schema {
    /// Creates a schema of the given kind.
    #[must_use]
    pub fn of(kind: SchemaKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// Sets the format.
    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Appends a property.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, schema: SchemaId) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Sets the item schema.
    #[must_use]
    pub const fn with_items(mut self, items: SchemaId) -> Self {
        self.items = Some(items);
        self
    }

    /// Sets the literal example.
    #[must_use]
    pub fn with_example(mut self, example: serde_json::Value) -> Self {
        self.example = Some(example);
        self
    }

    /// Returns the declared kind, or the kind implied by the children when
    /// no type is declared (`properties` imply an object, `items` an array).
    #[must_use]
    pub fn effective_kind(&self) -> Option<SchemaKind> {
        self.kind.or_else(|| {
            if !self.properties.is_empty() {
                Some(SchemaKind::Object)
            } else if self.items.is_some() {
                Some(SchemaKind::Array)
            } else {
                None
            }
        })
    }
}

/// Owning storage for all schema nodes of one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaArena {
    nodes: Vec<Schema>,
}

impl SchemaArena {
    /// Creates an empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Stores a schema and returns its id.
    pub fn push(&mut self, schema: Schema) -> SchemaId {
        self.nodes.push(schema);
        SchemaId(self.nodes.len() - 1)
    }

    /// Reserves a slot to be filled later with [`SchemaArena::set`].
    ///
    /// Used for named schemas so that references encountered while the
    /// schema is still being converted resolve to the same id.
    pub fn reserve(&mut self) -> SchemaId {
        self.push(Schema::default())
    }

    /// Replaces the schema stored at `id`.
    ///
    /// Ids not issued by this arena are ignored.
    pub fn set(&mut self, id: SchemaId, schema: Schema) {
        if let Some(slot) = self.nodes.get_mut(id.0) {
            *slot = schema;
        }
    }

    /// Returns the schema stored at `id`.
    #[must_use]
    pub fn get(&self, id: SchemaId) -> Option<&Schema> {
        self.nodes.get(id.0)
    }

    /// Returns the number of stored schemas.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the arena holds no schemas.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Request body keyed by media type, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestBody {
    /// Media type to schema; a media type may declare no schema
    pub content: IndexMap<String, Option<SchemaId>>,
}

impl RequestBody {
    /// Creates a body with one media type.
    #[must_use]
    pub fn single(media_type: impl Into<String>, schema: Option<SchemaId>) -> Self {
        let mut content = IndexMap::new();
        content.insert(media_type.into(), schema);
        Self { content }
    }

    /// Returns the first declared media type.
    #[must_use]
    pub fn first_media_type(&self) -> Option<&str> {
        self.content.keys().next().map(String::as_str)
    }

    /// Returns the first media type containing `preferred` as a substring.
    #[must_use]
    pub fn find_media_type(&self, preferred: &str) -> Option<&str> {
        self.content
            .keys()
            .find(|media_type| media_type.contains(preferred))
            .map(String::as_str)
    }

    /// Returns the schema declared for `media_type`.
    #[must_use]
    pub fn schema_for(&self, media_type: &str) -> Option<SchemaId> {
        self.content.get(media_type).copied().flatten()
    }
}

/// One HTTP verb bound to one path.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    /// HTTP verb
    pub method: HttpMethod,
    /// `operationId`
    pub operation_id: Option<String>,
    /// Short summary
    pub summary: Option<String>,
    /// Long description
    pub description: Option<String>,
    /// Parameters in declaration order
    pub parameters: Vec<Parameter>,
    /// Request body
    pub request_body: Option<RequestBody>,
}

impl Operation {
    /// Creates an operation with no metadata.
    #[must_use]
    pub const fn new(method: HttpMethod) -> Self {
        Self {
            method,
            operation_id: None,
            summary: None,
            description: None,
            parameters: Vec::new(),
            request_body: None,
        }
    }

    /// Sets the `operationId`.
    #[must_use]
    pub fn with_id(mut self, operation_id: impl Into<String>) -> Self {
        self.operation_id = Some(operation_id.into());
        self
    }

    /// Sets the summary.
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends a parameter.
    #[must_use]
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.request_body = Some(body);
        self
    }

    /// Sets an `application/json` request body.
    #[must_use]
    pub fn with_json_body(self, schema: SchemaId) -> Self {
        self.with_body(RequestBody::single("application/json", Some(schema)))
    }
}

/// Path template and the operations bound to it.
#[derive(Debug, Clone, PartialEq)]
pub struct PathItem {
    /// Raw path template, e.g. `/pets/{petId}`
    pub path: String,
    /// Operations in declared order
    pub operations: Vec<Operation>,
}

impl PathItem {
    /// Creates a path item without operations.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            operations: Vec::new(),
        }
    }
}

/// Parsed API description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiDocument {
    /// Location the document was loaded from
    pub source_location: Option<String>,
    /// Server URLs in declaration order
    pub servers: Vec<String>,
    /// Path items in document order
    pub paths: Vec<PathItem>,
    /// Every schema node referenced by the document
    pub schemas: SchemaArena,
    /// Number of named component schemas
    pub component_schema_count: usize,
}

impl ApiDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the first declared server URL.
    #[must_use]
    pub fn first_server(&self) -> Option<&str> {
        self.servers.first().map(String::as_str)
    }

    /// Iterates `(path, operation)` pairs in document order.
    pub fn operations(&self) -> impl Iterator<Item = (&str, &Operation)> {
        self.paths.iter().flat_map(|item| {
            item.operations
                .iter()
                .map(move |operation| (item.path.as_str(), operation))
        })
    }

    /// Returns the total number of operations.
    #[must_use]
    pub fn operation_count(&self) -> usize {
        self.paths.iter().map(|item| item.operations.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_method_forms() {
        assert_eq!(HttpMethod::Delete.as_str(), "delete");
        assert_eq!(HttpMethod::Delete.as_upper(), "DELETE");
        assert_eq!(HttpMethod::Delete.capitalized(), "Delete");
        assert_eq!("PATCH".parse::<HttpMethod>().unwrap(), HttpMethod::Patch);
        assert!("connect".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_arena_reserve_then_set() {
        let mut arena = SchemaArena::new();
        let id = arena.reserve();
        assert_eq!(arena.get(id), Some(&Schema::default()));

        arena.set(id, Schema::of(SchemaKind::Boolean));
        assert_eq!(arena.get(id).and_then(|s| s.kind), Some(SchemaKind::Boolean));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_effective_kind_inference() {
        let mut arena = SchemaArena::new();
        let leaf = arena.push(Schema::of(SchemaKind::String));

        assert_eq!(
            Schema::default().with_property("a", leaf).effective_kind(),
            Some(SchemaKind::Object)
        );
        assert_eq!(
            Schema::default().with_items(leaf).effective_kind(),
            Some(SchemaKind::Array)
        );
        assert_eq!(Schema::default().effective_kind(), None);
        assert_eq!(
            Schema::of(SchemaKind::String).with_items(leaf).effective_kind(),
            Some(SchemaKind::String)
        );
    }

    #[test]
    fn test_request_body_media_lookup() {
        let mut body = RequestBody::single("application/xml", None);
        body.content
            .insert("application/json; charset=utf-8".to_string(), None);

        assert_eq!(body.first_media_type(), Some("application/xml"));
        assert_eq!(
            body.find_media_type("application/json"),
            Some("application/json; charset=utf-8")
        );
        assert_eq!(body.find_media_type("text/plain"), None);
    }

    #[test]
    fn test_document_operation_order() {
        let mut document = ApiDocument::new();
        let mut pets = PathItem::new("/pets");
        pets.operations.push(Operation::new(HttpMethod::Get));
        pets.operations.push(Operation::new(HttpMethod::Post));
        let mut pet = PathItem::new("/pets/{id}");
        pet.operations.push(Operation::new(HttpMethod::Delete));
        document.paths.push(pets);
        document.paths.push(pet);

        let visited: Vec<_> = document
            .operations()
            .map(|(path, op)| format!("{} {path}", op.method))
            .collect();
        assert_eq!(visited, ["GET /pets", "POST /pets", "DELETE /pets/{id}"]);
        assert_eq!(document.operation_count(), 3);
    }
}
