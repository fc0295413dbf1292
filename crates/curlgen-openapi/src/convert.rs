//! Lowering of a typed `openapiv3` document into the curlgen model.
//!
//! Named component schemas are converted once and shared by id; a slot is
//! reserved before a component is converted, so a reference back to a
//! component that is still being converted resolves to the same id and
//! recursive schemas form a cycle in the arena instead of recursing.

use crate::model::{
    ApiDocument, HttpMethod, Operation, Parameter, ParameterLocation, PathItem, RequestBody,
    Schema, SchemaArena, SchemaId, SchemaKind,
};
use indexmap::IndexMap;
use openapiv3::{
    AnySchema, IntegerFormat, NumberFormat, OpenAPI, ReferenceOr, StringFormat, Type,
    VariantOrUnknownOrEmpty,
};
use serde_json::Value;
use std::collections::HashMap;

const SCHEMA_PREFIX: &str = "#/components/schemas/";
const PARAMETER_PREFIX: &str = "#/components/parameters/";
const REQUEST_BODY_PREFIX: &str = "#/components/requestBodies/";

/// Verbs of each path item in the order the document declares them.
pub type DeclaredVerbs = HashMap<String, Vec<HttpMethod>>;

/// Reads the verb keys of every path item from a normalized document.
///
/// Keys that are not HTTP verbs (`parameters`, `summary`, extensions) are
/// skipped.
#[must_use]
pub fn declared_verbs(root: &Value) -> DeclaredVerbs {
    let Some(Value::Object(paths)) = root.get("paths") else {
        return DeclaredVerbs::new();
    };

    paths
        .iter()
        .filter_map(|(path, item)| {
            let Value::Object(item) = item else {
                return None;
            };
            let verbs = item
                .keys()
                .filter_map(|key| {
                    HttpMethod::ALL
                        .into_iter()
                        .find(|method| key == method.as_str())
                })
                .collect();
            Some((path.clone(), verbs))
        })
        .collect()
}

/// Converts a parsed document into the curlgen model.
///
/// Operations of a path item follow `declared`; verbs missing from it are
/// appended in [`HttpMethod::ALL`] order.
#[must_use]
pub fn lower_document(
    spec: &OpenAPI,
    declared: &DeclaredVerbs,
    source_location: Option<String>,
) -> ApiDocument {
    let mut lowering = Lowering::new(spec);
    let mut paths = Vec::with_capacity(spec.paths.paths.len());

    for (path, item) in &spec.paths.paths {
        let ReferenceOr::Item(item) = item else {
            tracing::warn!(path = %path, "skipping path item defined by reference");
            continue;
        };

        tracing::debug!(path = %path, "converting path item");
        let mut path_item = PathItem::new(path.clone());
        let order = declared.get(path).map_or(&[][..], Vec::as_slice);
        let remaining = HttpMethod::ALL
            .into_iter()
            .filter(|method| !order.contains(method));
        for method in order.iter().copied().chain(remaining) {
            if let Some(operation) = operation_for(item, method) {
                path_item
                    .operations
                    .push(lowering.operation(method, operation, &item.parameters));
            }
        }
        paths.push(path_item);
    }

    let component_schema_count = spec
        .components
        .as_ref()
        .map_or(0, |components| components.schemas.len());

    ApiDocument {
        source_location,
        servers: spec.servers.iter().map(|server| server.url.clone()).collect(),
        paths,
        schemas: lowering.arena,
        component_schema_count,
    }
}

const fn operation_for(item: &openapiv3::PathItem, method: HttpMethod) -> Option<&openapiv3::Operation> {
    match method {
        HttpMethod::Get => item.get.as_ref(),
        HttpMethod::Put => item.put.as_ref(),
        HttpMethod::Post => item.post.as_ref(),
        HttpMethod::Delete => item.delete.as_ref(),
        HttpMethod::Options => item.options.as_ref(),
        HttpMethod::Head => item.head.as_ref(),
        HttpMethod::Patch => item.patch.as_ref(),
        HttpMethod::Trace => item.trace.as_ref(),
    }
}

struct Lowering<'a> {
    spec: &'a OpenAPI,
    arena: SchemaArena,
    named: HashMap<String, SchemaId>,
}

impl<'a> Lowering<'a> {
    fn new(spec: &'a OpenAPI) -> Self {
        Self {
            spec,
            arena: SchemaArena::new(),
            named: HashMap::new(),
        }
    }

    fn operation(
        &mut self,
        method: HttpMethod,
        operation: &'a openapiv3::Operation,
        inherited: &'a [ReferenceOr<openapiv3::Parameter>],
    ) -> Operation {
        let own: Vec<Parameter> = operation
            .parameters
            .iter()
            .filter_map(|param| self.parameter(param))
            .collect();

        // Path-level parameters come first unless the operation redeclares them.
        let mut parameters: Vec<Parameter> = inherited
            .iter()
            .filter_map(|param| self.parameter(param))
            .filter(|param| {
                !own.iter()
                    .any(|o| o.name == param.name && o.location == param.location)
            })
            .collect();
        parameters.extend(own);

        let request_body = operation
            .request_body
            .as_ref()
            .and_then(|body| self.request_body(body));

        Operation {
            method,
            operation_id: operation.operation_id.clone(),
            summary: operation.summary.clone(),
            description: operation.description.clone(),
            parameters,
            request_body,
        }
    }

    fn parameter(&self, param: &'a ReferenceOr<openapiv3::Parameter>) -> Option<Parameter> {
        let param = match param {
            ReferenceOr::Item(param) => param,
            ReferenceOr::Reference { reference } => {
                let resolved = resolve_parameter(self.spec, reference);
                if resolved.is_none() {
                    tracing::warn!(reference = %reference, "unresolved parameter reference");
                }
                resolved?
            }
        };

        let location = match param {
            openapiv3::Parameter::Query { .. } => ParameterLocation::Query,
            openapiv3::Parameter::Header { .. } => ParameterLocation::Header,
            openapiv3::Parameter::Path { .. } => ParameterLocation::Path,
            openapiv3::Parameter::Cookie { .. } => ParameterLocation::Cookie,
        };
        let data = param.parameter_data_ref();

        Some(Parameter {
            name: data.name.clone(),
            location,
            description: data.description.clone(),
        })
    }

    fn request_body(
        &mut self,
        body: &'a ReferenceOr<openapiv3::RequestBody>,
    ) -> Option<RequestBody> {
        let body = match body {
            ReferenceOr::Item(body) => body,
            ReferenceOr::Reference { reference } => {
                let resolved = resolve_request_body(self.spec, reference);
                if resolved.is_none() {
                    tracing::warn!(reference = %reference, "unresolved request body reference");
                }
                resolved?
            }
        };

        let mut content = IndexMap::with_capacity(body.content.len());
        for (media_type, media) in &body.content {
            let schema = media.schema.as_ref().map(|schema| self.schema(schema));
            content.insert(media_type.clone(), schema);
        }
        Some(RequestBody { content })
    }

    fn schema(&mut self, schema: &'a ReferenceOr<openapiv3::Schema>) -> SchemaId {
        match schema {
            ReferenceOr::Item(schema) => self.inline(schema),
            ReferenceOr::Reference { reference } => self.named(reference),
        }
    }

    fn boxed_schema(&mut self, schema: &'a ReferenceOr<Box<openapiv3::Schema>>) -> SchemaId {
        match schema {
            ReferenceOr::Item(schema) => self.inline(schema),
            ReferenceOr::Reference { reference } => self.named(reference),
        }
    }

    fn inline(&mut self, schema: &'a openapiv3::Schema) -> SchemaId {
        let node = self.lower(schema);
        self.arena.push(node)
    }

    fn named(&mut self, reference: &'a str) -> SchemaId {
        if let Some(id) = self.named.get(reference) {
            return *id;
        }

        let id = self.arena.reserve();
        self.named.insert(reference.to_string(), id);

        let node = match resolve_schema(self.spec, reference) {
            Some(ReferenceOr::Item(schema)) => self.lower(schema),
            Some(ReferenceOr::Reference { reference: target }) => {
                let target = self.named(target);
                self.copy_of(target)
            }
            None => {
                tracing::warn!(reference = %reference, "unresolved schema reference");
                Schema::default()
            }
        };
        self.arena.set(id, node);
        id
    }

    fn copy_of(&self, id: SchemaId) -> Schema {
        self.arena.get(id).cloned().unwrap_or_default()
    }

    fn lower(&mut self, schema: &'a openapiv3::Schema) -> Schema {
        let mut node = match &schema.schema_kind {
            openapiv3::SchemaKind::Type(ty) => self.lower_type(ty),
            openapiv3::SchemaKind::AllOf { all_of } => self.merge_all(all_of),
            openapiv3::SchemaKind::OneOf {
                one_of: alternatives,
            }
            | openapiv3::SchemaKind::AnyOf {
                any_of: alternatives,
            } => alternatives.first().map_or_else(Schema::default, |first| {
                let id = self.schema(first);
                self.copy_of(id)
            }),
            openapiv3::SchemaKind::Not { .. } => Schema::default(),
            openapiv3::SchemaKind::Any(any) => self.lower_any(any),
        };

        if node.example.is_none() {
            node.example.clone_from(&schema.schema_data.example);
        }
        node
    }

    fn lower_type(&mut self, ty: &'a Type) -> Schema {
        match ty {
            Type::String(string) => Schema {
                format: format_name(&string.format, string_format_name),
                ..Schema::of(SchemaKind::String)
            },
            Type::Number(number) => Schema {
                format: format_name(&number.format, number_format_name),
                ..Schema::of(SchemaKind::Number)
            },
            Type::Integer(integer) => Schema {
                format: format_name(&integer.format, integer_format_name),
                ..Schema::of(SchemaKind::Integer)
            },
            Type::Boolean(_) => Schema::of(SchemaKind::Boolean),
            Type::Object(object) => {
                let mut node = Schema::of(SchemaKind::Object);
                for (name, property) in &object.properties {
                    let id = self.boxed_schema(property);
                    node.properties.insert(name.clone(), id);
                }
                node
            }
            Type::Array(array) => {
                let mut node = Schema::of(SchemaKind::Array);
                node.items = array.items.as_ref().map(|items| self.boxed_schema(items));
                node
            }
        }
    }

    fn lower_any(&mut self, any: &'a AnySchema) -> Schema {
        let mut node = Schema {
            kind: any.typ.as_deref().and_then(SchemaKind::from_type_name),
            format: any.format.clone(),
            ..Schema::default()
        };
        for (name, property) in &any.properties {
            let id = self.boxed_schema(property);
            node.properties.insert(name.clone(), id);
        }
        node.items = any.items.as_ref().map(|items| self.boxed_schema(items));
        node
    }

    fn merge_all(&mut self, parts: &'a [ReferenceOr<openapiv3::Schema>]) -> Schema {
        let mut merged = Schema::default();
        for part in parts {
            let id = self.schema(part);
            let Some(part) = self.arena.get(id) else {
                continue;
            };

            merged.kind = merged.kind.or_else(|| part.effective_kind());
            merged.items = merged.items.or(part.items);
            if merged.format.is_none() {
                merged.format.clone_from(&part.format);
            }
            if merged.example.is_none() {
                merged.example.clone_from(&part.example);
            }
            for (name, property) in &part.properties {
                merged.properties.entry(name.clone()).or_insert(*property);
            }
        }
        merged
    }
}

fn resolve_schema<'a>(
    spec: &'a OpenAPI,
    reference: &str,
) -> Option<&'a ReferenceOr<openapiv3::Schema>> {
    let name = reference.strip_prefix(SCHEMA_PREFIX)?;
    spec.components.as_ref()?.schemas.get(name)
}

fn resolve_parameter<'a>(spec: &'a OpenAPI, reference: &str) -> Option<&'a openapiv3::Parameter> {
    let name = reference.strip_prefix(PARAMETER_PREFIX)?;
    match spec.components.as_ref()?.parameters.get(name)? {
        ReferenceOr::Item(param) => Some(param),
        ReferenceOr::Reference { reference } => resolve_parameter(spec, reference),
    }
}

fn resolve_request_body<'a>(
    spec: &'a OpenAPI,
    reference: &str,
) -> Option<&'a openapiv3::RequestBody> {
    let name = reference.strip_prefix(REQUEST_BODY_PREFIX)?;
    match spec.components.as_ref()?.request_bodies.get(name)? {
        ReferenceOr::Item(body) => Some(body),
        ReferenceOr::Reference { reference } => resolve_request_body(spec, reference),
    }
}

fn format_name<T>(
    format: &VariantOrUnknownOrEmpty<T>,
    known: fn(&T) -> &'static str,
) -> Option<String> {
    match format {
        VariantOrUnknownOrEmpty::Item(item) => Some(known(item).to_string()),
        VariantOrUnknownOrEmpty::Unknown(other) => Some(other.clone()),
        VariantOrUnknownOrEmpty::Empty => None,
    }
}

const fn string_format_name(format: &StringFormat) -> &'static str {
    match format {
        StringFormat::Date => "date",
        StringFormat::DateTime => "date-time",
        StringFormat::Password => "password",
        StringFormat::Byte => "byte",
        StringFormat::Binary => "binary",
    }
}

const fn number_format_name(format: &NumberFormat) -> &'static str {
    match format {
        NumberFormat::Float => "float",
        NumberFormat::Double => "double",
    }
}

const fn integer_format_name(format: &IntegerFormat) -> &'static str {
    match format {
        IntegerFormat::Int32 => "int32",
        IntegerFormat::Int64 => "int64",
    }
}
