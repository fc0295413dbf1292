//! Operation name resolution.
//!
//! Every operation gets a PascalCase name that doubles as its script
//! filename. Names come from the `operationId` when one is declared; the
//! casing transforms applied to it are strict and reject empty segments
//! (`a--b`, `x//y`, double spaces). When the identifier is blank or a
//! transform fails, the name is derived from the verb and the raw path
//! instead, and the result records which of the two paths was taken.
//!
//! # Examples
//!
//! ```
//! use curlgen_codegen::naming::{OperationName, resolve_operation_name};
//! use curlgen_openapi::{HttpMethod, Operation};
//!
//! let op = Operation::new(HttpMethod::Get).with_id("my-operation");
//! let name = resolve_operation_name("/my-path", &op);
//! assert_eq!(name, OperationName::Resolved("GetMyOperation".to_string()));
//!
//! let anonymous = Operation::new(HttpMethod::Get);
//! let name = resolve_operation_name("/my-path", &anonymous);
//! assert_eq!(name, OperationName::Fallback("GetMy-path".to_string()));
//! ```

use curlgen_core::{Error, Result};
use curlgen_openapi::{ApiDocument, HttpMethod, Operation};
use std::collections::HashSet;
use std::fmt;

/// Resolved operation name and how it was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OperationName {
    /// Derived from the `operationId`
    Resolved(String),
    /// Derived from the verb and path
    Fallback(String),
}

impl OperationName {
    /// Returns the name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Resolved(name) | Self::Fallback(name) => name,
        }
    }

    /// Consumes the value and returns the name.
    #[must_use]
    pub fn into_inner(self) -> String {
        match self {
            Self::Resolved(name) | Self::Fallback(name) => name,
        }
    }

    /// Returns `true` if the name was derived from the verb and path.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

impl fmt::Display for OperationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves the display and file name of one operation.
///
/// Never fails: a blank identifier or a failing transform yields
/// [`OperationName::Fallback`].
#[must_use]
pub fn resolve_operation_name(path: &str, operation: &Operation) -> OperationName {
    let Some(operation_id) = operation
        .operation_id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
    else {
        return OperationName::Fallback(fallback_name(path, operation.method));
    };

    match name_from_identifier(operation_id, operation.method) {
        Ok(name) => OperationName::Resolved(name),
        Err(err) => {
            tracing::warn!(
                operation_id,
                path,
                error = %err,
                "operationId cannot be converted to a name, using verb and path"
            );
            OperationName::Fallback(fallback_name(path, operation.method))
        }
    }
}

fn name_from_identifier(operation_id: &str, method: HttpMethod) -> Result<String> {
    let name = capitalize_first(operation_id)?;
    let name = kebab_to_pascal(&name)?;
    let name = route_to_camel(&name)?;
    let name = spaces_to_pascal(&name)?;
    Ok(with_prefix(name, method.capitalized()))
}

/// Verb followed by the path with route and space casing applied.
///
/// Placeholders and hyphens are kept; empty segments are tolerated.
fn fallback_name(path: &str, method: HttpMethod) -> String {
    let route: String = path
        .split('/')
        .enumerate()
        .map(|(index, segment)| {
            if index == 0 {
                segment.to_string()
            } else {
                capitalize_lenient(segment)
            }
        })
        .collect();
    let words: String = route.split(' ').map(capitalize_lenient).collect();
    format!("{}{words}", method.capitalized())
}

/// Uppercases the first character.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] for an empty string.
///
/// # Examples
///
/// ```
/// use curlgen_codegen::naming::capitalize_first;
///
/// assert_eq!(capitalize_first("pets").unwrap(), "Pets");
/// assert!(capitalize_first("").is_err());
/// ```
pub fn capitalize_first(value: &str) -> Result<String> {
    let mut chars = value.chars();
    let first = chars
        .next()
        .ok_or_else(|| Error::InvalidArgument("cannot capitalize an empty segment".to_string()))?;
    Ok(first.to_uppercase().chain(chars).collect())
}

fn capitalize_lenient(value: &str) -> String {
    capitalize_first(value).unwrap_or_default()
}

/// Capitalizes every `-`-delimited segment and joins them; `.` becomes `_`.
///
/// # Errors
///
/// Returns an error if any segment is empty.
///
/// # Examples
///
/// ```
/// use curlgen_codegen::naming::kebab_to_pascal;
///
/// assert_eq!(kebab_to_pascal("list-v1.2-items").unwrap(), "ListV1_2Items");
/// assert!(kebab_to_pascal("list--items").is_err());
/// ```
pub fn kebab_to_pascal(value: &str) -> Result<String> {
    value
        .split('-')
        .map(|segment| capitalize_first(segment).map(|s| s.replace('.', "_")))
        .collect()
}

/// Joins `/`-delimited segments, capitalizing all but the first.
///
/// # Errors
///
/// Returns an error if any segment after the first is empty.
///
/// # Examples
///
/// ```
/// use curlgen_codegen::naming::route_to_camel;
///
/// assert_eq!(route_to_camel("pets/findByStatus").unwrap(), "petsFindByStatus");
/// assert_eq!(route_to_camel("/pets").unwrap(), "Pets");
/// ```
pub fn route_to_camel(value: &str) -> Result<String> {
    let mut segments = value.split('/');
    let mut joined = segments.next().unwrap_or_default().to_string();
    for segment in segments {
        joined.push_str(&capitalize_first(segment)?);
    }
    Ok(joined)
}

/// Capitalizes every space-delimited word and joins them.
///
/// # Errors
///
/// Returns an error if any word is empty.
///
/// # Examples
///
/// ```
/// use curlgen_codegen::naming::spaces_to_pascal;
///
/// assert_eq!(spaces_to_pascal("find pets by tag").unwrap(), "FindPetsByTag");
/// ```
pub fn spaces_to_pascal(value: &str) -> Result<String> {
    value.split(' ').map(capitalize_first).collect()
}

/// Prepends `prefix` unless `value` already starts with it.
///
/// # Examples
///
/// ```
/// use curlgen_codegen::naming::with_prefix;
///
/// assert_eq!(with_prefix("Pets".to_string(), "Get"), "GetPets");
/// assert_eq!(with_prefix("GetPets".to_string(), "Get"), "GetPets");
/// ```
#[must_use]
pub fn with_prefix(value: String, prefix: &str) -> String {
    if value.starts_with(prefix) {
        value
    } else {
        format!("{prefix}{value}")
    }
}

/// Returns `true` if two or more operations resolve to the same name.
///
/// Advisory only: nothing is renamed.
#[must_use]
pub fn has_duplicates(document: &ApiDocument) -> bool {
    !duplicate_names(document).is_empty()
}

/// Returns every name shared by more than one operation, in first-seen order.
#[must_use]
pub fn duplicate_names(document: &ApiDocument) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();

    for (path, operation) in document.operations() {
        let name = resolve_operation_name(path, operation).into_inner();
        if !seen.insert(name.clone()) && !duplicates.contains(&name) {
            duplicates.push(name);
        }
    }

    duplicates
}
