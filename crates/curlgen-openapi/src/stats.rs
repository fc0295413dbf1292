//! Document statistics.
//!
//! Counts reported before generation and by `curlgen inspect`.
//!
//! # Examples
//!
//! ```
//! use curlgen_openapi::{ApiDocument, DocumentStats, HttpMethod, Operation, PathItem};
//!
//! let mut document = ApiDocument::new();
//! let mut item = PathItem::new("/health");
//! item.operations.push(Operation::new(HttpMethod::Get));
//! document.paths.push(item);
//!
//! let stats = DocumentStats::collect(&document);
//! assert_eq!(stats.path_items, 1);
//! assert_eq!(stats.operations, 1);
//! ```

use crate::model::ApiDocument;
use serde::{Deserialize, Serialize};

/// Counts of the main elements of an API description.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Path items
    pub path_items: usize,
    /// Operations across all path items
    pub operations: usize,
    /// Parameters across all operations
    pub parameters: usize,
    /// Operations declaring a request body
    pub request_bodies: usize,
    /// Named component schemas
    pub schemas: usize,
}

impl DocumentStats {
    /// Collects statistics from a document.
    #[must_use]
    pub fn collect(document: &ApiDocument) -> Self {
        let mut stats = Self {
            path_items: document.paths.len(),
            schemas: document.component_schema_count,
            ..Self::default()
        };

        for (_, operation) in document.operations() {
            stats.operations += 1;
            stats.parameters += operation.parameters.len();
            if operation.request_body.is_some() {
                stats.request_bodies += 1;
            }
        }

        stats
    }
}
