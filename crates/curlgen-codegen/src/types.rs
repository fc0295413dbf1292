//! Output types for script generation.
//!
//! # Examples
//!
//! ```
//! use curlgen_codegen::{GeneratedScript, GeneratedScripts};
//!
//! let mut scripts = GeneratedScripts::new();
//! scripts.add(GeneratedScript {
//!     filename: "GetPets.sh".to_string(),
//!     content: "curl -X GET \"/pets\"\n".to_string(),
//! });
//!
//! assert_eq!(scripts.len(), 1);
//! ```

use serde::{Deserialize, Serialize};

/// Ordered collection of generated scripts.
///
/// Order follows the document: paths first, then verbs within a path.
/// Filenames are not deduplicated here; callers check for collisions
/// before generating.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedScripts {
    /// Scripts in generation order
    pub scripts: Vec<GeneratedScript>,
}

impl GeneratedScripts {
    /// Creates an empty collection.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            scripts: Vec::new(),
        }
    }

    /// Appends a script.
    pub fn add(&mut self, script: GeneratedScript) {
        self.scripts.push(script);
    }

    /// Returns the number of scripts.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    /// Returns `true` if nothing was generated.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    /// Returns an iterator over the scripts.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &GeneratedScript> {
        self.scripts.iter()
    }

    /// Returns the script with the given filename.
    #[must_use]
    pub fn get(&self, filename: &str) -> Option<&GeneratedScript> {
        self.scripts.iter().find(|script| script.filename == filename)
    }
}

impl IntoIterator for GeneratedScripts {
    type Item = GeneratedScript;
    type IntoIter = std::vec::IntoIter<GeneratedScript>;

    fn into_iter(self) -> Self::IntoIter {
        self.scripts.into_iter()
    }
}

/// One script file: a filename and its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedScript {
    /// File name including the dialect extension
    pub filename: String,
    /// Script text
    pub content: String,
}
