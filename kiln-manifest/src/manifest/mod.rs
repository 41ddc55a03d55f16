//! Manifest types and parsing for kiln.toml files.

mod class;
mod file;
mod metadata;
mod parse;
mod project;
mod stack;
mod validate;

use indexmap::IndexMap;
use serde::Deserialize;

pub use class::{AttributeDef, ClassDef, RelationshipDef};
pub use file::KilnToml;
pub use metadata::{MetadataConfig, OverrideDef, TablePrefix};
pub use parse::parse_manifest;
pub use project::ProjectConfig;
pub use stack::Stack;
pub use validate::ParseContext;

/// Root manifest for kiln.toml
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// Project metadata
    pub project: ProjectConfig,

    /// Global generation conventions
    #[serde(default)]
    pub metadata: MetadataConfig,

    /// Class declarations, in document order
    #[serde(default)]
    pub classes: IndexMap<String, ClassDef>,

    /// Per-class overrides of the global conventions
    #[serde(default)]
    pub overrides: IndexMap<String, OverrideDef>,
}

impl Manifest {
    /// Check if a class is declared.
    pub fn has_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Total number of declared relationships across all classes.
    pub fn relationship_count(&self) -> usize {
        self.classes.values().map(|c| c.relationships.len()).sum()
    }
}
