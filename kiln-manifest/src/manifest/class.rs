//! Class declarations: `[classes.<Name>]`.

use kiln_ir::Cardinality;
use serde::Deserialize;

/// A class declared in the manifest.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassDef {
    /// Whether the class carries a lifecycle state
    #[serde(default)]
    pub stateful: bool,

    /// Name of the state enum (defaults to `<Name>Status`)
    pub state_enum: Option<String>,

    /// Declared attributes, in order
    #[serde(default)]
    pub attributes: Vec<AttributeDef>,

    /// Relationships from this class to others
    #[serde(default)]
    pub relationships: Vec<RelationshipDef>,
}

/// An attribute entry: `[[classes.<Name>.attributes]]`.
#[derive(Debug, Clone, Deserialize)]
pub struct AttributeDef {
    pub name: String,

    /// Declared type name; unknown names are passed through
    #[serde(rename = "type", default = "default_type")]
    pub ty: String,

    #[serde(default = "default_true")]
    pub nullable: bool,

    #[serde(default)]
    pub unique: bool,
}

/// A relationship entry: `[[classes.<Name>.relationships]]`.
#[derive(Debug, Clone, Deserialize)]
pub struct RelationshipDef {
    /// Target class name
    pub target: String,

    pub cardinality: Cardinality,

    /// Field name on this class
    pub field: Option<String>,

    /// Field name on the target class
    pub inverse_field: Option<String>,
}

fn default_type() -> String {
    "String".to_string()
}

fn default_true() -> bool {
    true
}
