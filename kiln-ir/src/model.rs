//! Class model types.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// The fixed set of semantic attribute types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SemanticType {
    String,
    Integer,
    Long,
    Float,
    Double,
    Boolean,
    Date,
    Uuid,
    Json,
}

impl SemanticType {
    pub const ALL: [SemanticType; 9] = [
        SemanticType::String,
        SemanticType::Integer,
        SemanticType::Long,
        SemanticType::Float,
        SemanticType::Double,
        SemanticType::Boolean,
        SemanticType::Date,
        SemanticType::Uuid,
        SemanticType::Json,
    ];

    /// Get the canonical spelling of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::String => "String",
            SemanticType::Integer => "Integer",
            SemanticType::Long => "Long",
            SemanticType::Float => "Float",
            SemanticType::Double => "Double",
            SemanticType::Boolean => "Boolean",
            SemanticType::Date => "Date",
            SemanticType::Uuid => "UUID",
            SemanticType::Json => "JSON",
        }
    }

    /// Parse a declared type name, accepting common aliases.
    pub fn parse(s: &str) -> Option<Self> {
        let ty = match s.to_ascii_lowercase().as_str() {
            "string" | "str" | "text" | "varchar" => SemanticType::String,
            "integer" | "int" | "int32" => SemanticType::Integer,
            "long" | "int64" | "bigint" => SemanticType::Long,
            "float" | "float32" => SemanticType::Float,
            "double" | "float64" | "decimal" => SemanticType::Double,
            "boolean" | "bool" => SemanticType::Boolean,
            "date" | "datetime" | "timestamp" | "localdatetime" => SemanticType::Date,
            "uuid" => SemanticType::Uuid,
            "json" | "jsonb" => SemanticType::Json,
            _ => return None,
        };
        Some(ty)
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared type of an attribute.
///
/// Unrecognized names are kept verbatim so generation can fall back
/// to a string representation and report what was declared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeType {
    Known(SemanticType),
    Unknown(String),
}

impl AttributeType {
    pub fn parse(s: &str) -> Self {
        match SemanticType::parse(s) {
            Some(ty) => AttributeType::Known(ty),
            None => AttributeType::Unknown(s.to_string()),
        }
    }

    pub fn semantic(&self) -> Option<SemanticType> {
        match self {
            AttributeType::Known(ty) => Some(*ty),
            AttributeType::Unknown(_) => None,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, AttributeType::Known(SemanticType::String))
    }
}

impl From<SemanticType> for AttributeType {
    fn from(ty: SemanticType) -> Self {
        AttributeType::Known(ty)
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeType::Known(ty) => write!(f, "{}", ty),
            AttributeType::Unknown(raw) => f.write_str(raw),
        }
    }
}

/// A declared attribute of a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub ty: AttributeType,
    pub nullable: bool,
    pub unique: bool,
}

impl Attribute {
    /// Create a nullable, non-unique attribute.
    pub fn new(name: impl Into<String>, ty: impl Into<AttributeType>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            nullable: true,
            unique: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// Shape of a relationship between two classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cardinality {
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl Cardinality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cardinality::OneToMany => "one-to-many",
            Cardinality::ManyToOne => "many-to-one",
            Cardinality::ManyToMany => "many-to-many",
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cardinality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one-to-many" | "OneToMany" => Ok(Cardinality::OneToMany),
            "many-to-one" | "ManyToOne" => Ok(Cardinality::ManyToOne),
            "many-to-many" | "ManyToMany" => Ok(Cardinality::ManyToMany),
            other => Err(format!("unknown cardinality '{}'", other)),
        }
    }
}

/// A relationship declared on a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub source_class: String,
    pub target_class: String,
    pub cardinality: Cardinality,
    /// Field name on the source class.
    pub target_field_name: Option<String>,
    /// Field name on the target class.
    pub inverse_field_name: Option<String>,
}

impl Relationship {
    pub fn new(
        source_class: impl Into<String>,
        target_class: impl Into<String>,
        cardinality: Cardinality,
    ) -> Self {
        Self {
            source_class: source_class.into(),
            target_class: target_class.into(),
            cardinality,
            target_field_name: None,
            inverse_field_name: None,
        }
    }

    pub fn with_field(mut self, name: impl Into<String>) -> Self {
        self.target_field_name = Some(name.into());
        self
    }

    pub fn with_inverse_field(mut self, name: impl Into<String>) -> Self {
        self.inverse_field_name = Some(name.into());
        self
    }

    pub fn is_self_referential(&self) -> bool {
        self.source_class == self.target_class
    }
}

/// One entity to be generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassModel {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub relationships: Vec<Relationship>,
    /// Declared stateful. See [`ClassModel::is_stateful`] for the derived flag.
    pub stateful: bool,
    pub state_enum_name: Option<String>,
}

impl ClassModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            relationships: Vec::new(),
            stateful: false,
            state_enum_name: None,
        }
    }

    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Add a relationship from this class to `target`.
    pub fn relationship(mut self, target: impl Into<String>, cardinality: Cardinality) -> Self {
        let rel = Relationship::new(self.name.clone(), target, cardinality);
        self.relationships.push(rel);
        self
    }

    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    pub fn with_state(mut self, enum_name: Option<&str>) -> Self {
        self.stateful = true;
        self.state_enum_name = enum_name.map(str::to_string);
        self
    }

    pub fn find_attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn has_status_field(&self) -> bool {
        self.find_attribute("status").is_some()
    }

    /// Declared stateful, or carrying a `status` attribute.
    pub fn is_stateful(&self) -> bool {
        self.stateful || self.has_status_field()
    }

    /// Name of the state enum, when the class is stateful.
    pub fn state_enum(&self) -> Option<String> {
        if !self.is_stateful() {
            return None;
        }
        Some(
            self.state_enum_name
                .clone()
                .unwrap_or_else(|| format!("{}Status", self.name)),
        )
    }

    /// Whether this class is itself an audit trail (e.g. `OrderHistory`).
    pub fn is_audit_entity(&self) -> bool {
        ["History", "Historique", "Log", "Audit"]
            .iter()
            .any(|suffix| self.name.ends_with(suffix) && self.name.len() > suffix.len())
    }
}
