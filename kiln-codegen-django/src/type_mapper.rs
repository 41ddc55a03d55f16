//! Python type hints and Django model fields.

use kiln_codegen::stack::TypeTable;
use kiln_ir::{IdStrategy, IdType, SemanticType};

/// Semantic types to Python type hints.
pub const PY_TYPES: TypeTable = TypeTable {
    scalars: &[
        (SemanticType::String, "str"),
        (SemanticType::Integer, "int"),
        (SemanticType::Long, "int"),
        (SemanticType::Float, "float"),
        (SemanticType::Double, "float"),
        (SemanticType::Boolean, "bool"),
        (SemanticType::Date, "datetime"),
        (SemanticType::Uuid, "UUID"),
        (SemanticType::Json, "dict[str, Any]"),
    ],
    ids: &[
        (IdType::Uuid, "UUID"),
        (IdType::Long, "int"),
        (IdType::Integer, "int"),
        (IdType::String, "str"),
    ],
};

/// Module and name to import for a type hint, when it is not a builtin.
pub(crate) fn import_for(hint: &str) -> Option<(&'static str, &'static str)> {
    match hint {
        "datetime" => Some(("datetime", "datetime")),
        "UUID" => Some(("uuid", "UUID")),
        h if h.contains("Any") => Some(("typing", "Any")),
        _ => None,
    }
}

/// Django field class and its fixed arguments for a semantic type.
pub fn model_field(ty: SemanticType) -> (&'static str, &'static [&'static str]) {
    match ty {
        SemanticType::String => ("CharField", &["max_length=255"]),
        SemanticType::Integer => ("IntegerField", &[]),
        SemanticType::Long => ("BigIntegerField", &[]),
        SemanticType::Float | SemanticType::Double => ("FloatField", &[]),
        SemanticType::Boolean => ("BooleanField", &[]),
        SemanticType::Date => ("DateTimeField", &[]),
        SemanticType::Uuid => ("UUIDField", &[]),
        SemanticType::Json => ("JSONField", &[]),
    }
}

/// Django primary key field and its arguments.
pub fn id_field(strategy: IdStrategy, id_type: IdType) -> (&'static str, &'static [&'static str]) {
    match (strategy, id_type) {
        (_, IdType::String) => ("CharField", &["primary_key=True", "max_length=64"]),
        (IdStrategy::Uuid, _) | (_, IdType::Uuid) => (
            "UUIDField",
            &["primary_key=True", "default=uuid4", "editable=False"],
        ),
        (_, IdType::Long) => ("BigAutoField", &["primary_key=True"]),
        (_, IdType::Integer) => ("AutoField", &["primary_key=True"]),
    }
}

/// Django URL converter for a path parameter of this hint.
pub fn path_converter(hint: &str) -> &'static str {
    match hint {
        "int" => "int",
        "UUID" => "uuid",
        _ => "str",
    }
}
