//! Java type table.

use kiln_codegen::stack::TypeTable;
use kiln_ir::{IdType, SemanticType};

/// Semantic types to Java types.
pub const JAVA_TYPES: TypeTable = TypeTable {
    scalars: &[
        (SemanticType::String, "String"),
        (SemanticType::Integer, "Integer"),
        (SemanticType::Long, "Long"),
        (SemanticType::Float, "Float"),
        (SemanticType::Double, "Double"),
        (SemanticType::Boolean, "Boolean"),
        (SemanticType::Date, "LocalDateTime"),
        (SemanticType::Uuid, "UUID"),
        (SemanticType::Json, "Map<String, Object>"),
    ],
    ids: &[
        (IdType::Uuid, "UUID"),
        (IdType::Long, "Long"),
        (IdType::Integer, "Integer"),
        (IdType::String, "String"),
    ],
};

/// Package and simple name to import for a Java type, when it is not in
/// `java.lang`.
pub(crate) fn import_for(ty: &str) -> Option<(&'static str, &'static str)> {
    match ty {
        "LocalDateTime" => Some(("java.time", "LocalDateTime")),
        "UUID" => Some(("java.util", "UUID")),
        t if t.starts_with("Map<") => Some(("java.util", "Map")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_semantic_type_is_mapped() {
        assert!(JAVA_TYPES.missing().is_empty());
    }

    #[test]
    fn test_java_types() {
        assert_eq!(JAVA_TYPES.scalar(SemanticType::Date), "LocalDateTime");
        assert_eq!(JAVA_TYPES.scalar(SemanticType::Double), "Double");
        assert_eq!(JAVA_TYPES.id(IdType::Uuid), "UUID");
        assert_eq!(JAVA_TYPES.id(IdType::Integer), "Integer");
    }

    #[test]
    fn test_imports() {
        assert_eq!(import_for("UUID"), Some(("java.util", "UUID")));
        assert_eq!(import_for("Map<String, Object>"), Some(("java.util", "Map")));
        assert_eq!(import_for("String"), None);
    }
}
