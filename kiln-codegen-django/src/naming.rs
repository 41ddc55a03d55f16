//! Python naming conventions.

use kiln_codegen::stack::NamingConvention;
use kiln_core::{to_pascal_case, to_snake_case};

fn escape_py_reserved(name: &str) -> String {
    format!("{}_", name)
}

/// Python naming conventions (PEP 8).
pub const PY_NAMING: NamingConvention = NamingConvention {
    class_to_type: to_pascal_case,
    // Modules use snake_case
    class_to_file: to_snake_case,
    field_to_name: to_snake_case,
    reserved_words: &[
        // Keywords
        "and",
        "as",
        "assert",
        "async",
        "await",
        "break",
        "class",
        "continue",
        "def",
        "del",
        "elif",
        "else",
        "except",
        "finally",
        "for",
        "from",
        "global",
        "if",
        "import",
        "in",
        "is",
        "lambda",
        "nonlocal",
        "not",
        "or",
        "pass",
        "raise",
        "return",
        "try",
        "while",
        "with",
        "yield",
        // Constants
        "False",
        "None",
        "True",
        // Names the generated modules bind themselves
        "models",
        "self",
        "request",
        "path",
    ],
    escape_reserved: escape_py_reserved,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_py_naming() {
        assert_eq!(PY_NAMING.type_name("order_line"), "OrderLine");
        assert_eq!(PY_NAMING.file_name("OrderLine"), "order_line");
        assert_eq!(PY_NAMING.field_name("createdAt"), "created_at");
        assert_eq!(PY_NAMING.field_name("trackingNumber"), "tracking_number");
    }

    #[test]
    fn test_py_escape_reserved() {
        assert!(PY_NAMING.is_reserved("class"));
        assert_eq!(PY_NAMING.field_name("from"), "from_");
        assert_eq!(PY_NAMING.field_name("status"), "status");
    }
}
