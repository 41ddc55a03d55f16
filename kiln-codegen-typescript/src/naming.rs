//! TypeScript naming conventions.
//!
//! Generated classes are ES modules, so everything runs in strict mode. Only
//! words that cannot bind a parameter or local there are escaped. Type
//! keywords such as `string` or `number` stay legal identifiers.

use kiln_codegen::stack::NamingConvention;
use kiln_core::{to_camel_case, to_kebab_case, to_pascal_case};

/// Reserved in strict mode, including `arguments` and `eval` which cannot be
/// rebound.
const STRICT_MODE_RESERVED: &[&str] = &[
    "arguments",
    "await",
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "eval",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "function",
    "if",
    "implements",
    "import",
    "in",
    "instanceof",
    "interface",
    "let",
    "new",
    "null",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "static",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
    "yield",
];

/// `delete` becomes `_delete`.
fn prefix_underscore(name: &str) -> String {
    format!("_{}", name)
}

/// Entities are PascalCase, files kebab-case (`order-line.entity.ts`),
/// properties and handlers camelCase.
pub const TS_NAMING: NamingConvention = NamingConvention {
    class_to_type: to_pascal_case,
    class_to_file: to_kebab_case,
    field_to_name: to_camel_case,
    reserved_words: STRICT_MODE_RESERVED,
    escape_reserved: prefix_underscore,
};
