//! Java naming conventions.

use kiln_codegen::stack::NamingConvention;
use kiln_core::{to_camel_case, to_pascal_case};

fn escape_java_reserved(name: &str) -> String {
    format!("{}_", name)
}

/// Java naming conventions.
pub const JAVA_NAMING: NamingConvention = NamingConvention {
    class_to_type: to_pascal_case,
    // One public class per file, named like the class
    class_to_file: to_pascal_case,
    field_to_name: to_camel_case,
    reserved_words: &[
        "abstract",
        "assert",
        "boolean",
        "break",
        "byte",
        "case",
        "catch",
        "char",
        "class",
        "const",
        "continue",
        "default",
        "do",
        "double",
        "else",
        "enum",
        "extends",
        "final",
        "finally",
        "float",
        "for",
        "goto",
        "if",
        "implements",
        "import",
        "instanceof",
        "int",
        "interface",
        "long",
        "native",
        "new",
        "package",
        "private",
        "protected",
        "public",
        "return",
        "short",
        "static",
        "strictfp",
        "super",
        "switch",
        "synchronized",
        "this",
        "throw",
        "throws",
        "transient",
        "try",
        "void",
        "volatile",
        "while",
        "record",
        "var",
        "yield",
    ],
    escape_reserved: escape_java_reserved,
};
