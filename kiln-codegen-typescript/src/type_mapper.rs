//! TypeScript and TypeORM type tables.

use kiln_codegen::stack::TypeTable;
use kiln_ir::{IdStrategy, IdType, SemanticType};

/// Semantic types to TypeScript types.
pub const TS_TYPES: TypeTable = TypeTable {
    scalars: &[
        (SemanticType::String, "string"),
        (SemanticType::Integer, "number"),
        (SemanticType::Long, "number"),
        (SemanticType::Float, "number"),
        (SemanticType::Double, "number"),
        (SemanticType::Boolean, "boolean"),
        (SemanticType::Date, "Date"),
        (SemanticType::Uuid, "string"),
        (SemanticType::Json, "Record<string, unknown>"),
    ],
    ids: &[
        (IdType::Uuid, "string"),
        (IdType::Long, "number"),
        (IdType::Integer, "number"),
        (IdType::String, "string"),
    ],
};

/// TypeORM column type of a semantic type.
pub fn column_type(ty: SemanticType) -> &'static str {
    match ty {
        SemanticType::String => "varchar",
        SemanticType::Integer => "int",
        SemanticType::Long => "bigint",
        SemanticType::Float => "float",
        SemanticType::Double => "double precision",
        SemanticType::Boolean => "boolean",
        SemanticType::Date => "timestamp",
        SemanticType::Uuid => "uuid",
        SemanticType::Json => "jsonb",
    }
}

/// Strategy argument of `@PrimaryGeneratedColumn`.
pub fn generation_strategy(strategy: IdStrategy) -> &'static str {
    match strategy {
        IdStrategy::AutoIncrement => "increment",
        IdStrategy::Sequence => "identity",
        IdStrategy::Uuid => "uuid",
    }
}

/// Whether values of this TypeScript type arrive as strings in request
/// paths and query strings and need converting.
pub fn is_numeric(ts: &str) -> bool {
    ts == "number"
}
