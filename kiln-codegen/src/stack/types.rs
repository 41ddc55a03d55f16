//! Semantic type tables.

use kiln_ir::{IdType, SemanticType};

use crate::generators::FieldType;

/// A stack's finite mapping from semantic and id types to concrete types.
///
/// Lookups never fail: a type missing from the table renders as the table's
/// String mapping.
#[derive(Debug, Clone, Copy)]
pub struct TypeTable {
    pub scalars: &'static [(SemanticType, &'static str)],
    pub ids: &'static [(IdType, &'static str)],
}

impl TypeTable {
    fn string(&self) -> &'static str {
        self.scalars
            .iter()
            .find(|(ty, _)| *ty == SemanticType::String)
            .map_or("String", |(_, name)| name)
    }

    pub fn scalar(&self, ty: SemanticType) -> &'static str {
        self.scalars
            .iter()
            .find(|(t, _)| *t == ty)
            .map_or_else(|| self.string(), |(_, name)| name)
    }

    pub fn id(&self, ty: IdType) -> &'static str {
        self.ids
            .iter()
            .find(|(t, _)| *t == ty)
            .map_or_else(|| self.string(), |(_, name)| name)
    }

    /// Concrete type of a scalar or id field. `None` for state and entity
    /// types, which renderers name themselves.
    pub fn field(&self, ty: &FieldType) -> Option<&'static str> {
        match ty {
            FieldType::Id(id) => Some(self.id(*id)),
            other => other.semantic().map(|s| self.scalar(s)),
        }
    }

    /// Semantic types with no entry of their own.
    pub fn missing(&self) -> Vec<SemanticType> {
        SemanticType::ALL
            .into_iter()
            .filter(|ty| !self.scalars.iter().any(|(t, _)| t == ty))
            .collect()
    }
}
