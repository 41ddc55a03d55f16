//! Per-class configuration errors.

use thiserror::Error;

/// A problem that prevents one class from being generated.
///
/// Configuration errors never abort the whole run: the affected class is
/// skipped and every other class is still generated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("class '{class}' has a relationship to unknown class '{target}'")]
    DanglingRelationship { class: String, target: String },

    #[error("class '{class}' has a relationship to '{target}', which was not generated")]
    DependsOnFailedClass { class: String, target: String },

    #[error("class '{class}' declares field '{field}' more than once")]
    FieldCollision { class: String, field: String },

    #[error("class '{class}' maps fields '{first}' and '{second}' to the same column '{column}'")]
    ColumnCollision {
        class: String,
        column: String,
        first: String,
        second: String,
    },

    #[error("class '{class}' has conflicting setting '{key}': {reason}")]
    ConflictingOverride {
        class: String,
        key: String,
        reason: String,
    },
}

impl ConfigurationError {
    /// The class this error belongs to.
    pub fn class(&self) -> &str {
        match self {
            ConfigurationError::DanglingRelationship { class, .. }
            | ConfigurationError::DependsOnFailedClass { class, .. }
            | ConfigurationError::FieldCollision { class, .. }
            | ConfigurationError::ColumnCollision { class, .. }
            | ConfigurationError::ConflictingOverride { class, .. } => class,
        }
    }

    /// Short machine-readable code, used in diagnostics and reports.
    pub fn code(&self) -> &'static str {
        match self {
            ConfigurationError::DanglingRelationship { .. } => "dangling-relationship",
            ConfigurationError::DependsOnFailedClass { .. } => "failed-dependency",
            ConfigurationError::FieldCollision { .. } => "field-collision",
            ConfigurationError::ColumnCollision { .. } => "column-collision",
            ConfigurationError::ConflictingOverride { .. } => "conflicting-override",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ConfigurationError::DanglingRelationship {
            class: "Order".into(),
            target: "Ghost".into(),
        };
        assert_eq!(
            err.to_string(),
            "class 'Order' has a relationship to unknown class 'Ghost'"
        );
        assert_eq!(err.class(), "Order");
        assert_eq!(err.code(), "dangling-relationship");
    }

    #[test]
    fn test_failed_dependency_names_the_target() {
        let err = ConfigurationError::DependsOnFailedClass {
            class: "Payment".into(),
            target: "Invoice".into(),
        };
        assert_eq!(
            err.to_string(),
            "class 'Payment' has a relationship to 'Invoice', which was not generated"
        );
        assert_eq!(err.code(), "failed-dependency");
    }
}
