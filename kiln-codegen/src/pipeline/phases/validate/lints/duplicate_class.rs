//! Lint for duplicate class names.

use std::collections::HashSet;

use kiln_ir::DomainIR;

use super::super::Lint;
use crate::pipeline::Diagnostic;

/// Lint that rejects two classes with the same name.
pub struct DuplicateClassLint;

impl Lint for DuplicateClassLint {
    fn name(&self) -> &'static str {
        "duplicate-class"
    }

    fn description(&self) -> &'static str {
        "Reject classes declared more than once"
    }

    fn check(&self, ir: &DomainIR, diagnostics: &mut Vec<Diagnostic>) {
        let mut seen = HashSet::new();
        for class in &ir.classes {
            if !seen.insert(class.name.as_str()) {
                diagnostics.push(
                    Diagnostic::error(
                        "validate",
                        format!("class '{}' is declared more than once", class.name),
                    )
                    .with_code("duplicate-class")
                    .for_class(&class.name)
                    .at(format!("classes.{}", class.name)),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use kiln_ir::{ClassModel, ProjectMeta};

    use super::*;

    #[test]
    fn test_duplicate_class() {
        let ir = DomainIR::new(ProjectMeta::new("shop"))
            .class(ClassModel::new("Order"))
            .class(ClassModel::new("Customer"))
            .class(ClassModel::new("Order"));

        let mut diagnostics = Vec::new();
        DuplicateClassLint.check(&ir, &mut diagnostics);

        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].severity.is_error());
        assert!(diagnostics[0].message.contains("Order"));
    }

    #[test]
    fn test_no_duplicates() {
        let ir = DomainIR::new(ProjectMeta::new("shop"))
            .class(ClassModel::new("Order"))
            .class(ClassModel::new("Customer"));

        let mut diagnostics = Vec::new();
        DuplicateClassLint.check(&ir, &mut diagnostics);

        assert!(diagnostics.is_empty());
    }
}
