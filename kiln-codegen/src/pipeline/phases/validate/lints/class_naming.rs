//! Lint for class and attribute naming conventions.

use kiln_core::{to_camel_case, to_pascal_case};
use kiln_ir::DomainIR;

use super::super::Lint;
use crate::pipeline::Diagnostic;

/// Lint that warns when class names are not PascalCase or attribute names
/// are not camelCase.
pub struct ClassNamingLint;

impl Lint for ClassNamingLint {
    fn name(&self) -> &'static str {
        "class-naming"
    }

    fn description(&self) -> &'static str {
        "Check that classes are PascalCase and attributes camelCase"
    }

    fn check(&self, ir: &DomainIR, diagnostics: &mut Vec<Diagnostic>) {
        for class in &ir.classes {
            let expected = to_pascal_case(&class.name);
            if expected != class.name {
                diagnostics.push(
                    Diagnostic::warning(
                        "validate",
                        format!(
                            "class '{}' should be PascalCase (e.g., '{}')",
                            class.name, expected
                        ),
                    )
                    .with_code("class-naming")
                    .for_class(&class.name)
                    .at(format!("classes.{}", class.name)),
                );
            }

            for attr in &class.attributes {
                let expected = to_camel_case(&attr.name);
                if expected != attr.name {
                    diagnostics.push(
                        Diagnostic::warning(
                            "validate",
                            format!(
                                "attribute '{}' should be camelCase (e.g., '{}')",
                                attr.name, expected
                            ),
                        )
                        .with_code("class-naming")
                        .for_class(&class.name)
                        .at(format!("classes.{}.attributes.{}", class.name, attr.name)),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use kiln_ir::{Attribute, ClassModel, ProjectMeta, SemanticType};

    use super::*;

    fn check(ir: &DomainIR) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        ClassNamingLint.check(ir, &mut diagnostics);
        diagnostics
    }

    #[test]
    fn test_valid_names() {
        let ir = DomainIR::new(ProjectMeta::new("shop")).class(
            ClassModel::new("OrderItem")
                .attribute(Attribute::new("unitPrice", SemanticType::Double)),
        );
        assert!(check(&ir).is_empty());
    }

    #[test]
    fn test_snake_case_class() {
        let ir = DomainIR::new(ProjectMeta::new("shop")).class(ClassModel::new("order_item"));
        let diagnostics = check(&ir);

        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("'OrderItem'"));
        assert!(diagnostics[0].severity.is_warning());
    }

    #[test]
    fn test_snake_case_attribute() {
        let ir = DomainIR::new(ProjectMeta::new("shop")).class(
            ClassModel::new("Order").attribute(Attribute::new("unit_price", SemanticType::Double)),
        );
        let diagnostics = check(&ir);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].location.as_deref(),
            Some("classes.Order.attributes.unit_price")
        );
    }
}
