//! Lint for classes without content.

use kiln_ir::DomainIR;

use super::super::Lint;
use crate::pipeline::Diagnostic;

/// Lint that warns about classes with no attributes, relationships or state.
pub struct EmptyClassLint;

impl Lint for EmptyClassLint {
    fn name(&self) -> &'static str {
        "empty-class"
    }

    fn description(&self) -> &'static str {
        "Warn about classes that declare nothing"
    }

    fn check(&self, ir: &DomainIR, diagnostics: &mut Vec<Diagnostic>) {
        for class in &ir.classes {
            if class.attributes.is_empty() && class.relationships.is_empty() && !class.is_stateful()
            {
                diagnostics.push(
                    Diagnostic::warning(
                        "validate",
                        format!("class '{}' has no attributes or relationships", class.name),
                    )
                    .with_code("empty-class")
                    .for_class(&class.name)
                    .at(format!("classes.{}", class.name)),
                );
            }
        }
    }
}
