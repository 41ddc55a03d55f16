//! Lint for state enum names on classes that are not stateful.

use kiln_ir::DomainIR;

use super::super::Lint;
use crate::pipeline::Diagnostic;

/// Lint that warns when a class names a state enum but is not stateful, so
/// the enum is never generated.
pub struct UnusedStateEnumLint;

impl Lint for UnusedStateEnumLint {
    fn name(&self) -> &'static str {
        "unused-state-enum"
    }

    fn description(&self) -> &'static str {
        "Warn about state enums on classes without state"
    }

    fn check(&self, ir: &DomainIR, diagnostics: &mut Vec<Diagnostic>) {
        for class in &ir.classes {
            if let Some(name) = &class.state_enum_name
                && !class.is_stateful()
            {
                diagnostics.push(
                    Diagnostic::warning(
                        "validate",
                        format!(
                            "class '{}' names state enum '{}' but is not stateful",
                            class.name, name
                        ),
                    )
                    .with_code("unused-state-enum")
                    .for_class(&class.name)
                    .at(format!("classes.{}.state_enum", class.name)),
                );
            }
        }
    }
}
