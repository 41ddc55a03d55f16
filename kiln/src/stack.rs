//! Stack dispatch.
//!
//! Maps the manifest's stack to its adapter and output metadata.

use kiln_codegen::stack::StackAdapter;
use kiln_codegen_django::DjangoAdapter;
use kiln_codegen_spring::SpringAdapter;
use kiln_codegen_typescript::TypeScriptAdapter;
use kiln_manifest::Stack;

/// Adapter and display metadata for one target stack.
pub struct StackSupport {
    stack: Stack,
    /// Human-readable stack name.
    pub display_name: &'static str,
}

impl StackSupport {
    pub fn get(stack: Stack) -> Self {
        let display_name = match stack {
            Stack::Spring => "Spring Boot (JPA, Spring Data, Spring Web)",
            Stack::TypeScript => "TypeScript (TypeORM, Express)",
            Stack::Django => "Django (models, Django REST framework)",
        };
        Self {
            stack,
            display_name,
        }
    }

    pub fn adapter(&self) -> &'static dyn StackAdapter {
        match self.stack {
            Stack::Spring => &SpringAdapter,
            Stack::TypeScript => &TypeScriptAdapter,
            Stack::Django => &DjangoAdapter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_names_match_stacks() {
        for stack in Stack::ALL {
            assert_eq!(StackSupport::get(stack).adapter().name(), stack.as_str());
        }
    }
}
