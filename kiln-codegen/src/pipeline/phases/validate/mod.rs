//! Validate phase: model-level lints over the domain IR.
//!
//! Lints look at the model as a whole. Problems that only make one class
//! ungeneratable are left to the later phases, which skip that class alone.

mod lint;
pub mod lints;

use eyre::{Result, bail};
pub use lint::{Lint, LintInfo};
pub use lints::{ClassNamingLint, DuplicateClassLint, EmptyClassLint, UnusedStateEnumLint};

use crate::pipeline::{CompilationContext, Phase};

pub struct ValidatePhase {
    lints: Vec<Box<dyn Lint>>,
}

impl ValidatePhase {
    /// The built-in lints.
    pub fn new() -> Self {
        Self::empty()
            .with_lint(ClassNamingLint)
            .with_lint(DuplicateClassLint)
            .with_lint(EmptyClassLint)
            .with_lint(UnusedStateEnumLint)
    }

    pub fn empty() -> Self {
        Self { lints: Vec::new() }
    }

    pub fn with_lint(mut self, lint: impl Lint + 'static) -> Self {
        self.lints.push(Box::new(lint));
        self
    }

    pub fn lint_info(&self) -> Vec<LintInfo> {
        self.lints.iter().map(|l| l.info()).collect()
    }
}

impl Default for ValidatePhase {
    fn default() -> Self {
        Self::new()
    }
}

impl Phase for ValidatePhase {
    fn name(&self) -> &'static str {
        "validate"
    }

    fn description(&self) -> &'static str {
        "Lint class and attribute names, duplicates and unused state enums"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        let ir = ctx.ir()?;
        let found: Vec<_> = self
            .lints
            .iter()
            .flat_map(|lint| {
                let mut diagnostics = Vec::new();
                lint.check(ir, &mut diagnostics);
                diagnostics
            })
            .collect();
        ctx.diagnostics.extend(found);

        // Only model-wide problems are errors here
        if ctx.has_errors() {
            bail!("model has {} error(s)", ctx.error_count());
        }
        Ok(())
    }
}
