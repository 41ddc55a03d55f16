//! Import bookkeeping for one rendered artifact.

use std::collections::BTreeSet;

use indexmap::IndexMap;

/// Symbols needed by an artifact, grouped by module.
///
/// Renderers add imports as they resolve types, so the same symbol is often
/// requested many times. Symbols within a module are kept sorted.
///
/// ```
/// use kiln_codegen::generation::ImportCollector;
///
/// let mut imports = ImportCollector::new();
/// imports.add("typeorm", "Entity");
/// imports.add("./customer.entity", "Customer");
/// imports.add("typeorm", "Column");
/// imports.add("typeorm", "Entity");
///
/// let modules: Vec<_> = imports.sorted().into_iter().map(|(m, _)| m).collect();
/// assert_eq!(modules, ["./customer.entity", "typeorm"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ImportCollector {
    modules: IndexMap<String, BTreeSet<String>>,
}

impl ImportCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, module: &str, symbol: &str) {
        self.modules
            .entry(module.to_string())
            .or_default()
            .insert(symbol.to_string());
    }

    /// Modules in the order they were first requested.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.modules.iter().map(|(m, s)| (m.as_str(), s))
    }

    /// Modules sorted by name.
    pub fn sorted(&self) -> Vec<(&str, &BTreeSet<String>)> {
        let mut modules: Vec<_> = self.iter().collect();
        modules.sort_by(|a, b| a.0.cmp(b.0));
        modules
    }
}
