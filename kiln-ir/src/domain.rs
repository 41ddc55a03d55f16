use indexmap::IndexMap;

use crate::{
    config::{ClassOverrides, GlobalConfig},
    model::ClassModel,
};

/// Project-level information used for output layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectMeta {
    pub name: String,
    /// Base package for JVM stacks (e.g. `com.example.shop`).
    pub package: Option<String>,
    /// Application module for Python stacks.
    pub app: Option<String>,
}

impl ProjectMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: None,
            app: None,
        }
    }
}

/// Everything one generation run consumes.
#[derive(Debug, Clone)]
pub struct DomainIR {
    pub meta: ProjectMeta,
    /// Classes in declaration order.
    pub classes: Vec<ClassModel>,
    pub config: GlobalConfig,
    pub overrides: IndexMap<String, ClassOverrides>,
}

impl DomainIR {
    pub fn new(meta: ProjectMeta) -> Self {
        Self {
            meta,
            classes: Vec::new(),
            config: GlobalConfig::default(),
            overrides: IndexMap::new(),
        }
    }

    pub fn class(mut self, class: ClassModel) -> Self {
        self.classes.push(class);
        self
    }

    pub fn with_config(mut self, config: GlobalConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_overrides(mut self, class: impl Into<String>, overrides: ClassOverrides) -> Self {
        self.overrides.insert(class.into(), overrides);
        self
    }

    pub fn find_class(&self, name: &str) -> Option<&ClassModel> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.find_class(name).is_some()
    }

    /// Overrides for a class, if any were declared.
    pub fn overrides_for(&self, name: &str) -> Option<&ClassOverrides> {
        self.overrides.get(name)
    }
}
