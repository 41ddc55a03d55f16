//! TypeScript spelling shared by the file renderers.

use kiln_codegen::{
    generation::ImportCollector,
    generators::{ClassPlan, FieldType, ParamType, Returns},
};
use kiln_core::ArtifactKind;

use crate::{TS_NAMING, TS_TYPES, files::GENERATED_HEADER};

/// Directory of an artifact kind below `src/`.
pub(crate) fn dir_of(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Entity => "entities",
        ArtifactKind::Repository => "repositories",
        ArtifactKind::Service => "services",
        ArtifactKind::Controller => "controllers",
    }
}

/// File stem of a class's artifact, e.g. `order-line.entity`.
pub(crate) fn stem(class_name: &str, kind: ArtifactKind) -> String {
    format!("{}.{}", TS_NAMING.file_name(class_name), kind.as_str())
}

/// TypeScript identifier for a model name.
pub(crate) fn ident(name: &str) -> String {
    TS_NAMING.field_name(name)
}

/// Lower camel name of a class, used for lambda parameters and routers.
pub(crate) fn var_name(class_name: &str) -> String {
    ident(&kiln_core::to_camel_case(class_name))
}

/// `{ key: value, ... }`, or `None` when there are no entries.
pub(crate) fn object(entries: &[(String, String)]) -> Option<String> {
    if entries.is_empty() {
        return None;
    }
    let body = entries
        .iter()
        .map(|(k, v)| format!("{}: {}", k, v))
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!("{{ {} }}", body))
}

/// Type resolution and imports for one TypeScript file.
pub(crate) struct Scope<'a> {
    pub plan: &'a ClassPlan,
    kind: ArtifactKind,
    imports: ImportCollector,
}

impl<'a> Scope<'a> {
    pub fn new(plan: &'a ClassPlan, kind: ArtifactKind) -> Self {
        Self {
            plan,
            kind,
            imports: ImportCollector::new(),
        }
    }

    pub fn import(&mut self, module: &str, name: &str) {
        self.imports.add(module, name);
    }

    pub fn import_all(&mut self, module: &str, names: &[&str]) {
        for name in names {
            self.import(module, name);
        }
    }

    /// Module path of a file in the `kind` directory, relative to this file.
    pub fn module(&self, kind: ArtifactKind, file_stem: &str) -> String {
        if kind == self.kind {
            format!("./{}", file_stem)
        } else {
            format!("../{}/{}", dir_of(kind), file_stem)
        }
    }

    /// Import an artifact of another class (or this one).
    pub fn artifact(&mut self, class_name: &str, kind: ArtifactKind, symbol: &str) -> String {
        let module = self.module(kind, &stem(class_name, kind));
        self.import(&module, symbol);
        symbol.to_string()
    }

    /// An entity class.
    pub fn model_type(&mut self, name: &str) -> String {
        self.artifact(name, ArtifactKind::Entity, name)
    }

    pub fn entity(&mut self) -> String {
        let plan = self.plan;
        self.model_type(&plan.class.name)
    }

    /// Module of the state enum, living next to the entities.
    pub fn state_module(&self) -> Option<String> {
        self.plan
            .state_enum()
            .map(|name| self.module(ArtifactKind::Entity, &TS_NAMING.file_name(name)))
    }

    pub fn state_enum(&mut self) -> String {
        let plan = self.plan;
        match (plan.state_enum(), self.state_module()) {
            (Some(name), Some(module)) => {
                self.import(&module, name);
                name.to_string()
            }
            _ => "string".to_string(),
        }
    }

    pub fn field_type(&mut self, ty: &FieldType) -> String {
        match ty {
            FieldType::State(_) => self.state_enum(),
            FieldType::Entity { target, collection } => {
                let target = self.model_type(target);
                if *collection {
                    format!("{}[]", target)
                } else {
                    target
                }
            }
            other => TS_TYPES.field(other).unwrap_or("string").to_string(),
        }
    }

    pub fn param_type(&mut self, ty: &ParamType) -> String {
        match ty {
            ParamType::Id => TS_TYPES.id(self.plan.entity.id.id_type).to_string(),
            ParamType::ForeignId(id) => TS_TYPES.id(*id).to_string(),
            ParamType::Field(field) => self.field_type(field),
            ParamType::State => self.state_enum(),
            ParamType::States => format!("{}[]", self.state_enum()),
            ParamType::Timestamp => "Date".to_string(),
            ParamType::Text => "string".to_string(),
            ParamType::Version => "number".to_string(),
            ParamType::Page => {
                let plan = self.plan;
                self.artifact(&plan.class.name, ArtifactKind::Repository, "PageRequest")
            }
            ParamType::Entity => self.entity(),
        }
    }

    /// Resolved type of an operation result, unwrapped.
    pub fn returns(&mut self, returns: Returns) -> String {
        let entity = self.entity();
        match returns {
            Returns::Optional => format!("{} | null", entity),
            Returns::Entity => entity,
            Returns::List => format!("{}[]", entity),
            Returns::Page => format!("[{}[], number]", entity),
            Returns::Count => "number".to_string(),
            Returns::Unit => "void".to_string(),
        }
    }

    /// Generated header and imports: packages first, then project files.
    pub fn header(&self) -> String {
        let own = format!("./{}", stem(&self.plan.class.name, self.kind));
        let mut modules: Vec<_> = self
            .imports
            .sorted()
            .into_iter()
            .filter(|(module, _)| *module != own)
            .collect();
        modules.sort_by_key(|(module, _)| module.starts_with('.'));

        let mut out = format!("{}\n\n", GENERATED_HEADER);
        for (module, names) in &modules {
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            out.push_str(&format!(
                "import {{ {} }} from \"{}\";\n",
                names.join(", "),
                module
            ));
        }
        if !modules.is_empty() {
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stems() {
        assert_eq!(stem("OrderLine", ArtifactKind::Entity), "order-line.entity");
        assert_eq!(stem("Order", ArtifactKind::Controller), "order.controller");
        assert_eq!(var_name("OrderLine"), "orderLine");
    }

    #[test]
    fn test_object() {
        assert_eq!(object(&[]), None);
        assert_eq!(
            object(&[("name".into(), "\"id\"".into()), ("unique".into(), "true".into())]).as_deref(),
            Some("{ name: \"id\", unique: true }")
        );
    }
}
