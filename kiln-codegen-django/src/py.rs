//! Python spelling shared by the file renderers.

use kiln_codegen::{
    generation::ImportCollector,
    generators::{ClassPlan, FieldType, ParamType, Returns},
};
use kiln_core::{ArtifactKind, to_snake_case};
use kiln_ir::{ProjectMeta, SemanticType};

use crate::{PY_NAMING, PY_TYPES, files::GENERATED_HEADER, type_mapper::import_for};

/// Standard library modules, imported in the first group.
const STDLIB: &[&str] = &[
    "collections.abc",
    "dataclasses",
    "datetime",
    "typing",
    "uuid",
];

/// Django app directory, the snake-cased project name when none is set.
pub(crate) fn app_of(project: &ProjectMeta) -> String {
    project.app.clone().unwrap_or_else(|| {
        let name: String = project
            .name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ' '))
            .collect();
        to_snake_case(&name)
    })
}

/// Package of an artifact kind inside the app.
pub(crate) fn dir_of(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Entity => "models",
        ArtifactKind::Repository => "repositories",
        ArtifactKind::Service => "services",
        ArtifactKind::Controller => "views",
    }
}

/// Module name of a class's artifact, e.g. `order_line_service`.
pub(crate) fn stem(class_name: &str, kind: ArtifactKind) -> String {
    let module = PY_NAMING.file_name(class_name);
    match kind {
        ArtifactKind::Entity => module,
        ArtifactKind::Repository => format!("{}_repository", module),
        ArtifactKind::Service => format!("{}_service", module),
        ArtifactKind::Controller => format!("{}_views", module),
    }
}

/// Python identifier for a model name.
pub(crate) fn ident(name: &str) -> String {
    PY_NAMING.field_name(name)
}

/// `"value"`.
pub(crate) fn quote(value: &str) -> String {
    format!("\"{}\"", value)
}

/// Type resolution and imports for one Python module.
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

    /// Relative module path of a file in the `kind` package.
    pub fn module(&self, kind: ArtifactKind, module: &str) -> String {
        if kind == self.kind {
            format!(".{}", module)
        } else {
            format!("..{}.{}", dir_of(kind), module)
        }
    }

    /// Import an artifact of another class (or this one).
    pub fn artifact(&mut self, class_name: &str, kind: ArtifactKind, symbol: &str) -> String {
        let module = self.module(kind, &stem(class_name, kind));
        self.import(&module, symbol);
        symbol.to_string()
    }

    pub fn model_type(&mut self, name: &str) -> String {
        self.artifact(name, ArtifactKind::Entity, name)
    }

    pub fn entity(&mut self) -> String {
        let plan = self.plan;
        self.model_type(&plan.class.name)
    }

    /// Module of the state enum, living next to the models.
    pub fn state_module(&self) -> Option<String> {
        self.plan
            .state_enum()
            .map(|name| self.module(ArtifactKind::Entity, &PY_NAMING.file_name(name)))
    }

    pub fn state_enum(&mut self) -> String {
        let plan = self.plan;
        match (plan.state_enum(), self.state_module()) {
            (Some(name), Some(module)) => {
                self.import(&module, name);
                name.to_string()
            }
            _ => "str".to_string(),
        }
    }

    fn mapped(&mut self, hint: &'static str) -> String {
        if let Some((module, name)) = import_for(hint) {
            self.import(module, name);
        }
        hint.to_string()
    }

    pub fn field_type(&mut self, ty: &FieldType) -> String {
        match ty {
            FieldType::State(_) => self.state_enum(),
            FieldType::Entity { target, collection } => {
                let target = self.model_type(target);
                if *collection {
                    format!("list[{}]", target)
                } else {
                    target
                }
            }
            other => {
                let hint = PY_TYPES.field(other).unwrap_or("str");
                self.mapped(hint)
            }
        }
    }

    pub fn param_type(&mut self, ty: &ParamType) -> String {
        match ty {
            ParamType::Id => {
                let id = self.plan.entity.id.id_type;
                self.field_type(&FieldType::Id(id))
            }
            ParamType::ForeignId(id) => self.field_type(&FieldType::Id(*id)),
            ParamType::Field(field) => self.field_type(field),
            ParamType::State => self.state_enum(),
            ParamType::States => format!("list[{}]", self.state_enum()),
            ParamType::Timestamp => self.mapped(PY_TYPES.scalar(SemanticType::Date)),
            ParamType::Text => "str".to_string(),
            ParamType::Version => "int".to_string(),
            ParamType::Page => {
                let plan = self.plan;
                self.artifact(&plan.class.name, ArtifactKind::Repository, "PageRequest")
            }
            ParamType::Entity => self.entity(),
        }
    }

    pub fn returns(&mut self, returns: Returns) -> String {
        let entity = self.entity();
        match returns {
            Returns::Optional => format!("{} | None", entity),
            Returns::Entity => entity,
            Returns::List => format!("list[{}]", entity),
            Returns::Page => format!("tuple[list[{}], int]", entity),
            Returns::Count => "int".to_string(),
            Returns::Unit => "None".to_string(),
        }
    }

    /// Generated header and `from ... import ...` lines: standard library,
    /// then third party, then the app's own modules.
    pub fn header(&self) -> String {
        let own = format!(".{}", stem(&self.plan.class.name, self.kind));
        let mut groups: [Vec<String>; 3] = Default::default();
        for (module, names) in self.imports.sorted() {
            if module == own {
                continue;
            }
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            let line = format!("from {} import {}", module, names.join(", "));
            let group = if module.starts_with('.') {
                2
            } else if STDLIB.contains(&module) {
                0
            } else {
                1
            };
            groups[group].push(line);
        }

        let mut out = format!("{}\n", GENERATED_HEADER);
        for group in groups.iter_mut().filter(|g| !g.is_empty()) {
            group.sort();
            out.push('\n');
            out.push_str(&group.join("\n"));
            out.push('\n');
        }
        out.push_str("\n\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stems() {
        assert_eq!(stem("OrderLine", ArtifactKind::Entity), "order_line");
        assert_eq!(stem("Order", ArtifactKind::Repository), "order_repository");
        assert_eq!(stem("Order", ArtifactKind::Controller), "order_views");
    }

    #[test]
    fn test_app_of() {
        let mut project = ProjectMeta::new("Book Shop");
        assert_eq!(app_of(&project), "book_shop");
        project.app = Some("store".into());
        assert_eq!(app_of(&project), "store");
    }
}
