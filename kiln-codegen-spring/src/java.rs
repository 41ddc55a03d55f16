//! Java spelling shared by the file renderers.

use kiln_codegen::{
    generation::ImportCollector,
    generators::{ClassPlan, FieldType, ParamType, Returns},
};
use kiln_core::{ArtifactKind, to_pascal_case};
use kiln_ir::{CacheStrategy, CascadeType, FetchType, IdStrategy, ProjectMeta, SemanticType};

use crate::{JAVA_NAMING, JAVA_TYPES, type_mapper::import_for};

const SPRING_DATA: &str = "org.springframework.data.domain";

/// Base package of the project, `com.example.<name>` when none is set.
pub(crate) fn base_package(project: &ProjectMeta) -> String {
    project.package.clone().unwrap_or_else(|| {
        let name: String = project
            .name
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect();
        format!("com.example.{}", name.to_lowercase())
    })
}

pub(crate) fn package_of(project: &ProjectMeta, kind: ArtifactKind) -> String {
    format!("{}.{}", base_package(project), kind.as_str())
}

pub(crate) fn getter(field: &str) -> String {
    format!("get{}", to_pascal_case(field))
}

pub(crate) fn setter(field: &str) -> String {
    format!("set{}", to_pascal_case(field))
}

/// Java identifier for a model name.
pub(crate) fn ident(name: &str) -> String {
    JAVA_NAMING.field_name(name)
}

/// `@Name` or `@Name(args)`.
pub(crate) fn annotation(name: &str, args: &[String]) -> String {
    if args.is_empty() {
        format!("@{}", name)
    } else {
        format!("@{}({})", name, args.join(", "))
    }
}

pub(crate) fn cascade_type(cascade: CascadeType) -> Option<&'static str> {
    match cascade {
        CascadeType::None => None,
        CascadeType::All => Some("CascadeType.ALL"),
        CascadeType::Persist => Some("CascadeType.PERSIST"),
        CascadeType::Merge => Some("CascadeType.MERGE"),
        CascadeType::Remove => Some("CascadeType.REMOVE"),
        CascadeType::Refresh => Some("CascadeType.REFRESH"),
        CascadeType::Detach => Some("CascadeType.DETACH"),
    }
}

pub(crate) fn fetch_type(fetch: FetchType) -> Option<&'static str> {
    match fetch {
        FetchType::Lazy => Some("FetchType.LAZY"),
        FetchType::Eager => Some("FetchType.EAGER"),
    }
}

pub(crate) fn generation_type(strategy: IdStrategy) -> &'static str {
    match strategy {
        IdStrategy::AutoIncrement => "GenerationType.IDENTITY",
        IdStrategy::Sequence => "GenerationType.SEQUENCE",
        IdStrategy::Uuid => "GenerationType.UUID",
    }
}

pub(crate) fn cache_usage(strategy: CacheStrategy) -> Option<&'static str> {
    match strategy {
        CacheStrategy::None => None,
        CacheStrategy::ReadOnly => Some("CacheConcurrencyStrategy.READ_ONLY"),
        CacheStrategy::ReadWrite => Some("CacheConcurrencyStrategy.READ_WRITE"),
        CacheStrategy::NonstrictReadWrite => Some("CacheConcurrencyStrategy.NONSTRICT_READ_WRITE"),
        CacheStrategy::Transactional => Some("CacheConcurrencyStrategy.TRANSACTIONAL"),
    }
}

/// Type resolution and imports for one Java file.
pub(crate) struct Scope<'a> {
    pub plan: &'a ClassPlan,
    pub package: String,
    entity_package: String,
    imports: ImportCollector,
}

impl<'a> Scope<'a> {
    pub fn new(project: &ProjectMeta, plan: &'a ClassPlan, kind: ArtifactKind) -> Self {
        Self {
            plan,
            package: package_of(project, kind),
            entity_package: package_of(project, ArtifactKind::Entity),
            imports: ImportCollector::new(),
        }
    }

    /// Import `name` from `package` unless it is in the current package.
    pub fn import(&mut self, package: &str, name: &str) {
        if package != self.package {
            self.imports.add(package, name);
        }
    }

    /// Import every name from `package`.
    pub fn import_all(&mut self, package: &str, names: &[&str]) {
        for name in names {
            self.import(package, name);
        }
    }

    /// An entity or state enum living in the entity package.
    pub fn model_type(&mut self, name: &str) -> String {
        let package = self.entity_package.clone();
        self.import(&package, name);
        name.to_string()
    }

    pub fn entity(&mut self) -> String {
        let plan = self.plan;
        self.model_type(&plan.class.name)
    }

    pub fn state_enum(&mut self) -> String {
        let plan = self.plan;
        match plan.state_enum() {
            Some(name) => self.model_type(name),
            None => "String".to_string(),
        }
    }

    fn mapped(&mut self, ty: &'static str) -> String {
        if let Some((package, name)) = import_for(ty) {
            self.import(package, name);
        }
        ty.to_string()
    }

    pub fn list_of(&mut self, inner: &str) -> String {
        self.import("java.util", "List");
        format!("List<{}>", inner)
    }

    pub fn field_type(&mut self, ty: &FieldType) -> String {
        match ty {
            FieldType::State(name) => self.model_type(name),
            FieldType::Entity { target, collection } => {
                let target = self.model_type(target);
                if *collection {
                    self.list_of(&target)
                } else {
                    target
                }
            }
            other => {
                let java = JAVA_TYPES.field(other).unwrap_or("String");
                self.mapped(java)
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
            ParamType::States => {
                let state = self.state_enum();
                self.list_of(&state)
            }
            ParamType::Timestamp => self.mapped(JAVA_TYPES.scalar(SemanticType::Date)),
            ParamType::Text => "String".to_string(),
            ParamType::Version => "Long".to_string(),
            ParamType::Page => {
                self.import(SPRING_DATA, "Pageable");
                "Pageable".to_string()
            }
            ParamType::Entity => self.entity(),
        }
    }

    pub fn returns(&mut self, returns: Returns) -> String {
        let entity = self.entity();
        match returns {
            Returns::Optional => {
                self.import("java.util", "Optional");
                format!("Optional<{}>", entity)
            }
            Returns::Entity => entity,
            Returns::List => self.list_of(&entity),
            Returns::Page => {
                self.import(SPRING_DATA, "Page");
                format!("Page<{}>", entity)
            }
            Returns::Count => "long".to_string(),
            Returns::Unit => "void".to_string(),
        }
    }

    /// `package` line and sorted imports, followed by a blank line.
    pub fn header(&self) -> String {
        let mut lines: Vec<String> = self
            .imports
            .iter()
            .flat_map(|(package, names)| {
                names
                    .iter()
                    .map(move |name| format!("import {}.{};", package, name))
            })
            .collect();
        lines.sort();

        let mut out = format!("{}\n\npackage {};\n\n", crate::files::GENERATED_HEADER, self.package);
        if !lines.is_empty() {
            out.push_str(&lines.join("\n"));
            out.push_str("\n\n");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_package() {
        let mut project = ProjectMeta::new("My Shop");
        assert_eq!(base_package(&project), "com.example.myshop");
        project.package = Some("org.acme.store".into());
        assert_eq!(package_of(&project, ArtifactKind::Service), "org.acme.store.service");
    }

    #[test]
    fn test_accessors() {
        assert_eq!(getter("createdAt"), "getCreatedAt");
        assert_eq!(setter("status"), "setStatus");
        assert_eq!(annotation("Id", &[]), "@Id");
        assert_eq!(
            annotation("Column", &["name = \"id\"".into(), "nullable = false".into()]),
            "@Column(name = \"id\", nullable = false)"
        );
    }
}
