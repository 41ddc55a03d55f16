//! TypeScript stack adapter.

use kiln_codegen::{
    generators::ClassPlan,
    stack::{Layout, NamingConvention, StackAdapter, TypeTable},
};
use kiln_core::ArtifactKind;
use kiln_ir::{CascadeType, FetchType, ProjectMeta};

use crate::{
    TS_NAMING, TS_TYPES,
    files::{ControllerTs, EntityTs, RepositoryTs, ServiceTs},
    ts::{dir_of, stem},
    vocabulary::{cascade_option, eager_option},
};

/// TypeORM entities and repositories, services and Express routers.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeScriptAdapter;

impl TypeScriptAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl StackAdapter for TypeScriptAdapter {
    fn name(&self) -> &'static str {
        "typescript"
    }

    fn type_table(&self) -> &TypeTable {
        &TS_TYPES
    }

    fn naming(&self) -> &NamingConvention {
        &TS_NAMING
    }

    fn layout(&self, _project: &ProjectMeta) -> Layout {
        Layout {
            root: "src".into(),
            entity_dir: dir_of(ArtifactKind::Entity).into(),
            repository_dir: dir_of(ArtifactKind::Repository).into(),
            service_dir: dir_of(ArtifactKind::Service).into(),
            controller_dir: dir_of(ArtifactKind::Controller).into(),
            extension: "ts",
        }
    }

    fn file_stem(&self, class_name: &str, kind: ArtifactKind) -> String {
        stem(class_name, kind)
    }

    fn cascade_vocabulary(&self, cascade: CascadeType) -> Option<&'static str> {
        cascade_option(cascade)
    }

    fn fetch_vocabulary(&self, fetch: FetchType) -> Option<&'static str> {
        eager_option(fetch)
    }

    fn render_entity(&self, _project: &ProjectMeta, plan: &ClassPlan) -> String {
        EntityTs::new(plan).render()
    }

    fn render_repository(&self, _project: &ProjectMeta, plan: &ClassPlan) -> String {
        RepositoryTs::new(plan).render()
    }

    fn render_service(&self, _project: &ProjectMeta, plan: &ClassPlan) -> String {
        ServiceTs::new(plan).render()
    }

    fn render_controller(&self, _project: &ProjectMeta, plan: &ClassPlan) -> String {
        ControllerTs::new(plan).render()
    }
}
