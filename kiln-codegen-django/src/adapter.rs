//! Django stack adapter.

use kiln_codegen::{
    generators::ClassPlan,
    stack::{Layout, NamingConvention, StackAdapter, TypeTable},
};
use kiln_core::ArtifactKind;
use kiln_ir::{CascadeType, FetchType, ProjectMeta};

use crate::{
    PY_NAMING, PY_TYPES,
    files::{ModelPy, RepositoryPy, ServicePy, ViewsPy},
    py::{app_of, dir_of, stem},
    vocabulary::{eager_loader, on_delete},
};

/// Django models, repositories, services and REST framework views.
#[derive(Debug, Clone, Copy, Default)]
pub struct DjangoAdapter;

impl DjangoAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl StackAdapter for DjangoAdapter {
    fn name(&self) -> &'static str {
        "django"
    }

    fn type_table(&self) -> &TypeTable {
        &PY_TYPES
    }

    fn naming(&self) -> &NamingConvention {
        &PY_NAMING
    }

    fn layout(&self, project: &ProjectMeta) -> Layout {
        Layout {
            root: app_of(project),
            entity_dir: dir_of(ArtifactKind::Entity).into(),
            repository_dir: dir_of(ArtifactKind::Repository).into(),
            service_dir: dir_of(ArtifactKind::Service).into(),
            controller_dir: dir_of(ArtifactKind::Controller).into(),
            extension: "py",
        }
    }

    fn file_stem(&self, class_name: &str, kind: ArtifactKind) -> String {
        stem(class_name, kind)
    }

    fn cascade_vocabulary(&self, cascade: CascadeType) -> Option<&'static str> {
        on_delete(cascade)
    }

    fn fetch_vocabulary(&self, fetch: FetchType) -> Option<&'static str> {
        eager_loader(fetch, false)
    }

    fn render_entity(&self, _project: &ProjectMeta, plan: &ClassPlan) -> String {
        ModelPy::new(plan).render()
    }

    fn render_repository(&self, _project: &ProjectMeta, plan: &ClassPlan) -> String {
        RepositoryPy::new(plan).render()
    }

    fn render_service(&self, _project: &ProjectMeta, plan: &ClassPlan) -> String {
        ServicePy::new(plan).render()
    }

    fn render_controller(&self, _project: &ProjectMeta, plan: &ClassPlan) -> String {
        ViewsPy::new(plan).render()
    }
}
