//! Spring stack adapter.

use kiln_codegen::{
    generators::ClassPlan,
    stack::{Layout, NamingConvention, StackAdapter, TypeTable},
};
use kiln_core::ArtifactKind;
use kiln_ir::{CascadeType, FetchType, ProjectMeta};

use crate::{
    JAVA_NAMING, JAVA_TYPES,
    files::{ControllerJava, EntityJava, RepositoryJava, ServiceJava},
    java,
};

/// Spring Boot adapter: JPA entities, Spring Data repositories, services and
/// REST controllers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpringAdapter;

impl SpringAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl StackAdapter for SpringAdapter {
    fn name(&self) -> &'static str {
        "spring"
    }

    fn type_table(&self) -> &TypeTable {
        &JAVA_TYPES
    }

    fn naming(&self) -> &NamingConvention {
        &JAVA_NAMING
    }

    fn layout(&self, project: &ProjectMeta) -> Layout {
        let package = java::base_package(project).replace('.', "/");
        Layout {
            root: format!("src/main/java/{}", package),
            entity_dir: ArtifactKind::Entity.as_str().into(),
            repository_dir: ArtifactKind::Repository.as_str().into(),
            service_dir: ArtifactKind::Service.as_str().into(),
            controller_dir: ArtifactKind::Controller.as_str().into(),
            extension: "java",
        }
    }

    fn file_stem(&self, class_name: &str, kind: ArtifactKind) -> String {
        let class = JAVA_NAMING.type_name(class_name);
        match kind {
            ArtifactKind::Entity => class,
            ArtifactKind::Repository => format!("{}Repository", class),
            ArtifactKind::Service => format!("{}Service", class),
            ArtifactKind::Controller => format!("{}Controller", class),
        }
    }

    fn cascade_vocabulary(&self, cascade: CascadeType) -> Option<&'static str> {
        java::cascade_type(cascade)
    }

    fn fetch_vocabulary(&self, fetch: FetchType) -> Option<&'static str> {
        java::fetch_type(fetch)
    }

    fn render_entity(&self, project: &ProjectMeta, plan: &ClassPlan) -> String {
        EntityJava::new(project, plan).render()
    }

    fn render_repository(&self, project: &ProjectMeta, plan: &ClassPlan) -> String {
        RepositoryJava::new(project, plan).render()
    }

    fn render_service(&self, project: &ProjectMeta, plan: &ClassPlan) -> String {
        ServiceJava::new(project, plan).render()
    }

    fn render_controller(&self, project: &ProjectMeta, plan: &ClassPlan) -> String {
        ControllerJava::new(project, plan).render()
    }
}
