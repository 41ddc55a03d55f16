//! Stack adapter trait.

use kiln_core::ArtifactKind;
use kiln_ir::{CascadeType, FetchType, ProjectMeta};

use super::{Layout, NamingConvention, TypeTable};
use crate::generators::ClassPlan;

/// Renders class plans for one target stack.
///
/// Implement this trait to add support for a new stack. Renderers are pure:
/// the same plan always renders to the same text.
pub trait StackAdapter: Send + Sync {
    /// Stack identifier (e.g., "spring", "typescript", "django").
    fn name(&self) -> &'static str;

    /// The finite mapping from semantic types to stack types.
    fn type_table(&self) -> &TypeTable;

    /// Identifier conventions and reserved words.
    fn naming(&self) -> &NamingConvention;

    /// Output directories and file extension.
    fn layout(&self, project: &ProjectMeta) -> Layout;

    /// File name, without extension, of an artifact.
    fn file_stem(&self, class_name: &str, kind: ArtifactKind) -> String;

    /// Stack spelling of a cascade setting, `None` when nothing is emitted.
    fn cascade_vocabulary(&self, cascade: CascadeType) -> Option<&'static str>;

    /// Stack spelling of a fetch setting, `None` when the stack default
    /// already applies.
    fn fetch_vocabulary(&self, fetch: FetchType) -> Option<&'static str>;

    fn render_entity(&self, project: &ProjectMeta, plan: &ClassPlan) -> String;

    fn render_repository(&self, project: &ProjectMeta, plan: &ClassPlan) -> String;

    fn render_service(&self, project: &ProjectMeta, plan: &ClassPlan) -> String;

    fn render_controller(&self, project: &ProjectMeta, plan: &ClassPlan) -> String;

    /// Render one artifact kind.
    fn render(&self, kind: ArtifactKind, project: &ProjectMeta, plan: &ClassPlan) -> String {
        match kind {
            ArtifactKind::Entity => self.render_entity(project, plan),
            ArtifactKind::Repository => self.render_repository(project, plan),
            ArtifactKind::Service => self.render_service(project, plan),
            ArtifactKind::Controller => self.render_controller(project, plan),
        }
    }

    /// Relative output path of an artifact.
    fn artifact_path(&self, project: &ProjectMeta, class_name: &str, kind: ArtifactKind) -> String {
        self.layout(project)
            .path(kind, &self.file_stem(class_name, kind))
    }
}
