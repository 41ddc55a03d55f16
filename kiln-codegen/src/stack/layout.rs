//! Output layout of a stack.

use kiln_core::ArtifactKind;

/// Where a stack puts each artifact kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Directory every artifact directory lives under, `/`-separated.
    pub root: String,
    pub entity_dir: String,
    pub repository_dir: String,
    pub service_dir: String,
    pub controller_dir: String,
    /// File extension without the dot.
    pub extension: &'static str,
}

impl Layout {
    pub fn dir(&self, kind: ArtifactKind) -> &str {
        match kind {
            ArtifactKind::Entity => &self.entity_dir,
            ArtifactKind::Repository => &self.repository_dir,
            ArtifactKind::Service => &self.service_dir,
            ArtifactKind::Controller => &self.controller_dir,
        }
    }

    /// Relative path of a file in the directory for `kind`.
    pub fn path(&self, kind: ArtifactKind, stem: &str) -> String {
        let file = format!("{}.{}", stem, self.extension);
        [self.root.as_str(), self.dir(kind), file.as_str()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(root: &str) -> Layout {
        Layout {
            root: root.to_string(),
            entity_dir: "entities".into(),
            repository_dir: "repositories".into(),
            service_dir: "services".into(),
            controller_dir: "controllers".into(),
            extension: "ts",
        }
    }

    #[test]
    fn test_layout_path() {
        assert_eq!(
            layout("src").path(ArtifactKind::Entity, "order.entity"),
            "src/entities/order.entity.ts"
        );
        assert_eq!(
            layout("").path(ArtifactKind::Controller, "order.controller"),
            "controllers/order.controller.ts"
        );
    }
}
