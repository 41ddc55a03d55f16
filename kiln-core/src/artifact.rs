use std::{fmt, path::Path};

use eyre::Result;

use crate::file::{Overwrite, WriteResult, write_generated};

/// The four artifact kinds produced for every class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactKind {
    Entity,
    Repository,
    Service,
    Controller,
}

impl ArtifactKind {
    /// All kinds in generation order.
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::Entity,
        ArtifactKind::Repository,
        ArtifactKind::Service,
        ArtifactKind::Controller,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Entity => "entity",
            ArtifactKind::Repository => "repository",
            ArtifactKind::Service => "service",
            ArtifactKind::Controller => "controller",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rendered source file for one class and artifact kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    /// Class the artifact was generated for.
    pub class_name: String,
    pub kind: ArtifactKind,
    /// Path relative to the output directory, always `/`-separated.
    pub relative_path: String,
    pub content: String,
}

impl GeneratedArtifact {
    pub fn new(
        class_name: impl Into<String>,
        kind: ArtifactKind,
        relative_path: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            kind,
            relative_path: relative_path.into(),
            content: content.into(),
        }
    }

    /// Write the artifact below `base`.
    pub fn write(&self, base: &Path, overwrite: Overwrite) -> Result<WriteResult> {
        write_generated(&base.join(&self.relative_path), &self.content, overwrite)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn artifact(content: &str) -> GeneratedArtifact {
        GeneratedArtifact::new(
            "Order",
            ArtifactKind::Entity,
            "src/entity/Order.java",
            content,
        )
    }

    #[test]
    fn test_write_always_overwrites() {
        let temp = TempDir::new().unwrap();
        artifact("first").write(temp.path(), Overwrite::Always).unwrap();
        let result = artifact("second")
            .write(temp.path(), Overwrite::Always)
            .unwrap();

        assert_eq!(result, WriteResult::Written);
        let written = fs::read_to_string(temp.path().join("src/entity/Order.java")).unwrap();
        assert_eq!(written, "second");
    }

    #[test]
    fn test_write_if_missing_keeps_existing() {
        let temp = TempDir::new().unwrap();
        artifact("edited by hand")
            .write(temp.path(), Overwrite::Always)
            .unwrap();
        let result = artifact("regenerated")
            .write(temp.path(), Overwrite::IfMissing)
            .unwrap();

        assert_eq!(result, WriteResult::Skipped);
        let written = fs::read_to_string(temp.path().join("src/entity/Order.java")).unwrap();
        assert_eq!(written, "edited by hand");
    }

    #[test]
    fn test_kind_order() {
        let mut kinds = vec![ArtifactKind::Controller, ArtifactKind::Entity];
        kinds.sort();
        assert_eq!(kinds, vec![ArtifactKind::Entity, ArtifactKind::Controller]);
    }
}
