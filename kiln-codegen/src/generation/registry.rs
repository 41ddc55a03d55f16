//! Collects rendered artifacts and writes them to disk.
//!
//! ```ignore
//! let mut registry = FileRegistry::new(Overwrite::Always);
//! registry.register_all(outcome.artifacts);
//! let stats = registry.write_all(&output_dir)?;
//! ```

use std::path::{Path, PathBuf};

use eyre::Result;
use kiln_core::{ArtifactKind, GeneratedArtifact, Overwrite, WriteResult};

/// A file to be written.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub artifact: GeneratedArtifact,
    /// Override the registry's overwrite behavior.
    pub overwrite: Option<Overwrite>,
}

impl FileEntry {
    pub fn new(artifact: GeneratedArtifact) -> Self {
        Self {
            artifact,
            overwrite: None,
        }
    }

    pub fn with_overwrite(mut self, overwrite: Overwrite) -> Self {
        self.overwrite = Some(overwrite);
        self
    }

    pub fn path(&self) -> &str {
        &self.artifact.relative_path
    }

    pub fn kind(&self) -> ArtifactKind {
        self.artifact.kind
    }

    pub fn full_path(&self, base: &Path) -> PathBuf {
        base.join(&self.artifact.relative_path)
    }
}

impl From<GeneratedArtifact> for FileEntry {
    fn from(artifact: GeneratedArtifact) -> Self {
        Self::new(artifact)
    }
}

/// Registry of generated files.
///
/// Files are written grouped by artifact kind (entities first, controllers
/// last) and in registration order within a kind.
#[derive(Debug, Default)]
pub struct FileRegistry {
    entries: Vec<FileEntry>,
    overwrite: Overwrite,
}

impl FileRegistry {
    pub fn new(overwrite: Overwrite) -> Self {
        Self {
            entries: Vec::new(),
            overwrite,
        }
    }

    pub fn register(&mut self, entry: impl Into<FileEntry>) {
        self.entries.push(entry.into());
    }

    pub fn register_all<E: Into<FileEntry>>(&mut self, entries: impl IntoIterator<Item = E>) {
        self.entries.extend(entries.into_iter().map(Into::into));
    }

    /// Entries in write order.
    pub fn entries(&self) -> impl Iterator<Item = &FileEntry> {
        let mut sorted: Vec<_> = self.entries.iter().collect();
        sorted.sort_by_key(|e| e.kind());
        sorted.into_iter()
    }

    pub fn entries_by_kind(&self, kind: ArtifactKind) -> impl Iterator<Item = &FileEntry> {
        self.entries.iter().filter(move |e| e.kind() == kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn preview(&self) -> Vec<PreviewEntry> {
        self.entries()
            .map(|e| PreviewEntry {
                path: e.path().to_string(),
                content: e.artifact.content.clone(),
                class_name: e.artifact.class_name.clone(),
                kind: e.kind(),
            })
            .collect()
    }

    /// Write every entry below `base`.
    pub fn write_all(&self, base: &Path) -> Result<WriteStats> {
        let mut stats = WriteStats::default();

        for entry in self.entries() {
            let overwrite = entry.overwrite.unwrap_or(self.overwrite);
            match entry.artifact.write(base, overwrite)? {
                WriteResult::Written => {
                    stats.written += 1;
                    stats.written_paths.push(entry.path().to_string());
                }
                WriteResult::Skipped => {
                    stats.skipped += 1;
                    stats.skipped_paths.push(entry.path().to_string());
                }
            }
        }

        tracing::debug!(
            written = stats.written,
            skipped = stats.skipped,
            "wrote artifacts to {}",
            base.display()
        );
        Ok(stats)
    }
}

/// What a dry run would write.
#[derive(Debug, Clone)]
pub struct PreviewEntry {
    pub path: String,
    pub content: String,
    pub class_name: String,
    pub kind: ArtifactKind,
}

/// Statistics from a write operation.
#[derive(Debug, Default)]
pub struct WriteStats {
    pub written: usize,
    /// Files left alone because they already existed.
    pub skipped: usize,
    pub written_paths: Vec<String>,
    pub skipped_paths: Vec<String>,
}

impl WriteStats {
    pub fn total(&self) -> usize {
        self.written + self.skipped
    }
}
