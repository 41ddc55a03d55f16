//! Generate command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from code generation.
#[derive(Debug)]
pub struct GenerateReport {
    /// Project name from the manifest.
    pub project_name: String,

    /// Stack the artifacts were rendered for.
    pub stack: String,

    /// Number of classes rendered.
    pub class_count: usize,

    /// Warning messages from the pipeline.
    pub warnings: Vec<String>,

    /// Classes whose artifacts were not generated.
    pub skipped: Vec<SkippedClass>,

    /// Generation result (files written or preview).
    pub result: GenerationResult,
}

/// A class left out of generation, with the reason.
#[derive(Debug)]
pub struct SkippedClass {
    pub name: String,
    pub reason: String,
}

/// Result of code generation.
#[derive(Debug)]
pub enum GenerationResult {
    /// Files were written to disk.
    Written(WrittenResult),
    /// Dry-run preview.
    Preview(PreviewResult),
}

/// Result when files were written to disk.
#[derive(Debug)]
pub struct WrittenResult {
    pub output_dir: PathBuf,
    /// Relative paths of the files written.
    pub written: Vec<String>,
    /// Relative paths of existing files left untouched.
    pub kept: Vec<String>,
}

/// Result of a dry-run preview.
#[derive(Debug)]
pub struct PreviewResult {
    /// Files that would be generated.
    pub files: Vec<PreviewFile>,
}

/// A file in preview mode.
#[derive(Debug)]
pub struct PreviewFile {
    pub path: String,
    pub content: String,
}

impl GenerateReport {
    /// Whether every declared class was generated.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        for warning in &self.warnings {
            out.warning(warning);
        }
        for skipped in &self.skipped {
            out.error(&format!("skipped class '{}': {}", skipped.name, skipped.reason));
        }

        match &self.result {
            GenerationResult::Written(written) => self.render_written(out, written),
            GenerationResult::Preview(preview) => self.render_preview(out, preview),
        }
    }
}

impl GenerateReport {
    fn render_written(&self, out: &mut dyn Output, written: &WrittenResult) {
        out.preformatted(&format!("{} ({})", self.project_name, self.stack));
        out.newline();

        if !written.written.is_empty() {
            out.section(&format!("Written ({})", written.written.len()));
            for path in &written.written {
                out.added_item(path);
            }
        }

        if !written.kept.is_empty() {
            out.newline();
            out.section(&format!("Kept existing ({})", written.kept.len()));
            for path in &written.kept {
                out.skipped_item(path);
            }
        }

        out.newline();
        out.key_value(
            "Generated",
            &format!(
                "{} classes into {}",
                self.class_count,
                written.output_dir.display()
            ),
        );
    }

    fn render_preview(&self, out: &mut dyn Output, preview: &PreviewResult) {
        for file in &preview.files {
            out.divider(&file.path);
            out.preformatted(&file.content);
        }

        out.divider("Summary");
        out.preformatted(&format!(
            "{} files would be generated for {} classes",
            preview.files.len(),
            self.class_count
        ));
    }
}
