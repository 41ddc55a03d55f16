//! Generate operation - artifact rendering from a manifest.

use std::path::Path;

use eyre::{Context, Result};
use kiln_codegen::{generation, pipeline::Pipeline};
use kiln_core::Overwrite;
use kiln_manifest::{Manifest, Stack};

use super::describe;
use crate::{
    reports::{
        GenerateReport, GenerationResult, PreviewFile, PreviewResult, SkippedClass, WrittenResult,
    },
    stack::StackSupport,
};

/// Options for the generate operation.
pub struct GenerateOptions<'a> {
    /// Directory the artifact paths are relative to.
    pub output_dir: &'a Path,
    pub stack: Stack,
    /// Preview instead of writing files.
    pub dry_run: bool,
    pub overwrite: Overwrite,
}

/// Execute the generate operation.
///
/// Runs the pipeline on the manifest and renders every class for the target
/// stack. Failed classes are reported as skipped; the rest is still written.
pub fn generate(manifest: &Manifest, opts: GenerateOptions) -> Result<GenerateReport> {
    let _span = tracing::info_span!("generate", stack = %opts.stack).entered();
    let ctx = Pipeline::new()
        .run(manifest.clone())
        .wrap_err("Pipeline failed")?;
    let warnings = ctx.warnings().map(describe).collect();

    let support = StackSupport::get(opts.stack);
    let outcome =
        generation::generate(&ctx, support.adapter()).wrap_err("Failed to render artifacts")?;

    let skipped: Vec<_> = outcome
        .skipped_classes()
        .into_iter()
        .map(|name| SkippedClass {
            name: name.to_string(),
            reason: ctx
                .failed
                .get(name)
                .map_or_else(String::new, ToString::to_string),
        })
        .collect();
    for class in &skipped {
        tracing::warn!(class = %class.name, reason = %class.reason, "class skipped");
    }
    let class_count = ctx.plans.len();

    let registry = outcome.into_registry(opts.overwrite);
    let result = if opts.dry_run {
        let files = registry
            .preview()
            .into_iter()
            .map(|f| PreviewFile {
                path: f.path,
                content: f.content,
            })
            .collect();
        GenerationResult::Preview(PreviewResult { files })
    } else {
        let stats = registry
            .write_all(opts.output_dir)
            .wrap_err("Failed to write generated files")?;
        for path in &stats.skipped_paths {
            tracing::debug!(path = %path, "kept existing file");
        }
        tracing::info!(
            written = stats.written_paths.len(),
            kept = stats.skipped_paths.len(),
            output_dir = %opts.output_dir.display(),
            "wrote generated files"
        );
        GenerationResult::Written(WrittenResult {
            output_dir: opts.output_dir.to_path_buf(),
            written: stats.written_paths,
            kept: stats.skipped_paths,
        })
    };

    Ok(GenerateReport {
        project_name: manifest.project.name.clone(),
        stack: opts.stack.to_string(),
        class_count,
        warnings,
        skipped,
        result,
    })
}
