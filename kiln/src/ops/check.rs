//! Check operation - manifest validation.

use std::path::Path;

use eyre::{Context, Result};
use kiln_codegen::pipeline::{Pipeline, Severity};
use kiln_manifest::Manifest;

use super::describe;
use crate::reports::CheckReport;

/// Execute the check operation.
///
/// Runs the pipeline to validate the manifest and returns diagnostics.
pub fn check(manifest: &Manifest, config_path: &Path) -> Result<CheckReport> {
    let ctx = Pipeline::new()
        .run(manifest.clone())
        .wrap_err("Validation failed")?;

    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut infos = Vec::new();

    for diag in &ctx.diagnostics {
        let msg = describe(diag);
        match diag.severity {
            Severity::Error => errors.push(msg),
            Severity::Warning => warnings.push(msg),
            Severity::Info => infos.push(msg),
        }
    }

    Ok(CheckReport {
        config_path: config_path.to_path_buf(),
        project_name: manifest.project.name.clone(),
        stack: manifest.project.stack.to_string(),
        class_count: manifest.classes.len(),
        relationship_count: manifest.relationship_count(),
        errors,
        warnings,
        infos,
    })
}
