//! Explain operation - pipeline and per-class explanation.

use std::path::Path;

use eyre::{Context, Result};
use kiln_codegen::{
    generators::ClassPlan,
    pipeline::{Pipeline, phases::ValidatePhase},
};
use kiln_core::ArtifactKind;
use kiln_ir::{EffectiveMetadata, ProjectMeta};
use kiln_manifest::{Manifest, Stack};

use crate::{
    reports::{ClassInfo, ExplainReport, FailedClass, LintInfo, PhaseInfo, ProjectInfo},
    stack::StackSupport,
};

/// Execute the explain operation.
///
/// Runs the pipeline and describes its phases and lints, then what it
/// resolved and planned for every class.
pub fn explain(manifest: &Manifest, config_path: &Path, stack: Stack) -> Result<ExplainReport> {
    let pipeline = Pipeline::new();
    let phases = pipeline
        .phase_info()
        .into_iter()
        .map(|p| PhaseInfo {
            name: p.name.to_string(),
            description: p.description.to_string(),
        })
        .collect();
    let lints = ValidatePhase::new()
        .lint_info()
        .into_iter()
        .map(|l| LintInfo {
            name: l.name.to_string(),
            description: l.description.to_string(),
        })
        .collect();

    let ctx = pipeline.run(manifest.clone()).wrap_err("Pipeline failed")?;
    let project = &ctx.ir()?.meta;
    let support = StackSupport::get(stack);

    let classes = ctx
        .plans
        .iter()
        .filter_map(|(name, plan)| {
            let meta = ctx.metadata.get(name)?;
            Some(class_info(plan, meta, project, &support))
        })
        .collect();
    let failed = ctx
        .failed
        .iter()
        .map(|(name, reason)| FailedClass {
            name: name.clone(),
            reason: reason.to_string(),
        })
        .collect();

    Ok(ExplainReport {
        config_path: config_path.to_path_buf(),
        project: ProjectInfo {
            name: manifest.project.name.clone(),
            stack: support.display_name.to_string(),
        },
        phases,
        lints,
        classes,
        failed,
    })
}

fn class_info(
    plan: &ClassPlan,
    meta: &EffectiveMetadata,
    project: &ProjectMeta,
    support: &StackSupport,
) -> ClassInfo {
    let mut features = Vec::new();
    if meta.is_audited() {
        features.push("audit".to_string());
    }
    if let Some(version) = &meta.version_field {
        features.push(format!("optimistic locking ({})", version));
    }
    if let Some(soft_delete) = &meta.soft_delete {
        features.push(format!("soft delete ({})", soft_delete.field));
    }
    if let Some(cache) = &meta.cache {
        features.push(format!("cache ({}, {}s)", cache.strategy.as_str(), cache.ttl_seconds));
    }
    if meta.capabilities.history {
        features.push("history".to_string());
    }
    features.push(format!("recent lookback {}", meta.recent_lookback));

    let adapter = support.adapter();
    ClassInfo {
        name: plan.name().to_string(),
        table: format!("{}.{}", meta.schema, meta.table_name),
        route_base: meta.route_base.clone(),
        id: format!(
            "{} ({}, {})",
            meta.id.field,
            meta.id.strategy.as_str(),
            meta.id.id_type.as_str()
        ),
        features,
        role: meta.capabilities.role.as_str().to_string(),
        state: meta
            .capabilities
            .state
            .as_ref()
            .map(|s| format!("{} ({})", s.enum_name, s.field)),
        repository_ops: plan.repository.op_names(),
        service_ops: plan.service.op_names(),
        routes: plan
            .controller
            .routes
            .iter()
            .map(|r| format!("{} {} -> {}", r.verb.as_str(), r.path, r.handler))
            .collect(),
        artifacts: ArtifactKind::ALL
            .into_iter()
            .map(|kind| adapter.artifact_path(project, plan.name(), kind))
            .collect(),
    }
}
