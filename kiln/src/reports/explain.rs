//! Explain command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from pipeline explanation.
#[derive(Debug)]
pub struct ExplainReport {
    pub config_path: PathBuf,
    pub project: ProjectInfo,
    pub phases: Vec<PhaseInfo>,
    pub lints: Vec<LintInfo>,
    /// Classes that made it through the pipeline, in declaration order.
    pub classes: Vec<ClassInfo>,
    pub failed: Vec<FailedClass>,
}

#[derive(Debug)]
pub struct ProjectInfo {
    pub name: String,
    pub stack: String,
}

#[derive(Debug)]
pub struct PhaseInfo {
    pub name: String,
    pub description: String,
}

#[derive(Debug)]
pub struct LintInfo {
    pub name: String,
    pub description: String,
}

/// Effective metadata, capabilities and planned operations of one class.
#[derive(Debug)]
pub struct ClassInfo {
    pub name: String,
    /// Qualified table, e.g. `public.order`.
    pub table: String,
    pub route_base: String,
    /// Id field with strategy and type, e.g. `id (uuid, uuid)`.
    pub id: String,
    /// Enabled conventions, e.g. `audit`, `soft delete (deletedAt)`.
    pub features: Vec<String>,
    pub role: String,
    /// State enum and field, when stateful.
    pub state: Option<String>,
    pub repository_ops: Vec<String>,
    pub service_ops: Vec<String>,
    /// Routes as `VERB /path -> handler`.
    pub routes: Vec<String>,
    /// Relative output paths for the target stack.
    pub artifacts: Vec<String>,
}

#[derive(Debug)]
pub struct FailedClass {
    pub name: String,
    pub reason: String,
}

impl Report for ExplainReport {
    fn render(&self, out: &mut dyn Output) {
        out.title("Kiln Pipeline Explanation");
        out.newline();

        out.key_value("Input", &self.config_path.display().to_string());
        out.key_value_indented("Project", &self.project.name);
        out.key_value_indented("Stack", &self.project.stack);
        out.newline();

        out.section("Pipeline Phases");
        for (i, phase) in self.phases.iter().enumerate() {
            out.numbered_item(i + 1, &format!("{} - {}", phase.name, phase.description));
        }
        out.newline();

        out.section("Validation Lints");
        for lint in &self.lints {
            out.list_item(&format!("{}: {}", lint.name, lint.description));
        }

        for class in &self.classes {
            out.newline();
            render_class(out, class);
        }

        if !self.failed.is_empty() {
            out.newline();
            out.section("Skipped Classes");
            for failed in &self.failed {
                out.list_item(&format!("{}: {}", failed.name, failed.reason));
            }
        }
    }
}

fn render_class(out: &mut dyn Output, class: &ClassInfo) {
    out.section(&format!("Class {}", class.name));
    out.key_value_indented("Table", &class.table);
    out.key_value_indented("Routes under", &class.route_base);
    out.key_value_indented("Id", &class.id);
    out.key_value_indented("Role", &class.role);
    if let Some(state) = &class.state {
        out.key_value_indented("State", state);
    }
    if !class.features.is_empty() {
        out.key_value_indented("Features", &class.features.join(", "));
    }
    out.key_value_indented("Repository", &class.repository_ops.join(", "));
    out.key_value_indented("Service", &class.service_ops.join(", "));
    for route in &class.routes {
        out.list_item(route);
    }
    for artifact in &class.artifacts {
        out.added_item(artifact);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::RecordingOutput;

    #[test]
    fn test_render_class_sections() {
        let report = ExplainReport {
            config_path: PathBuf::from("kiln.toml"),
            project: ProjectInfo {
                name: "shop".into(),
                stack: "spring".into(),
            },
            phases: vec![PhaseInfo {
                name: "lower".into(),
                description: "Transform manifest into domain IR".into(),
            }],
            lints: Vec::new(),
            classes: vec![ClassInfo {
                name: "Order".into(),
                table: "public.order".into(),
                route_base: "/orders".into(),
                id: "id (uuid, uuid)".into(),
                features: vec!["audit".into()],
                role: "generic".into(),
                state: Some("OrderStatus (status)".into()),
                repository_ops: vec!["findById".into(), "save".into()],
                service_ops: vec!["create".into()],
                routes: vec!["POST /orders -> create".into()],
                artifacts: vec!["src/Order.java".into()],
            }],
            failed: vec![FailedClass {
                name: "Invoice".into(),
                reason: "dangling".into(),
            }],
        };

        let mut out = RecordingOutput::default();
        report.render(&mut out);
        let text = out.text();

        assert!(text.starts_with("# Kiln Pipeline Explanation"));
        assert!(text.contains("  1. lower - Transform manifest into domain IR"));
        assert!(text.contains("Class Order:\n  Table: public.order"));
        assert!(text.contains("  State: OrderStatus (status)\n  Features: audit"));
        assert!(text.contains("  Repository: findById, save"));
        assert!(text.contains("  - POST /orders -> create\n  + src/Order.java"));
        assert!(text.ends_with("Skipped Classes:\n  - Invoice: dangling"));
    }
}
