//! Check command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from manifest validation.
#[derive(Debug)]
pub struct CheckReport {
    pub config_path: PathBuf,
    pub project_name: String,
    pub stack: String,
    pub class_count: usize,
    pub relationship_count: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub infos: Vec<String>,
}

impl CheckReport {
    /// Whether the check passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        for error in &self.errors {
            out.error(error);
        }
        for warning in &self.warnings {
            out.warning(warning);
        }
        for info in &self.infos {
            out.preformatted(&format!("info: {}", info));
        }

        if !self.warnings.is_empty() || !self.errors.is_empty() {
            out.newline();
        }

        if !self.is_valid() {
            out.preformatted(&format!(
                "✗ {} has {} error{}",
                self.config_path.display(),
                self.errors.len(),
                if self.errors.len() == 1 { "" } else { "s" }
            ));
            return;
        }

        out.preformatted(&format!("✓ {} is valid", self.config_path.display()));
        out.newline();
        out.key_value_indented("Project", &self.project_name);
        out.key_value_indented("Stack", &self.stack);
        out.key_value_indented("Classes", &self.class_count.to_string());
        out.key_value_indented("Relationships", &self.relationship_count.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::RecordingOutput;

    fn report(errors: Vec<String>) -> CheckReport {
        CheckReport {
            config_path: PathBuf::from("kiln.toml"),
            project_name: "shop".into(),
            stack: "django".into(),
            class_count: 3,
            relationship_count: 2,
            errors,
            warnings: vec!["class 'Tag' declares no attributes".into()],
            infos: Vec::new(),
        }
    }

    #[test]
    fn test_valid_report() {
        let report = report(Vec::new());
        assert!(report.is_valid());

        let mut out = RecordingOutput::default();
        report.render(&mut out);
        let text = out.text();
        assert!(text.contains("✓ kiln.toml is valid"));
        assert!(text.contains("  Classes: 3\n  Relationships: 2"));
    }

    #[test]
    fn test_invalid_report() {
        let report = report(vec!["class 'Order' has a relationship to unknown class 'Ledger'".into()]);
        assert!(!report.is_valid());

        let mut out = RecordingOutput::default();
        report.render(&mut out);
        let text = out.text();
        assert!(text.starts_with("error: class 'Order'"));
        assert!(text.ends_with("✗ kiln.toml has 1 error"));
    }
}
