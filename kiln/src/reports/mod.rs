//! Report data structures for commands.
//!
//! Commands build reports, then render them to an Output target.

mod check;
mod explain;
mod generate;
mod output;

pub use check::CheckReport;
pub use explain::{ClassInfo, ExplainReport, FailedClass, LintInfo, PhaseInfo, ProjectInfo};
pub use generate::{
    GenerateReport, GenerationResult, PreviewFile, PreviewResult, SkippedClass, WrittenResult,
};
#[cfg(test)]
pub use output::RecordingOutput;
pub use output::{Report, TerminalOutput};
