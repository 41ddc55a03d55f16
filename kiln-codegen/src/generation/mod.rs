//! Generation outputs and file management.
//!
//! - [`generate`] - Render every planned class through a stack adapter
//! - [`FileRegistry`] - Collect artifacts and write them to disk
//! - [`ImportCollector`] - Import tracking and deduplication for renderers

mod generator;
mod imports;
mod registry;

pub use generator::{GenerationOutcome, SkippedArtifact, generate};
pub use imports::ImportCollector;
pub use registry::{FileEntry, FileRegistry, PreviewEntry, WriteStats};
