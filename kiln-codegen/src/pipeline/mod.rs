//! Generation pipeline.
//!
//! A [`Pipeline`] runs the built-in phases over a manifest or a prepared
//! [`DomainIR`](kiln_ir::DomainIR):
//!
//! - lower: manifest to domain IR
//! - validate: lints over the IR
//! - resolve: effective metadata per class
//! - relate: relation ends, failing classes with dangling references
//! - plan: entity, repository, service and controller specs per class
//!
//! Plugins receive a hook before and after each phase. Diagnostics from every
//! phase are collected in the [`CompilationContext`].
//!
//! # Example
//!
//! ```ignore
//! use kiln_codegen::pipeline::Pipeline;
//!
//! let ctx = Pipeline::new().run(manifest)?;
//! for diag in ctx.warnings() {
//!     eprintln!("{}", diag);
//! }
//! ```

mod context;
mod diagnostic;
mod phase;
pub mod phases;
mod plugin;
mod runner;

pub use context::CompilationContext;
pub use diagnostic::{Diagnostic, Severity};
pub use phase::{Phase, PhaseInfo};
pub use plugin::Plugin;
pub use runner::Pipeline;
