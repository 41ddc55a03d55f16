//! Built-in pipeline phases.
//!
//! - [`LowerPhase`] - transforms the manifest into domain IR
//! - [`ValidatePhase`] - runs lints over the IR
//! - [`ResolvePhase`] - resolves effective metadata per class
//! - [`RelatePhase`] - derives relation ends between live classes
//! - [`PlanPhase`] - plans the four artifacts of every live class

mod lower;
mod plan;
mod relate;
mod resolve;
mod validate;

pub use lower::{LowerPhase, lower_manifest};
pub use plan::PlanPhase;
pub use relate::RelatePhase;
pub use resolve::ResolvePhase;
pub use validate::{
    ClassNamingLint, DuplicateClassLint, EmptyClassLint, Lint, LintInfo, UnusedStateEnumLint,
    ValidatePhase,
};
