//! Generation engine for the kiln backend generator.
//!
//! This crate turns a domain model into entity, repository, service and
//! controller plans, and hands them to a [`StackAdapter`](stack::StackAdapter)
//! for rendering.
//!
//! # Module Organization
//!
//! - [`pipeline`] - Phases from manifest to class plans, with diagnostics
//! - [`metadata`] - Effective metadata and role detection per class
//! - [`relations`] - Relation ends derived from declared relationships
//! - [`generators`] - The four stack-independent artifact plans
//! - [`stack`] - The adapter trait, layouts and type tables
//! - [`generation`] - Rendering through an adapter and writing files
//! - [`builder`] - Indented code building for renderers
//! - [`testing`] - Model fixtures (feature-gated)

pub mod builder;
mod error;
pub mod generation;
pub mod generators;
pub mod metadata;
pub mod pipeline;
pub mod relations;
pub mod stack;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::ConfigurationError;
