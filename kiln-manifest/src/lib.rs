//! Manifest parsing and validation for the kiln backend generator.
//!
//! A `kiln.toml` declares the project, the global generation conventions,
//! the classes to generate and optional per-class overrides:
//!
//! ```toml
//! [project]
//! name = "shop"
//! stack = "spring"
//! package = "com.example.shop"
//!
//! [metadata]
//! audit_fields = true
//!
//! [classes.Order]
//! [[classes.Order.attributes]]
//! name = "status"
//! type = "String"
//!
//! [overrides.Order]
//! soft_delete = true
//! ```

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod error;
mod manifest;

pub use error::{Error, Result, SourceContext};
pub use manifest::{
    AttributeDef, ClassDef, KilnToml, Manifest, MetadataConfig, OverrideDef, ParseContext,
    ProjectConfig, RelationshipDef, Stack, TablePrefix, parse_manifest,
};
