//! Intermediate representation types for the kiln backend generator.
//!
//! These types are the single source of truth consumed by the generation
//! engine.
//!
//! # Architecture
//!
//! ```text
//! kiln.toml (TOML) → kiln-manifest (parsing) → kiln-ir (domain types) → codegen
//! ```
//!
//! The IR is stack-agnostic: nothing here knows about Java, TypeScript or
//! Python.

mod config;
mod domain;
mod metadata;
mod model;

pub use config::{
    AuditFieldNames, CacheStrategy, CascadeType, ClassOverrides, FetchType, GlobalConfig,
    IdStrategy, IdType, LookbackWindow, RoleHint, TimeUnit,
};
pub use domain::{DomainIR, ProjectMeta};
pub use metadata::{
    CacheSpec, Capabilities, DomainRole, EffectiveMetadata, IdSpec, NamingRules,
    RelationDefaults, SoftDeleteSpec, StateCapability,
};
pub use model::{Attribute, AttributeType, Cardinality, ClassModel, Relationship, SemanticType};
