//! Java file renderers, one per artifact kind.

mod controller;
mod entity;
mod repository;
mod service;

pub use controller::ControllerJava;
pub use entity::EntityJava;
pub use repository::RepositoryJava;
pub use service::ServiceJava;

/// First line of every generated Java file.
pub const GENERATED_HEADER: &str = "// Generated by kiln. Regenerating overwrites this file.";

pub(crate) const JPA: &str = "jakarta.persistence";
pub(crate) const LOMBOK: &str = "lombok";
