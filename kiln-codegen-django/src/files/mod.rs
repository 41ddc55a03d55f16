//! Python file renderers, one per artifact kind.

mod model;
mod repository;
mod service;
mod views;

pub use model::ModelPy;
pub use repository::RepositoryPy;
pub use service::ServicePy;
pub use views::ViewsPy;

/// First line of every generated Python file.
pub const GENERATED_HEADER: &str = "# Generated by kiln. Regenerating overwrites this file.";

pub(crate) const DJANGO_DB: &str = "django.db";
pub(crate) const DJANGO_MODELS: &str = "django.db.models";
