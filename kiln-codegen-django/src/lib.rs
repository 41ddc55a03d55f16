//! Django stack adapter for the kiln backend generator.
//!
//! Renders Django models, queryset-backed repositories, plain service
//! classes and Django REST framework views.
//!
//! ```ignore
//! use kiln_codegen::{generation::generate, pipeline::Pipeline};
//! use kiln_codegen_django::DjangoAdapter;
//!
//! let ctx = Pipeline::new().run(manifest)?;
//! let outcome = generate(&ctx, &DjangoAdapter)?;
//! ```
//!
//! # Generated Output
//!
//! Per class, below the app directory (`project.app`, or the snake-cased
//! project name):
//!
//! - `models/order.py`
//! - `repositories/order_repository.py`
//! - `services/order_service.py`
//! - `views/order_views.py`
//!
//! Views modules export `urlpatterns` for inclusion in the project's URL
//! configuration. State enums are expected next to the models (e.g.
//! `models/order_status.py`) as a `TextChoices` class together with a
//! `can_transition(current, target)` function.

mod adapter;
mod naming;
mod py;
mod type_mapper;
mod vocabulary;

pub mod files;

pub use adapter::DjangoAdapter;
pub use naming::PY_NAMING;
pub use type_mapper::PY_TYPES;
