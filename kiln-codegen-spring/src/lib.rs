//! Spring Boot stack adapter for the kiln backend generator.
//!
//! Renders JPA entities, Spring Data repositories, transactional services and
//! Spring Web controllers.
//!
//! ```ignore
//! use kiln_codegen::{generation::generate, pipeline::Pipeline};
//! use kiln_codegen_spring::SpringAdapter;
//!
//! let ctx = Pipeline::new().run(manifest)?;
//! let outcome = generate(&ctx, &SpringAdapter)?;
//! ```
//!
//! # Generated Output
//!
//! Per class, below `src/main/java/<package path>/`:
//!
//! - `entity/Order.java`
//! - `repository/OrderRepository.java`
//! - `service/OrderService.java`
//! - `controller/OrderController.java`
//!
//! State enums (e.g. `OrderStatus`) are expected in the entity package and
//! provide `canTransitionTo`.

mod adapter;
mod java;
mod naming;
mod type_mapper;

pub mod files;

pub use adapter::SpringAdapter;
pub use naming::JAVA_NAMING;
pub use type_mapper::JAVA_TYPES;
