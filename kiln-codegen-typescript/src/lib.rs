//! TypeScript stack adapter for the kiln backend generator.
//!
//! Renders TypeORM entities and repositories, plain service classes and
//! Express routers.
//!
//! ```ignore
//! use kiln_codegen::{generation::generate, pipeline::Pipeline};
//! use kiln_codegen_typescript::TypeScriptAdapter;
//!
//! let ctx = Pipeline::new().run(manifest)?;
//! let outcome = generate(&ctx, &TypeScriptAdapter)?;
//! ```
//!
//! # Generated Output
//!
//! Per class, below `src/`:
//!
//! - `entities/order.entity.ts`
//! - `repositories/order.repository.ts`
//! - `services/order.service.ts`
//! - `controllers/order.controller.ts`
//!
//! State enums live next to the entities (e.g. `entities/order-status.ts`)
//! and export the enum together with a `canTransition(from, to)` function.

mod adapter;
mod naming;
mod ts;
mod type_mapper;
mod vocabulary;

pub mod files;

pub use adapter::TypeScriptAdapter;
pub use naming::TS_NAMING;
pub use type_mapper::TS_TYPES;
