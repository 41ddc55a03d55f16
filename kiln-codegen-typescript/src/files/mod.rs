//! TypeScript file renderers, one per artifact kind.

mod controller_ts;
mod entity_ts;
mod repository_ts;
mod service_ts;

pub use controller_ts::ControllerTs;
pub use entity_ts::EntityTs;
pub use repository_ts::RepositoryTs;
pub use service_ts::ServiceTs;

/// First line of every generated TypeScript file.
pub const GENERATED_HEADER: &str = "// Generated by kiln. Regenerating overwrites this file.";

pub(crate) const TYPEORM: &str = "typeorm";
