//! Metadata resolution: merging conventions and overrides per class.

mod resolver;
mod role;

pub use resolver::{resolve, route_base};
pub use role::{RoleSignals, detect_role};
