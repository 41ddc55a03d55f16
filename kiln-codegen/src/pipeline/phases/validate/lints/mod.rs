//! Built-in lints.

mod class_naming;
mod duplicate_class;
mod empty_class;
mod unused_state_enum;

pub use class_naming::ClassNamingLint;
pub use duplicate_class::DuplicateClassLint;
pub use empty_class::EmptyClassLint;
pub use unused_state_enum::UnusedStateEnumLint;
