//! Core utilities and types for the kiln backend generator.
//!
//! This crate provides the naming transformer, identifier pluralization and
//! the artifact/file primitives shared by every other kiln crate.

mod artifact;
mod file;
mod inflect;
mod naming;

pub use artifact::{ArtifactKind, GeneratedArtifact};
pub use file::{Overwrite, WriteResult, write_file, write_generated};
pub use inflect::pluralize;
pub use naming::{
    NamingStyle, convert, split_words, to_camel_case, to_kebab_case, to_pascal_case,
    to_screaming_snake_case, to_snake_case,
};
