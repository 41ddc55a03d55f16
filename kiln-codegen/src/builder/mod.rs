//! Text building shared by the stack renderers.

mod code_builder;

pub use code_builder::CodeBuilder;
