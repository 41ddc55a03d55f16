//! The seam between planning and rendering.
//!
//! A [`StackAdapter`] turns class plans into source text for one target
//! stack. Adapters are plain values handed to [`generate`](crate::generation::generate);
//! there is no global registry.

mod adapter;
mod layout;
mod naming;
mod types;

pub use adapter::StackAdapter;
pub use layout::Layout;
pub use naming::NamingConvention;
pub use types::TypeTable;
