//! TypeORM spelling of relation settings.

use kiln_ir::{CascadeType, FetchType};

/// Value of the `cascade` relation option.
pub fn cascade_option(cascade: CascadeType) -> Option<&'static str> {
    match cascade {
        CascadeType::None | CascadeType::Refresh | CascadeType::Detach => None,
        CascadeType::All => Some("true"),
        CascadeType::Persist => Some("[\"insert\"]"),
        CascadeType::Merge => Some("[\"update\"]"),
        CascadeType::Remove => Some("[\"remove\"]"),
    }
}

/// Value of the `eager` relation option. Lazy is TypeORM's default.
pub fn eager_option(fetch: FetchType) -> Option<&'static str> {
    match fetch {
        FetchType::Eager => Some("true"),
        FetchType::Lazy => None,
    }
}
