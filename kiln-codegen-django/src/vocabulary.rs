//! Django spelling of relation settings.

use kiln_ir::{CascadeType, FetchType};

/// `on_delete` handler of a foreign key, when the cascade setting picks one.
/// Other settings fall back to `SET_NULL` or `PROTECT` by nullability.
pub fn on_delete(cascade: CascadeType) -> Option<&'static str> {
    match cascade {
        CascadeType::All | CascadeType::Remove => Some("models.CASCADE"),
        CascadeType::None
        | CascadeType::Persist
        | CascadeType::Merge
        | CascadeType::Refresh
        | CascadeType::Detach => None,
    }
}

/// Queryset method that loads a relation eagerly. Lazy loading is the
/// Django default.
pub fn eager_loader(fetch: FetchType, collection: bool) -> Option<&'static str> {
    match (fetch, collection) {
        (FetchType::Lazy, _) => None,
        (FetchType::Eager, false) => Some("select_related"),
        (FetchType::Eager, true) => Some("prefetch_related"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_on_delete() {
        assert_eq!(on_delete(CascadeType::All), Some("models.CASCADE"));
        assert_eq!(on_delete(CascadeType::Persist), None);
    }

    #[test]
    fn test_eager_loader() {
        assert_eq!(eager_loader(FetchType::Lazy, false), None);
        assert_eq!(eager_loader(FetchType::Eager, false), Some("select_related"));
        assert_eq!(eager_loader(FetchType::Eager, true), Some("prefetch_related"));
    }
}
