//! Validation context and utilities for manifest parsing.

use std::sync::Arc;

use miette::SourceSpan;

use crate::{Result, error::SourceContext};

/// Parsing and validation context that carries source information.
///
/// Holds the source content, filename, and current path through the
/// manifest hierarchy so nested validation can point at the right place.
///
/// # Example
///
/// ```ignore
/// let ctx = ParseContext::new(src, "kiln.toml");
/// ctx.validate_name("Order", "class")?;
///
/// let nested = ctx.push("Order");
/// nested.validate_name("status", "attribute")?;
/// ```
#[derive(Debug, Clone)]
pub struct ParseContext<'a> {
    source: Arc<SourceContext>,
    path: Vec<&'a str>,
}

impl<'a> ParseContext<'a> {
    /// Create a new parse context with the given source and filename.
    pub fn new(src: &str, filename: &str) -> Self {
        Self {
            source: Arc::new(SourceContext::new(src, filename)),
            path: Vec::new(),
        }
    }

    /// Get the source context for error creation.
    pub fn source_context(&self) -> &SourceContext {
        &self.source
    }

    /// Push a path segment and return a new context.
    pub fn push(&self, segment: &'a str) -> Self {
        let mut path = self.path.clone();
        path.push(segment);
        Self {
            source: Arc::clone(&self.source),
            path,
        }
    }

    /// Get the current path as a dot-separated string.
    pub fn path_string(&self) -> String {
        self.path.join(".")
    }

    /// Get a context description for error messages, e.g. "attribute in 'Order'".
    pub fn context_for(&self, kind: &str) -> String {
        if self.path.is_empty() {
            kind.to_string()
        } else {
            format!("{} in '{}'", kind, self.path_string())
        }
    }

    /// Find the span of a name in the source.
    pub fn find_span(&self, name: &str) -> Option<SourceSpan> {
        find_name_spans(self.source.src(), name).into_iter().next()
    }

    /// Validate that a name is a valid identifier.
    pub fn validate_name(&self, name: &str, kind: &str) -> Result<()> {
        if let Some(reason) = validate_identifier(name) {
            return Err(self.source.invalid_identifier_error(
                name,
                self.context_for(kind),
                reason,
                self.find_span(name),
            ));
        }
        Ok(())
    }
}

/// Find every span where `name` appears as a table key or a `name = "..."` value.
pub(crate) fn find_name_spans(src: &str, name: &str) -> Vec<SourceSpan> {
    if name.is_empty() {
        return Vec::new();
    }

    let mut spans = Vec::new();

    // Table headers: [classes.Order] or [classes.Order.something]
    for pattern in [format!(".{}]", name), format!(".{}.", name)] {
        for (pos, _) in src.match_indices(&pattern) {
            spans.push(SourceSpan::from((pos + 1, name.len())));
        }
    }

    // Array entries: name = "status"
    for quote in ['"', '\''] {
        let pattern = format!("name = {quote}{name}{quote}");
        for (pos, _) in src.match_indices(&pattern) {
            spans.push(SourceSpan::from((pos + 8, name.len())));
        }
    }

    spans.sort_by_key(|s| s.offset());
    spans
}

/// Validate that a name is a usable identifier in every target stack.
/// Returns None if valid, Some(reason) if invalid.
pub(crate) fn validate_identifier(name: &str) -> Option<&'static str> {
    let mut chars = name.chars();
    match chars.next() {
        None => return Some("name cannot be empty"),
        Some(c) if !c.is_ascii_alphabetic() => return Some("name must start with a letter"),
        _ => {}
    }

    if chars.any(|c| !(c.is_ascii_alphanumeric() || c == '_')) {
        return Some("name contains invalid characters");
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier() {
        assert!(validate_identifier("Order").is_none());
        assert!(validate_identifier("order_item2").is_none());
        assert_eq!(validate_identifier(""), Some("name cannot be empty"));
        assert_eq!(
            validate_identifier("2fa"),
            Some("name must start with a letter")
        );
        assert_eq!(
            validate_identifier("order-item"),
            Some("name contains invalid characters")
        );
    }

    #[test]
    fn test_find_name_spans() {
        let src = r#"
[classes.Order]
[[classes.Order.attributes]]
name = "status"
[[classes.Order.attributes]]
name = "status"
"#;
        let spans = find_name_spans(src, "status");
        assert_eq!(spans.len(), 2);
        assert!(spans[0].offset() < spans[1].offset());
        assert_eq!(&src[spans[0].offset()..spans[0].offset() + 6], "status");

        let class_spans = find_name_spans(src, "Order");
        assert_eq!(&src[class_spans[0].offset()..class_spans[0].offset() + 5], "Order");
    }

    #[test]
    fn test_context_for() {
        let ctx = ParseContext::new("", "kiln.toml");
        assert_eq!(ctx.context_for("class"), "class");
        assert_eq!(
            ctx.push("Order").context_for("attribute"),
            "attribute in 'Order'"
        );
    }
}
