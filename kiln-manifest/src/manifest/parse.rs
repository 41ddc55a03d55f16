//! Manifest parsing from files and strings.

use std::{collections::HashSet, path::Path, str::FromStr};

use super::{ClassDef, Manifest, validate::ParseContext};
use crate::{Error, Result, error::SourceContext, manifest::validate::find_name_spans};

impl FromStr for Manifest {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        parse_manifest(s, "kiln.toml")
    }
}

impl Manifest {
    /// Parse a kiln.toml file from the given path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Read {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        parse_manifest(&content, &path.display().to_string())
    }

    /// Parse a kiln.toml from a string with a custom filename for error reporting.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        parse_manifest(content, filename)
    }
}

/// Parse a manifest from content with the given filename for error reporting.
pub fn parse_manifest(content: &str, filename: &str) -> Result<Manifest> {
    let source_ctx = SourceContext::new(content, filename);
    let manifest: Manifest = toml::from_str(content).map_err(|e| source_ctx.parse_error(e))?;
    validate_manifest(&manifest, content, filename)?;
    Ok(manifest)
}

/// Validate the manifest after parsing.
///
/// Only structural problems are rejected here. Semantic problems such as a
/// relationship pointing at an unknown class are reported per class by the
/// generation pipeline.
fn validate_manifest(manifest: &Manifest, src: &str, filename: &str) -> Result<()> {
    let ctx = ParseContext::new(src, filename);

    if manifest.project.name.trim().is_empty() {
        return Err(ctx
            .source_context()
            .validation_error("project name cannot be empty", ctx.find_span("name")));
    }

    for (name, class) in &manifest.classes {
        ctx.validate_name(name, "class")?;
        validate_class(&ctx.push(name), name, class)?;
    }

    for name in manifest.overrides.keys() {
        ctx.validate_name(name, "override")?;
    }

    Ok(())
}

fn validate_class(ctx: &ParseContext<'_>, class_name: &str, class: &ClassDef) -> Result<()> {
    if let Some(state_enum) = &class.state_enum {
        ctx.validate_name(state_enum, "state enum")?;
    }

    let mut seen = HashSet::new();
    for attr in &class.attributes {
        ctx.validate_name(&attr.name, "attribute")?;
        if !seen.insert(attr.name.as_str()) {
            let src = ctx.source_context().src();
            let span = find_name_spans(src, &attr.name).into_iter().nth(1);
            return Err(ctx
                .source_context()
                .duplicate_attribute_error(class_name, &attr.name, span));
        }
    }

    for rel in &class.relationships {
        ctx.validate_name(&rel.target, "relationship target")?;
        if let Some(field) = &rel.field {
            ctx.validate_name(field, "relationship field")?;
        }
        if let Some(field) = &rel.inverse_field {
            ctx.validate_name(field, "relationship field")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use kiln_ir::Cardinality;

    use super::*;
    use crate::Stack;

    #[test]
    fn test_parse_minimal() {
        let manifest: Manifest = r#"
            [project]
            name = "shop"
            stack = "spring"
            package = "com.example.shop"

            [classes.Order]
            [[classes.Order.attributes]]
            name = "status"
            type = "String"
        "#
        .parse()
        .unwrap();

        assert_eq!(manifest.project.stack, Stack::Spring);
        assert_eq!(manifest.classes.len(), 1);
        assert_eq!(manifest.classes["Order"].attributes[0].name, "status");
        assert!(manifest.classes["Order"].attributes[0].nullable);
    }

    #[test]
    fn test_classes_keep_declaration_order() {
        let manifest: Manifest = r#"
            [project]
            name = "shop"
            stack = "typescript"

            [classes.Zebra]
            [classes.Apple]
            [classes.Mango]
        "#
        .parse()
        .unwrap();

        let names: Vec<_> = manifest.classes.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Zebra", "Apple", "Mango"]);
    }

    #[test]
    fn test_relationships() {
        let manifest: Manifest = r#"
            [project]
            name = "family"
            stack = "django"

            [classes.Parent]
            [[classes.Parent.relationships]]
            target = "Child"
            cardinality = "one-to-many"

            [classes.Child]
        "#
        .parse()
        .unwrap();

        let rel = &manifest.classes["Parent"].relationships[0];
        assert_eq!(rel.target, "Child");
        assert_eq!(rel.cardinality, Cardinality::OneToMany);
    }

    #[test]
    fn test_dangling_relationship_is_not_a_parse_error() {
        let result: Result<Manifest> = r#"
            [project]
            name = "shop"
            stack = "spring"

            [classes.Order]
            [[classes.Order.relationships]]
            target = "Ghost"
            cardinality = "many-to-one"
        "#
        .parse();

        assert!(result.is_ok());
    }

    #[test]
    fn test_duplicate_attribute() {
        let err = r#"
            [project]
            name = "shop"
            stack = "spring"

            [classes.Order]
            [[classes.Order.attributes]]
            name = "total"
            [[classes.Order.attributes]]
            name = "total"
        "#
        .parse::<Manifest>()
        .unwrap_err();

        assert!(matches!(*err, Error::DuplicateAttribute { .. }));
    }

    #[test]
    fn test_invalid_class_name() {
        let err = r#"
            [project]
            name = "shop"
            stack = "spring"

            [classes.order-item]
        "#
        .parse::<Manifest>()
        .unwrap_err();

        assert!(matches!(*err, Error::InvalidIdentifier { .. }));
    }

    #[test]
    fn test_unknown_cardinality_is_parse_error() {
        let err = r#"
            [project]
            name = "shop"
            stack = "spring"

            [classes.Order]
            [[classes.Order.relationships]]
            target = "Customer"
            cardinality = "one-to-one"
        "#
        .parse::<Manifest>()
        .unwrap_err();

        assert!(matches!(*err, Error::Syntax { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = Manifest::from_file("/nonexistent/kiln.toml").unwrap_err();
        assert!(matches!(*err, Error::Read { .. }));
    }
}
