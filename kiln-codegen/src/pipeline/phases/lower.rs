//! Lower phase - transforms the manifest into domain IR.

use eyre::Result;
use indexmap::IndexMap;
use kiln_ir::{
    Attribute, AttributeType, AuditFieldNames, ClassModel, ClassOverrides, DomainIR, GlobalConfig,
    ProjectMeta, Relationship,
};
use kiln_manifest::{ClassDef, Manifest, MetadataConfig, OverrideDef};

use crate::pipeline::{CompilationContext, Diagnostic, Phase};

/// Phase that converts the parsed manifest into the [`DomainIR`] the
/// generators consume. Does nothing when the context already holds an IR.
pub struct LowerPhase;

impl Phase for LowerPhase {
    fn name(&self) -> &'static str {
        "lower"
    }

    fn description(&self) -> &'static str {
        "Transform the manifest into domain IR"
    }

    fn run(&self, ctx: &mut CompilationContext) -> Result<()> {
        if ctx.ir.is_some() {
            return Ok(());
        }
        let Some(manifest) = &ctx.manifest else {
            eyre::bail!("nothing to lower: the context has neither a manifest nor an IR");
        };

        let mut diagnostics = Vec::new();
        let ir = lower_manifest(manifest, &mut diagnostics);
        tracing::debug!(classes = ir.classes.len(), "lowered manifest");
        ctx.diagnostics.extend(diagnostics);
        ctx.ir = Some(ir);
        Ok(())
    }
}

/// Lower a manifest into domain IR.
pub fn lower_manifest(manifest: &Manifest, diagnostics: &mut Vec<Diagnostic>) -> DomainIR {
    let classes = manifest
        .classes
        .iter()
        .map(|(name, def)| lower_class(name, def))
        .collect();

    let mut overrides = IndexMap::new();
    for (name, def) in &manifest.overrides {
        if !manifest.has_class(name) {
            diagnostics.push(
                Diagnostic::warning(
                    "lower",
                    format!("overrides for '{}' match no declared class", name),
                )
                .with_code("unknown-override")
                .at(format!("overrides.{}", name)),
            );
            continue;
        }
        let lowered = lower_overrides(def);
        for key in &lowered.ignored_keys {
            diagnostics.push(
                Diagnostic::info("lower", format!("ignoring unknown override key '{}'", key))
                    .with_code("ignored-key")
                    .for_class(name)
                    .at(format!("overrides.{}.{}", name, key)),
            );
        }
        overrides.insert(name.clone(), lowered);
    }

    DomainIR {
        meta: ProjectMeta {
            name: manifest.project.name.clone(),
            package: manifest.project.package.clone(),
            app: manifest.project.app.clone(),
        },
        classes,
        config: lower_config(&manifest.metadata),
        overrides,
    }
}

fn lower_class(name: &str, def: &ClassDef) -> ClassModel {
    let attributes = def
        .attributes
        .iter()
        .map(|attr| Attribute {
            name: attr.name.clone(),
            ty: AttributeType::parse(&attr.ty),
            nullable: attr.nullable,
            unique: attr.unique,
        })
        .collect();

    let relationships = def
        .relationships
        .iter()
        .map(|rel| Relationship {
            source_class: name.to_string(),
            target_class: rel.target.clone(),
            cardinality: rel.cardinality,
            target_field_name: rel.field.clone(),
            inverse_field_name: rel.inverse_field.clone(),
        })
        .collect();

    ClassModel {
        name: name.to_string(),
        attributes,
        relationships,
        stateful: def.stateful || def.state_enum.is_some(),
        state_enum_name: def.state_enum.clone(),
    }
}

/// Apply the manifest's `[metadata]` table over the built-in defaults.
fn lower_config(meta: &MetadataConfig) -> GlobalConfig {
    let defaults = GlobalConfig::default();
    let names = AuditFieldNames::default();

    GlobalConfig {
        id_strategy: meta.id_strategy.unwrap_or(defaults.id_strategy),
        id_type: meta.id_type,
        id_column: meta.id_column.clone().unwrap_or(defaults.id_column),
        table_naming: meta.table_naming.unwrap_or(defaults.table_naming),
        column_naming: meta.column_naming.unwrap_or(defaults.column_naming),
        route_naming: meta.route_naming.unwrap_or(defaults.route_naming),
        schema: meta.schema.clone().unwrap_or(defaults.schema),
        table_prefix: meta.table_prefix.as_ref().and_then(|p| p.resolve()),
        route_prefix: meta.route_prefix.clone().unwrap_or(defaults.route_prefix),
        audit_fields: meta.audit_fields.unwrap_or(defaults.audit_fields),
        audit_names: AuditFieldNames {
            created_at: meta.created_at_field.clone().unwrap_or(names.created_at),
            updated_at: meta.updated_at_field.clone().unwrap_or(names.updated_at),
            created_by: meta.created_by_field.clone().unwrap_or(names.created_by),
            updated_by: meta.updated_by_field.clone().unwrap_or(names.updated_by),
            version: meta.version_field.clone().unwrap_or(names.version),
        },
        versioning: meta.versioning,
        soft_delete: meta.soft_delete.unwrap_or(defaults.soft_delete),
        soft_delete_field: meta
            .soft_delete_field
            .clone()
            .unwrap_or(defaults.soft_delete_field),
        cache: meta.cache.unwrap_or(defaults.cache),
        cache_ttl_seconds: meta.cache_ttl_seconds.unwrap_or(defaults.cache_ttl_seconds),
        cascade: meta.cascade.unwrap_or(defaults.cascade),
        fetch: meta.fetch.unwrap_or(defaults.fetch),
        orphan_removal: meta.orphan_removal.unwrap_or(defaults.orphan_removal),
        bidirectional: meta.bidirectional.unwrap_or(defaults.bidirectional),
        recent_lookback: meta.recent_lookback.unwrap_or(defaults.recent_lookback),
        history: meta.history.unwrap_or(defaults.history),
    }
}

fn lower_overrides(def: &OverrideDef) -> ClassOverrides {
    ClassOverrides {
        id_strategy: def.id_strategy,
        id_type: def.id_type,
        id_column: def.id_column.clone(),
        table_name: def.table_name.clone(),
        table_naming: def.table_naming,
        column_naming: def.column_naming,
        route_naming: def.route_naming,
        route: def.route.clone(),
        schema: def.schema.clone(),
        audit_fields: def.audit_fields,
        versioning: def.versioning,
        soft_delete: def.soft_delete,
        soft_delete_field: def.soft_delete_field.clone(),
        cache: def.cache,
        cache_ttl_seconds: def.cache_ttl_seconds,
        cascade: def.cascade,
        fetch: def.fetch,
        orphan_removal: def.orphan_removal,
        bidirectional: def.bidirectional,
        recent_lookback: def.recent_lookback,
        history: def.history,
        role: def.role,
        delivered_state: def.delivered_state.clone(),
        picked_up_state: def.picked_up_state.clone(),
        ignored_keys: def.unknown_keys(),
    }
}

#[cfg(test)]
mod tests {
    use kiln_core::NamingStyle;
    use kiln_ir::{Cardinality, IdStrategy, SemanticType};

    use super::*;

    fn lower(content: &str) -> (DomainIR, Vec<Diagnostic>) {
        let manifest: Manifest = content.parse().expect("Failed to parse test manifest");
        let mut diagnostics = Vec::new();
        let ir = lower_manifest(&manifest, &mut diagnostics);
        (ir, diagnostics)
    }

    #[test]
    fn test_lower_classes() {
        let (ir, diagnostics) = lower(
            r#"
            [project]
            name = "shop"
            stack = "spring"
            package = "com.example.shop"

            [classes.Customer]
            [[classes.Customer.attributes]]
            name = "email"
            unique = true
            [[classes.Customer.relationships]]
            target = "Order"
            cardinality = "one-to-many"

            [classes.Order]
            state_enum = "OrderState"
            [[classes.Order.attributes]]
            name = "total"
            type = "Decimal"
            nullable = false
        "#,
        );

        assert!(diagnostics.is_empty());
        assert_eq!(ir.meta.package.as_deref(), Some("com.example.shop"));
        assert_eq!(ir.classes.len(), 2);

        let customer = ir.find_class("Customer").unwrap();
        assert!(customer.attributes[0].unique);
        assert_eq!(customer.attributes[0].ty, AttributeType::Known(SemanticType::String));
        assert_eq!(customer.relationships[0].source_class, "Customer");
        assert_eq!(customer.relationships[0].cardinality, Cardinality::OneToMany);

        let order = ir.find_class("Order").unwrap();
        assert!(order.is_stateful());
        assert_eq!(order.state_enum().as_deref(), Some("OrderState"));
        assert!(!order.attributes[0].nullable);
    }

    #[test]
    fn test_lower_config() {
        let (ir, _) = lower(
            r#"
            [project]
            name = "shop"
            stack = "django"

            [metadata]
            id_strategy = "sequence"
            table_naming = "PascalCase"
            table_prefix = "app_"
            audit_fields = true
            created_by_field = "author"
        "#,
        );

        assert_eq!(ir.config.id_strategy, IdStrategy::Sequence);
        assert_eq!(ir.config.table_naming, NamingStyle::Pascal);
        assert_eq!(ir.config.table_prefix.as_deref(), Some("app_"));
        assert!(ir.config.audit_fields);
        assert_eq!(ir.config.audit_names.created_by, "author");
        assert_eq!(ir.config.audit_names.updated_by, "updatedBy");
        assert_eq!(ir.config.column_naming, NamingStyle::Snake);
    }

    #[test]
    fn test_lower_overrides() {
        let (ir, diagnostics) = lower(
            r#"
            [project]
            name = "shop"
            stack = "typescript"

            [classes.Order]

            [overrides.Order]
            soft_delete = true
            shard_key = "tenant"

            [overrides.Ghost]
            soft_delete = true
        "#,
        );

        let overrides = ir.overrides_for("Order").unwrap();
        assert_eq!(overrides.soft_delete, Some(true));
        assert_eq!(overrides.ignored_keys, vec!["shard_key".to_string()]);
        assert!(ir.overrides_for("Ghost").is_none());

        let codes: Vec<_> = diagnostics.iter().filter_map(|d| d.code.as_deref()).collect();
        assert_eq!(codes, vec!["ignored-key", "unknown-override"]);
    }

    #[test]
    fn test_lower_skips_existing_ir() {
        let ir = DomainIR::new(ProjectMeta::new("prebuilt"));
        let mut ctx = CompilationContext::from_ir(ir);
        LowerPhase.run(&mut ctx).unwrap();
        assert_eq!(ctx.ir().unwrap().meta.name, "prebuilt");
    }
}
