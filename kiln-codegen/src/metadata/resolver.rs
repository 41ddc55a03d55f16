//! Merge global conventions with per-class overrides.

use kiln_core::{NamingStyle, convert, pluralize};
use kiln_ir::{
    CacheSpec, CacheStrategy, Capabilities, ClassModel, ClassOverrides, DomainRole,
    EffectiveMetadata, GlobalConfig, IdSpec, NamingRules, RelationDefaults, RoleHint,
    SoftDeleteSpec, StateCapability,
};

use super::role::detect_role;
use crate::ConfigurationError;

const STATUS_FIELD: &str = "status";
const DEFAULT_DELIVERED_STATE: &str = "DELIVERED";
const DEFAULT_PICKED_UP_STATE: &str = "PICKED_UP";

/// Resolve the effective metadata for one class.
///
/// Per-class overrides win over global conventions, which win over the
/// built-in defaults. The result only depends on the inputs.
pub fn resolve(
    class: &ClassModel,
    global: &GlobalConfig,
    overrides: Option<&ClassOverrides>,
) -> Result<EffectiveMetadata, ConfigurationError> {
    let inherited = ClassOverrides::default();
    let ov = overrides.unwrap_or(&inherited);
    let conflict = |key: &str, reason: String| ConfigurationError::ConflictingOverride {
        class: class.name.clone(),
        key: key.to_string(),
        reason,
    };

    let naming = NamingRules {
        table: ov.table_naming.unwrap_or(global.table_naming),
        column: ov.column_naming.unwrap_or(global.column_naming),
        route: ov.route_naming.unwrap_or(global.route_naming),
    };

    let strategy = ov.id_strategy.unwrap_or(global.id_strategy);
    let id_type = ov
        .id_type
        .or(global.id_type)
        .unwrap_or_else(|| strategy.default_id_type());
    if !strategy.supports(id_type) {
        return Err(conflict(
            "id_type",
            format!(
                "id strategy '{}' cannot produce {} ids",
                strategy.as_str(),
                id_type.as_str()
            ),
        ));
    }
    let id_column = ov.id_column.as_deref().unwrap_or(&global.id_column);
    let id = IdSpec {
        field: "id".to_string(),
        column: id_column.to_string(),
        strategy,
        id_type,
    };

    let table_name = match &ov.table_name {
        Some(name) => name.clone(),
        None => format!(
            "{}{}",
            global.table_prefix.as_deref().unwrap_or_default(),
            convert(&class.name, naming.table)
        ),
    };

    let route_base = match &ov.route {
        Some(route) => normalize_route(route),
        None => route_base(&global.route_prefix, &class.name, naming.route),
    };

    let audited = ov.audit_fields.unwrap_or(global.audit_fields);
    let audit = audited.then(|| global.audit_names.clone());
    let versioned = ov.versioning.or(global.versioning).unwrap_or(audited);
    let version_field = versioned.then(|| global.audit_names.version.clone());

    let soft_delete = ov
        .soft_delete
        .unwrap_or(global.soft_delete)
        .then(|| {
            let field = ov
                .soft_delete_field
                .clone()
                .unwrap_or_else(|| global.soft_delete_field.clone());
            SoftDeleteSpec {
                column: convert(&field, naming.column),
                field,
            }
        });

    let cache = match ov.cache.unwrap_or(global.cache) {
        CacheStrategy::None => None,
        strategy => Some(CacheSpec {
            strategy,
            ttl_seconds: ov.cache_ttl_seconds.unwrap_or(global.cache_ttl_seconds),
        }),
    };

    let relations = RelationDefaults {
        cascade: ov.cascade.unwrap_or(global.cascade),
        fetch: ov.fetch.unwrap_or(global.fetch),
        orphan_removal: ov.orphan_removal.unwrap_or(global.orphan_removal),
        bidirectional: ov.bidirectional.unwrap_or(global.bidirectional),
    };

    let state = class.state_enum().map(|enum_name| StateCapability {
        enum_name,
        field: STATUS_FIELD.to_string(),
    });

    if ov.role == Some(RoleHint::Shipment) && state.is_none() {
        return Err(conflict(
            "role",
            "the shipment role requires a stateful class".to_string(),
        ));
    }

    let history = state.is_some()
        && ov.history.unwrap_or(global.history)
        && !class.is_audit_entity();

    let role = detect_role(
        class,
        ov.role,
        ov.delivered_state
            .as_deref()
            .unwrap_or(DEFAULT_DELIVERED_STATE),
        ov.picked_up_state
            .as_deref()
            .unwrap_or(DEFAULT_PICKED_UP_STATE),
    );
    if let DomainRole::ShipmentLike {
        delivered_state,
        picked_up_state,
    } = &role
        && delivered_state == picked_up_state
    {
        return Err(conflict(
            "delivered_state",
            format!(
                "delivered and picked-up states are both '{}'",
                delivered_state
            ),
        ));
    }

    Ok(EffectiveMetadata {
        class_name: class.name.clone(),
        table_name,
        schema: ov.schema.clone().unwrap_or_else(|| global.schema.clone()),
        naming,
        route_base,
        id,
        audit,
        version_field,
        soft_delete,
        cache,
        relations,
        recent_lookback: ov.recent_lookback.unwrap_or(global.recent_lookback),
        capabilities: Capabilities {
            state,
            history,
            role,
        },
    })
}

/// Base route for a class: the prefix followed by the pluralized name.
///
/// ```
/// use kiln_codegen::metadata::route_base;
/// use kiln_core::NamingStyle;
///
/// assert_eq!(route_base("", "Order", NamingStyle::Kebab), "/orders");
/// assert_eq!(route_base("/api", "OrderItem", NamingStyle::Kebab), "/api/order-items");
/// ```
pub fn route_base(prefix: &str, class_name: &str, style: NamingStyle) -> String {
    let segment = convert(&pluralize(class_name), style);
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        format!("/{}", segment)
    } else {
        format!("/{}/{}", prefix, segment)
    }
}

fn normalize_route(route: &str) -> String {
    format!("/{}", route.trim_matches('/'))
}

#[cfg(test)]
mod tests {
    use kiln_ir::{
        Attribute, CascadeType, FetchType, IdStrategy, IdType, LookbackWindow, SemanticType,
    };

    use super::*;

    fn order() -> ClassModel {
        ClassModel::new("Order").attribute(Attribute::new("status", SemanticType::String))
    }

    #[test]
    fn test_defaults() {
        let meta = resolve(&order(), &GlobalConfig::default(), None).unwrap();

        assert_eq!(meta.table_name, "order");
        assert_eq!(meta.schema, "public");
        assert_eq!(meta.route_base, "/orders");
        assert_eq!(meta.id.strategy, IdStrategy::Uuid);
        assert_eq!(meta.id.id_type, IdType::Uuid);
        assert_eq!(meta.id.column, "id");
        assert!(!meta.is_audited());
        assert!(!meta.is_versioned());
        assert!(!meta.is_soft_delete());
        assert!(meta.cache.is_none());
        assert_eq!(meta.relations.fetch, FetchType::Lazy);
        assert_eq!(meta.recent_lookback, LookbackWindow::days(7));
    }

    #[test]
    fn test_stateful_capabilities() {
        let meta = resolve(&order(), &GlobalConfig::default(), None).unwrap();
        let state = meta.capabilities.state.as_ref().unwrap();

        assert_eq!(state.enum_name, "OrderStatus");
        assert_eq!(state.field, "status");
        assert!(meta.capabilities.history);
        assert_eq!(meta.capabilities.role, DomainRole::Generic);
    }

    #[test]
    fn test_audit_enables_versioning() {
        let config = GlobalConfig {
            audit_fields: true,
            ..GlobalConfig::default()
        };
        let meta = resolve(&order(), &config, None).unwrap();
        assert!(meta.is_audited());
        assert_eq!(meta.version_field.as_deref(), Some("version"));

        let overrides = ClassOverrides {
            versioning: Some(false),
            ..ClassOverrides::default()
        };
        let meta = resolve(&order(), &config, Some(&overrides)).unwrap();
        assert!(meta.is_audited());
        assert!(!meta.is_versioned());
    }

    #[test]
    fn test_overrides_win() {
        let config = GlobalConfig {
            table_prefix: Some("tbl_".into()),
            cascade: CascadeType::Persist,
            ..GlobalConfig::default()
        };
        let overrides = ClassOverrides {
            id_strategy: Some(IdStrategy::Sequence),
            table_naming: Some(NamingStyle::Pascal),
            cascade: Some(CascadeType::All),
            soft_delete: Some(true),
            soft_delete_field: Some("removedAt".into()),
            route: Some("purchases/".into()),
            ..ClassOverrides::default()
        };
        let meta = resolve(&order(), &config, Some(&overrides)).unwrap();

        assert_eq!(meta.table_name, "tbl_Order");
        assert_eq!(meta.id.id_type, IdType::Long);
        assert_eq!(meta.relations.cascade, CascadeType::All);
        assert_eq!(meta.route_base, "/purchases");
        let soft_delete = meta.soft_delete.unwrap();
        assert_eq!(soft_delete.field, "removedAt");
        assert_eq!(soft_delete.column, "removed_at");
    }

    #[test]
    fn test_conflicting_id_settings() {
        let overrides = ClassOverrides {
            id_strategy: Some(IdStrategy::AutoIncrement),
            id_type: Some(IdType::Uuid),
            ..ClassOverrides::default()
        };
        let err = resolve(&order(), &GlobalConfig::default(), Some(&overrides)).unwrap_err();

        assert!(matches!(
            err,
            ConfigurationError::ConflictingOverride { ref key, .. } if key == "id_type"
        ));
    }

    #[test]
    fn test_shipment_role_requires_state() {
        let overrides = ClassOverrides {
            role: Some(RoleHint::Shipment),
            ..ClassOverrides::default()
        };
        let tag = ClassModel::new("Tag");
        assert!(resolve(&tag, &GlobalConfig::default(), Some(&overrides)).is_err());
    }

    #[test]
    fn test_history_skips_log_classes() {
        let log = ClassModel::new("OrderHistory").with_state(None);
        let meta = resolve(&log, &GlobalConfig::default(), None).unwrap();
        assert!(meta.is_stateful());
        assert!(!meta.capabilities.history);

        let config = GlobalConfig {
            history: false,
            ..GlobalConfig::default()
        };
        let meta = resolve(&order(), &config, None).unwrap();
        assert!(!meta.capabilities.history);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let config = GlobalConfig {
            audit_fields: true,
            soft_delete: true,
            ..GlobalConfig::default()
        };
        let first = resolve(&order(), &config, None).unwrap();
        let second = resolve(&order(), &config, None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_route_base() {
        assert_eq!(route_base("", "Category", NamingStyle::Kebab), "/categories");
        assert_eq!(route_base("/api/", "Person", NamingStyle::Snake), "/api/people");
        assert_eq!(
            route_base("v1", "OrderItem", NamingStyle::Camel),
            "/v1/orderItems"
        );
    }
}
