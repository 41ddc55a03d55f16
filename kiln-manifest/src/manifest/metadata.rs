//! Generation conventions: `[metadata]` and `[overrides.<Name>]`.

use std::collections::BTreeMap;

use kiln_core::NamingStyle;
use kiln_ir::{CacheStrategy, CascadeType, FetchType, IdStrategy, IdType, LookbackWindow, RoleHint};
use serde::Deserialize;

/// Table prefix setting: `true` for the default `tbl_` prefix, or a custom string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TablePrefix {
    Enabled(bool),
    Custom(String),
}

impl TablePrefix {
    pub const DEFAULT: &'static str = "tbl_";

    /// The prefix to apply, if any.
    pub fn resolve(&self) -> Option<String> {
        match self {
            TablePrefix::Enabled(true) => Some(Self::DEFAULT.to_string()),
            TablePrefix::Enabled(false) => None,
            TablePrefix::Custom(prefix) if prefix.is_empty() => None,
            TablePrefix::Custom(prefix) => Some(prefix.clone()),
        }
    }
}

/// Global conventions. Every key is optional and falls back to the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetadataConfig {
    pub id_strategy: Option<IdStrategy>,
    pub id_type: Option<IdType>,
    pub id_column: Option<String>,
    pub table_naming: Option<NamingStyle>,
    pub column_naming: Option<NamingStyle>,
    pub route_naming: Option<NamingStyle>,
    pub schema: Option<String>,
    pub table_prefix: Option<TablePrefix>,
    pub route_prefix: Option<String>,

    pub audit_fields: Option<bool>,
    pub created_at_field: Option<String>,
    pub updated_at_field: Option<String>,
    pub created_by_field: Option<String>,
    pub updated_by_field: Option<String>,
    pub version_field: Option<String>,
    pub versioning: Option<bool>,

    pub soft_delete: Option<bool>,
    pub soft_delete_field: Option<String>,

    pub cache: Option<CacheStrategy>,
    pub cache_ttl_seconds: Option<u32>,

    pub cascade: Option<CascadeType>,
    pub fetch: Option<FetchType>,
    pub orphan_removal: Option<bool>,
    pub bidirectional: Option<bool>,

    pub recent_lookback: Option<LookbackWindow>,
    pub history: Option<bool>,
}

/// Per-class overrides. Keys that are not recognized are collected in `extra`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OverrideDef {
    pub id_strategy: Option<IdStrategy>,
    pub id_type: Option<IdType>,
    pub id_column: Option<String>,
    pub table_name: Option<String>,
    pub table_naming: Option<NamingStyle>,
    pub column_naming: Option<NamingStyle>,
    pub route_naming: Option<NamingStyle>,
    pub route: Option<String>,
    pub schema: Option<String>,
    pub audit_fields: Option<bool>,
    pub versioning: Option<bool>,
    pub soft_delete: Option<bool>,
    pub soft_delete_field: Option<String>,
    pub cache: Option<CacheStrategy>,
    pub cache_ttl_seconds: Option<u32>,
    pub cascade: Option<CascadeType>,
    pub fetch: Option<FetchType>,
    pub orphan_removal: Option<bool>,
    pub bidirectional: Option<bool>,
    pub recent_lookback: Option<LookbackWindow>,
    pub history: Option<bool>,
    pub role: Option<RoleHint>,
    pub delivered_state: Option<String>,
    pub picked_up_state: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, toml::Value>,
}

impl OverrideDef {
    /// Names of keys this version does not understand.
    pub fn unknown_keys(&self) -> Vec<String> {
        self.extra.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_prefix() {
        assert_eq!(TablePrefix::Enabled(true).resolve().as_deref(), Some("tbl_"));
        assert_eq!(TablePrefix::Enabled(false).resolve(), None);
        assert_eq!(
            TablePrefix::Custom("app_".into()).resolve().as_deref(),
            Some("app_")
        );
    }

    #[test]
    fn test_override_collects_unknown_keys() {
        let def: OverrideDef = toml::from_str(
            r#"
            soft_delete = true
            fetch = "eager"
            shard_key = "tenant"
            "#,
        )
        .unwrap();

        assert_eq!(def.soft_delete, Some(true));
        assert_eq!(def.fetch, Some(FetchType::Eager));
        assert_eq!(def.unknown_keys(), vec!["shard_key".to_string()]);
    }

    #[test]
    fn test_metadata_enums() {
        let config: MetadataConfig = toml::from_str(
            r#"
            id_strategy = "auto-increment"
            table_naming = "PascalCase"
            cascade = "all"
            recent_lookback = "48h"
            table_prefix = true
            "#,
        )
        .unwrap();

        assert_eq!(config.id_strategy, Some(IdStrategy::AutoIncrement));
        assert_eq!(config.table_naming, Some(NamingStyle::Pascal));
        assert_eq!(config.cascade, Some(CascadeType::All));
        assert_eq!(config.recent_lookback.map(|w| w.total_hours()), Some(48));
        assert_eq!(config.table_prefix, Some(TablePrefix::Enabled(true)));
    }
}
