//! Resolved, per-class metadata shared by all generators.

use kiln_core::{NamingStyle, convert};

use crate::config::{
    AuditFieldNames, CacheStrategy, CascadeType, FetchType, IdStrategy, IdType, LookbackWindow,
};

/// Fully merged configuration for one class.
///
/// Computed once per class per run and never mutated afterwards, so every
/// generator agrees on table names, id type and enabled features.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveMetadata {
    pub class_name: String,
    pub table_name: String,
    pub schema: String,
    pub naming: NamingRules,
    /// Route base path, e.g. `/orders`.
    pub route_base: String,
    pub id: IdSpec,
    pub audit: Option<AuditFieldNames>,
    /// Name of the optimistic-locking version field, when versioning is on.
    pub version_field: Option<String>,
    pub soft_delete: Option<SoftDeleteSpec>,
    pub cache: Option<CacheSpec>,
    pub relations: RelationDefaults,
    pub recent_lookback: LookbackWindow,
    pub capabilities: Capabilities,
}

impl EffectiveMetadata {
    /// Column name for a field under the configured column convention.
    pub fn column(&self, field: &str) -> String {
        convert(field, self.naming.column)
    }

    pub fn is_audited(&self) -> bool {
        self.audit.is_some()
    }

    pub fn is_soft_delete(&self) -> bool {
        self.soft_delete.is_some()
    }

    pub fn is_stateful(&self) -> bool {
        self.capabilities.state.is_some()
    }

    pub fn is_versioned(&self) -> bool {
        self.version_field.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamingRules {
    pub table: NamingStyle,
    pub column: NamingStyle,
    pub route: NamingStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSpec {
    pub field: String,
    pub column: String,
    pub strategy: IdStrategy,
    pub id_type: IdType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftDeleteSpec {
    pub field: String,
    pub column: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSpec {
    pub strategy: CacheStrategy,
    pub ttl_seconds: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationDefaults {
    pub cascade: CascadeType,
    pub fetch: FetchType,
    pub orphan_removal: bool,
    pub bidirectional: bool,
}

/// What a class can do, computed once from structural signals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    pub state: Option<StateCapability>,
    /// Service operations append history entries.
    pub history: bool,
    pub role: DomainRole,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateCapability {
    pub enum_name: String,
    pub field: String,
}

/// Well-known entity roles that receive extra domain operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainRole {
    Generic,
    /// Accounts that can be promoted and attached to an organization.
    UserLike,
    /// Trackable items handed over with proof of completion.
    ShipmentLike {
        delivered_state: String,
        picked_up_state: String,
    },
}

impl DomainRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainRole::Generic => "generic",
            DomainRole::UserLike => "user",
            DomainRole::ShipmentLike { .. } => "shipment",
        }
    }
}
