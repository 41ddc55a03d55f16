//! Global generation conventions and per-class overrides.

use std::{fmt, str::FromStr};

use kiln_core::NamingStyle;
use serde::{Deserialize, Serialize};

/// How identity values are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdStrategy {
    #[serde(alias = "identity")]
    AutoIncrement,
    Sequence,
    Uuid,
}

impl IdStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdStrategy::AutoIncrement => "auto-increment",
            IdStrategy::Sequence => "sequence",
            IdStrategy::Uuid => "uuid",
        }
    }

    /// The id type implied by this strategy when none is configured.
    pub fn default_id_type(&self) -> IdType {
        match self {
            IdStrategy::Uuid => IdType::Uuid,
            IdStrategy::AutoIncrement | IdStrategy::Sequence => IdType::Long,
        }
    }

    /// Whether this strategy can produce values of `id_type`.
    pub fn supports(&self, id_type: IdType) -> bool {
        match self {
            IdStrategy::Uuid => matches!(id_type, IdType::Uuid | IdType::String),
            IdStrategy::AutoIncrement | IdStrategy::Sequence => {
                matches!(id_type, IdType::Long | IdType::Integer)
            }
        }
    }
}

/// Type of the identity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdType {
    #[serde(alias = "UUID")]
    Uuid,
    #[serde(alias = "Long")]
    Long,
    #[serde(alias = "Integer")]
    Integer,
    #[serde(alias = "String")]
    String,
}

impl IdType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IdType::Uuid => "uuid",
            IdType::Long => "long",
            IdType::Integer => "integer",
            IdType::String => "string",
        }
    }
}

/// Cascade behavior applied to relationship fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CascadeType {
    #[default]
    None,
    All,
    Persist,
    Merge,
    Remove,
    Refresh,
    Detach,
}

impl CascadeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CascadeType::None => "none",
            CascadeType::All => "all",
            CascadeType::Persist => "persist",
            CascadeType::Merge => "merge",
            CascadeType::Remove => "remove",
            CascadeType::Refresh => "refresh",
            CascadeType::Detach => "detach",
        }
    }
}

/// Loading behavior applied to relationship fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchType {
    #[default]
    Lazy,
    Eager,
}

impl FetchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchType::Lazy => "lazy",
            FetchType::Eager => "eager",
        }
    }
}

/// Second-level cache strategy for entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheStrategy {
    #[default]
    None,
    ReadOnly,
    ReadWrite,
    NonstrictReadWrite,
    Transactional,
}

impl CacheStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStrategy::None => "none",
            CacheStrategy::ReadOnly => "read-only",
            CacheStrategy::ReadWrite => "read-write",
            CacheStrategy::NonstrictReadWrite => "nonstrict-read-write",
            CacheStrategy::Transactional => "transactional",
        }
    }
}

/// Explicit domain role requested for a class, bypassing detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleHint {
    Generic,
    User,
    Shipment,
}

/// Unit of a [`LookbackWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Hours,
    Days,
    Weeks,
}

impl TimeUnit {
    pub fn suffix(&self) -> char {
        match self {
            TimeUnit::Hours => 'h',
            TimeUnit::Days => 'd',
            TimeUnit::Weeks => 'w',
        }
    }

    pub fn hours(&self) -> u64 {
        match self {
            TimeUnit::Hours => 1,
            TimeUnit::Days => 24,
            TimeUnit::Weeks => 24 * 7,
        }
    }
}

/// How far back "recent" finders look, written as `7d`, `48h` or `2w`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct LookbackWindow {
    pub amount: u32,
    pub unit: TimeUnit,
}

impl LookbackWindow {
    pub const fn days(amount: u32) -> Self {
        Self {
            amount,
            unit: TimeUnit::Days,
        }
    }

    pub fn total_hours(&self) -> u64 {
        u64::from(self.amount) * self.unit.hours()
    }
}

impl Default for LookbackWindow {
    fn default() -> Self {
        Self::days(7)
    }
}

impl fmt::Display for LookbackWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.suffix())
    }
}

impl FromStr for LookbackWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s.char_indices().last().map_or(0, |(i, _)| i);
        let (digits, unit) = s.split_at(split);
        let unit = match unit {
            "h" => TimeUnit::Hours,
            "d" => TimeUnit::Days,
            "w" => TimeUnit::Weeks,
            _ => {
                return Err(format!(
                    "invalid lookback window '{}', expected a number followed by h, d or w",
                    s
                ));
            }
        };
        let amount: u32 = digits
            .parse()
            .map_err(|_| format!("invalid lookback amount in '{}'", s))?;
        if amount == 0 {
            return Err("lookback window must be greater than zero".to_string());
        }
        Ok(Self { amount, unit })
    }
}

impl TryFrom<String> for LookbackWindow {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Names of the audit fields added to audited entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditFieldNames {
    pub created_at: String,
    pub updated_at: String,
    pub created_by: String,
    pub updated_by: String,
    pub version: String,
}

impl Default for AuditFieldNames {
    fn default() -> Self {
        Self {
            created_at: "createdAt".into(),
            updated_at: "updatedAt".into(),
            created_by: "createdBy".into(),
            updated_by: "updatedBy".into(),
            version: "version".into(),
        }
    }
}

/// Model-level conventions applied to every class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalConfig {
    pub id_strategy: IdStrategy,
    pub id_type: Option<IdType>,
    pub id_column: String,
    pub table_naming: NamingStyle,
    pub column_naming: NamingStyle,
    pub route_naming: NamingStyle,
    pub schema: String,
    pub table_prefix: Option<String>,
    pub route_prefix: String,
    pub audit_fields: bool,
    pub audit_names: AuditFieldNames,
    /// Defaults to `audit_fields` when unset.
    pub versioning: Option<bool>,
    pub soft_delete: bool,
    pub soft_delete_field: String,
    pub cache: CacheStrategy,
    pub cache_ttl_seconds: u32,
    pub cascade: CascadeType,
    pub fetch: FetchType,
    pub orphan_removal: bool,
    pub bidirectional: bool,
    pub recent_lookback: LookbackWindow,
    pub history: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            id_strategy: IdStrategy::Uuid,
            id_type: None,
            id_column: "id".into(),
            table_naming: NamingStyle::Snake,
            column_naming: NamingStyle::Snake,
            route_naming: NamingStyle::Kebab,
            schema: "public".into(),
            table_prefix: None,
            route_prefix: String::new(),
            audit_fields: false,
            audit_names: AuditFieldNames::default(),
            versioning: None,
            soft_delete: false,
            soft_delete_field: "deletedAt".into(),
            cache: CacheStrategy::None,
            cache_ttl_seconds: 3600,
            cascade: CascadeType::None,
            fetch: FetchType::Lazy,
            orphan_removal: false,
            bidirectional: true,
            recent_lookback: LookbackWindow::default(),
            history: true,
        }
    }
}

/// Per-class overrides of [`GlobalConfig`]. Unset fields inherit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassOverrides {
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
    /// Keys present in the override table that no field recognizes.
    pub ignored_keys: Vec<String>,
}
