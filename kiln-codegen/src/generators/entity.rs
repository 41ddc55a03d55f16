//! Entity generator: the fields and mappings of one entity.

use std::collections::{HashMap, HashSet};

use kiln_ir::{
    AttributeType, CacheSpec, ClassModel, EffectiveMetadata, IdSpec, SemanticType, SoftDeleteSpec,
};

use super::FieldType;
use crate::{ConfigurationError, pipeline::Diagnostic, relations::RelationEnd};

/// Role of a field within the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Id,
    Attribute,
    State,
    Relation,
    CreatedAt,
    UpdatedAt,
    CreatedBy,
    UpdatedBy,
    Version,
    DeletedAt,
}

impl FieldKind {
    /// Whether the field is filled in by the persistence layer or services
    /// rather than by callers.
    pub fn is_managed(&self) -> bool {
        !matches!(
            self,
            FieldKind::Attribute | FieldKind::State | FieldKind::Relation
        )
    }
}

/// One field of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityField {
    pub name: String,
    pub column: String,
    pub kind: FieldKind,
    pub ty: FieldType,
    pub nullable: bool,
    pub unique: bool,
    pub relation: Option<RelationEnd>,
}

impl EntityField {
    fn managed(name: &str, meta: &EffectiveMetadata, kind: FieldKind, ty: FieldType) -> Self {
        Self {
            name: name.to_string(),
            column: meta.column(name),
            kind,
            ty,
            nullable: !matches!(
                kind,
                FieldKind::CreatedAt | FieldKind::UpdatedAt | FieldKind::Version
            ),
            unique: false,
            relation: None,
        }
    }

    /// Whether the stack should store this field as a structured blob.
    pub fn is_structured(&self) -> bool {
        self.ty == FieldType::Scalar(SemanticType::Json)
    }
}

/// Structured description of one entity artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpec {
    pub class_name: String,
    pub table_name: String,
    pub schema: String,
    pub id: IdSpec,
    /// Fields in declaration order, id first.
    pub fields: Vec<EntityField>,
    /// Set when rows are soft deleted; renderers emit "exclude deleted" markers.
    pub soft_delete: Option<SoftDeleteSpec>,
    pub cache: Option<CacheSpec>,
    pub state_enum: Option<String>,
}

impl EntitySpec {
    pub fn field(&self, name: &str) -> Option<&EntityField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn fields_of(&self, kind: FieldKind) -> impl Iterator<Item = &EntityField> {
        self.fields.iter().filter(move |f| f.kind == kind)
    }

    pub fn excludes_deleted(&self) -> bool {
        self.soft_delete.is_some()
    }

    pub fn is_versioned(&self) -> bool {
        self.fields_of(FieldKind::Version).next().is_some()
    }
}

/// Plan the entity for `class`.
///
/// Unknown attribute types fall back to the String mapping and record an
/// `unsupported-type` warning. Two fields with the same name, or two fields
/// stored in the same column, fail the class.
pub fn plan_entity(
    class: &ClassModel,
    meta: &EffectiveMetadata,
    ends: &[RelationEnd],
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<EntitySpec, ConfigurationError> {
    let state = meta.capabilities.state.as_ref();
    let mut fields = vec![EntityField {
        name: meta.id.field.clone(),
        column: meta.id.column.clone(),
        kind: FieldKind::Id,
        ty: FieldType::Id(meta.id.id_type),
        nullable: false,
        unique: true,
        relation: None,
    }];

    for attr in &class.attributes {
        let (kind, ty) = match (state, &attr.ty) {
            (Some(state), _) if attr.name == state.field => {
                (FieldKind::State, FieldType::State(state.enum_name.clone()))
            }
            (_, AttributeType::Known(ty)) => (FieldKind::Attribute, FieldType::Scalar(*ty)),
            (_, AttributeType::Unknown(declared)) => {
                tracing::warn!(
                    class = %class.name,
                    attribute = %attr.name,
                    declared = %declared,
                    "unsupported type, falling back to String"
                );
                diagnostics.push(
                    Diagnostic::warning(
                        "plan",
                        format!(
                            "attribute '{}' has unsupported type '{}', generated as String",
                            attr.name, declared
                        ),
                    )
                    .with_code("unsupported-type")
                    .for_class(&class.name)
                    .at(format!("classes.{}.attributes.{}", class.name, attr.name)),
                );
                (FieldKind::Attribute, FieldType::Fallback(declared.clone()))
            }
        };
        fields.push(EntityField {
            name: attr.name.clone(),
            column: meta.column(&attr.name),
            kind,
            ty,
            nullable: attr.nullable,
            unique: attr.unique,
            relation: None,
        });
    }

    if let Some(state) = state
        && class.find_attribute(&state.field).is_none()
    {
        fields.push(EntityField {
            name: state.field.clone(),
            column: meta.column(&state.field),
            kind: FieldKind::State,
            ty: FieldType::State(state.enum_name.clone()),
            nullable: false,
            unique: false,
            relation: None,
        });
    }

    for end in ends {
        fields.push(EntityField {
            name: end.field.clone(),
            column: end
                .join_column
                .clone()
                .unwrap_or_else(|| meta.column(&end.field)),
            kind: FieldKind::Relation,
            ty: FieldType::Entity {
                target: end.target.clone(),
                collection: end.is_collection(),
            },
            nullable: true,
            unique: false,
            relation: Some(end.clone()),
        });
    }

    if let Some(audit) = &meta.audit {
        let date = || FieldType::Scalar(SemanticType::Date);
        let actor = || FieldType::Scalar(SemanticType::String);
        fields.extend([
            EntityField::managed(&audit.created_at, meta, FieldKind::CreatedAt, date()),
            EntityField::managed(&audit.updated_at, meta, FieldKind::UpdatedAt, date()),
            EntityField::managed(&audit.created_by, meta, FieldKind::CreatedBy, actor()),
            EntityField::managed(&audit.updated_by, meta, FieldKind::UpdatedBy, actor()),
        ]);
    }

    if let Some(version) = &meta.version_field {
        fields.push(EntityField::managed(
            version,
            meta,
            FieldKind::Version,
            FieldType::Scalar(SemanticType::Long),
        ));
    }

    if let Some(soft_delete) = &meta.soft_delete {
        let mut field = EntityField::managed(
            &soft_delete.field,
            meta,
            FieldKind::DeletedAt,
            FieldType::Scalar(SemanticType::Date),
        );
        field.column = soft_delete.column.clone();
        fields.push(field);
    }

    let mut seen = HashSet::new();
    if let Some(dup) = fields.iter().find(|f| !seen.insert(f.name.as_str())) {
        return Err(ConfigurationError::FieldCollision {
            class: class.name.clone(),
            field: dup.name.clone(),
        });
    }

    // Only foreign-key ends occupy a column of this table
    let mut columns: HashMap<&str, &str> = HashMap::new();
    let stored = |f: &&EntityField| f.relation.as_ref().is_none_or(RelationEnd::bears_foreign_key);
    for field in fields.iter().filter(stored) {
        if let Some(first) = columns.insert(field.column.as_str(), field.name.as_str()) {
            return Err(ConfigurationError::ColumnCollision {
                class: class.name.clone(),
                column: field.column.clone(),
                first: first.to_string(),
                second: field.name.clone(),
            });
        }
    }

    Ok(EntitySpec {
        class_name: class.name.clone(),
        table_name: meta.table_name.clone(),
        schema: meta.schema.clone(),
        id: meta.id.clone(),
        fields,
        soft_delete: meta.soft_delete.clone(),
        cache: meta.cache,
        state_enum: state.map(|s| s.enum_name.clone()),
    })
}

#[cfg(test)]
mod tests {
    use kiln_ir::{Attribute, Cardinality, GlobalConfig, IdType};

    use super::*;
    use crate::{metadata::resolve, relations::RelationGraph};

    fn plan(class: &ClassModel, config: &GlobalConfig) -> (EntitySpec, Vec<Diagnostic>) {
        let meta = resolve(class, config, None).unwrap();
        let mut diagnostics = Vec::new();
        let spec = plan_entity(class, &meta, &[], &mut diagnostics).unwrap();
        (spec, diagnostics)
    }

    fn audited() -> GlobalConfig {
        GlobalConfig {
            audit_fields: true,
            ..GlobalConfig::default()
        }
    }

    #[test]
    fn test_order_scenario() {
        let order =
            ClassModel::new("Order").attribute(Attribute::new("status", SemanticType::String));
        let (spec, diagnostics) = plan(&order, &audited());

        assert_eq!(
            spec.field_names(),
            vec![
                "id",
                "status",
                "createdAt",
                "updatedAt",
                "createdBy",
                "updatedBy",
                "version"
            ]
        );
        assert!(diagnostics.is_empty());
        assert!(!spec.excludes_deleted());

        // The declared status is retyped, not duplicated
        let status = spec.field("status").unwrap();
        assert_eq!(status.kind, FieldKind::State);
        assert_eq!(status.ty, FieldType::State("OrderStatus".into()));
    }

    #[test]
    fn test_audit_fields_present() {
        let (spec, _) = plan(&ClassModel::new("Invoice"), &audited());
        for kind in [FieldKind::CreatedAt, FieldKind::UpdatedAt, FieldKind::Version] {
            assert_eq!(spec.fields_of(kind).count(), 1, "missing {:?}", kind);
        }
        assert!(!spec.field("createdAt").unwrap().nullable);
        assert_eq!(spec.field("createdAt").unwrap().column, "created_at");
    }

    #[test]
    fn test_declared_stateful_adds_status() {
        let parcel = ClassModel::new("Parcel").with_state(Some("ParcelState"));
        let (spec, _) = plan(&parcel, &GlobalConfig::default());

        let status = spec.field("status").unwrap();
        assert_eq!(status.ty, FieldType::State("ParcelState".into()));
        assert_eq!(spec.state_enum.as_deref(), Some("ParcelState"));
    }

    #[test]
    fn test_soft_delete_field() {
        let config = GlobalConfig {
            soft_delete: true,
            ..GlobalConfig::default()
        };
        let (spec, _) = plan(&ClassModel::new("Tag"), &config);

        let deleted = spec.field("deletedAt").unwrap();
        assert_eq!(deleted.kind, FieldKind::DeletedAt);
        assert!(deleted.nullable);
        assert_eq!(deleted.column, "deleted_at");
        assert!(spec.excludes_deleted());
    }

    #[test]
    fn test_unknown_type_falls_back() {
        let product =
            ClassModel::new("Product").attribute(Attribute::new("price", AttributeType::parse("Money")));
        let (spec, diagnostics) = plan(&product, &GlobalConfig::default());

        let price = spec.field("price").unwrap();
        assert_eq!(price.ty, FieldType::Fallback("Money".into()));
        assert_eq!(price.ty.semantic(), Some(SemanticType::String));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].severity.is_warning());
        assert_eq!(diagnostics[0].code.as_deref(), Some("unsupported-type"));
    }

    #[test]
    fn test_json_is_structured() {
        let event =
            ClassModel::new("Event").attribute(Attribute::new("payload", SemanticType::Json));
        let (spec, _) = plan(&event, &GlobalConfig::default());
        assert!(spec.field("payload").unwrap().is_structured());
    }

    #[test]
    fn test_id_field() {
        let config = GlobalConfig {
            id_strategy: kiln_ir::IdStrategy::AutoIncrement,
            id_column: "pk".into(),
            ..GlobalConfig::default()
        };
        let (spec, _) = plan(&ClassModel::new("Tag"), &config);
        let id = &spec.fields[0];
        assert_eq!(id.kind, FieldKind::Id);
        assert_eq!(id.ty, FieldType::Id(IdType::Long));
        assert_eq!(id.column, "pk");
    }

    #[test]
    fn test_collision_with_audit_field() {
        let invoice = ClassModel::new("Invoice")
            .attribute(Attribute::new("createdAt", SemanticType::Date));
        let meta = resolve(&invoice, &audited(), None).unwrap();
        let err = plan_entity(&invoice, &meta, &[], &mut Vec::new()).unwrap_err();

        assert_eq!(
            err,
            ConfigurationError::FieldCollision {
                class: "Invoice".into(),
                field: "createdAt".into(),
            }
        );
    }

    #[test]
    fn test_parent_child_fields() {
        let classes = vec![
            ClassModel::new("Parent").relationship("Child", Cardinality::OneToMany),
            ClassModel::new("Child"),
        ];
        let config = GlobalConfig::default();
        let metadata: indexmap::IndexMap<_, _> = classes
            .iter()
            .map(|c| (c.name.clone(), resolve(c, &config, None).unwrap()))
            .collect();
        let graph = RelationGraph::build(&classes, &metadata);

        let parent = plan_entity(
            &classes[0],
            &metadata["Parent"],
            graph.ends_for("Parent"),
            &mut Vec::new(),
        )
        .unwrap();
        let children = parent.field("children").unwrap();
        assert_eq!(
            children.ty,
            FieldType::Entity {
                target: "Child".into(),
                collection: true
            }
        );

        let child = plan_entity(
            &classes[1],
            &metadata["Child"],
            graph.ends_for("Child"),
            &mut Vec::new(),
        )
        .unwrap();
        let parent_field = child.field("parent").unwrap();
        assert_eq!(parent_field.column, "parent_id");
        assert_eq!(
            parent_field.relation.as_ref().unwrap().foreign_key.as_deref(),
            Some("fk_child_parent")
        );
    }

    #[test]
    fn test_foreign_key_column_collision() {
        let classes = vec![
            ClassModel::new("Parent"),
            ClassModel::new("Child")
                .attribute(Attribute::new("parentId", SemanticType::Long).unique())
                .relationship("Parent", Cardinality::ManyToOne),
        ];
        let config = GlobalConfig::default();
        let metadata: indexmap::IndexMap<_, _> = classes
            .iter()
            .map(|c| (c.name.clone(), resolve(c, &config, None).unwrap()))
            .collect();
        let graph = RelationGraph::build(&classes, &metadata);

        let err = plan_entity(
            &classes[1],
            &metadata["Child"],
            graph.ends_for("Child"),
            &mut Vec::new(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            ConfigurationError::ColumnCollision {
                class: "Child".into(),
                column: "parent_id".into(),
                first: "parentId".into(),
                second: "parent".into(),
            }
        );
        assert_eq!(err.code(), "column-collision");
    }
}
