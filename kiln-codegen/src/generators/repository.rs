//! Repository generator: data-access operations for one entity.

use kiln_core::to_pascal_case;
use kiln_ir::{
    AttributeType, ClassModel, DomainRole, EffectiveMetadata, IdType, LookbackWindow,
    SoftDeleteSpec,
};

use super::{FieldType, Param, ParamType, Returns};
use crate::{pipeline::Diagnostic, relations::RelationEnd};

/// Attribute names that always get an exact-match finder.
const SEARCHABLE_NAMES: &[&str] = &["name", "email", "username", "code"];
/// Attribute name suffixes that always get an exact-match finder.
const SEARCHABLE_SUFFIXES: &[&str] = &["Name", "Email", "Code", "Number", "Reference", "Slug"];

const ACCOUNT_TYPE_FIELD: &str = "accountType";

/// What a repository operation does. Renderers turn each variant into the
/// stack's query idiom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    FindById,
    FindAll,
    Save,
    DeleteById,
    /// Sets the deletion timestamp instead of removing the row.
    SoftDeleteById { field: String },
    RestoreById { field: String },
    FindDeleted { field: String },
    FindByField { field: String, unique: bool },
    FindContaining { field: String },
    /// Filter on the foreign key of a relation field.
    FindByRelationId { field: String, column: String },
    FindByStatus { field: String },
    FindByStatusPaged { field: String },
    FindByStatusIn { field: String },
    CountByStatus { field: String },
    FindByDateRange { field: String },
    /// Rows created after now minus the lookback window.
    FindRecentlyCreated { field: String, lookback: LookbackWindow },
    CountRecentlyCreated { field: String, lookback: LookbackWindow },
    FindRecentlyModified { field: String, lookback: LookbackWindow },
    FindByActor { field: String },
    FindByIdAndVersion { field: String },
}

/// One repository operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOp {
    pub name: String,
    pub query: Query,
    pub params: Vec<Param>,
    pub returns: Returns,
    /// The query must skip soft-deleted rows.
    pub excludes_soft_deleted: bool,
}

impl RepositoryOp {
    fn new(name: impl Into<String>, query: Query, params: Vec<Param>, returns: Returns) -> Self {
        Self {
            name: name.into(),
            query,
            params,
            returns,
            excludes_soft_deleted: false,
        }
    }

    /// Whether the operation reads rows that are not deleted.
    pub fn reads_live_rows(&self) -> bool {
        !matches!(
            self.query,
            Query::Save
                | Query::DeleteById
                | Query::SoftDeleteById { .. }
                | Query::RestoreById { .. }
                | Query::FindDeleted { .. }
        )
    }

    /// Whether the stack's built-in repository already provides this operation.
    pub fn is_builtin(&self) -> bool {
        matches!(
            self.query,
            Query::FindById | Query::FindAll | Query::Save | Query::DeleteById
        )
    }
}

/// Structured description of one repository artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySpec {
    pub class_name: String,
    pub id_type: IdType,
    pub ops: Vec<RepositoryOp>,
    pub soft_delete: Option<SoftDeleteSpec>,
}

impl RepositorySpec {
    pub fn op(&self, name: &str) -> Option<&RepositoryOp> {
        self.ops.iter().find(|op| op.name == name)
    }

    pub fn has_op(&self, name: &str) -> bool {
        self.op(name).is_some()
    }

    pub fn op_names(&self) -> Vec<String> {
        self.ops.iter().map(|op| op.name.clone()).collect()
    }

    /// Operations the renderer has to declare itself.
    pub fn custom_ops(&self) -> impl Iterator<Item = &RepositoryOp> {
        self.ops.iter().filter(|op| !op.is_builtin())
    }
}

/// Whether an attribute name gets an exact-match finder even when it is not
/// unique.
pub fn is_searchable(name: &str) -> bool {
    SEARCHABLE_NAMES.contains(&name) || SEARCHABLE_SUFFIXES.iter().any(|s| name.ends_with(s))
}

/// Plan the repository for `class`.
///
/// When two operations end up with the same name the first one is kept and
/// a `duplicate-repository-op` warning names the one that was dropped.
pub fn plan_repository(
    class: &ClassModel,
    meta: &EffectiveMetadata,
    ends: &[RelationEnd],
    diagnostics: &mut Vec<Diagnostic>,
) -> RepositorySpec {
    let mut ops = Ops {
        class: &class.name,
        ops: Vec::new(),
        diagnostics,
    };
    let id = || Param::new(&meta.id.field, ParamType::Id);

    ops.push(RepositoryOp::new("findById", Query::FindById, vec![id()], Returns::Optional));
    ops.push(RepositoryOp::new("findAll", Query::FindAll, vec![], Returns::List));
    ops.push(RepositoryOp::new(
        "save",
        Query::Save,
        vec![Param::new("entity", ParamType::Entity)],
        Returns::Entity,
    ));

    match &meta.soft_delete {
        Some(soft_delete) => {
            let field = soft_delete.field.clone();
            ops.push(RepositoryOp::new(
                "deleteById",
                Query::SoftDeleteById {
                    field: field.clone(),
                },
                vec![id()],
                Returns::Unit,
            ));
            ops.push(RepositoryOp::new(
                "restoreById",
                Query::RestoreById {
                    field: field.clone(),
                },
                vec![id()],
                Returns::Unit,
            ));
            ops.push(RepositoryOp::new(
                "findDeleted",
                Query::FindDeleted { field },
                vec![],
                Returns::List,
            ));
        }
        None => ops.push(RepositoryOp::new(
            "deleteById",
            Query::DeleteById,
            vec![id()],
            Returns::Unit,
        )),
    }

    let state_field = meta.capabilities.state.as_ref().map(|s| s.field.as_str());
    let user_like = meta.capabilities.role == DomainRole::UserLike;
    for attr in class
        .attributes
        .iter()
        .filter(|a| Some(a.name.as_str()) != state_field)
    {
        let pascal = to_pascal_case(&attr.name);
        let ty = match &attr.ty {
            AttributeType::Known(ty) => FieldType::Scalar(*ty),
            AttributeType::Unknown(declared) => FieldType::Fallback(declared.clone()),
        };

        let account_type = user_like && attr.name == ACCOUNT_TYPE_FIELD;
        if attr.unique || is_searchable(&attr.name) || account_type {
            ops.push(RepositoryOp::new(
                format!("findBy{}", pascal),
                Query::FindByField {
                    field: attr.name.clone(),
                    unique: attr.unique,
                },
                vec![Param::new(&attr.name, ParamType::Field(ty.clone()))],
                if attr.unique {
                    Returns::Optional
                } else {
                    Returns::List
                },
            ));
        }

        if attr.ty.is_string() {
            ops.push(RepositoryOp::new(
                format!("findBy{}ContainingIgnoreCase", pascal),
                Query::FindContaining {
                    field: attr.name.clone(),
                },
                vec![Param::new(&attr.name, ParamType::Text)],
                Returns::List,
            ));
        }
    }

    for end in ends.iter().filter(|e| e.bears_foreign_key()) {
        let param = format!("{}Id", end.field);
        ops.push(RepositoryOp::new(
            format!("findBy{}Id", to_pascal_case(&end.field)),
            Query::FindByRelationId {
                field: end.field.clone(),
                column: end
                    .join_column
                    .clone()
                    .unwrap_or_else(|| meta.column(&param)),
            },
            vec![Param::new(param, ParamType::ForeignId(end.target_id))],
            Returns::List,
        ));
    }

    if let Some(state) = &meta.capabilities.state {
        let field = || state.field.clone();
        let status = || Param::new(&state.field, ParamType::State);
        ops.push(RepositoryOp::new(
            "findByStatus",
            Query::FindByStatus { field: field() },
            vec![status()],
            Returns::List,
        ));
        ops.push(RepositoryOp::new(
            "findByStatusPaged",
            Query::FindByStatusPaged { field: field() },
            vec![status(), Param::new("page", ParamType::Page)],
            Returns::Page,
        ));
        ops.push(RepositoryOp::new(
            "findByStatusIn",
            Query::FindByStatusIn { field: field() },
            vec![Param::new("statuses", ParamType::States)],
            Returns::List,
        ));
        ops.push(RepositoryOp::new(
            "countByStatus",
            Query::CountByStatus { field: field() },
            vec![status()],
            Returns::Count,
        ));
    }

    if let Some(audit) = &meta.audit {
        let lookback = meta.recent_lookback;
        ops.push(RepositoryOp::new(
            "findByDateRange",
            Query::FindByDateRange {
                field: audit.created_at.clone(),
            },
            vec![
                Param::new("start", ParamType::Timestamp),
                Param::new("end", ParamType::Timestamp),
            ],
            Returns::List,
        ));
        ops.push(RepositoryOp::new(
            "findRecentlyCreated",
            Query::FindRecentlyCreated {
                field: audit.created_at.clone(),
                lookback,
            },
            vec![],
            Returns::List,
        ));
        ops.push(RepositoryOp::new(
            "countRecentlyCreated",
            Query::CountRecentlyCreated {
                field: audit.created_at.clone(),
                lookback,
            },
            vec![],
            Returns::Count,
        ));
        ops.push(RepositoryOp::new(
            "findRecentlyModified",
            Query::FindRecentlyModified {
                field: audit.updated_at.clone(),
                lookback,
            },
            vec![],
            Returns::List,
        ));
        for actor in [&audit.created_by, &audit.updated_by] {
            ops.push(RepositoryOp::new(
                format!("findBy{}", to_pascal_case(actor)),
                Query::FindByActor {
                    field: actor.clone(),
                },
                vec![Param::new(actor, ParamType::Text)],
                Returns::List,
            ));
        }
    }

    if let Some(version) = &meta.version_field {
        ops.push(RepositoryOp::new(
            "findByIdAndVersion",
            Query::FindByIdAndVersion {
                field: version.clone(),
            },
            vec![id(), Param::new(version, ParamType::Version)],
            Returns::Optional,
        ));
    }

    let mut ops = ops.ops;
    if meta.is_soft_delete() {
        for op in ops.iter_mut().filter(|op| op.reads_live_rows()) {
            op.excludes_soft_deleted = true;
        }
    }

    RepositorySpec {
        class_name: class.name.clone(),
        id_type: meta.id.id_type,
        ops,
        soft_delete: meta.soft_delete.clone(),
    }
}

/// Operation list that keeps the first operation of a given name.
struct Ops<'a> {
    class: &'a str,
    ops: Vec<RepositoryOp>,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl Ops<'_> {
    fn push(&mut self, op: RepositoryOp) {
        let Some(kept) = self.ops.iter().find(|o| o.name == op.name) else {
            self.ops.push(op);
            return;
        };
        self.diagnostics.push(
            Diagnostic::warning(
                "plan",
                format!(
                    "repository operation '{}' is already generated as {:?}, dropping {:?}",
                    op.name, kept.query, op.query
                ),
            )
            .with_code("duplicate-repository-op")
            .for_class(self.class),
        );
    }
}
