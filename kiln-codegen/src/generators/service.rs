//! Service generator: business operations layered over the repository.
//!
//! Each operation is a list of [`Step`]s. Renderers walk the steps in order,
//! binding the loaded or received entity to one working variable, so every
//! stack emits the same sequence of checks and writes.

use kiln_ir::{ClassModel, DomainRole, EffectiveMetadata, IdType};

use super::{Failure, Param, ParamType, Returns};
use crate::relations::RelationEnd;

const ACCOUNT_TYPE_FIELD: &str = "accountType";
const ORGANIZATION_FIELD: &str = "organizationId";

/// Target of a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetState {
    /// Value of the named parameter.
    Param(String),
    /// A fixed value of the state enum.
    Fixed(String),
}

/// Action recorded in an entity's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryAction {
    Created,
    Updated,
    StatusChanged,
    Promoted,
    Assigned,
    /// A role transition reached the given state.
    Reached(String),
}

impl HistoryAction {
    pub fn as_str(&self) -> &str {
        match self {
            HistoryAction::Created => "CREATED",
            HistoryAction::Updated => "UPDATED",
            HistoryAction::StatusChanged => "STATUS_CHANGED",
            HistoryAction::Promoted => "PROMOTED",
            HistoryAction::Assigned => "ASSIGNED",
            HistoryAction::Reached(state) => state,
        }
    }

    /// Human-readable description stored with the entry.
    pub fn note(&self) -> String {
        match self {
            HistoryAction::Created => "Entity created".to_string(),
            HistoryAction::Updated => "Entity updated".to_string(),
            HistoryAction::StatusChanged => "Status changed".to_string(),
            HistoryAction::Promoted => "Account promoted".to_string(),
            HistoryAction::Assigned => "Assigned to organization".to_string(),
            HistoryAction::Reached(state) => format!("Moved to {}", state),
        }
    }
}

/// One step of a service operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Load the entity by id, failing with not-found when absent.
    LoadEntity {
        repository_op: String,
        id_param: String,
    },
    /// Copy caller-editable fields from a parameter onto the entity.
    MergeFields { source: String, fields: Vec<String> },
    /// Fail with an invalid transition when the entity rejects the target.
    CheckTransition { target: TargetState },
    ApplyState { field: String, target: TargetState },
    SetField { field: String, param: String },
    /// Set a timestamp field to the current time.
    Stamp { field: String },
    AppendHistory {
        action: HistoryAction,
        actor: Option<String>,
        comment: Option<String>,
    },
    /// Save the entity and return the stored value.
    Persist { repository_op: String },
    /// Call a repository operation with the given parameters and return its
    /// result.
    Delegate {
        repository_op: String,
        args: Vec<String>,
    },
}

impl Step {
    pub fn repository_op(&self) -> Option<&str> {
        match self {
            Step::LoadEntity { repository_op, .. }
            | Step::Persist { repository_op }
            | Step::Delegate { repository_op, .. } => Some(repository_op),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceOpKind {
    /// Reads without side effects.
    Query,
    /// Writes without a state change.
    Command,
    /// Moves the entity to another state.
    Transition,
}

/// One service operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOp {
    pub name: String,
    pub kind: ServiceOpKind,
    pub params: Vec<Param>,
    pub returns: Returns,
    pub steps: Vec<Step>,
    pub failures: Vec<Failure>,
}

impl ServiceOp {
    pub fn repository_ops(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().filter_map(Step::repository_op)
    }

    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Whether every state change and persist is preceded by a transition
    /// check. Always true for non-transition operations.
    pub fn checks_before_persist(&self) -> bool {
        if self.kind != ServiceOpKind::Transition {
            return true;
        }
        let Some(check) = self
            .steps
            .iter()
            .position(|s| matches!(s, Step::CheckTransition { .. }))
        else {
            return false;
        };
        self.steps.iter().enumerate().all(|(i, step)| {
            !matches!(step, Step::ApplyState { .. } | Step::Persist { .. }) || i > check
        })
    }
}

/// Name and parameters of a service operation, all a controller needs to
/// bind a route to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSignature<'a> {
    pub name: &'a str,
    pub params: &'a [Param],
}

/// Structured description of one service artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSpec {
    pub class_name: String,
    pub id_type: IdType,
    pub ops: Vec<ServiceOp>,
    pub state_enum: Option<String>,
    /// Operations record history entries on the entity.
    pub history: bool,
    /// `(service op, repository op)` pairs whose repository op was not
    /// generated.
    pub missing_repository_ops: Vec<(String, String)>,
}

impl ServiceSpec {
    pub fn op(&self, name: &str) -> Option<&ServiceOp> {
        self.ops.iter().find(|op| op.name == name)
    }

    pub fn has_op(&self, name: &str) -> bool {
        self.op(name).is_some()
    }

    pub fn op_names(&self) -> Vec<String> {
        self.ops.iter().map(|op| op.name.clone()).collect()
    }

    pub fn signatures(&self) -> Vec<ServiceSignature<'_>> {
        self.ops
            .iter()
            .map(|op| ServiceSignature {
                name: &op.name,
                params: &op.params,
            })
            .collect()
    }

    pub fn has_transitions(&self) -> bool {
        self.ops.iter().any(|op| op.kind == ServiceOpKind::Transition)
    }
}

/// Plan the service for `class`.
///
/// `repository_ops` lists the operations the repository generator emitted.
/// Steps that call anything else are recorded in
/// [`ServiceSpec::missing_repository_ops`].
pub fn plan_service(
    class: &ClassModel,
    meta: &EffectiveMetadata,
    ends: &[RelationEnd],
    repository_ops: &[String],
) -> ServiceSpec {
    let planner = Planner { class, meta };
    let mut ops = vec![
        planner.create(),
        planner.update(ends),
        planner.find_by_id(),
        planner.delegate("findAll", "findAll", vec![], Returns::List),
        planner.delete(),
    ];

    if let Some(state) = &meta.capabilities.state {
        ops.push(planner.update_status(&state.field));
        ops.push(planner.delegate(
            "findByStatus",
            "findByStatus",
            vec![Param::new(&state.field, ParamType::State)],
            Returns::List,
        ));
    }

    match &meta.capabilities.role {
        DomainRole::Generic => {}
        DomainRole::UserLike => {
            ops.push(planner.promote_account());
            ops.push(planner.assign_to_organization());
            if class.find_attribute(ACCOUNT_TYPE_FIELD).is_some() {
                ops.push(planner.delegate(
                    "findByAccountType",
                    "findByAccountType",
                    vec![Param::new(ACCOUNT_TYPE_FIELD, ParamType::Text)],
                    Returns::List,
                ));
            }
        }
        DomainRole::ShipmentLike {
            delivered_state,
            picked_up_state,
        } => {
            ops.push(planner.handover(
                "markDelivered",
                delivered_state,
                &["photoUrl", "signatureUrl"],
                "courierId",
            ));
            ops.push(planner.handover(
                "markPickedUp",
                picked_up_state,
                &["pickerName", "signatureUrl"],
                "agentId",
            ));
        }
    }

    let missing_repository_ops = ops
        .iter()
        .flat_map(|op| {
            op.repository_ops()
                .filter(|name| !repository_ops.iter().any(|r| r == name))
                .map(|name| (op.name.clone(), name.to_string()))
        })
        .collect();

    ServiceSpec {
        class_name: class.name.clone(),
        id_type: meta.id.id_type,
        ops,
        state_enum: meta.capabilities.state.as_ref().map(|s| s.enum_name.clone()),
        history: meta.capabilities.history,
        missing_repository_ops,
    }
}

struct Planner<'a> {
    class: &'a ClassModel,
    meta: &'a EffectiveMetadata,
}

impl Planner<'_> {
    fn id(&self) -> Param {
        Param::new("id", ParamType::Id)
    }

    fn load(&self) -> Step {
        Step::LoadEntity {
            repository_op: "findById".into(),
            id_param: "id".into(),
        }
    }

    fn persist(&self) -> Step {
        Step::Persist {
            repository_op: "save".into(),
        }
    }

    /// Actor parameter for audit stamps and history, when either applies.
    fn actor(&self, name: &str) -> Option<Param> {
        (self.meta.is_audited() || self.meta.capabilities.history)
            .then(|| Param::new(name, ParamType::Text).optional())
    }

    /// Audit stamps for a write, updating `updated_at` and the actor field.
    fn stamps(&self, actor: Option<&Param>, created: bool) -> Vec<Step> {
        let Some(audit) = &self.meta.audit else {
            return Vec::new();
        };
        let mut steps = Vec::new();
        if created {
            steps.push(Step::Stamp {
                field: audit.created_at.clone(),
            });
        }
        steps.push(Step::Stamp {
            field: audit.updated_at.clone(),
        });
        if let Some(actor) = actor {
            let field = if created {
                &audit.created_by
            } else {
                &audit.updated_by
            };
            steps.push(Step::SetField {
                field: field.clone(),
                param: actor.name.clone(),
            });
        }
        steps
    }

    fn history(
        &self,
        action: HistoryAction,
        actor: Option<&Param>,
        comment: Option<&str>,
    ) -> Option<Step> {
        self.meta.capabilities.history.then(|| Step::AppendHistory {
            action,
            actor: actor.map(|p| p.name.clone()),
            comment: comment.map(str::to_string),
        })
    }

    fn has_attribute(&self, name: &str) -> bool {
        self.class.find_attribute(name).is_some()
    }

    fn create(&self) -> ServiceOp {
        let actor = self.actor("createdBy");
        let mut steps = self.stamps(actor.as_ref(), true);
        steps.extend(self.history(HistoryAction::Created, actor.as_ref(), None));
        steps.push(self.persist());

        ServiceOp {
            name: "create".into(),
            kind: ServiceOpKind::Command,
            params: std::iter::once(Param::new("entity", ParamType::Entity))
                .chain(actor)
                .collect(),
            returns: Returns::Entity,
            steps,
            failures: vec![Failure::Validation],
        }
    }

    fn update(&self, ends: &[RelationEnd]) -> ServiceOp {
        let state_field = self.meta.capabilities.state.as_ref().map(|s| &s.field);
        let fields = self
            .class
            .attributes
            .iter()
            .map(|a| &a.name)
            .filter(|name| Some(*name) != state_field)
            .chain(ends.iter().filter(|e| e.is_owning()).map(|e| &e.field))
            .cloned()
            .collect();

        let actor = self.actor("updatedBy");
        let mut steps = vec![
            self.load(),
            Step::MergeFields {
                source: "changes".into(),
                fields,
            },
        ];
        steps.extend(self.stamps(actor.as_ref(), false));
        steps.extend(self.history(HistoryAction::Updated, actor.as_ref(), None));
        steps.push(self.persist());

        ServiceOp {
            name: "update".into(),
            kind: ServiceOpKind::Command,
            params: [self.id(), Param::new("changes", ParamType::Entity)]
                .into_iter()
                .chain(actor)
                .collect(),
            returns: Returns::Entity,
            steps,
            failures: vec![Failure::NotFound],
        }
    }

    fn find_by_id(&self) -> ServiceOp {
        ServiceOp {
            name: "findById".into(),
            kind: ServiceOpKind::Query,
            params: vec![self.id()],
            returns: Returns::Entity,
            steps: vec![self.load()],
            failures: vec![Failure::NotFound],
        }
    }

    fn delete(&self) -> ServiceOp {
        ServiceOp {
            name: "delete".into(),
            kind: ServiceOpKind::Command,
            params: vec![self.id()],
            returns: Returns::Unit,
            steps: vec![
                self.load(),
                Step::Delegate {
                    repository_op: "deleteById".into(),
                    args: vec!["id".into()],
                },
            ],
            failures: vec![Failure::NotFound],
        }
    }

    fn delegate(
        &self,
        name: &str,
        repository_op: &str,
        params: Vec<Param>,
        returns: Returns,
    ) -> ServiceOp {
        ServiceOp {
            name: name.into(),
            kind: ServiceOpKind::Query,
            steps: vec![Step::Delegate {
                repository_op: repository_op.into(),
                args: params.iter().map(|p| p.name.clone()).collect(),
            }],
            params,
            returns,
            failures: vec![],
        }
    }

    fn transition(
        &self,
        state_field: &str,
        target: TargetState,
        actor: &Param,
        action: HistoryAction,
        comment: Option<&str>,
    ) -> Vec<Step> {
        let mut steps = vec![
            self.load(),
            Step::CheckTransition {
                target: target.clone(),
            },
            Step::ApplyState {
                field: state_field.to_string(),
                target,
            },
        ];
        steps.extend(self.stamps(Some(actor), false));
        steps.extend(self.history(action, Some(actor), comment));
        steps
    }

    fn update_status(&self, state_field: &str) -> ServiceOp {
        let actor = Param::new("updatedBy", ParamType::Text).optional();
        let mut steps = self.transition(
            state_field,
            TargetState::Param("newStatus".into()),
            &actor,
            HistoryAction::StatusChanged,
            Some("comment"),
        );
        steps.push(self.persist());

        ServiceOp {
            name: "updateStatus".into(),
            kind: ServiceOpKind::Transition,
            params: vec![
                self.id(),
                Param::new("newStatus", ParamType::State),
                actor,
                Param::new("comment", ParamType::Text).optional(),
            ],
            returns: Returns::Entity,
            steps,
            failures: vec![Failure::NotFound, Failure::InvalidTransition],
        }
    }

    fn account_change(
        &self,
        name: &str,
        value: Param,
        actor: &str,
        action: HistoryAction,
    ) -> ServiceOp {
        let actor = Param::new(actor, ParamType::Text).optional();
        let mut steps = vec![self.load()];
        if self.has_attribute(&value.name) {
            steps.push(Step::SetField {
                field: value.name.clone(),
                param: value.name.clone(),
            });
        }
        steps.extend(self.stamps(Some(&actor), false));
        steps.extend(self.history(action, Some(&actor), None));
        steps.push(self.persist());

        ServiceOp {
            name: name.into(),
            kind: ServiceOpKind::Command,
            params: vec![self.id(), value, actor],
            returns: Returns::Entity,
            steps,
            failures: vec![Failure::NotFound],
        }
    }

    fn promote_account(&self) -> ServiceOp {
        self.account_change(
            "promoteAccount",
            Param::new(ACCOUNT_TYPE_FIELD, ParamType::Text),
            "promotedBy",
            HistoryAction::Promoted,
        )
    }

    fn assign_to_organization(&self) -> ServiceOp {
        self.account_change(
            "assignToOrganization",
            Param::new(ORGANIZATION_FIELD, ParamType::ForeignId(self.meta.id.id_type)),
            "assignedBy",
            HistoryAction::Assigned,
        )
    }

    /// A shipment transition to `target` with proof of completion.
    fn handover(&self, name: &str, target: &str, proofs: &[&str], actor: &str) -> ServiceOp {
        let state_field = self
            .meta
            .capabilities
            .state
            .as_ref()
            .map_or("status", |s| s.field.as_str());
        let actor = Param::new(actor, ParamType::Text);
        let mut steps = self.transition(
            state_field,
            TargetState::Fixed(target.to_string()),
            &actor,
            HistoryAction::Reached(target.to_string()),
            None,
        );
        // Insert proof fields before the audit stamps and history
        let proof_steps: Vec<Step> = proofs
            .iter()
            .copied()
            .chain([actor.name.as_str()])
            .filter(|p| self.has_attribute(p))
            .map(|p| Step::SetField {
                field: p.to_string(),
                param: p.to_string(),
            })
            .collect();
        steps.splice(3..3, proof_steps);
        steps.push(self.persist());

        ServiceOp {
            name: name.into(),
            kind: ServiceOpKind::Transition,
            params: std::iter::once(self.id())
                .chain(proofs.iter().map(|p| Param::new(*p, ParamType::Text)))
                .chain(std::iter::once(actor))
                .collect(),
            returns: Returns::Entity,
            steps,
            failures: vec![Failure::NotFound, Failure::InvalidTransition],
        }
    }
}

#[cfg(test)]
mod tests {
    use kiln_ir::{Attribute, ClassOverrides, GlobalConfig, RoleHint, SemanticType};

    use super::*;
    use crate::{generators::plan_repository, metadata::resolve};

    fn plan_with(
        class: &ClassModel,
        config: &GlobalConfig,
        overrides: Option<&ClassOverrides>,
    ) -> ServiceSpec {
        let meta = resolve(class, config, overrides).unwrap();
        let repository = plan_repository(class, &meta, &[], &mut Vec::new());
        plan_service(class, &meta, &[], &repository.op_names())
    }

    fn plan(class: &ClassModel) -> ServiceSpec {
        plan_with(class, &GlobalConfig::default(), None)
    }

    fn order() -> ClassModel {
        ClassModel::new("Order").attribute(Attribute::new("status", SemanticType::String))
    }

    #[test]
    fn test_base_operations() {
        let spec = plan(&ClassModel::new("Tag"));
        assert_eq!(
            spec.op_names(),
            vec!["create", "update", "findById", "findAll", "delete"]
        );
        assert!(spec.missing_repository_ops.is_empty());
        assert!(!spec.has_transitions());
    }

    #[test]
    fn test_update_status_steps() {
        let spec = plan(&order());
        let op = spec.op("updateStatus").unwrap();

        assert_eq!(op.kind, ServiceOpKind::Transition);
        assert!(op.checks_before_persist());
        assert_eq!(
            op.params.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            vec!["id", "newStatus", "updatedBy", "comment"]
        );
        assert!(!op.param("comment").unwrap().required);
        assert_eq!(op.failures, vec![Failure::NotFound, Failure::InvalidTransition]);

        assert!(matches!(op.steps[0], Step::LoadEntity { .. }));
        assert_eq!(
            op.steps[1],
            Step::CheckTransition {
                target: TargetState::Param("newStatus".into())
            }
        );
        assert!(matches!(op.steps[2], Step::ApplyState { .. }));
        assert!(matches!(
            op.steps.last(),
            Some(Step::Persist { repository_op }) if repository_op == "save"
        ));
        assert!(op.steps.iter().any(|s| matches!(
            s,
            Step::AppendHistory { action: HistoryAction::StatusChanged, .. }
        )));
        assert!(spec.has_op("findByStatus"));
    }

    #[test]
    fn test_checks_before_persist_detects_missing_check() {
        let op = ServiceOp {
            name: "ship".into(),
            kind: ServiceOpKind::Transition,
            params: vec![],
            returns: Returns::Entity,
            steps: vec![
                Step::ApplyState {
                    field: "status".into(),
                    target: TargetState::Fixed("SHIPPED".into()),
                },
                Step::CheckTransition {
                    target: TargetState::Fixed("SHIPPED".into()),
                },
                Step::Persist {
                    repository_op: "save".into(),
                },
            ],
            failures: vec![],
        };
        assert!(!op.checks_before_persist());
    }

    #[test]
    fn test_create_records_history() {
        let spec = plan(&order());
        let create = spec.op("create").unwrap();
        assert_eq!(create.params[1].name, "createdBy");
        assert!(create.steps.contains(&Step::AppendHistory {
            action: HistoryAction::Created,
            actor: Some("createdBy".into()),
            comment: None,
        }));
    }

    #[test]
    fn test_audit_stamps() {
        let config = GlobalConfig {
            audit_fields: true,
            history: false,
            ..GlobalConfig::default()
        };
        let spec = plan_with(&ClassModel::new("Invoice"), &config, None);

        let create = spec.op("create").unwrap();
        assert_eq!(
            create.steps,
            vec![
                Step::Stamp {
                    field: "createdAt".into()
                },
                Step::Stamp {
                    field: "updatedAt".into()
                },
                Step::SetField {
                    field: "createdBy".into(),
                    param: "createdBy".into()
                },
                Step::Persist {
                    repository_op: "save".into()
                },
            ]
        );
        let update = spec.op("update").unwrap();
        assert!(update.steps.contains(&Step::SetField {
            field: "updatedBy".into(),
            param: "updatedBy".into()
        }));
    }

    #[test]
    fn test_no_history_for_log_classes() {
        let spec = plan(&ClassModel::new("OrderHistory").with_state(None));
        assert!(!spec.history);
        assert!(spec.ops.iter().all(|op| {
            op.steps
                .iter()
                .all(|s| !matches!(s, Step::AppendHistory { .. }))
        }));
    }

    #[test]
    fn test_user_operations() {
        let user = ClassModel::new("User")
            .attribute(Attribute::new("email", SemanticType::String).unique())
            .attribute(Attribute::new("accountType", SemanticType::String));
        let spec = plan(&user);

        let promote = spec.op("promoteAccount").unwrap();
        assert!(promote.steps.contains(&Step::SetField {
            field: "accountType".into(),
            param: "accountType".into()
        }));
        // No organizationId attribute, so nothing is set
        let assign = spec.op("assignToOrganization").unwrap();
        assert!(
            !assign
                .steps
                .iter()
                .any(|s| matches!(s, Step::SetField { field, .. } if field == "organizationId"))
        );
        assert!(spec.has_op("findByAccountType"));
        assert!(spec.missing_repository_ops.is_empty());
    }

    #[test]
    fn test_shipment_operations() {
        let parcel = ClassModel::new("Parcel")
            .with_state(None)
            .attribute(Attribute::new("trackingNumber", SemanticType::String))
            .attribute(Attribute::new("photoUrl", SemanticType::String));
        let spec = plan(&parcel);

        let deliver = spec.op("markDelivered").unwrap();
        assert!(deliver.checks_before_persist());
        assert_eq!(
            deliver.steps[1],
            Step::CheckTransition {
                target: TargetState::Fixed("DELIVERED".into())
            }
        );
        assert!(deliver.steps.contains(&Step::SetField {
            field: "photoUrl".into(),
            param: "photoUrl".into()
        }));
        let picked = spec.op("markPickedUp").unwrap();
        assert_eq!(
            picked.params.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            vec!["id", "pickerName", "signatureUrl", "agentId"]
        );
    }

    #[test]
    fn test_configured_target_states() {
        let parcel = ClassModel::new("Parcel")
            .with_state(None)
            .attribute(Attribute::new("trackingCode", SemanticType::String));
        let overrides = ClassOverrides {
            role: Some(RoleHint::Shipment),
            delivered_state: Some("LIVRE".into()),
            picked_up_state: Some("RETIRE".into()),
            ..ClassOverrides::default()
        };
        let spec = plan_with(&parcel, &GlobalConfig::default(), Some(&overrides));

        let deliver = spec.op("markDelivered").unwrap();
        assert!(deliver.steps.contains(&Step::ApplyState {
            field: "status".into(),
            target: TargetState::Fixed("LIVRE".into())
        }));
    }

    #[test]
    fn test_missing_repository_op() {
        let order = order();
        let meta = resolve(&order, &GlobalConfig::default(), None).unwrap();
        let repository_ops = vec!["findById".to_string(), "save".to_string()];
        let spec = plan_service(&order, &meta, &[], &repository_ops);

        assert!(
            spec.missing_repository_ops
                .contains(&("findByStatus".to_string(), "findByStatus".to_string()))
        );
        assert!(
            spec.missing_repository_ops
                .contains(&("delete".to_string(), "deleteById".to_string()))
        );
    }
}
