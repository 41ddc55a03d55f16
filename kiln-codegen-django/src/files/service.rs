//! Service module renderer.

use kiln_codegen::{
    builder::CodeBuilder,
    generators::{ClassPlan, Param, Returns, ServiceOp, ServiceOpKind, Step, TargetState},
};
use kiln_core::ArtifactKind;

use crate::py::{Scope, ident, quote};

/// `<app>/services/<class>_service.py`.
pub struct ServicePy<'a> {
    plan: &'a ClassPlan,
}

impl<'a> ServicePy<'a> {
    pub fn new(plan: &'a ClassPlan) -> Self {
        Self { plan }
    }

    pub fn render(&self) -> String {
        let mut scope = Scope::new(self.plan, ArtifactKind::Service);
        let class = self.plan.name();
        let repository = format!("{}Repository", class);
        scope.artifact(class, ArtifactKind::Repository, &repository);

        let mut body = CodeBuilder::python();
        for error in ["NotFoundError", "InvalidTransitionError"] {
            body.push_block(&format!("class {}(Exception):", error), None, |b| {
                b.push_line("pass");
            })
            .push_blank()
            .push_blank();
        }
        body.push_block(&format!("class {}Service:", class), None, |b| {
            b.push_block(
                &format!(
                    "def __init__(self, repository: {} | None = None) -> None:",
                    repository
                ),
                None,
                |b| {
                    b.push_line(&format!(
                        "self.repository = repository or {}()",
                        repository
                    ));
                },
            );
            for op in &self.plan.service.ops {
                b.push_blank();
                self.push_op(&mut scope, b, op);
            }
        });

        format!("{}{}", scope.header(), body.build())
    }

    fn push_op(&self, scope: &mut Scope, b: &mut CodeBuilder, op: &ServiceOp) {
        let returns = scope.returns(op.returns);
        let params = std::iter::once("self".to_string())
            .chain(op.params.iter().enumerate().map(|(i, p)| {
                let ty = self.param_type(scope, op, p);
                let name = ident(&p.name);
                // Defaults are only legal when every later parameter has one
                if !p.required && op.params[i..].iter().all(|p| !p.required) {
                    format!("{}: {} | None = None", name, ty)
                } else if !p.required {
                    format!("{}: {} | None", name, ty)
                } else {
                    format!("{}: {}", name, ty)
                }
            }))
            .collect::<Vec<_>>()
            .join(", ");

        if op.kind != ServiceOpKind::Query {
            scope.import("django.db", "transaction");
            b.push_line("@transaction.atomic");
        }
        b.push_block(
            &format!("def {}({}) -> {}:", ident(&op.name), params, returns),
            None,
            |b| {
                let mut returned = false;
                for step in &op.steps {
                    returned |= self.push_step(scope, b, op, step);
                }
                if !returned && op.returns != Returns::Unit {
                    b.push_line("return entity");
                }
            },
        );
    }

    /// Merge sources are plain dicts of changed fields.
    fn param_type(&self, scope: &mut Scope, op: &ServiceOp, param: &Param) -> String {
        let merged = op.steps.iter().any(
            |s| matches!(s, Step::MergeFields { source, .. } if *source == param.name),
        );
        if merged {
            scope.import("typing", "Any");
            "dict[str, Any]".to_string()
        } else {
            scope.param_type(&param.ty)
        }
    }

    /// Emit one step. Returns whether the step ended with a `return`.
    fn push_step(&self, scope: &mut Scope, b: &mut CodeBuilder, op: &ServiceOp, step: &Step) -> bool {
        let class = self.plan.name();
        match step {
            Step::LoadEntity {
                repository_op,
                id_param,
            } => {
                let id = ident(id_param);
                b.push_line(&format!(
                    "entity = self.repository.{}({})",
                    ident(repository_op),
                    id
                ));
                b.push_block("if entity is None:", None, |b| {
                    b.push_line(&format!(
                        "raise NotFoundError(f\"{} not found: {{{}}}\")",
                        class, id
                    ));
                });
            }
            Step::MergeFields { source, fields } => {
                let source = ident(source);
                for field in fields {
                    let field = ident(field);
                    b.push_block(
                        &format!("if {} in {}:", quote(&field), source),
                        None,
                        |b| {
                            b.push_line(&format!(
                                "entity.{} = {}[{}]",
                                field,
                                source,
                                quote(&field)
                            ));
                        },
                    );
                }
            }
            Step::CheckTransition { target } => {
                let target = self.target(scope, target);
                let current = self
                    .plan
                    .metadata
                    .capabilities
                    .state
                    .as_ref()
                    .map_or_else(|| "status".to_string(), |s| ident(&s.field));
                b.push_block(
                    &format!("if not entity.can_transition_to({}):", target),
                    None,
                    |b| {
                        b.push_line("raise InvalidTransitionError(");
                        b.push_indent().push_line(&format!(
                            "f\"Cannot move {} from {{entity.{}}} to {{{}}}\"",
                            class, current, target
                        ));
                        b.push_dedent().push_line(")");
                    },
                );
            }
            Step::ApplyState { field, target } => {
                let target = self.target(scope, target);
                b.push_line(&format!("entity.{} = {}", ident(field), target));
            }
            Step::SetField { field, param } => {
                b.push_line(&format!("entity.{} = {}", ident(field), ident(param)));
            }
            Step::Stamp { field } => {
                scope.import("django.utils", "timezone");
                b.push_line(&format!("entity.{} = timezone.now()", ident(field)));
            }
            Step::AppendHistory {
                action,
                actor,
                comment,
            } => {
                let actor = actor.as_deref().map_or_else(|| "None".to_string(), ident);
                let note = quote(&action.note());
                let note = match comment {
                    Some(comment) => format!("{} or {}", ident(comment), note),
                    None => note,
                };
                b.push_line(&format!(
                    "entity.add_history_entry({}, {}, {})",
                    quote(action.as_str()),
                    actor,
                    note
                ));
            }
            Step::Persist { repository_op } => {
                b.push_line(&format!(
                    "return self.repository.{}(entity)",
                    ident(repository_op)
                ));
                return true;
            }
            Step::Delegate {
                repository_op,
                args,
            } => {
                let call = format!(
                    "self.repository.{}({})",
                    ident(repository_op),
                    args.iter().map(|a| ident(a)).collect::<Vec<_>>().join(", ")
                );
                if op.returns == Returns::Unit {
                    b.push_line(&call);
                } else {
                    b.push_line(&format!("return {}", call));
                    return true;
                }
            }
        }
        false
    }

    fn target(&self, scope: &mut Scope, target: &TargetState) -> String {
        match target {
            TargetState::Param(name) => ident(name),
            TargetState::Fixed(value) => format!("{}.{}", scope.state_enum(), value),
        }
    }
}

#[cfg(test)]
mod tests {
    use kiln_codegen::testing::{compile, order_ir, parent_child_ir, shipment_ir, user_ir};

    use super::*;

    fn render(ir: kiln_ir::DomainIR, class: &str) -> String {
        let ctx = compile(ir).unwrap();
        ServicePy::new(&ctx.plans[class]).render()
    }

    #[test]
    fn test_service_skeleton() {
        let py = render(order_ir(), "Order");

        assert!(py.contains("from ..repositories.order_repository import OrderRepository"));
        assert!(py.contains("class NotFoundError(Exception):\n    pass"));
        assert!(py.contains(
            "    def __init__(self, repository: OrderRepository | None = None) -> None:\n        self.repository = repository or OrderRepository()"
        ));
        assert!(py.contains(
            "    def find_by_id(self, id: UUID) -> Order:\n        entity = self.repository.find_by_id(id)\n        if entity is None:\n            raise NotFoundError(f\"Order not found: {id}\")\n        return entity"
        ));
        assert!(py.contains("    @transaction.atomic\n    def create(self, entity: Order, created_by: str | None = None) -> Order:"));
        assert!(py.contains("entity.created_at = timezone.now()"));
    }

    #[test]
    fn test_update_merges_changes() {
        let py = render(parent_child_ir(), "Child");

        assert!(py.contains("from typing import Any"));
        assert!(py.contains("def update(self, id: UUID, changes: dict[str, Any]) -> Child:"));
        assert!(py.contains("        if \"name\" in changes:\n            entity.name = changes[\"name\"]"));
        assert!(py.contains("entity.parent = changes[\"parent\"]"));
    }

    #[test]
    fn test_update_status_checks_first() {
        let py = render(order_ir(), "Order");

        let method = py.split("def update_status(").nth(1).unwrap();
        assert!(method.starts_with(
            "self, id: UUID, new_status: OrderStatus, updated_by: str | None = None, comment: str | None = None) -> Order:"
        ));
        let check = method.find("if not entity.can_transition_to(new_status):").unwrap();
        let apply = method.find("entity.status = new_status").unwrap();
        let save = method.find("return self.repository.save(entity)").unwrap();
        assert!(check < apply && apply < save);
        assert!(method.contains(
            "entity.add_history_entry(\"STATUS_CHANGED\", updated_by, comment or \"Status changed\")"
        ));
    }

    #[test]
    fn test_delete_and_queries() {
        let py = render(order_ir(), "Order");

        assert!(py.contains("def delete(self, id: UUID) -> None:"));
        assert!(py.contains("        self.repository.delete_by_id(id)\n"));
        assert!(py.contains(
            "    def find_by_status(self, status: OrderStatus) -> list[Order]:\n        return self.repository.find_by_status(status)"
        ));
    }

    #[test]
    fn test_role_operations() {
        let shipment = render(shipment_ir(), "Shipment");
        assert!(shipment.contains(
            "def mark_delivered(self, id: UUID, photo_url: str, signature_url: str, courier_id: str) -> Shipment:"
        ));
        assert!(shipment.contains("if not entity.can_transition_to(ShipmentStatus.DELIVERED):"));
        assert!(shipment.contains("from ..models.shipment_status import ShipmentStatus"));

        let user = render(user_ir(), "User");
        assert!(user.contains("entity.account_type = account_type"));
        assert!(user.contains("return self.repository.find_by_account_type(account_type)"));
    }
}
