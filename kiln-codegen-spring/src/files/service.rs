//! Spring service renderer.

use kiln_codegen::{
    builder::CodeBuilder,
    generators::{ClassPlan, Failure, Returns, ServiceOp, ServiceOpKind, Step, TargetState},
};
use kiln_core::ArtifactKind;
use kiln_ir::ProjectMeta;

use super::JPA;
use crate::java::{Scope, getter, ident, package_of, setter};

const TRANSACTIONAL: &str = "org.springframework.transaction.annotation";

/// Nested in every service with a transition operation; controllers import
/// it from there.
pub const INVALID_TRANSITION: &str = "InvalidTransitionException";

/// `service/<Class>Service.java`.
pub struct ServiceJava<'a> {
    project: &'a ProjectMeta,
    plan: &'a ClassPlan,
}

impl<'a> ServiceJava<'a> {
    pub fn new(project: &'a ProjectMeta, plan: &'a ClassPlan) -> Self {
        Self { project, plan }
    }

    pub fn render(&self) -> String {
        let mut scope = Scope::new(self.project, self.plan, ArtifactKind::Service);
        let class = self.plan.name();
        let repository = format!("{}Repository", class);
        scope.import(&package_of(self.project, ArtifactKind::Repository), &repository);
        scope.import("org.springframework.stereotype", "Service");
        scope.import(TRANSACTIONAL, "Transactional");

        let mut body = CodeBuilder::java();
        body.push_line("@Service").push_line("@Transactional").push_block(
            &format!("public class {}Service {{", class),
            Some("}"),
            |b| {
                b.push_blank()
                    .push_line(&format!("private final {} repository;", repository))
                    .push_blank()
                    .push_block(
                        &format!("public {}Service({} repository) {{", class, repository),
                        Some("}"),
                        |b| {
                            b.push_line("this.repository = repository;");
                        },
                    );
                if self.checks_transitions() {
                    b.push_blank().push_block(
                        &format!(
                            "public static class {} extends RuntimeException {{",
                            INVALID_TRANSITION
                        ),
                        Some("}"),
                        |b| {
                            b.push_block(
                                &format!("public {}(String message) {{", INVALID_TRANSITION),
                                Some("}"),
                                |b| {
                                    b.push_line("super(message);");
                                },
                            );
                        },
                    );
                }
                for op in &self.plan.service.ops {
                    b.push_blank();
                    self.push_op(&mut scope, b, op);
                }
            },
        );

        format!("{}{}", scope.header(), body.build())
    }

    fn checks_transitions(&self) -> bool {
        self.plan
            .service
            .ops
            .iter()
            .any(|op| op.failures.contains(&Failure::InvalidTransition))
    }

    fn push_op(&self, scope: &mut Scope, b: &mut CodeBuilder, op: &ServiceOp) {
        let returns = scope.returns(op.returns);
        let params = op
            .params
            .iter()
            .map(|p| format!("{} {}", scope.param_type(&p.ty), ident(&p.name)))
            .collect::<Vec<_>>()
            .join(", ");

        if op.kind == ServiceOpKind::Query {
            b.push_line("@Transactional(readOnly = true)");
        }
        b.push_block(
            &format!("public {} {}({}) {{", returns, op.name, params),
            Some("}"),
            |b| {
                let mut returned = false;
                for step in &op.steps {
                    returned |= self.push_step(scope, b, op, step);
                }
                if !returned && op.returns != Returns::Unit {
                    b.push_line("return entity;");
                }
            },
        );
    }

    /// Emit one step. Returns whether the step ended with a `return`.
    fn push_step(&self, scope: &mut Scope, b: &mut CodeBuilder, op: &ServiceOp, step: &Step) -> bool {
        let class = self.plan.name();
        match step {
            Step::LoadEntity {
                repository_op,
                id_param,
            } => {
                scope.import(JPA, "EntityNotFoundException");
                let entity = scope.entity();
                let id = ident(id_param);
                b.push_line(&format!(
                    "{} entity = repository.{}({})",
                    entity, repository_op, id
                ));
                b.push_indent().push_line(&format!(
                    ".orElseThrow(() -> new EntityNotFoundException(\"{} not found: \" + {}));",
                    class, id
                ));
                b.push_dedent();
            }
            Step::MergeFields { source, fields } => {
                let source = ident(source);
                for field in fields {
                    b.push_line(&format!(
                        "entity.{}({}.{}());",
                        setter(field),
                        source,
                        getter(field)
                    ));
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
                    .map_or_else(|| getter("status"), |s| getter(&s.field));
                b.push_block(
                    &format!("if (!entity.canTransitionTo({})) {{", target),
                    Some("}"),
                    |b| {
                        b.push_line(&format!("throw new {}(", INVALID_TRANSITION));
                        b.push_indent().push_line(&format!(
                            "\"Cannot move {} from \" + entity.{}() + \" to \" + {});",
                            class, current, target
                        ));
                        b.push_dedent();
                    },
                );
            }
            Step::ApplyState { field, target } => {
                let target = self.target(scope, target);
                b.push_line(&format!("entity.{}({});", setter(field), target));
            }
            Step::SetField { field, param } => {
                b.push_line(&format!("entity.{}({});", setter(field), ident(param)));
            }
            Step::Stamp { field } => {
                scope.import("java.time", "LocalDateTime");
                b.push_line(&format!("entity.{}(LocalDateTime.now());", setter(field)));
            }
            Step::AppendHistory {
                action,
                actor,
                comment,
            } => {
                let actor = actor.as_deref().map_or_else(|| "null".to_string(), ident);
                let note = format!("\"{}\"", action.note());
                let note = match comment {
                    Some(comment) => {
                        let comment = ident(comment);
                        format!("{} != null ? {} : {}", comment, comment, note)
                    }
                    None => note,
                };
                b.push_line(&format!(
                    "entity.addHistoryEntry(\"{}\", {}, {});",
                    action.as_str(),
                    actor,
                    note
                ));
            }
            Step::Persist { repository_op } => {
                b.push_line(&format!("return repository.{}(entity);", repository_op));
                return true;
            }
            Step::Delegate {
                repository_op,
                args,
            } => {
                let call = format!(
                    "repository.{}({});",
                    repository_op,
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
    use kiln_codegen::testing::{compile, order_ir, shipment_ir, user_ir};

    use super::*;

    fn render(ir: kiln_ir::DomainIR, class: &str) -> String {
        let project = ir.meta.clone();
        let ctx = compile(ir).unwrap();
        ServiceJava::new(&project, &ctx.plans[class]).render()
    }

    #[test]
    fn test_service_skeleton() {
        let java = render(order_ir(), "Order");

        assert!(java.contains("package com.example.shop.service;"));
        assert!(java.contains("import com.example.shop.repository.OrderRepository;"));
        assert!(java.contains("@Service\n@Transactional\npublic class OrderService {"));
        assert!(java.contains("public OrderService(OrderRepository repository) {"));
        assert!(java.contains(
            "@Transactional(readOnly = true)\n    public Order findById(UUID id) {\n        Order entity = repository.findById(id)\n            .orElseThrow(() -> new EntityNotFoundException(\"Order not found: \" + id));\n        return entity;\n    }"
        ));
    }

    #[test]
    fn test_update_status_checks_first() {
        let java = render(order_ir(), "Order");

        let method = java
            .split("public Order updateStatus(")
            .nth(1)
            .unwrap();
        assert!(method.starts_with("UUID id, OrderStatus newStatus, String updatedBy, String comment) {"));
        let check = method.find("if (!entity.canTransitionTo(newStatus)) {").unwrap();
        let apply = method.find("entity.setStatus(newStatus);").unwrap();
        let save = method.find("return repository.save(entity);").unwrap();
        assert!(check < apply && apply < save);
        assert!(method.contains(
            "throw new InvalidTransitionException(\n                \"Cannot move Order from \" + entity.getStatus() + \" to \" + newStatus);"
        ));
        assert!(java.contains(
            "public static class InvalidTransitionException extends RuntimeException {\n        public InvalidTransitionException(String message) {\n            super(message);"
        ));
        assert!(method.contains(
            "entity.addHistoryEntry(\"STATUS_CHANGED\", updatedBy, comment != null ? comment : \"Status changed\");"
        ));
        assert!(method.contains("entity.setUpdatedAt(LocalDateTime.now());"));
    }

    #[test]
    fn test_create_and_delete() {
        let java = render(order_ir(), "Order");

        assert!(java.contains("public Order create(Order entity, String createdBy) {"));
        assert!(java.contains("entity.setCreatedBy(createdBy);"));
        assert!(java.contains(
            "public void delete(UUID id) {\n        Order entity = repository.findById(id)"
        ));
        assert!(java.contains("        repository.deleteById(id);\n    }"));
        assert!(java.contains("return repository.findByStatus(status);"));
    }

    #[test]
    fn test_shipment_handover() {
        let java = render(shipment_ir(), "Shipment");

        assert!(java.contains(
            "public Shipment markDelivered(UUID id, String photoUrl, String signatureUrl, String courierId) {"
        ));
        assert!(java.contains("if (!entity.canTransitionTo(ShipmentStatus.DELIVERED)) {"));
        assert!(java.contains("entity.setStatus(ShipmentStatus.DELIVERED);"));
        assert!(java.contains("entity.addHistoryEntry(\"DELIVERED\", courierId, \"Moved to DELIVERED\");"));
    }

    #[test]
    fn test_user_account_ops() {
        let java = render(user_ir(), "User");

        assert!(java.contains("public User promoteAccount(UUID id, String accountType, String promotedBy) {"));
        assert!(java.contains("entity.setAccountType(accountType);"));
        assert!(java.contains("public User assignToOrganization(UUID id, UUID organizationId, String assignedBy) {"));
        assert!(!java.contains("entity.setOrganizationId("));
        assert!(java.contains("return repository.findByAccountType(accountType);"));
        assert!(!java.contains("InvalidTransitionException"));
    }
}
