//! Service renderer.

use kiln_codegen::{
    builder::CodeBuilder,
    generators::{ClassPlan, Param, Returns, ServiceOp, Step, TargetState},
};
use kiln_core::ArtifactKind;

use crate::ts::{Scope, ident};

/// `src/services/<class>.service.ts`.
pub struct ServiceTs<'a> {
    plan: &'a ClassPlan,
}

impl<'a> ServiceTs<'a> {
    pub fn new(plan: &'a ClassPlan) -> Self {
        Self { plan }
    }

    pub fn render(&self) -> String {
        let mut scope = Scope::new(self.plan, ArtifactKind::Service);
        let class = self.plan.name();
        let repository = format!("{}Repository", class);
        scope.artifact(class, ArtifactKind::Repository, &repository);

        let mut body = CodeBuilder::typescript();
        push_error(&mut body, "NotFoundError");
        body.push_blank();
        push_error(&mut body, "InvalidTransitionError");
        body.push_blank().push_block(
            &format!("export class {}Service {{", class),
            Some("}"),
            |b| {
                b.push_line(&format!(
                    "constructor(private readonly repository: {}) {{}}",
                    repository
                ));
                for op in &self.plan.service.ops {
                    b.push_blank();
                    self.push_op(&mut scope, b, op);
                }
            },
        );

        format!("{}{}", scope.header(), body.build())
    }

    fn push_op(&self, scope: &mut Scope, b: &mut CodeBuilder, op: &ServiceOp) {
        let returns = scope.returns(op.returns);
        let params = op
            .params
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let ty = self.param_type(scope, op, p);
                // `?` is only legal when every later parameter is optional too
                if !p.required && op.params[i..].iter().all(|p| !p.required) {
                    format!("{}?: {}", ident(&p.name), ty)
                } else if !p.required {
                    format!("{}: {} | undefined", ident(&p.name), ty)
                } else {
                    format!("{}: {}", ident(&p.name), ty)
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        b.push_block(
            &format!("async {}({}): Promise<{}> {{", op.name, params, returns),
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

    /// Merge sources are partial entities; everything else maps as usual.
    fn param_type(&self, scope: &mut Scope, op: &ServiceOp, param: &Param) -> String {
        let merged = op.steps.iter().any(
            |s| matches!(s, Step::MergeFields { source, .. } if *source == param.name),
        );
        if merged {
            format!("Partial<{}>", scope.entity())
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
                    "const entity = await this.repository.{}({});",
                    repository_op, id
                ));
                b.push_block("if (!entity) {", Some("}"), |b| {
                    b.push_line(&format!(
                        "throw new NotFoundError(`{} not found: ${{{}}}`);",
                        class, id
                    ));
                });
            }
            Step::MergeFields { source, fields } => {
                let source = ident(source);
                for field in fields {
                    let field = ident(field);
                    b.push_block(
                        &format!("if ({}.{} !== undefined) {{", source, field),
                        Some("}"),
                        |b| {
                            b.push_line(&format!("entity.{} = {}.{};", field, source, field));
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
                    &format!("if (!entity.canTransitionTo({})) {{", target),
                    Some("}"),
                    |b| {
                        b.push_line("throw new InvalidTransitionError(");
                        b.push_indent().push_line(&format!(
                            "`Cannot move {} from ${{entity.{}}} to ${{{}}}`,",
                            class, current, target
                        ));
                        b.push_dedent().push_line(");");
                    },
                );
            }
            Step::ApplyState { field, target } => {
                let target = self.target(scope, target);
                b.push_line(&format!("entity.{} = {};", ident(field), target));
            }
            Step::SetField { field, param } => {
                let value = match op.param(param) {
                    Some(p) if !p.required => format!("{} ?? null", ident(param)),
                    _ => ident(param),
                };
                b.push_line(&format!("entity.{} = {};", ident(field), value));
            }
            Step::Stamp { field } => {
                b.push_line(&format!("entity.{} = new Date();", ident(field)));
            }
            Step::AppendHistory {
                action,
                actor,
                comment,
            } => {
                let actor = actor
                    .as_deref()
                    .map_or_else(|| "null".to_string(), |a| format!("{} ?? null", ident(a)));
                let note = format!("\"{}\"", action.note());
                let note = match comment {
                    Some(comment) => format!("{} ?? {}", ident(comment), note),
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
                b.push_line(&format!("return this.repository.{}(entity);", repository_op));
                return true;
            }
            Step::Delegate {
                repository_op,
                args,
            } => {
                let call = format!(
                    "this.repository.{}({});",
                    repository_op,
                    args.iter().map(|a| ident(a)).collect::<Vec<_>>().join(", ")
                );
                if op.returns == Returns::Unit {
                    b.push_line(&format!("await {}", call));
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

/// `export class <name> extends Error`, keeping the class name as `name`.
fn push_error(b: &mut CodeBuilder, name: &str) {
    b.push_block(
        &format!("export class {} extends Error {{", name),
        Some("}"),
        |b| {
            b.push_line(&format!("override readonly name = \"{}\";", name));
        },
    );
}

#[cfg(test)]
mod tests {
    use kiln_codegen::testing::{compile, order_ir, parent_child_ir, shipment_ir, user_ir};

    use super::*;

    fn render(ir: kiln_ir::DomainIR, class: &str) -> String {
        let ctx = compile(ir).unwrap();
        ServiceTs::new(&ctx.plans[class]).render()
    }

    #[test]
    fn test_service_skeleton() {
        let ts = render(order_ir(), "Order");

        assert!(ts.contains("import { OrderRepository } from \"../repositories/order.repository\";"));
        assert!(ts.contains("export class NotFoundError extends Error {\n  override readonly name = \"NotFoundError\";\n}"));
        assert!(ts.contains("constructor(private readonly repository: OrderRepository) {}"));
        assert!(ts.contains(
            "async findById(id: string): Promise<Order> {\n    const entity = await this.repository.findById(id);\n    if (!entity) {\n      throw new NotFoundError(`Order not found: ${id}`);\n    }\n    return entity;\n  }"
        ));
    }

    #[test]
    fn test_update_merges_changes() {
        let child = render(parent_child_ir(), "Child");
        assert!(child.contains("async update(id: string, changes: Partial<Child>): Promise<Child> {"));
        assert!(child.contains("if (changes.name !== undefined) {\n      entity.name = changes.name;\n    }"));
        assert!(child.contains("entity.parent = changes.parent;"));

        let order = render(order_ir(), "Order");
        assert!(order.contains("async update(id: string, changes: Partial<Order>, updatedBy?: string): Promise<Order> {"));
        assert!(!order.contains("changes.status"));
        assert!(order.contains("entity.updatedBy = updatedBy ?? null;"));
    }

    #[test]
    fn test_update_status_checks_first() {
        let ts = render(order_ir(), "Order");

        let method = ts.split("async updateStatus(").nth(1).unwrap();
        assert!(method.starts_with(
            "id: string, newStatus: OrderStatus, updatedBy?: string, comment?: string): Promise<Order> {"
        ));
        let check = method.find("if (!entity.canTransitionTo(newStatus)) {").unwrap();
        let apply = method.find("entity.status = newStatus;").unwrap();
        let save = method.find("return this.repository.save(entity);").unwrap();
        assert!(check < apply && apply < save);
        assert!(method.contains("throw new InvalidTransitionError("));
        assert!(method.contains(
            "entity.addHistoryEntry(\"STATUS_CHANGED\", updatedBy ?? null, comment ?? \"Status changed\");"
        ));
        assert!(method.contains("entity.updatedAt = new Date();"));
    }

    #[test]
    fn test_delete_awaits_repository() {
        let ts = render(order_ir(), "Order");

        assert!(ts.contains("async delete(id: string): Promise<void> {"));
        assert!(ts.contains("    await this.repository.deleteById(id);\n  }"));
        assert!(ts.contains("return this.repository.findByStatus(status);"));
    }

    #[test]
    fn test_role_operations() {
        let shipment = render(shipment_ir(), "Shipment");
        assert!(shipment.contains(
            "async markDelivered(id: string, photoUrl: string, signatureUrl: string, courierId: string): Promise<Shipment> {"
        ));
        assert!(shipment.contains("if (!entity.canTransitionTo(ShipmentStatus.DELIVERED)) {"));
        assert!(shipment.contains("import { ShipmentStatus } from \"../entities/shipment-status\";"));

        let user = render(user_ir(), "User");
        assert!(user.contains("entity.accountType = accountType;"));
        assert!(user.contains("return this.repository.findByAccountType(accountType);"));
    }
}
