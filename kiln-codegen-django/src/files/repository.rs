//! Manager-based repository renderer.

use kiln_codegen::{
    builder::CodeBuilder,
    generators::{ClassPlan, Query, RepositoryOp, Returns},
};
use kiln_core::ArtifactKind;

use super::DJANGO_MODELS;
use crate::{
    py::{Scope, ident, quote},
    vocabulary::eager_loader,
};

/// `<app>/repositories/<class>_repository.py`.
pub struct RepositoryPy<'a> {
    plan: &'a ClassPlan,
}

impl<'a> RepositoryPy<'a> {
    pub fn new(plan: &'a ClassPlan) -> Self {
        Self { plan }
    }

    pub fn render(&self) -> String {
        let mut scope = Scope::new(self.plan, ArtifactKind::Repository);
        let entity = scope.entity();
        scope.import(DJANGO_MODELS, "QuerySet");

        let mut body = CodeBuilder::python();
        if self.plan.repository.ops.iter().any(|op| op.returns == Returns::Page) {
            scope.import("dataclasses", "dataclass");
            body.push_line("@dataclass(frozen=True)")
                .push_block("class PageRequest:", None, |b| {
                    b.push_line("page: int").push_line("size: int");
                })
                .push_blank()
                .push_blank();
        }

        body.push_block(
            &format!("class {}Repository:", entity),
            None,
            |b| {
                b.push_block(
                    &format!("def _queryset(self) -> QuerySet[{}]:", entity),
                    None,
                    |b| {
                        b.push_line(&format!("return {}.objects{}", entity, self.loaders()));
                    },
                );
                if let Some(soft_delete) = &self.plan.repository.soft_delete {
                    b.push_blank().push_block(
                        &format!("def _live(self) -> QuerySet[{}]:", entity),
                        None,
                        |b| {
                            b.push_line(&format!(
                                "return self._queryset().filter({}__isnull=True)",
                                ident(&soft_delete.field)
                            ));
                        },
                    );
                }
                for op in &self.plan.repository.ops {
                    b.push_blank();
                    self.push_op(&mut scope, b, op);
                }
            },
        );

        format!("{}{}", scope.header(), body.build())
    }

    /// `.select_related(...)` and `.prefetch_related(...)` for eager relations,
    /// or `.all()`.
    fn loaders(&self) -> String {
        let eager = |collection: bool| -> Vec<String> {
            self.plan
                .entity
                .fields
                .iter()
                .filter_map(|f| f.relation.as_ref().map(|end| (f, end)))
                .filter(|(_, end)| {
                    end.is_collection() == collection
                        && eager_loader(end.fetch, collection).is_some()
                })
                .map(|(f, _)| quote(&ident(&f.name)))
                .collect()
        };

        let mut out = String::new();
        for (collection, method) in [(false, "select_related"), (true, "prefetch_related")] {
            let fields = eager(collection);
            if !fields.is_empty() {
                out.push_str(&format!(".{}({})", method, fields.join(", ")));
            }
        }
        if out.is_empty() {
            out.push_str(".all()");
        }
        out
    }

    fn push_op(&self, scope: &mut Scope, b: &mut CodeBuilder, op: &RepositoryOp) {
        let returns = scope.returns(op.returns);
        let params = std::iter::once("self".to_string())
            .chain(
                op.params
                    .iter()
                    .map(|p| format!("{}: {}", ident(&p.name), scope.param_type(&p.ty))),
            )
            .collect::<Vec<_>>()
            .join(", ");

        b.push_block(
            &format!("def {}({}) -> {}:", ident(&op.name), params, returns),
            None,
            |b| self.push_body(scope, b, op),
        );
    }

    fn push_body(&self, scope: &mut Scope, b: &mut CodeBuilder, op: &RepositoryOp) {
        let class = self.plan.name();
        let id = ident(&self.plan.entity.id.field);
        let param = |i: usize| {
            op.params
                .get(i)
                .map(|p| ident(&p.name))
                .unwrap_or_default()
        };
        let rows = if op.excludes_soft_deleted {
            "self._live()"
        } else {
            "self._queryset()"
        };

        let lookup = match &op.query {
            Query::Save => {
                b.push_line("entity.save()").push_line("return entity");
                return;
            }
            Query::DeleteById => {
                b.push_line(&format!("{}.objects.filter({}={}).delete()", class, id, param(0)));
                return;
            }
            Query::SoftDeleteById { field } => {
                scope.import("django.utils", "timezone");
                b.push_line(&format!(
                    "{}.objects.filter({}={}).update({}=timezone.now())",
                    class,
                    id,
                    param(0),
                    ident(field)
                ));
                return;
            }
            Query::RestoreById { field } => {
                b.push_line(&format!(
                    "{}.objects.filter({}={}).update({}=None)",
                    class,
                    id,
                    param(0),
                    ident(field)
                ));
                return;
            }
            Query::FindAll => None,
            Query::FindById => Some(format!("{}={}", id, param(0))),
            Query::FindDeleted { field } => Some(format!("{}__isnull=False", ident(field))),
            Query::FindByField { field, .. }
            | Query::FindByStatus { field }
            | Query::FindByStatusPaged { field }
            | Query::CountByStatus { field }
            | Query::FindByActor { field } => Some(format!("{}={}", ident(field), param(0))),
            Query::FindContaining { field } => {
                Some(format!("{}__icontains={}", ident(field), param(0)))
            }
            // Django's `<field>_id` attribute holds the foreign key value
            Query::FindByRelationId { field, .. } => {
                Some(format!("{}_id={}", ident(field), param(0)))
            }
            Query::FindByStatusIn { field } => Some(format!("{}__in={}", ident(field), param(0))),
            Query::FindByDateRange { field } => Some(format!(
                "{}__range=({}, {})",
                ident(field),
                param(0),
                param(1)
            )),
            Query::FindRecentlyCreated { field, lookback }
            | Query::CountRecentlyCreated { field, lookback }
            | Query::FindRecentlyModified { field, lookback } => {
                scope.import("datetime", "timedelta");
                scope.import("django.utils", "timezone");
                b.push_line(&format!(
                    "since = timezone.now() - timedelta(hours={})",
                    lookback.total_hours()
                ));
                Some(format!("{}__gte=since", ident(field)))
            }
            Query::FindByIdAndVersion { field } => Some(format!(
                "{}={}, {}={}",
                id,
                param(0),
                ident(field),
                param(1)
            )),
        };

        let query = match lookup {
            Some(lookup) => format!("{}.filter({})", rows, lookup),
            None => rows.to_string(),
        };
        match op.returns {
            Returns::Optional | Returns::Entity => {
                b.push_line(&format!("return {}.first()", query));
            }
            Returns::List => {
                b.push_line(&format!("return list({})", query));
            }
            Returns::Count => {
                b.push_line(&format!("return {}.count()", query));
            }
            Returns::Page => {
                let page = param(op.params.len().saturating_sub(1));
                b.push_line(&format!("rows = {}.order_by({})", query, quote(&id)))
                    .push_line(&format!("start = {}.page * {}.size", page, page))
                    .push_line(&format!(
                        "return list(rows[start : start + {}.size]), rows.count()",
                        page
                    ));
            }
            Returns::Unit => {
                b.push_line(&query);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use kiln_codegen::testing::{compile, order_ir, parent_child_ir, shop_ir};

    use super::*;

    fn render(ir: kiln_ir::DomainIR, class: &str) -> String {
        let ctx = compile(ir).unwrap();
        RepositoryPy::new(&ctx.plans[class]).render()
    }

    #[test]
    fn test_repository_class() {
        let py = render(parent_child_ir(), "Parent");

        assert!(py.contains("from uuid import UUID\n\nfrom django.db.models import QuerySet\n\nfrom ..models.parent import Parent\n\n\nclass ParentRepository:"));
        assert!(py.contains("    def _queryset(self) -> QuerySet[Parent]:\n        return Parent.objects.all()"));
        assert!(py.contains(
            "    def find_by_id(self, id: UUID) -> Parent | None:\n        return self._queryset().filter(id=id).first()"
        ));
        assert!(py.contains("    def save(self, entity: Parent) -> Parent:\n        entity.save()\n        return entity"));
        assert!(py.contains("Parent.objects.filter(id=id).delete()"));
        assert!(py.contains("return list(self._queryset().filter(name__icontains=name))"));
        assert!(!py.contains("PageRequest"));

        let child = render(parent_child_ir(), "Child");
        assert!(child.contains(
            "def find_by_parent_id(self, parent_id: UUID) -> list[Child]:\n        return list(self._queryset().filter(parent_id=parent_id))"
        ));
    }

    #[test]
    fn test_status_and_recent_queries() {
        let py = render(order_ir(), "Order");

        assert!(py.contains("@dataclass(frozen=True)\nclass PageRequest:\n    page: int\n    size: int"));
        assert!(!py.contains("from .order_repository"));
        assert!(py.contains(
            "def find_by_status_paged(self, status: OrderStatus, page: PageRequest) -> tuple[list[Order], int]:"
        ));
        assert!(py.contains("rows = self._queryset().filter(status=status).order_by(\"id\")"));
        assert!(py.contains("return list(rows[start : start + page.size]), rows.count()"));
        assert!(py.contains("filter(status__in=statuses)"));
        assert!(py.contains("since = timezone.now() - timedelta(hours=168)"));
        assert!(py.contains("def count_recently_created(self) -> int:"));
        assert!(py.contains("filter(created_at__range=(start, end))"));
    }

    #[test]
    fn test_soft_delete_and_eager_loading() {
        let py = render(shop_ir(), "Order");

        assert!(py.contains(
            "return Order.objects.select_related(\"customer\").prefetch_related(\"products\")"
        ));
        assert!(py.contains("return self._queryset().filter(deleted_at__isnull=True)"));
        assert!(py.contains("return self._live().filter(id=id).first()"));
        assert!(py.contains("Order.objects.filter(id=id).update(deleted_at=timezone.now())"));
        assert!(py.contains("Order.objects.filter(id=id).update(deleted_at=None)"));
        assert!(py.contains("return list(self._queryset().filter(deleted_at__isnull=False))"));
    }
}
