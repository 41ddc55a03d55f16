//! TypeORM repository renderer.

use kiln_codegen::{
    builder::CodeBuilder,
    generators::{ClassPlan, Param, ParamType, Query, RepositoryOp, Returns},
};
use kiln_core::ArtifactKind;

use super::TYPEORM;
use crate::ts::{Scope, ident};

/// `src/repositories/<class>.repository.ts`.
pub struct RepositoryTs<'a> {
    plan: &'a ClassPlan,
}

impl<'a> RepositoryTs<'a> {
    pub fn new(plan: &'a ClassPlan) -> Self {
        Self { plan }
    }

    pub fn render(&self) -> String {
        let mut scope = Scope::new(self.plan, ArtifactKind::Repository);
        let entity = scope.entity();
        scope.import_all(TYPEORM, &["DataSource", "Repository"]);

        let mut body = CodeBuilder::typescript();
        if self.is_paged() {
            body.push_block("export interface PageRequest {", Some("}"), |b| {
                b.push_line("page: number;").push_line("size: number;");
            })
            .push_blank();
        }
        body.push_block(
            &format!("export class {}Repository {{", entity),
            Some("}"),
            |b| {
                b.push_line(&format!(
                    "private readonly repository: Repository<{}>;",
                    entity
                ))
                .push_blank()
                .push_block("constructor(dataSource: DataSource) {", Some("}"), |b| {
                    b.push_line(&format!(
                        "this.repository = dataSource.getRepository({});",
                        entity
                    ));
                });
                for op in &self.plan.repository.ops {
                    b.push_blank();
                    self.push_op(&mut scope, b, op);
                }
            },
        );

        format!("{}{}", scope.header(), body.build())
    }

    fn is_paged(&self) -> bool {
        self.plan
            .repository
            .ops
            .iter()
            .any(|op| op.returns == Returns::Page)
    }

    fn push_op(&self, scope: &mut Scope, b: &mut CodeBuilder, op: &RepositoryOp) {
        let returns = scope.returns(op.returns);
        let params = op
            .params
            .iter()
            .map(|p| format!("{}: {}", ident(&p.name), scope.param_type(&p.ty)))
            .collect::<Vec<_>>()
            .join(", ");

        b.push_block(
            &format!("async {}({}): Promise<{}> {{", op.name, params, returns),
            Some("}"),
            |b| self.push_body(b, op),
        );
    }

    fn push_body(&self, b: &mut CodeBuilder, op: &RepositoryOp) {
        let id = &self.plan.entity.id.field;
        let param = |i: usize| {
            op.params
                .get(i)
                .map(|p| ident(&p.name))
                .unwrap_or_default()
        };

        match &op.query {
            Query::Save => {
                b.push_line(&format!("return this.repository.save({});", param(0)));
                return;
            }
            Query::DeleteById => {
                b.push_line(&format!("await this.repository.delete({});", param(0)));
                return;
            }
            Query::SoftDeleteById { .. } => {
                b.push_line(&format!(
                    "await this.repository.softDelete({});",
                    param(0)
                ));
                return;
            }
            Query::RestoreById { .. } => {
                b.push_line(&format!("await this.repository.restore({});", param(0)));
                return;
            }
            _ => {}
        }

        let mut chain = Chain::default();
        match &op.query {
            Query::FindById => chain.filter(format!("e.{} = :{}", id, param(0)), &op.params[..1]),
            Query::FindDeleted { field } => {
                chain.call("withDeleted()");
                chain.filter(format!("e.{} IS NOT NULL", field), &[]);
            }
            Query::FindByField { field, .. }
            | Query::FindByStatus { field }
            | Query::FindByStatusPaged { field }
            | Query::CountByStatus { field }
            | Query::FindByActor { field } => {
                chain.filter(format!("e.{} = :{}", field, param(0)), &op.params[..1])
            }
            Query::FindContaining { field } => {
                let name = param(0);
                chain.filter_with(
                    format!("LOWER(e.{}) LIKE LOWER(:{})", field, name),
                    format!("{{ {}: `%${{{}}}%` }}", name, name),
                );
            }
            Query::FindByRelationId { field, .. } => {
                let alias = ident(field);
                chain.call(&format!("innerJoin(\"e.{}\", \"{}\")", field, alias));
                chain.filter(format!("{}.{} = :{}", alias, id, param(0)), &op.params[..1]);
            }
            Query::FindByStatusIn { field } => {
                chain.filter(format!("e.{} IN (:...{})", field, param(0)), &op.params[..1])
            }
            Query::FindByDateRange { field } => chain.filter(
                format!("e.{} BETWEEN :{} AND :{}", field, param(0), param(1)),
                &op.params[..2],
            ),
            Query::FindRecentlyCreated { field, lookback }
            | Query::CountRecentlyCreated { field, lookback }
            | Query::FindRecentlyModified { field, lookback } => {
                b.push_line(&format!(
                    "const since = new Date(Date.now() - {} * 60 * 60 * 1000);",
                    lookback.total_hours()
                ));
                chain.filter_with(format!("e.{} >= :since", field), "{ since }".to_string());
            }
            Query::FindByIdAndVersion { field } => chain.filter(
                format!("e.{} = :{} AND e.{} = :{}", id, param(0), field, param(1)),
                &op.params[..2],
            ),
            Query::FindAll
            | Query::Save
            | Query::DeleteById
            | Query::SoftDeleteById { .. }
            | Query::RestoreById { .. } => {}
        }

        if op.excludes_soft_deleted
            && let Some(soft_delete) = &self.plan.repository.soft_delete
        {
            chain.filter(format!("e.{} IS NULL", soft_delete.field), &[]);
        }
        if let Some(cache) = self.plan.entity.cache
            && cache.strategy != kiln_ir::CacheStrategy::None
        {
            chain.call(&format!("cache({})", u64::from(cache.ttl_seconds) * 1000));
        }
        if let Some(page) = op.params.iter().find(|p| p.ty == ParamType::Page) {
            let page = ident(&page.name);
            chain.call(&format!("skip({}.page * {}.size)", page, page));
            chain.call(&format!("take({}.size)", page));
        }

        let terminal = match op.returns {
            Returns::Optional | Returns::Entity => "getOne()",
            Returns::List => "getMany()",
            Returns::Page => "getManyAndCount()",
            Returns::Count => "getCount()",
            Returns::Unit => "execute()",
        };
        chain.call(terminal);

        b.push_line("return this.repository");
        b.push_indent().push_line(".createQueryBuilder(\"e\")");
        let last = chain.calls.len().saturating_sub(1);
        for (i, call) in chain.calls.iter().enumerate() {
            let end = if i == last { ";" } else { "" };
            b.push_line(&format!(".{}{}", call, end));
        }
        b.push_dedent();
    }
}

/// Query builder calls after `createQueryBuilder`.
#[derive(Default)]
struct Chain {
    calls: Vec<String>,
    filtered: bool,
}

impl Chain {
    fn call(&mut self, call: &str) {
        self.calls.push(call.to_string());
    }

    /// `where`/`andWhere` binding the named parameters by shorthand.
    fn filter(&mut self, condition: String, params: &[Param]) {
        if params.is_empty() {
            self.push_where(format!("\"{}\"", condition));
        } else {
            let names = params
                .iter()
                .map(|p| ident(&p.name))
                .collect::<Vec<_>>()
                .join(", ");
            self.filter_with(condition, format!("{{ {} }}", names));
        }
    }

    fn filter_with(&mut self, condition: String, bindings: String) {
        self.push_where(format!("\"{}\", {}", condition, bindings));
    }

    fn push_where(&mut self, args: String) {
        let method = if self.filtered { "andWhere" } else { "where" };
        self.filtered = true;
        self.calls.push(format!("{}({})", method, args));
    }
}
