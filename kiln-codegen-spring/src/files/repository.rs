//! Spring Data repository renderer.

use kiln_codegen::{
    builder::CodeBuilder,
    generators::{ClassPlan, Param, ParamType, Query, RepositoryOp},
};
use kiln_core::ArtifactKind;
use kiln_ir::{LookbackWindow, ProjectMeta};

use crate::java::{Scope, ident};

const SPRING_JPA: &str = "org.springframework.data.jpa.repository";

/// `repository/<Class>Repository.java`.
pub struct RepositoryJava<'a> {
    project: &'a ProjectMeta,
    plan: &'a ClassPlan,
}

/// A JPQL statement and whether it modifies rows.
struct Jpql {
    text: String,
    modifying: bool,
}

impl<'a> RepositoryJava<'a> {
    pub fn new(project: &'a ProjectMeta, plan: &'a ClassPlan) -> Self {
        Self { project, plan }
    }

    pub fn render(&self) -> String {
        let mut scope = Scope::new(self.project, self.plan, ArtifactKind::Repository);
        let entity = scope.entity();
        let id = scope.param_type(&ParamType::Id);
        scope.import(SPRING_JPA, "JpaRepository");
        scope.import("org.springframework.stereotype", "Repository");

        let mut body = CodeBuilder::java();
        body.push_line("@Repository").push_block(
            &format!(
                "public interface {}Repository extends JpaRepository<{}, {}> {{",
                entity, entity, id
            ),
            Some("}"),
            |b| {
                for op in &self.plan.repository.ops {
                    // Built-ins only need redeclaring to hide deleted rows
                    if op.is_builtin() && !op.excludes_soft_deleted {
                        continue;
                    }
                    let Some(jpql) = self.jpql(op) else {
                        continue;
                    };
                    b.push_blank();
                    self.push_op(&mut scope, b, op, &jpql);
                }
            },
        );

        format!("{}{}", scope.header(), body.build())
    }

    fn push_op(&self, scope: &mut Scope, b: &mut CodeBuilder, op: &RepositoryOp, jpql: &Jpql) {
        scope.import(SPRING_JPA, "Query");
        if jpql.modifying {
            scope.import(SPRING_JPA, "Modifying");
            scope.import("org.springframework.transaction.annotation", "Transactional");
            b.push_line("@Modifying").push_line("@Transactional");
        }
        if op.is_builtin() {
            b.push_line("@Override");
        }
        b.push_line(&format!("@Query(\"{}\")", jpql.text));

        let returns = scope.returns(op.returns);
        match lookback(op) {
            Some(window) => {
                let since = format!("{}Since", op.name);
                let ty = scope.param_type(&ParamType::Timestamp);
                b.push_line(&format!(
                    "{} {}(@Param(\"since\") {} since);",
                    returns, since, ty
                ));
                b.push_blank().push_block(
                    &format!("default {} {}() {{", returns, op.name),
                    Some("}"),
                    |b| {
                        b.push_line(&format!(
                            "return {}(LocalDateTime.now().minusHours({}));",
                            since,
                            window.total_hours()
                        ));
                    },
                );
            }
            None => {
                let params = self.params(scope, &op.params);
                b.push_line(&format!("{} {}({});", returns, op.name, params));
            }
        }
        scope.import("org.springframework.data.repository.query", "Param");
    }

    fn params(&self, scope: &mut Scope, params: &[Param]) -> String {
        params
            .iter()
            .map(|p| {
                let ty = scope.param_type(&p.ty);
                let name = ident(&p.name);
                if p.ty == ParamType::Page {
                    format!("{} {}", ty, name)
                } else {
                    format!("@Param(\"{}\") {} {}", name, ty, name)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn jpql(&self, op: &RepositoryOp) -> Option<Jpql> {
        let entity = &self.plan.entity.class_name;
        let id = &self.plan.entity.id.field;
        let param = |i: usize| op.params.get(i).map(|p| ident(&p.name)).unwrap_or_default();

        let select = |conditions: Vec<String>| self.select("e", conditions, op);
        let count = |conditions: Vec<String>| self.select("COUNT(e)", conditions, op);
        let update = |set: String| Jpql {
            text: format!("UPDATE {} e SET {} WHERE e.{} = :{}", entity, set, id, param(0)),
            modifying: true,
        };

        let jpql = match &op.query {
            Query::FindById => select(vec![format!("e.{} = :{}", id, param(0))]),
            Query::FindAll => select(vec![]),
            Query::Save | Query::DeleteById => return None,
            Query::SoftDeleteById { field } => update(format!("e.{} = CURRENT_TIMESTAMP", field)),
            Query::RestoreById { field } => update(format!("e.{} = NULL", field)),
            Query::FindDeleted { field } => select(vec![format!("e.{} IS NOT NULL", field)]),
            Query::FindByField { field, .. }
            | Query::FindByStatus { field }
            | Query::FindByStatusPaged { field }
            | Query::FindByActor { field } => select(vec![format!("e.{} = :{}", field, param(0))]),
            Query::FindContaining { field } => select(vec![format!(
                "LOWER(e.{}) LIKE LOWER(CONCAT('%', :{}, '%'))",
                field,
                param(0)
            )]),
            Query::FindByRelationId { field, .. } => {
                select(vec![format!("e.{}.{} = :{}", field, id, param(0))])
            }
            Query::FindByStatusIn { field } => select(vec![format!("e.{} IN :{}", field, param(0))]),
            Query::CountByStatus { field } => count(vec![format!("e.{} = :{}", field, param(0))]),
            Query::FindByDateRange { field } => select(vec![format!(
                "e.{} BETWEEN :{} AND :{}",
                field,
                param(0),
                param(1)
            )]),
            Query::FindRecentlyCreated { field, .. } | Query::FindRecentlyModified { field, .. } => {
                select(vec![format!("e.{} >= :since", field)])
            }
            Query::CountRecentlyCreated { field, .. } => {
                count(vec![format!("e.{} >= :since", field)])
            }
            Query::FindByIdAndVersion { field } => select(vec![
                format!("e.{} = :{}", id, param(0)),
                format!("e.{} = :{}", field, param(1)),
            ]),
        };
        Some(jpql)
    }

    fn select(&self, what: &str, mut conditions: Vec<String>, op: &RepositoryOp) -> Jpql {
        if op.excludes_soft_deleted
            && let Some(soft_delete) = &self.plan.repository.soft_delete
        {
            conditions.push(format!("e.{} IS NULL", soft_delete.field));
        }
        let mut text = format!("SELECT {} FROM {} e", what, self.plan.entity.class_name);
        if !conditions.is_empty() {
            text.push_str(" WHERE ");
            text.push_str(&conditions.join(" AND "));
        }
        Jpql {
            text,
            modifying: false,
        }
    }
}

fn lookback(op: &RepositoryOp) -> Option<LookbackWindow> {
    match &op.query {
        Query::FindRecentlyCreated { lookback, .. }
        | Query::CountRecentlyCreated { lookback, .. }
        | Query::FindRecentlyModified { lookback, .. } => Some(*lookback),
        _ => None,
    }
}
