//! JPA entity renderer.

use kiln_codegen::{
    builder::CodeBuilder,
    generators::{ClassPlan, EntityField, FieldKind},
    relations::{EndKind, RelationEnd},
};
use kiln_core::{ArtifactKind, to_camel_case};
use kiln_ir::ProjectMeta;

use super::{JPA, LOMBOK};
use crate::java::{
    Scope, annotation, cache_usage, cascade_type, fetch_type, generation_type, ident,
};

const HIBERNATE: &str = "org.hibernate.annotations";

/// `entity/<Class>.java`.
pub struct EntityJava<'a> {
    project: &'a ProjectMeta,
    plan: &'a ClassPlan,
}

impl<'a> EntityJava<'a> {
    pub fn new(project: &'a ProjectMeta, plan: &'a ClassPlan) -> Self {
        Self { project, plan }
    }

    pub fn render(&self) -> String {
        let mut scope = Scope::new(self.project, self.plan, ArtifactKind::Entity);
        let entity = &self.plan.entity;
        scope.import_all(JPA, &["Column", "Entity", "GeneratedValue", "GenerationType", "Id", "Table"]);
        scope.import_all(LOMBOK, &["Getter", "NoArgsConstructor", "Setter"]);

        let mut body = CodeBuilder::java();
        body.push_line("@Entity")
            .push_line(&annotation(
                "Table",
                &[
                    format!("name = \"{}\"", entity.table_name),
                    format!("schema = \"{}\"", entity.schema),
                ],
            ))
            .push_line("@Getter")
            .push_line("@Setter")
            .push_line("@NoArgsConstructor");
        if let Some(usage) = entity.cache.and_then(|c| cache_usage(c.strategy)) {
            scope.import(JPA, "Cacheable");
            scope.import_all(HIBERNATE, &["Cache", "CacheConcurrencyStrategy"]);
            body.push_line("@Cacheable")
                .push_line(&format!("@Cache(usage = {})", usage));
        }

        body.push_block(
            &format!("public class {} {{", entity.class_name),
            Some("}"),
            |b| {
                for field in &entity.fields {
                    b.push_blank();
                    self.push_field(&mut scope, b, field);
                }
                if self.plan.service.history {
                    b.push_blank();
                    self.push_history_field(&mut scope, b);
                }
                if let Some(state) = entity.fields_of(FieldKind::State).next() {
                    b.push_blank();
                    let enum_name = scope.state_enum();
                    b.push_block(
                        &format!("public boolean canTransitionTo({} target) {{", enum_name),
                        Some("}"),
                        |b| {
                            let current = ident(&state.name);
                            b.push_line(&format!(
                                "return {} == null || {}.canTransitionTo(target);",
                                current, current
                            ));
                        },
                    );
                }
                if self.plan.service.history {
                    b.push_blank();
                    self.push_history_methods(&mut scope, b);
                }
            },
        );

        format!("{}{}", scope.header(), body.build())
    }

    fn push_field(&self, scope: &mut Scope, b: &mut CodeBuilder, field: &EntityField) {
        if let Some(end) = &field.relation {
            self.push_relation(scope, b, field, end);
            return;
        }

        let ty = scope.field_type(&field.ty);
        match field.kind {
            FieldKind::Id => {
                b.push_line("@Id").push_line(&format!(
                    "@GeneratedValue(strategy = {})",
                    generation_type(self.plan.entity.id.strategy)
                ));
                b.push_line(&column(field, &["updatable = false"]));
            }
            FieldKind::State => {
                scope.import_all(JPA, &["EnumType", "Enumerated"]);
                b.push_line("@Enumerated(EnumType.STRING)")
                    .push_line(&column(field, &[]));
            }
            FieldKind::Version => {
                scope.import(JPA, "Version");
                b.push_line("@Version").push_line(&column(field, &[]));
            }
            FieldKind::CreatedAt | FieldKind::CreatedBy => {
                b.push_line(&column(field, &["updatable = false"]));
            }
            _ => {
                if field.is_structured() {
                    scope.import(HIBERNATE, "JdbcTypeCode");
                    scope.import("org.hibernate.type", "SqlTypes");
                    b.push_line("@JdbcTypeCode(SqlTypes.JSON)");
                }
                b.push_line(&column(field, &[]));
            }
        }
        b.push_line(&format!("private {} {};", ty, ident(&field.name)));
    }

    fn push_relation(
        &self,
        scope: &mut Scope,
        b: &mut CodeBuilder,
        field: &EntityField,
        end: &RelationEnd,
    ) {
        let mut args = Vec::new();
        if let Some(mapped_by) = &end.mapped_by {
            args.push(format!("mappedBy = \"{}\"", mapped_by));
        }
        if let Some(cascade) = cascade_type(end.cascade) {
            scope.import(JPA, "CascadeType");
            args.push(format!("cascade = {}", cascade));
        }
        if let Some(fetch) = fetch_type(end.fetch) {
            scope.import(JPA, "FetchType");
            args.push(format!("fetch = {}", fetch));
        }
        if end.orphan_removal && end.kind == EndKind::OneToMany {
            args.push("orphanRemoval = true".to_string());
        }

        let kind = match end.kind {
            EndKind::OneToMany => "OneToMany",
            EndKind::ManyToOne => "ManyToOne",
            EndKind::ManyToMany => "ManyToMany",
        };
        scope.import(JPA, kind);
        if end.mapped_by.is_some() {
            scope.import("com.fasterxml.jackson.annotation", "JsonIgnore");
            b.push_line("@JsonIgnore");
        }
        b.push_line(&annotation(kind, &args));

        if end.bears_foreign_key() {
            scope.import_all(JPA, &["ForeignKey", "JoinColumn"]);
            let mut join = vec![format!("name = \"{}\"", field.column)];
            if let Some(fk) = &end.foreign_key {
                join.push(format!("foreignKey = @ForeignKey(name = \"{}\")", fk));
            }
            b.push_line(&annotation("JoinColumn", &join));
        }
        if let Some(table) = &end.join_table {
            scope.import_all(JPA, &["JoinColumn", "JoinTable"]);
            b.push_line(&format!("@JoinTable(name = \"{}\",", table.name));
            b.push_indent();
            b.push_line(&format!(
                "joinColumns = @JoinColumn(name = \"{}\"),",
                table.join_column
            ));
            b.push_line(&format!(
                "inverseJoinColumns = @JoinColumn(name = \"{}\"))",
                table.inverse_join_column
            ));
            b.push_dedent();
        }

        let ty = scope.field_type(&field.ty);
        if end.is_collection() {
            scope.import("java.util", "ArrayList");
            b.push_line(&format!(
                "private {} {} = new ArrayList<>();",
                ty,
                ident(&field.name)
            ));
        } else {
            b.push_line(&format!("private {} {};", ty, ident(&field.name)));
        }
    }

    fn push_history_field(&self, scope: &mut Scope, b: &mut CodeBuilder) {
        scope.import_all(JPA, &["CollectionTable", "ElementCollection", "JoinColumn"]);
        scope.import_all("java.util", &["ArrayList", "List"]);
        let entity = &self.plan.entity;
        let owner_column = self
            .plan
            .metadata
            .column(&format!("{}Id", to_camel_case(&entity.class_name)));
        b.push_line("@ElementCollection")
            .push_line(&format!(
                "@CollectionTable(name = \"{}_history\", joinColumns = @JoinColumn(name = \"{}\"))",
                entity.table_name, owner_column
            ))
            .push_line("private List<HistoryEntry> history = new ArrayList<>();");
    }

    fn push_history_methods(&self, scope: &mut Scope, b: &mut CodeBuilder) {
        scope.import("java.time", "LocalDateTime");
        scope.import(JPA, "Embeddable");
        scope.import(LOMBOK, "AllArgsConstructor");
        b.push_block(
            "public void addHistoryEntry(String action, String actor, String note) {",
            Some("}"),
            |b| {
                b.push_line("history.add(new HistoryEntry(action, actor, note, LocalDateTime.now()));");
            },
        );
        b.push_blank()
            .push_line("@Embeddable")
            .push_line("@Getter")
            .push_line("@NoArgsConstructor")
            .push_line("@AllArgsConstructor")
            .push_block("public static class HistoryEntry {", Some("}"), |b| {
                b.push_line("private String action;")
                    .push_line("private String actor;")
                    .push_line("private String note;")
                    .push_line("private LocalDateTime recordedAt;");
            });
    }
}

/// `@Column` with the field's column name and constraints.
fn column(field: &EntityField, extra: &[&str]) -> String {
    let mut args = vec![format!("name = \"{}\"", field.column)];
    if !field.nullable {
        args.push("nullable = false".to_string());
    }
    if field.unique && field.kind != FieldKind::Id {
        args.push("unique = true".to_string());
    }
    args.extend(extra.iter().map(|s| s.to_string()));
    annotation("Column", &args)
}
