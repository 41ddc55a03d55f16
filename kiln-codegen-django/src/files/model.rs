//! Django model renderer.

use kiln_codegen::{
    builder::CodeBuilder,
    generators::{ClassPlan, EntityField, FieldKind},
    relations::{EndKind, RelationEnd},
};
use kiln_core::ArtifactKind;
use kiln_ir::SemanticType;

use super::DJANGO_DB;
use crate::{
    py::{Scope, ident, quote},
    type_mapper::{id_field, model_field},
    vocabulary::on_delete,
};

/// `<app>/models/<class>.py`.
pub struct ModelPy<'a> {
    plan: &'a ClassPlan,
}

impl<'a> ModelPy<'a> {
    pub fn new(plan: &'a ClassPlan) -> Self {
        Self { plan }
    }

    pub fn render(&self) -> String {
        let mut scope = Scope::new(self.plan, ArtifactKind::Entity);
        let entity = &self.plan.entity;
        scope.import(DJANGO_DB, "models");

        let mut body = CodeBuilder::python();
        body.push_block(
            &format!("class {}(models.Model):", entity.class_name),
            None,
            |b| {
                for field in &entity.fields {
                    self.push_field(&mut scope, b, field);
                }
                if self.plan.service.history {
                    b.push_line("history = models.JSONField(default=list, blank=True, db_column=\"history\")");
                }

                b.push_blank().push_block("class Meta:", None, |b| {
                    b.push_line(&format!("db_table = {}", table_name(&entity.schema, &entity.table_name)));
                });

                if let Some(state) = entity.fields_of(FieldKind::State).next() {
                    let enum_name = scope.state_enum();
                    if let Some(module) = scope.state_module() {
                        scope.import(&module, "can_transition");
                    }
                    let current = ident(&state.name);
                    b.push_blank().push_block(
                        &format!("def can_transition_to(self, target: {}) -> bool:", enum_name),
                        None,
                        |b| {
                            b.push_line(&format!(
                                "return self.{} is None or can_transition(self.{}, target)",
                                current, current
                            ));
                        },
                    );
                }
                if self.plan.service.history {
                    scope.import("django.utils", "timezone");
                    b.push_blank().push_block(
                        "def add_history_entry(self, action: str, actor: str | None, note: str) -> None:",
                        None,
                        |b| {
                            b.push_line("self.history = [");
                            b.push_indent()
                                .push_line("*(self.history or []),")
                                .push_line("{");
                            b.push_indent()
                                .push_line("\"action\": action,")
                                .push_line("\"actor\": actor,")
                                .push_line("\"note\": note,")
                                .push_line("\"recorded_at\": timezone.now().isoformat(),");
                            b.push_dedent().push_line("},");
                            b.push_dedent().push_line("]");
                        },
                    );
                }
            },
        );

        format!("{}{}", scope.header(), body.build())
    }

    fn push_field(&self, scope: &mut Scope, b: &mut CodeBuilder, field: &EntityField) {
        if let Some(end) = &field.relation {
            self.push_relation(b, field, end);
            return;
        }

        let name = ident(&field.name);
        let (class, fixed): (&str, &[&str]) = match field.kind {
            FieldKind::Id => {
                let id = &self.plan.entity.id;
                let (class, fixed) = id_field(id.strategy, id.id_type);
                if fixed.contains(&"default=uuid4") {
                    scope.import("uuid", "uuid4");
                }
                (class, fixed)
            }
            FieldKind::CreatedAt => ("DateTimeField", &["auto_now_add=True"]),
            FieldKind::UpdatedAt => ("DateTimeField", &["auto_now=True"]),
            FieldKind::Version => ("IntegerField", &["default=0"]),
            FieldKind::DeletedAt => ("DateTimeField", &[]),
            FieldKind::CreatedBy | FieldKind::UpdatedBy => ("CharField", &["max_length=255"]),
            FieldKind::State => ("CharField", &["max_length=64"]),
            FieldKind::Attribute | FieldKind::Relation => {
                model_field(field.ty.semantic().unwrap_or(SemanticType::String))
            }
        };

        let mut args: Vec<String> = fixed.iter().map(|a| a.to_string()).collect();
        if field.kind == FieldKind::State {
            let enum_name = scope.state_enum();
            if enum_name != "str" {
                args.push(format!("choices={}.choices", enum_name));
            }
        }
        if field.unique && field.kind != FieldKind::Id {
            args.push("unique=True".into());
        }
        if field.nullable {
            args.push("null=True".into());
            args.push("blank=True".into());
        }
        args.push(format!("db_column={}", quote(&field.column)));
        b.push_line(&format!("{} = models.{}({})", name, class, args.join(", ")));
    }

    /// Foreign keys and owning many-to-many sides. The other sides are the
    /// reverse accessors Django derives from `related_name`.
    fn push_relation(&self, b: &mut CodeBuilder, field: &EntityField, end: &RelationEnd) {
        let name = ident(&field.name);
        let related_name = end
            .inverse
            .as_deref()
            .map_or_else(|| quote("+"), |inverse| quote(&ident(inverse)));

        match end.kind {
            EndKind::ManyToOne => {
                let handler = on_delete(end.cascade).unwrap_or(if field.nullable {
                    "models.SET_NULL"
                } else {
                    "models.PROTECT"
                });
                let mut args = vec![
                    quote(&end.target),
                    format!("on_delete={}", handler),
                    format!("related_name={}", related_name),
                ];
                if field.nullable {
                    args.push("null=True".into());
                    args.push("blank=True".into());
                }
                args.push(format!(
                    "db_column={}",
                    quote(end.join_column.as_deref().unwrap_or(&field.column))
                ));
                b.push_line(&format!("{} = models.ForeignKey({})", name, args.join(", ")));
            }
            EndKind::ManyToMany if end.is_owning() => {
                let mut args = vec![
                    quote(&end.target),
                    format!("related_name={}", related_name),
                    "blank=True".to_string(),
                ];
                if let Some(table) = &end.join_table {
                    args.push(format!("db_table={}", quote(&table.name)));
                }
                b.push_line(&format!("{} = models.ManyToManyField({})", name, args.join(", ")));
            }
            EndKind::ManyToMany | EndKind::OneToMany => {}
        }
    }
}

/// `db_table` value; tables outside `public` carry a quoted schema prefix.
fn table_name(schema: &str, table: &str) -> String {
    if schema == "public" {
        quote(table)
    } else {
        format!("'\"{}\".\"{}\"'", schema, table)
    }
}
