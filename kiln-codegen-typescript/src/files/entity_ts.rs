//! TypeORM entity renderer.

use kiln_codegen::{
    builder::CodeBuilder,
    generators::{ClassPlan, EntityField, FieldKind, FieldType},
    relations::{EndKind, RelationEnd},
};
use kiln_core::ArtifactKind;
use kiln_ir::SemanticType;

use super::TYPEORM;
use crate::{
    ts::{Scope, ident, object, var_name},
    type_mapper::{column_type, generation_strategy},
    vocabulary::{cascade_option, eager_option},
};

/// `src/entities/<class>.entity.ts`.
pub struct EntityTs<'a> {
    plan: &'a ClassPlan,
}

impl<'a> EntityTs<'a> {
    pub fn new(plan: &'a ClassPlan) -> Self {
        Self { plan }
    }

    pub fn render(&self) -> String {
        let mut scope = Scope::new(self.plan, ArtifactKind::Entity);
        let entity = &self.plan.entity;
        scope.import(TYPEORM, "Entity");

        let table = object(&[
            ("name".into(), quote(&entity.table_name)),
            ("schema".into(), quote(&entity.schema)),
        ])
        .unwrap_or_default();

        let mut body = CodeBuilder::typescript();
        if self.plan.service.history {
            body.push_block("export interface HistoryEntry {", Some("}"), |b| {
                b.push_line("action: string;")
                    .push_line("actor: string | null;")
                    .push_line("note: string;")
                    .push_line("recordedAt: string;");
            })
            .push_blank();
        }
        body.push_line(&format!("@Entity({})", table)).push_block(
            &format!("export class {} {{", entity.class_name),
            Some("}"),
            |b| {
                for (i, field) in entity.fields.iter().enumerate() {
                    if i > 0 {
                        b.push_blank();
                    }
                    self.push_field(&mut scope, b, field);
                }
                if self.plan.service.history {
                    scope.import(TYPEORM, "Column");
                    b.push_blank()
                        .push_line("@Column({ name: \"history\", type: \"jsonb\", default: () => \"'[]'\" })")
                        .push_line("history!: HistoryEntry[];");
                }
                if let Some(state) = entity.fields_of(FieldKind::State).next() {
                    let enum_name = scope.state_enum();
                    if let Some(module) = scope.state_module() {
                        scope.import(&module, "canTransition");
                    }
                    let current = ident(&state.name);
                    b.push_blank().push_block(
                        &format!("canTransitionTo(target: {}): boolean {{", enum_name),
                        Some("}"),
                        |b| {
                            b.push_line(&format!(
                                "return this.{} == null || canTransition(this.{}, target);",
                                current, current
                            ));
                        },
                    );
                }
                if self.plan.service.history {
                    b.push_blank().push_block(
                        "addHistoryEntry(action: string, actor: string | null, note: string): void {",
                        Some("}"),
                        |b| {
                            b.push_line("this.history = [");
                            b.push_indent()
                                .push_line("...(this.history ?? []),")
                                .push_line("{ action, actor, note, recordedAt: new Date().toISOString() },");
                            b.push_dedent().push_line("];");
                        },
                    );
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

        let name = ident(&field.name);
        let ty = scope.field_type(&field.ty);
        let mut options = vec![("name".to_string(), quote(&field.column))];
        let decorator = match field.kind {
            FieldKind::Id => {
                let strategy = generation_strategy(self.plan.entity.id.strategy);
                scope.import(TYPEORM, "PrimaryGeneratedColumn");
                b.push_line(&format!(
                    "@PrimaryGeneratedColumn(\"{}\", {{ name: {} }})",
                    strategy,
                    quote(&field.column)
                ));
                b.push_line(&format!("{}!: {};", name, ty));
                return;
            }
            FieldKind::CreatedAt => "CreateDateColumn",
            FieldKind::UpdatedAt => "UpdateDateColumn",
            FieldKind::Version => "VersionColumn",
            FieldKind::DeletedAt => "DeleteDateColumn",
            FieldKind::State => {
                options.push(("type".into(), quote("varchar")));
                "Column"
            }
            _ => {
                let semantic = field.ty.semantic().unwrap_or(SemanticType::String);
                options.push(("type".into(), quote(column_type(semantic))));
                if field.unique {
                    options.push(("unique".into(), "true".into()));
                }
                "Column"
            }
        };
        if field.nullable {
            options.push(("nullable".into(), "true".into()));
        }
        scope.import(TYPEORM, decorator);
        b.push_line(&format!(
            "@{}({})",
            decorator,
            object(&options).unwrap_or_default()
        ));
        b.push_line(&declaration(&name, &ty, field.nullable));
    }

    fn push_relation(
        &self,
        scope: &mut Scope,
        b: &mut CodeBuilder,
        field: &EntityField,
        end: &RelationEnd,
    ) {
        let target = scope.model_type(&end.target);
        let decorator = match end.kind {
            EndKind::OneToMany => "OneToMany",
            EndKind::ManyToOne => "ManyToOne",
            EndKind::ManyToMany => "ManyToMany",
        };
        scope.import(TYPEORM, decorator);

        let mut args = vec![format!("() => {}", target)];
        if let Some(inverse) = &end.inverse {
            let var = var_name(&end.target);
            args.push(format!("({}) => {}.{}", var, var, ident(inverse)));
        }
        let mut options = Vec::new();
        // Inverse sides leave cascades to the owning side
        if (end.is_owning() || end.kind == EndKind::OneToMany)
            && let Some(cascade) = cascade_option(end.cascade)
        {
            options.push(("cascade".to_string(), cascade.to_string()));
        }
        if let Some(eager) = eager_option(end.fetch) {
            options.push(("eager".to_string(), eager.to_string()));
        }
        args.extend(object(&options));
        b.push_line(&format!("@{}({})", decorator, args.join(", ")));

        if end.bears_foreign_key() {
            scope.import(TYPEORM, "JoinColumn");
            let mut join = vec![("name".to_string(), quote(&field.column))];
            if let Some(fk) = &end.foreign_key {
                join.push(("foreignKeyConstraintName".to_string(), quote(fk)));
            }
            b.push_line(&format!(
                "@JoinColumn({})",
                object(&join).unwrap_or_default()
            ));
        }
        if let Some(table) = &end.join_table {
            scope.import(TYPEORM, "JoinTable");
            b.push_line("@JoinTable({");
            b.push_indent()
                .push_line(&format!("name: {},", quote(&table.name)))
                .push_line(&format!("joinColumn: {{ name: {} }},", quote(&table.join_column)))
                .push_line(&format!(
                    "inverseJoinColumn: {{ name: {} }},",
                    quote(&table.inverse_join_column)
                ));
            b.push_dedent().push_line("})");
        }

        let ty = scope.field_type(&FieldType::Entity {
            target: end.target.clone(),
            collection: end.is_collection(),
        });
        let name = ident(&field.name);
        if end.is_collection() {
            b.push_line(&format!("{}!: {};", name, ty));
        } else {
            b.push_line(&format!("{}?: {} | null;", name, ty));
        }
    }
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s)
}

/// Property declaration; nullable columns are optional and admit `null`.
fn declaration(name: &str, ty: &str, nullable: bool) -> String {
    if nullable {
        format!("{}?: {} | null;", name, ty)
    } else {
        format!("{}!: {};", name, ty)
    }
}
