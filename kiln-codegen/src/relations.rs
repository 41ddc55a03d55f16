//! Association graph between classes.
//!
//! Declared relationships are normalized into associations (a OneToMany and
//! its paired ManyToOne describe the same association) and then expanded
//! into the relation ends each entity carries.

use indexmap::IndexMap;
use kiln_core::{NamingStyle, convert, pluralize, to_camel_case};
use kiln_ir::{Cardinality, CascadeType, ClassModel, EffectiveMetadata, FetchType, IdType};

/// Shape of one side of an association.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndKind {
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl EndKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndKind::OneToMany => "one-to-many",
            EndKind::ManyToOne => "many-to-one",
            EndKind::ManyToMany => "many-to-many",
        }
    }
}

/// Join table owned by the owning side of a ManyToMany association.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinTable {
    pub name: String,
    /// Column referencing the owning class.
    pub join_column: String,
    /// Column referencing the other class.
    pub inverse_join_column: String,
}

/// A relationship field as seen from one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationEnd {
    /// Class carrying the field.
    pub owner: String,
    /// Class the field points at.
    pub target: String,
    /// Id type of the target class.
    pub target_id: IdType,
    pub field: String,
    pub kind: EndKind,
    /// Field on the target class that owns the mapping, for inverse sides.
    pub mapped_by: Option<String>,
    /// Field on the target class pointing back at the owner, when the
    /// association has one.
    pub inverse: Option<String>,
    /// Foreign key column, for ManyToOne sides.
    pub join_column: Option<String>,
    /// Foreign key constraint name, for ManyToOne sides.
    pub foreign_key: Option<String>,
    pub join_table: Option<JoinTable>,
    pub cascade: CascadeType,
    pub fetch: FetchType,
    pub orphan_removal: bool,
}

impl RelationEnd {
    pub fn is_collection(&self) -> bool {
        matches!(self.kind, EndKind::OneToMany | EndKind::ManyToMany)
    }

    /// Whether the owner's table holds the foreign key column.
    pub fn bears_foreign_key(&self) -> bool {
        self.kind == EndKind::ManyToOne
    }

    /// Whether this side owns the mapping (holds the FK or the join table).
    pub fn is_owning(&self) -> bool {
        self.mapped_by.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssociationKind {
    /// `a` is the one side, `b` the many side.
    OneToMany,
    /// `a` owns the join table.
    ManyToMany,
}

#[derive(Debug, Clone)]
struct Association {
    kind: AssociationKind,
    a: String,
    b: String,
    a_field: Option<String>,
    b_field: Option<String>,
    declared_by_a: bool,
    declared_by_b: bool,
}

/// All relation ends of a run, grouped by owning class.
#[derive(Debug, Clone, Default)]
pub struct RelationGraph {
    ends: IndexMap<String, Vec<RelationEnd>>,
}

impl RelationGraph {
    /// Build the graph for resolved classes.
    ///
    /// Every relationship must point at a class present in `metadata`;
    /// callers remove classes with dangling relationships beforehand
    /// (see [`dangling_targets`]).
    pub fn build(classes: &[ClassModel], metadata: &IndexMap<String, EffectiveMetadata>) -> Self {
        let mut associations: Vec<Association> = Vec::new();

        for class in classes.iter().filter(|c| metadata.contains_key(&c.name)) {
            for rel in &class.relationships {
                if !metadata.contains_key(&rel.target_class) {
                    continue;
                }
                let source = class.name.clone();
                let target = rel.target_class.clone();
                let field = rel.target_field_name.clone();
                let inverse = rel.inverse_field_name.clone();

                match rel.cardinality {
                    Cardinality::OneToMany => merge_or_push(
                        &mut associations,
                        AssociationKind::OneToMany,
                        (source, field),
                        (target, inverse),
                        true,
                    ),
                    Cardinality::ManyToOne => merge_or_push(
                        &mut associations,
                        AssociationKind::OneToMany,
                        (target, inverse),
                        (source, field),
                        false,
                    ),
                    Cardinality::ManyToMany => {
                        merge_many_to_many(&mut associations, source, target, field, inverse)
                    }
                }
            }
        }

        let mut graph = Self::default();
        for class in classes.iter().filter(|c| metadata.contains_key(&c.name)) {
            graph.ends.insert(class.name.clone(), Vec::new());
        }
        for assoc in &associations {
            let (Some(a_meta), Some(b_meta)) = (metadata.get(&assoc.a), metadata.get(&assoc.b))
            else {
                continue;
            };
            match assoc.kind {
                AssociationKind::OneToMany => graph.expand_one_to_many(assoc, a_meta, b_meta),
                AssociationKind::ManyToMany => graph.expand_many_to_many(assoc, a_meta, b_meta),
            }
        }
        graph
    }

    /// Relation ends carried by `class`.
    pub fn ends_for(&self, class: &str) -> &[RelationEnd] {
        self.ends.get(class).map(Vec::as_slice).unwrap_or_default()
    }

    /// Iterate over every end in the graph.
    pub fn iter(&self) -> impl Iterator<Item = &RelationEnd> {
        self.ends.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.ends.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&mut self, end: RelationEnd) {
        self.ends.entry(end.owner.clone()).or_default().push(end);
    }

    fn expand_one_to_many(
        &mut self,
        assoc: &Association,
        one: &EffectiveMetadata,
        many: &EffectiveMetadata,
    ) {
        let one_field = assoc
            .a_field
            .clone()
            .unwrap_or_else(|| to_camel_case(&pluralize(&assoc.b)));
        let many_field = assoc
            .b_field
            .clone()
            .unwrap_or_else(|| to_camel_case(&assoc.a));

        self.push(RelationEnd {
            owner: assoc.a.clone(),
            target: assoc.b.clone(),
            target_id: many.id.id_type,
            field: one_field.clone(),
            kind: EndKind::OneToMany,
            mapped_by: Some(many_field.clone()),
            inverse: Some(many_field.clone()),
            join_column: None,
            foreign_key: None,
            join_table: None,
            cascade: one.relations.cascade,
            fetch: one.relations.fetch,
            orphan_removal: one.relations.orphan_removal,
        });

        self.push(RelationEnd {
            owner: assoc.b.clone(),
            target: assoc.a.clone(),
            target_id: one.id.id_type,
            join_column: Some(id_column(&many_field, many.naming.column)),
            foreign_key: Some(format!("fk_{}_{}", many.table_name, one.table_name)),
            field: many_field,
            kind: EndKind::ManyToOne,
            mapped_by: None,
            inverse: Some(one_field),
            join_table: None,
            cascade: many.relations.cascade,
            fetch: many.relations.fetch,
            orphan_removal: false,
        });
    }

    fn expand_many_to_many(
        &mut self,
        assoc: &Association,
        owner: &EffectiveMetadata,
        other: &EffectiveMetadata,
    ) {
        let self_referential = assoc.a == assoc.b;
        let owner_field = assoc
            .a_field
            .clone()
            .unwrap_or_else(|| to_camel_case(&pluralize(&assoc.b)));
        let column = owner.naming.column;
        let inverse_join_column = if self_referential {
            id_column(&format!("related{}", assoc.b), column)
        } else {
            id_column(&assoc.b, column)
        };

        let has_inverse =
            !self_referential && (other.relations.bidirectional || assoc.declared_by_b);
        let inverse_field = assoc
            .b_field
            .clone()
            .unwrap_or_else(|| to_camel_case(&pluralize(&assoc.a)));

        self.push(RelationEnd {
            owner: assoc.a.clone(),
            target: assoc.b.clone(),
            target_id: other.id.id_type,
            field: owner_field.clone(),
            kind: EndKind::ManyToMany,
            mapped_by: None,
            inverse: has_inverse.then(|| inverse_field.clone()),
            join_column: None,
            foreign_key: None,
            join_table: Some(JoinTable {
                name: format!("{}_{}", owner.table_name, other.table_name),
                join_column: id_column(&assoc.a, column),
                inverse_join_column,
            }),
            cascade: owner.relations.cascade,
            fetch: owner.relations.fetch,
            orphan_removal: false,
        });

        if !has_inverse {
            return;
        }

        self.push(RelationEnd {
            owner: assoc.b.clone(),
            target: assoc.a.clone(),
            target_id: owner.id.id_type,
            field: inverse_field,
            kind: EndKind::ManyToMany,
            mapped_by: Some(owner_field.clone()),
            inverse: Some(owner_field),
            join_column: None,
            foreign_key: None,
            join_table: None,
            cascade: other.relations.cascade,
            fetch: other.relations.fetch,
            orphan_removal: false,
        });
    }
}

/// Targets of `class`'s relationships that are not in `live`.
pub fn dangling_targets<'a>(class: &'a ClassModel, live: &[&str]) -> Vec<&'a str> {
    class
        .relationships
        .iter()
        .map(|r| r.target_class.as_str())
        .filter(|target| !live.contains(target))
        .collect()
}

fn id_column(name: &str, style: NamingStyle) -> String {
    convert(&format!("{}Id", name), style)
}

fn merge_or_push(
    associations: &mut Vec<Association>,
    kind: AssociationKind,
    (a, a_field): (String, Option<String>),
    (b, b_field): (String, Option<String>),
    from_a: bool,
) {
    let counterpart = associations.iter_mut().find(|assoc| {
        assoc.kind == kind
            && assoc.a == a
            && assoc.b == b
            && if from_a {
                assoc.declared_by_b && !assoc.declared_by_a
            } else {
                assoc.declared_by_a && !assoc.declared_by_b
            }
    });

    match counterpart {
        Some(assoc) => {
            assoc.a_field = assoc.a_field.take().or(a_field);
            assoc.b_field = assoc.b_field.take().or(b_field);
            assoc.declared_by_a = true;
            assoc.declared_by_b = true;
        }
        None => associations.push(Association {
            kind,
            a,
            b,
            a_field,
            b_field,
            declared_by_a: from_a,
            declared_by_b: !from_a,
        }),
    }
}

fn merge_many_to_many(
    associations: &mut Vec<Association>,
    source: String,
    target: String,
    field: Option<String>,
    inverse: Option<String>,
) {
    // The reverse declaration of an existing association, declared on the other class
    let reverse = associations.iter_mut().find(|assoc| {
        assoc.kind == AssociationKind::ManyToMany
            && source != target
            && assoc.a == target
            && assoc.b == source
            && !assoc.declared_by_b
    });

    match reverse {
        Some(assoc) => {
            assoc.a_field = assoc.a_field.take().or(inverse);
            assoc.b_field = assoc.b_field.take().or(field);
            assoc.declared_by_b = true;
        }
        None => associations.push(Association {
            kind: AssociationKind::ManyToMany,
            a: source,
            b: target,
            a_field: field,
            b_field: inverse,
            declared_by_a: true,
            declared_by_b: false,
        }),
    }
}
