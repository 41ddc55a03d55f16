//! Model fixtures and a minimal adapter for generator tests.
//!
//! This module is only available when the `testing` feature is enabled
//! or during tests.

use eyre::Result;
use kiln_core::{ArtifactKind, Overwrite};
use kiln_ir::{
    Attribute, CascadeType, Cardinality, ClassModel, DomainIR, FetchType, GlobalConfig, IdType,
    ProjectMeta, Relationship, SemanticType,
};
use tempfile::TempDir;

use crate::{
    generation::{GenerationOutcome, WriteStats, generate},
    generators::ClassPlan,
    pipeline::{CompilationContext, Pipeline},
    stack::{Layout, NamingConvention, StackAdapter, TypeTable},
};

/// `Order { status }` with audit fields on.
pub fn order_ir() -> DomainIR {
    let config = GlobalConfig {
        audit_fields: true,
        ..GlobalConfig::default()
    };
    DomainIR::new(project())
        .with_config(config)
        .class(ClassModel::new("Order").attribute(Attribute::new("status", SemanticType::String)))
}

/// `Parent` one-to-many `Child`.
pub fn parent_child_ir() -> DomainIR {
    DomainIR::new(project())
        .class(
            ClassModel::new("Parent")
                .attribute(Attribute::new("name", SemanticType::String))
                .relationship("Child", Cardinality::OneToMany),
        )
        .class(ClassModel::new("Child").attribute(Attribute::new("name", SemanticType::String)))
}

/// A stateful shipment with a tracking number, plus a courier.
pub fn shipment_ir() -> DomainIR {
    DomainIR::new(project())
        .class(
            ClassModel::new("Shipment")
                .attribute(Attribute::new("trackingNumber", SemanticType::String).unique())
                .attribute(Attribute::new("status", SemanticType::String))
                .relationship("Courier", Cardinality::ManyToOne),
        )
        .class(ClassModel::new("Courier").attribute(Attribute::new("name", SemanticType::String)))
}

/// A user account belonging to an organization.
pub fn user_ir() -> DomainIR {
    DomainIR::new(project())
        .class(
            ClassModel::new("User")
                .attribute(Attribute::new("email", SemanticType::String).required().unique())
                .attribute(Attribute::new("accountType", SemanticType::String))
                .attribute(Attribute::new("active", SemanticType::Boolean)),
        )
        .class(
            ClassModel::new("Organization")
                .attribute(Attribute::new("name", SemanticType::String))
                .relationship("User", Cardinality::OneToMany),
        )
}

/// Every feature switched on at once: audit, soft delete, cascade, eager
/// fetch, many-to-many and a state machine.
pub fn shop_ir() -> DomainIR {
    let config = GlobalConfig {
        id_type: Some(IdType::Long),
        id_strategy: kiln_ir::IdStrategy::AutoIncrement,
        audit_fields: true,
        soft_delete: true,
        cascade: CascadeType::All,
        fetch: FetchType::Eager,
        orphan_removal: true,
        ..GlobalConfig::default()
    };
    DomainIR::new(project())
        .with_config(config)
        .class(
            ClassModel::new("Customer")
                .attribute(Attribute::new("email", SemanticType::String).required().unique())
                .attribute(Attribute::new("fullName", SemanticType::String))
                .relationship("Order", Cardinality::OneToMany),
        )
        .class(
            ClassModel::new("Order")
                .attribute(Attribute::new("reference", SemanticType::String).unique())
                .attribute(Attribute::new("total", SemanticType::Double))
                .attribute(Attribute::new("placedOn", SemanticType::Date))
                .attribute(Attribute::new("details", SemanticType::Json))
                .with_state(Some("OrderState"))
                .with_relationship(
                    Relationship::new("Order", "Product", Cardinality::ManyToMany)
                        .with_field("products")
                        .with_inverse_field("orders"),
                ),
        )
        .class(
            ClassModel::new("Product")
                .attribute(Attribute::new("name", SemanticType::String))
                .attribute(Attribute::new("price", SemanticType::Double))
                .attribute(Attribute::new("sku", SemanticType::Uuid).unique()),
        )
}

fn project() -> ProjectMeta {
    ProjectMeta {
        name: "shop".into(),
        package: Some("com.example.shop".into()),
        app: Some("shop".into()),
    }
}

/// Run the default pipeline over an IR.
pub fn compile(ir: DomainIR) -> Result<CompilationContext> {
    Pipeline::new().run_ir(ir)
}

/// Compile an IR and render it with `adapter`.
pub fn render(ir: DomainIR, adapter: &dyn StackAdapter) -> Result<GenerationOutcome> {
    let ctx = compile(ir)?;
    generate(&ctx, adapter)
}

/// Write an outcome into a fresh temporary directory.
pub fn write_to_temp(outcome: GenerationOutcome) -> Result<(TempDir, WriteStats)> {
    let temp = TempDir::new()?;
    let stats = outcome
        .into_registry(Overwrite::Always)
        .write_all(temp.path())?;
    Ok((temp, stats))
}

/// Adapter that renders plans as plain operation listings.
#[derive(Debug, Clone, Copy)]
pub struct PlainAdapter;

const PLAIN_NAMING: NamingConvention = NamingConvention {
    class_to_type: kiln_core::to_pascal_case,
    class_to_file: kiln_core::to_pascal_case,
    field_to_name: kiln_core::to_camel_case,
    reserved_words: &[],
    escape_reserved: str::to_string,
};

const PLAIN_TYPES: TypeTable = TypeTable {
    scalars: &[
        (SemanticType::String, "text"),
        (SemanticType::Integer, "int"),
        (SemanticType::Long, "long"),
        (SemanticType::Boolean, "bool"),
    ],
    ids: &[(IdType::Long, "long")],
};

impl StackAdapter for PlainAdapter {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn type_table(&self) -> &TypeTable {
        &PLAIN_TYPES
    }

    fn naming(&self) -> &NamingConvention {
        &PLAIN_NAMING
    }

    fn layout(&self, _project: &ProjectMeta) -> Layout {
        Layout {
            root: "out".into(),
            entity_dir: "entity".into(),
            repository_dir: "repository".into(),
            service_dir: "service".into(),
            controller_dir: "controller".into(),
            extension: "txt",
        }
    }

    fn file_stem(&self, class_name: &str, kind: ArtifactKind) -> String {
        match kind {
            ArtifactKind::Entity => class_name.to_string(),
            other => format!("{}{}", class_name, kiln_core::to_pascal_case(other.as_str())),
        }
    }

    fn cascade_vocabulary(&self, cascade: CascadeType) -> Option<&'static str> {
        Some(cascade.as_str())
    }

    fn fetch_vocabulary(&self, fetch: FetchType) -> Option<&'static str> {
        Some(fetch.as_str())
    }

    fn render_entity(&self, _project: &ProjectMeta, plan: &ClassPlan) -> String {
        plan.entity
            .fields
            .iter()
            .map(|f| {
                let ty = self.type_table().field(&f.ty).unwrap_or("ref");
                format!("{}: {}\n", f.name, ty)
            })
            .collect()
    }

    fn render_repository(&self, _project: &ProjectMeta, plan: &ClassPlan) -> String {
        lines(plan.repository.op_names())
    }

    fn render_service(&self, _project: &ProjectMeta, plan: &ClassPlan) -> String {
        lines(plan.service.op_names())
    }

    fn render_controller(&self, _project: &ProjectMeta, plan: &ClassPlan) -> String {
        plan.controller
            .routes
            .iter()
            .map(|r| format!("{} {} -> {}\n", r.verb.as_str(), r.path, r.handler))
            .collect()
    }
}

fn lines(names: Vec<String>) -> String {
    names.into_iter().map(|n| n + "\n").collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_compile_cleanly() {
        for ir in [order_ir(), parent_child_ir(), shipment_ir(), user_ir(), shop_ir()] {
            let ctx = compile(ir).unwrap();
            assert!(ctx.failed.is_empty());
            assert!(!ctx.has_errors(), "{:?}", ctx.diagnostics);
        }
    }

    #[test]
    fn test_write_to_temp() {
        let outcome = render(order_ir(), &PlainAdapter).unwrap();
        let (temp, stats) = write_to_temp(outcome).unwrap();

        assert_eq!(stats.written, 4);
        let entity = std::fs::read_to_string(temp.path().join("out/entity/Order.txt")).unwrap();
        assert!(entity.starts_with("id: text\n"));
        assert!(entity.contains("version: long\n"));
    }
}
