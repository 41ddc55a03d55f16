//! Core operations.
//!
//! This module contains the business logic for kiln commands,
//! separated from CLI argument parsing and output rendering.

pub mod check;
pub mod explain;
pub mod generate;

pub use check::check;
pub use explain::explain;
pub use generate::{GenerateOptions, generate};

use kiln_codegen::pipeline::Diagnostic;

/// One-line message of a diagnostic, with its manifest location.
fn describe(diag: &Diagnostic) -> String {
    match &diag.location {
        Some(loc) => format!("{}\n  --> {}", diag.message, loc),
        None => diag.message.clone(),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::str::FromStr;

    use kiln_manifest::Manifest;

    pub const SHOP: &str = r#"
        [project]
        name = "shop"
        stack = "spring"
        package = "com.example.shop"

        [metadata]
        audit_fields = true

        [classes.Customer]
        [[classes.Customer.attributes]]
        name = "email"
        type = "String"
        unique = true

        [[classes.Customer.relationships]]
        target = "Order"
        cardinality = "one-to-many"
        field = "orders"
        inverse_field = "customer"

        [classes.Order]
        stateful = true

        [[classes.Order.attributes]]
        name = "total"
        type = "Double"

        [classes.Invoice]
        [[classes.Invoice.attributes]]
        name = "amount"
        type = "Double"

        [[classes.Invoice.relationships]]
        target = "Ledger"
        cardinality = "many-to-one"
    "#;

    pub fn shop() -> Manifest {
        Manifest::from_str(SHOP).expect("Failed to parse test manifest")
    }
}
