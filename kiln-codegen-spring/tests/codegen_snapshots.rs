//! End-to-end tests for Spring code generation.
//!
//! Each test parses a kiln.toml, runs the pipeline and checks the rendered
//! Java sources.

use std::str::FromStr;

use kiln_codegen::{generation::generate, pipeline::Pipeline};
use kiln_codegen_spring::SpringAdapter;
use kiln_core::Overwrite;
use kiln_manifest::Manifest;

/// Generate files from a manifest, sorted by path.
fn generate_files(manifest_toml: &str) -> Vec<(String, String)> {
    let manifest = Manifest::from_str(manifest_toml).expect("Failed to parse manifest");
    let ctx = Pipeline::new().run(manifest).expect("Pipeline failed");
    let outcome = generate(&ctx, &SpringAdapter).expect("Generation failed");

    let mut result: Vec<(String, String)> = outcome
        .artifacts
        .into_iter()
        .map(|a| (a.relative_path, a.content))
        .collect();
    result.sort_by(|a, b| a.0.cmp(&b.0));
    result
}

fn get_file<'a>(files: &'a [(String, String)], path: &str) -> Option<&'a str> {
    files
        .iter()
        .find(|(p, _)| p == path)
        .map(|(_, c)| c.as_str())
}

const SHOP: &str = r#"
    [project]
    name = "shop"
    stack = "spring"
    package = "com.example.shop"

    [metadata]
    audit_fields = true
    soft_delete = true

    [classes.Customer]
    [[classes.Customer.attributes]]
    name = "email"
    type = "String"
    nullable = false
    unique = true

    [[classes.Customer.relationships]]
    target = "Order"
    cardinality = "one-to-many"

    [classes.Order]
    stateful = true

    [[classes.Order.attributes]]
    name = "reference"
    type = "String"
    unique = true

    [[classes.Order.attributes]]
    name = "total"
    type = "Double"
"#;

#[test]
fn test_file_layout() {
    let files = generate_files(SHOP);
    let paths: Vec<&str> = files.iter().map(|(p, _)| p.as_str()).collect();

    insta::assert_snapshot!(paths.join("\n"), @r"
    src/main/java/com/example/shop/controller/CustomerController.java
    src/main/java/com/example/shop/controller/OrderController.java
    src/main/java/com/example/shop/entity/Customer.java
    src/main/java/com/example/shop/entity/Order.java
    src/main/java/com/example/shop/repository/CustomerRepository.java
    src/main/java/com/example/shop/repository/OrderRepository.java
    src/main/java/com/example/shop/service/CustomerService.java
    src/main/java/com/example/shop/service/OrderService.java
    ");
}

#[test]
fn test_entity_relations() {
    let files = generate_files(SHOP);

    let customer = get_file(&files, "src/main/java/com/example/shop/entity/Customer.java")
        .expect("Customer.java not found");
    assert!(customer.starts_with("// Generated by kiln."));
    assert!(customer.contains("@OneToMany(mappedBy = \"customer\", fetch = FetchType.LAZY)"));
    assert!(customer.contains("private List<Order> orders = new ArrayList<>();"));

    let order = get_file(&files, "src/main/java/com/example/shop/entity/Order.java")
        .expect("Order.java not found");
    assert!(order.contains("@JoinColumn(name = \"customer_id\", foreignKey = @ForeignKey(name = \"fk_order_customer\"))"));
    assert!(order.contains("private Customer customer;"));
    assert!(order.contains("private OrderStatus status;"));
    assert!(order.contains("private LocalDateTime deletedAt;"));
}

#[test]
fn test_repository_hides_deleted_rows() {
    let files = generate_files(SHOP);
    let repository = get_file(
        &files,
        "src/main/java/com/example/shop/repository/OrderRepository.java",
    )
    .expect("OrderRepository.java not found");

    assert!(repository.contains(
        "@Query(\"SELECT e FROM Order e WHERE e.customer.id = :customerId AND e.deletedAt IS NULL\")"
    ));
    assert!(repository.contains("Optional<Order> findByReference(@Param(\"reference\") String reference);"));
    assert!(repository.contains("List<Order> findDeleted();"));
}

#[test]
fn test_controller_routes() {
    let files = generate_files(SHOP);
    let controller = get_file(
        &files,
        "src/main/java/com/example/shop/controller/OrderController.java",
    )
    .expect("OrderController.java not found");

    assert!(controller.contains("@RequestMapping(\"/orders\")"));
    assert!(controller.contains("@PutMapping(\"/{id}/status\")"));
    assert!(controller.contains("@GetMapping(\"/status/{status}\")"));
    assert!(controller.contains("return service.updateStatus(id, newStatus, updatedBy, comment);"));
    assert!(controller.contains("@ExceptionHandler(InvalidTransitionException.class)"));

    let service = get_file(&files, "src/main/java/com/example/shop/service/OrderService.java")
        .expect("OrderService.java not found");
    assert!(service.contains("throw new InvalidTransitionException("));
}

#[test]
fn test_unknown_target_skips_class() {
    let files = generate_files(
        r#"
        [project]
        name = "shop"
        stack = "spring"

        [classes.Order]
        [[classes.Order.relationships]]
        target = "Ghost"
        cardinality = "many-to-one"

        [classes.Tag]
        [[classes.Tag.attributes]]
        name = "label"
        "#,
    );

    assert_eq!(files.len(), 4);
    assert!(
        files
            .iter()
            .all(|(path, _)| path.starts_with("src/main/java/com/example/shop/"))
    );
    assert!(get_file(&files, "src/main/java/com/example/shop/entity/Tag.java").is_some());
}

#[test]
fn test_write_to_disk() {
    let manifest = Manifest::from_str(SHOP).unwrap();
    let ctx = Pipeline::new().run(manifest).unwrap();
    let outcome = generate(&ctx, &SpringAdapter).unwrap();
    let temp = tempfile::tempdir().unwrap();

    let stats = outcome
        .into_registry(Overwrite::IfMissing)
        .write_all(temp.path())
        .unwrap();
    assert_eq!(stats.written, 8);

    let path = temp
        .path()
        .join("src/main/java/com/example/shop/service/OrderService.java");
    let content = std::fs::read_to_string(path).unwrap();
    assert!(content.contains("public class OrderService {"));
}
