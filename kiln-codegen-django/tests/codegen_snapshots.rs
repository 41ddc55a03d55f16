//! End-to-end tests for Django code generation.
//!
//! Each test parses a kiln.toml, runs the pipeline and checks the rendered
//! Python modules.

use std::str::FromStr;

use kiln_codegen::{generation::generate, pipeline::Pipeline};
use kiln_codegen_django::DjangoAdapter;
use kiln_core::Overwrite;
use kiln_manifest::Manifest;

/// Generate files from a manifest, sorted by path.
fn generate_files(manifest_toml: &str) -> Vec<(String, String)> {
    let manifest = Manifest::from_str(manifest_toml).expect("Failed to parse manifest");
    let ctx = Pipeline::new().run(manifest).expect("Pipeline failed");
    let outcome = generate(&ctx, &DjangoAdapter).expect("Generation failed");

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

const LIBRARY: &str = r#"
    [project]
    name = "library"
    stack = "django"

    [metadata]
    audit_fields = true
    soft_delete = true

    [classes.Author]
    [[classes.Author.attributes]]
    name = "fullName"
    type = "String"
    nullable = false

    [[classes.Author.relationships]]
    target = "BookLoan"
    cardinality = "one-to-many"
    field = "loans"
    inverse_field = "author"

    [classes.BookLoan]
    stateful = true

    [[classes.BookLoan.attributes]]
    name = "dueOn"
    type = "Date"

    [[classes.BookLoan.attributes]]
    name = "copies"
    type = "Integer"
"#;

#[test]
fn test_file_layout() {
    let files = generate_files(LIBRARY);
    let paths: Vec<&str> = files.iter().map(|(p, _)| p.as_str()).collect();

    insta::assert_snapshot!(paths.join("\n"), @r"
    library/models/author.py
    library/models/book_loan.py
    library/repositories/author_repository.py
    library/repositories/book_loan_repository.py
    library/services/author_service.py
    library/services/book_loan_service.py
    library/views/author_views.py
    library/views/book_loan_views.py
    ");
}

#[test]
fn test_model_relations() {
    let files = generate_files(LIBRARY);

    let author = get_file(&files, "library/models/author.py").expect("author.py not found");
    assert!(author.starts_with("# Generated by kiln."));
    assert!(author.contains("class Author(models.Model):"));
    assert!(author.contains("full_name = models.CharField(max_length=255, db_column=\"full_name\")"));
    assert!(!author.contains("loans ="));

    let loan = get_file(&files, "library/models/book_loan.py").expect("book_loan.py not found");
    assert!(loan.contains("author = models.ForeignKey(\"Author\", on_delete=models.SET_NULL, related_name=\"loans\", null=True, blank=True, db_column=\"author_id\")"));
    assert!(loan.contains("from .book_loan_status import BookLoanStatus, can_transition"));
    assert!(loan.contains("deleted_at = models.DateTimeField(null=True, blank=True, db_column=\"deleted_at\")"));
    assert!(loan.contains("    class Meta:\n        db_table = \"book_loan\""));
}

#[test]
fn test_repository_hides_deleted_rows() {
    let files = generate_files(LIBRARY);
    let repository = get_file(&files, "library/repositories/book_loan_repository.py")
        .expect("book_loan_repository.py not found");

    assert!(repository.contains("return list(self._live().filter(author_id=author_id))"));
    assert!(repository.contains("def find_deleted(self) -> list[BookLoan]:"));
    assert!(repository.contains("BookLoan.objects.filter(id=id).update(deleted_at=timezone.now())"));
}

#[test]
fn test_views_and_urls() {
    let files = generate_files(LIBRARY);
    let views = get_file(&files, "library/views/book_loan_views.py")
        .expect("book_loan_views.py not found");

    assert!(views.contains("class BookLoanSerializer(serializers.ModelSerializer):"));
    assert!(views.contains("path(\"book-loans/<uuid:id>/status\", BookLoanUpdateStatusView.as_view()),"));
    assert!(views.contains("path(\"book-loans/status/<str:status>\", BookLoanFindByStatusView.as_view()),"));
    assert!(views.contains("result = self.service.find_by_status(status)"));
}

#[test]
fn test_write_to_disk() {
    let manifest = Manifest::from_str(LIBRARY).unwrap();
    let ctx = Pipeline::new().run(manifest).unwrap();
    let outcome = generate(&ctx, &DjangoAdapter).unwrap();
    let temp = tempfile::tempdir().unwrap();

    let stats = outcome
        .into_registry(Overwrite::IfMissing)
        .write_all(temp.path())
        .unwrap();
    assert_eq!(stats.written, 8);

    let content =
        std::fs::read_to_string(temp.path().join("library/services/book_loan_service.py"))
            .unwrap();
    assert!(content.contains("class BookLoanService:"));
}
