//! Cycle safety and memoization: self-referential and mutually recursive
//! type graphs, and idempotent repeated generation.

use async_graphql::dynamic::Schema;
use typegraph_graphql::SchemaGenerator;
use typegraph_model::{FieldKind, FieldModel, TypeModel};

#[derive(Default)]
struct Employee;

impl TypeModel for Employee {
    fn type_name(&self) -> &str {
        "Employee"
    }

    fn fields(&self) -> Vec<FieldModel> {
        vec![
            FieldModel::new("Name", FieldKind::String),
            FieldModel::new("Manager", FieldKind::optional(FieldKind::nested(Employee))),
        ]
    }
}

#[test]
fn self_referential_types_generate_without_regress() {
    let mut generator = SchemaGenerator::new();
    let root = generator.generate(Employee).expect("generation should succeed");

    let (builder, _index) = generator.install(Schema::build("Employee", None, None));
    let sdl = builder.finish().expect("schema should build").sdl();

    assert!(sdl.contains("type Employee"), "missing Employee type:\n{sdl}");
    // The nested field references the root's own generated type.
    assert!(sdl.contains(&format!("manager: {}\n", root.name)), "missing self reference:\n{sdl}");
}

#[test]
fn repeated_generation_reuses_the_registered_output() {
    let mut generator = SchemaGenerator::new();

    let first = generator.generate(Employee).expect("generation should succeed");
    let count = generator.registered_count();

    let second = generator.generate(Employee).expect("generation should succeed");
    assert_eq!(first, second, "second pass should return the registered output");
    assert_eq!(generator.registered_count(), count, "second pass should not re-walk fields");
}

#[derive(Default)]
struct Author;

#[derive(Default)]
struct Book;

impl TypeModel for Author {
    fn type_name(&self) -> &str {
        "Author"
    }

    fn fields(&self) -> Vec<FieldModel> {
        vec![
            FieldModel::new("Name", FieldKind::String),
            FieldModel::new("Books", FieldKind::list(FieldKind::nested(Book))),
        ]
    }
}

impl TypeModel for Book {
    fn type_name(&self) -> &str {
        "Book"
    }

    fn fields(&self) -> Vec<FieldModel> {
        vec![
            FieldModel::new("Title", FieldKind::String),
            FieldModel::new("Author", FieldKind::optional(FieldKind::nested(Author))),
        ]
    }
}

#[test]
fn mutually_recursive_types_generate_once_each() {
    let mut generator = SchemaGenerator::new();
    generator.generate(Author).expect("generation should succeed");

    // Both types exist, each exactly once.
    assert_eq!(generator.registered_count(), 2);

    let (builder, _index) = generator.install(Schema::build("Author", None, None));
    let sdl = builder.finish().expect("schema should build").sdl();

    assert!(sdl.contains("type Author"), "missing Author:\n{sdl}");
    assert!(sdl.contains("type Book"), "missing Book:\n{sdl}");
    // List of a struct kind: the list wrapper is non-null, the element is a
    // bare object reference.
    assert!(sdl.contains("books: [Book]!"), "list-of-object law violated:\n{sdl}");
    assert!(sdl.contains("author: Author\n"), "back reference should be nullable:\n{sdl}");
}
