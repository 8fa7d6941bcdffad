//! # typegraph-graphql
//!
//! Derives `async_graphql` dynamic schemas from structural type models.
//!
//! An application describes its domain types once, as
//! [`TypeModel`](typegraph_model::TypeModel) implementations with per-field
//! directives, and obtains a fully wired schema: object types, interfaces,
//! enums, input objects, list and non-null wrappers, and per-field argument
//! and resolver bindings. The generator walks each model recursively,
//! memoizes generated types so recursive and self-referential type graphs
//! terminate, and keeps an identity-to-type index that dispatches runtime
//! values back to their generated object types during interface resolution.
//!
//! ## Overview
//!
//! Generation is a one-shot, synchronous pass, expected to run once at
//! process start:
//!
//! ```ignore
//! use async_graphql::dynamic::Schema;
//! use typegraph_graphql::SchemaGenerator;
//!
//! let mut generator = SchemaGenerator::with_resolver(resolver);
//! generator.generate(Query::default())?;
//! generator.generate(Person::default())?;
//!
//! let (builder, index) = generator.install(Schema::build("Query", None, None));
//! let schema = builder.finish()?;
//! ```
//!
//! The generator decides *what* to build and wires it; constructing,
//! validating and executing the schema stays with the runtime.
//!
//! ## Modules
//!
//! - [`error`] - Generation-time and execution-time error types
//! - [`registry`] - Type registry and the sealed execution-time type index
//! - [`resolver`] - The injected resolver extension point
//! - [`schema`] - The generation engine

pub mod error;
pub mod registry;
pub mod resolver;
pub mod schema;

// Re-export main types
pub use error::{GenerateError, ResolveTypeError};
pub use registry::{GeneratedType, TypeIndex, TypeKind, TypeRegistry};
pub use resolver::{FieldBinding, Resolved, ResolveParams, Resolver, json_to_graphql_value};
pub use schema::SchemaGenerator;

/// Result type for schema generation.
pub type Result<T> = std::result::Result<T, GenerateError>;
