//! # typegraph-model
//!
//! Structural type models for the typegraph schema generator.
//!
//! This crate defines the contract between an application's domain types and
//! the schema generation engine in `typegraph-graphql`. A domain type opts in
//! by implementing [`TypeModel`], describing its declared fields, the
//! per-field directives that steer schema mapping, and the optional
//! capabilities the generator probes (description, interface-ness, enum
//! values, per-field argument records).
//!
//! Nothing in this crate depends on a particular schema runtime: field values
//! are plain [`serde_json::Value`]s and the model surface is synchronous.
//!
//! ## Modules
//!
//! - [`directive`] - Parsed per-field directives (mapping hint, exclusion,
//!   description override, resolver tag)
//! - [`model`] - The [`TypeModel`] trait, field kinds and field descriptors

pub mod directive;
pub mod model;

pub use directive::{DescriptionTag, Directive, Mapping, TypeHint};
pub use model::{FieldKind, FieldModel, TypeModel, identity};

// Implementors spell `enum_values` in terms of this exact `IndexMap`.
pub use indexmap;
