//! Error types for schema generation and execution-time type resolution.
//!
//! Generation-time errors abort the generation pass immediately; there is no
//! partial-schema recovery. Execution-time errors are converted to GraphQL
//! errors inside resolver bindings so they surface on the query response
//! instead of tearing down the process.

use thiserror::Error;

/// Fatal configuration errors raised while generating a schema.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerateError {
    /// A structural type (or an enum-hinted type) has no derivable name.
    #[error("structural type has no derivable name")]
    UnnamedType,

    /// A field directed as `interface` mapped to something else.
    #[error("invalid interface for type {type_name}: field {field} maps to {actual}, which is not an interface")]
    NotAnInterface {
        /// The owning type.
        type_name: String,
        /// The offending field's declared name.
        field: String,
        /// Rendering of the type the field actually mapped to.
        actual: String,
    },

    /// A field directed as `input` synthesized to a non-object type.
    #[error("input-directed field {field} synthesized {name}, which is not an object type")]
    InputNotObject {
        /// The offending field's declared name.
        field: String,
        /// Name of the non-object output the field synthesized.
        name: String,
    },
}

/// Errors raised when resolving a runtime value back to its generated type.
///
/// These occur during query execution, never during generation, and are
/// surfaced as query errors by the resolver bindings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveTypeError {
    /// The registry has not been sealed yet; generation is still running.
    #[error("schema generation has not completed; type resolution is unavailable")]
    SchemaInitializing,

    /// The value's dynamic type was never generated into this registry.
    #[error("no generated type for runtime value of type {type_name}")]
    UnknownType {
        /// Declared name of the unresolvable model type.
        type_name: String,
    },

    /// The value's generated type exists but is not an object type.
    #[error("generated type {name} is not an object type")]
    NotAnObject {
        /// Name of the generated non-object type.
        name: String,
    },
}

// `async_graphql::Error` provides a blanket `From<T: Display>` impl, which
// already converts `ResolveTypeError` via its `Display` rendering. A manual
// impl here conflicts with that blanket impl (E0119), so we rely on it.
