//! The structural type model contract.
//!
//! [`TypeModel`] is the capability surface a domain type implements to make
//! itself visible to the schema generator. The required methods describe the
//! type's name and declared fields; the provided methods are the optional
//! capabilities (description, interface-ness, enum values, per-field
//! argument records) that a type opts into explicitly instead of being
//! probed for by method-name convention.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::directive::Directive;

/// A runtime-introspectable structural type.
///
/// Implementations describe one struct-like domain type. The generator walks
/// [`fields`](TypeModel::fields) in declaration order, so the returned order
/// is significant. An instance, not just a type, backs every model: field
/// values and argument-record defaults are read from the instance the
/// schema is generated from, and resolver bindings capture it.
pub trait TypeModel: Any + Send + Sync {
    /// The type's declared name.
    ///
    /// An empty name marks an anonymous type, which the generator rejects.
    fn type_name(&self) -> &str;

    /// The declared fields, in declaration order.
    fn fields(&self) -> Vec<FieldModel>;

    /// Optional type description. Defaults to the type name downstream.
    fn description(&self) -> Option<String> {
        None
    }

    /// Whether this type asks to be generated as an interface.
    ///
    /// Declared interface implementations on the type's own fields override
    /// this and force an object.
    fn is_interface(&self) -> bool {
        false
    }

    /// Label-to-value mapping for types used with the `enum` hint.
    fn enum_values(&self) -> Option<IndexMap<String, Value>> {
        None
    }

    /// Argument record for one of this type's fields, keyed by the field's
    /// declared name. The record is itself a structural model; its current
    /// field values become the schema argument defaults.
    fn args_for(&self, field: &str) -> Option<Arc<dyn TypeModel>> {
        let _ = field;
        None
    }
}

/// Structural identity of the concrete type behind a model reference.
///
/// Always pass the dereferenced trait object: calling `type_id` on an
/// `Arc<dyn TypeModel>` directly would identify the `Arc` itself.
pub fn identity(model: &dyn TypeModel) -> TypeId {
    model.type_id()
}

/// The declared kind of one field.
///
/// `Struct` carries an instance of the nested model: the embedded value for
/// flattened substructures, and otherwise any representative instance (a
/// default-constructed one is fine) for the generator to recurse into.
#[derive(Clone)]
pub enum FieldKind {
    /// Text.
    String,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 32-bit unsigned integer.
    UInt32,
    /// 64-bit unsigned integer.
    UInt64,
    /// 32-bit float.
    Float32,
    /// 64-bit float.
    Float64,
    /// Boolean.
    Bool,
    /// Nullable wrapper around the inner kind.
    Optional(Box<FieldKind>),
    /// Sequence of the inner kind.
    List(Box<FieldKind>),
    /// A nested structural type, with an instance to recurse into.
    Struct(Arc<dyn TypeModel>),
    /// A host kind with no schema mapping; the field is dropped. Carries the
    /// host kind's name for diagnostics.
    Unsupported(&'static str),
}

impl FieldKind {
    /// Wraps a kind as nullable.
    pub fn optional(inner: FieldKind) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Wraps a kind as a sequence.
    pub fn list(inner: FieldKind) -> Self {
        Self::List(Box::new(inner))
    }

    /// A nested structural type.
    pub fn nested(model: impl TypeModel) -> Self {
        Self::Struct(Arc::new(model))
    }
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "String"),
            Self::Int32 => write!(f, "Int32"),
            Self::Int64 => write!(f, "Int64"),
            Self::UInt32 => write!(f, "UInt32"),
            Self::UInt64 => write!(f, "UInt64"),
            Self::Float32 => write!(f, "Float32"),
            Self::Float64 => write!(f, "Float64"),
            Self::Bool => write!(f, "Bool"),
            Self::Optional(inner) => write!(f, "Optional({inner:?})"),
            Self::List(inner) => write!(f, "List({inner:?})"),
            Self::Struct(model) => write!(f, "Struct({})", model.type_name()),
            Self::Unsupported(kind) => write!(f, "Unsupported({kind})"),
        }
    }
}

/// One declared field of a structural type.
#[derive(Debug, Clone)]
pub struct FieldModel {
    /// Declared field name, e.g. `Name`. The schema-facing name is derived
    /// from it by lowercasing the first character.
    pub name: String,
    /// Declared kind.
    pub kind: FieldKind,
    /// Decoded directive set.
    pub directive: Directive,
    /// Whether the field is an embedded/anonymous substructure.
    pub embedded: bool,
    /// Current value on the source instance, where representable. Used for
    /// argument defaults and default property resolution.
    pub value: Option<Value>,
}

impl FieldModel {
    /// A plain field with no directives.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            directive: Directive::default(),
            embedded: false,
            value: None,
        }
    }

    /// Sets the mapping directive from its raw string form.
    #[must_use]
    pub fn with_mapping(mut self, tag: &str) -> Self {
        let parsed = Directive::parse(tag, "", "");
        self.directive.mapping = parsed.mapping;
        self
    }

    /// Sets the description directive from its raw string form.
    #[must_use]
    pub fn with_description(mut self, tag: &str) -> Self {
        let parsed = Directive::parse("", tag, "");
        self.directive.description = parsed.description;
        self
    }

    /// Sets the resolver tag.
    #[must_use]
    pub fn with_resolve(mut self, tag: &str) -> Self {
        let parsed = Directive::parse("", "", tag);
        self.directive.resolve = parsed.resolve;
        self
    }

    /// Marks the field as an embedded substructure.
    #[must_use]
    pub fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }

    /// Records the field's current value on the source instance.
    #[must_use]
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }
}
