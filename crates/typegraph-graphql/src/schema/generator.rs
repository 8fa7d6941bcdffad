//! The schema generator: synthesizer and struct walker.
//!
//! [`SchemaGenerator`] is the entry point and recursion root of schema
//! generation. One call to [`generate`](SchemaGenerator::generate) runs a
//! full synchronous pass over a runtime instance: it derives the type's
//! name, description and object-or-interface nature, walks the declared
//! fields, and registers the constructed type. The field mapper re-enters
//! the synthesizer for nested structural fields; the registry
//! short-circuits repeated visits and breaks cycles.

use std::sync::Arc;

use async_graphql::dynamic::{
    Field, FieldFuture, FieldValue, InputValue, Interface, InterfaceField, Object, SchemaBuilder,
    Type, TypeRef,
};
use async_graphql::indexmap::IndexMap;
use async_graphql::{Name, Value};
use tracing::{debug, trace};
use typegraph_model::{
    DescriptionTag, FieldKind, FieldModel, TypeHint, TypeModel, identity,
};

use crate::Result;
use crate::error::GenerateError;
use crate::registry::{GeneratedType, TypeIndex, TypeKind, TypeRegistry};
use crate::resolver::{FieldBinding, ResolveParams, Resolved, Resolver, json_to_graphql_value};

use super::mapper::{ArgDescriptor, MappedKind};

/// Generates schema types from structural type models.
///
/// The generator owns the type registry for the duration of the pass. Domain
/// roots are fed in through [`generate`](SchemaGenerator::generate); when
/// every root has been generated, [`finish`](SchemaGenerator::finish) (or
/// [`install`](SchemaGenerator::install)) seals the registry and yields the
/// constructed runtime types.
///
/// # Example
///
/// ```ignore
/// let mut generator = SchemaGenerator::with_resolver(resolver);
/// generator.generate(Query::default())?;
///
/// let (builder, index) = generator.install(Schema::build("Query", None, None));
/// let schema = builder.finish()?;
/// ```
pub struct SchemaGenerator {
    pub(crate) registry: TypeRegistry,
    pub(crate) resolver: Option<Arc<dyn Resolver>>,
}

/// One derived field, consumed into the owning type.
pub(crate) struct FieldDescriptor {
    /// Schema-facing field name.
    pub name: String,
    /// Mapped schema type.
    pub type_ref: TypeRef,
    /// Description; empty means suppressed.
    pub description: String,
    /// Schema arguments projected from the field's argument record.
    pub args: Vec<ArgDescriptor>,
    /// Resolver binding, when the attachment policy approved the field.
    pub binding: Option<Arc<FieldBinding>>,
}

/// Result of walking one structural type's fields.
pub(crate) struct WalkOutput {
    /// Field map in declaration order; later same-named fields overwrite
    /// earlier ones.
    pub fields: IndexMap<String, FieldDescriptor>,
    /// Interfaces this type implements, collected from promoted fields.
    pub interfaces: Vec<GeneratedType>,
}

impl SchemaGenerator {
    /// Creates a generator without a resolver; every field falls back to
    /// default property resolution.
    #[must_use]
    pub fn new() -> Self {
        Self { registry: TypeRegistry::new(), resolver: None }
    }

    /// Creates a generator with an injected resolver.
    #[must_use]
    pub fn with_resolver(resolver: Arc<dyn Resolver>) -> Self {
        Self { registry: TypeRegistry::new(), resolver: Some(resolver) }
    }

    /// Generates the schema type for a runtime instance.
    ///
    /// Re-entrant through nested fields; generating an already-generated
    /// type returns its registered output without walking it again.
    ///
    /// # Errors
    ///
    /// Fails on fatal model configuration errors; generation aborts with no
    /// partial-schema recovery.
    pub fn generate<T>(&mut self, model: T) -> Result<GeneratedType>
    where
        T: TypeModel,
    {
        self.generate_shared(Arc::new(model))
    }

    /// [`generate`](Self::generate) for an already-shared model instance.
    pub fn generate_shared(&mut self, model: Arc<dyn TypeModel>) -> Result<GeneratedType> {
        self.synthesize(&model)
    }

    /// The execution-time lookup handle backing interface dispatch.
    #[must_use]
    pub fn index(&self) -> Arc<TypeIndex> {
        self.registry.index()
    }

    /// Number of runtime types generated so far.
    #[must_use]
    pub fn registered_count(&self) -> usize {
        self.registry.registered_count()
    }

    /// Seals the registry and returns every constructed runtime type
    /// together with the execution-time lookup handle.
    pub fn finish(mut self) -> (Vec<Type>, Arc<TypeIndex>) {
        self.registry.seal();
        let index = self.registry.index();
        let types = self.registry.take_types();
        debug!(count = types.len(), "schema generation sealed");
        (types, index)
    }

    /// Registers every generated type into a schema builder.
    pub fn install(self, builder: SchemaBuilder) -> (SchemaBuilder, Arc<TypeIndex>) {
        let (types, index) = self.finish();
        let mut builder = builder;
        for ty in types {
            builder = builder.register(ty);
        }
        (builder, index)
    }

    /// One full generation pass for one structural type.
    pub(crate) fn synthesize(&mut self, model: &Arc<dyn TypeModel>) -> Result<GeneratedType> {
        let id = identity(model.as_ref());
        if let Some(existing) = self.registry.get(id) {
            trace!(type_name = %existing.name, "type already generated, reusing");
            return Ok(existing.clone());
        }

        let name = model.type_name();
        if name.is_empty() {
            return Err(GenerateError::UnnamedType);
        }
        let name = name.to_string();
        let description = model.description().unwrap_or_else(|| name.clone());
        let provisional = if model.is_interface() { TypeKind::Interface } else { TypeKind::Object };

        debug!(type_name = %name, kind = provisional.as_str(), "generating schema type");
        // Registered before the walk so self-referential fields observe it.
        self.registry.begin(id, GeneratedType { name: name.clone(), kind: provisional });

        let output = self.walk_fields(model)?;

        // Declared interface implementations win over the interface flag:
        // a type that implements interfaces is an object.
        let kind = if output.interfaces.is_empty() { provisional } else { TypeKind::Object };

        let signatures: Vec<(String, TypeRef)> = output
            .fields
            .values()
            .map(|descriptor| (descriptor.name.clone(), descriptor.type_ref.clone()))
            .collect();

        let built = match kind {
            TypeKind::Interface => {
                let mut interface = Interface::new(name.as_str()).description(description);
                for descriptor in output.fields.into_values() {
                    let mut field = InterfaceField::new(descriptor.name, descriptor.type_ref);
                    if !descriptor.description.is_empty() {
                        field = field.description(descriptor.description);
                    }
                    interface = interface.field(field);
                }
                Type::Interface(interface)
            }
            _ => {
                let mut object = Object::new(name.as_str()).description(description);
                for implemented in &output.interfaces {
                    object = object.implement(implemented.name.as_str());
                }
                for descriptor in output.fields.into_values() {
                    object = object.field(self.build_field(descriptor));
                }
                Type::Object(object)
            }
        };

        let entry = GeneratedType { name, kind };
        self.registry.complete(id, entry.clone(), signatures, built);
        trace!(type_name = %entry.name, kind = entry.kind.as_str(), "schema type complete");
        Ok(entry)
    }

    /// Walks a structural type's declared fields into a field map and the
    /// list of interfaces the type implements.
    pub(crate) fn walk_fields(&mut self, model: &Arc<dyn TypeModel>) -> Result<WalkOutput> {
        let mut fields: IndexMap<String, FieldDescriptor> = IndexMap::new();
        let mut interfaces: Vec<GeneratedType> = Vec::new();

        for field in model.fields() {
            if field.directive.is_excluded() {
                trace!(type_name = model.type_name(), field = %field.name, "field excluded");
                continue;
            }

            // A directive-free embedded substructure is flattened: its
            // resolvable fields and interfaces merge into this type's,
            // later same-named fields winning.
            if field.embedded && field.directive.mapping.is_none() {
                let Some(substructure) = nested_model(&field.kind) else {
                    debug!(
                        type_name = model.type_name(),
                        field = %field.name,
                        "embedded field is not a substructure, skipping"
                    );
                    continue;
                };
                let nested = self.walk_fields(&substructure)?;
                for (name, descriptor) in nested.fields {
                    fields.insert(name, descriptor);
                }
                interfaces.extend(nested.interfaces);
                continue;
            }

            let hint = field.directive.hint();
            let Some(mapped) = self.map_field(&field.kind, hint, &field.name)? else {
                debug!(
                    type_name = model.type_name(),
                    field = %field.name,
                    "field kind has no schema mapping, dropping field"
                );
                continue;
            };

            let record = model.args_for(&field.name);
            let args = match &record {
                Some(record) => self.build_args(record)?,
                None => Vec::new(),
            };

            let binding = match &self.resolver {
                Some(resolver) if resolver.attaches_to(model.as_ref(), &field) => {
                    Some(Arc::new(FieldBinding {
                        name: field.name.clone(),
                        kind: field.kind.clone(),
                        source: Arc::clone(model),
                        args: record,
                        resolve_tag: field.directive.resolve.clone(),
                    }))
                }
                _ => None,
            };

            let external = lower_first(&field.name);
            let description = field_description(&field);

            if hint == TypeHint::Interface {
                match mapped.kind {
                    MappedKind::Interface(entry) => interfaces.push(entry),
                    _ => {
                        return Err(GenerateError::NotAnInterface {
                            type_name: model.type_name().to_string(),
                            field: field.name.clone(),
                            actual: mapped.type_ref.to_string(),
                        });
                    }
                }
                continue;
            }

            fields.insert(
                external.clone(),
                FieldDescriptor {
                    name: external,
                    type_ref: mapped.type_ref,
                    description,
                    args,
                    binding,
                },
            );
        }

        Ok(WalkOutput { fields, interfaces })
    }

    /// Builds the runtime field for a descriptor, wiring either the resolver
    /// binding or default property resolution.
    fn build_field(&self, descriptor: FieldDescriptor) -> Field {
        let FieldDescriptor { name, type_ref, description, args, binding } = descriptor;

        let index = self.registry.index();
        let resolver = self.resolver.clone();
        let schema_name = name.clone();

        let mut field = Field::new(name, type_ref, move |ctx| {
            if let (Some(binding), Some(resolver)) = (binding.clone(), resolver.clone()) {
                let index = Arc::clone(&index);
                FieldFuture::new(async move {
                    let params = ResolveParams::from_context(&ctx);
                    let resolved = resolver.resolve(binding.as_ref(), params).await?;
                    resolved_to_field_value(resolved, &index)
                })
            } else {
                let index = Arc::clone(&index);
                let schema_name = schema_name.clone();
                FieldFuture::new(async move {
                    default_resolve(ctx.parent_value, &schema_name, &index)
                })
            }
        });

        if !description.is_empty() {
            field = field.description(description);
        }
        for arg in args {
            let mut input = InputValue::new(arg.name, arg.type_ref);
            if !arg.description.is_empty() {
                input = input.description(arg.description);
            }
            if let Some(default) = arg.default {
                input = input.default_value(json_to_graphql_value(default));
            }
            field = field.argument(input);
        }
        field
    }
}

impl Default for SchemaGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Converts a resolver's output to a runtime field value, dispatching model
/// instances through the type index.
fn resolved_to_field_value(
    resolved: Resolved,
    index: &TypeIndex,
) -> async_graphql::Result<Option<FieldValue<'static>>> {
    match resolved {
        Resolved::Null => Ok(None),
        Resolved::Value(value) => Ok(Some(FieldValue::from(value))),
        Resolved::Node(node) => {
            let entry = index.resolve_object(node.as_ref())?;
            Ok(Some(FieldValue::owned_any(node).with_type(entry.name)))
        }
        Resolved::Nodes(nodes) => {
            let mut values = Vec::with_capacity(nodes.len());
            for node in nodes {
                let entry = index.resolve_object(node.as_ref())?;
                values.push(FieldValue::owned_any(node).with_type(entry.name));
            }
            Ok(Some(FieldValue::list(values)))
        }
    }
}

/// Default property resolution for fields without a binding.
///
/// A JSON-shaped parent is read by schema field name; a model-instance
/// parent by its declared fields' current values, nested model instances
/// dispatching through the type index.
fn default_resolve(
    parent: &FieldValue<'_>,
    schema_name: &str,
    index: &TypeIndex,
) -> async_graphql::Result<Option<FieldValue<'static>>> {
    if let Some(value) = parent.as_value() {
        if let Value::Object(object) = value
            && let Some(found) = object.get(&Name::new(schema_name))
        {
            return Ok(Some(FieldValue::from(found.clone())));
        }
        return Ok(None);
    }

    if let Some(node) = parent.downcast_ref::<Arc<dyn TypeModel>>() {
        for field in node.fields() {
            if lower_first(&field.name) != schema_name {
                continue;
            }
            if let Some(value) = field.value {
                return Ok(Some(FieldValue::from(json_to_graphql_value(value))));
            }
            if let Some(nested) = nested_model(&field.kind) {
                let entry = index.resolve_object(nested.as_ref())?;
                return Ok(Some(FieldValue::owned_any(nested).with_type(entry.name)));
            }
            return Ok(None);
        }
    }

    Ok(None)
}

/// The nested model instance behind a struct-typed field, one nullable
/// wrapper deep.
pub(crate) fn nested_model(kind: &FieldKind) -> Option<Arc<dyn TypeModel>> {
    match kind {
        FieldKind::Struct(model) => Some(Arc::clone(model)),
        FieldKind::Optional(inner) => match inner.as_ref() {
            FieldKind::Struct(model) => Some(Arc::clone(model)),
            _ => None,
        },
        _ => None,
    }
}

/// Lowercases the first character of a declared name.
pub(crate) fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_lowercase().collect::<String>() + chars.as_str(),
    }
}

/// A field's description: directive text, suppressed, or the field name.
pub(crate) fn field_description(field: &FieldModel) -> String {
    match &field.directive.description {
        Some(DescriptionTag::Text(text)) => text.clone(),
        Some(DescriptionTag::Suppressed) => String::new(),
        None => field.name.clone(),
    }
}
