//! Registry for tracking generated schema types.
//!
//! The registry serves three purposes: it memoizes generation so each
//! structural type is walked at most once, it breaks cycles by handing out
//! the in-progress entry for a type whose fields are still being walked, and
//! it backs the polymorphic instance-to-type lookup that interface
//! resolution performs at query-execution time.
//!
//! The lifecycle is deliberately simple: the registry is mutated only by the
//! single-threaded generation pass, then sealed. Sealing freezes the
//! identity-to-type map into a [`TypeIndex`] that resolver bindings share
//! and read without locking for the rest of the process lifetime.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use async_graphql::dynamic::{Type, TypeRef};
use typegraph_model::{TypeModel, identity};

use crate::error::ResolveTypeError;

/// The schema-level kind of a generated type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// An output object type.
    Object,
    /// An interface type.
    Interface,
    /// An enum type.
    Enum,
    /// An input object type.
    Input,
}

impl TypeKind {
    /// Human-readable kind name for diagnostics.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Input => "input object",
        }
    }
}

/// Metadata for one generated schema type.
///
/// This is the registry's stable, cheaply clonable view of a generated
/// type; the constructed runtime type itself is held separately until it is
/// taken for schema installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedType {
    /// Schema-facing type name.
    pub name: String,
    /// Generated kind.
    pub kind: TypeKind,
}

/// Field signatures of a completed object type, kept for input projection.
pub(crate) type FieldSignatures = Arc<Vec<(String, TypeRef)>>;

/// Sealed identity-to-type lookup shared with resolver bindings.
///
/// Empty until the registry is sealed; afterwards immutable, so concurrent
/// execution-time readers need no synchronization.
#[derive(Debug, Default)]
pub struct TypeIndex {
    types: OnceLock<HashMap<TypeId, GeneratedType>>,
}

impl TypeIndex {
    /// Resolves a runtime value to the object type generated for its
    /// dynamic type.
    ///
    /// # Errors
    ///
    /// Fails if the registry has not been sealed, if the value's type was
    /// never generated, or if it generated to a non-object type. Callers
    /// surface these as query-execution errors.
    pub fn resolve_object(&self, value: &dyn TypeModel) -> Result<GeneratedType, ResolveTypeError> {
        let types = self.types.get().ok_or(ResolveTypeError::SchemaInitializing)?;
        let entry = types
            .get(&identity(value))
            .ok_or_else(|| ResolveTypeError::UnknownType { type_name: value.type_name().to_string() })?;
        if entry.kind != TypeKind::Object {
            return Err(ResolveTypeError::NotAnObject { name: entry.name.clone() });
        }
        Ok(entry.clone())
    }

    fn seal(&self, types: HashMap<TypeId, GeneratedType>) {
        // A second seal is a no-op; the first snapshot wins.
        let _ = self.types.set(types);
    }
}

/// Registry for tracking generated schema types.
pub struct TypeRegistry {
    /// Object/interface entries, including types whose walk is in progress.
    entries: HashMap<TypeId, GeneratedType>,
    /// Field signatures of completed types (absent while in progress).
    signatures: HashMap<TypeId, FieldSignatures>,
    /// Enum entries, memoized per source type.
    enums: HashMap<TypeId, GeneratedType>,
    /// Input object entries, memoized per source type.
    inputs: HashMap<TypeId, GeneratedType>,
    /// Constructed runtime types, in registration order.
    types: Vec<Type>,
    /// Shared execution-time lookup, populated by [`seal`](Self::seal).
    index: Arc<TypeIndex>,
}

impl TypeRegistry {
    /// Creates a new empty type registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            signatures: HashMap::new(),
            enums: HashMap::new(),
            inputs: HashMap::new(),
            types: Vec::new(),
            index: Arc::new(TypeIndex::default()),
        }
    }

    /// Looks up the entry for a structural type identity.
    #[must_use]
    pub fn get(&self, id: TypeId) -> Option<&GeneratedType> {
        self.entries.get(&id)
    }

    /// Registers the in-progress entry for a type before its fields are
    /// walked, so recursive and self-referential lookups observe it.
    pub(crate) fn begin(&mut self, id: TypeId, entry: GeneratedType) {
        self.entries.insert(id, entry);
    }

    /// Finalizes a type: fixes its kind, records its field signatures and
    /// stores the constructed runtime type.
    pub(crate) fn complete(
        &mut self,
        id: TypeId,
        entry: GeneratedType,
        signatures: Vec<(String, TypeRef)>,
        built: Type,
    ) {
        self.entries.insert(id, entry);
        self.signatures.insert(id, Arc::new(signatures));
        self.types.push(built);
    }

    /// Field signatures of a completed type, if its walk has finished.
    pub(crate) fn signatures(&self, id: TypeId) -> Option<FieldSignatures> {
        self.signatures.get(&id).cloned()
    }

    /// Looks up a memoized enum entry.
    pub(crate) fn enum_entry(&self, id: TypeId) -> Option<&GeneratedType> {
        self.enums.get(&id)
    }

    /// Registers a generated enum.
    pub(crate) fn add_enum(&mut self, id: TypeId, entry: GeneratedType, built: Type) {
        self.enums.insert(id, entry);
        self.types.push(built);
    }

    /// Looks up a memoized input object entry.
    pub(crate) fn input_entry(&self, id: TypeId) -> Option<&GeneratedType> {
        self.inputs.get(&id)
    }

    /// Registers a generated input object.
    pub(crate) fn add_input(&mut self, id: TypeId, entry: GeneratedType, built: Type) {
        self.inputs.insert(id, entry);
        self.types.push(built);
    }

    /// Number of runtime types registered so far.
    #[must_use]
    pub fn registered_count(&self) -> usize {
        self.types.len()
    }

    /// The shared execution-time lookup handle.
    ///
    /// Handed to resolver bindings during generation; resolves nothing until
    /// the registry is sealed.
    #[must_use]
    pub fn index(&self) -> Arc<TypeIndex> {
        Arc::clone(&self.index)
    }

    /// Freezes the identity-to-type map into the shared [`TypeIndex`].
    pub(crate) fn seal(&self) {
        let mut types = HashMap::with_capacity(
            self.entries.len() + self.enums.len() + self.inputs.len(),
        );
        for (id, entry) in &self.entries {
            types.insert(*id, entry.clone());
        }
        for (id, entry) in &self.enums {
            types.insert(*id, entry.clone());
        }
        for (id, entry) in &self.inputs {
            types.insert(*id, entry.clone());
        }
        self.index.seal(types);
    }

    /// Takes all constructed runtime types for schema installation.
    pub(crate) fn take_types(&mut self) -> Vec<Type> {
        std::mem::take(&mut self.types)
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
