//! Per-field type mapping and argument building.
//!
//! `map_field` is the decision tree that turns a declared field kind plus
//! its type hint into a schema type reference: hints first (`id`, `input`,
//! `enum`), then structural dispatch (nested struct, primitive scalars,
//! lists), with nullability decided once from the field's own top-level
//! nullable wrapper. A kind with no mapping declines, and the caller drops
//! the field.
//!
//! `build_args` projects an argument record's fields into schema arguments
//! through the same decision tree, with defaults taken from the record's
//! current values.

use async_graphql::dynamic::{Enum, EnumItem, InputObject, InputValue, Type, TypeRef};
use tracing::debug;
use typegraph_model::{FieldKind, TypeHint, TypeModel, identity};

use std::sync::Arc;

use crate::Result;
use crate::error::GenerateError;
use crate::registry::{GeneratedType, TypeKind};

use super::generator::{SchemaGenerator, field_description, lower_first};

/// A field's mapped schema type.
#[derive(Debug)]
pub(crate) struct MappedField {
    /// The type reference, nullability already applied.
    pub type_ref: TypeRef,
    /// What the reference points at, for promotion checks.
    pub kind: MappedKind,
}

/// The schema-level kind a field mapped to.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum MappedKind {
    /// A scalar (string/int/float/boolean/identifier).
    Scalar,
    /// A generated enum.
    Enum,
    /// A generated input object.
    Input,
    /// A list wrapper around some element mapping.
    List,
    /// A generated object type.
    Object(GeneratedType),
    /// A generated interface type.
    Interface(GeneratedType),
}

/// One projected schema argument.
pub(crate) struct ArgDescriptor {
    /// Schema-facing argument name.
    pub name: String,
    /// Mapped argument type.
    pub type_ref: TypeRef,
    /// Description; empty means suppressed.
    pub description: String,
    /// Default value: the record field's value at generation time.
    pub default: Option<serde_json::Value>,
}

/// A named reference, non-null unless the field was nullable.
fn named_ref(name: &str, nullable: bool) -> TypeRef {
    if nullable { TypeRef::named(name) } else { TypeRef::named_nn(name) }
}

impl SchemaGenerator {
    /// Maps a declared field kind and type hint to a schema type.
    ///
    /// Returns `Ok(None)` when the kind has no schema mapping; the caller
    /// skips the field. Nullability is decided here, once, from the field's
    /// own top-level nullable wrapper.
    pub(crate) fn map_field(
        &mut self,
        kind: &FieldKind,
        hint: TypeHint,
        field_name: &str,
    ) -> Result<Option<MappedField>> {
        let (kind, nullable) = match kind {
            FieldKind::Optional(inner) => (inner.as_ref(), true),
            other => (other, false),
        };

        match hint {
            TypeHint::Id => Ok(Some(MappedField {
                type_ref: named_ref(TypeRef::ID, nullable),
                kind: MappedKind::Scalar,
            })),
            TypeHint::Input => self.map_input(kind, nullable, field_name),
            TypeHint::Enum => self.map_enum(kind, nullable, field_name),
            TypeHint::Interface | TypeHint::Infer => {
                self.map_structural(kind, hint, nullable, field_name)
            }
        }
    }

    /// Structural dispatch: nested struct, primitive scalar or list.
    fn map_structural(
        &mut self,
        kind: &FieldKind,
        hint: TypeHint,
        nullable: bool,
        field_name: &str,
    ) -> Result<Option<MappedField>> {
        let scalar = match kind {
            FieldKind::Struct(model) => {
                let entry = match self.registry.get(identity(model.as_ref())) {
                    Some(entry) => entry.clone(),
                    // Absent: recurse. The registry is populated as a side
                    // effect of the nested synthesis.
                    None => self.synthesize(model)?,
                };
                // Struct-typed fields keep the bare named reference; the
                // non-null decision is not reapplied on this path.
                let type_ref = TypeRef::named(entry.name.as_str());
                let kind = match entry.kind {
                    TypeKind::Interface => MappedKind::Interface(entry),
                    _ => MappedKind::Object(entry),
                };
                return Ok(Some(MappedField { type_ref, kind }));
            }
            FieldKind::List(element) => {
                // Element mapped with the field's own hint and name, and
                // its own nullability; the list wrapper then takes this
                // field's nullability.
                let Some(inner) = self.map_field(element, hint, field_name)? else {
                    return Ok(None);
                };
                let list = TypeRef::List(Box::new(inner.type_ref));
                let type_ref =
                    if nullable { list } else { TypeRef::NonNull(Box::new(list)) };
                return Ok(Some(MappedField { type_ref, kind: MappedKind::List }));
            }
            FieldKind::String => TypeRef::STRING,
            FieldKind::Int32 | FieldKind::Int64 | FieldKind::UInt32 | FieldKind::UInt64 => {
                TypeRef::INT
            }
            FieldKind::Float32 | FieldKind::Float64 => TypeRef::FLOAT,
            FieldKind::Bool => TypeRef::BOOLEAN,
            FieldKind::Optional(_) => {
                debug!(field = field_name, "doubly nullable kind has no mapping, skipping");
                return Ok(None);
            }
            FieldKind::Unsupported(host_kind) => {
                debug!(field = field_name, host_kind, "kind has no schema mapping, skipping");
                return Ok(None);
            }
        };

        Ok(Some(MappedField { type_ref: named_ref(scalar, nullable), kind: MappedKind::Scalar }))
    }

    /// The `enum` hint: the unwrapped type's value mapping becomes an enum
    /// named after the type, memoized per type identity.
    fn map_enum(
        &mut self,
        kind: &FieldKind,
        nullable: bool,
        field_name: &str,
    ) -> Result<Option<MappedField>> {
        let FieldKind::Struct(model) = kind else {
            debug!(field = field_name, "enum hint on a non-struct kind, skipping");
            return Ok(None);
        };

        let id = identity(model.as_ref());
        let entry = match self.registry.enum_entry(id) {
            Some(entry) => entry.clone(),
            None => {
                let Some(values) = model.enum_values() else {
                    debug!(
                        field = field_name,
                        type_name = model.type_name(),
                        "enum hint on a type without a value mapping, skipping"
                    );
                    return Ok(None);
                };
                let name = model.type_name();
                if name.is_empty() {
                    return Err(GenerateError::UnnamedType);
                }
                let mut enumeration = Enum::new(name);
                for label in values.keys() {
                    enumeration = enumeration.item(EnumItem::new(label.as_str()));
                }
                let entry = GeneratedType { name: name.to_string(), kind: TypeKind::Enum };
                self.registry.add_enum(id, entry.clone(), Type::Enum(enumeration));
                entry
            }
        };

        Ok(Some(MappedField {
            type_ref: named_ref(entry.name.as_str(), nullable),
            kind: MappedKind::Enum,
        }))
    }

    /// The `input` hint: synthesize the object form of the unwrapped type,
    /// then project its field signatures into an input object (types only),
    /// memoized per type identity.
    fn map_input(
        &mut self,
        kind: &FieldKind,
        nullable: bool,
        field_name: &str,
    ) -> Result<Option<MappedField>> {
        let FieldKind::Struct(model) = kind else {
            debug!(field = field_name, "input hint on a non-struct kind, skipping");
            return Ok(None);
        };

        let id = identity(model.as_ref());
        let entry = match self.registry.input_entry(id) {
            Some(entry) => entry.clone(),
            None => {
                let object = match self.registry.get(id) {
                    Some(entry) => entry.clone(),
                    None => self.synthesize(model)?,
                };
                if object.kind != TypeKind::Object {
                    return Err(GenerateError::InputNotObject {
                        field: field_name.to_string(),
                        name: object.name,
                    });
                }
                let Some(signatures) = self.registry.signatures(id) else {
                    debug!(
                        field = field_name,
                        type_name = %object.name,
                        "input projection of a type still being generated, skipping"
                    );
                    return Ok(None);
                };

                let input_name = format!("{}Input", object.name);
                let mut input = InputObject::new(input_name.as_str()).description(field_name);
                for (name, type_ref) in signatures.iter() {
                    input = input.field(InputValue::new(name.as_str(), type_ref.clone()));
                }
                let entry = GeneratedType { name: input_name, kind: TypeKind::Input };
                self.registry.add_input(id, entry.clone(), Type::InputObject(input));
                entry
            }
        };

        Ok(Some(MappedField {
            type_ref: named_ref(entry.name.as_str(), nullable),
            kind: MappedKind::Input,
        }))
    }

    /// Projects an argument record into schema argument descriptors.
    pub(crate) fn build_args(&mut self, record: &Arc<dyn TypeModel>) -> Result<Vec<ArgDescriptor>> {
        let mut args = Vec::new();
        for field in record.fields() {
            let hint = field.directive.hint();
            let Some(mapped) = self.map_field(&field.kind, hint, &field.name)? else {
                debug!(
                    record = record.type_name(),
                    field = %field.name,
                    "argument kind has no schema mapping, skipping argument"
                );
                continue;
            };
            args.push(ArgDescriptor {
                name: lower_first(&field.name),
                type_ref: mapped.type_ref,
                description: field_description(&field),
                default: field.value,
            });
        }
        Ok(args)
    }
}
