//! The injected resolver extension point.
//!
//! The generator itself never computes field data. An application that wants
//! resolved fields injects a [`Resolver`]: its
//! [`attaches_to`](Resolver::attaches_to) policy decides per field whether a
//! binding is attached during generation, and its
//! [`resolve`](Resolver::resolve) is invoked per node at query-execution
//! time with the captured [`FieldBinding`] and the execution-time
//! [`ResolveParams`].
//!
//! Fields without a binding fall back to default property resolution: a
//! JSON-shaped parent is read by schema field name, a model-instance parent
//! by its declared field values.

use std::fmt;
use std::sync::Arc;

use async_graphql::dynamic::ResolverContext;
use async_graphql::indexmap::IndexMap;
use async_graphql::{Name, Value};
use async_trait::async_trait;
use typegraph_model::{FieldKind, FieldModel, TypeModel};

/// Decides which fields receive resolver bindings and resolves them.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Whether the generator should attach a binding to this field of the
    /// owning type.
    fn attaches_to(&self, owner: &dyn TypeModel, field: &FieldModel) -> bool;

    /// Resolves one field at query-execution time.
    ///
    /// # Errors
    ///
    /// Errors are surfaced on the query response by the execution runtime.
    async fn resolve(
        &self,
        binding: &FieldBinding,
        params: ResolveParams,
    ) -> async_graphql::Result<Resolved>;
}

/// Everything a binding captures at generation time.
///
/// The binding closes over the specific source instance the schema was
/// generated from, not just its type: resolution is per node, and the
/// instance carries the values the resolver may need.
#[derive(Clone)]
pub struct FieldBinding {
    /// Declared field name, e.g. `Name`.
    pub name: String,
    /// Declared field kind, nullable wrapper included.
    pub kind: FieldKind,
    /// The source instance the schema was generated from.
    pub source: Arc<dyn TypeModel>,
    /// The field's argument record instance, if the owning type supplies one.
    pub args: Option<Arc<dyn TypeModel>>,
    /// The raw resolver tag, handed through untouched.
    pub resolve_tag: Option<String>,
}

impl fmt::Debug for FieldBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldBinding")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("source", &self.source.type_name())
            .field("args", &self.args.as_ref().map(|a| a.type_name()))
            .field("resolve_tag", &self.resolve_tag)
            .finish()
    }
}

/// Execution-time parameters handed to [`Resolver::resolve`].
#[derive(Clone, Default)]
pub struct ResolveParams {
    /// Field arguments, defaults already applied by the runtime.
    pub args: IndexMap<Name, Value>,
    /// The parent value, when the parent resolved to plain data.
    pub parent: Option<Value>,
    /// The parent model instance, when the parent resolved to a node.
    pub parent_node: Option<Arc<dyn TypeModel>>,
}

impl ResolveParams {
    /// Snapshots the runtime's resolver context.
    #[must_use]
    pub fn from_context(ctx: &ResolverContext<'_>) -> Self {
        Self {
            args: ctx.args.as_index_map().clone(),
            parent: ctx.parent_value.as_value().cloned(),
            parent_node: ctx.parent_value.downcast_ref::<Arc<dyn TypeModel>>().cloned(),
        }
    }
}

impl fmt::Debug for ResolveParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolveParams")
            .field("args", &self.args)
            .field("parent", &self.parent)
            .field("parent_node", &self.parent_node.as_ref().map(|n| n.type_name()))
            .finish()
    }
}

/// What a resolver produced for one field.
pub enum Resolved {
    /// No value; the field resolves to null.
    Null,
    /// Plain data, consumed by the runtime as-is.
    Value(Value),
    /// A model instance; its concrete schema type is looked up in the
    /// registry, which is what makes interface-typed fields dispatch.
    Node(Arc<dyn TypeModel>),
    /// A list of model instances, each dispatched like [`Resolved::Node`].
    Nodes(Vec<Arc<dyn TypeModel>>),
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "Null"),
            Self::Value(v) => write!(f, "Value({v})"),
            Self::Node(m) => write!(f, "Node({})", m.type_name()),
            Self::Nodes(ms) => write!(f, "Nodes(len = {})", ms.len()),
        }
    }
}

/// Converts a `serde_json::Value` to an `async_graphql::Value`.
///
/// Model-side data is plain JSON; this is the bridge resolvers and the
/// default property resolver use to hand it to the runtime.
pub fn json_to_graphql_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else if let Some(f) = n.as_f64() {
                Value::Number(
                    async_graphql::Number::from_f64(f)
                        .unwrap_or_else(|| async_graphql::Number::from(0)),
                )
            } else {
                Value::Null
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => {
            Value::List(arr.into_iter().map(json_to_graphql_value).collect())
        }
        serde_json::Value::Object(obj) => {
            let map: IndexMap<Name, Value> = obj
                .into_iter()
                .map(|(k, v)| (Name::new(k), json_to_graphql_value(v)))
                .collect();
            Value::Object(map)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    struct Unit;

    impl TypeModel for Unit {
        fn type_name(&self) -> &str {
            "Unit"
        }

        fn fields(&self) -> Vec<FieldModel> {
            Vec::new()
        }
    }

    struct Echo;

    #[async_trait]
    impl Resolver for Echo {
        fn attaches_to(&self, _owner: &dyn TypeModel, field: &FieldModel) -> bool {
            field.directive.resolve.is_some()
        }

        async fn resolve(
            &self,
            binding: &FieldBinding,
            _params: ResolveParams,
        ) -> async_graphql::Result<Resolved> {
            Ok(Resolved::Value(Value::String(binding.name.clone())))
        }
    }

    #[test]
    fn test_resolver_dispatches_through_a_trait_object() {
        let resolver: Arc<dyn Resolver> = Arc::new(Echo);
        let binding = FieldBinding {
            name: "Greeting".into(),
            kind: FieldKind::String,
            source: Arc::new(Unit),
            args: None,
            resolve_tag: Some("echo".into()),
        };

        let resolved = tokio_test::block_on(resolver.resolve(&binding, ResolveParams::default()))
            .expect("resolution should succeed");
        assert!(matches!(resolved, Resolved::Value(Value::String(s)) if s == "Greeting"));
    }

    #[test]
    fn test_attachment_policy_reads_the_resolve_tag() {
        let resolver = Echo;
        let tagged = FieldModel::new("A", FieldKind::String).with_resolve("echo");
        let untagged = FieldModel::new("B", FieldKind::String);

        assert!(resolver.attaches_to(&Unit, &tagged));
        assert!(!resolver.attaches_to(&Unit, &untagged));
    }

    #[test]
    fn test_json_to_graphql_value_primitives() {
        assert!(matches!(json_to_graphql_value(json!(null)), Value::Null));
        assert!(matches!(json_to_graphql_value(json!(true)), Value::Boolean(true)));
        assert!(matches!(json_to_graphql_value(json!(42)), Value::Number(_)));
        assert!(matches!(json_to_graphql_value(json!("hi")), Value::String(s) if s == "hi"));
    }

    #[test]
    fn test_json_to_graphql_value_complex() {
        let list = json_to_graphql_value(json!([1, 2, 3]));
        assert!(matches!(list, Value::List(items) if items.len() == 3));

        let object = json_to_graphql_value(json!({"name": "Ada"}));
        let Value::Object(map) = object else {
            panic!("expected object");
        };
        assert_eq!(map.get(&Name::new("name")), Some(&Value::String("Ada".into())));
    }
}
