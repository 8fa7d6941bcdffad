//! Execution-path tests: resolver bindings, argument records with defaults,
//! default property resolution over resolved nodes, and interface dispatch
//! through the sealed type index.

use std::sync::Arc;

use async_graphql::dynamic::Schema;
use async_graphql::{Name, Value, value};
use async_trait::async_trait;
use serde_json::json;
use typegraph_graphql::{
    FieldBinding, Resolved, ResolveParams, Resolver, SchemaGenerator,
};
use typegraph_model::{FieldKind, FieldModel, TypeModel};

#[derive(Default)]
struct Named;

impl TypeModel for Named {
    fn type_name(&self) -> &str {
        "Named"
    }

    fn fields(&self) -> Vec<FieldModel> {
        vec![FieldModel::new("Name", FieldKind::String)]
    }

    fn is_interface(&self) -> bool {
        true
    }
}

#[derive(Default)]
struct Hero {
    name: String,
}

impl TypeModel for Hero {
    fn type_name(&self) -> &str {
        "Hero"
    }

    fn fields(&self) -> Vec<FieldModel> {
        vec![
            FieldModel::new("Name", FieldKind::String).with_value(json!(self.name)),
            FieldModel::new("Kind", FieldKind::nested(Named)).with_mapping("interface"),
        ]
    }
}

/// A model type that is deliberately never generated.
struct Stranger;

impl TypeModel for Stranger {
    fn type_name(&self) -> &str {
        "Stranger"
    }

    fn fields(&self) -> Vec<FieldModel> {
        vec![FieldModel::new("Name", FieldKind::String)]
    }
}

#[derive(Default)]
struct GreetingArgs;

impl TypeModel for GreetingArgs {
    fn type_name(&self) -> &str {
        "GreetingArgs"
    }

    fn fields(&self) -> Vec<FieldModel> {
        vec![
            FieldModel::new("Name", FieldKind::String)
                .with_description("who to greet")
                .with_value(json!("world")),
        ]
    }
}

#[derive(Default)]
struct Query;

impl TypeModel for Query {
    fn type_name(&self) -> &str {
        "Query"
    }

    fn fields(&self) -> Vec<FieldModel> {
        vec![
            FieldModel::new("Greeting", FieldKind::String).with_resolve("greeting"),
            FieldModel::new("Champion", FieldKind::optional(FieldKind::nested(Named)))
                .with_resolve("champion"),
            FieldModel::new("Stray", FieldKind::optional(FieldKind::nested(Named)))
                .with_resolve("stray"),
        ]
    }

    fn args_for(&self, field: &str) -> Option<Arc<dyn TypeModel>> {
        match field {
            "Greeting" => Some(Arc::new(GreetingArgs)),
            _ => None,
        }
    }
}

struct AppResolver;

#[async_trait]
impl Resolver for AppResolver {
    fn attaches_to(&self, _owner: &dyn TypeModel, field: &FieldModel) -> bool {
        field.directive.resolve.is_some()
    }

    async fn resolve(
        &self,
        binding: &FieldBinding,
        params: ResolveParams,
    ) -> async_graphql::Result<Resolved> {
        match binding.resolve_tag.as_deref() {
            Some("greeting") => {
                let name = match params.args.get(&Name::new("name")) {
                    Some(Value::String(name)) => name.clone(),
                    _ => "nobody".to_string(),
                };
                Ok(Resolved::Value(Value::String(format!("hello, {name}"))))
            }
            Some("champion") => Ok(Resolved::Node(Arc::new(Hero { name: "Ada".into() }))),
            Some("stray") => Ok(Resolved::Node(Arc::new(Stranger))),
            _ => Ok(Resolved::Null),
        }
    }
}

fn build_schema() -> Schema {
    let mut generator = SchemaGenerator::with_resolver(Arc::new(AppResolver));
    generator.generate(Query::default()).expect("query generation should succeed");
    // Concrete types returned through interface-typed fields must be
    // generated during the build.
    generator.generate(Hero::default()).expect("hero generation should succeed");

    let (builder, _index) = generator.install(Schema::build("Query", None, None));
    builder.finish().expect("schema should build")
}

#[tokio::test]
async fn resolver_receives_arguments_with_defaults_applied() {
    let schema = build_schema();

    let response = schema.execute(r#"{ greeting(name: "Grace") }"#).await;
    assert!(response.errors.is_empty(), "unexpected errors: {:?}", response.errors);
    assert_eq!(response.data, value!({ "greeting": "hello, Grace" }));

    // Omitted argument: the record's generation-time value is the default.
    let response = schema.execute("{ greeting }").await;
    assert!(response.errors.is_empty(), "unexpected errors: {:?}", response.errors);
    assert_eq!(response.data, value!({ "greeting": "hello, world" }));
}

#[tokio::test]
async fn interface_typed_fields_dispatch_through_the_registry() {
    let schema = build_schema();

    let response = schema.execute("{ champion { name } }").await;
    assert!(response.errors.is_empty(), "unexpected errors: {:?}", response.errors);
    assert_eq!(response.data, value!({ "champion": { "name": "Ada" } }));
}

#[tokio::test]
async fn concrete_dispatch_also_serves_inline_fragments() {
    let schema = build_schema();

    let response = schema
        .execute("{ champion { name ... on Hero { name } } }")
        .await;
    assert!(response.errors.is_empty(), "unexpected errors: {:?}", response.errors);
    assert_eq!(response.data, value!({ "champion": { "name": "Ada" } }));
}

#[tokio::test]
async fn unresolvable_dynamic_types_surface_as_query_errors() {
    let schema = build_schema();

    let response = schema.execute("{ stray { name } }").await;
    assert!(!response.errors.is_empty(), "expected a query error");
    let message = response.errors[0].message.clone();
    assert!(
        message.contains("no generated type for runtime value of type Stranger"),
        "unexpected message: {message}"
    );
}
