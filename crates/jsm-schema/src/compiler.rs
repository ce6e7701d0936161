//! # Schema Compiler
//!
//! Walks a [`ModelRegistry`] in declaration order and produces its JSON
//! Schema document:
//!
//! 1. Each field gets a base fragment: the type mapping for scalars, or a
//!    resolved target (see [`crate::polymorphic`]) for embedded and list
//!    fields. List fields wrap their target as `{"type": "array", "items": ...}`.
//! 2. Each validator with a schema contribution modifies the fragment, in
//!    declaration order, before it is attached.
//! 3. The document is `{"type": "object", "properties": ...}`, plus
//!    `"required"` when at least one field is required.
//!
//! A model embedded in another compiles to exactly the document it would
//! produce on its own.
//!
//! ## Cycles
//!
//! The compiler keeps the chain of models being compiled. A model that
//! appears twice on that chain would expand forever; it is rejected with
//! `SchemaError::CyclicModel`.
//!
//! Compilation never mutates a registry. Every call returns a fresh
//! document, so one compiler can be used from many threads.

use jsm_core::{registry_of, FieldDescriptor, FieldShape, Fragment, Model, ModelKey, ModelRegistry};
use serde_json::Value;

use crate::catalog::ModelCatalog;
use crate::error::SchemaError;
use crate::types::base_fragment;

/// Models currently being compiled, outermost first.
pub(crate) type CompilePath = Vec<(ModelKey, String)>;

/// Compiles model registries into JSON Schema documents.
///
/// Typed model references resolve through the process-wide registry
/// cache. Named references resolve through the attached [`ModelCatalog`],
/// if any.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaCompiler<'a> {
    catalog: Option<&'a ModelCatalog>,
}

impl<'a> SchemaCompiler<'a> {
    /// A compiler resolving typed references only.
    pub fn new() -> Self {
        Self { catalog: None }
    }

    /// A compiler that also resolves named references against `catalog`.
    pub fn with_catalog(catalog: &'a ModelCatalog) -> Self {
        Self {
            catalog: Some(catalog),
        }
    }

    /// The attached catalog.
    pub fn catalog(&self) -> Option<&'a ModelCatalog> {
        self.catalog
    }

    /// Compile a registry into a schema document.
    ///
    /// # Errors
    ///
    /// Returns a `SchemaError` if a referenced model cannot be built or
    /// resolved, a target is empty, or the model graph is cyclic.
    pub fn compile(&self, registry: &ModelRegistry) -> Result<Value, SchemaError> {
        tracing::debug!(model = registry.name(), "compiling model schema");
        let mut path = CompilePath::new();
        self.compile_model(registry, &mut path).map(Value::Object)
    }

    /// Compile model `M`.
    ///
    /// # Errors
    ///
    /// See [`SchemaCompiler::compile`].
    pub fn compile_type<M: Model>(&self) -> Result<Value, SchemaError> {
        let registry = registry_of::<M>()?;
        self.compile(&registry)
    }

    pub(crate) fn compile_model(
        &self,
        registry: &ModelRegistry,
        path: &mut CompilePath,
    ) -> Result<Fragment, SchemaError> {
        if let Some(pos) = path.iter().position(|(key, _)| key == registry.key()) {
            let mut chain: Vec<&str> = path[pos..].iter().map(|(_, name)| name.as_str()).collect();
            chain.push(registry.name());
            return Err(SchemaError::CyclicModel {
                model: registry.name().to_string(),
                path: chain.join(" -> "),
            });
        }

        path.push((registry.key().clone(), registry.name().to_string()));
        let document = self.compile_fields(registry, path);
        path.pop();
        document
    }

    fn compile_fields(
        &self,
        registry: &ModelRegistry,
        path: &mut CompilePath,
    ) -> Result<Fragment, SchemaError> {
        let mut properties = Fragment::new();
        let mut required = Vec::new();

        for field in registry.fields() {
            let mut fragment = self.field_fragment(registry, field, path)?;
            for validator in field.validators() {
                if let Some(contribution) = validator.schema_contribution() {
                    contribution.modify_schema(&mut fragment);
                }
            }
            properties.insert(field.name().to_string(), Value::Object(fragment));
            if field.is_required() {
                required.push(Value::String(field.name().to_string()));
            }
        }

        tracing::trace!(
            model = registry.name(),
            properties = properties.len(),
            required = required.len(),
            "model schema assembled"
        );

        let mut document = Fragment::new();
        document.insert("type".to_string(), Value::String("object".to_string()));
        document.insert("properties".to_string(), Value::Object(properties));
        if !required.is_empty() {
            document.insert("required".to_string(), Value::Array(required));
        }
        Ok(document)
    }

    fn field_fragment(
        &self,
        owner: &ModelRegistry,
        field: &FieldDescriptor,
        path: &mut CompilePath,
    ) -> Result<Fragment, SchemaError> {
        match field.shape() {
            FieldShape::Scalar(kind) => Ok(base_fragment(*kind)),
            FieldShape::Embedded(target) => self.resolve_target(owner, field, target, path),
            FieldShape::List(target) => {
                let items = self.resolve_target(owner, field, target, path)?;
                let mut fragment = Fragment::new();
                fragment.insert("type".to_string(), Value::String("array".to_string()));
                fragment.insert("items".to_string(), Value::Object(items));
                Ok(fragment)
            }
        }
    }
}

/// Compile entry point on model types and instances.
///
/// Implemented for every [`Model`]:
///
/// ```ignore
/// let schema = Person::json_schema()?;
/// let same = person.to_json_schema()?;
/// ```
pub trait JsonSchema: Model {
    /// The model's JSON Schema document.
    ///
    /// # Errors
    ///
    /// See [`SchemaCompiler::compile`].
    fn json_schema() -> Result<Value, SchemaError>
    where
        Self: Sized,
    {
        SchemaCompiler::new().compile_type::<Self>()
    }

    /// The JSON Schema document of this instance's model.
    ///
    /// # Errors
    ///
    /// See [`SchemaCompiler::compile`].
    fn to_json_schema(&self) -> Result<Value, SchemaError>
    where
        Self: Sized,
    {
        Self::json_schema()
    }
}

impl<M: Model> JsonSchema for M {}

#[cfg(test)]
mod tests {
    use super::*;
    use jsm_core::{Candidate, Declaration, Field, Length, Max, Min, Regex};
    use serde_json::json;

    struct Person;
    impl Model for Person {
        fn declare(model: &mut Declaration) {
            model
                .field("name", Field::string().required())
                .field("surname", Field::string().required())
                .field("age", Field::int());
        }
    }

    struct Constrained;
    impl Model for Constrained {
        fn declare(model: &mut Declaration) {
            model
                .field(
                    "age",
                    Field::int()
                        .validator(Min::new(18))
                        .validator(Max::exclusive(120)),
                )
                .field(
                    "code",
                    Field::string()
                        .validator(Length::between(2, 4).unwrap())
                        .validator(Regex::new("/^[A-Z]+$/").unwrap()),
                );
        }
    }

    struct Node;
    impl Model for Node {
        fn declare(model: &mut Declaration) {
            model
                .field("value", Field::int())
                .field("children", Field::list(Candidate::model::<Node>()));
        }
    }

    #[test]
    fn test_required_and_order() {
        let schema = SchemaCompiler::new().compile_type::<Person>().unwrap();
        assert_eq!(
            schema,
            json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "surname": {"type": "string"},
                    "age": {"type": "integer"}
                },
                "required": ["name", "surname"]
            })
        );
        let keys: Vec<&String> = schema["properties"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["name", "surname", "age"]);
    }

    #[test]
    fn test_contributions_applied_in_order() {
        let schema = Constrained::json_schema().unwrap();
        assert_eq!(
            schema["properties"]["age"],
            json!({"type": "integer", "minimum": 18, "maximum": 120, "exclusiveMaximum": true})
        );
        assert_eq!(
            schema["properties"]["code"],
            json!({"type": "string", "minLength": 2, "maxLength": 4, "pattern": "^[A-Z]+$"})
        );
        assert!(schema.get("required").is_none());
    }

    #[test]
    fn test_instance_and_type_agree() {
        let person = Person;
        assert_eq!(person.to_json_schema().unwrap(), Person::json_schema().unwrap());
    }

    #[test]
    fn test_self_embedding_rejected() {
        match Node::json_schema().unwrap_err() {
            SchemaError::CyclicModel { model, path } => {
                assert_eq!(model, "Node");
                assert_eq!(path, "Node -> Node");
            }
            other => panic!("Expected CyclicModel, got: {other}"),
        }
    }

    #[test]
    fn test_named_reference_without_catalog_is_unresolved() {
        let mut declaration = Declaration::new();
        declaration.field("toy", Field::embedded(Candidate::named("Toy")));
        let registry = declaration
            .build("Kid", ModelKey::Named("Kid".to_string()))
            .unwrap();
        assert_eq!(
            SchemaCompiler::new().compile(&registry).unwrap_err(),
            SchemaError::UnresolvedModel {
                model: "Kid".to_string(),
                field: "toy".to_string(),
                target: "Toy".to_string(),
            }
        );
    }
}
