//! # jsm-schema — Model Schema Compilation & Validation
//!
//! Compiles the model registries defined in `jsm-core` into JSON Schema
//! documents, and validates documents against them.
//!
//! ## Compilation (`compiler`, `polymorphic`, `types`)
//!
//! [`SchemaCompiler`] walks a registry in declaration order. Scalars map to
//! a `type`/`format` pair, embedded fields inline the target model's
//! document, list fields wrap it as `items`, and a field with several
//! candidates becomes a `oneOf`. Every model also gets
//! [`JsonSchema::json_schema`] and [`JsonSchema::to_json_schema`].
//!
//! ## Manifests (`catalog`)
//!
//! [`ModelCatalog`] loads models declared in a YAML or JSON manifest. Named
//! model references in those declarations resolve against the catalog.
//!
//! ## Validation (`validate`, `compare`)
//!
//! [`validate_document`] checks a JSON document against a compiled schema
//! with Draft 4 semantics. [`compare_schemas`] checks two schema documents
//! for structural equality, ignoring the order of `required` and `oneOf`.
//!
//! ## Crate Policy
//!
//! - Depends only on `jsm-core` internally.
//! - Compilation is a pure function of the registry: no caching of
//!   documents, no mutation of registries.
//! - Invalid declarations are rejected with structured errors naming the
//!   model and field at fault.

pub mod catalog;
pub mod compare;
pub mod compiler;
pub mod error;
pub mod polymorphic;
pub mod types;
pub mod validate;

pub use catalog::{Manifest, ModelCatalog};
pub use compare::compare_schemas;
pub use compiler::{JsonSchema, SchemaCompiler};
pub use error::{CatalogError, SchemaError};
pub use types::{base_fragment, type_and_format};
pub use validate::{
    validate_document, DocumentValidationError, DocumentValidator, Violation, Violations,
};
