//! # jsm-core — Model Declaration Primitives
//!
//! This crate defines how a data model is declared: ordered, named, typed
//! fields, optionally constrained by validators, inheritable across models.
//! It knows nothing about JSON Schema documents; `jsm-schema` compiles the
//! registries defined here into schemas.
//!
//! ## Key Design Principles
//!
//! 1. **Declarations live on the type, not the instance.** A model
//!    implements [`Model::declare`]; its registry is built from that alone.
//!    Constructors are never called or inspected.
//!
//! 2. **Closed kind vocabulary.** [`FieldKind`] and [`ScalarKind`] are
//!    matched exhaustively everywhere. A target exists exactly for
//!    embedded and list fields, enforced by [`FieldShape`].
//!
//! 3. **Tagged polymorphic targets.** A target is [`FieldTarget::Single`]
//!    or [`FieldTarget::Candidates`]; candidates are models or primitive
//!    kinds.
//!
//! 4. **Optional schema contribution.** Every [`Validator`] can `check` a
//!    value; contributing to a schema is opt-in through
//!    [`Validator::schema_contribution`].
//!
//! 5. **One compute-once cache.** [`registry_of`] is the only process-wide
//!    state: registries are built once per model and never change.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `jsm-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod field;
pub mod kind;
pub mod model;
pub mod target;
pub mod validator;

// Re-export primary types for ergonomic imports.
pub use error::{ModelError, ValidationError};
pub use field::{Field, FieldDescriptor, FieldShape};
pub use kind::{FieldKind, ScalarKind};
pub use model::{registry_of, Declaration, Model, ModelKey, ModelRegistry};
pub use target::{Candidate, FieldTarget, ModelRef, TypedModel};
pub use validator::{Bound, Fragment, Length, Max, Min, Regex, SchemaContribution, Validator};
