//! # Schema Errors
//!
//! Every error here is a configuration error: the model declaration (or
//! manifest) is malformed. Compilation is deterministic, so retrying with
//! the same input fails the same way.

use jsm_core::ModelError;
use thiserror::Error;

/// Failure to compile a model into a schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A registry could not be built.
    #[error("model declaration error: {0}")]
    Model(#[from] ModelError),

    /// A model name that no catalog declares.
    #[error("unknown model '{0}'")]
    UnknownModel(String),

    /// A named model reference with no matching model.
    #[error("field '{field}' of model '{model}' references unknown model '{target}'")]
    UnresolvedModel {
        /// Model owning the field.
        model: String,
        /// Field holding the reference.
        field: String,
        /// The unknown model name.
        target: String,
    },

    /// A model reachable from itself through embedded or list fields.
    #[error("model '{model}' embeds itself (path: {path})")]
    CyclicModel {
        /// Model at which the cycle was detected.
        model: String,
        /// Embedding path leading back to `model`, joined by ` -> `.
        path: String,
    },
}

/// Failure to load a model manifest.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The manifest could not be read.
    #[error("cannot read manifest '{path}': {source}")]
    Io {
        /// Manifest path.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The manifest is not valid YAML/JSON, or not shaped like a manifest.
    #[error("invalid manifest: {0}")]
    Parse(String),

    /// Two models share a name.
    #[error("model '{0}' is declared more than once")]
    DuplicateModel(String),

    /// `extends` names a model the manifest does not declare.
    #[error("model '{model}' extends unknown model '{parent}'")]
    UnknownParent {
        /// Declaring model.
        model: String,
        /// The unknown parent.
        parent: String,
    },

    /// A field or inheritance chain is malformed.
    #[error("model '{model}': {source}")]
    Model {
        /// Model whose declaration is invalid.
        model: String,
        /// The declaration error.
        source: ModelError,
    },
}
