//! # jsm-cli — Model Manifest Command-Line Interface
//!
//! Exposes manifest-declared models (see `jsm_schema::ModelCatalog`) on the
//! command line.
//!
//! ## Subcommands
//!
//! - `compile` — Print a model's JSON Schema
//! - `validate` — Validate a JSON or YAML document against a model
//! - `list` — List the models a manifest declares
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handler functions delegate to `jsm-schema`; no schema logic here.
//! - Handlers return their output instead of printing it, so they can be
//!   tested without capturing stdout.

pub mod compile;
pub mod list;
pub mod validate;

use std::path::Path;

use anyhow::Context;
use jsm_schema::ModelCatalog;

/// Load a manifest, attaching the path to any error.
pub(crate) fn load_catalog(path: &Path) -> anyhow::Result<ModelCatalog> {
    ModelCatalog::from_path(path)
        .with_context(|| format!("failed to load manifest {}", path.display()))
}
