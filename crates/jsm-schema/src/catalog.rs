//! # Model Catalog — Manifest-Declared Models
//!
//! Models can be declared in a YAML or JSON manifest instead of Rust code:
//!
//! ```yaml
//! models:
//!   - name: Event
//!     fields:
//!       - { name: date, kind: date }
//!   - name: Person
//!     extends: Base
//!     fields:
//!       - name: age
//!         kind: int
//!         required: true
//!         validators:
//!           - { rule: min, bound: 18, exclusive: true }
//!       - name: names
//!         kind: list
//!         target: [string, int, Event]
//! ```
//!
//! Candidate names that spell a scalar kind (`string`, `int`, `float`,
//! `bool`, `date`, `time`, `datetime`) are primitives; every other name is a
//! model reference, resolved when the schema is compiled.
//!
//! Every registry is built once, when the catalog is loaded. `extends`
//! follows the same override rule as typed models; a chain that returns to
//! its start is a `ModelError::CyclicInheritance`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use jsm_core::{
    Bound, Candidate, Declaration, Field, FieldKind, FieldTarget, Length, Max, Min, ModelError,
    ModelKey, ModelRegistry, Regex, ScalarKind, Validator,
};
use serde::Deserialize;
use serde_json::Value;

use crate::compiler::SchemaCompiler;
use crate::error::{CatalogError, SchemaError};

/// Top level of a model manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Declared models, in order.
    pub models: Vec<ModelDecl>,
}

/// One model in a manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelDecl {
    /// Model name, unique within the manifest.
    pub name: String,
    /// Parent model.
    #[serde(default)]
    pub extends: Option<String>,
    /// Own fields, in order.
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

/// One field in a manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDecl {
    /// Field name.
    pub name: String,
    /// Kind identifier, as in [`FieldKind::as_str`].
    pub kind: String,
    /// Whether the field must be present.
    #[serde(default)]
    pub required: bool,
    /// Candidate name, or list of candidate names.
    #[serde(default)]
    pub target: Option<TargetDecl>,
    /// Validators, in order.
    #[serde(default)]
    pub validators: Vec<ValidatorDecl>,
}

/// A target as written in a manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TargetDecl {
    /// `target: Toy`
    One(String),
    /// `target: [PC, Laptop]`
    Many(Vec<String>),
}

/// A built-in validator as written in a manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case", deny_unknown_fields)]
pub enum ValidatorDecl {
    /// `{ rule: min, bound: 18, exclusive: true }`
    Min {
        /// Lower bound.
        bound: Bound,
        /// Reject the bound itself.
        #[serde(default)]
        exclusive: bool,
    },
    /// `{ rule: max, bound: 99 }`
    Max {
        /// Upper bound.
        bound: Bound,
        /// Reject the bound itself.
        #[serde(default)]
        exclusive: bool,
    },
    /// `{ rule: regex, pattern: "^x$", ignorecase: true }`
    Regex {
        /// Pattern, optionally wrapped in `/…/`.
        pattern: String,
        /// Case-insensitive matching.
        #[serde(default)]
        ignorecase: bool,
    },
    /// `{ rule: length, min: 5, max: 20 }`
    Length {
        /// Minimum length.
        min: usize,
        /// Maximum length.
        #[serde(default)]
        max: Option<usize>,
    },
}

impl ValidatorDecl {
    fn build(&self) -> Result<Arc<dyn Validator>, ModelError> {
        Ok(match self {
            Self::Min { bound, exclusive } => Arc::new(Min {
                bound: bound.finite()?,
                exclusive: *exclusive,
            }),
            Self::Max { bound, exclusive } => Arc::new(Max {
                bound: bound.finite()?,
                exclusive: *exclusive,
            }),
            Self::Regex {
                pattern,
                ignorecase,
            } => Arc::new(Regex::with_flags(pattern, *ignorecase)?),
            Self::Length { min, max: Some(max) } => Arc::new(Length::between(*min, *max)?),
            Self::Length { min, max: None } => Arc::new(Length::new(*min)),
        })
    }
}

fn candidate(name: &str) -> Candidate {
    match name.parse::<ScalarKind>() {
        Ok(kind) => Candidate::Primitive(kind),
        Err(_) => Candidate::named(name),
    }
}

impl TargetDecl {
    fn build(&self) -> FieldTarget {
        match self {
            Self::One(name) => FieldTarget::Single(candidate(name)),
            Self::Many(names) => {
                FieldTarget::Candidates(names.iter().map(|n| candidate(n)).collect())
            }
        }
    }
}

impl FieldDecl {
    fn build(&self) -> Result<Field, ModelError> {
        let kind: FieldKind = self.kind.parse()?;
        let validators = self
            .validators
            .iter()
            .map(ValidatorDecl::build)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Field::new(&self.name, kind, self.target.as_ref().map(TargetDecl::build))?
            .with_required(self.required)
            .validators(validators))
    }
}

/// Registries of manifest-declared models, in manifest order.
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    models: Vec<Arc<ModelRegistry>>,
}

impl ModelCatalog {
    /// Load a manifest file. `.json` files are parsed as JSON, everything
    /// else as YAML.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Io` if the file cannot be read, and any
    /// error of [`ModelCatalog::from_manifest`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
        let catalog = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_yaml_str(&content)?
        };
        tracing::debug!(
            path = %path.display(),
            models = catalog.len(),
            "model catalog loaded"
        );
        Ok(catalog)
    }

    /// Parse a YAML manifest.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed YAML.
    pub fn from_yaml_str(content: &str) -> Result<Self, CatalogError> {
        let manifest: Manifest =
            serde_yaml::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::from_manifest(&manifest)
    }

    /// Parse a JSON manifest.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` for malformed JSON.
    pub fn from_json_str(content: &str) -> Result<Self, CatalogError> {
        let manifest: Manifest =
            serde_json::from_str(content).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::from_manifest(&manifest)
    }

    /// Build every model of a manifest.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateModel`, `CatalogError::UnknownParent`,
    /// or `CatalogError::Model` for a malformed model.
    pub fn from_manifest(manifest: &Manifest) -> Result<Self, CatalogError> {
        let mut decls: HashMap<&str, &ModelDecl> = HashMap::new();
        for decl in &manifest.models {
            if decls.insert(decl.name.as_str(), decl).is_some() {
                return Err(CatalogError::DuplicateModel(decl.name.clone()));
            }
        }

        let mut builder = Builder {
            decls: &decls,
            built: HashMap::new(),
            stack: Vec::new(),
        };
        let models = manifest
            .models
            .iter()
            .map(|decl| builder.build(decl))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { models })
    }

    /// Look up a model by name.
    pub fn get(&self, name: &str) -> Option<&Arc<ModelRegistry>> {
        self.models.iter().find(|m| m.name() == name)
    }

    /// Model names, in manifest order.
    pub fn names(&self) -> Vec<&str> {
        self.models.iter().map(|m| m.name()).collect()
    }

    /// Registries, in manifest order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<ModelRegistry>> {
        self.models.iter()
    }

    /// Number of models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns true if the catalog declares no models.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Compile the named model, resolving references against this catalog.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownModel` if the catalog does not declare
    /// `name`, and any error of [`SchemaCompiler::compile`].
    pub fn compile(&self, name: &str) -> Result<Value, SchemaError> {
        let registry = self
            .get(name)
            .ok_or_else(|| SchemaError::UnknownModel(name.to_string()))?;
        SchemaCompiler::with_catalog(self).compile(registry)
    }
}

struct Builder<'m> {
    decls: &'m HashMap<&'m str, &'m ModelDecl>,
    built: HashMap<String, Arc<ModelRegistry>>,
    stack: Vec<String>,
}

impl Builder<'_> {
    fn build(&mut self, decl: &ModelDecl) -> Result<Arc<ModelRegistry>, CatalogError> {
        let name = decl.name.as_str();
        if let Some(registry) = self.built.get(name) {
            return Ok(Arc::clone(registry));
        }
        if let Some(pos) = self.stack.iter().position(|n| n == name) {
            let mut chain = self.stack[pos..].to_vec();
            chain.push(name.to_string());
            return Err(CatalogError::Model {
                model: name.to_string(),
                source: ModelError::CyclicInheritance {
                    model: name.to_string(),
                    chain: chain.join(" -> "),
                },
            });
        }

        let model_error = |source| CatalogError::Model {
            model: name.to_string(),
            source,
        };

        let mut declaration = Declaration::new();
        if let Some(parent) = &decl.extends {
            let decls = self.decls;
            let parent_decl = decls.get(parent.as_str()).copied().ok_or_else(|| {
                CatalogError::UnknownParent {
                    model: name.to_string(),
                    parent: parent.clone(),
                }
            })?;
            self.stack.push(name.to_string());
            let parent_registry = self.build(parent_decl);
            self.stack.pop();
            declaration.extends_registry(parent_registry?);
        }

        for field in &decl.fields {
            declaration.field(field.name.clone(), field.build().map_err(model_error)?);
        }

        let registry = Arc::new(
            declaration
                .build(name, ModelKey::Named(name.to_string()))
                .map_err(model_error)?,
        );
        self.built.insert(name.to_string(), Arc::clone(&registry));
        Ok(registry)
    }
}
