//! # Document Validation
//!
//! Validates JSON documents against a compiled model schema using the
//! `jsonschema` crate.
//!
//! Compiled schemas express exclusive bounds in the boolean form
//! (`"minimum": 18, "exclusiveMinimum": true`), which is Draft 4 syntax, so
//! validators are built with Draft 4 semantics.
//!
//! A rejected document is reported as [`Violations`], each one attributed
//! to the top-level model field it concerns. A missing required field is
//! attributed to that field even though the failing value is the document.

use std::collections::BTreeSet;
use std::fmt;

use jsonschema::error::ValidationErrorKind;
use jsonschema::Validator;
use serde_json::Value;
use thiserror::Error;

/// Error during document validation.
#[derive(Error, Debug)]
pub enum DocumentValidationError {
    /// The document did not conform to the schema.
    #[error("document does not conform to model '{model}':\n{violations}")]
    ValidationFailed {
        /// Model the document was validated against.
        model: String,
        /// Every field-level departure from the model.
        violations: Violations,
    },

    /// The compiled schema could not be turned into a validator.
    #[error("schema of model '{model}' is not a valid Draft 4 schema: {reason}")]
    InvalidSchema {
        /// Model whose schema was rejected.
        model: String,
        /// Reason reported by `jsonschema`.
        reason: String,
    },
}

/// One way a document departs from its model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Model field concerned; `None` when the document as a whole is
    /// rejected (for instance, it is not an object).
    pub field: Option<String>,
    /// JSON pointer to the rejected value, empty for the document itself.
    pub pointer: String,
    /// Schema keyword that rejected the value: `required`, `minimum`, ...
    pub keyword: String,
    /// Description from the validator.
    pub message: String,
}

impl Violation {
    fn from_error(error: &jsonschema::ValidationError<'_>) -> Self {
        let pointer = error.instance_path.to_string();
        let schema_path = error.schema_path.to_string();
        let keyword = schema_path.rsplit('/').next().unwrap_or_default().to_string();
        let field = match (&error.kind, pointer.as_str()) {
            (ValidationErrorKind::Required { property }, "") => {
                property.as_str().map(str::to_string)
            }
            _ => first_segment(&pointer),
        };
        Self {
            field,
            pointer,
            keyword,
            message: error.to_string(),
        }
    }
}

/// First reference token of a JSON pointer, unescaped.
fn first_segment(pointer: &str) -> Option<String> {
    let token = pointer.strip_prefix('/')?.split('/').next()?;
    Some(token.replace("~1", "/").replace("~0", "~"))
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{field}")?,
            None => f.write_str("<document>")?,
        }
        if first_segment(&self.pointer).as_deref() != Some(self.pointer.trim_start_matches('/')) {
            write!(f, " at {}", if self.pointer.is_empty() { "/" } else { &self.pointer })?;
        }
        write!(f, ": {} [{}]", self.message, self.keyword)
    }
}

/// Every violation found in one document, in the order reported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    /// Number of violations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the document conformed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the violations.
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    /// Model fields with at least one violation, sorted.
    pub fn fields(&self) -> BTreeSet<&str> {
        self.0.iter().filter_map(|v| v.field.as_deref()).collect()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = self.0.iter();
        if let Some(first) = lines.next() {
            write!(f, "  - {first}")?;
        }
        for v in lines {
            write!(f, "\n  - {v}")?;
        }
        Ok(())
    }
}

/// A compiled validator for one model's schema.
///
/// Build once, validate many documents. `Send + Sync`.
pub struct DocumentValidator {
    model: String,
    validator: Validator,
}

impl DocumentValidator {
    /// Build a validator from a compiled model schema.
    ///
    /// # Errors
    ///
    /// Returns `DocumentValidationError::InvalidSchema` if the schema
    /// is not a valid Draft 4 schema.
    pub fn new(model: impl Into<String>, schema: &Value) -> Result<Self, DocumentValidationError> {
        let model = model.into();
        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft4);
        let validator = opts
            .build(schema)
            .map_err(|e| DocumentValidationError::InvalidSchema {
                model: model.clone(),
                reason: e.to_string(),
            })?;
        Ok(Self { model, validator })
    }

    /// Validate a document.
    ///
    /// # Errors
    ///
    /// Returns `DocumentValidationError::ValidationFailed` with every
    /// violation if the document is invalid.
    pub fn validate(&self, instance: &Value) -> Result<(), DocumentValidationError> {
        let violations = Violations(
            self.validator
                .iter_errors(instance)
                .map(|e| Violation::from_error(&e))
                .collect(),
        );

        if violations.is_empty() {
            Ok(())
        } else {
            tracing::debug!(
                model = %self.model,
                violations = violations.len(),
                "document rejected"
            );
            Err(DocumentValidationError::ValidationFailed {
                model: self.model.clone(),
                violations,
            })
        }
    }
}

impl fmt::Debug for DocumentValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentValidator")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

/// Validate one document against a compiled model schema.
///
/// # Errors
///
/// See [`DocumentValidator::new`] and [`DocumentValidator::validate`].
pub fn validate_document(
    model: &str,
    schema: &Value,
    instance: &Value,
) -> Result<(), DocumentValidationError> {
    DocumentValidator::new(model, schema)?.validate(instance)
}
