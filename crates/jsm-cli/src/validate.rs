//! # Validate Subcommand
//!
//! Validates a JSON or YAML document against one model of a manifest.
//! Violations are printed one per line; any violation makes the process
//! exit non-zero.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use jsm_schema::{DocumentValidationError, DocumentValidator, Violations};
use serde_json::Value;

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Model manifest (YAML, or JSON with a `.json` extension).
    pub manifest: PathBuf,

    /// Model to validate against.
    #[arg(long, short)]
    pub model: String,

    /// Document to validate (YAML, or JSON with a `.json` extension).
    pub document: PathBuf,
}

/// Read a document; `.json` files are parsed as JSON, everything else as YAML.
fn read_document(path: &Path) -> anyhow::Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read document {}", path.display()))?;
    let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
    let document = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON in {}", path.display()))?
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("invalid YAML in {}", path.display()))?
    };
    Ok(document)
}

/// Validate the document. Returns the violations, if any.
///
/// Failures to load the manifest, compile the model, or read the document
/// are errors; a document that does not conform is not.
pub fn check_document(args: &ValidateArgs) -> anyhow::Result<Option<Violations>> {
    let catalog = crate::load_catalog(&args.manifest)?;
    let schema = catalog
        .compile(&args.model)
        .with_context(|| format!("failed to compile model '{}'", args.model))?;
    let validator = DocumentValidator::new(args.model.as_str(), &schema)?;
    let document = read_document(&args.document)?;

    match validator.validate(&document) {
        Ok(()) => Ok(None),
        Err(DocumentValidationError::ValidationFailed { violations, .. }) => Ok(Some(violations)),
        Err(other) => Err(other.into()),
    }
}

/// Run the validate subcommand. Returns `true` if the document is valid.
pub fn run_validate(args: &ValidateArgs) -> anyhow::Result<bool> {
    match check_document(args)? {
        None => {
            println!("{}: valid {}", args.document.display(), args.model);
            Ok(true)
        }
        Some(violations) => {
            println!(
                "{}: {} violation(s) against {}",
                args.document.display(),
                violations.len(),
                args.model
            );
            println!("{violations}");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> PathBuf {
        let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        dir.pop(); // crates/
        dir.pop(); // repo root
        dir.join("fixtures").join("people.yaml")
    }

    fn args(document: PathBuf) -> ValidateArgs {
        ValidateArgs {
            manifest: people(),
            model: "Car".to_string(),
            document,
        }
    }

    #[test]
    fn test_valid_json_document() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("car.json");
        std::fs::write(&doc, r#"{"brand": "Dodge", "registration": "TX 1"}"#).unwrap();
        assert!(check_document(&args(doc.clone())).unwrap().is_none());
        assert!(run_validate(&args(doc)).unwrap());
    }

    #[test]
    fn test_invalid_yaml_document() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("car.yaml");
        std::fs::write(&doc, "brand: 7\n").unwrap();
        let violations = check_document(&args(doc.clone())).unwrap().unwrap();
        // Wrong type for `brand`, missing `registration`.
        assert_eq!(violations.len(), 2);
        assert_eq!(
            violations.fields().into_iter().collect::<Vec<_>>(),
            ["brand", "registration"]
        );
        assert!(!run_validate(&args(doc)).unwrap());
    }

    #[test]
    fn test_unreadable_document_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = check_document(&args(dir.path().join("absent.json"))).unwrap_err();
        assert!(err.to_string().contains("failed to read document"));
    }
}
