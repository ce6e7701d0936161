//! # List Subcommand
//!
//! Lists the models a manifest declares, in manifest order.

use std::fmt;
use std::path::PathBuf;

use clap::Args;

/// Arguments for the list subcommand.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Model manifest (YAML, or JSON with a `.json` extension).
    pub manifest: PathBuf,
}

/// One line of `jsm list` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSummary {
    /// Model name.
    pub name: String,
    /// Field names, inherited fields first.
    pub fields: Vec<String>,
    /// Names of required fields.
    pub required: Vec<String>,
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} fields", self.name, self.fields.len())?;
        if !self.required.is_empty() {
            write!(f, ", required: {}", self.required.join(", "))?;
        }
        write!(f, ")")
    }
}

/// Summarize every model of the manifest.
pub fn list_models(args: &ListArgs) -> anyhow::Result<Vec<ModelSummary>> {
    let catalog = crate::load_catalog(&args.manifest)?;
    Ok(catalog
        .iter()
        .map(|registry| ModelSummary {
            name: registry.name().to_string(),
            fields: registry.field_names().into_iter().map(String::from).collect(),
            required: registry
                .required_names()
                .into_iter()
                .map(String::from)
                .collect(),
        })
        .collect())
}

/// Run the list subcommand.
pub fn run_list(args: &ListArgs) -> anyhow::Result<()> {
    for summary in list_models(args)? {
        println!("{summary}");
    }
    Ok(())
}
