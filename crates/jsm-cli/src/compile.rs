//! # Compile Subcommand
//!
//! Compiles one model of a manifest into its JSON Schema document.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

/// Arguments for the compile subcommand.
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Model manifest (YAML, or JSON with a `.json` extension).
    pub manifest: PathBuf,

    /// Model to compile.
    #[arg(long, short)]
    pub model: String,

    /// Print the schema on one line.
    #[arg(long)]
    pub compact: bool,

    /// Write the schema to a file instead of stdout.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Compile the requested model and render it as JSON text.
pub fn render_schema(args: &CompileArgs) -> anyhow::Result<String> {
    let catalog = crate::load_catalog(&args.manifest)?;
    let schema = catalog
        .compile(&args.model)
        .with_context(|| format!("failed to compile model '{}'", args.model))?;
    let rendered = if args.compact {
        serde_json::to_string(&schema)?
    } else {
        serde_json::to_string_pretty(&schema)?
    };
    Ok(rendered)
}

/// Run the compile subcommand.
pub fn run_compile(args: &CompileArgs) -> anyhow::Result<()> {
    let rendered = render_schema(args)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, format!("{rendered}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(model = %args.model, path = %path.display(), "schema written");
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
