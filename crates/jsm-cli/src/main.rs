//! # jsm CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use std::process::ExitCode;

use clap::Parser;

/// jsm — JSON Schema from declared data models.
///
/// Compiles manifest-declared models into JSON Schema documents and
/// validates documents against them.
#[derive(Parser, Debug)]
#[command(name = "jsm", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print a model's JSON Schema.
    Compile(jsm_cli::compile::CompileArgs),
    /// Validate a document against a model.
    Validate(jsm_cli::validate::ValidateArgs),
    /// List the models a manifest declares.
    List(jsm_cli::list::ListArgs),
}

fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compile(args) => jsm_cli::compile::run_compile(&args)?,
        Commands::Validate(args) => {
            if !jsm_cli::validate::run_validate(&args)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::List(args) => jsm_cli::list::run_list(&args)?,
    }

    Ok(ExitCode::SUCCESS)
}
