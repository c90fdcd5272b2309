//! # Compile Subcommand
//!
//! Compiles one schema and prints the validator tree as pretty JSON on
//! stdout. Warnings go to stderr; in strict mode any warning fails the run.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use shape_schema::compile_value;

use crate::document::load_document;

/// Arguments for the `shapec compile` subcommand.
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Schema file (JSON, or YAML by `.yaml`/`.yml` extension).
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Fail on unknown types, missing `items`/`properties`, or unresolved
    /// required names, and check the schema against the JSON Schema
    /// meta-schema.
    #[arg(long)]
    pub strict: bool,
}

/// Execute the compile subcommand.
///
/// Returns exit code: 0 on success, 1 if the schema is rejected.
pub fn run_compile(args: &CompileArgs, config: Option<&Path>) -> Result<u8> {
    let mut options = crate::build_options(config)?;
    options.strict |= args.strict;

    let schema = load_document(&args.schema)
        .with_context(|| format!("failed to load schema {}", args.schema.display()))?;

    match compile_value(&schema, &options) {
        Ok(compilation) => {
            let tree = serde_json::to_string_pretty(&compilation.validator)
                .context("failed to serialize compiled validator")?;
            println!("{tree}");
            for warning in &compilation.warnings {
                eprintln!("WARN: {warning}");
            }
            Ok(0)
        }
        Err(e) => {
            eprintln!("FAIL: {}: {e}", args.schema.display());
            Ok(1)
        }
    }
}
