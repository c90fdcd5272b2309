//! # Validate Subcommand
//!
//! Compiles a schema once and validates every given document against it.
//! Each failing document is listed with one line per violation:
//!
//! ```text
//! FAIL: orders/17.json
//!   stops: min (must have at least 2 items)
//!   company.carrier: required (is a required field)
//! ```
//!
//! A schema that does not compile is reported on stderr, as `compile` does.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use shape_core::{ValidateOptions, Validator, Violations};
use shape_schema::compile_value;

use crate::document::load_document;

/// Arguments for the `shapec validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema file (JSON, or YAML by `.yaml`/`.yml` extension).
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Documents to validate.
    #[arg(value_name = "DOCUMENT", required = true)]
    pub documents: Vec<PathBuf>,

    /// Report only the first violation of each document.
    #[arg(long)]
    pub abort_early: bool,
}

/// Outcome of validating a batch of documents.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub total: usize,
    pub passed: usize,
    pub failures: Vec<(PathBuf, Violations)>,
}

impl ValidationReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 if every document is valid, 1 if any is invalid or
/// the schema is rejected.
pub fn run_validate(args: &ValidateArgs, config: Option<&Path>) -> Result<u8> {
    let options = crate::build_options(config)?;
    let schema = load_document(&args.schema)
        .with_context(|| format!("failed to load schema {}", args.schema.display()))?;

    let validator = match compile_value(&schema, &options) {
        Ok(compilation) => compilation.validator,
        Err(e) => {
            eprintln!("FAIL: {}: {e}", args.schema.display());
            return Ok(1);
        }
    };

    let report = validate_documents(
        &validator,
        &args.documents,
        ValidateOptions {
            abort_early: args.abort_early,
        },
    )?;

    for (path, violations) in &report.failures {
        println!("FAIL: {}", path.display());
        for violation in violations.violations() {
            println!("{violation}");
        }
    }
    println!("Documents: {}/{} passed", report.passed, report.total);

    Ok(if report.failed() > 0 { 1 } else { 0 })
}

/// Validate each file in `documents` against `validator`.
///
/// # Errors
///
/// Fails on the first document that cannot be read or parsed.
pub fn validate_documents(
    validator: &Validator,
    documents: &[PathBuf],
    options: ValidateOptions,
) -> Result<ValidationReport> {
    let mut report = ValidationReport::default();
    for path in documents {
        let document = load_document(path)
            .with_context(|| format!("failed to load document {}", path.display()))?;
        report.total += 1;
        match validator.validate_with(&document, options) {
            Ok(()) => {
                tracing::debug!(document = %path.display(), "document valid");
                report.passed += 1;
            }
            Err(e) => {
                tracing::info!(
                    document = %path.display(),
                    violations = e.violations().len(),
                    "document invalid"
                );
                report.failures.push((path.clone(), e.into_violations()));
            }
        }
    }
    Ok(report)
}
