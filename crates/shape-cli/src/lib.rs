//! # shape-cli — `shapec` Command-Line Tool
//!
//! Compiles JSON/YAML schemas into validator trees and validates documents
//! against them.
//!
//! ## Subcommands
//!
//! - `shapec compile` — print the compiled validator tree as JSON.
//! - `shapec validate` — validate documents, one report line per violation.
//!
//! ```bash
//! shapec compile shipment.schema.json --config shapec.yaml --strict
//! shapec validate shipment.schema.json orders/*.json --abort-early
//! ```
//!
//! ## Exit Codes
//!
//! `0` success, `1` invalid schema or document, `2` operational error
//! (unreadable file, bad configuration).

pub mod compile;
pub mod config;
pub mod document;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use shape_schema::BuildOptions;

use crate::config::CompilerConfig;

/// Options from `--config`, or the defaults when none is given.
pub fn build_options(config: Option<&Path>) -> Result<BuildOptions> {
    let Some(path) = config else {
        return Ok(BuildOptions::default());
    };
    let options = CompilerConfig::load(path)
        .and_then(CompilerConfig::into_build_options)
        .with_context(|| format!("failed to load configuration {}", path.display()))?;
    tracing::info!(config = %path.display(), "loaded compiler configuration");
    Ok(options)
}
