//! # Compile Errors
//!
//! [`compile`](crate::compile) never fails. These errors come only from the
//! opt-in surfaces: parsing a raw JSON value and strict mode.

use thiserror::Error;

use crate::compiler::CompileWarning;

/// Error from [`compile_strict`](crate::compile_strict) or
/// [`compile_value`](crate::compile_value).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// The input is not a schema of the supported dialect.
    #[error("invalid schema: {reason}")]
    InvalidSchema {
        /// Parser or meta-schema message.
        reason: String,
    },

    /// Strict mode and the schema needed at least one permissive fallback.
    #[error(
        "schema compiled with {count} degradation(s) in strict mode:\n{rendered}",
        count = .warnings.len(),
        rendered = render(.warnings)
    )]
    Degraded {
        /// Every fallback taken.
        warnings: Vec<CompileWarning>,
    },
}

fn render(warnings: &[CompileWarning]) -> String {
    warnings
        .iter()
        .map(|w| format!("  {w}"))
        .collect::<Vec<_>>()
        .join("\n")
}
