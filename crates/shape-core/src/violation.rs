//! # Violations
//!
//! Validate-time error reporting. A failed validation yields a flat,
//! order-independent list of [`Violation`]s, one per violated constraint per
//! field, each carrying the [`FieldPath`] of the offending value.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::path::FieldPath;

/// Which constraint a value violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ViolationKind {
    /// Value absent, null, or an empty string where a value is required.
    Required,
    /// Below the lower bound (length for strings and arrays).
    Min,
    /// Above the upper bound (length for strings and arrays).
    Max,
    /// Not one of the permitted literals.
    OneOf,
    /// A number with a fractional part where an integer is expected.
    Integer,
    /// A string not matching the required pattern.
    Matches,
    /// Value cannot be read as the validator's base type.
    TypeError,
}

impl ViolationKind {
    /// Stable wire name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Min => "min",
            Self::Max => "max",
            Self::OneOf => "oneOf",
            Self::Integer => "integer",
            Self::Matches => "matches",
            Self::TypeError => "typeError",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    /// Location of the offending value.
    pub path: FieldPath,
    /// The violated constraint.
    pub kind: ViolationKind,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "  (root): {} ({})", self.kind, self.message)
        } else {
            write!(f, "  {}: {} ({})", self.path, self.kind, self.message)
        }
    }
}

/// Collection of violations from one validation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Violations {
    violations: Vec<Violation>,
}

impl Violations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }

    /// Rendered paths of all violations, in report order.
    pub fn paths(&self) -> Vec<String> {
        self.violations.iter().map(|v| v.path.to_string()).collect()
    }

    /// All violations whose rendered path equals `path`.
    pub fn at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations
            .iter()
            .filter(move |v| v.path.to_string() == path)
    }

    /// Kind of the first violation reported at `path`.
    pub fn kind_at(&self, path: &str) -> Option<ViolationKind> {
        self.at(path).next().map(|v| v.kind)
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Error returned when a value fails validation.
#[derive(Error, Debug, Clone)]
pub enum ValidationError {
    /// The value violated one or more constraints.
    #[error("validation failed with {count} violation(s):\n{0}", count = .0.len())]
    Invalid(Violations),
}

impl ValidationError {
    /// The collected violations.
    pub fn violations(&self) -> &Violations {
        match self {
            Self::Invalid(v) => v,
        }
    }

    /// Consumes the error and returns the collected violations.
    pub fn into_violations(self) -> Violations {
        match self {
            Self::Invalid(v) => v,
        }
    }
}

/// Accumulates violations during one validation walk.
#[derive(Debug, Default)]
pub(crate) struct Collector {
    violations: Vec<Violation>,
    abort_early: bool,
}

impl Collector {
    pub(crate) fn new(abort_early: bool) -> Self {
        Self {
            violations: Vec::new(),
            abort_early,
        }
    }

    /// True once nothing more should be checked.
    pub(crate) fn is_done(&self) -> bool {
        self.abort_early && !self.violations.is_empty()
    }

    pub(crate) fn push(&mut self, path: &FieldPath, kind: ViolationKind, message: impl Into<String>) {
        if self.is_done() {
            return;
        }
        self.violations.push(Violation {
            path: path.clone(),
            kind,
            message: message.into(),
        });
    }

    pub(crate) fn finish(self) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Invalid(Violations {
                violations: self.violations,
            }))
        }
    }
}
