//! # Scalar Validators
//!
//! A [`ScalarValidator`] checks a single leaf value: a base type
//! ([`BaseType`]) plus a list of independent [`Constraint`]s, a nullability
//! flag, and a required flag.
//!
//! ## Value Semantics
//!
//! Builders take `self` by value and return the modified validator, so a
//! validator kept in a registry is never changed by constraints applied to a
//! copy of it.
//!
//! ## Casting
//!
//! Values are cast to the base type before constraints run:
//!
//! - `number` accepts JSON numbers and numeric strings (`"10"`, `" 2.5 "`).
//! - `string` accepts strings, numbers, and booleans (rendered as text).
//! - `boolean` accepts booleans and the strings `"true"` / `"false"`.
//! - `mixed` accepts anything.
//!
//! Absent and null values skip every constraint except `required`.

use std::borrow::Cow;
use std::fmt;
use std::mem;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::path::FieldPath;
use crate::violation::{Collector, ViolationKind};

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$";

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("EMAIL_PATTERN is a valid regex"));

/// The type a scalar value is cast to before constraints are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseType {
    /// Text.
    String,
    /// Any finite number. Integer-ness is a separate constraint.
    Number,
    /// `true` or `false`.
    Boolean,
    /// Any value at all.
    Mixed,
}

impl BaseType {
    /// Name of the type as it appears in type-mismatch messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Mixed => "mixed",
        }
    }

    fn cast<'a>(&self, value: &'a Value) -> Option<Cast<'a>> {
        match (self, value) {
            (Self::Mixed, v) => Some(Cast::Other(v)),
            (Self::String, Value::String(s)) => Some(Cast::Text(Cow::Borrowed(s))),
            (Self::String, Value::Number(n)) => Some(Cast::Text(Cow::Owned(n.to_string()))),
            (Self::String, Value::Bool(b)) => Some(Cast::Text(Cow::Owned(b.to_string()))),
            (Self::Number, Value::Number(n)) => n.as_f64().map(Cast::Number),
            (Self::Number, Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Cast::Number),
            (Self::Boolean, Value::Bool(b)) => Some(Cast::Boolean(*b)),
            (Self::Boolean, Value::String(s)) => match s.as_str() {
                "true" => Some(Cast::Boolean(true)),
                "false" => Some(Cast::Boolean(false)),
                _ => None,
            },
            _ => None,
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value after casting to its base type.
enum Cast<'a> {
    Text(Cow<'a, str>),
    Number(f64),
    Boolean(bool),
    Other(&'a Value),
}

impl Cast<'_> {
    /// Length for text and arrays, the value itself for numbers.
    fn measure(&self) -> Option<f64> {
        match self {
            Cast::Text(s) => Some(s.chars().count() as f64),
            Cast::Number(n) => Some(*n),
            Cast::Other(Value::Array(items)) => Some(items.len() as f64),
            Cast::Other(Value::String(s)) => Some(s.chars().count() as f64),
            Cast::Other(Value::Number(n)) => n.as_f64(),
            _ => None,
        }
    }

    fn matches_literal(&self, literal: &Value) -> bool {
        match (self, literal) {
            (Cast::Text(s), Value::String(l)) => s.as_ref() == l,
            (Cast::Number(n), Value::Number(l)) => l.as_f64() == Some(*n),
            (Cast::Number(n), Value::String(l)) => l.trim().parse::<f64>().ok() == Some(*n),
            (Cast::Boolean(b), Value::Bool(l)) => b == l,
            (Cast::Other(v), l) => *v == l,
            _ => false,
        }
    }

    fn is_empty_text(&self) -> bool {
        matches!(self, Cast::Text(s) if s.is_empty())
    }
}

/// A compiled regular expression compared and serialized by its source.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    /// Compile `source` into a pattern.
    ///
    /// # Errors
    ///
    /// Returns the regex compile error for an invalid expression.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Self)
    }

    /// Pattern accepting e-mail addresses.
    pub fn email() -> Self {
        Self(EMAIL.clone())
    }

    /// Source text of the expression.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns true if `text` matches.
    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// An independent check layered on a base type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Constraint {
    /// Lower bound: length for text, value for numbers.
    Min(f64),
    /// Upper bound: length for text, value for numbers.
    Max(f64),
    /// Value must equal one of these literals.
    OneOf(Vec<Value>),
    /// Number must have no fractional part.
    Integer,
    /// Text must match the pattern.
    Matches(Pattern),
}

impl Constraint {
    fn check(&self, cast: &Cast<'_>, path: &FieldPath, out: &mut Collector) {
        match self {
            Constraint::Min(bound) => {
                if let Some(measure) = cast.measure() {
                    if measure < *bound {
                        out.push(path, ViolationKind::Min, min_message(cast, *bound));
                    }
                }
            }
            Constraint::Max(bound) => {
                if let Some(measure) = cast.measure() {
                    if measure > *bound {
                        out.push(path, ViolationKind::Max, max_message(cast, *bound));
                    }
                }
            }
            Constraint::OneOf(literals) => {
                if !literals.iter().any(|l| cast.matches_literal(l)) {
                    let allowed: Vec<String> = literals.iter().map(Value::to_string).collect();
                    out.push(
                        path,
                        ViolationKind::OneOf,
                        format!("must be one of the following values: {}", allowed.join(", ")),
                    );
                }
            }
            Constraint::Integer => {
                if let Cast::Number(n) = cast {
                    if n.fract() != 0.0 {
                        out.push(path, ViolationKind::Integer, "must be an integer");
                    }
                }
            }
            Constraint::Matches(pattern) => {
                if let Cast::Text(text) = cast {
                    if !pattern.is_match(text) {
                        out.push(
                            path,
                            ViolationKind::Matches,
                            format!("must match the following: \"{}\"", pattern.as_str()),
                        );
                    }
                }
            }
        }
    }
}

fn min_message(cast: &Cast<'_>, bound: f64) -> String {
    match cast {
        Cast::Text(_) => format!("must be at least {bound} characters"),
        Cast::Other(Value::Array(_)) => format!("must have at least {bound} items"),
        _ => format!("must be greater than or equal to {bound}"),
    }
}

fn max_message(cast: &Cast<'_>, bound: f64) -> String {
    match cast {
        Cast::Text(_) => format!("must be at most {bound} characters"),
        Cast::Other(Value::Array(_)) => format!("must have at most {bound} items"),
        _ => format!("must be less than or equal to {bound}"),
    }
}

/// Validator for a single leaf value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScalarValidator {
    base: BaseType,
    nullable: bool,
    required: bool,
    constraints: Vec<Constraint>,
}

impl ScalarValidator {
    fn of(base: BaseType) -> Self {
        Self {
            base,
            nullable: false,
            required: false,
            constraints: Vec::new(),
        }
    }

    /// Text validator.
    pub fn string() -> Self {
        Self::of(BaseType::String)
    }

    /// Number validator.
    pub fn number() -> Self {
        Self::of(BaseType::Number)
    }

    /// Boolean validator.
    pub fn boolean() -> Self {
        Self::of(BaseType::Boolean)
    }

    /// Validator accepting any value.
    pub fn mixed() -> Self {
        Self::of(BaseType::Mixed)
    }

    /// Accept `null`.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Reject absent, null, and empty-string values.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Lower bound. Replaces any previous lower bound.
    pub fn min(self, bound: f64) -> Self {
        self.with(Constraint::Min(bound))
    }

    /// Upper bound. Replaces any previous upper bound.
    pub fn max(self, bound: f64) -> Self {
        self.with(Constraint::Max(bound))
    }

    /// Restrict to the given literals. Replaces any previous restriction.
    pub fn one_of(self, literals: impl IntoIterator<Item = Value>) -> Self {
        self.with(Constraint::OneOf(literals.into_iter().collect()))
    }

    /// Require whole numbers.
    pub fn integer(self) -> Self {
        self.with(Constraint::Integer)
    }

    /// Require text matching `pattern`.
    pub fn matches(mut self, pattern: Pattern) -> Self {
        self.constraints.push(Constraint::Matches(pattern));
        self
    }

    /// Require an e-mail address.
    pub fn email(self) -> Self {
        self.matches(Pattern::email())
    }

    fn with(mut self, constraint: Constraint) -> Self {
        let kind = mem::discriminant(&constraint);
        self.constraints.retain(|c| mem::discriminant(c) != kind);
        self.constraints.push(constraint);
        self
    }

    pub fn base(&self) -> BaseType {
        self.base
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn is_integer(&self) -> bool {
        self.constraints.contains(&Constraint::Integer)
    }

    /// The active lower bound, if any.
    pub fn lower_bound(&self) -> Option<f64> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::Min(b) => Some(*b),
            _ => None,
        })
    }

    /// The active upper bound, if any.
    pub fn upper_bound(&self) -> Option<f64> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::Max(b) => Some(*b),
            _ => None,
        })
    }

    /// The permitted literals, if restricted.
    pub fn allowed_values(&self) -> Option<&[Value]> {
        self.constraints.iter().find_map(|c| match c {
            Constraint::OneOf(values) => Some(values.as_slice()),
            _ => None,
        })
    }

    pub(crate) fn check(&self, value: Option<&Value>, path: &FieldPath, out: &mut Collector) {
        let value = match value {
            None => {
                if self.required {
                    out.push(path, ViolationKind::Required, "is a required field");
                }
                return;
            }
            Some(Value::Null) => {
                if self.required {
                    out.push(path, ViolationKind::Required, "is a required field");
                } else if !self.nullable {
                    out.push(path, ViolationKind::TypeError, "cannot be null");
                }
                return;
            }
            Some(v) => v,
        };

        let Some(cast) = self.base.cast(value) else {
            out.push(
                path,
                ViolationKind::TypeError,
                format!("must be a `{}` type, but the final value was: `{value}`", self.base),
            );
            return;
        };

        if self.required && cast.is_empty_text() {
            out.push(path, ViolationKind::Required, "is a required field");
        }

        for constraint in &self.constraints {
            constraint.check(&cast, path, out);
        }
    }
}
