//! # Validator Tree
//!
//! [`Validator`] is the runtime-checkable counterpart of a schema node:
//!
//! - [`Validator::Scalar`] wraps a [`ScalarValidator`].
//! - [`Validator::Object`] maps field names to nested validators.
//! - [`Validator::Array`] validates every element with one validator, plus
//!   optional required and length constraints on the array itself.
//!
//! ## Collecting Violations
//!
//! [`Validator::validate`] walks the whole value and reports every violated
//! constraint rather than stopping at the first. Pass
//! [`ValidateOptions { abort_early: true }`](ValidateOptions) to stop early.
//!
//! Missing objects are validated as `{}`, so the required fields of an
//! absent nested object are still reported. Unknown keys are ignored.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::path::FieldPath;
use crate::scalar::ScalarValidator;
use crate::violation::{Collector, ValidationError, ViolationKind};

/// Options for one validation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Stop at the first violation instead of collecting all of them.
    pub abort_early: bool,
}

/// A compiled validator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Validator {
    Scalar(ScalarValidator),
    Object(ObjectShape),
    Array(ArrayOf),
}

impl Validator {
    /// Validate `value`, collecting every violation.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Invalid` listing each violated constraint.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        self.validate_with(value, ValidateOptions::default())
    }

    /// Validate `value` with explicit options.
    pub fn validate_with(&self, value: &Value, options: ValidateOptions) -> Result<(), ValidationError> {
        let mut out = Collector::new(options.abort_early);
        self.check(Some(value), &FieldPath::root(), &mut out);
        out.finish()
    }

    /// Returns true if `value` passes.
    pub fn is_valid(&self, value: &Value) -> bool {
        self.validate_with(value, ValidateOptions { abort_early: true }).is_ok()
    }

    /// Short name of the validated type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Validator::Scalar(s) => s.base().as_str(),
            Validator::Object(_) => "object",
            Validator::Array(_) => "array",
        }
    }

    pub fn is_required(&self) -> bool {
        match self {
            Validator::Scalar(s) => s.is_required(),
            Validator::Object(o) => o.required,
            Validator::Array(a) => a.required,
        }
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            Validator::Scalar(s) => s.is_nullable(),
            Validator::Object(o) => o.nullable,
            Validator::Array(a) => a.nullable,
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarValidator> {
        match self {
            Validator::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectShape> {
        match self {
            Validator::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayOf> {
        match self {
            Validator::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Nested validator for `name` when this is an object shape.
    pub fn field(&self, name: &str) -> Option<&Validator> {
        self.as_object().and_then(|o| o.field(name))
    }

    fn check(&self, value: Option<&Value>, path: &FieldPath, out: &mut Collector) {
        if out.is_done() {
            return;
        }
        match self {
            Validator::Scalar(s) => s.check(value, path, out),
            Validator::Object(o) => o.check(value, path, out),
            Validator::Array(a) => a.check(value, path, out),
        }
    }
}

impl From<ScalarValidator> for Validator {
    fn from(v: ScalarValidator) -> Self {
        Validator::Scalar(v)
    }
}

impl From<ObjectShape> for Validator {
    fn from(v: ObjectShape) -> Self {
        Validator::Object(v)
    }
}

impl From<ArrayOf> for Validator {
    fn from(v: ArrayOf) -> Self {
        Validator::Array(v)
    }
}

/// Validator for an object with named fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectShape {
    fields: BTreeMap<String, Validator>,
    required: bool,
    nullable: bool,
}

impl ObjectShape {
    /// Shape with the given fields.
    pub fn new(fields: BTreeMap<String, Validator>) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    /// Reject an absent or null object.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Accept `null` in place of the object.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn field(&self, name: &str) -> Option<&Validator> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> &BTreeMap<String, Validator> {
        &self.fields
    }

    /// Field names in sorted order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    fn check(&self, value: Option<&Value>, path: &FieldPath, out: &mut Collector) {
        let empty = Map::new();
        let object = match value {
            None => {
                if self.required {
                    out.push(path, ViolationKind::Required, "is a required field");
                }
                &empty
            }
            Some(Value::Null) => {
                if self.required {
                    out.push(path, ViolationKind::Required, "is a required field");
                } else if !self.nullable {
                    out.push(path, ViolationKind::TypeError, "cannot be null");
                }
                return;
            }
            Some(Value::Object(map)) => map,
            Some(other) => {
                out.push(
                    path,
                    ViolationKind::TypeError,
                    format!("must be a `object` type, but the final value was: `{other}`"),
                );
                return;
            }
        };

        for (name, validator) in &self.fields {
            validator.check(object.get(name), &path.child(name), out);
        }
    }
}

/// Validator for an array whose elements share one validator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayOf {
    element: Box<Validator>,
    required: bool,
    nullable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_items: Option<usize>,
}

impl ArrayOf {
    /// Array of elements checked by `element`.
    pub fn of(element: impl Into<Validator>) -> Self {
        Self {
            element: Box::new(element.into()),
            required: false,
            nullable: false,
            min_items: None,
            max_items: None,
        }
    }

    /// Reject an absent or null array.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Accept `null` in place of the array.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Minimum number of elements.
    pub fn min(mut self, items: usize) -> Self {
        self.min_items = Some(items);
        self
    }

    /// Maximum number of elements.
    pub fn max(mut self, items: usize) -> Self {
        self.max_items = Some(items);
        self
    }

    pub fn element(&self) -> &Validator {
        &self.element
    }

    pub fn min_items(&self) -> Option<usize> {
        self.min_items
    }

    pub fn max_items(&self) -> Option<usize> {
        self.max_items
    }

    fn check(&self, value: Option<&Value>, path: &FieldPath, out: &mut Collector) {
        let items = match value {
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
            Some(Value::Array(items)) => items,
            Some(other) => {
                out.push(
                    path,
                    ViolationKind::TypeError,
                    format!("must be a `array` type, but the final value was: `{other}`"),
                );
                return;
            }
        };

        if let Some(min) = self.min_items {
            if items.len() < min {
                out.push(path, ViolationKind::Min, format!("must have at least {min} items"));
            }
        }
        if let Some(max) = self.max_items {
            if items.len() > max {
                out.push(path, ViolationKind::Max, format!("must have at most {max} items"));
            }
        }

        for (i, item) in items.iter().enumerate() {
            self.element.check(Some(item), &path.index(i), out);
        }
    }
}
