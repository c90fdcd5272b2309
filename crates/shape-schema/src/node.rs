//! # Schema Nodes
//!
//! [`SchemaNode`] is the declarative input of the compiler: a narrow,
//! JSON-Schema-like dialect.
//!
//! ## Recognised Keywords
//!
//! `type`, `properties`, `items`, `required`, `allOf`, `enum`, `minimum`,
//! `maximum`, `minLength`, `maxLength`, `minItems`, `maxItems`.
//!
//! Every other keyword is kept verbatim in [`SchemaNode::extra`] so merging
//! and re-serializing a node loses nothing. The compiler ignores them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON Schema types that are understood even when no validator is
/// registered for them.
pub const STANDARD_TYPES: &[&str] = &["string", "number", "integer", "boolean", "null", "object", "array"];

/// The `type` keyword: a single name or a union such as `["string", "null"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeDecl {
    One(String),
    Union(Vec<String>),
}

impl TypeDecl {
    /// The type the node is compiled as: the name itself, or the first
    /// non-`null` member of a union.
    pub fn primary(&self) -> Option<&str> {
        match self {
            TypeDecl::One(name) => Some(name),
            TypeDecl::Union(names) => names
                .iter()
                .map(String::as_str)
                .find(|n| *n != "null")
                .or_else(|| names.first().map(String::as_str)),
        }
    }
}

/// One declarative schema unit: a scalar type, an object with named
/// properties, or an array of a single item type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeDecl>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, SchemaNode>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,

    /// Names of required properties, scoped to this node's own `properties`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<SchemaNode>>,

    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,

    /// Keywords outside the supported dialect.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl SchemaNode {
    /// Parse a node from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns the serde error when a recognised keyword has the wrong shape
    /// (e.g. `properties` that is not an object).
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Node of the given type with no other keywords.
    pub fn of_type(name: &str) -> Self {
        Self {
            schema_type: Some(TypeDecl::One(name.to_string())),
            ..Self::default()
        }
    }

    /// The type this node compiles as.
    pub fn type_name(&self) -> Option<&str> {
        self.schema_type.as_ref().and_then(TypeDecl::primary)
    }

    pub fn has_all_of(&self) -> bool {
        self.all_of.is_some()
    }

    /// Lower bound for a leaf. The keyword matching the declared type wins:
    /// `minLength` for strings, `minItems` for arrays, `minimum` otherwise.
    /// The other keywords are fallbacks in that order.
    pub fn lower_bound(&self) -> Option<f64> {
        let length = self.min_length.map(|n| n as f64);
        let items = self.min_items.map(|n| n as f64);
        match self.type_name() {
            Some("string") => length.or(self.minimum).or(items),
            Some("array") => items.or(self.minimum).or(length),
            _ => self.minimum.or(length).or(items),
        }
    }

    /// Upper bound for a leaf, mirroring [`lower_bound`](Self::lower_bound).
    pub fn upper_bound(&self) -> Option<f64> {
        let length = self.max_length.map(|n| n as f64);
        let items = self.max_items.map(|n| n as f64);
        match self.type_name() {
            Some("string") => length.or(self.maximum).or(items),
            Some("array") => items.or(self.maximum).or(length),
            _ => self.maximum.or(length).or(items),
        }
    }
}
