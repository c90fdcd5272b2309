//! # Build Options
//!
//! Configuration of one compilation. Blacklist and custom overrides are
//! flat: keyed by bare field name and applied at every depth.

use std::collections::{BTreeMap, BTreeSet};

use shape_core::{ScalarValidator, Validator};

use crate::registry::TypeRegistry;

/// Options for [`compile`](crate::compile) and friends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildOptions {
    /// Base validator per schema type name.
    pub validation_types: TypeRegistry,
    /// Validators used verbatim for fields with these names, at any depth.
    pub custom_validation_fields: BTreeMap<String, Validator>,
    /// Field names removed from every properties map.
    pub black_list: Vec<String>,
    /// Treat compile warnings as errors in [`compile_value`](crate::compile_value).
    pub strict: bool,
}

impl BuildOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace the base validator for a schema type.
    pub fn with_type(mut self, name: impl Into<String>, base: ScalarValidator) -> Self {
        self.validation_types.register(name, base);
        self
    }

    /// Replace compilation of every field called `name` with `validator`.
    pub fn with_custom_field(mut self, name: impl Into<String>, validator: impl Into<Validator>) -> Self {
        self.custom_validation_fields.insert(name.into(), validator.into());
        self
    }

    /// Append names to the blacklist.
    pub fn with_black_list<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.black_list.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub(crate) fn blacklist_set(&self) -> BTreeSet<String> {
        self.black_list.iter().cloned().collect()
    }

    pub(crate) fn custom(&self, name: &str) -> Option<&Validator> {
        self.custom_validation_fields.get(name)
    }
}
