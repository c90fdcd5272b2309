//! # Type Registry
//!
//! Maps schema type names to base scalar validators. Entries are prototypes:
//! [`TypeRegistry::create`] hands out a fresh clone, so constraints applied
//! to one field never leak into another.

use std::collections::BTreeMap;

use shape_core::ScalarValidator;

/// Schema type name → base validator.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRegistry {
    types: BTreeMap<String, ScalarValidator>,
}

impl Default for TypeRegistry {
    /// `string`, `number`, and `integer`, all nullable.
    fn default() -> Self {
        Self::empty()
            .with("string", ScalarValidator::string().nullable())
            .with("number", ScalarValidator::number().nullable())
            .with("integer", ScalarValidator::number().integer().nullable())
    }
}

impl TypeRegistry {
    /// Registry without any types.
    pub fn empty() -> Self {
        Self {
            types: BTreeMap::new(),
        }
    }

    /// Add or replace the validator for `name`, returning the previous one.
    pub fn register(&mut self, name: impl Into<String>, base: ScalarValidator) -> Option<ScalarValidator> {
        self.types.insert(name.into(), base)
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, name: impl Into<String>, base: ScalarValidator) -> Self {
        self.register(name, base);
        self
    }

    /// Fresh base validator for `name`.
    pub fn create(&self, name: &str) -> Option<ScalarValidator> {
        self.types.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}
