//! # Required-Path Resolver
//!
//! A node's `required` list names properties of that node only. The
//! compiler carries the path of every properties map on its worklist, so a
//! required name resolves directly to `prefix.name` and is recorded in the
//! [`RequiredSet`] before any field of the map is compiled.
//!
//! The set holds paths, so membership stays valid however the fields are
//! compiled afterwards.

use std::collections::{BTreeMap, BTreeSet};

use shape_core::FieldPath;

/// Paths of every field that must be rendered as required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredSet(BTreeSet<FieldPath>);

impl RequiredSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: FieldPath) -> bool {
        self.0.insert(path)
    }

    pub fn contains(&self, path: &FieldPath) -> bool {
        self.0.contains(path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldPath> {
        self.0.iter()
    }
}

impl Extend<FieldPath> for RequiredSet {
    fn extend<I: IntoIterator<Item = FieldPath>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

/// Outcome of resolving one `required` list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Paths of required names present in the map.
    pub resolved: Vec<FieldPath>,
    /// Required names with no matching property.
    pub unresolved: Vec<String>,
}

/// Resolve the `required` names of the map at `prefix` against its (already
/// merged and pruned) `fields`.
pub fn resolve<V>(prefix: &FieldPath, fields: &BTreeMap<String, V>, required: &[String]) -> Resolution {
    let mut resolution = Resolution::default();
    for name in required {
        if fields.contains_key(name) {
            resolution.resolved.push(prefix.child(name));
        } else {
            resolution.unresolved.push(name.clone());
        }
    }
    resolution
}
