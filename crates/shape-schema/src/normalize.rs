//! # Schema Normalizer
//!
//! Eliminates composition before a node is interpreted.
//!
//! ## Merge Rules
//!
//! A node carrying `allOf` is replaced by a left-to-right fold of its
//! entries, with the node's own keywords folded last as the most specific
//! layer:
//!
//! - Scalar keywords (`type`, bounds) of a later layer override earlier ones
//!   when present.
//! - `properties` and `items` merge key by key, recursively.
//! - List keywords (`required`, `enum`) concatenate, so two layers requiring
//!   disjoint fields are both honoured.
//! - Unrecognised keywords merge like JSON: objects recursively, arrays
//!   concatenated, anything else overridden.
//!
//! Normalization is shallow in one sense: `allOf` nested inside merged
//! `properties` is left in place. The compiler normalizes each node lazily
//! when it reaches it, so pruning and required-path resolution always see
//! merged data.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::node::SchemaNode;

/// Fold `allOf` into a single node. A node without `allOf` is returned as is.
pub fn normalize(mut node: SchemaNode) -> SchemaNode {
    let Some(all_of) = node.all_of.take() else {
        return node;
    };

    let mut merged = SchemaNode::default();
    for entry in all_of {
        merge_into(&mut merged, normalize(entry));
    }
    merge_into(&mut merged, node);
    merged
}

/// Remove blacklisted names from one properties map.
pub fn prune(
    mut properties: BTreeMap<String, SchemaNode>,
    blacklist: &BTreeSet<String>,
) -> BTreeMap<String, SchemaNode> {
    if !blacklist.is_empty() {
        properties.retain(|name, _| !blacklist.contains(name));
    }
    properties
}

/// Merge `layer` on top of `target`.
pub fn merge_into(target: &mut SchemaNode, layer: SchemaNode) {
    override_with(&mut target.schema_type, layer.schema_type);

    if let Some(props) = layer.properties {
        let existing = target.properties.get_or_insert_with(BTreeMap::new);
        for (name, node) in props {
            match existing.entry(name) {
                Entry::Occupied(mut slot) => merge_into(slot.get_mut(), node),
                Entry::Vacant(slot) => {
                    slot.insert(node);
                }
            }
        }
    }

    if let Some(items) = layer.items {
        match target.items.as_mut() {
            Some(existing) => merge_into(existing, *items),
            None => target.items = Some(items),
        }
    }

    concat(&mut target.required, layer.required);
    concat(&mut target.all_of, layer.all_of);
    concat(&mut target.enum_values, layer.enum_values);

    override_with(&mut target.minimum, layer.minimum);
    override_with(&mut target.maximum, layer.maximum);
    override_with(&mut target.min_length, layer.min_length);
    override_with(&mut target.max_length, layer.max_length);
    override_with(&mut target.min_items, layer.min_items);
    override_with(&mut target.max_items, layer.max_items);

    for (key, value) in layer.extra {
        match target.extra.entry(key) {
            Entry::Occupied(mut slot) => merge_value(slot.get_mut(), value),
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
        }
    }
}

fn override_with<T>(target: &mut Option<T>, layer: Option<T>) {
    if layer.is_some() {
        *target = layer;
    }
}

fn concat<T>(target: &mut Option<Vec<T>>, layer: Option<Vec<T>>) {
    if let Some(more) = layer {
        target.get_or_insert_with(Vec::new).extend(more);
    }
}

fn merge_value(target: &mut Value, layer: Value) {
    match (target, layer) {
        (Value::Object(existing), Value::Object(more)) => {
            for (key, value) in more {
                match existing.get_mut(&key) {
                    Some(slot) => merge_value(slot, value),
                    None => {
                        existing.insert(key, value);
                    }
                }
            }
        }
        (Value::Array(existing), Value::Array(more)) => existing.extend(more),
        // null layers leave the target untouched
        (_, Value::Null) => {}
        (target, layer) => *target = layer,
    }
}
