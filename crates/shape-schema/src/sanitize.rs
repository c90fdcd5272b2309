//! # Raw Schema Sanitizing
//!
//! [`compile_value`](crate::compile_value) reads raw JSON. Before the value
//! becomes [`SchemaNode`](crate::SchemaNode)s, two shapes that JSON Schema
//! allows but the typed model does not are rewritten:
//!
//! - A subschema (root, `properties` value, `items`, `allOf` entry) that is
//!   not an object, such as the boolean schema `true`, becomes `{}` and so
//!   compiles as a permissive leaf.
//! - `minLength`, `maxLength`, `minItems`, `maxItems` that are not
//!   non-negative integers are rounded inwards (`min*` up, `max*` down).
//!   Negative minimums become `0`; anything else unusable is dropped.
//!
//! Every rewrite is reported as a [`CompileWarning`], so strict mode rejects
//! it. Structural errors (`properties` that is not an object) are left for
//! deserialization to report.

use serde_json::{Map, Value};
use shape_core::FieldPath;

use crate::compiler::{CompileWarning, WarningKind};

const BOUND_KEYWORDS: &[&str] = &["minLength", "maxLength", "minItems", "maxItems"];

/// Rewrite `schema` into the typed dialect, returning the warnings.
pub(crate) fn sanitize(schema: &Value) -> (Value, Vec<CompileWarning>) {
    let mut root = schema.clone();
    let mut warnings = Vec::new();
    let mut stack: Vec<(&mut Value, FieldPath)> = vec![(&mut root, FieldPath::root())];

    while let Some((node, path)) = stack.pop() {
        if !node.is_object() {
            let kind = WarningKind::NonObjectSchema {
                found: node.to_string(),
            };
            tracing::warn!(path = %path, "{kind}");
            warnings.push(CompileWarning { path, kind });
            *node = Value::Object(Map::new());
            continue;
        }
        let Value::Object(map) = node else {
            continue;
        };

        for &keyword in BOUND_KEYWORDS {
            let Some(value) = map.get(keyword) else {
                continue;
            };
            if value.is_u64() {
                continue;
            }
            let found = value.to_string();
            let used = coerce_bound(keyword, value);
            match used {
                Some(n) => {
                    map.insert(keyword.to_string(), Value::from(n));
                }
                None => {
                    map.remove(keyword);
                }
            }
            let kind = WarningKind::CoercedBound {
                keyword: keyword.to_string(),
                found,
                used,
            };
            tracing::warn!(path = %path, "{kind}");
            warnings.push(CompileWarning {
                path: path.clone(),
                kind,
            });
        }

        for (key, child) in map.iter_mut() {
            match (key.as_str(), child) {
                ("properties", Value::Object(properties)) => {
                    for (name, sub) in properties.iter_mut() {
                        let child_path = path.child(name);
                        stack.push((sub, child_path));
                    }
                }
                ("items", sub) => stack.push((sub, path.items())),
                ("allOf", Value::Array(entries)) => {
                    for sub in entries.iter_mut() {
                        stack.push((sub, path.clone()));
                    }
                }
                _ => {}
            }
        }
    }

    (root, warnings)
}

/// Integer to use for a bound that is not a `u64`, or `None` to drop it.
fn coerce_bound(keyword: &str, value: &Value) -> Option<u64> {
    let n = value.as_f64().filter(|n| n.is_finite())?;
    let lower = keyword.starts_with("min");
    let rounded = if lower { n.ceil() } else { n.floor() };
    if rounded >= 0.0 {
        Some(rounded as u64)
    } else if lower {
        Some(0)
    } else {
        None
    }
}
