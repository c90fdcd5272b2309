//! # Worklist Compiler
//!
//! Turns a [`SchemaNode`] into a [`Validator`] without recursing on schema
//! depth.
//!
//! ## Algorithm
//!
//! The compiler keeps a LIFO stack of pending properties maps, each paired
//! with the [`FieldPath`] of the object it belongs to and the output slot the
//! compiled fields go into. Scheduling a map prunes blacklisted names and
//! resolves the map's `required` list into the [`RequiredSet`] first; popping
//! it compiles each field:
//!
//! 1. Custom override for the field name → that validator, verbatim.
//! 2. `allOf` → merge, then an object shape scheduled for expansion.
//! 3. `type: array` with `items` → array of the (merged) item shape; length
//!    bounds from `minItems` / `maxItems`, required if its path is.
//! 4. `type: object` with `properties` → object shape scheduled for expansion.
//! 5. Anything else → leaf scalar: registry type (or permissive `mixed`),
//!    then `enum`, lower and upper bound, and `required` last.
//!
//! ## Output
//!
//! Compiled nodes live in an arena separate from the input. A child is
//! always allocated after its parent, so assembling the tree by walking the
//! arena backwards finds every child finished before its parent.
//!
//! ## Failure Semantics
//!
//! Compilation is total. Unknown types, arrays without `items`, objects
//! without `properties`, and required names with no property degrade to
//! permissive behaviour and are reported as [`CompileWarning`]s.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use shape_core::{ArrayOf, FieldPath, ObjectShape, ScalarValidator, Validator};

use crate::error::CompileError;
use crate::node::{SchemaNode, STANDARD_TYPES};
use crate::normalize::{normalize, prune};
use crate::options::BuildOptions;
use crate::required::{resolve, RequiredSet};
use crate::sanitize::sanitize;

/// A permissive fallback taken during compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileWarning {
    /// Location in the schema.
    pub path: FieldPath,
    /// What was degraded.
    #[serde(flatten)]
    pub kind: WarningKind,
}

/// Kind of [`CompileWarning`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum WarningKind {
    /// No validator registered for the type; compiled as `mixed`.
    UnknownType { name: String },
    /// `type: array` without `items`; compiled as a leaf.
    ArrayWithoutItems,
    /// `type: object` without `properties`; compiled as a leaf.
    ObjectWithoutProperties,
    /// A `required` name with no matching property.
    UnresolvedRequired { name: String },
    /// A subschema that is not an object (e.g. `true`); compiled as `{}`.
    NonObjectSchema { found: String },
    /// A length or item bound that is not a non-negative integer.
    CoercedBound {
        keyword: String,
        found: String,
        used: Option<u64>,
    },
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::UnknownType { name } => {
                write!(f, "unknown type `{name}`, compiled as permissive mixed")
            }
            WarningKind::ArrayWithoutItems => f.write_str("array without `items`, compiled as a leaf"),
            WarningKind::ObjectWithoutProperties => {
                f.write_str("object without `properties`, compiled as a leaf")
            }
            WarningKind::UnresolvedRequired { name } => {
                write!(f, "required property `{name}` is not declared")
            }
            WarningKind::NonObjectSchema { found } => {
                write!(f, "subschema `{found}` is not an object, compiled as permissive mixed")
            }
            WarningKind::CoercedBound {
                keyword,
                found,
                used: Some(n),
            } => write!(f, "`{keyword}` of {found} is not a non-negative integer, used {n}"),
            WarningKind::CoercedBound {
                keyword,
                found,
                used: None,
            } => write!(f, "`{keyword}` of {found} is not a usable bound, ignored"),
        }
    }
}

impl fmt::Display for CompileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "(root): {}", self.kind)
        } else {
            write!(f, "{}: {}", self.path, self.kind)
        }
    }
}

/// A compiled validator plus every fallback taken to build it.
#[derive(Debug, Clone, PartialEq)]
pub struct Compilation {
    pub validator: Validator,
    pub warnings: Vec<CompileWarning>,
}

impl Compilation {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Compile `schema` into a validator. Never fails.
pub fn compile(schema: &SchemaNode, options: &BuildOptions) -> Validator {
    compile_with_report(schema, options).validator
}

/// Compile `schema`, returning the validator and any warnings.
pub fn compile_with_report(schema: &SchemaNode, options: &BuildOptions) -> Compilation {
    let mut compiler = Compiler::new(options);
    compiler.compile_root(schema.clone());
    let warnings = std::mem::take(&mut compiler.warnings);
    tracing::debug!(
        nodes = compiler.nodes.len(),
        required = compiler.required.len(),
        warnings = warnings.len(),
        "schema compiled"
    );
    Compilation {
        validator: compiler.assemble(),
        warnings,
    }
}

/// Compile `schema`, failing if any fallback was needed.
///
/// # Errors
///
/// Returns `CompileError::Degraded` listing every warning.
pub fn compile_strict(schema: &SchemaNode, options: &BuildOptions) -> Result<Validator, CompileError> {
    let compilation = compile_with_report(schema, options);
    if compilation.is_clean() {
        Ok(compilation.validator)
    } else {
        Err(CompileError::Degraded {
            warnings: compilation.warnings,
        })
    }
}

/// Parse and compile a raw JSON schema.
///
/// Boolean subschemas and non-integer length bounds are rewritten first and
/// reported as warnings. With `options.strict`, the value must also be a
/// well-formed JSON Schema and compile without warnings.
///
/// # Errors
///
/// Returns `CompileError::InvalidSchema` when the value cannot be read as a
/// schema, and `CompileError::Degraded` in strict mode.
pub fn compile_value(schema: &Value, options: &BuildOptions) -> Result<Compilation, CompileError> {
    if options.strict {
        jsonschema::validator_for(schema).map_err(|e| CompileError::InvalidSchema {
            reason: e.to_string(),
        })?;
    }

    let (sanitized, mut warnings) = sanitize(schema);
    let node = SchemaNode::from_value(sanitized).map_err(|e| CompileError::InvalidSchema {
        reason: e.to_string(),
    })?;

    let mut compilation = compile_with_report(&node, options);
    warnings.append(&mut compilation.warnings);
    compilation.warnings = warnings;
    if options.strict && !compilation.is_clean() {
        return Err(CompileError::Degraded {
            warnings: compilation.warnings,
        });
    }
    Ok(compilation)
}

/// One compiled node in the output arena.
enum Slot {
    Leaf(Validator),
    Object {
        fields: Vec<(String, usize)>,
        required: bool,
    },
    Array {
        element: usize,
        required: bool,
        min_items: Option<usize>,
        max_items: Option<usize>,
    },
}

/// A properties map waiting to be expanded into the object slot `slot`.
struct Pending {
    path: FieldPath,
    slot: usize,
    fields: BTreeMap<String, SchemaNode>,
}

struct Compiler<'a> {
    options: &'a BuildOptions,
    blacklist: BTreeSet<String>,
    required: RequiredSet,
    nodes: Vec<Slot>,
    stack: Vec<Pending>,
    warnings: Vec<CompileWarning>,
}

impl<'a> Compiler<'a> {
    fn new(options: &'a BuildOptions) -> Self {
        Self {
            options,
            blacklist: options.blacklist_set(),
            required: RequiredSet::new(),
            nodes: Vec::new(),
            stack: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// The root is always an object shape over its own properties.
    fn compile_root(&mut self, schema: SchemaNode) {
        let root = normalize(schema);
        let path = FieldPath::root();
        if root.properties.is_none() {
            self.warn(&path, WarningKind::ObjectWithoutProperties);
        }
        self.schedule_object(&path, root.properties, root.required, false);

        while let Some(Pending { path, slot, fields }) = self.stack.pop() {
            tracing::debug!(path = %path, fields = fields.len(), "expanding properties map");
            let mut compiled = Vec::with_capacity(fields.len());
            for (name, node) in fields {
                let child = path.child(&name);
                let index = self.compile_field(&child, &name, node);
                compiled.push((name, index));
            }
            if let Some(Slot::Object { fields, .. }) = self.nodes.get_mut(slot) {
                *fields = compiled;
            }
        }
    }

    fn compile_field(&mut self, path: &FieldPath, name: &str, node: SchemaNode) -> usize {
        if let Some(custom) = self.options.custom(name) {
            return self.alloc(Slot::Leaf(custom.clone()));
        }

        if node.has_all_of() {
            let merged = normalize(node);
            let required = self.required.contains(path);
            return self.schedule_object(path, merged.properties, merged.required, required);
        }

        self.compile_typed(path, node)
    }

    /// Cases 3 to 5: arrays, objects, and leaves.
    fn compile_typed(&mut self, path: &FieldPath, mut node: SchemaNode) -> usize {
        let type_name = node.type_name().map(str::to_owned);
        match type_name.as_deref() {
            Some("array") => match node.items.take() {
                Some(items) => return self.compile_array(path, &node, *items),
                None => self.warn(path, WarningKind::ArrayWithoutItems),
            },
            Some("object") => match node.properties.take() {
                Some(properties) => {
                    let required = self.required.contains(path);
                    return self.schedule_object(path, Some(properties), node.required, required);
                }
                None => self.warn(path, WarningKind::ObjectWithoutProperties),
            },
            _ => {}
        }
        self.compile_leaf(path, node)
    }

    fn compile_array(&mut self, path: &FieldPath, array: &SchemaNode, items: SchemaNode) -> usize {
        let slot = self.alloc(Slot::Array {
            element: 0,
            required: self.required.contains(path),
            min_items: array.min_items.map(|n| n as usize),
            max_items: array.max_items.map(|n| n as usize),
        });

        let items = normalize(items);
        let item_path = path.items();
        let element = if items.properties.is_some() || items.type_name() == Some("object") {
            self.schedule_object(&item_path, items.properties, items.required, false)
        } else {
            self.compile_typed(&item_path, items)
        };

        if let Some(Slot::Array { element: e, .. }) = self.nodes.get_mut(slot) {
            *e = element;
        }
        slot
    }

    fn compile_leaf(&mut self, path: &FieldPath, node: SchemaNode) -> usize {
        let base = match node.type_name() {
            Some(name) => match self.options.validation_types.create(name) {
                Some(base) => base,
                None => {
                    if !STANDARD_TYPES.contains(&name) {
                        self.warn(
                            path,
                            WarningKind::UnknownType {
                                name: name.to_string(),
                            },
                        );
                    }
                    permissive()
                }
            },
            None => permissive(),
        };

        let mut validator = base;
        let lower = node.lower_bound();
        let upper = node.upper_bound();
        if let Some(values) = node.enum_values {
            validator = validator.one_of(values);
        }
        if let Some(min) = lower {
            validator = validator.min(min);
        }
        if let Some(max) = upper {
            validator = validator.max(max);
        }
        if self.required.contains(path) {
            validator = validator.required();
        }
        self.alloc(Slot::Leaf(validator.into()))
    }

    /// Allocate an object slot for `properties` and push it on the worklist.
    /// The map's required names are resolved before any field is compiled.
    fn schedule_object(
        &mut self,
        path: &FieldPath,
        properties: Option<BTreeMap<String, SchemaNode>>,
        required_names: Option<Vec<String>>,
        required: bool,
    ) -> usize {
        let fields = prune(properties.unwrap_or_default(), &self.blacklist);

        let resolution = resolve(path, &fields, required_names.as_deref().unwrap_or_default());
        self.required.extend(resolution.resolved);
        for name in resolution.unresolved {
            if !self.blacklist.contains(&name) {
                self.warn(path, WarningKind::UnresolvedRequired { name });
            }
        }

        let slot = self.alloc(Slot::Object {
            fields: Vec::new(),
            required,
        });
        self.stack.push(Pending {
            path: path.clone(),
            slot,
            fields,
        });
        slot
    }

    fn alloc(&mut self, slot: Slot) -> usize {
        self.nodes.push(slot);
        self.nodes.len() - 1
    }

    fn warn(&mut self, path: &FieldPath, kind: WarningKind) {
        tracing::warn!(path = %path, "{kind}");
        self.warnings.push(CompileWarning {
            path: path.clone(),
            kind,
        });
    }

    /// Build the validator tree from the arena, children first.
    fn assemble(self) -> Validator {
        let mut built: Vec<Option<Validator>> = vec![None; self.nodes.len()];
        for (index, slot) in self.nodes.into_iter().enumerate().rev() {
            let validator = match slot {
                Slot::Leaf(validator) => validator,
                Slot::Object { fields, required } => {
                    let fields = fields
                        .into_iter()
                        .map(|(name, child)| (name, take(&mut built, child)))
                        .collect();
                    let shape = ObjectShape::new(fields);
                    if required {
                        shape.required().into()
                    } else {
                        shape.into()
                    }
                }
                Slot::Array {
                    element,
                    required,
                    min_items,
                    max_items,
                } => {
                    let mut array = ArrayOf::of(take(&mut built, element));
                    if let Some(min) = min_items {
                        array = array.min(min);
                    }
                    if let Some(max) = max_items {
                        array = array.max(max);
                    }
                    if required {
                        array = array.required();
                    }
                    array.into()
                }
            };
            built[index] = Some(validator);
        }
        take(&mut built, 0)
    }
}

fn take(built: &mut [Option<Validator>], index: usize) -> Validator {
    match built.get_mut(index).and_then(Option::take) {
        Some(validator) => validator,
        None => {
            tracing::error!(index, "compiled slot missing during assembly");
            permissive().into()
        }
    }
}

/// Validator for fields with no usable type.
fn permissive() -> ScalarValidator {
    ScalarValidator::mixed().nullable()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shape_core::{BaseType, ViolationKind};

    fn schema(value: Value) -> SchemaNode {
        SchemaNode::from_value(value).unwrap()
    }

    fn field<'v>(v: &'v Validator, dotted: &str) -> &'v Validator {
        let mut current = v;
        for part in dotted.split('.') {
            current = match part {
                "[]" => current.as_array().unwrap().element(),
                name => current
                    .field(name)
                    .unwrap_or_else(|| panic!("no field `{name}` in `{dotted}`")),
            };
        }
        current
    }

    #[test]
    fn leaf_types_use_registry() {
        let v = compile(
            &schema(json!({"properties": {
                "code": {"type": "string"},
                "amount": {"type": "number"},
                "qty": {"type": "integer"}
            }})),
            &BuildOptions::default(),
        );
        let code = field(&v, "code").as_scalar().unwrap();
        assert_eq!(code.base(), BaseType::String);
        assert!(code.is_nullable());
        assert!(!code.is_required());

        let qty = field(&v, "qty").as_scalar().unwrap();
        assert_eq!(qty.base(), BaseType::Number);
        assert!(qty.is_integer());
        assert!(field(&v, "amount").is_nullable());
    }

    #[test]
    fn required_flags_only_listed_siblings() {
        let v = compile(
            &schema(json!({
                "required": ["a"],
                "properties": {"a": {"type": "string"}, "b": {"type": "string"}}
            })),
            &BuildOptions::default(),
        );
        assert!(field(&v, "a").is_required());
        assert!(!field(&v, "b").is_required());
    }

    #[test]
    fn same_name_required_only_where_listed() {
        let v = compile(
            &schema(json!({
                "required": ["id"],
                "properties": {
                    "id": {"type": "string"},
                    "inner": {"type": "object", "properties": {"id": {"type": "string"}}}
                }
            })),
            &BuildOptions::default(),
        );
        assert!(field(&v, "id").is_required());
        assert!(!field(&v, "inner.id").is_required());
    }

    #[test]
    fn bounds_and_enum_on_leaves() {
        let v = compile(
            &schema(json!({"properties": {
                "code": {"type": "string", "minLength": 1, "maxLength": 10},
                "amount": {"type": "number", "minimum": 1, "maximum": 10},
                "currency": {"type": "string", "enum": ["USD", "EUR"]}
            }})),
            &BuildOptions::default(),
        );
        let code = field(&v, "code").as_scalar().unwrap();
        assert_eq!((code.lower_bound(), code.upper_bound()), (Some(1.0), Some(10.0)));
        let amount = field(&v, "amount").as_scalar().unwrap();
        assert_eq!((amount.lower_bound(), amount.upper_bound()), (Some(1.0), Some(10.0)));
        let currency = field(&v, "currency").as_scalar().unwrap();
        assert_eq!(currency.allowed_values(), Some(&[json!("USD"), json!("EUR")][..]));
    }

    #[test]
    fn string_length_bound_wins_over_minimum() {
        let v = compile(
            &schema(json!({"properties": {
                "code": {"type": "string", "minimum": 0, "minLength": 3}
            }})),
            &BuildOptions::default(),
        );
        assert_eq!(field(&v, "code").as_scalar().unwrap().lower_bound(), Some(3.0));

        let err = v.validate(&json!({"code": "a"})).unwrap_err();
        assert_eq!(err.violations().kind_at("code"), Some(ViolationKind::Min));
        assert!(v.is_valid(&json!({"code": "abc"})));
    }

    #[test]
    fn blacklist_applies_at_every_depth() {
        let opts = BuildOptions::new().with_black_list(["created_at"]);
        let v = compile(
            &schema(json!({"properties": {
                "created_at": {"type": "string"},
                "company": {"type": "object", "properties": {
                    "created_at": {"type": "string"}, "name": {"type": "string"}
                }},
                "stops": {"type": "array", "items": {"properties": {
                    "created_at": {"type": "string"}, "name": {"type": "string"}
                }}}
            }})),
            &opts,
        );
        assert!(v.field("created_at").is_none());
        assert_eq!(field(&v, "company").as_object().unwrap().field_names(), vec!["name"]);
        assert_eq!(field(&v, "stops.[]").as_object().unwrap().field_names(), vec!["name"]);
    }

    #[test]
    fn blacklisted_required_names_are_silent() {
        let opts = BuildOptions::new().with_black_list(["secret"]);
        let c = compile_with_report(
            &schema(json!({"required": ["secret"], "properties": {"secret": {"type": "string"}}})),
            &opts,
        );
        assert!(c.is_clean(), "unexpected warnings: {:?}", c.warnings);
    }

    #[test]
    fn custom_fields_replace_compilation_verbatim() {
        let custom: Validator = ScalarValidator::string().email().into();
        let opts = BuildOptions::new().with_custom_field("email", custom.clone());
        let v = compile(
            &schema(json!({
                "required": ["email"],
                "properties": {
                    "email": {"type": "string", "maxLength": 3},
                    "contact": {"type": "object", "properties": {
                        "email": {"type": "object", "properties": {"x": {}}}
                    }}
                }
            })),
            &opts,
        );
        assert_eq!(field(&v, "email"), &custom);
        assert!(!field(&v, "email").is_required());
        assert_eq!(field(&v, "contact.email"), &custom);
    }

    #[test]
    fn objects_expose_exactly_their_properties() {
        let v = compile(
            &schema(json!({"properties": {"charge_code": {"type": "object", "properties": {
                "id": {"type": "string"}, "code": {"type": "string"}, "description": {"type": "string"}
            }}}})),
            &BuildOptions::default(),
        );
        let cc = field(&v, "charge_code");
        assert_eq!(cc.type_name(), "object");
        assert!(!cc.is_nullable());
        assert_eq!(cc.as_object().unwrap().field_names(), vec!["code", "description", "id"]);
    }

    #[test]
    fn arrays_wrap_item_shapes() {
        let v = compile(
            &schema(json!({
                "required": ["stops"],
                "properties": {"stops": {
                    "type": "array", "minItems": 2, "maxItems": 3,
                    "items": {"type": "object", "required": ["name"], "properties": {
                        "name": {"type": "string"}, "address": {"type": "string"}
                    }}
                }}
            })),
            &BuildOptions::default(),
        );
        let stops = field(&v, "stops");
        assert!(stops.is_required());
        let array = stops.as_array().unwrap();
        assert_eq!((array.min_items(), array.max_items()), (Some(2), Some(3)));
        assert_eq!(array.element().as_object().unwrap().field_names(), vec!["address", "name"]);
        assert!(field(&v, "stops.[].name").is_required());
        assert!(!field(&v, "stops.[].address").is_required());
    }

    #[test]
    fn arrays_of_scalars_compile_items_as_leaves() {
        let v = compile(
            &schema(json!({"properties": {"tags": {
                "type": "array", "items": {"type": "string", "maxLength": 3}
            }}})),
            &BuildOptions::default(),
        );
        let element = field(&v, "tags.[]").as_scalar().unwrap();
        assert_eq!(element.base(), BaseType::String);
        assert_eq!(element.upper_bound(), Some(3.0));

        let err = v.validate(&json!({"tags": ["ok", "toolong"]})).unwrap_err();
        assert_eq!(err.violations().kind_at("tags[1]"), Some(ViolationKind::Max));
    }

    #[test]
    fn nested_arrays() {
        let v = compile(
            &schema(json!({"properties": {"grid": {
                "type": "array",
                "items": {"type": "array", "maxItems": 2, "items": {"type": "integer"}}
            }}})),
            &BuildOptions::default(),
        );
        let err = v.validate(&json!({"grid": [[1, 2], [1, 2, 3], [1.5]]})).unwrap_err();
        assert_eq!(err.violations().kind_at("grid[1]"), Some(ViolationKind::Max));
        assert_eq!(err.violations().kind_at("grid[2][0]"), Some(ViolationKind::Integer));
    }

    #[test]
    fn all_of_merges_required_additively() {
        let v = compile(
            &schema(json!({"properties": {"party": {"allOf": [
                {"properties": {"a": {"type": "string"}}, "required": ["a"]},
                {"properties": {"b": {"type": "string"}, "c": {"type": "string"}}, "required": ["b"]}
            ]}}})),
            &BuildOptions::default(),
        );
        assert_eq!(field(&v, "party").type_name(), "object");
        assert!(field(&v, "party.a").is_required());
        assert!(field(&v, "party.b").is_required());
        assert!(!field(&v, "party.c").is_required());
    }

    #[test]
    fn root_all_of_is_normalized() {
        let v = compile(
            &schema(json!({"allOf": [
                {"properties": {"a": {"type": "string"}}, "required": ["a"]},
                {"properties": {"b": {"type": "number"}}, "required": ["b"]}
            ]})),
            &BuildOptions::default(),
        );
        assert!(field(&v, "a").is_required());
        assert!(field(&v, "b").is_required());
        assert_eq!(field(&v, "b").type_name(), "number");
    }

    #[test]
    fn all_of_inside_array_items() {
        let v = compile(
            &schema(json!({"properties": {"lines": {"type": "array", "items": {"allOf": [
                {"properties": {"id": {"type": "string"}}, "required": ["id"]},
                {"properties": {"qty": {"type": "integer"}}, "required": ["qty"]}
            ]}}}})),
            &BuildOptions::default(),
        );
        assert!(field(&v, "lines.[].id").is_required());
        assert!(field(&v, "lines.[].qty").is_required());
    }

    #[test]
    fn required_objects_are_flagged() {
        let v = compile(
            &schema(json!({
                "required": ["company"],
                "properties": {"company": {"type": "object", "properties": {"name": {"type": "string"}}}}
            })),
            &BuildOptions::default(),
        );
        assert!(field(&v, "company").is_required());
    }

    #[test]
    fn degradations_are_reported_not_fatal() {
        let c = compile_with_report(
            &schema(json!({
                "required": ["ghost"],
                "properties": {
                    "when": {"type": "date"},
                    "list": {"type": "array", "minItems": 1},
                    "bag": {"type": "object"},
                    "flag": {"type": "boolean"}
                }
            })),
            &BuildOptions::default(),
        );
        let kinds: Vec<String> = c.warnings.iter().map(ToString::to_string).collect();
        assert_eq!(c.warnings.len(), 4, "{kinds:?}");
        assert!(kinds.contains(&"(root): required property `ghost` is not declared".to_string()));
        assert!(kinds.contains(&"when: unknown type `date`, compiled as permissive mixed".to_string()));
        assert!(kinds.contains(&"list: array without `items`, compiled as a leaf".to_string()));
        assert!(kinds.contains(&"bag: object without `properties`, compiled as a leaf".to_string()));

        for name in ["when", "bag", "flag"] {
            let leaf = field(&c.validator, name).as_scalar().unwrap();
            assert_eq!(leaf.base(), BaseType::Mixed);
            assert!(leaf.is_nullable());
        }
        let list = field(&c.validator, "list").as_scalar().unwrap();
        assert_eq!(list.lower_bound(), Some(1.0));
    }

    #[test]
    fn strict_compile_rejects_degradations() {
        let node = schema(json!({"properties": {"when": {"type": "date"}}}));
        let err = compile_strict(&node, &BuildOptions::default()).unwrap_err();
        match err {
            CompileError::Degraded { warnings } => assert_eq!(warnings.len(), 1),
            other => panic!("expected Degraded, got {other}"),
        }

        let opts = BuildOptions::new().with_type("date", ScalarValidator::string().nullable());
        assert!(compile_strict(&node, &opts).is_ok());
    }

    #[test]
    fn compile_value_parses_and_checks() {
        let ok = compile_value(
            &json!({"properties": {"a": {"type": "string"}}}),
            &BuildOptions::default(),
        )
        .unwrap();
        assert!(ok.is_clean());

        let err = compile_value(&json!({"properties": 5}), &BuildOptions::default()).unwrap_err();
        assert!(matches!(err, CompileError::InvalidSchema { .. }));

        let strict = BuildOptions::new().strict(true);
        let err = compile_value(&json!({"type": 12}), &strict).unwrap_err();
        assert!(matches!(err, CompileError::InvalidSchema { .. }));

        let err = compile_value(&json!({"properties": {"x": {"type": "object"}}}), &strict).unwrap_err();
        assert!(matches!(err, CompileError::Degraded { .. }));
    }

    #[test]
    fn compile_value_tolerates_boolean_subschemas_and_float_bounds() {
        let c = compile_value(
            &json!({"properties": {
                "a": true,
                "b": {"type": "string"},
                "code": {"type": "string", "minLength": 2.0}
            }}),
            &BuildOptions::default(),
        )
        .unwrap();

        let a = field(&c.validator, "a").as_scalar().unwrap();
        assert_eq!(a.base(), BaseType::Mixed);
        assert!(a.is_nullable());
        assert_eq!(field(&c.validator, "b").type_name(), "string");
        let code = field(&c.validator, "code").as_scalar().unwrap();
        assert_eq!(code.lower_bound(), Some(2.0));

        let kinds: Vec<&WarningKind> = c.warnings.iter().map(|w| &w.kind).collect();
        assert_eq!(kinds.len(), 2, "{kinds:?}");
        assert!(kinds.iter().any(|k| matches!(k, WarningKind::NonObjectSchema { found } if found == "true")));
        assert!(kinds
            .iter()
            .any(|k| matches!(k, WarningKind::CoercedBound { used: Some(2), .. })));

        let err = c.validator.validate(&json!({"code": "x"})).unwrap_err();
        assert_eq!(err.violations().kind_at("code"), Some(ViolationKind::Min));
    }

    #[test]
    fn strict_compile_value_rejects_coercions() {
        let strict = BuildOptions::new().strict(true);
        let err = compile_value(&json!({"properties": {"a": true}}), &strict).unwrap_err();
        match err {
            CompileError::Degraded { warnings } => {
                assert_eq!(warnings.len(), 1);
                assert_eq!(warnings[0].path.to_string(), "a");
            }
            other => panic!("expected Degraded, got {other}"),
        }
    }

    #[test]
    fn input_schema_is_not_mutated() {
        let node = schema(json!({"allOf": [{"properties": {"a": {"type": "string"}}}]}));
        let before = node.clone();
        let _ = compile(&node, &BuildOptions::new().with_black_list(["a"]));
        assert_eq!(node, before);
    }

    #[test]
    fn deep_schemas_compile_without_recursion() {
        let mut node = SchemaNode::of_type("string");
        for _ in 0..500 {
            let mut parent = SchemaNode::of_type("object");
            parent.properties = Some(BTreeMap::from([("n".to_string(), node)]));
            node = parent;
        }
        let v = compile(&node, &BuildOptions::default());
        let mut current = &v;
        let mut depth = 0;
        while let Some(next) = current.field("n") {
            current = next;
            depth += 1;
        }
        assert_eq!(depth, 500);
        assert_eq!(current.type_name(), "string");
    }
}
