//! # shape-schema — Schema Compiler
//!
//! Compiles a declarative, JSON-Schema-like [`SchemaNode`] into a
//! [`shape_core::Validator`] tree.
//!
//! ## Pipeline
//!
//! - [`normalize`] — folds `allOf` into one node (later entries win, the
//!   node's own keys last; `properties` merge deeply, `required` unions).
//! - [`required`] — resolves each map's `required` names into absolute
//!   [`FieldPath`](shape_core::FieldPath)s.
//! - [`compiler`] — worklist over properties maps; compiled nodes go into a
//!   separate arena that is assembled once every map is expanded.
//!
//! ## Entry Points
//!
//! - [`compile`] — total; degrades unknown input to permissive leaves.
//! - [`compile_with_report`] — same, plus every [`CompileWarning`].
//! - [`compile_strict`] — fails on any warning.
//! - [`compile_value`] — parses a raw JSON value, turning boolean subschemas
//!   into permissive leaves and rounding non-integer length bounds (both
//!   reported as warnings); in strict mode also checks it against the JSON
//!   Schema meta-schema via `jsonschema`.
//!
//! ## Crate Policy
//!
//! - Depends only on `shape-core` internally.
//! - Input schemas are never mutated; the compiler works on owned copies.
//! - Call depth is bounded regardless of schema depth.
//! - Blacklist and custom overrides match bare field names at every depth.

pub mod compiler;
pub mod error;
pub mod node;
pub mod normalize;
pub mod options;
pub mod registry;
pub mod required;
mod sanitize;

pub use compiler::{compile, compile_strict, compile_value, compile_with_report, Compilation, CompileWarning, WarningKind};
pub use error::CompileError;
pub use node::{SchemaNode, TypeDecl, STANDARD_TYPES};
pub use normalize::normalize;
pub use options::BuildOptions;
pub use registry::TypeRegistry;
pub use required::{RequiredSet, Resolution};
