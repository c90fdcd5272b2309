//! # shape-core — Validator Combinators
//!
//! The runtime half of schemashape. Compiled schemas are trees of the
//! validators defined here; this crate knows nothing about schemas itself.
//!
//! ## Building Blocks
//!
//! - [`ScalarValidator`] — base type (`string`, `number`, `boolean`, `mixed`)
//!   with bounds, enumerations, integer and pattern checks, nullability, and
//!   required-ness. Builders consume and return the validator, so applying a
//!   constraint never changes a shared prototype.
//! - [`ObjectShape`] — field name → [`Validator`].
//! - [`ArrayOf`] — one element validator plus array length bounds.
//!
//! ## Validation
//!
//! [`Validator::validate`] reports every violation as a [`Violation`] with a
//! [`FieldPath`] (`company.carrier`, `accessorials[0].id`) and a
//! [`ViolationKind`] (`required`, `min`, `max`, `typeError`, ...).
//!
//! ## Crate Policy
//!
//! - No dependencies on other `shape-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests.
//! - Validators are plain values: `Clone`, `PartialEq`, `Serialize`, `Send + Sync`.

pub mod path;
pub mod scalar;
pub mod validator;
pub mod violation;

pub use path::{FieldPath, Segment};
pub use scalar::{BaseType, Constraint, Pattern, ScalarValidator};
pub use validator::{ArrayOf, ObjectShape, ValidateOptions, Validator};
pub use violation::{ValidationError, Violation, ViolationKind, Violations};
