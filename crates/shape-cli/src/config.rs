//! # Compiler Configuration
//!
//! Declarative [`BuildOptions`] loaded from a YAML or JSON file:
//!
//! ```yaml
//! blackList: [created_at, updated_at]
//! strict: false
//! validationTypes:
//!   boolean: { type: boolean, nullable: true }
//!   date: { type: string, nullable: true, pattern: '^\d{4}-\d{2}-\d{2}' }
//! customValidationFields:
//!   first_name: { type: string, format: email }
//! ```
//!
//! `validationTypes` extend the default registry (`string`, `number`,
//! `integer`); an entry with a default name replaces it.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use shape_core::{Pattern, ScalarValidator};
use shape_schema::BuildOptions;
use thiserror::Error;

use crate::document::{load_document, DocumentError};

/// Errors from loading or applying a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] DocumentError),

    /// The file parsed but does not describe a configuration.
    #[error("invalid configuration {path}: {reason}")]
    Invalid { path: String, reason: String },

    /// A `pattern` that is not a valid regular expression.
    #[error("invalid pattern for `{name}`: {reason}")]
    InvalidPattern { name: String, reason: String },
}

/// Base type of a [`ScalarSpec`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecType {
    String,
    Number,
    /// `number` with the integer constraint.
    Integer,
    Boolean,
    #[default]
    Mixed,
}

/// Named formats with a built-in pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Email,
}

/// Declarative description of a [`ScalarValidator`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScalarSpec {
    #[serde(rename = "type", default)]
    pub base: SpecType,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub one_of: Option<Vec<Value>>,
    #[serde(default)]
    pub integer: bool,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub format: Option<Format>,
}

impl ScalarSpec {
    /// Build the validator. `name` only labels pattern errors.
    pub fn to_validator(&self, name: &str) -> Result<ScalarValidator, ConfigError> {
        let mut v = match self.base {
            SpecType::String => ScalarValidator::string(),
            SpecType::Number => ScalarValidator::number(),
            SpecType::Integer => ScalarValidator::number().integer(),
            SpecType::Boolean => ScalarValidator::boolean(),
            SpecType::Mixed => ScalarValidator::mixed(),
        };
        if self.nullable {
            v = v.nullable();
        }
        if self.integer {
            v = v.integer();
        }
        if let Some(values) = &self.one_of {
            v = v.one_of(values.iter().cloned());
        }
        if let Some(min) = self.min {
            v = v.min(min);
        }
        if let Some(max) = self.max {
            v = v.max(max);
        }
        if let Some(source) = &self.pattern {
            let pattern = Pattern::new(source).map_err(|e| ConfigError::InvalidPattern {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
            v = v.matches(pattern);
        }
        if self.format == Some(Format::Email) {
            v = v.email();
        }
        if self.required {
            v = v.required();
        }
        Ok(v)
    }
}

/// Contents of a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompilerConfig {
    #[serde(default)]
    pub black_list: Vec<String>,
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub validation_types: BTreeMap<String, ScalarSpec>,
    #[serde(default)]
    pub custom_validation_fields: BTreeMap<String, ScalarSpec>,
}

impl CompilerConfig {
    /// Load from a `.json`, `.yaml`, or `.yml` file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let value = load_document(path)?;
        serde_json::from_value(value).map_err(|e| ConfigError::Invalid {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Convert into compiler options.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` for the first bad `pattern`.
    pub fn into_build_options(self) -> Result<BuildOptions, ConfigError> {
        let mut options = BuildOptions::new()
            .with_black_list(self.black_list)
            .strict(self.strict);
        for (name, spec) in &self.validation_types {
            options = options.with_type(name.as_str(), spec.to_validator(name)?);
        }
        for (name, spec) in &self.custom_validation_fields {
            options = options.with_custom_field(name.as_str(), spec.to_validator(name)?);
        }
        tracing::debug!(
            types = self.validation_types.len(),
            custom_fields = self.custom_validation_fields.len(),
            black_list = options.black_list.len(),
            "configuration applied"
        );
        Ok(options)
    }
}
