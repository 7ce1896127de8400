//! Build-time configuration error types
//!
//! Every failure in a build pass is a configuration error: it surfaces
//! immediately to the caller and no partial resource list is returned.

use thiserror::Error;

/// Configuration errors raised while assembling a resource list
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("Missing required field '{field}' on {resource}")]
    MissingField { resource: String, field: String },

    #[error("Cannot set {field}: already set to '{value}'")]
    AlreadySet { field: String, value: String },

    #[error("'{value}' is not supported for {context}")]
    Unsupported { value: String, context: String },

    #[error("{setting} requires {missing}")]
    MissingCompanion { setting: String, missing: String },

    #[error("Invalid resource name: {0}")]
    InvalidName(String),
}

impl BuildError {
    pub fn missing_field(resource: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            resource: resource.into(),
            field: field.into(),
        }
    }

    pub fn already_set(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::AlreadySet {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn unsupported(value: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Unsupported {
            value: value.into(),
            context: context.into(),
        }
    }

    pub fn missing_companion(setting: impl Into<String>, missing: impl Into<String>) -> Self {
        Self::MissingCompanion {
            setting: setting.into(),
            missing: missing.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BuildError>;
