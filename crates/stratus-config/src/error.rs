//! Error types for config validation and construction.

use std::fmt;
use thiserror::Error;

/// Errors returned while validating or building config.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The document does not match the config schema.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A value was read with an accessor for a different type.
    #[error("invalid config at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
    /// A structurally valid section could not be decoded into its type.
    #[error("failed to decode config at {path}: {message}")]
    DecodeFailed { path: String, message: String },
    /// A section-specific check failed on a structurally valid value.
    #[error("invalid config at {path}: {message}")]
    InvalidField { path: String, message: String },
}

impl ConfigError {
    /// Dotted path of the offending property.
    pub fn path(&self) -> &str {
        match self {
            Self::Validation(err) => &err.path,
            Self::TypeMismatch { path, .. }
            | Self::DecodeFailed { path, .. }
            | Self::InvalidField { path, .. } => path,
        }
    }

    /// Returns the schema violation, if this error is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

/// A schema violation at a specific property path.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid config at {path}: {kind}")]
pub struct ValidationError {
    /// Dotted property path, `root` for the document itself.
    pub path: String,
    pub kind: ValidationErrorKind,
}

/// The nature of a schema violation.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationErrorKind {
    /// The value has a different JSON type than declared.
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    /// The property is not declared and the object is closed.
    UnknownProperty,
    /// A required property is absent.
    MissingProperty,
    /// The string is not one of the enumerated values.
    NotAllowed { allowed: Vec<String> },
    /// The integer falls outside the declared bounds.
    OutOfRange { min: Option<i64>, max: Option<i64> },
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongType { expected, found } => write!(f, "expected {expected}, found {found}"),
            Self::UnknownProperty => f.write_str("unknown key"),
            Self::MissingProperty => f.write_str("missing required field"),
            Self::NotAllowed { allowed } => write!(f, "expected one of [{}]", allowed.join(", ")),
            Self::OutOfRange { min, max } => match (min, max) {
                (Some(min), Some(max)) => write!(f, "expected a value in {min}..={max}"),
                (Some(min), None) => write!(f, "expected a value >= {min}"),
                (None, Some(max)) => write!(f, "expected a value <= {max}"),
                (None, None) => f.write_str("value out of range"),
            },
        }
    }
}

/// A malformed built-in schema definition.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("malformed schema at {path}: {message}")]
pub struct SchemaCompileError {
    pub path: String,
    pub message: String,
}
