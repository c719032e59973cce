//! Typed config sections and their builders.
//!
//! Each section owns its schema fragment, the defaults of its optional fields
//! and the conversion between the generic value model and its typed form. The
//! root config composes the fragments; nothing else duplicates them.
//!
//! Building a section is three steps: the fragment is checked against its
//! schema, the value is decoded with `serde`, and [`Section::validate`] runs
//! the checks the schema cannot express.

mod logging;
mod network;
mod storage;
mod topologies;

pub use logging::{LogLevel, LogTarget, Logging};
pub use network::Network;
pub use storage::{Storage, UdsKind, UdsStorage};
pub use topologies::{Topologies, Topology};

use crate::ConfigError;
use crate::schema::Schema;
use crate::value::Value;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};

/// A named top-level config section.
pub trait Section: Serialize + DeserializeOwned {
    /// Top-level key the section is stored under.
    const NAME: &'static str;

    /// Schema fragment describing the section's shape.
    const SCHEMA: &'static str;

    /// The compiled [`Self::SCHEMA`].
    fn schema() -> &'static Schema;

    /// Checks that run after decoding, on a structurally valid section.
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Validate a section value, apply defaults and build the typed section.
    ///
    /// Error paths are prefixed with [`Self::NAME`].
    fn from_value(value: &Value) -> Result<Self, ConfigError> {
        Self::schema().validate_at(value, Self::NAME)?;
        let section = Self::deserialize(value).map_err(|err| ConfigError::DecodeFailed {
            path: Self::NAME.to_string(),
            message: err.to_string(),
        })?;
        section.validate()?;
        Ok(section)
    }

    /// Convert back to the generic form accepted by [`Section::from_value`].
    fn to_value(&self) -> Value {
        encode(self)
    }
}

/// Serialize a typed config value.
///
/// # Panics
///
/// Panics if serialization fails. Config types hold only strings, integers,
/// booleans and string-keyed maps, so this is a defect in the crate.
pub(crate) fn encode<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|err| panic!("config failed to serialize: {err}"))
}

/// Build a section construction error.
fn invalid_field(path: impl Into<String>, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidField {
        path: path.into(),
        message: message.into(),
    }
}

/// Decode an integer field, accepting integral floats such as `8090.0`.
fn integral<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    let whole = number.as_u64().or_else(|| {
        number
            .as_f64()
            .filter(|float| float.fract() == 0.0 && *float >= 0.0 && *float <= u64::MAX as f64)
            .map(|float| float as u64)
    });
    whole
        .and_then(|whole| T::try_from(whole).ok())
        .ok_or_else(|| D::Error::custom(format!("expected an integer in range, found {number}")))
}
