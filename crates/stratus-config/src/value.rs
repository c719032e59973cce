//! Generic value model used to hand config documents in and out of the crate.
//!
//! Documents are plain `serde_json` values. The workspace enables the
//! `preserve_order` feature, so [`Map`] keeps keys in insertion order and
//! `to_value` output serializes deterministically.
//!
//! The accessors here never panic: reading a value as the wrong type yields
//! [`ConfigError::TypeMismatch`] carrying the dotted path that was read.

use crate::ConfigError;

pub use serde_json::{Map, Value, json};

/// Name of the variant stored in a value, as used in error messages.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(number) if number.is_i64() || number.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Join nested paths for error messages.
///
/// An empty key is written as `[""]` so it never collapses into its parent;
/// an empty path only ever names the document itself.
pub fn join_path(prefix: &str, key: &str) -> String {
    match (prefix.is_empty(), key.is_empty()) {
        (_, true) => format!(r#"{prefix}[""]"#),
        (true, false) => key.to_string(),
        (false, false) => format!("{prefix}.{key}"),
    }
}

fn mismatch(path: &str, expected: &'static str, value: &Value) -> ConfigError {
    ConfigError::TypeMismatch {
        path: if path.is_empty() { "root" } else { path }.to_string(),
        expected,
        found: kind_of(value),
    }
}

/// Type-checked extraction from a single value.
pub trait ValueExt {
    /// Borrow the value as an object.
    fn expect_object(&self, path: &str) -> Result<&Map<String, Value>, ConfigError>;
    /// Borrow the value as an array.
    fn expect_array(&self, path: &str) -> Result<&Vec<Value>, ConfigError>;
    /// Borrow the value as a string.
    fn expect_str(&self, path: &str) -> Result<&str, ConfigError>;
    /// Read the value as a non-negative integer.
    fn expect_u64(&self, path: &str) -> Result<u64, ConfigError>;
    /// Read the value as any number.
    fn expect_f64(&self, path: &str) -> Result<f64, ConfigError>;
    /// Read the value as a boolean.
    fn expect_bool(&self, path: &str) -> Result<bool, ConfigError>;
}

impl ValueExt for Value {
    fn expect_object(&self, path: &str) -> Result<&Map<String, Value>, ConfigError> {
        self.as_object().ok_or_else(|| mismatch(path, "object", self))
    }

    fn expect_array(&self, path: &str) -> Result<&Vec<Value>, ConfigError> {
        self.as_array().ok_or_else(|| mismatch(path, "array", self))
    }

    fn expect_str(&self, path: &str) -> Result<&str, ConfigError> {
        self.as_str().ok_or_else(|| mismatch(path, "string", self))
    }

    fn expect_u64(&self, path: &str) -> Result<u64, ConfigError> {
        self.as_u64().ok_or_else(|| mismatch(path, "integer", self))
    }

    fn expect_f64(&self, path: &str) -> Result<f64, ConfigError> {
        self.as_f64().ok_or_else(|| mismatch(path, "number", self))
    }

    fn expect_bool(&self, path: &str) -> Result<bool, ConfigError> {
        self.as_bool().ok_or_else(|| mismatch(path, "boolean", self))
    }
}

/// Keyed lookups that fall back to a default when the key is absent.
///
/// A present key holding the wrong type is still an error; only absence
/// selects the default.
pub trait MapExt {
    /// Return the value for `key`, or `default` when absent.
    fn get_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value;

    /// Read `key` with a typed accessor such as [`ValueExt::expect_str`], or
    /// return `default` when absent. `prefix` is the path of the map itself.
    fn get_as_or<'a, T>(
        &'a self,
        prefix: &str,
        key: &str,
        default: T,
        read: impl FnOnce(&'a Value, &str) -> Result<T, ConfigError>,
    ) -> Result<T, ConfigError>;
}

impl MapExt for Map<String, Value> {
    fn get_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
        self.get(key).unwrap_or(default)
    }

    fn get_as_or<'a, T>(
        &'a self,
        prefix: &str,
        key: &str,
        default: T,
        read: impl FnOnce(&'a Value, &str) -> Result<T, ConfigError>,
    ) -> Result<T, ConfigError> {
        match self.get(key) {
            Some(value) => read(value, &join_path(prefix, key)),
            None => Ok(default),
        }
    }
}
