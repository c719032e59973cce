//! Declarative schema compiler and structural validator.
//!
//! Schemas are written as a small subset of JSON Schema and compiled once into
//! a [`Schema`] tree. Supported keywords:
//!
//! - `type`: `object`, `array`, `string`, `integer`, `number`, `boolean`, `null`
//! - `properties`, `required`, `additionalProperties` (objects)
//! - `items` (arrays)
//! - `enum` (strings)
//! - `minimum`, `maximum` (integers)
//! - `description` (ignored)
//!
//! Objects are closed unless `additionalProperties` says otherwise. Any other
//! keyword is rejected at compile time.

use crate::value::{Map, Value, join_path, kind_of};
use crate::{SchemaCompileError, ValidationError, ValidationErrorKind};

/// Compiled shape description.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Null,
    Boolean,
    Integer {
        minimum: Option<i64>,
        maximum: Option<i64>,
    },
    Number,
    String {
        allowed: Option<Vec<String>>,
    },
    Array {
        items: Option<Box<Schema>>,
    },
    Object(ObjectSchema),
}

/// Compiled object shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSchema {
    properties: Vec<(String, Schema)>,
    required: Vec<String>,
    additional: AdditionalProperties,
}

/// Policy for properties not declared in `properties`.
#[derive(Debug, Clone, PartialEq)]
pub enum AdditionalProperties {
    /// Undeclared properties are rejected.
    Forbidden,
    /// Undeclared properties are accepted as-is.
    Allowed,
    /// Undeclared properties must match the schema.
    Matching(Box<Schema>),
}

impl ObjectSchema {
    /// Declared properties, in schema order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.properties
            .iter()
            .map(|(name, schema)| (name.as_str(), schema))
    }

    /// Look up a declared property.
    pub fn property(&self, name: &str) -> Option<&Schema> {
        self.properties
            .iter()
            .find(|(declared, _)| declared == name)
            .map(|(_, schema)| schema)
    }

    /// Names of required properties.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Policy for undeclared properties.
    pub fn additional(&self) -> &AdditionalProperties {
        &self.additional
    }
}

impl Schema {
    /// Compile a schema from its JSON text.
    pub fn compile(text: &str) -> Result<Self, SchemaCompileError> {
        let value: Value = serde_json::from_str(text).map_err(|err| SchemaCompileError {
            path: "#".to_string(),
            message: err.to_string(),
        })?;
        compile_node(&value, "#")
    }

    /// Validate a document against this schema.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        self.validate_at(value, "")
    }

    /// Validate a fragment located at `path` within a larger document.
    ///
    /// Error paths are reported relative to the document root.
    pub fn validate_at(&self, value: &Value, path: &str) -> Result<(), ValidationError> {
        match self {
            Self::Null => expect_kind(value.is_null(), "null", value, path),
            Self::Boolean => expect_kind(value.is_boolean(), "boolean", value, path),
            Self::Number => expect_kind(value.is_number(), "number", value, path),
            Self::Integer { minimum, maximum } => {
                let Some(number) = as_integer(value) else {
                    return Err(wrong_type(path, "integer", value));
                };
                let below = minimum.is_some_and(|min| number < i128::from(min));
                let above = maximum.is_some_and(|max| number > i128::from(max));
                if below || above {
                    return Err(violation(
                        path,
                        ValidationErrorKind::OutOfRange {
                            min: *minimum,
                            max: *maximum,
                        },
                    ));
                }
                Ok(())
            }
            Self::String { allowed } => {
                let Some(text) = value.as_str() else {
                    return Err(wrong_type(path, "string", value));
                };
                if let Some(allowed) = allowed {
                    if !allowed.iter().any(|candidate| candidate == text) {
                        return Err(violation(
                            path,
                            ValidationErrorKind::NotAllowed {
                                allowed: allowed.clone(),
                            },
                        ));
                    }
                }
                Ok(())
            }
            Self::Array { items } => {
                let Some(entries) = value.as_array() else {
                    return Err(wrong_type(path, "array", value));
                };
                if let Some(items) = items {
                    for (idx, entry) in entries.iter().enumerate() {
                        items.validate_at(entry, &format!("{path}[{idx}]"))?;
                    }
                }
                Ok(())
            }
            Self::Object(object) => {
                let Some(map) = value.as_object() else {
                    return Err(wrong_type(path, "object", value));
                };
                object.validate_map(map, path)
            }
        }
    }

    /// Name of the JSON type this schema accepts.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer { .. } => "integer",
            Self::Number => "number",
            Self::String { .. } => "string",
            Self::Array { .. } => "array",
            Self::Object(_) => "object",
        }
    }

    /// Borrow the object shape, if this is an object schema.
    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }
}

impl ObjectSchema {
    fn validate_map(&self, map: &Map<String, Value>, path: &str) -> Result<(), ValidationError> {
        for (key, value) in map {
            if self.property(key).is_some() {
                continue;
            }
            let key_path = join_path(path, key);
            match &self.additional {
                AdditionalProperties::Forbidden => {
                    return Err(violation(&key_path, ValidationErrorKind::UnknownProperty));
                }
                AdditionalProperties::Allowed => {}
                AdditionalProperties::Matching(schema) => schema.validate_at(value, &key_path)?,
            }
        }

        for name in &self.required {
            if !map.contains_key(name) {
                return Err(violation(
                    &join_path(path, name),
                    ValidationErrorKind::MissingProperty,
                ));
            }
        }

        for (name, schema) in &self.properties {
            if let Some(value) = map.get(name) {
                schema.validate_at(value, &join_path(path, name))?;
            }
        }
        Ok(())
    }
}

/// Compile one of the crate's own schema definitions.
///
/// # Panics
///
/// Panics when the definition is malformed. Built-in schemas are fixed at
/// compile time, so this is a defect in the crate rather than bad input.
pub(crate) fn compile_builtin(text: &str) -> Schema {
    Schema::compile(text).unwrap_or_else(|err| panic!("built-in config schema is invalid: {err}"))
}

fn compile_node(value: &Value, path: &str) -> Result<Schema, SchemaCompileError> {
    let Value::Object(node) = value else {
        return Err(compile_error(path, "schema must be an object"));
    };
    let Some(type_value) = node.get("type") else {
        return Err(compile_error(path, "missing `type`"));
    };
    let Some(type_name) = type_value.as_str() else {
        return Err(compile_error(path, "`type` must be a string"));
    };

    let keywords: &[&str] = match type_name {
        "object" => &["properties", "required", "additionalProperties"],
        "array" => &["items"],
        "string" => &["enum"],
        "integer" => &["minimum", "maximum"],
        "number" | "boolean" | "null" => &[],
        other => return Err(compile_error(path, &format!("unsupported type `{other}`"))),
    };
    for key in node.keys() {
        let known = key == "type" || key == "description" || keywords.contains(&key.as_str());
        if !known {
            return Err(compile_error(
                path,
                &format!("keyword `{key}` is not supported for type `{type_name}`"),
            ));
        }
    }

    match type_name {
        "object" => compile_object(node, path).map(Schema::Object),
        "array" => {
            let items = node
                .get("items")
                .map(|items| compile_node(items, &format!("{path}/items")))
                .transpose()?
                .map(Box::new);
            Ok(Schema::Array { items })
        }
        "string" => {
            let allowed = node
                .get("enum")
                .map(|values| compile_enum(values, &format!("{path}/enum")))
                .transpose()?;
            Ok(Schema::String { allowed })
        }
        "integer" => {
            let minimum = compile_bound(node, "minimum", path)?;
            let maximum = compile_bound(node, "maximum", path)?;
            if let (Some(min), Some(max)) = (minimum, maximum) {
                if min > max {
                    return Err(compile_error(path, "`minimum` exceeds `maximum`"));
                }
            }
            Ok(Schema::Integer { minimum, maximum })
        }
        "number" => Ok(Schema::Number),
        "boolean" => Ok(Schema::Boolean),
        _ => Ok(Schema::Null),
    }
}

fn compile_object(
    node: &Map<String, Value>,
    path: &str,
) -> Result<ObjectSchema, SchemaCompileError> {
    let mut properties = Vec::new();
    if let Some(value) = node.get("properties") {
        let props_path = format!("{path}/properties");
        let Value::Object(props) = value else {
            return Err(compile_error(&props_path, "`properties` must be an object"));
        };
        for (name, schema) in props {
            let schema = compile_node(schema, &format!("{props_path}/{name}"))?;
            properties.push((name.clone(), schema));
        }
    }

    let mut required = Vec::new();
    if let Some(value) = node.get("required") {
        let required_path = format!("{path}/required");
        let Value::Array(names) = value else {
            return Err(compile_error(&required_path, "`required` must be an array"));
        };
        for name in names {
            let Some(name) = name.as_str() else {
                return Err(compile_error(&required_path, "entries must be strings"));
            };
            if !properties.iter().any(|(declared, _)| declared == name) {
                return Err(compile_error(
                    &required_path,
                    &format!("`{name}` is not a declared property"),
                ));
            }
            required.push(name.to_string());
        }
    }

    let additional = match node.get("additionalProperties") {
        None | Some(Value::Bool(false)) => AdditionalProperties::Forbidden,
        Some(Value::Bool(true)) => AdditionalProperties::Allowed,
        Some(schema) => AdditionalProperties::Matching(Box::new(compile_node(
            schema,
            &format!("{path}/additionalProperties"),
        )?)),
    };

    Ok(ObjectSchema {
        properties,
        required,
        additional,
    })
}

fn compile_enum(values: &Value, path: &str) -> Result<Vec<String>, SchemaCompileError> {
    let Value::Array(values) = values else {
        return Err(compile_error(path, "`enum` must be an array"));
    };
    if values.is_empty() {
        return Err(compile_error(path, "`enum` must not be empty"));
    }
    values
        .iter()
        .map(|value| {
            value
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| compile_error(path, "`enum` entries must be strings"))
        })
        .collect()
}

fn compile_bound(
    node: &Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<Option<i64>, SchemaCompileError> {
    node.get(key)
        .map(|value| {
            value
                .as_i64()
                .ok_or_else(|| compile_error(&format!("{path}/{key}"), "bound must be an integer"))
        })
        .transpose()
}

/// Integers, including floats with no fractional part such as `8090.0`.
fn as_integer(value: &Value) -> Option<i128> {
    value
        .as_i64()
        .map(i128::from)
        .or_else(|| value.as_u64().map(i128::from))
        .or_else(|| {
            value
                .as_f64()
                .filter(|float| float.is_finite() && float.fract() == 0.0)
                .map(|float| float as i128)
        })
}

fn expect_kind(
    matches: bool,
    expected: &'static str,
    value: &Value,
    path: &str,
) -> Result<(), ValidationError> {
    if matches {
        Ok(())
    } else {
        Err(wrong_type(path, expected, value))
    }
}

fn wrong_type(path: &str, expected: &'static str, value: &Value) -> ValidationError {
    violation(
        path,
        ValidationErrorKind::WrongType {
            expected,
            found: kind_of(value),
        },
    )
}

/// Build a structured violation, reporting the document itself as `root`.
fn violation(path: &str, kind: ValidationErrorKind) -> ValidationError {
    let normalized_path = if path.is_empty() { "root" } else { path };
    ValidationError {
        path: normalized_path.to_string(),
        kind,
    }
}

fn compile_error(path: &str, message: &str) -> SchemaCompileError {
    SchemaCompileError {
        path: path.to_string(),
        message: message.to_string(),
    }
}
