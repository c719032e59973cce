//! Tests for root config composition and building.

use super::*;
use crate::section::{LogLevel, UdsKind};
use crate::value::json;
use crate::{ValidationError, ValidationErrorKind};
use pretty_assertions::assert_eq;

/// The composed schema embeds each section fragment unchanged.
#[test]
fn root_schema_composes_section_fragments() {
    let root = root_schema().as_object().expect("root object");
    let names: Vec<&str> = root.properties().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["network", "topologies", "storage", "logging"]);
    assert!(root.required().is_empty());

    assert_eq!(root.property(Network::NAME), Some(Network::schema()));
    assert_eq!(root.property(Topologies::NAME), Some(Topologies::schema()));
    assert_eq!(root.property(Storage::NAME), Some(Storage::schema()));
    assert_eq!(root.property(Logging::NAME), Some(Logging::schema()));
    assert!(root_schema_text().contains(r#""additionalProperties": false"#));
}

/// An empty document yields every default.
#[test]
fn empty_document_builds_defaults() {
    let config = Config::build(&json!({})).expect("config");
    assert_eq!(config, Config::default());
    assert_eq!(config.network().listen_port(), 15601);
    assert!(config.topologies().is_empty());
    assert_eq!(config.storage().uds().kind(), UdsKind::InMemory);
    assert_eq!(config.logging().level(), LogLevel::Info);
}

/// Unknown top-level keys are rejected with their name as the path.
#[test]
fn rejects_unknown_top_level_key() {
    let err = Config::build(&json!({ "network": {}, "metrics": { "enabled": true } }))
        .unwrap_err();
    assert_eq!(
        err,
        ConfigError::Validation(ValidationError {
            path: "metrics".to_string(),
            kind: ValidationErrorKind::UnknownProperty,
        })
    );
    assert_eq!(err.to_string(), "invalid config at metrics: unknown key");
}

/// A document that is not an object is reported at `root`.
#[test]
fn rejects_non_object_document() {
    let err = Config::build(&json!(["network"])).unwrap_err();
    assert_eq!(err.path(), "root");
}

/// An unknown empty key is named as such, not as the document.
#[test]
fn rejects_empty_top_level_key() {
    let mut doc = Map::new();
    doc.insert(String::new(), json!({}));
    let err = Config::build(&Value::Object(doc)).unwrap_err();
    assert_eq!(
        err,
        ConfigError::Validation(ValidationError {
            path: r#"[""]"#.to_string(),
            kind: ValidationErrorKind::UnknownProperty,
        })
    );
    assert_ne!(err.path(), Config::build(&json!(1)).unwrap_err().path());
}

/// A section given as a non-object is a shape error at the section key.
#[test]
fn rejects_non_object_section() {
    let err = Config::build(&json!({ "storage": "fs" })).unwrap_err();
    assert_eq!(
        err.as_validation().map(|err| &err.kind),
        Some(&ValidationErrorKind::WrongType {
            expected: "object",
            found: "string",
        })
    );
    assert_eq!(err.path(), "storage");
}

/// Section semantic errors surface unchanged through `build`.
#[test]
fn surfaces_section_construction_errors() {
    let err = Config::build(&json!({ "storage": { "uds": { "type": "fs" } } })).unwrap_err();
    assert_eq!(
        err,
        ConfigError::InvalidField {
            path: "storage.uds.params.dir".to_string(),
            message: "required for fs storage".to_string(),
        }
    );
}

/// Emitted documents use the four section names in a fixed order.
#[test]
fn to_value_uses_fixed_top_level_keys() {
    let value = Config::default().to_value();
    let keys: Vec<&str> = value
        .as_object()
        .expect("object")
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["network", "topologies", "storage", "logging"]);
    assert_eq!(root_schema().validate(&value), Ok(()));
}

/// The conversion traits delegate to `build` and `to_value`.
#[test]
fn conversions_match_build_and_to_value() {
    let doc = json!({ "logging": { "level": "debug" } });
    let config = Config::try_from(&doc).expect("config");
    assert_eq!(config.logging().level(), LogLevel::Debug);
    assert_eq!(Value::from(&config), config.to_value());
}
