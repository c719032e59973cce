//! Storage section: where stateful components keep their state.

use super::{Section, invalid_field};
use crate::ConfigError;
use crate::schema::{Schema, compile_builtin};
use crate::value::join_path;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const STORAGE_SCHEMA: &str = r#"{
    "type": "object",
    "properties": {
        "uds": {
            "type": "object",
            "properties": {
                "type": { "type": "string", "enum": ["in_memory", "fs"] },
                "params": {
                    "type": "object",
                    "properties": {
                        "dir": { "type": "string" },
                        "temp_dir": { "type": "string" }
                    },
                    "additionalProperties": false
                }
            },
            "additionalProperties": false
        }
    },
    "additionalProperties": false
}"#;

static SCHEMA: LazyLock<Schema> = LazyLock::new(|| compile_builtin(STORAGE_SCHEMA));

/// Kind of backend for user-defined states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UdsKind {
    /// States live in memory and are lost on shutdown.
    #[default]
    InMemory,
    /// States are saved as files under `params.dir`.
    Fs,
}

impl UdsKind {
    /// Value of the `type` key for this backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InMemory => "in_memory",
            Self::Fs => "fs",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
struct UdsParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    temp_dir: Option<PathBuf>,
}

/// Backend for user-defined states.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UdsStorage {
    #[serde(rename = "type", default)]
    kind: UdsKind,
    #[serde(default)]
    params: UdsParams,
}

impl UdsStorage {
    /// Backend kind.
    pub fn kind(&self) -> UdsKind {
        self.kind
    }

    /// Value of the `type` key for this backend.
    pub fn type_name(&self) -> &'static str {
        self.kind.as_str()
    }

    /// Directory states are saved under; set for `fs` storage.
    pub fn dir(&self) -> Option<&Path> {
        self.params.dir.as_deref()
    }

    /// Scratch directory for in-progress saves; `dir` is used when absent.
    pub fn temp_dir(&self) -> Option<&Path> {
        self.params.temp_dir.as_deref()
    }

    fn validate(&self, path: &str) -> Result<(), ConfigError> {
        let params_path = join_path(path, "params");
        match self.kind {
            UdsKind::InMemory => {
                if self.params != UdsParams::default() {
                    return Err(invalid_field(
                        params_path,
                        "in_memory storage does not take params",
                    ));
                }
            }
            UdsKind::Fs => {
                let Some(dir) = &self.params.dir else {
                    return Err(invalid_field(
                        join_path(&params_path, "dir"),
                        "required for fs storage",
                    ));
                };
                non_empty_path(dir, &params_path, "dir")?;
                if let Some(temp_dir) = &self.params.temp_dir {
                    non_empty_path(temp_dir, &params_path, "temp_dir")?;
                }
            }
        }
        Ok(())
    }
}

fn non_empty_path(path: &Path, prefix: &str, key: &str) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(invalid_field(join_path(prefix, key), "must not be empty"));
    }
    Ok(())
}

/// Storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Storage {
    #[serde(default)]
    uds: UdsStorage,
}

impl Storage {
    /// Backend for user-defined states.
    pub fn uds(&self) -> &UdsStorage {
        &self.uds
    }
}

impl Section for Storage {
    const NAME: &'static str = "storage";
    const SCHEMA: &'static str = STORAGE_SCHEMA;

    fn schema() -> &'static Schema {
        &SCHEMA
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.uds.validate(&join_path(Self::NAME, "uds"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::json;
    use pretty_assertions::assert_eq;

    /// Absent `uds` and an empty `uds` both mean in-memory states.
    #[test]
    fn defaults_to_in_memory() {
        let storage = Storage::from_value(&json!({})).expect("storage");
        assert_eq!(storage.uds().kind(), UdsKind::InMemory);
        assert_eq!(storage.uds().dir(), None);
        let storage = Storage::from_value(&json!({ "uds": {} })).expect("storage");
        assert_eq!(storage, Storage::default());
    }

    /// `fs` storage reads both directories.
    #[test]
    fn reads_fs_storage() {
        let storage = Storage::from_value(&json!({
            "uds": { "type": "fs", "params": { "dir": "/var/lib/stratus", "temp_dir": "/tmp" } }
        }))
        .expect("storage");
        assert_eq!(storage.uds().kind(), UdsKind::Fs);
        assert_eq!(storage.uds().dir(), Some(Path::new("/var/lib/stratus")));
        assert_eq!(storage.uds().temp_dir(), Some(Path::new("/tmp")));
        assert_eq!(storage.uds().type_name(), "fs");
    }

    /// `fs` needs a directory; the schema alone cannot express that.
    #[test]
    fn fs_storage_requires_dir() {
        let err = Storage::from_value(&json!({ "uds": { "type": "fs" } })).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidField {
                path: "storage.uds.params.dir".to_string(),
                message: "required for fs storage".to_string(),
            }
        );
    }

    /// Empty directory paths are rejected with the key that holds them.
    #[test]
    fn fs_storage_rejects_empty_paths() {
        let err = Storage::from_value(&json!({
            "uds": { "type": "fs", "params": { "dir": "/data", "temp_dir": "" } }
        }))
        .unwrap_err();
        assert_eq!(err.path(), "storage.uds.params.temp_dir");
    }

    /// In-memory storage has nothing to configure.
    #[test]
    fn in_memory_rejects_params() {
        let err = Storage::from_value(&json!({
            "uds": { "type": "in_memory", "params": { "dir": "/data" } }
        }))
        .unwrap_err();
        assert_eq!(err.path(), "storage.uds.params");
        let explicit = json!({ "uds": { "type": "in_memory", "params": {} } });
        assert_eq!(Storage::from_value(&explicit), Ok(Storage::default()));
    }

    /// Unknown backend types and params fail schema validation.
    #[test]
    fn rejects_unknown_type_and_param() {
        let err = Storage::from_value(&json!({ "uds": { "type": "s3" } })).unwrap_err();
        assert_eq!(err.path(), "storage.uds.type");
        assert!(err.as_validation().is_some());

        let err = Storage::from_value(&json!({
            "uds": { "type": "fs", "params": { "dir": "/data", "mode": "0700" } }
        }))
        .unwrap_err();
        assert_eq!(err.path(), "storage.uds.params.mode");
    }

    /// Absent optional params stay absent in the emitted value.
    #[test]
    fn round_trips_through_value() {
        let storage = Storage::from_value(&json!({
            "uds": { "type": "fs", "params": { "dir": "/data" } }
        }))
        .expect("storage");
        let value = storage.to_value();
        assert_eq!(
            value,
            json!({ "uds": { "type": "fs", "params": { "dir": "/data" } } })
        );
        assert_eq!(Storage::from_value(&value), Ok(storage));

        let value = Storage::default().to_value();
        assert_eq!(value, json!({ "uds": { "type": "in_memory", "params": {} } }));
        assert_eq!(Storage::from_value(&value), Ok(Storage::default()));
    }
}
