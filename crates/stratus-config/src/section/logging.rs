//! Logging section.

use super::{Section, invalid_field};
use crate::ConfigError;
use crate::schema::{Schema, compile_builtin};
use crate::value::join_path;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const LOGGING_SCHEMA: &str = r#"{
    "type": "object",
    "properties": {
        "target": { "type": "string" },
        "level": {
            "type": "string",
            "enum": ["debug", "info", "warn", "error", "fatal"]
        },
        "log_dropped_tuples": { "type": "boolean" },
        "summarize_dropped_tuples": { "type": "boolean" }
    },
    "additionalProperties": false
}"#;

static SCHEMA: LazyLock<Schema> = LazyLock::new(|| compile_builtin(LOGGING_SCHEMA));

/// Minimum severity written to the log target.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    /// Name of the level as written in config.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
        }
    }

    /// Filter to install on a `log` backend. `log` has no fatal level, so
    /// fatal maps onto error.
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            Self::Debug => LevelFilter::Debug,
            Self::Info => LevelFilter::Info,
            Self::Warn => LevelFilter::Warn,
            Self::Error | Self::Fatal => LevelFilter::Error,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where log records are written.
///
/// Written in config as `"stderr"`, `"stdout"` or a file path.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LogTarget {
    #[default]
    Stderr,
    Stdout,
    File(PathBuf),
}

impl LogTarget {
    /// Path of the log file, for file targets.
    pub fn file(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            _ => None,
        }
    }
}

impl From<String> for LogTarget {
    fn from(target: String) -> Self {
        match target.as_str() {
            "stderr" => Self::Stderr,
            "stdout" => Self::Stdout,
            _ => Self::File(PathBuf::from(target)),
        }
    }
}

impl From<LogTarget> for String {
    fn from(target: LogTarget) -> Self {
        match target {
            LogTarget::Stderr => "stderr".to_string(),
            LogTarget::Stdout => "stdout".to_string(),
            LogTarget::File(path) => path.to_string_lossy().into_owned(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Logging {
    target: LogTarget,
    level: LogLevel,
    log_dropped_tuples: bool,
    summarize_dropped_tuples: bool,
}

impl Logging {
    /// Destination of log records.
    pub fn target(&self) -> &LogTarget {
        &self.target
    }

    /// Minimum severity to log.
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Whether tuples dropped inside topologies are logged.
    pub fn log_dropped_tuples(&self) -> bool {
        self.log_dropped_tuples
    }

    /// Whether dropped tuples are logged as summaries instead of in full.
    pub fn summarize_dropped_tuples(&self) -> bool {
        self.summarize_dropped_tuples
    }
}

impl Section for Logging {
    const NAME: &'static str = "logging";
    const SCHEMA: &'static str = LOGGING_SCHEMA;

    fn schema() -> &'static Schema {
        &SCHEMA
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self
            .target
            .file()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            return Err(invalid_field(
                join_path(Self::NAME, "target"),
                "must not be empty",
            ));
        }
        if self.summarize_dropped_tuples && !self.log_dropped_tuples {
            return Err(invalid_field(
                join_path(Self::NAME, "summarize_dropped_tuples"),
                "requires log_dropped_tuples to be enabled",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::json;
    use pretty_assertions::assert_eq;

    /// An empty section logs at info to stderr without dropped tuples.
    #[test]
    fn empty_section_uses_defaults() {
        let logging = Logging::from_value(&json!({})).expect("logging");
        assert_eq!(logging, Logging::default());
        assert_eq!(logging.target(), &LogTarget::Stderr);
        assert_eq!(logging.level(), LogLevel::Info);
        assert!(!logging.log_dropped_tuples());
        assert!(!logging.summarize_dropped_tuples());
    }

    /// A target other than stderr/stdout is a file path.
    #[test]
    fn reads_file_target_and_level() {
        let logging = Logging::from_value(&json!({
            "target": "/var/log/stratus.log",
            "level": "fatal",
            "log_dropped_tuples": true,
            "summarize_dropped_tuples": true
        }))
        .expect("logging");
        assert_eq!(
            logging.target().file(),
            Some(Path::new("/var/log/stratus.log"))
        );
        assert_eq!(logging.level(), LogLevel::Fatal);
        assert_eq!(logging.level().to_level_filter(), LevelFilter::Error);
        assert!(logging.summarize_dropped_tuples());
    }

    /// Level names outside the enumeration fail schema validation.
    #[test]
    fn rejects_unknown_level() {
        let err = Logging::from_value(&json!({ "level": "verbose" })).unwrap_err();
        assert_eq!(err.path(), "logging.level");
        assert!(err.to_string().contains("expected one of [debug, info, warn, error, fatal]"));
    }

    /// An empty target names no destination.
    #[test]
    fn rejects_empty_target() {
        let err = Logging::from_value(&json!({ "target": "" })).unwrap_err();
        assert_eq!(err.path(), "logging.target");
    }

    /// Summaries only make sense when dropped tuples are logged at all.
    #[test]
    fn summarize_requires_log_dropped_tuples() {
        let err =
            Logging::from_value(&json!({ "summarize_dropped_tuples": true })).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidField {
                path: "logging.summarize_dropped_tuples".to_string(),
                message: "requires log_dropped_tuples to be enabled".to_string(),
            }
        );
    }

    /// Level names decode and encode as their lowercase config names.
    #[test]
    fn level_names_round_trip() {
        for level in [
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
            LogLevel::Fatal,
        ] {
            let encoded = serde_json::to_value(level).expect("encode");
            assert_eq!(encoded, json!(level.as_str()));
            assert_eq!(serde_json::from_value::<LogLevel>(encoded).ok(), Some(level));
        }
        assert_eq!(LogLevel::Warn.to_string(), "warn");
        assert!(LogLevel::Debug < LogLevel::Fatal);
    }

    /// Every field is written out, including defaults.
    #[test]
    fn to_value_emits_every_field() {
        let logging = Logging::from_value(&json!({ "target": "stdout", "level": "warn" }))
            .expect("logging");
        let value = logging.to_value();
        assert_eq!(
            value,
            json!({
                "target": "stdout",
                "level": "warn",
                "log_dropped_tuples": false,
                "summarize_dropped_tuples": false
            })
        );
        assert_eq!(Logging::from_value(&value), Ok(logging));
    }
}
