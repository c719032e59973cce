//! Typed, validated configuration for the Stratus server.
//!
//! This crate turns an already-parsed generic document (a `serde_json`
//! value) into a [`Config`] with four sections: `network`, `topologies`,
//! `storage` and `logging`. It owns the config schema, per-section defaults
//! and semantic checks, and the reverse mapping back to a generic value. It
//! does not read files or parse text documents.
//!
//! ```
//! use stratus_config::{Config, value::json};
//!
//! let config = Config::build(&json!({
//!     "network": { "listen_port": 8090 },
//!     "logging": { "level": "warn" }
//! }))?;
//! assert_eq!(config.network().listen_port(), 8090);
//! assert_eq!(config.logging().level().as_str(), "warn");
//! assert_eq!(Config::build(&config.to_value())?, config);
//! # Ok::<(), stratus_config::ConfigError>(())
//! ```

mod config;
mod error;
pub mod schema;
mod section;
mod shared;
pub mod value;

/// Root config and the composed top-level schema.
pub use config::{Config, root_schema, root_schema_text};
/// Public error types returned by validation and building.
pub use error::{ConfigError, SchemaCompileError, ValidationError, ValidationErrorKind};
/// Section types and the trait they share.
pub use section::{
    LogLevel, LogTarget, Logging, Network, Section, Storage, Topologies, Topology, UdsKind,
    UdsStorage,
};
/// Reloadable config handle.
pub use shared::SharedConfig;
