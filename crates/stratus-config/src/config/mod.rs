//! Root config: composes the section schemas and builds the typed tree.
//!
//! The whole document is validated against the composed schema before any
//! section is built, so shape errors are reported with their full path no
//! matter which section they occur in. Sections are then built in a fixed
//! order; the first failure aborts the build.

#[cfg(test)]
mod tests;

use crate::ConfigError;
use crate::schema::{Schema, compile_builtin};
use crate::section::{Logging, Network, Section, Storage, Topologies, encode};
use crate::value::{Map, MapExt, Value, ValueExt};
use log::{debug, info};
use serde::Serialize;
use std::sync::LazyLock;

static ROOT_SCHEMA_TEXT: LazyLock<String> = LazyLock::new(|| {
    format!(
        r#"{{
    "type": "object",
    "properties": {{
        "{}": {},
        "{}": {},
        "{}": {},
        "{}": {}
    }},
    "additionalProperties": false
}}"#,
        Network::NAME,
        Network::SCHEMA,
        Topologies::NAME,
        Topologies::SCHEMA,
        Storage::NAME,
        Storage::SCHEMA,
        Logging::NAME,
        Logging::SCHEMA,
    )
});

static ROOT_SCHEMA: LazyLock<Schema> = LazyLock::new(|| compile_builtin(&ROOT_SCHEMA_TEXT));

/// Text of the composed top-level schema.
pub fn root_schema_text() -> &'static str {
    &ROOT_SCHEMA_TEXT
}

/// The compiled top-level schema.
pub fn root_schema() -> &'static Schema {
    &ROOT_SCHEMA
}

/// Root of the server configuration tree.
///
/// Every section is always present; sections missing from the source
/// document hold their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Config {
    network: Network,
    topologies: Topologies,
    storage: Storage,
    logging: Logging,
}

impl Config {
    /// Validate a generic document and build the typed config.
    pub fn build(doc: &Value) -> Result<Self, ConfigError> {
        root_schema().validate(doc)?;
        let map = doc.expect_object("")?;
        debug!("config document validated (keys={})", map.len());

        let config = Self {
            network: build_section(map)?,
            topologies: build_section(map)?,
            storage: build_section(map)?,
            logging: build_section(map)?,
        };
        info!(
            "config built (listen={}, topologies={}, storage={}, log_level={})",
            config.network.socket_addr(),
            config.topologies.len(),
            config.storage.uds().type_name(),
            config.logging.level()
        );
        Ok(config)
    }

    /// Convert back to the generic form accepted by [`Config::build`].
    ///
    /// Top-level keys are always `network`, `topologies`, `storage` and
    /// `logging`, in that order.
    pub fn to_value(&self) -> Value {
        encode(self)
    }

    /// Listener settings.
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Topologies to create on startup.
    pub fn topologies(&self) -> &Topologies {
        &self.topologies
    }

    /// Storage backends.
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Logging settings.
    pub fn logging(&self) -> &Logging {
        &self.logging
    }
}

impl TryFrom<&Value> for Config {
    type Error = ConfigError;

    fn try_from(doc: &Value) -> Result<Self, Self::Error> {
        Self::build(doc)
    }
}

impl From<&Config> for Value {
    fn from(config: &Config) -> Self {
        config.to_value()
    }
}

/// Build one section from its key in the document, or from an empty map.
fn build_section<S: Section>(doc: &Map<String, Value>) -> Result<S, ConfigError> {
    let empty = Value::Object(Map::new());
    let section = S::from_value(doc.get_or(S::NAME, &empty))?;
    debug!("built config section: {}", S::NAME);
    Ok(section)
}
