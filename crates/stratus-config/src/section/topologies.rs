//! Topologies section: topologies created when the server starts.

use super::{Section, invalid_field};
use crate::ConfigError;
use crate::schema::{Schema, compile_builtin};
use crate::value::join_path;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const TOPOLOGIES_SCHEMA: &str = r#"{
    "type": "object",
    "additionalProperties": {
        "type": "object",
        "properties": {
            "bql_file": { "type": "string" }
        },
        "additionalProperties": false
    }
}"#;

/// Topology names start with a letter and stay within 127 characters.
const TOPOLOGY_NAME_PATTERN: &str = r"^[a-zA-Z][a-zA-Z0-9_]{0,126}$";

static SCHEMA: LazyLock<Schema> = LazyLock::new(|| compile_builtin(TOPOLOGIES_SCHEMA));

static TOPOLOGY_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(TOPOLOGY_NAME_PATTERN)
        .unwrap_or_else(|err| panic!("built-in topology name pattern is invalid: {err}"))
});

/// A topology to create on startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    #[serde(skip)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bql_file: Option<PathBuf>,
}

impl Topology {
    /// Name the topology is created under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// BQL file executed right after the topology is created, if any.
    pub fn bql_file(&self) -> Option<&Path> {
        self.bql_file.as_deref()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let path = join_path(Topologies::NAME, &self.name);
        if !TOPOLOGY_NAME.is_match(&self.name) {
            return Err(invalid_field(
                &path,
                format!("topology name must match {TOPOLOGY_NAME_PATTERN}"),
            ));
        }
        if self
            .bql_file
            .as_deref()
            .is_some_and(|file| file.as_os_str().is_empty())
        {
            return Err(invalid_field(
                join_path(&path, "bql_file"),
                "must not be empty",
            ));
        }
        Ok(())
    }
}

/// Topologies keyed by name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, Topology>",
    into = "BTreeMap<String, Topology>"
)]
pub struct Topologies {
    topologies: BTreeMap<String, Topology>,
}

impl From<BTreeMap<String, Topology>> for Topologies {
    fn from(mut topologies: BTreeMap<String, Topology>) -> Self {
        for (name, topology) in &mut topologies {
            topology.name.clone_from(name);
        }
        Self { topologies }
    }
}

impl From<Topologies> for BTreeMap<String, Topology> {
    fn from(topologies: Topologies) -> Self {
        topologies.topologies
    }
}

impl Topologies {
    /// Look up a topology by name.
    pub fn get(&self, name: &str) -> Option<&Topology> {
        self.topologies.get(name)
    }

    /// Topologies in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Topology> {
        self.topologies.values()
    }

    /// Number of topologies.
    pub fn len(&self) -> usize {
        self.topologies.len()
    }

    /// Whether no topologies are configured.
    pub fn is_empty(&self) -> bool {
        self.topologies.is_empty()
    }
}

impl Section for Topologies {
    const NAME: &'static str = "topologies";
    const SCHEMA: &'static str = TOPOLOGIES_SCHEMA;

    fn schema() -> &'static Schema {
        &SCHEMA
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.iter().try_for_each(Topology::validate)
    }
}
