//! Network section: where the server listens.

use super::{Section, integral, invalid_field};
use crate::ConfigError;
use crate::schema::{Schema, compile_builtin};
use crate::value::join_path;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::LazyLock;

/// Default port the server listens on.
pub const DEFAULT_LISTEN_PORT: u16 = 15601;

/// Default address the server binds to (all interfaces).
pub const DEFAULT_LISTEN_ADDRESS: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

const NETWORK_SCHEMA: &str = r#"{
    "type": "object",
    "properties": {
        "listen_address": { "type": "string" },
        "listen_port": { "type": "integer", "minimum": 1, "maximum": 65535 }
    },
    "additionalProperties": false
}"#;

static SCHEMA: LazyLock<Schema> = LazyLock::new(|| compile_builtin(NETWORK_SCHEMA));

/// Listener settings.
///
/// `listen_address` is kept as written and checked in [`Section::validate`],
/// so the emitted value matches the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    #[serde(default = "default_listen_address")]
    listen_address: String,
    #[serde(default = "default_listen_port", deserialize_with = "integral")]
    listen_port: u16,
}

fn default_listen_address() -> String {
    DEFAULT_LISTEN_ADDRESS.to_string()
}

fn default_listen_port() -> u16 {
    DEFAULT_LISTEN_PORT
}

impl Default for Network {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            listen_port: default_listen_port(),
        }
    }
}

impl Network {
    /// Address the listener binds to.
    ///
    /// Built sections always hold a valid address; a section decoded without
    /// [`Section::from_value`] falls back to [`DEFAULT_LISTEN_ADDRESS`].
    pub fn listen_address(&self) -> IpAddr {
        self.listen_address.parse().unwrap_or(DEFAULT_LISTEN_ADDRESS)
    }

    /// Port the listener binds to.
    pub fn listen_port(&self) -> u16 {
        self.listen_port
    }

    /// Socket address the listener should bind.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.listen_address(), self.listen_port)
    }
}

impl Section for Network {
    const NAME: &'static str = "network";
    const SCHEMA: &'static str = NETWORK_SCHEMA;

    fn schema() -> &'static Schema {
        &SCHEMA
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.listen_address.parse::<IpAddr>().is_err() {
            return Err(invalid_field(
                join_path(Self::NAME, "listen_address"),
                format!("expected an IP address, found `{}`", self.listen_address),
            ));
        }
        Ok(())
    }
}
