//! Shared handle for swapping in reloaded config.
//!
//! Readers take an `Arc<Config>` snapshot and keep it for as long as they
//! need; a reload builds a complete new [`Config`] and replaces the handle's
//! pointer in one step. A document that fails to build leaves the current
//! config in place.

use crate::value::Value;
use crate::{Config, ConfigError};
use log::{info, warn};
use parking_lot::RwLock;
use std::sync::Arc;

/// Process-wide handle to the current config.
#[derive(Debug)]
pub struct SharedConfig {
    current: RwLock<Arc<Config>>,
}

impl SharedConfig {
    /// Wrap an already built config.
    pub fn new(config: Config) -> Self {
        Self {
            current: RwLock::new(Arc::new(config)),
        }
    }

    /// Build the initial config from a document.
    pub fn build(doc: &Value) -> Result<Self, ConfigError> {
        Config::build(doc).map(Self::new)
    }

    /// Snapshot of the current config.
    pub fn current(&self) -> Arc<Config> {
        self.current.read().clone()
    }

    /// Build a new config from `doc` and swap it in.
    pub fn reload(&self, doc: &Value) -> Result<Arc<Config>, ConfigError> {
        let config = match Config::build(doc) {
            Ok(config) => Arc::new(config),
            Err(err) => {
                warn!("config reload rejected: {err}");
                return Err(err);
            }
        };
        *self.current.write() = config.clone();
        info!("config reloaded");
        Ok(config)
    }
}
