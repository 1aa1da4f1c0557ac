//! Process configuration for the hash layer
//!
//! Layered with figment: defaults, then an optional TOML file, then
//! `TLS_HASH_*` environment variables.

use crate::Result;
use crate::mode;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "TLS_HASH_";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashConfig {
    /// Initial value of the process-wide certified-mode switch
    #[serde(default)]
    pub certified_mode: bool,
}

impl HashConfig {
    /// Create a test configuration
    pub fn test() -> Self {
        Self {
            certified_mode: true,
        }
    }

    /// Configuration layers, with `path` read only if it exists
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(HashConfig::default()));

        if let Some(path) = path.filter(|path| path.exists()) {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Load from defaults and the environment
    pub fn load() -> Result<Self> {
        Ok(Self::figment(None).extract()?)
    }

    /// Load from defaults, the TOML file at `path` and the environment
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading hash configuration from {}", path.display());
        Ok(Self::figment(Some(path)).extract()?)
    }

    /// Install this configuration on the process-wide switches
    pub fn apply(&self) {
        mode::set_certified_mode(self.certified_mode);
    }
}
