use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Optional file read from the working directory.
pub const CONFIG_FILE: &str = "config.toml";
/// Prefix for environment overrides, e.g. `ZOMATO_DATABASE_URL`.
pub const ENV_PREFIX: &str = "ZOMATO_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub loglevel: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:zomato.db".to_string(),
            loglevel: "info".to_string(),
        }
    }
}

impl Config {
    /// Defaults, then `config.toml`, then `ZOMATO_*` environment variables.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load() -> Result<Self> {
        Ok(Self::figment().extract()?)
    }
}
