use std::{collections::HashMap, fs::read_to_string, path::PathBuf};

use log::debug;
use serde::Deserialize;

use crate::config::{AccountConfig, ConfigError, default_location};

#[derive(Debug, Deserialize)]
pub struct Config {
    accounts: HashMap<String, AccountConfig>,
}

impl Config {
    pub fn load_from_file(file: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = match file {
            Some(file) => file,
            None => default_location()?,
        };
        debug!("loading config from {}", path.display());
        let contents = match read_to_string(&path) {
            Ok(contents) => contents,
            Err(source) => return Err(ConfigError::Io { path, source }),
        };

        toml::from_str(&contents).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn account(&self, name: &str) -> Result<&AccountConfig, ConfigError> {
        self.accounts
            .get(name)
            .ok_or_else(|| ConfigError::UnknownAccount(name.to_string()))
    }
}
