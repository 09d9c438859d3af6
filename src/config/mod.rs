mod account;
mod auth;
mod popmail;
mod timeouts;

use std::{env, io, path::PathBuf};

use thiserror::Error;

pub use account::AccountConfig;
pub use auth::AuthConfig;
pub use popmail::Config;
pub use timeouts::TimeoutConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {path:?} failed: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("config {path:?} is invalid: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("neither XDG_CONFIG_HOME nor HOME is set")]
    NoConfigHome,
    #[error("no account named {0} in config")]
    UnknownAccount(String),
    #[error("password_cmd failed: {0}")]
    PasswordCommand(String),
}

fn default_location() -> Result<PathBuf, ConfigError> {
    let mut config_file = if let Some(config_home) = env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(config_home)
    } else {
        let mut config_home = PathBuf::from(env::var_os("HOME").ok_or(ConfigError::NoConfigHome)?);
        config_home.push(".config");
        config_home
    };
    config_file.push(env!("CARGO_PKG_NAME"));
    config_file.push("config.toml");

    Ok(config_file)
}
