use derive_getters::Getters;
use serde::Deserialize;

use crate::config::{AuthConfig, TimeoutConfig};

#[derive(Debug, Deserialize, Getters)]
pub struct AccountConfig {
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    auth: AuthConfig,
    #[serde(default)]
    #[getter(copy)]
    timeouts: TimeoutConfig,
}

fn default_port() -> u16 {
    110
}
