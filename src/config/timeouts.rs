use std::time::Duration;

use serde::Deserialize;

use crate::pop3::Timeouts;

/// Reply timeouts in milliseconds. Missing values fall back to the defaults
/// of [`Timeouts`].
#[derive(Debug, Default, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    greeting_ms: Option<u64>,
    command_ms: Option<u64>,
    uidl_ms: Option<u64>,
    list_ms: Option<u64>,
    retrieve_ms: Option<u64>,
}

impl From<TimeoutConfig> for Timeouts {
    fn from(value: TimeoutConfig) -> Self {
        let defaults = Timeouts::default();
        let or_default =
            |millis: Option<u64>, default: Duration| millis.map_or(default, Duration::from_millis);

        Timeouts::new(
            or_default(value.greeting_ms, defaults.greeting()),
            or_default(value.command_ms, defaults.command()),
            or_default(value.uidl_ms, defaults.uidl()),
            or_default(value.list_ms, defaults.list()),
            or_default(value.retrieve_ms, defaults.retrieve()),
        )
    }
}
