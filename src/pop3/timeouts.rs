use std::time::Duration;

use derive_getters::Getters;

/// Upper bounds for waiting on replies, per kind of command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters)]
pub struct Timeouts {
    #[getter(copy)]
    greeting: Duration,
    #[getter(copy)]
    command: Duration,
    #[getter(copy)]
    uidl: Duration,
    #[getter(copy)]
    list: Duration,
    #[getter(copy)]
    retrieve: Duration,
}

impl Timeouts {
    pub fn new(
        greeting: Duration,
        command: Duration,
        uidl: Duration,
        list: Duration,
        retrieve: Duration,
    ) -> Self {
        Self {
            greeting,
            command,
            uidl,
            list,
            retrieve,
        }
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            greeting: Duration::from_secs(1),
            command: Duration::from_secs(1),
            uidl: Duration::from_secs(1),
            list: Duration::from_secs(5),
            retrieve: Duration::from_secs(30),
        }
    }
}
