//! Event hub settings

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

const MAX_SUBSCRIBER_CAPACITY: usize = 10_000;

#[derive(Debug, Clone, Deserialize)]
pub struct HubConfig {
    /// Events buffered per subscriber before further events are dropped for it
    #[serde(default = "default_subscriber_capacity")]
    pub subscriber_capacity: usize,

    /// Interval between SSE keep-alive comments
    #[serde(default = "default_keep_alive")]
    pub keep_alive_secs: u64,
}

impl HubConfig {
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.subscriber_capacity == 0 || self.subscriber_capacity > MAX_SUBSCRIBER_CAPACITY {
            return Err(ValidationError::InvalidSubscriberCapacity {
                max: MAX_SUBSCRIBER_CAPACITY,
            });
        }
        if self.keep_alive_secs == 0 || self.keep_alive_secs > 300 {
            return Err(ValidationError::InvalidKeepAlive);
        }
        Ok(())
    }
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            subscriber_capacity: default_subscriber_capacity(),
            keep_alive_secs: default_keep_alive(),
        }
    }
}

fn default_subscriber_capacity() -> usize {
    10
}

fn default_keep_alive() -> u64 {
    30
}
