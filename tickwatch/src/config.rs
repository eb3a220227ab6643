use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::tick_scheduler::MIN_TICK_PERIOD;

pub const DEFAULT_TICK_RESOLUTION_MILLIS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopwatchConfig {
    /// Milliseconds between two listener notifications.
    pub tick_resolution_millis: u64,
    /// `false` turns the stopwatch into a countdown from the last `set_elapsed` value.
    pub count_up: bool,
}

impl Default for StopwatchConfig {
    fn default() -> Self {
        Self {
            tick_resolution_millis: DEFAULT_TICK_RESOLUTION_MILLIS,
            count_up: true,
        }
    }
}

impl StopwatchConfig {
    pub fn count_up(tick_resolution_millis: u64) -> Self {
        Self {
            tick_resolution_millis,
            count_up: true,
        }
    }

    pub fn count_down(tick_resolution_millis: u64) -> Self {
        Self {
            tick_resolution_millis,
            count_up: false,
        }
    }

    pub fn tick_resolution(&self) -> Duration {
        let tick_resolution = Duration::from_millis(self.tick_resolution_millis);
        if tick_resolution < MIN_TICK_PERIOD {
            log::warn!(
                "tick resolution of {} ms raised to {:?}",
                self.tick_resolution_millis,
                MIN_TICK_PERIOD
            );
            MIN_TICK_PERIOD
        } else {
            tick_resolution
        }
    }
}
