// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Scheduler configuration, loadable from JSON.

use crate::error::ConfigError;
use crate::scheduler::{MAX_TICK_PERIOD, MIN_TICK_PERIOD};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// The default fallback tick period: 30 ticks per second.
pub const DEFAULT_TICK_PERIOD_MS: f64 = 1000.0 / 30.0;

/// The default bounded capacity of the scheduler event channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Which clock source the scheduler may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockPreference {
    /// Use display-synchronized frames when the host provides them,
    /// otherwise fall back to the fixed interval.
    #[default]
    Auto,
    /// Always use the fixed-interval fallback, even if frames are available.
    FixedInterval,
}

/// Settings applied when a [`Scheduler`](crate::Scheduler) is built.
///
/// Every field has a default, so an empty JSON object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Period of the fixed-interval clock source, in milliseconds.
    pub tick_period_ms: f64,
    /// Clock source selection.
    pub clock: ClockPreference,
    /// Bounded capacity of the event channel returned by `subscribe`.
    pub event_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
            clock: ClockPreference::Auto,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl SchedulerConfig {
    /// Parses and validates a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        log::info!("Loaded scheduler config from '{}'.", path.display());
        Ok(config)
    }

    /// Checks that the values can drive a scheduler.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let period = Duration::try_from_secs_f64(self.tick_period_ms / 1000.0);
        if self.tick_period_ms <= 0.0 || !period.is_ok_and(|period| period <= MAX_TICK_PERIOD) {
            return Err(ConfigError::InvalidTickPeriod(self.tick_period_ms));
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::ZeroEventCapacity);
        }
        Ok(())
    }

    /// The fallback tick period as a [`Duration`], clamped between
    /// [`MIN_TICK_PERIOD`] and [`MAX_TICK_PERIOD`].
    pub fn tick_period(&self) -> Duration {
        match Duration::try_from_secs_f64(self.tick_period_ms / 1000.0) {
            Ok(period) => period.clamp(MIN_TICK_PERIOD, MAX_TICK_PERIOD),
            Err(_) if self.tick_period_ms > 0.0 => MAX_TICK_PERIOD,
            Err(_) => MIN_TICK_PERIOD,
        }
    }
}
