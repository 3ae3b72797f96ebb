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

//! Error types of the scheduling subsystem.

use crate::task::TaskId;
use std::path::PathBuf;
use thiserror::Error;

/// An error returned when attaching an entry to an existing task fails.
///
/// Plain registration never fails; only [`Scheduler::register_on`](crate::Scheduler::register_on)
/// can produce these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// The task is not (or no longer) tracked by the scheduler.
    #[error("task {0} is not tracked by the scheduler")]
    UnknownTask(TaskId),
    /// The task is repeat-limited and already owns its single entry.
    #[error("task {0} is repeat-limited and cannot hold more than one entry")]
    LimitedTaskShared(TaskId),
}

/// An error produced while loading or validating a [`SchedulerConfig`](crate::SchedulerConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read scheduler config '{path}': {source}")]
    Io {
        /// The path that failed to load.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration text is not valid JSON for the schema.
    #[error("malformed scheduler config: {0}")]
    Parse(#[from] serde_json::Error),
    /// The tick period is zero, negative, not finite or longer than an hour.
    #[error("tick period must be a positive number of milliseconds up to one hour (got {0})")]
    InvalidTickPeriod(f64),
    /// The event channel capacity is zero.
    #[error("event channel capacity must be greater than zero")]
    ZeroEventCapacity,
}
