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

//! # Cadence Scheduler
//!
//! A single-clock task scheduler. Many independently timed callbacks, either
//! per-tick, periodic, delayed or repeat-limited, share one clock subscription.
//! Each task runs a fixed-period accumulator with drift correction, so
//! callbacks always receive the real time since their previous fire.
//!
//! The clock is either display-synchronized (the host delivers frames through
//! [`Scheduler::on_frame`]) or a fixed-interval ticker thread drained with
//! [`Scheduler::pump`] or [`Scheduler::run_for`].

#![warn(missing_docs)]

pub mod callback;
pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod scheduler;
pub mod task;

#[cfg(feature = "winit")]
pub mod winit;

pub use callback::{GroupKey, GroupMember, TickCallback, TickContext};
pub use clock::{ClockMode, ClockSource, DisplaySyncClock, FrameRequester, IntervalClock};
pub use config::{ClockPreference, SchedulerConfig};
pub use error::{ConfigError, SchedulerError};
pub use event::SchedulerEvent;
pub use scheduler::{
    Scheduler, SchedulerBuilder, SchedulerStats, WeakScheduler, MAX_TICK_PERIOD,
    MIN_TICK_PERIOD,
};
pub use task::{Accumulator, EntryHandle, RepeatLimit, TaskId};
