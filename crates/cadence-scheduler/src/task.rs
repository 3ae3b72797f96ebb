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

//! Tasks: fixed-period accumulators grouping callback entries.
//!
//! A task owes `accumulated_wait` of virtual time before its next fire. Each
//! tick pays the elapsed wall time into that debt; once the debt is covered the
//! task fires and hands its entries the *real* time since the previous fire
//! (drift correction), then carries the overshoot into the next period.

use crate::callback::{ContextRef, TickCallback};
use std::fmt;
use std::time::Duration;

/// Identifies a task tracked by a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub(crate) u64);

impl TaskId {
    /// The per-tick task every plain registration lands on.
    pub const DEFAULT: TaskId = TaskId(0);
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An opaque handle to one registration.
///
/// Unlike [`Scheduler::unregister`](crate::Scheduler::unregister), cancelling
/// through a handle removes exactly one entry even when the same callback and
/// context were registered several times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryHandle {
    pub(crate) id: u64,
    pub(crate) task: TaskId,
}

impl EntryHandle {
    /// The task owning this entry.
    pub fn task(&self) -> TaskId {
        self.task
    }
}

/// How many times a task fires before its entry is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatLimit {
    /// Fire until explicitly unregistered.
    #[default]
    Unlimited,
    /// Fire this many times.
    Times(u32),
}

/// The pure timing half of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accumulator {
    target_period: Duration,
    accumulated_wait: Duration,
}

impl Accumulator {
    /// Creates an accumulator owing one full period.
    pub fn new(target_period: Duration) -> Self {
        Self {
            target_period,
            accumulated_wait: target_period,
        }
    }

    /// The fixed period between fires.
    pub fn target_period(&self) -> Duration {
        self.target_period
    }

    /// The virtual time still owed before the next fire, always within `[0, target_period]`.
    pub fn accumulated_wait(&self) -> Duration {
        self.accumulated_wait
    }

    /// Pays `elapsed` into the accumulator.
    ///
    /// Returns `None` while `accumulated_wait > elapsed`. Otherwise returns the
    /// drift-corrected delta `target_period + elapsed - accumulated_wait`, and
    /// the new wait becomes `target_period - (elapsed - accumulated_wait)`
    /// floored at zero.
    pub fn advance(&mut self, elapsed: Duration) -> Option<Duration> {
        if self.accumulated_wait > elapsed {
            self.accumulated_wait -= elapsed;
            return None;
        }

        let overshoot = elapsed - self.accumulated_wait;
        let fire_delta = self.target_period + overshoot;
        self.accumulated_wait = self.target_period.saturating_sub(overshoot);
        Some(fire_delta)
    }
}

/// One registration on a task.
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub(crate) handle: EntryHandle,
    pub(crate) active: bool,
    pub(crate) callback: TickCallback,
    pub(crate) context: ContextRef,
}

impl Entry {
    pub(crate) fn matches(&self, callback: &TickCallback, context: &ContextRef) -> bool {
        self.callback.same_as(callback) && self.context.same_as(context)
    }
}

/// A tracked accumulator plus its entries, in registration order.
#[derive(Debug)]
pub(crate) struct Task {
    pub(crate) id: TaskId,
    pub(crate) accumulator: Accumulator,
    pub(crate) remaining: RepeatLimit,
    pub(crate) entries: Vec<Entry>,
}

impl Task {
    pub(crate) fn new(id: TaskId, period: Duration, limit: RepeatLimit) -> Self {
        Self {
            id,
            accumulator: Accumulator::new(period),
            remaining: limit,
            entries: Vec::new(),
        }
    }

    pub(crate) fn is_limited(&self) -> bool {
        matches!(self.remaining, RepeatLimit::Times(_))
    }

    /// Counts one fire against the repeat limit.
    ///
    /// Returns `true` when the limit has just been exhausted.
    pub(crate) fn consume_fire(&mut self) -> bool {
        match &mut self.remaining {
            RepeatLimit::Unlimited => false,
            RepeatLimit::Times(left) => {
                *left = left.saturating_sub(1);
                *left == 0
            }
        }
    }
}
