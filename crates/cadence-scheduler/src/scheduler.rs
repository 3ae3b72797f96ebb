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

//! The single-clock scheduler.
//!
//! A [`Scheduler`] multiplexes every registered callback onto one clock
//! subscription. Each tick's elapsed time is forwarded to every tracked task;
//! each task decides on its own whether it is due and, if so, fires its entries
//! newest first with a drift-corrected delta.
//!
//! Callbacks may freely register, unregister or cancel from inside a fire. The
//! scheduler never holds a borrow of its own state while user code runs: the
//! handles of a task's entries are captured newest first when it fires, and
//! each entry is looked up again by handle right before it is invoked. Entries
//! removed mid-pass are skipped; entries added mid-pass wait for the next fire.

use crate::callback::{ContextRef, GroupKey, TickCallback, TickContext};
use crate::clock::{self, ClockMode, ClockSource, FrameRequester};
use crate::config::{ClockPreference, SchedulerConfig};
use crate::error::{ConfigError, SchedulerError};
use crate::event::{EventChannel, SchedulerEvent};
use crate::task::{Entry, EntryHandle, RepeatLimit, Task, TaskId};
use std::any::Any;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

/// The smallest tick period and the smallest elapsed value of a fixed-interval tick.
pub const MIN_TICK_PERIOD: Duration = Duration::from_millis(1);

/// The largest tick period a scheduler accepts.
pub const MAX_TICK_PERIOD: Duration = Duration::from_secs(60 * 60);

/// A snapshot of the scheduler's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Dispatched ticks.
    pub ticks: u64,
    /// Callback invocations that returned `Ok`.
    pub fires: u64,
    /// Callback invocations that returned an error or panicked.
    pub failures: u64,
    /// Clock source activations.
    pub starts: u64,
    /// Clock source deactivations.
    pub stops: u64,
}

struct State {
    /// Tracked tasks. Index 0 is always the default task.
    tasks: Vec<Task>,
    running: bool,
    last_fire_time: Duration,
    tick_period: Duration,
    next_task_id: u64,
    next_entry_id: u64,
    stats: SchedulerStats,
}

impl State {
    fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    fn allocate_task_id(&mut self) -> TaskId {
        let id = TaskId(self.next_task_id);
        self.next_task_id += 1;
        id
    }

    fn allocate_handle(&mut self, task: TaskId) -> EntryHandle {
        let handle = EntryHandle {
            id: self.next_entry_id,
            task,
        };
        self.next_entry_id += 1;
        handle
    }

    fn is_idle(&self) -> bool {
        self.tasks.iter().all(|task| task.entries.is_empty())
    }
}

struct Inner {
    state: RefCell<State>,
    clock: RefCell<Box<dyn ClockSource>>,
    /// Fixed for the scheduler's lifetime; read without borrowing `clock`.
    mode: ClockMode,
    events: EventChannel,
    epoch: Instant,
}

/// A handle to a scheduler.
///
/// Clones share the same scheduler. The handle is deliberately `!Send`: the
/// scheduler and every callback it drives live on one thread.
///
/// Callbacks that need to talk back to the scheduler should capture a
/// [`WeakScheduler`] rather than a clone, otherwise the scheduler keeps itself
/// alive through its own entries.
#[derive(Clone)]
pub struct Scheduler {
    inner: Rc<Inner>,
}

/// A non-owning handle to a [`Scheduler`].
#[derive(Clone)]
pub struct WeakScheduler {
    inner: Weak<Inner>,
}

impl WeakScheduler {
    /// Returns the scheduler if it is still alive.
    pub fn upgrade(&self) -> Option<Scheduler> {
        self.inner.upgrade().map(|inner| Scheduler { inner })
    }
}

impl Scheduler {
    fn from_parts(config: &SchedulerConfig, clock: Box<dyn ClockSource>) -> Self {
        let default_task = Task::new(TaskId::DEFAULT, Duration::ZERO, RepeatLimit::Unlimited);
        let tick_period = config.tick_period();
        let mode = clock.mode();

        log::info!("Scheduler created ({mode:?} clock, tick period {tick_period:?}).");

        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(State {
                    tasks: vec![default_task],
                    running: false,
                    last_fire_time: Duration::ZERO,
                    tick_period,
                    next_task_id: 1,
                    next_entry_id: 0,
                    stats: SchedulerStats::default(),
                }),
                clock: RefCell::new(clock),
                mode,
                events: EventChannel::bounded(config.event_capacity),
                epoch: Instant::now(),
            }),
        }
    }

    /// Creates a non-owning handle, suitable for capture inside callbacks.
    pub fn downgrade(&self) -> WeakScheduler {
        WeakScheduler {
            inner: Rc::downgrade(&self.inner),
        }
    }

    // --- Registration ---

    /// Registers a callback on the default per-tick task.
    ///
    /// The callback fires on every tick with the tick's elapsed time. Starts
    /// the clock source if it is not running.
    pub fn register<C: TickContext + 'static>(
        &self,
        callback: &TickCallback,
        context: &Rc<C>,
    ) -> EntryHandle {
        let handle = {
            let mut state = self.inner.state.borrow_mut();
            let handle = state.allocate_handle(TaskId::DEFAULT);
            state.tasks[0].entries.push(Entry {
                handle,
                active: true,
                callback: callback.clone(),
                context: ContextRef::new(context),
            });
            handle
        };
        log::debug!("Registered {callback:?} on the default task.");
        self.activate();
        handle
    }

    /// Registers a callback on an existing task, sharing its period.
    ///
    /// # Errors
    /// - [`SchedulerError::UnknownTask`] if the task is no longer tracked.
    /// - [`SchedulerError::LimitedTaskShared`] if the task is repeat-limited,
    ///   since such a task owns exactly one entry.
    pub fn register_on<C: TickContext + 'static>(
        &self,
        task: TaskId,
        callback: &TickCallback,
        context: &Rc<C>,
    ) -> Result<EntryHandle, SchedulerError> {
        let handle = {
            let mut state = self.inner.state.borrow_mut();
            let handle = state.allocate_handle(task);
            let target = state
                .task_mut(task)
                .ok_or(SchedulerError::UnknownTask(task))?;
            if target.is_limited() {
                return Err(SchedulerError::LimitedTaskShared(task));
            }
            target.entries.push(Entry {
                handle,
                active: true,
                callback: callback.clone(),
                context: ContextRef::new(context),
            });
            handle
        };
        log::debug!("Registered {callback:?} on task {task}.");
        self.activate();
        Ok(handle)
    }

    /// Registers a callback on a fresh task that fires every `delay`.
    ///
    /// With [`RepeatLimit::Times`], the entry is dropped after that many fires
    /// and the task with it. A limit of zero is ignored: nothing is tracked
    /// and the returned handle refers to nothing.
    pub fn register_with_delay<C: TickContext + 'static>(
        &self,
        callback: &TickCallback,
        context: &Rc<C>,
        delay: Duration,
        limit: RepeatLimit,
    ) -> EntryHandle {
        let handle = {
            let mut state = self.inner.state.borrow_mut();
            let id = state.allocate_task_id();
            let handle = state.allocate_handle(id);

            if limit == RepeatLimit::Times(0) {
                log::warn!("Ignoring registration of {callback:?} with a repeat limit of zero.");
                return handle;
            }

            let mut task = Task::new(id, delay, limit);
            task.entries.push(Entry {
                handle,
                active: true,
                callback: callback.clone(),
                context: ContextRef::new(context),
            });
            state.tasks.push(task);
            handle
        };
        log::debug!(
            "Registered {callback:?} on task {} (period {delay:?}, {limit:?}).",
            handle.task
        );
        self.activate();
        handle
    }

    /// Fires a callback once, after `delay`.
    pub fn call_after<C: TickContext + 'static>(
        &self,
        callback: &TickCallback,
        context: &Rc<C>,
        delay: Duration,
    ) -> EntryHandle {
        self.register_with_delay(callback, context, delay, RepeatLimit::Times(1))
    }

    /// Removes every entry registered with this exact callback and context.
    ///
    /// Returns the number of entries removed; unknown pairs are a no-op.
    pub fn unregister<C: TickContext + 'static>(
        &self,
        callback: &TickCallback,
        context: &Rc<C>,
    ) -> usize {
        let context = ContextRef::new(context);
        self.remove_where(|entry| entry.matches(callback, &context))
    }

    /// Removes the single entry behind `handle`.
    ///
    /// Returns `false` if it was already gone.
    pub fn cancel(&self, handle: EntryHandle) -> bool {
        self.remove_where(|entry| entry.handle == handle) > 0
    }

    /// Removes matching entries, drops emptied tasks, and stops the clock
    /// once nothing is registered anywhere.
    fn remove_where(&self, predicate: impl Fn(&Entry) -> bool) -> usize {
        let (removed, stop) = {
            let mut state = self.inner.state.borrow_mut();
            let mut removed = 0;
            for task in &mut state.tasks {
                let before = task.entries.len();
                task.entries.retain(|entry| !predicate(entry));
                removed += before - task.entries.len();
            }
            state
                .tasks
                .retain(|task| task.id == TaskId::DEFAULT || !task.entries.is_empty());
            (removed, state.running && state.is_idle())
        };

        if removed > 0 {
            log::debug!("Removed {removed} entr{}.", if removed == 1 { "y" } else { "ies" });
        }
        if stop {
            self.deactivate();
        }
        removed
    }

    /// Pauses or resumes every entry whose context belongs to `group`.
    ///
    /// Paused entries stay registered and their task keeps its schedule; they
    /// are only skipped at fire time. Returns the number of entries whose flag
    /// actually changed.
    pub fn set_group_active(&self, group: GroupKey, active: bool) -> usize {
        // Group lookups are user code, so they run outside the state borrow.
        let contexts: Vec<(EntryHandle, ContextRef)> = {
            let state = self.inner.state.borrow();
            state
                .tasks
                .iter()
                .flat_map(|task| task.entries.iter())
                .map(|entry| (entry.handle, entry.context.clone()))
                .collect()
        };
        let members: Vec<EntryHandle> = contexts
            .into_iter()
            .filter(|(_, context)| context.group() == Some(group))
            .map(|(handle, _)| handle)
            .collect();

        let mut state = self.inner.state.borrow_mut();
        let mut changed = 0;
        for entry in state
            .tasks
            .iter_mut()
            .flat_map(|task| task.entries.iter_mut())
            .filter(|entry| members.contains(&entry.handle))
        {
            if entry.active != active {
                entry.active = active;
                changed += 1;
            }
        }
        log::debug!(
            "{} {changed} entr{} of {group}.",
            if active { "Resumed" } else { "Paused" },
            if changed == 1 { "y" } else { "ies" }
        );
        changed
    }

    // --- Tick period ---

    /// The fixed-interval clock period.
    pub fn tick_period(&self) -> Duration {
        self.inner.state.borrow().tick_period
    }

    /// Changes the fixed-interval clock period, clamped between
    /// [`MIN_TICK_PERIOD`] and [`MAX_TICK_PERIOD`].
    ///
    /// A running fixed-interval clock is restarted with the new period. A
    /// display-synchronized clock is paced by the host and is not affected.
    pub fn set_tick_period(&self, period: Duration) {
        let period = period.clamp(MIN_TICK_PERIOD, MAX_TICK_PERIOD);
        let restart = {
            let mut state = self.inner.state.borrow_mut();
            state.tick_period = period;
            state.running
        };

        if restart && self.clock_mode() == ClockMode::FixedInterval {
            let mut clock = self.inner.clock.borrow_mut();
            clock.deactivate();
            self.inner.state.borrow_mut().last_fire_time = self.now();
            clock.activate(period);
            log::info!("Restarted the interval clock with period {period:?}.");
        }
    }

    // --- Lifecycle ---

    fn activate(&self) {
        let period = {
            let mut state = self.inner.state.borrow_mut();
            if state.running {
                return;
            }
            state.running = true;
            state.last_fire_time = self.now();
            state.stats.starts += 1;
            state.tick_period
        };

        // The requester may deliver a frame synchronously from here.
        self.inner.clock.borrow_mut().activate(period);
        let mode = self.inner.mode;
        log::info!("Scheduler started ({mode:?} clock).");
        self.inner.events.publish(SchedulerEvent::Started { mode });
    }

    fn deactivate(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            if !state.running {
                return;
            }
            state.running = false;
            state.stats.stops += 1;
        }

        self.inner.clock.borrow_mut().deactivate();
        log::info!("Scheduler stopped: nothing is registered.");
        self.inner.events.publish(SchedulerEvent::Stopped);
    }

    // --- Dispatch ---

    /// Forwards one tick's elapsed time to every tracked task.
    ///
    /// Tasks created during this dispatch are first stepped on the next tick.
    pub fn dispatch(&self, elapsed: Duration) {
        let ids: Vec<TaskId> = {
            let mut state = self.inner.state.borrow_mut();
            state.stats.ticks += 1;
            state.tasks.iter().map(|task| task.id).collect()
        };
        log::trace!("Dispatching {elapsed:?} to {} task(s).", ids.len());

        for id in ids {
            self.step_task(id, elapsed);
        }
    }

    fn step_task(&self, id: TaskId, elapsed: Duration) {
        let (fire_delta, handles) = {
            let mut state = self.inner.state.borrow_mut();
            let Some(task) = state.task_mut(id) else {
                return;
            };
            if task.entries.is_empty() {
                return;
            }
            match task.accumulator.advance(elapsed) {
                Some(delta) => {
                    let handles: Vec<EntryHandle> =
                        task.entries.iter().rev().map(|entry| entry.handle).collect();
                    (delta, handles)
                }
                None => return,
            }
        };

        let mut last_visited = None;
        for handle in handles {
            let entry = {
                let state = self.inner.state.borrow();
                let Some(task) = state.tasks.iter().find(|task| task.id == id) else {
                    break;
                };
                match task.entries.iter().find(|entry| entry.handle == handle) {
                    Some(entry) => entry.clone(),
                    None => continue,
                }
            };
            last_visited = Some(entry.handle);
            if entry.active {
                self.invoke(&entry, fire_delta);
            }
        }

        let expired = {
            let mut state = self.inner.state.borrow_mut();
            state.task_mut(id).is_some_and(Task::consume_fire)
        };
        if expired {
            if let Some(handle) = last_visited {
                log::debug!("Task {id} reached its repeat limit.");
                self.remove_where(|entry| entry.handle == handle);
            }
        }
    }

    fn invoke(&self, entry: &Entry, delta: Duration) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| entry.callback.invoke(delta)));

        let event = match outcome {
            Ok(Ok(())) => {
                self.inner.state.borrow_mut().stats.fires += 1;
                return;
            }
            Ok(Err(error)) => {
                let message = format!("{error:#}");
                log::error!("Callback of entry {:?} failed: {message}", entry.handle);
                SchedulerEvent::CallbackFailed {
                    entry: entry.handle,
                    message,
                }
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                log::error!("Callback of entry {:?} panicked: {message}", entry.handle);
                SchedulerEvent::CallbackPanicked {
                    entry: entry.handle,
                    message,
                }
            }
        };

        self.inner.state.borrow_mut().stats.failures += 1;
        self.inner.events.publish(event);
    }

    // --- Clock entry points ---

    /// Time elapsed since the scheduler was created.
    ///
    /// Frame timestamps handed to [`Scheduler::on_frame`] are measured on this
    /// same timeline.
    pub fn now(&self) -> Duration {
        self.inner.epoch.elapsed()
    }

    /// Delivers one display-synchronized frame.
    ///
    /// Dispatches the time since the previous frame, then requests the next
    /// frame if anything is still registered. Frames arriving while stopped,
    /// or on a scheduler driven by a fixed interval, are ignored. A frame
    /// delivered synchronously from inside `FrameRequester::request_frame` is
    /// dispatched but cannot chain the next request.
    pub fn on_frame(&self, timestamp: Duration) {
        if self.clock_mode() != ClockMode::DisplaySync {
            log::warn!("Ignoring a display frame on a fixed-interval scheduler.");
            return;
        }
        let elapsed = {
            let state = self.inner.state.borrow();
            if !state.running {
                log::warn!("Ignoring a display frame delivered while stopped.");
                return;
            }
            timestamp.saturating_sub(state.last_fire_time)
        };

        self.dispatch(elapsed);
        self.inner.state.borrow_mut().last_fire_time = timestamp;

        if self.is_running() {
            match self.inner.clock.try_borrow_mut() {
                Ok(mut clock) => clock.rearm(),
                Err(_) => log::warn!("Frame delivered from inside a frame request; not re-arming."),
            }
        }
    }

    fn on_interval_tick(&self, now: Instant) {
        let timestamp = now.saturating_duration_since(self.inner.epoch);
        let elapsed = {
            let state = self.inner.state.borrow();
            if !state.running {
                return;
            }
            timestamp
                .saturating_sub(state.last_fire_time)
                .max(MIN_TICK_PERIOD)
        };

        self.dispatch(elapsed);
        self.inner.state.borrow_mut().last_fire_time = timestamp;
    }

    fn pending_ticks(&self) -> Option<flume::Receiver<Instant>> {
        self.inner.clock.borrow().ticks()
    }

    /// Handles every fixed-interval tick already queued, without blocking.
    ///
    /// Returns the number of ticks handled.
    pub fn pump(&self) -> usize {
        let mut handled = 0;
        while let Some(ticks) = self.pending_ticks() {
            match ticks.try_recv() {
                Ok(instant) => {
                    self.on_interval_tick(instant);
                    handled += 1;
                }
                Err(_) => break,
            }
        }
        handled
    }

    /// Blocks on fixed-interval ticks until `limit` has passed or the
    /// scheduler stops.
    ///
    /// Returns the number of ticks handled. A display-synchronized scheduler
    /// is paced by its host, so this returns immediately.
    pub fn run_for(&self, limit: Duration) -> usize {
        if self.clock_mode() == ClockMode::DisplaySync {
            log::warn!("run_for has no effect on a display-synchronized scheduler.");
            return 0;
        }

        // Capped so the deadline cannot overflow `Instant`.
        let deadline = Instant::now() + limit.min(Duration::from_secs(u32::MAX.into()));
        let mut handled = 0;
        while self.is_running() {
            let Some(ticks) = self.pending_ticks() else {
                break;
            };
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            match ticks.recv_timeout(deadline - now) {
                Ok(instant) => {
                    self.on_interval_tick(instant);
                    handled += 1;
                }
                Err(flume::RecvTimeoutError::Timeout) => break,
                Err(flume::RecvTimeoutError::Disconnected) => {
                    // A restart from inside a callback swaps the channel.
                    let swapped = self
                        .pending_ticks()
                        .is_some_and(|fresh| !fresh.same_channel(&ticks));
                    if !swapped {
                        log::warn!("Interval clock channel closed.");
                        break;
                    }
                }
            }
        }
        handled
    }

    // --- Introspection ---

    /// Whether the clock source is active.
    pub fn is_running(&self) -> bool {
        self.inner.state.borrow().running
    }

    /// The kind of clock driving this scheduler.
    pub fn clock_mode(&self) -> ClockMode {
        self.inner.mode
    }

    /// Number of tracked tasks, the default task included.
    pub fn task_count(&self) -> usize {
        self.inner.state.borrow().tasks.len()
    }

    /// Number of registered entries across every task.
    pub fn entry_count(&self) -> usize {
        self.inner
            .state
            .borrow()
            .tasks
            .iter()
            .map(|task| task.entries.len())
            .sum()
    }

    /// Whether `task` is still tracked.
    pub fn is_tracked(&self, task: TaskId) -> bool {
        self.inner
            .state
            .borrow()
            .tasks
            .iter()
            .any(|tracked| tracked.id == task)
    }

    /// A snapshot of the counters.
    pub fn stats(&self) -> SchedulerStats {
        self.inner.state.borrow().stats
    }

    /// Returns a receiver of lifecycle and failure events.
    ///
    /// All subscribers share one bounded queue; each event is delivered to
    /// one of them.
    pub fn subscribe(&self) -> flume::Receiver<SchedulerEvent> {
        self.inner.events.subscribe()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Builds a [`Scheduler`], probing which clock source to use.
pub struct SchedulerBuilder {
    config: SchedulerConfig,
    requester: Option<Box<dyn FrameRequester>>,
    clock: Option<Box<dyn ClockSource>>,
}

impl SchedulerBuilder {
    /// Creates a builder with the default configuration and no frame capability.
    pub fn new() -> Self {
        Self {
            config: SchedulerConfig::default(),
            requester: None,
            clock: None,
        }
    }

    /// Uses the given configuration.
    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    /// Offers the host's display-synchronized frame capability.
    pub fn with_frame_requester(mut self, requester: impl FrameRequester + 'static) -> Self {
        self.requester = Some(Box::new(requester));
        self
    }

    /// Bypasses probing and drives the scheduler with a custom clock source.
    pub fn with_clock_source(mut self, clock: Box<dyn ClockSource>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Builds the scheduler. It starts stopped, with an empty default task.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if the configuration does not validate.
    pub fn build(self) -> Result<Scheduler, ConfigError> {
        self.config.validate()?;
        let clock = match self.clock {
            Some(clock) => clock,
            None => clock::probe(
                self.requester,
                self.config.clock == ClockPreference::FixedInterval,
            ),
        };
        Ok(Scheduler::from_parts(&self.config, clock))
    }
}

impl Default for SchedulerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// A clock source that never ticks on its own.
    struct ManualClock;

    impl ClockSource for ManualClock {
        fn mode(&self) -> ClockMode {
            ClockMode::FixedInterval
        }
        fn activate(&mut self, _period: Duration) {}
        fn deactivate(&mut self) {}
    }

    fn manual() -> Scheduler {
        SchedulerBuilder::new()
            .with_clock_source(Box::new(ManualClock))
            .build()
            .unwrap()
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_new_scheduler_is_stopped_with_default_task() {
        let scheduler = manual();
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.task_count(), 1);
        assert!(scheduler.is_tracked(TaskId::DEFAULT));
        assert_eq!(scheduler.entry_count(), 0);
    }

    #[test]
    fn test_zero_repeat_limit_is_ignored() {
        let scheduler = manual();
        let handle = scheduler.register_with_delay(
            &TickCallback::infallible(|_| {}),
            &Rc::new(()),
            ms(10),
            RepeatLimit::Times(0),
        );
        assert!(!scheduler.is_running());
        assert!(!scheduler.is_tracked(handle.task()));
        assert!(!scheduler.cancel(handle));
    }

    #[test]
    fn test_register_on_rejects_limited_and_unknown_tasks() {
        let scheduler = manual();
        let ctx = Rc::new(());
        let cb = TickCallback::infallible(|_| {});

        let limited = scheduler.call_after(&cb, &ctx, ms(5));
        assert_eq!(
            scheduler.register_on(limited.task(), &cb, &ctx),
            Err(SchedulerError::LimitedTaskShared(limited.task()))
        );

        let repeating = scheduler.register_with_delay(&cb, &ctx, ms(5), RepeatLimit::Unlimited);
        let shared = scheduler.register_on(repeating.task(), &cb, &ctx).unwrap();
        assert_eq!(shared.task(), repeating.task());

        scheduler.cancel(repeating);
        scheduler.cancel(shared);
        assert_eq!(
            scheduler.register_on(repeating.task(), &cb, &ctx),
            Err(SchedulerError::UnknownTask(repeating.task()))
        );
    }

    #[test]
    fn test_interval_tick_clamps_zero_elapsed() {
        let scheduler = manual();
        let seen = Rc::new(Cell::new(Duration::ZERO));
        let sink = seen.clone();
        scheduler.register(&TickCallback::infallible(move |dt| sink.set(dt)), &Rc::new(()));

        let at = scheduler.inner.epoch + ms(40);
        scheduler.on_interval_tick(at);
        scheduler.on_interval_tick(at);
        assert_eq!(seen.get(), MIN_TICK_PERIOD);
    }

    #[test]
    fn test_interval_ticks_are_ignored_while_stopped() {
        let scheduler = manual();
        scheduler.on_interval_tick(Instant::now());
        assert_eq!(scheduler.stats().ticks, 0);
    }

    #[test]
    fn test_set_tick_period_clamps_to_minimum() {
        let scheduler = manual();
        scheduler.set_tick_period(Duration::ZERO);
        assert_eq!(scheduler.tick_period(), MIN_TICK_PERIOD);
        scheduler.set_tick_period(ms(20));
        assert_eq!(scheduler.tick_period(), ms(20));
    }

    #[test]
    fn test_set_tick_period_clamps_to_maximum() {
        let scheduler = manual();
        scheduler.set_tick_period(Duration::MAX);
        assert_eq!(scheduler.tick_period(), MAX_TICK_PERIOD);
    }

    #[test]
    fn test_restart_with_a_huge_period_keeps_the_clock_alive() {
        let scheduler = SchedulerBuilder::new()
            .with_config(SchedulerConfig {
                clock: ClockPreference::FixedInterval,
                ..SchedulerConfig::default()
            })
            .build()
            .unwrap();
        scheduler.register(&TickCallback::infallible(|_| {}), &Rc::new(()));

        scheduler.set_tick_period(Duration::MAX);
        assert!(scheduler.is_running());
        assert_eq!(scheduler.tick_period(), MAX_TICK_PERIOD);

        // Back to a short period: the restarted ticker still delivers ticks.
        scheduler.set_tick_period(ms(1));
        assert!(scheduler.run_for(ms(200)) > 0);
    }

    #[test]
    fn test_panic_message_extraction() {
        assert_eq!(panic_message(&"static"), "static");
        assert_eq!(panic_message(&String::from("owned")), "owned");
        assert_eq!(panic_message(&42_u8), "non-string panic payload");
    }

    #[test]
    fn test_weak_handle_does_not_keep_scheduler_alive() {
        let scheduler = manual();
        let weak = scheduler.downgrade();
        assert!(weak.upgrade().is_some());
        drop(scheduler);
        assert!(weak.upgrade().is_none());
    }
}
