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

//! Clock source adapters.
//!
//! The scheduler owns exactly one clock subscription, provided by one of two
//! strategies selected when it is built:
//!
//! - [`DisplaySyncClock`]: the host paces ticks with its display. The clock
//!   only ever holds one outstanding one-shot frame request; the scheduler
//!   re-arms it after every dispatched frame.
//! - [`IntervalClock`]: a background ticker pushes timestamps through a
//!   channel every tick period; the owning thread drains them.
//!
//! Both end in the same `Scheduler::dispatch(elapsed)`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// The kind of clock driving a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClockMode {
    /// Ticks are delivered by the host once per displayed frame.
    DisplaySync,
    /// Ticks are produced by a repeating timer every tick period.
    FixedInterval,
}

/// Host capability to deliver one future frame callback.
///
/// After `request_frame`, the host is expected to call
/// [`Scheduler::on_frame`](crate::Scheduler::on_frame) once, with the frame's
/// timestamp.
pub trait FrameRequester {
    /// Asks the host for one more frame.
    fn request_frame(&mut self);

    /// Withdraws the outstanding request, if the host supports it.
    ///
    /// Frames that still arrive after cancellation are ignored by the scheduler.
    fn cancel_frame(&mut self) {}
}

/// A strategy producing the scheduler's ticks.
pub trait ClockSource {
    /// The kind of clock this is.
    fn mode(&self) -> ClockMode;

    /// Starts producing ticks. `period` only matters to fixed-interval sources.
    fn activate(&mut self, period: Duration);

    /// Stops producing ticks.
    fn deactivate(&mut self);

    /// Chains the next tick after one was dispatched.
    fn rearm(&mut self) {}

    /// The channel of pushed tick timestamps, for sources that push them.
    fn ticks(&self) -> Option<flume::Receiver<Instant>> {
        None
    }
}

/// Display-synchronized clock: a chain of one-shot frame requests.
pub struct DisplaySyncClock {
    requester: Box<dyn FrameRequester>,
    armed: bool,
}

impl DisplaySyncClock {
    /// Wraps the host's frame capability.
    pub fn new(requester: Box<dyn FrameRequester>) -> Self {
        Self {
            requester,
            armed: false,
        }
    }
}

impl ClockSource for DisplaySyncClock {
    fn mode(&self) -> ClockMode {
        ClockMode::DisplaySync
    }

    fn activate(&mut self, _period: Duration) {
        if self.armed {
            return;
        }
        self.armed = true;
        self.requester.request_frame();
    }

    fn deactivate(&mut self) {
        if !self.armed {
            return;
        }
        self.armed = false;
        self.requester.cancel_frame();
    }

    fn rearm(&mut self) {
        if self.armed {
            self.requester.request_frame();
        }
    }
}

struct Ticker {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Fixed-interval fallback clock backed by a ticker thread.
///
/// Each activation opens a fresh channel, so ticks produced under a previous
/// period are never observed after a restart.
#[derive(Default)]
pub struct IntervalClock {
    ticker: Option<Ticker>,
    receiver: Option<flume::Receiver<Instant>>,
}

impl IntervalClock {
    /// Creates an inactive interval clock.
    pub fn new() -> Self {
        Self::default()
    }

    fn spawn(period: Duration) -> std::io::Result<(Ticker, flume::Receiver<Instant>)> {
        let (sender, receiver) = flume::unbounded();
        let stop = Arc::new(AtomicBool::new(false));
        let flag = stop.clone();

        let handle = thread::Builder::new()
            .name("cadence-interval-clock".to_string())
            .spawn(move || {
                let Some(mut next) = Instant::now().checked_add(period) else {
                    log::error!("Interval clock period {period:?} overflows the monotonic clock.");
                    return;
                };
                loop {
                    let now = Instant::now();
                    if now < next {
                        thread::park_timeout(next - now);
                    }
                    if flag.load(Ordering::Acquire) {
                        break;
                    }
                    // Spurious wake-ups land here before the deadline.
                    if Instant::now() < next {
                        continue;
                    }
                    if sender.send(Instant::now()).is_err() {
                        break;
                    }
                    // Never queue a burst of catch-up ticks after a stall.
                    let now = Instant::now();
                    match next.checked_add(period) {
                        Some(after) if after >= now => next = after,
                        _ => match now.checked_add(period) {
                            Some(after) => next = after,
                            None => break,
                        },
                    }
                }
            })?;

        Ok((Ticker { stop, handle }, receiver))
    }
}

impl ClockSource for IntervalClock {
    fn mode(&self) -> ClockMode {
        ClockMode::FixedInterval
    }

    fn activate(&mut self, period: Duration) {
        if self.ticker.is_some() {
            return;
        }
        match Self::spawn(period) {
            Ok((ticker, receiver)) => {
                log::debug!("Interval clock ticking every {period:?}.");
                self.ticker = Some(ticker);
                self.receiver = Some(receiver);
            }
            Err(e) => log::error!("Failed to spawn the interval clock thread: {e}"),
        }
    }

    fn deactivate(&mut self) {
        self.receiver = None;
        if let Some(ticker) = self.ticker.take() {
            ticker.stop.store(true, Ordering::Release);
            ticker.handle.thread().unpark();
            if ticker.handle.join().is_err() {
                log::error!("Interval clock thread panicked.");
            }
        }
    }

    fn ticks(&self) -> Option<flume::Receiver<Instant>> {
        self.receiver.clone()
    }
}

impl Drop for IntervalClock {
    fn drop(&mut self) {
        self.deactivate();
    }
}

/// Picks the clock strategy from the host's capabilities.
///
/// A frame requester means the host can pace ticks with its display; without
/// one, or when the fixed interval is forced, the ticker thread is used.
pub fn probe(
    requester: Option<Box<dyn FrameRequester>>,
    force_interval: bool,
) -> Box<dyn ClockSource> {
    match requester {
        Some(requester) if !force_interval => Box::new(DisplaySyncClock::new(requester)),
        Some(_) => {
            log::info!("Display-synchronized frames available but fixed interval forced.");
            Box::new(IntervalClock::new())
        }
        None => Box::new(IntervalClock::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Counting {
        requests: Rc<Cell<u32>>,
        cancels: Rc<Cell<u32>>,
    }

    impl FrameRequester for Counting {
        fn request_frame(&mut self) {
            self.requests.set(self.requests.get() + 1);
        }

        fn cancel_frame(&mut self) {
            self.cancels.set(self.cancels.get() + 1);
        }
    }

    #[test]
    fn test_display_sync_requests_once_per_activation() {
        let counting = Counting::default();
        let mut clock = DisplaySyncClock::new(Box::new(counting.clone()));

        clock.activate(Duration::ZERO);
        clock.activate(Duration::ZERO);
        assert_eq!(counting.requests.get(), 1);

        clock.rearm();
        assert_eq!(counting.requests.get(), 2);

        clock.deactivate();
        clock.deactivate();
        assert_eq!(counting.cancels.get(), 1);

        // A late frame after deactivation must not chain another request.
        clock.rearm();
        assert_eq!(counting.requests.get(), 2);
        assert!(clock.ticks().is_none());
    }

    #[test]
    fn test_interval_clock_pushes_ticks_until_deactivated() {
        let mut clock = IntervalClock::new();
        assert!(clock.ticks().is_none());

        clock.activate(Duration::from_millis(2));
        let rx = clock.ticks().expect("active clock exposes its channel");
        let first = rx
            .recv_timeout(Duration::from_secs(2))
            .expect("a tick within two seconds");
        let second = rx
            .recv_timeout(Duration::from_secs(2))
            .expect("a second tick within two seconds");
        assert!(second >= first);

        clock.deactivate();
        assert!(clock.ticks().is_none());
    }

    #[test]
    fn test_unreachable_period_ends_the_ticker_quietly() {
        let mut clock = IntervalClock::new();
        clock.activate(Duration::MAX);
        let rx = clock.ticks().expect("active clock exposes its channel");
        assert_eq!(
            rx.recv_timeout(Duration::from_secs(2)),
            Err(flume::RecvTimeoutError::Disconnected)
        );
        clock.deactivate();
    }

    #[test]
    fn test_restart_opens_a_fresh_channel() {
        let mut clock = IntervalClock::new();
        clock.activate(Duration::from_millis(1));
        let old = clock.ticks().unwrap();
        clock.deactivate();
        clock.activate(Duration::from_millis(1));
        let new = clock.ticks().unwrap();
        assert!(!old.same_channel(&new));
        clock.deactivate();
    }

    #[test]
    fn test_probe_selects_strategy() {
        let with_frames = probe(Some(Box::new(Counting::default())), false);
        assert_eq!(with_frames.mode(), ClockMode::DisplaySync);

        let forced = probe(Some(Box::new(Counting::default())), true);
        assert_eq!(forced.mode(), ClockMode::FixedInterval);

        let without = probe(None, false);
        assert_eq!(without.mode(), ClockMode::FixedInterval);
    }
}
