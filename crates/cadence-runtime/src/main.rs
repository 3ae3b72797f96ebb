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

//! Headless Cadence driver.
//!
//! Loads a scheduler configuration, registers a handful of demo callbacks
//! (a per-tick heartbeat, a repeat-limited pulse, a one-shot that pauses a
//! group, and a periodic member of that group) and runs the fixed-interval
//! clock for a bounded time.

use anyhow::{Context, Result};
use cadence_scheduler::{
    GroupKey, GroupMember, RepeatLimit, Scheduler, SchedulerBuilder, SchedulerConfig,
    SchedulerEvent, TickCallback,
};
use clap::Parser;
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

const DEMO_GROUP: GroupKey = GroupKey(1);

/// Runs a Cadence scheduler headlessly for a while and reports what it did.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// JSON scheduler configuration. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// How long to run, in seconds.
    #[arg(short, long, default_value_t = 2.0)]
    seconds: f64,
}

fn load_config(path: Option<&PathBuf>) -> Result<SchedulerConfig> {
    match path {
        Some(path) => SchedulerConfig::from_json_file(path)
            .with_context(|| format!("loading '{}'", path.display())),
        None => Ok(SchedulerConfig::default()),
    }
}

fn register_demo(scheduler: &Scheduler) -> Rc<Cell<u64>> {
    let heartbeats = Rc::new(Cell::new(0));
    let world = Rc::new(());

    let beats = heartbeats.clone();
    scheduler.register(
        &TickCallback::infallible(move |_| beats.set(beats.get() + 1)),
        &world,
    );

    scheduler.register_with_delay(
        &TickCallback::infallible(|dt| log::info!("Pulse after {dt:?}.")),
        &world,
        Duration::from_millis(250),
        RepeatLimit::Times(4),
    );

    let scene = Rc::new(GroupMember(DEMO_GROUP));
    scheduler.register_with_delay(
        &TickCallback::infallible(|dt| log::info!("Scene tick after {dt:?}.")),
        &scene,
        Duration::from_millis(200),
        RepeatLimit::Unlimited,
    );

    let weak = scheduler.downgrade();
    scheduler.call_after(
        &TickCallback::new(move |_| {
            let scheduler = weak
                .upgrade()
                .context("scheduler dropped before the pause fired")?;
            let paused = scheduler.set_group_active(DEMO_GROUP, false);
            log::info!("Paused {paused} scene callback(s).");
            Ok(())
        }),
        &world,
        Duration::from_millis(1000),
    );

    heartbeats
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = load_config(args.config.as_ref())?;
    let limit = Duration::try_from_secs_f64(args.seconds)
        .with_context(|| format!("invalid run time: {} seconds", args.seconds))?;

    let scheduler = SchedulerBuilder::new()
        .with_config(config)
        .build()
        .context("building the scheduler")?;
    let events = scheduler.subscribe();
    let heartbeats = register_demo(&scheduler);

    let ticks = scheduler.run_for(limit);

    for event in events.try_iter() {
        match event {
            SchedulerEvent::CallbackFailed { entry, message }
            | SchedulerEvent::CallbackPanicked { entry, message } => {
                log::warn!("Entry {entry:?} on task {} failed: {message}", entry.task());
            }
            other => log::debug!("{other:?}"),
        }
    }

    let stats = scheduler.stats();
    log::info!(
        "Ran {ticks} tick(s) in {limit:?}: {} heartbeat(s), {} fire(s), {} failure(s), {} task(s) left.",
        heartbeats.get(),
        stats.fires,
        stats.failures,
        scheduler.task_count()
    );
    Ok(())
}
