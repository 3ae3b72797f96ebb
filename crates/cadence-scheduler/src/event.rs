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

//! Lifecycle and failure reports published by the scheduler.

use crate::clock::ClockMode;
use crate::task::EntryHandle;

/// Something observers of a scheduler may want to know about.
#[derive(Debug, Clone, PartialEq)]
pub enum SchedulerEvent {
    /// The clock source was activated.
    Started {
        /// The clock source in use.
        mode: ClockMode,
    },
    /// The clock source was deactivated because nothing is registered.
    Stopped,
    /// A callback returned an error. The rest of the tick still ran.
    CallbackFailed {
        /// The entry whose callback failed.
        entry: EntryHandle,
        /// The rendered error chain.
        message: String,
    },
    /// A callback panicked. The rest of the tick still ran.
    CallbackPanicked {
        /// The entry whose callback panicked.
        entry: EntryHandle,
        /// The panic payload, when it was a string.
        message: String,
    },
}

/// A bounded, non-blocking publisher over a `flume` channel.
///
/// Publishing never stalls a tick: when the channel is full the event is
/// dropped and a warning is logged.
#[derive(Debug)]
pub(crate) struct EventChannel {
    sender: flume::Sender<SchedulerEvent>,
    receiver: flume::Receiver<SchedulerEvent>,
}

impl EventChannel {
    pub(crate) fn bounded(capacity: usize) -> Self {
        let (sender, receiver) = flume::bounded(capacity);
        Self { sender, receiver }
    }

    pub(crate) fn publish(&self, event: SchedulerEvent) {
        match self.sender.try_send(event) {
            Ok(()) => {}
            Err(flume::TrySendError::Full(dropped)) => {
                log::warn!("Scheduler event channel is full; dropping {dropped:?}.");
            }
            // The channel keeps its own receiver alive, so this cannot happen.
            Err(flume::TrySendError::Disconnected(_)) => {}
        }
    }

    pub(crate) fn subscribe(&self) -> flume::Receiver<SchedulerEvent> {
        self.receiver.clone()
    }
}
