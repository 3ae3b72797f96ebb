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

//! A `winit`-backed [`FrameRequester`].

use crate::clock::FrameRequester;
use std::sync::Arc;
use ::winit::window::Window;

/// Requests display-synchronized frames by asking a window to redraw.
///
/// The host forwards each `WindowEvent::RedrawRequested` to
/// [`Scheduler::on_frame`](crate::Scheduler::on_frame) with
/// [`Scheduler::now`](crate::Scheduler::now) as the timestamp.
#[derive(Debug, Clone)]
pub struct WinitFrameRequester {
    window: Arc<Window>,
}

impl WinitFrameRequester {
    /// Wraps a shared window handle.
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }
}

impl FrameRequester for WinitFrameRequester {
    fn request_frame(&mut self) {
        self.window.request_redraw();
    }
}
