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

//! The drawing-surface contract text styles render through.

use crate::style::Shadow;
use cadence_core::{LinearRgba, Vec2};

/// Vertical anchor of drawn text relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    /// The top of the em box sits on the position.
    Top,
    /// The middle of the em box sits on the position.
    Middle,
    /// The alphabetic baseline sits on the position.
    #[default]
    Alphabetic,
    /// The bottom of the em box sits on the position.
    Bottom,
}

/// Measures the advance width of a run of text.
pub trait TextMeasurer {
    /// Returns the width of `text` set in `family` at `size` pixels.
    fn measure_width(&self, text: &str, family: &str, size: f32) -> f32;
}

/// A 2D target with a save/restore state stack, in the manner of an
/// immediate-mode canvas.
pub trait DrawingSurface: TextMeasurer {
    /// Pushes the current drawing state.
    fn save(&mut self);
    /// Pops the drawing state pushed by the matching [`save`](Self::save).
    fn restore(&mut self);
    /// Sets the color used by subsequent fills.
    fn set_fill_color(&mut self, color: LinearRgba);
    /// Sets the font from a CSS-like shorthand (`"400 14px/14 Arial"`).
    fn set_font(&mut self, font: &str);
    /// Sets the vertical anchor of subsequent text.
    fn set_text_baseline(&mut self, baseline: TextBaseline);
    /// Sets the shadow drawn under subsequent fills.
    fn set_shadow(&mut self, shadow: &Shadow);
    /// Fills `text` at `position` with the current state.
    fn fill_text(&mut self, text: &str, position: Vec2);
}

/// A headless measurer giving every character the same advance.
///
/// Useful where no font rasterizer is available, such as tests and servers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvanceMeasurer {
    /// Advance of one character, as a fraction of the font size.
    pub advance_ratio: f32,
}

impl FixedAdvanceMeasurer {
    /// Creates a measurer with the given per-character advance ratio.
    pub const fn new(advance_ratio: f32) -> Self {
        Self { advance_ratio }
    }
}

impl Default for FixedAdvanceMeasurer {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl TextMeasurer for FixedAdvanceMeasurer {
    fn measure_width(&self, text: &str, _family: &str, size: f32) -> f32 {
        text.chars().count() as f32 * size * self.advance_ratio
    }
}
