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

use cadence_core::{LinearRgba, Vec2};
use cadence_text::{
    DrawingSurface, FixedAdvanceMeasurer, Shadow, TextBaseline, TextMeasurer, TextStyle,
};

#[derive(Debug, Clone, PartialEq)]
enum Op {
    Save,
    Restore,
    FillColor(LinearRgba),
    Font(String),
    Baseline(TextBaseline),
    Shadow(Shadow),
    FillText(String, Vec2),
}

/// Records every call so the exact drawing sequence can be asserted.
#[derive(Default)]
struct RecordingSurface {
    ops: Vec<Op>,
    measurer: FixedAdvanceMeasurer,
}

impl TextMeasurer for RecordingSurface {
    fn measure_width(&self, text: &str, family: &str, size: f32) -> f32 {
        self.measurer.measure_width(text, family, size)
    }
}

impl DrawingSurface for RecordingSurface {
    fn save(&mut self) {
        self.ops.push(Op::Save);
    }
    fn restore(&mut self) {
        self.ops.push(Op::Restore);
    }
    fn set_fill_color(&mut self, color: LinearRgba) {
        self.ops.push(Op::FillColor(color));
    }
    fn set_font(&mut self, font: &str) {
        self.ops.push(Op::Font(font.to_string()));
    }
    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.ops.push(Op::Baseline(baseline));
    }
    fn set_shadow(&mut self, shadow: &Shadow) {
        self.ops.push(Op::Shadow(*shadow));
    }
    fn fill_text(&mut self, text: &str, position: Vec2) {
        self.ops.push(Op::FillText(text.to_string(), position));
    }
}

#[test]
fn test_apply_style_without_shadow() {
    // --- 1. ARRANGE ---
    let style = TextStyle::new("Go!").with_font_size(10.0);
    let mut surface = RecordingSurface::default();

    // --- 2. ACT ---
    style.apply_style(&mut surface);

    // --- 3. ASSERT ---
    // "Go!" is 3 chars * 10px * 0.5 = 15px wide and 20px tall.
    assert_eq!(
        surface.ops,
        vec![
            Op::Save,
            Op::FillColor(LinearRgba::BLACK),
            Op::Font("400 10px/10 Arial".to_string()),
            Op::Baseline(TextBaseline::Top),
            Op::FillText("Go!".to_string(), Vec2::new(-7.5, -10.0)),
            Op::Restore,
        ],
        "Drawing sequence should be balanced and shadow-free"
    );
}

#[test]
fn test_apply_style_with_shadow() {
    let shadow = Shadow {
        color: LinearRgba::WHITE,
        blur: 4.0,
        offset: Vec2::new(1.0, 1.0),
    };
    let style = TextStyle::new("ab")
        .with_font_family("Courier")
        .with_font_size(8.0)
        .with_font_weight("700")
        .with_font_color(LinearRgba::WHITE)
        .with_shadow(shadow);
    let mut surface = RecordingSurface::default();

    style.apply_style(&mut surface);

    assert_eq!(surface.ops.first(), Some(&Op::Save));
    assert_eq!(surface.ops.last(), Some(&Op::Restore));
    assert!(surface.ops.contains(&Op::Shadow(shadow)));
    assert!(surface.ops.contains(&Op::Font("700 8px/8 Courier".to_string())));
    assert!(surface
        .ops
        .contains(&Op::FillText("ab".to_string(), Vec2::new(-4.0, -8.0))));

    let shadow_at = surface.ops.iter().position(|op| matches!(op, Op::Shadow(_)));
    let fill_at = surface.ops.iter().position(|op| matches!(op, Op::FillText(..)));
    assert!(shadow_at < fill_at, "Shadow must be set before the fill");
}
