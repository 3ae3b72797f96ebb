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

//! The text style value object.

use crate::surface::{DrawingSurface, TextBaseline, TextMeasurer};
use cadence_core::{LinearRgba, Size2, Vec2};
use serde::{Deserialize, Serialize};

/// The font family used when none is set.
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

/// The font size, in pixels, used when none is set.
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// The font weight used when none is set.
pub const DEFAULT_FONT_WEIGHT: &str = "400";

/// `#ccc`, the color a reset shadow falls back to.
pub const DEFAULT_SHADOW_COLOR: LinearRgba = LinearRgba::rgb(0.603_827_3, 0.603_827_3, 0.603_827_3);

/// A drop shadow under filled text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    /// The shadow color.
    pub color: LinearRgba,
    /// The blur radius, in pixels.
    pub blur: f32,
    /// The shadow offset, in pixels.
    pub offset: Vec2,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            color: DEFAULT_SHADOW_COLOR,
            blur: 0.0,
            offset: Vec2::ZERO,
        }
    }
}

impl Shadow {
    /// A shadow with a blur radius and no offset.
    pub fn blurred(color: LinearRgba, blur: f32) -> Self {
        Self {
            color,
            blur,
            offset: Vec2::ZERO,
        }
    }

    /// Whether drawing this shadow would show anything.
    pub fn is_visible(&self) -> bool {
        self.blur != 0.0 || !self.offset.is_zero()
    }
}

/// How a run of text is filled: its content, font and shadow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    text: String,
    font_family: String,
    font_size: f32,
    font_color: LinearRgba,
    font_weight: String,
    shadow: Shadow,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new("")
    }
}

impl TextStyle {
    /// Creates a style for `text` with the default font and no shadow.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            font_color: LinearRgba::BLACK,
            font_weight: DEFAULT_FONT_WEIGHT.to_string(),
            shadow: Shadow::default(),
        }
    }

    /// Sets the font family.
    pub fn with_font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = family.into();
        self
    }

    /// Sets the font size, in pixels.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Sets the fill color.
    pub fn with_font_color(mut self, color: LinearRgba) -> Self {
        self.font_color = color;
        self
    }

    /// Sets the font weight (`"400"`, `"bold"`...).
    pub fn with_font_weight(mut self, weight: impl Into<String>) -> Self {
        self.font_weight = weight.into();
        self
    }

    /// Sets the shadow.
    pub fn with_shadow(mut self, shadow: Shadow) -> Self {
        self.shadow = shadow;
        self
    }

    /// The text content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the text content.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// The font family.
    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    /// The font size, in pixels.
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// The fill color.
    pub fn font_color(&self) -> LinearRgba {
        self.font_color
    }

    /// The font weight.
    pub fn font_weight(&self) -> &str {
        &self.font_weight
    }

    /// The shadow settings, visible or not.
    pub fn shadow(&self) -> &Shadow {
        &self.shadow
    }

    /// Replaces the shadow.
    pub fn set_shadow(&mut self, shadow: Shadow) {
        self.shadow = shadow;
    }

    /// Restores the shadow to `#ccc` with no blur and no offset.
    pub fn reset_shadow(&mut self) {
        self.shadow = Shadow::default();
    }

    /// Whether a shadow is drawn: a non-zero blur or offset.
    pub fn has_shadow(&self) -> bool {
        self.shadow.is_visible()
    }

    /// The font shorthand set on a surface: `"{weight} {size}px/{size} {family}"`.
    pub fn font_shorthand(&self) -> String {
        format!(
            "{} {}px/{} {}",
            self.font_weight, self.font_size, self.font_size, self.font_family
        )
    }

    /// The font used for measuring: `"{size}px {family}"`.
    pub fn measure_font(&self) -> String {
        format!("{}px {}", self.font_size, self.font_family)
    }

    /// The box the text needs: its measured width, and twice the font size
    /// as height to leave room for ascenders and descenders.
    pub fn measure_intrinsic_size<M: TextMeasurer + ?Sized>(&self, measurer: &M) -> Size2 {
        let width = measurer.measure_width(&self.text, &self.font_family, self.font_size);
        Size2::new(width, self.font_size * 2.0)
    }

    /// Draws the text centered on the surface's origin.
    ///
    /// The surface state is saved before and restored after, so the style does
    /// not leak into later drawing.
    pub fn apply_style(&self, surface: &mut dyn DrawingSurface) {
        let size = self.measure_intrinsic_size(&*surface);
        log::trace!("Drawing text '{}' in a {:?} box.", self.text, size);

        surface.save();
        surface.set_fill_color(self.font_color);
        surface.set_font(&self.font_shorthand());
        surface.set_text_baseline(TextBaseline::Top);
        if self.has_shadow() {
            surface.set_shadow(&self.shadow);
        }
        surface.fill_text(
            &self.text,
            Vec2::new(-size.width / 2.0, -size.height / 2.0),
        );
        surface.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::FixedAdvanceMeasurer;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let style = TextStyle::new("Score");
        assert_eq!(style.text(), "Score");
        assert_eq!(style.font_family(), "Arial");
        assert_relative_eq!(style.font_size(), 14.0);
        assert_eq!(style.font_color(), LinearRgba::BLACK);
        assert_eq!(style.font_weight(), "400");
        assert!(!style.has_shadow());
        assert_eq!(style.shadow().color.to_hex(), "#CCCCCCFF");
    }

    #[test]
    fn test_font_strings() {
        let style = TextStyle::new("x")
            .with_font_family("Helvetica")
            .with_font_size(20.0)
            .with_font_weight("bold");
        assert_eq!(style.font_shorthand(), "bold 20px/20 Helvetica");
        assert_eq!(style.measure_font(), "20px Helvetica");

        let fractional = TextStyle::new("x").with_font_size(12.5);
        assert_eq!(fractional.measure_font(), "12.5px Arial");
    }

    #[test]
    fn test_shadow_visibility_and_reset() {
        let mut style = TextStyle::new("x").with_shadow(Shadow::blurred(LinearRgba::WHITE, 3.0));
        assert!(style.has_shadow());

        style.set_shadow(Shadow {
            color: LinearRgba::WHITE,
            blur: 0.0,
            offset: Vec2::new(0.0, 2.0),
        });
        assert!(style.has_shadow(), "An offset alone makes the shadow visible");

        style.reset_shadow();
        assert!(!style.has_shadow());
        assert_eq!(*style.shadow(), Shadow::default());
    }

    #[test]
    fn test_intrinsic_size_is_width_by_twice_the_font_size() {
        let style = TextStyle::new("abcd").with_font_size(10.0);
        let size = style.measure_intrinsic_size(&FixedAdvanceMeasurer::default());
        assert_relative_eq!(size.width, 20.0);
        assert_relative_eq!(size.height, 20.0);
    }

    #[test]
    fn test_style_deserializes_with_defaults() {
        let style: TextStyle =
            serde_json::from_str(r#"{ "text": "Hi", "font_size": 18.0 }"#).unwrap();
        assert_eq!(style.text(), "Hi");
        assert_relative_eq!(style.font_size(), 18.0);
        assert_eq!(style.font_family(), DEFAULT_FONT_FAMILY);
    }
}
