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

//! Defines the `LinearRgba` color type and its hex-string conversions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Represents a color in a **linear RGBA** color space using `f32` components.
///
/// Colors authored as sRGB hex strings (`#RRGGBB`) are converted to linear
/// space on parse and back to sRGB when formatted, so a round trip through
/// [`LinearRgba::from_hex`] and [`LinearRgba::to_hex`] is stable.
#[derive(
    Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize,
)]
#[repr(C)]
pub struct LinearRgba {
    /// The red component in linear space.
    pub r: f32,
    /// The green component in linear space.
    pub g: f32,
    /// The blue component in linear space.
    pub b: f32,
    /// The alpha (opacity) component, never gamma corrected.
    pub a: f32,
}

/// An error produced when a hex color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// The string (without `#`) is not 3, 6 or 8 characters long.
    #[error("invalid hex color length {len} in '{input}' (expected 3, 6 or 8 digits)")]
    InvalidLength {
        /// The offending input.
        input: String,
        /// The number of digits found.
        len: usize,
    },
    /// The string contains a character that is not a hexadecimal digit.
    #[error("invalid hex digit in color '{0}'")]
    InvalidDigit(String),
}

impl LinearRgba {
    /// Opaque white (`[1.0, 1.0, 1.0, 1.0]`).
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque black (`[0.0, 0.0, 0.0, 1.0]`).
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// Fully transparent black (`[0.0, 0.0, 0.0, 0.0]`).
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a new `LinearRgba` with explicit RGBA values.
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a new opaque `LinearRgba` (alpha = 1.0).
    #[inline]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Returns a new color with the same RGB components but a different alpha.
    #[inline]
    pub fn with_alpha(&self, a: f32) -> Self {
        Self { a, ..*self }
    }
}

#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

impl LinearRgba {
    /// Parses an sRGB hex string (`#RGB`, `#RRGGBB` or `#RRGGBBAA`, the `#` is optional).
    ///
    /// The RGB channels are converted to linear space; alpha is only normalized.
    ///
    /// # Example
    /// ```
    /// use cadence_core::math::LinearRgba;
    /// let grey = LinearRgba::from_hex("#ccc").unwrap();
    /// assert_eq!(grey.to_hex(), "#CCCCCCFF");
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let digits = hex.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit(hex.to_string()));
        }

        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => digits.to_string(),
            len => {
                return Err(ColorParseError::InvalidLength {
                    input: hex.to_string(),
                    len,
                })
            }
        };

        // Every character was checked above, so each pair parses.
        let channel = |i: usize| -> Result<f32, ColorParseError> {
            u8::from_str_radix(&expanded[i..i + 2], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| ColorParseError::InvalidDigit(hex.to_string()))
        };

        let a = if expanded.len() == 8 { channel(6)? } else { 1.0 };
        Ok(Self {
            r: srgb_to_linear(channel(0)?),
            g: srgb_to_linear(channel(2)?),
            b: srgb_to_linear(channel(4)?),
            a,
        })
    }

    /// Converts this linear color to an sRGB hex string (`#RRGGBBAA`).
    pub fn to_hex(&self) -> String {
        let r = linear_to_srgb(self.r).clamp(0.0, 1.0);
        let g = linear_to_srgb(self.g).clamp(0.0, 1.0);
        let b = linear_to_srgb(self.b).clamp(0.0, 1.0);
        let a = self.a.clamp(0.0, 1.0);

        format!(
            "#{:02X}{:02X}{:02X}{:02X}",
            (r * 255.0).round() as u8,
            (g * 255.0).round() as u8,
            (b * 255.0).round() as u8,
            (a * 255.0).round() as u8
        )
    }
}

impl Default for LinearRgba {
    fn default() -> Self {
        Self::BLACK
    }
}

impl std::str::FromStr for LinearRgba {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}
