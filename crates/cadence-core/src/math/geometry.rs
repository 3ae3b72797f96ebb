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

//! Provides 2D sizes and axis-aligned rectangles.
//!
//! These describe regions inside a texture atlas and the measured extent of
//! rendered text.

use super::Vec2;
use serde::{Deserialize, Serialize};

/// A two-dimensional size in logical pixels.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size2 {
    /// The horizontal extent.
    pub width: f32,
    /// The vertical extent.
    pub height: f32,
}

impl Size2 {
    /// Creates a new `Size2`.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the size with width and height exchanged.
    #[inline]
    pub const fn transposed(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Returns the area covered by this size.
    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

/// An axis-aligned rectangle defined by its top-left corner and its size.
///
/// The y axis grows downwards, matching image and atlas coordinates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// The x-coordinate of the left edge.
    pub x: f32,
    /// The y-coordinate of the top edge.
    pub y: f32,
    /// The width of the rectangle.
    pub width: f32,
    /// The height of the rectangle.
    pub height: f32,
}

impl Rect {
    /// Creates a new `Rect` from its top-left corner and extent.
    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a `Rect` from an origin and a [`Size2`].
    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Size2) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// The top-left corner.
    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// The bottom-right corner.
    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.width, self.y + self.height)
    }

    /// The extent of the rectangle.
    #[inline]
    pub fn size(&self) -> Size2 {
        Size2::new(self.width, self.height)
    }

    /// Checks if a point lies inside the rectangle (edges inclusive).
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.x && point.x <= max.x && point.y >= self.y && point.y <= max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rect_corners_and_size() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.min(), Vec2::new(10.0, 20.0));
        assert_eq!(rect.max(), Vec2::new(40.0, 60.0));
        assert_eq!(rect.size(), Size2::new(30.0, 40.0));
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect::from_origin_size(Vec2::ZERO, Size2::new(4.0, 2.0));
        assert!(rect.contains(Vec2::new(0.0, 0.0)));
        assert!(rect.contains(Vec2::new(4.0, 2.0)));
        assert!(rect.contains(Vec2::new(2.0, 1.0)));
        assert!(!rect.contains(Vec2::new(4.1, 1.0)));
        assert!(!rect.contains(Vec2::new(1.0, -0.1)));
    }

    #[test]
    fn test_size_transpose_and_area() {
        let size = Size2::new(3.5, 2.0);
        assert_eq!(size.transposed(), Size2::new(2.0, 3.5));
        assert_relative_eq!(size.area(), 7.0);
    }
}
