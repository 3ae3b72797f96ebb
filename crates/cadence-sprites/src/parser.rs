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

//! Atlas metadata parsers.
//!
//! A parser turns a serialized atlas description into one [`FrameGeometry`]
//! per named frame. [`JsonSheetParser`] reads the JSON layout exported by
//! common texture packers, in either of its two shapes:
//!
//! ```json
//! { "frames": { "hero.png": { "frame": { "x": 0, "y": 0, "w": 32, "h": 48 } } } }
//! { "frames": [ { "filename": "hero.png", "frame": { "x": 0, "y": 0, "w": 32, "h": 48 } } ] }
//! ```

use crate::error::SpriteSheetError;
use cadence_core::{Rect, Size2, Vec2};
use serde::Deserialize;
use std::collections::HashMap;

/// Where a frame lives in the atlas and how it maps back to the untrimmed sprite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameGeometry {
    /// The region of the atlas image holding the frame's pixels.
    ///
    /// For rotated frames this is the rotated footprint, so its width and
    /// height are the logical ones exchanged.
    pub source: Rect,
    /// Offset of the trimmed pixels inside the untrimmed sprite.
    pub offset: Vec2,
    /// Size of the untrimmed sprite.
    pub logical_size: Size2,
    /// Whether the frame is stored rotated by 90 degrees in the atlas.
    pub rotated: bool,
}

/// A parsed atlas: frame geometry keyed by frame name.
pub type ParsedSheet = HashMap<String, FrameGeometry>;

/// Turns serialized atlas metadata into frame geometry.
pub trait SheetParser {
    /// Parses `data` into per-frame geometry.
    fn parse(&self, data: &str) -> Result<ParsedSheet, SpriteSheetError>;
}

/// The default parser for JSON atlas metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSheetParser;

#[derive(Deserialize)]
struct RawSheet {
    frames: RawFrames,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFrames {
    Hash(HashMap<String, RawFrame>),
    Array(Vec<NamedFrame>),
}

#[derive(Deserialize)]
struct NamedFrame {
    filename: String,
    #[serde(flatten)]
    frame: RawFrame,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFrame {
    frame: RawRect,
    #[serde(default)]
    rotated: bool,
    #[serde(default)]
    frame_offset: Option<RawPoint>,
    #[serde(default)]
    source_size: Option<RawSize>,
}

#[derive(Deserialize)]
struct RawRect {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

#[derive(Deserialize)]
struct RawPoint {
    x: f32,
    y: f32,
}

#[derive(Deserialize)]
struct RawSize {
    w: f32,
    h: f32,
}

fn check_extent(name: &str, what: &str, w: f32, h: f32) -> Result<(), SpriteSheetError> {
    let valid = |v: f32| v.is_finite() && v >= 0.0;
    if valid(w) && valid(h) {
        Ok(())
    } else {
        Err(SpriteSheetError::InvalidFrame {
            name: name.to_string(),
            reason: format!("{what} must be finite and non-negative (got {w}x{h})"),
        })
    }
}

impl RawFrame {
    fn into_geometry(self, name: &str) -> Result<FrameGeometry, SpriteSheetError> {
        let RawRect { x, y, w, h } = self.frame;
        check_extent(name, "frame size", w, h)?;

        let logical_size = match self.source_size {
            Some(RawSize { w, h }) => {
                check_extent(name, "source size", w, h)?;
                Size2::new(w, h)
            }
            None => Size2::new(w, h),
        };

        let footprint = if self.rotated {
            Size2::new(w, h).transposed()
        } else {
            Size2::new(w, h)
        };

        Ok(FrameGeometry {
            source: Rect::from_origin_size(Vec2::new(x, y), footprint),
            offset: self
                .frame_offset
                .map_or(Vec2::ZERO, |RawPoint { x, y }| Vec2::new(x, y)),
            logical_size,
            rotated: self.rotated,
        })
    }
}

impl SheetParser for JsonSheetParser {
    fn parse(&self, data: &str) -> Result<ParsedSheet, SpriteSheetError> {
        let raw: RawSheet = serde_json::from_str(data)?;

        let named: Vec<(String, RawFrame)> = match raw.frames {
            RawFrames::Hash(frames) => frames.into_iter().collect(),
            RawFrames::Array(frames) => frames
                .into_iter()
                .map(|NamedFrame { filename, frame }| (filename, frame))
                .collect(),
        };

        named
            .into_iter()
            .map(|(name, frame)| frame.into_geometry(&name).map(|geometry| (name, geometry)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hash_form_with_all_fields() {
        let json = r#"{
            "frames": {
                "walk_01": {
                    "frame": { "x": 10, "y": 20, "w": 30, "h": 40 },
                    "rotated": false,
                    "frameOffset": { "x": 2, "y": -3 },
                    "sourceSize": { "w": 34, "h": 44 }
                }
            }
        }"#;

        let sheet = JsonSheetParser.parse(json).unwrap();
        let frame = sheet["walk_01"];
        assert_eq!(frame.source, Rect::new(10.0, 20.0, 30.0, 40.0));
        assert_relative_eq!(frame.offset.x, 2.0);
        assert_relative_eq!(frame.offset.y, -3.0);
        assert_eq!(frame.logical_size, Size2::new(34.0, 44.0));
        assert!(!frame.rotated);
    }

    #[test]
    fn test_rotated_frame_swaps_source_extent() {
        let json = r#"{ "frames": { "door": {
            "frame": { "x": 0, "y": 0, "w": 16, "h": 64 },
            "rotated": true
        } } }"#;

        let frame = JsonSheetParser.parse(json).unwrap()["door"];
        assert!(frame.rotated);
        assert_eq!(frame.source.size(), Size2::new(64.0, 16.0));
        assert_eq!(frame.logical_size, Size2::new(16.0, 64.0));
        assert_eq!(frame.offset, Vec2::ZERO);
    }

    #[test]
    fn test_array_form() {
        let json = r#"{ "frames": [
            { "filename": "a", "frame": { "x": 0, "y": 0, "w": 8, "h": 8 } },
            { "filename": "b", "frame": { "x": 8, "y": 0, "w": 8, "h": 8 },
              "frameOffset": { "x": 1, "y": 1 } }
        ] }"#;

        let sheet = JsonSheetParser.parse(json).unwrap();
        assert_eq!(sheet.len(), 2);
        assert_eq!(sheet["b"].source.x, 8.0);
        assert_eq!(sheet["b"].offset, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_malformed_metadata_is_rejected() {
        assert!(matches!(
            JsonSheetParser.parse("not json"),
            Err(SpriteSheetError::Parse(_))
        ));
        assert!(matches!(
            JsonSheetParser.parse(r#"{ "frames": { "x": { "rotated": true } } }"#),
            Err(SpriteSheetError::Parse(_))
        ));
        assert!(matches!(
            JsonSheetParser.parse(r#"{ "frames": { "x": { "frame": { "x": 0, "y": 0, "w": -1, "h": 2 } } } }"#),
            Err(SpriteSheetError::InvalidFrame { .. })
        ));
    }
}
