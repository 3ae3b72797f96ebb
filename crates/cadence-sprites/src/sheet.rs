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

//! The sprite-sheet frame cache.

use crate::error::SpriteSheetError;
use crate::parser::{FrameGeometry, JsonSheetParser, SheetParser};
use cadence_core::{Rect, Size2, Vec2};
use std::collections::HashMap;
use std::path::Path;

/// A named region of an atlas image, ready to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteFrame<I> {
    image: I,
    geometry: FrameGeometry,
}

impl<I> SpriteFrame<I> {
    /// The atlas image the frame is cut from.
    pub fn image(&self) -> &I {
        &self.image
    }

    /// The full geometry record.
    pub fn geometry(&self) -> &FrameGeometry {
        &self.geometry
    }

    /// The region of the atlas holding the frame's pixels.
    pub fn source(&self) -> Rect {
        self.geometry.source
    }

    /// Offset of the trimmed pixels inside the untrimmed sprite.
    pub fn offset(&self) -> Vec2 {
        self.geometry.offset
    }

    /// Size of the untrimmed sprite.
    pub fn logical_size(&self) -> Size2 {
        self.geometry.logical_size
    }

    /// Whether the frame is stored rotated in the atlas.
    pub fn is_rotated(&self) -> bool {
        self.geometry.rotated
    }
}

/// Caches the frames of one or more atlases by name.
///
/// `I` is whatever handle the host uses for the atlas image (a texture id,
/// a shared pixel buffer...). It is cloned into every frame it backs.
///
/// Preparations accumulate: preparing a second atlas adds its frames, and a
/// frame name seen again is replaced by the newer one.
#[derive(Debug, Clone)]
pub struct SpriteSheet<I> {
    frames: HashMap<String, SpriteFrame<I>>,
}

impl<I> Default for SpriteSheet<I> {
    fn default() -> Self {
        Self {
            frames: HashMap::new(),
        }
    }
}

impl<I: Clone> SpriteSheet<I> {
    /// Creates an empty sprite sheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepares every frame described by JSON `metadata`, cut from `image`.
    ///
    /// Returns the number of frames prepared. On error the cache is unchanged.
    pub fn prepare(&mut self, image: I, metadata: &str) -> Result<usize, SpriteSheetError> {
        self.prepare_with(image, metadata, &JsonSheetParser)
    }

    /// Prepares frames using a custom metadata parser.
    pub fn prepare_with(
        &mut self,
        image: I,
        metadata: &str,
        parser: &dyn SheetParser,
    ) -> Result<usize, SpriteSheetError> {
        let parsed = parser.parse(metadata)?;
        let count = parsed.len();
        for (name, geometry) in parsed {
            let frame = SpriteFrame {
                image: image.clone(),
                geometry,
            };
            if self.frames.insert(name.clone(), frame).is_some() {
                log::debug!("Sprite frame '{name}' replaced by a newer preparation.");
            }
        }
        log::debug!("Prepared {count} sprite frame(s).");
        Ok(count)
    }

    /// Reads JSON metadata from a file and prepares its frames.
    pub fn prepare_from_file(
        &mut self,
        image: I,
        path: impl AsRef<Path>,
    ) -> Result<usize, SpriteSheetError> {
        let path = path.as_ref();
        let metadata = std::fs::read_to_string(path).map_err(|source| SpriteSheetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let count = self.prepare(image, &metadata)?;
        log::info!("Loaded {count} sprite frame(s) from '{}'.", path.display());
        Ok(count)
    }
}

impl<I> SpriteSheet<I> {
    /// Returns the frame prepared under `name`.
    ///
    /// # Errors
    /// [`SpriteSheetError::FrameNotFound`] if no preparation provided it.
    pub fn get_frame(&self, name: &str) -> Result<&SpriteFrame<I>, SpriteSheetError> {
        self.frames
            .get(name)
            .ok_or_else(|| SpriteSheetError::FrameNotFound(name.to_string()))
    }

    /// Whether a frame was prepared under `name`.
    pub fn has_frame(&self, name: &str) -> bool {
        self.frames.contains_key(name)
    }

    /// The names of every prepared frame, sorted.
    pub fn frame_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.frames.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The number of prepared frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether nothing has been prepared yet.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
