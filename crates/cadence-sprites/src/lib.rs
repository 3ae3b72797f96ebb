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

//! # Cadence Sprites
//!
//! Sprite-sheet support: parsers that turn atlas metadata into per-frame
//! geometry, and a [`SpriteSheet`] cache that maps frame names to drawable
//! frames.

#![warn(missing_docs)]

pub mod error;
pub mod parser;
pub mod sheet;

pub use error::SpriteSheetError;
pub use parser::{FrameGeometry, JsonSheetParser, ParsedSheet, SheetParser};
pub use sheet::{SpriteFrame, SpriteSheet};
