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

//! Provides the 2D math primitives used by sprite geometry and text layout.
//!
//! Everything here is expressed in logical pixels with `f32` components.
//! Offsets inside a sprite sheet may be negative, so unsigned extents are not used.

// --- Declare Sub-Modules ---

pub mod color;
pub mod geometry;
pub mod vector;

// --- Re-export Principal Types ---

pub use self::color::{ColorParseError, LinearRgba};
pub use self::geometry::{Rect, Size2};
pub use self::vector::Vec2;
