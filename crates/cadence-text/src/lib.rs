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

//! # Cadence Text
//!
//! A declarative text style (font, color, shadow) and the small drawing
//! surface contract it renders through.

#![warn(missing_docs)]

pub mod style;
pub mod surface;

pub use style::{Shadow, TextStyle};
pub use surface::{DrawingSurface, FixedAdvanceMeasurer, TextBaseline, TextMeasurer};
