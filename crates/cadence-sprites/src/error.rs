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

//! Error types for sprite-sheet parsing and lookup.

use std::path::PathBuf;
use thiserror::Error;

/// An error produced by a [`SpriteSheet`](crate::SpriteSheet) or a
/// [`SheetParser`](crate::SheetParser).
#[derive(Debug, Error)]
pub enum SpriteSheetError {
    /// A frame was looked up before any preparation provided it.
    #[error("sprite not prepared on this sprite sheet: {0}")]
    FrameNotFound(String),
    /// The metadata file could not be read.
    #[error("failed to read sprite sheet metadata '{path}': {source}")]
    Io {
        /// The path that failed to load.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The metadata is not valid JSON for the atlas schema.
    #[error("malformed sprite sheet metadata: {0}")]
    Parse(#[from] serde_json::Error),
    /// A frame entry is well-formed JSON but describes impossible geometry.
    #[error("invalid frame '{name}': {reason}")]
    InvalidFrame {
        /// The name of the offending frame.
        name: String,
        /// What is wrong with it.
        reason: String,
    },
}
