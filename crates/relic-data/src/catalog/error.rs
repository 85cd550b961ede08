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

use relic_core::asset::AssetId;
use thiserror::Error;

/// Errors returned by catalog operations that can be refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The operation would give an asset a location already used by another one.
    #[error("Location '{location}' is already used by asset {occupant}")]
    LocationOccupied {
        /// The full location that is taken.
        location: String,
        /// The asset currently holding it.
        occupant: AssetId,
    },
    /// No asset lives in the folder.
    #[error("Folder '{0}' does not contain any asset")]
    FolderNotFound(String),
    /// The folder path cannot be used for this operation.
    #[error("Invalid folder path '{path}': {reason}")]
    InvalidPath {
        /// The rejected path.
        path: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}
