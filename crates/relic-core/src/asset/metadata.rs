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

use super::id::AssetId;
use crate::naming::AssetLocation;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

/// The kind of payload an asset carries.
///
/// The kind is checked before any typed downcast, and its upper-case name is
/// used when generating dependency locations (`Hero_TEXTURE1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetType {
    /// No specific kind. Used by payloads outside the built-in set.
    #[default]
    Unknown,
    /// A decoded image.
    Texture,
    /// Surface parameters referencing textures.
    Material,
    /// A mesh hierarchy.
    Model,
    /// A short sound effect.
    Sound,
    /// A streamed music track.
    Music,
    /// A font face.
    Font,
    /// Shader source or bytecode.
    Shader,
    /// A script.
    Script,
}

impl AssetType {
    /// Every kind, in declaration order.
    pub const ALL: [AssetType; 9] = [
        AssetType::Unknown,
        AssetType::Texture,
        AssetType::Material,
        AssetType::Model,
        AssetType::Sound,
        AssetType::Music,
        AssetType::Font,
        AssetType::Shader,
        AssetType::Script,
    ];

    /// The upper-case name of the kind.
    pub fn name(self) -> &'static str {
        match self {
            AssetType::Unknown => "UNKNOWN",
            AssetType::Texture => "TEXTURE",
            AssetType::Material => "MATERIAL",
            AssetType::Model => "MODEL",
            AssetType::Sound => "SOUND",
            AssetType::Music => "MUSIC",
            AssetType::Font => "FONT",
            AssetType::Shader => "SHADER",
            AssetType::Script => "SCRIPT",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether an asset currently holds its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AssetStatus {
    /// The payload is present.
    Loaded,
    /// No payload has been set yet, or it was taken out.
    #[default]
    Unloaded,
    /// Producing the payload failed.
    Error,
}

/// Identity of an asset catalog instance.
///
/// Each catalog draws a fresh id from a process-wide counter, so assets can
/// record which catalog owns them without holding a pointer back to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CatalogId(u64);

impl CatalogId {
    /// Returns a new id, distinct from every id handed out before.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "catalog#{}", self.0)
    }
}

/// Everything the asset system knows about an asset besides its payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetMetadata {
    /// The kind of payload.
    pub asset_type: AssetType,

    /// Whether the payload is present.
    pub status: AssetStatus,

    /// Informational counter of known users. The asset system never reads
    /// it to decide lifetimes.
    pub reference_count: u64,

    /// The unique id. Nil until the asset is registered.
    pub id: AssetId,

    /// Where the asset lives.
    pub location: AssetLocation,

    /// The catalog that owns the asset, if it has been registered.
    #[serde(skip)]
    pub catalog: Option<CatalogId>,
}

impl AssetMetadata {
    /// Metadata for a fresh, unregistered asset of the given kind.
    pub fn new(asset_type: AssetType) -> Self {
        Self {
            asset_type,
            status: AssetStatus::Unloaded,
            reference_count: 0,
            id: AssetId::NIL,
            location: AssetLocation::default(),
            catalog: None,
        }
    }
}

impl Default for AssetMetadata {
    fn default() -> Self {
        Self::new(AssetType::Unknown)
    }
}
