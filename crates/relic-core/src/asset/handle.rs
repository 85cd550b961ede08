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

use super::{AssetData, AssetId, AssetMetadata, AssetStatus, AssetType};
use crate::naming::AssetLocation;
use std::{
    any::Any,
    fmt,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

/// The type-erased view of an asset, as stored by the catalog.
///
/// Every asset exposes its [`AssetMetadata`] through interior locks so that it
/// can be inspected and mutated through a shared `Arc`. The payload itself is
/// only reachable after downcasting to [`Asset<T>`], which
/// [`GenericAssetRef::cast`](super::GenericAssetRef::cast) does safely.
pub trait ErasedAsset: Any + Send + Sync {
    /// Locks the metadata for reading.
    fn metadata(&self) -> RwLockReadGuard<'_, AssetMetadata>;

    /// Locks the metadata for writing.
    fn metadata_mut(&self) -> RwLockWriteGuard<'_, AssetMetadata>;

    /// Name of the concrete payload type, for diagnostics.
    fn payload_type_name(&self) -> &'static str;

    /// Upcasts to `&dyn Any`.
    fn as_any(&self) -> &dyn Any;

    /// Upcasts a shared handle to `Arc<dyn Any>` so it can be downcast.
    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;

    /// Upcasts an owned box to `Box<dyn Any>` so it can be downcast.
    fn into_any_box(self: Box<Self>) -> Box<dyn Any + Send + Sync>;

    /// The asset id.
    fn id(&self) -> AssetId {
        self.metadata().id
    }

    /// A copy of the asset location.
    fn location(&self) -> AssetLocation {
        self.metadata().location.clone()
    }

    /// The payload kind.
    fn asset_type(&self) -> AssetType {
        self.metadata().asset_type
    }

    /// The payload status.
    fn status(&self) -> AssetStatus {
        self.metadata().status
    }

    /// Returns `true` if the payload is present.
    fn is_loaded(&self) -> bool {
        self.status() == AssetStatus::Loaded
    }
}

impl fmt::Debug for dyn ErasedAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let metadata = self.metadata();
        f.debug_struct("ErasedAsset")
            .field("payload", &self.payload_type_name())
            .field("id", &metadata.id)
            .field("location", &metadata.location.full_location())
            .field("status", &metadata.status)
            .finish()
    }
}

/// A typed asset: metadata plus an optional payload of type `T`.
///
/// The catalog owns every `Asset<T>` through an `Arc`. Consumers reach it
/// through [`AssetRef<T>`](super::AssetRef) and mutate it in place through the
/// locks below.
pub struct Asset<T: AssetData> {
    metadata: RwLock<AssetMetadata>,
    data: RwLock<Option<T>>,
}

impl<T: AssetData> Asset<T> {
    /// Creates an asset without payload.
    pub fn new() -> Self {
        Self {
            metadata: RwLock::new(AssetMetadata::new(T::TYPE)),
            data: RwLock::new(None),
        }
    }

    /// Creates an asset holding `data`.
    pub fn with_data(data: T) -> Self {
        let asset = Self::new();
        asset.set_data(data);
        asset
    }

    /// Creates an asset without payload at `location`.
    pub fn at(location: AssetLocation) -> Self {
        let asset = Self::new();
        asset.metadata_mut().location = location;
        asset
    }

    /// Locks the payload for reading.
    pub fn data(&self) -> RwLockReadGuard<'_, Option<T>> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Locks the payload for writing.
    ///
    /// The status is not updated when the payload is changed through this
    /// guard. Prefer [`Asset::set_data`] and [`Asset::take_data`].
    pub fn data_mut(&self) -> RwLockWriteGuard<'_, Option<T>> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores `data` and marks the asset as loaded.
    pub fn set_data(&self, data: T) {
        *self.data_mut() = Some(data);
        self.metadata_mut().status = AssetStatus::Loaded;
    }

    /// Removes the payload and marks the asset as unloaded.
    pub fn take_data(&self) -> Option<T> {
        let data = self.data_mut().take();
        self.metadata_mut().status = AssetStatus::Unloaded;
        data
    }

    /// Returns `true` if a payload is present.
    pub fn has_data(&self) -> bool {
        self.data().is_some()
    }

    /// Overrides the status, e.g. to flag a failed load.
    pub fn set_status(&self, status: AssetStatus) {
        self.metadata_mut().status = status;
    }
}

impl<T: AssetData> Default for Asset<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: AssetData> ErasedAsset for Asset<T> {
    fn metadata(&self) -> RwLockReadGuard<'_, AssetMetadata> {
        self.metadata.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn metadata_mut(&self) -> RwLockWriteGuard<'_, AssetMetadata> {
        self.metadata.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn payload_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn into_any_box(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
        self
    }
}

impl<T: AssetData> fmt::Debug for Asset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self as &dyn ErasedAsset, f)
    }
}
