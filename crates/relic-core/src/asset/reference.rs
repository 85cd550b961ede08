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

use super::{Asset, AssetData, AssetId, AssetType, ErasedAsset};
use crate::naming::AssetLocation;
use std::{
    fmt,
    sync::{Arc, Weak},
};

/// A non-owning, type-erased reference to an asset stored in a catalog.
///
/// The reference never keeps the asset alive: once the catalog deletes the
/// asset, [`GenericAssetRef::lock`] returns `None` and
/// [`GenericAssetRef::is_valid`] returns `false`. Upgrading with `lock` is the
/// only way to reach the asset.
#[derive(Clone, Default)]
pub struct GenericAssetRef {
    inner: Option<Weak<dyn ErasedAsset>>,
}

impl GenericAssetRef {
    /// A reference that points to nothing.
    pub fn null() -> Self {
        Self { inner: None }
    }

    /// Observes `asset` without taking ownership of it.
    pub fn new(asset: &Arc<dyn ErasedAsset>) -> Self {
        Self {
            inner: Some(Arc::downgrade(asset)),
        }
    }

    /// Returns `true` if the reference was never pointed at an asset.
    pub fn is_null(&self) -> bool {
        self.inner.is_none()
    }

    /// Returns `true` while the referenced asset is still owned by its catalog.
    pub fn is_valid(&self) -> bool {
        self.inner.as_ref().is_some_and(|weak| weak.strong_count() > 0)
    }

    /// Upgrades to a strong handle, or `None` if the asset is gone.
    ///
    /// The returned `Arc` keeps the asset alive; drop it as soon as the access
    /// is done.
    pub fn lock(&self) -> Option<Arc<dyn ErasedAsset>> {
        self.inner.as_ref().and_then(Weak::upgrade)
    }

    /// Converts into a typed reference.
    ///
    /// The asset kind is compared against `T::TYPE` first, then the concrete
    /// type is checked. Any mismatch, or a dead reference, yields a null
    /// [`AssetRef<T>`].
    pub fn cast<T: AssetData>(&self) -> AssetRef<T> {
        let Some(asset) = self.lock() else {
            return AssetRef::null();
        };
        if asset.asset_type() != T::TYPE {
            return AssetRef::null();
        }
        match asset.into_any_arc().downcast::<Asset<T>>() {
            Ok(typed) => AssetRef::new(&typed),
            Err(_) => AssetRef::null(),
        }
    }

    /// The id of the referenced asset, if it is still alive.
    pub fn id(&self) -> Option<AssetId> {
        self.lock().map(|asset| asset.id())
    }

    /// The location of the referenced asset, if it is still alive.
    pub fn location(&self) -> Option<AssetLocation> {
        self.lock().map(|asset| asset.location())
    }

    /// The kind of the referenced asset, if it is still alive.
    pub fn asset_type(&self) -> Option<AssetType> {
        self.lock().map(|asset| asset.asset_type())
    }

    /// Returns `true` if both references observe the same allocation, or are
    /// both null.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.inner, &other.inner) {
            (Some(a), Some(b)) => Weak::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl PartialEq for GenericAssetRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for GenericAssetRef {}

impl fmt::Debug for GenericAssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lock() {
            Some(asset) => f
                .debug_tuple("GenericAssetRef")
                .field(&asset.location().full_location())
                .finish(),
            None if self.is_null() => f.write_str("GenericAssetRef(null)"),
            None => f.write_str("GenericAssetRef(expired)"),
        }
    }
}

/// A non-owning reference to an asset whose payload is of type `T`.
///
/// Same lifetime rules as [`GenericAssetRef`], with direct access to the
/// typed [`Asset<T>`] once locked.
pub struct AssetRef<T: AssetData> {
    inner: Option<Weak<Asset<T>>>,
}

impl<T: AssetData> AssetRef<T> {
    /// A reference that points to nothing.
    pub fn null() -> Self {
        Self { inner: None }
    }

    /// Observes `asset` without taking ownership of it.
    pub fn new(asset: &Arc<Asset<T>>) -> Self {
        Self {
            inner: Some(Arc::downgrade(asset)),
        }
    }

    /// Returns `true` if the reference was never pointed at an asset.
    pub fn is_null(&self) -> bool {
        self.inner.is_none()
    }

    /// Returns `true` while the referenced asset is still owned by its catalog.
    pub fn is_valid(&self) -> bool {
        self.inner.as_ref().is_some_and(|weak| weak.strong_count() > 0)
    }

    /// Upgrades to a strong handle, or `None` if the asset is gone.
    pub fn lock(&self) -> Option<Arc<Asset<T>>> {
        self.inner.as_ref().and_then(Weak::upgrade)
    }

    /// Returns `true` if the asset is alive and holds its payload.
    pub fn is_loaded(&self) -> bool {
        self.lock().is_some_and(|asset| asset.is_loaded())
    }

    /// The id of the referenced asset, if it is still alive.
    pub fn id(&self) -> Option<AssetId> {
        self.lock().map(|asset| asset.id())
    }

    /// The location of the referenced asset, if it is still alive.
    pub fn location(&self) -> Option<AssetLocation> {
        self.lock().map(|asset| asset.location())
    }

    /// Drops the static type.
    pub fn into_generic(self) -> GenericAssetRef {
        self.into()
    }

    /// Returns a type-erased copy of this reference.
    pub fn to_generic(&self) -> GenericAssetRef {
        self.clone().into()
    }

    /// Returns `true` if both references observe the same allocation, or are
    /// both null.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.inner, &other.inner) {
            (Some(a), Some(b)) => Weak::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: AssetData> Clone for AssetRef<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: AssetData> Default for AssetRef<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T: AssetData> PartialEq for AssetRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T: AssetData> Eq for AssetRef<T> {}

impl<T: AssetData> fmt::Debug for AssetRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lock() {
            Some(asset) => f
                .debug_tuple("AssetRef")
                .field(&asset.location().full_location())
                .finish(),
            None if self.is_null() => f.write_str("AssetRef(null)"),
            None => f.write_str("AssetRef(expired)"),
        }
    }
}

impl<T: AssetData> From<AssetRef<T>> for GenericAssetRef {
    fn from(value: AssetRef<T>) -> Self {
        let inner = value.inner.map(|weak| weak as Weak<dyn ErasedAsset>);
        Self { inner }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sprite;

    impl AssetData for Sprite {
        const TYPE: AssetType = AssetType::Texture;
    }

    struct Clip;

    impl AssetData for Clip {
        const TYPE: AssetType = AssetType::Sound;
    }

    // Same kind as `Sprite`, different concrete type.
    struct OtherSprite;

    impl AssetData for OtherSprite {
        const TYPE: AssetType = AssetType::Texture;
    }

    fn owned_sprite() -> Arc<dyn ErasedAsset> {
        Arc::new(Asset::with_data(Sprite))
    }

    #[test]
    fn test_null_reference() {
        let reference = GenericAssetRef::null();
        assert!(reference.is_null());
        assert!(!reference.is_valid());
        assert!(reference.lock().is_none());
        assert!(reference.cast::<Sprite>().is_null());
        assert_eq!(reference, GenericAssetRef::default());
    }

    #[test]
    fn test_reference_does_not_extend_lifetime() {
        let owner = owned_sprite();
        let reference = GenericAssetRef::new(&owner);
        let copy = reference.clone();
        assert!(reference.is_valid());
        assert!(copy.is_valid());

        drop(owner);
        assert!(!reference.is_valid());
        assert!(!reference.is_null());
        assert!(copy.lock().is_none());
        assert!(reference.id().is_none());
    }

    #[test]
    fn test_cast_to_matching_type() {
        let owner = owned_sprite();
        let typed = GenericAssetRef::new(&owner).cast::<Sprite>();
        assert!(typed.is_valid());
        assert!(typed.is_loaded());

        drop(owner);
        assert!(!typed.is_valid());
    }

    #[test]
    fn test_cast_to_wrong_type_is_null() {
        let owner = owned_sprite();
        let reference = GenericAssetRef::new(&owner);
        assert!(reference.cast::<Clip>().is_null());
        assert!(reference.cast::<OtherSprite>().is_null());
    }

    #[test]
    fn test_typed_to_generic_and_back() {
        let owner = Arc::new(Asset::with_data(Sprite));
        let typed = AssetRef::new(&owner);
        let generic = typed.to_generic();
        assert_eq!(generic.asset_type(), Some(AssetType::Texture));
        assert!(generic.cast::<Sprite>().ptr_eq(&typed));
        assert_eq!(typed.clone().into_generic(), generic);
    }

    #[test]
    fn test_equality_is_identity() {
        let a = owned_sprite();
        let b = owned_sprite();
        assert_eq!(GenericAssetRef::new(&a), GenericAssetRef::new(&a));
        assert_ne!(GenericAssetRef::new(&a), GenericAssetRef::new(&b));
        assert_ne!(GenericAssetRef::new(&a), GenericAssetRef::null());
    }
}
