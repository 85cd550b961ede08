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

//! The owning store of every live asset.

use relic_core::{
    asset::{Asset, AssetData, AssetId, AssetRef, CatalogId, ErasedAsset, GenericAssetRef},
    naming::AssetLocation,
};
use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, OnceLock, RwLock},
};

/// The single owner of asset memory.
///
/// The catalog holds the only strong reference to each asset, keyed by its
/// [`AssetId`]. Everything else observes assets through [`GenericAssetRef`]
/// and [`AssetRef<T>`], which stop resolving as soon as the catalog drops the
/// asset.
///
/// A catalog is an ordinary value: create one with [`AssetCatalog::new`] and
/// pass it by reference to the code that needs it. Mutating operations take
/// `&mut self`, so exclusive access is enforced by the borrow checker. Code
/// that needs a process-wide instance can use [`AssetCatalog::global`].
pub struct AssetCatalog {
    id: CatalogId,
    assets: HashMap<AssetId, Arc<dyn ErasedAsset>>,
}

impl AssetCatalog {
    /// Creates a new, empty catalog with its own identity.
    pub fn new() -> Self {
        Self {
            id: CatalogId::next(),
            assets: HashMap::new(),
        }
    }

    /// Returns the lazily created process-wide catalog.
    ///
    /// The first call creates the instance. Concurrent first calls all observe
    /// the same instance.
    pub fn global() -> &'static RwLock<AssetCatalog> {
        static GLOBAL: OnceLock<RwLock<AssetCatalog>> = OnceLock::new();
        GLOBAL.get_or_init(|| {
            log::debug!("Creating the global asset catalog");
            RwLock::new(AssetCatalog::new())
        })
    }

    /// The identity stamped into the metadata of every asset this catalog owns.
    pub fn id(&self) -> CatalogId {
        self.id
    }

    /// Takes ownership of `asset` and stores it at `location`.
    ///
    /// A nil id is replaced by a fresh random one. The asset location is
    /// overwritten with `location`. Passing `None` is a no-op returning a null
    /// reference.
    pub fn register_asset(
        &mut self,
        location: AssetLocation,
        asset: Option<Box<dyn ErasedAsset>>,
    ) -> GenericAssetRef {
        let Some(asset) = asset else {
            return GenericAssetRef::null();
        };
        let asset: Arc<dyn ErasedAsset> = Arc::from(asset);
        self.store(location, asset.clone());
        GenericAssetRef::new(&asset)
    }

    /// Typed counterpart of [`AssetCatalog::register_asset`].
    pub fn register_typed_asset<T: AssetData>(
        &mut self,
        location: AssetLocation,
        asset: Asset<T>,
    ) -> AssetRef<T> {
        let asset = Arc::new(asset);
        self.store(location, asset.clone());
        AssetRef::new(&asset)
    }

    /// Creates and registers an asset of type `T` without payload.
    pub fn create_asset<T: AssetData>(&mut self, location: AssetLocation) -> AssetRef<T> {
        self.register_typed_asset(location, Asset::new())
    }

    /// Creates and registers an asset of type `T` holding `data`.
    pub fn create_asset_with_data<T: AssetData>(
        &mut self,
        location: AssetLocation,
        data: T,
    ) -> AssetRef<T> {
        self.register_typed_asset(location, Asset::with_data(data))
    }

    fn store(&mut self, location: AssetLocation, asset: Arc<dyn ErasedAsset>) {
        let id = {
            let mut metadata = asset.metadata_mut();
            if metadata.id.is_nil() {
                metadata.id = AssetId::new();
            }
            metadata.location = location;
            metadata.catalog = Some(self.id);
            metadata.id
        };
        if let Some(previous) = self.assets.insert(id, asset) {
            log::warn!(
                "Asset {} replaced '{}' in the catalog, existing references to it are now invalid",
                id,
                previous.location()
            );
        }
    }

    /// Looks an asset up by id. Unknown ids yield a null reference.
    pub fn get_asset(&self, id: AssetId) -> GenericAssetRef {
        self.assets
            .get(&id)
            .map(GenericAssetRef::new)
            .unwrap_or_default()
    }

    /// Looks an asset up by location. Unknown locations yield a null reference.
    ///
    /// This is a linear scan: locations can change through any live handle, so
    /// they are not indexed.
    pub fn get_asset_by_location(&self, location: &AssetLocation) -> GenericAssetRef {
        self.assets
            .values()
            .find(|asset| asset.metadata().location == *location)
            .map(GenericAssetRef::new)
            .unwrap_or_default()
    }

    /// Returns a reference to every asset.
    pub fn get_assets(&self) -> Vec<GenericAssetRef> {
        self.get_assets_view().collect()
    }

    /// Lazily yields a reference to every asset.
    pub fn get_assets_view(&self) -> impl Iterator<Item = GenericAssetRef> + '_ {
        self.assets.values().map(GenericAssetRef::new)
    }

    /// Returns a typed reference to every asset holding a `T` payload.
    pub fn get_assets_of_type<T: AssetData>(&self) -> Vec<AssetRef<T>> {
        self.get_assets_of_type_view::<T>().collect()
    }

    /// Lazily yields a typed reference to every asset holding a `T` payload.
    pub fn get_assets_of_type_view<T: AssetData>(&self) -> impl Iterator<Item = AssetRef<T>> + '_ {
        self.assets
            .values()
            .filter(|asset| asset.asset_type() == T::TYPE)
            .map(|asset| GenericAssetRef::new(asset).cast::<T>())
            .filter(|reference| !reference.is_null())
    }

    /// Moves the asset to `path`, leaving its name, pack and id untouched.
    ///
    /// Returns `false` if no asset has this id.
    pub fn move_asset(&mut self, id: AssetId, path: &str) -> bool {
        match self.assets.get(&id) {
            Some(asset) => {
                asset.metadata_mut().location.set_path(path);
                true
            }
            None => false,
        }
    }

    /// Moves the referenced asset to `path`.
    ///
    /// Returns `false` if the reference is dead or the asset belongs to
    /// another catalog.
    pub fn move_asset_ref(&mut self, asset: &GenericAssetRef, path: &str) -> bool {
        match self.owned_id(asset) {
            Some(id) => self.move_asset(id, path),
            None => false,
        }
    }

    /// Drops the catalog's ownership of the asset. Every reference to it
    /// becomes invalid unless a caller still holds a locked handle.
    ///
    /// Assets referenced by the deleted one are not deleted. Returns `false`
    /// if no asset has this id.
    pub fn delete_asset(&mut self, id: AssetId) -> bool {
        match self.assets.remove(&id) {
            Some(asset) => {
                log::debug!("Deleted asset '{}' ({})", asset.location(), id);
                true
            }
            None => {
                log::debug!("Asked to delete unknown asset {}", id);
                false
            }
        }
    }

    /// Deletes the referenced asset.
    pub fn delete_asset_ref(&mut self, asset: &GenericAssetRef) -> bool {
        match self.owned_id(asset) {
            Some(id) => self.delete_asset(id),
            None => false,
        }
    }

    /// Returns `true` if an asset with this id is stored.
    pub fn contains(&self, id: AssetId) -> bool {
        self.assets.contains_key(&id)
    }

    /// Returns `true` if some asset is stored at `location`.
    pub fn contains_location(&self, location: &AssetLocation) -> bool {
        !self.get_asset_by_location(location).is_null()
    }

    /// Number of stored assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Returns `true` if the catalog holds no asset.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Drops every asset.
    pub fn clear(&mut self) {
        self.assets.clear();
    }

    pub(super) fn stored(&self) -> impl Iterator<Item = (&AssetId, &Arc<dyn ErasedAsset>)> {
        self.assets.iter()
    }

    fn owned_id(&self, asset: &GenericAssetRef) -> Option<AssetId> {
        let asset = asset.lock()?;
        let metadata = asset.metadata();
        (metadata.catalog == Some(self.id)).then_some(metadata.id)
    }
}

impl Default for AssetCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AssetCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetCatalog")
            .field("id", &self.id)
            .field("assets", &self.assets.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relic_core::asset::{AssetStatus, AssetType};

    #[derive(Debug, PartialEq)]
    struct Note(String);

    impl AssetData for Note {
        const TYPE: AssetType = AssetType::Script;
    }

    struct Beep;

    impl AssetData for Beep {
        const TYPE: AssetType = AssetType::Sound;
    }

    fn loc(full: &str) -> AssetLocation {
        full.parse().unwrap()
    }

    #[test]
    fn test_register_assigns_id_location_and_catalog() {
        let mut catalog = AssetCatalog::new();
        let reference = catalog.register_asset(
            loc("readme@docs"),
            Some(Box::new(Asset::with_data(Note("hi".into())))),
        );

        let asset = reference.lock().unwrap();
        let metadata = asset.metadata();
        assert!(!metadata.id.is_nil());
        assert_eq!(metadata.location, loc("readme@docs"));
        assert_eq!(metadata.catalog, Some(catalog.id()));
        assert_eq!(metadata.status, AssetStatus::Loaded);
        assert!(catalog.contains(metadata.id));
    }

    #[test]
    fn test_register_keeps_existing_id() {
        let mut catalog = AssetCatalog::new();
        let asset = Asset::<Note>::new();
        let id = AssetId::new();
        asset.metadata_mut().id = id;

        let reference = catalog.register_asset(loc("a"), Some(Box::new(asset)));
        assert_eq!(reference.id(), Some(id));
    }

    #[test]
    fn test_register_none_is_noop() {
        let mut catalog = AssetCatalog::new();
        let reference = catalog.register_asset(loc("a"), None);
        assert!(reference.is_null());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_create_asset_variants() {
        let mut catalog = AssetCatalog::new();
        let empty = catalog.create_asset::<Note>(loc("empty"));
        let full = catalog.create_asset_with_data(loc("full"), Note("x".into()));

        assert!(empty.is_valid());
        assert!(!empty.is_loaded());
        assert!(full.is_loaded());
        assert_eq!(
            full.lock().unwrap().data().as_ref(),
            Some(&Note("x".into()))
        );
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_lookup_by_id_and_location() {
        let mut catalog = AssetCatalog::new();
        let reference = catalog.create_asset::<Note>(loc("pack::hero@chars"));
        let id = reference.id().unwrap();

        assert!(catalog.get_asset(id).cast::<Note>().ptr_eq(&reference));
        assert_eq!(catalog.get_asset_by_location(&loc("pack::hero@chars")).id(), Some(id));
        assert!(catalog.get_asset_by_location(&loc("hero@chars")).is_null());
        assert!(catalog.get_asset(AssetId::new()).is_null());
    }

    #[test]
    fn test_lookup_follows_in_place_location_changes() {
        let mut catalog = AssetCatalog::new();
        let reference = catalog.create_asset::<Note>(loc("old@a"));
        reference
            .lock()
            .unwrap()
            .metadata_mut()
            .location
            .set_name("new")
            .unwrap();

        assert!(catalog.get_asset_by_location(&loc("old@a")).is_null());
        assert_eq!(
            catalog.get_asset_by_location(&loc("new@a")).id(),
            reference.id()
        );
    }

    #[test]
    fn test_views_and_type_filters() {
        let mut catalog = AssetCatalog::new();
        catalog.create_asset::<Note>(loc("n1"));
        catalog.create_asset::<Note>(loc("n2"));
        catalog.create_asset::<Beep>(loc("b1"));

        assert_eq!(catalog.get_assets().len(), 3);
        assert_eq!(catalog.get_assets_view().count(), 3);
        assert_eq!(catalog.get_assets_of_type::<Note>().len(), 2);
        assert_eq!(catalog.get_assets_of_type_view::<Beep>().count(), 1);
    }

    #[test]
    fn test_move_asset_only_changes_path() {
        let mut catalog = AssetCatalog::new();
        let reference = catalog.create_asset::<Note>(loc("pack::hero@a"));
        let id = reference.id().unwrap();

        assert!(catalog.move_asset(id, "/b//c/"));
        assert_eq!(reference.location(), Some(loc("pack::hero@b/c")));
        assert_eq!(reference.id(), Some(id));
        assert!(reference.is_valid());

        assert!(catalog.move_asset_ref(&reference.to_generic(), ""));
        assert_eq!(reference.location(), Some(loc("pack::hero")));
        assert!(!catalog.move_asset(AssetId::new(), "x"));
    }

    #[test]
    fn test_delete_invalidates_references() {
        let mut catalog = AssetCatalog::new();
        let reference = catalog.create_asset_with_data(loc("doomed"), Note("bye".into()));
        let generic = reference.to_generic();

        assert!(catalog.delete_asset_ref(&generic));
        assert!(!reference.is_valid());
        assert!(reference.lock().is_none());
        assert!(!generic.is_valid());
        assert!(catalog.is_empty());

        assert!(!catalog.delete_asset_ref(&generic));
        assert!(!catalog.delete_asset(AssetId::new()));
    }

    #[test]
    fn test_refs_from_another_catalog_are_ignored() {
        let mut first = AssetCatalog::new();
        let mut second = AssetCatalog::new();
        let reference = first.create_asset::<Note>(loc("mine")).into_generic();

        assert!(!second.delete_asset_ref(&reference));
        assert!(!second.move_asset_ref(&reference, "elsewhere"));
        assert!(reference.is_valid());
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut catalog = AssetCatalog::new();
        let reference = catalog.create_asset::<Note>(loc("a"));
        catalog.clear();
        assert!(catalog.is_empty());
        assert!(!reference.is_valid());
    }
}
