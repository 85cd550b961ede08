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

//! Folder level queries and edits.
//!
//! Folders are not stored anywhere: a folder exists as long as at least one
//! asset path equals it or lies below it.

use super::{AssetCatalog, CatalogError};
use relic_core::{
    asset::{AssetId, GenericAssetRef},
    naming::{normalize_path, AssetLocation},
};
use std::collections::{BTreeSet, HashSet};

impl AssetCatalog {
    /// Returns every asset stored in `folder` or one of its sub-folders.
    ///
    /// The root folder (`""`) contains every asset.
    pub fn folder_assets(&self, folder: &str) -> Vec<GenericAssetRef> {
        self.stored()
            .filter(|(_, asset)| asset.metadata().location.is_in_folder(folder))
            .map(|(_, asset)| GenericAssetRef::new(asset))
            .collect()
    }

    /// Returns every folder that holds at least one asset, plus all of their
    /// parents, sorted. The root folder is not listed.
    pub fn folders(&self) -> Vec<String> {
        let mut folders = BTreeSet::new();
        for (_, asset) in self.stored() {
            let path = asset.metadata().location.path().to_owned();
            let mut end = 0;
            while let Some(offset) = path[end..].find('/') {
                end += offset;
                folders.insert(path[..end].to_owned());
                end += 1;
            }
            if !path.is_empty() {
                folders.insert(path);
            }
        }
        folders.into_iter().collect()
    }

    /// Renames folder `from` to `to`, rewriting the path of every asset at or
    /// below `from`. Returns the number of moved assets.
    ///
    /// Nothing is modified when an error is returned.
    ///
    /// # Errors
    /// - [`CatalogError::InvalidPath`] if either path is the root folder.
    /// - [`CatalogError::FolderNotFound`] if no asset lives in `from`.
    /// - [`CatalogError::LocationOccupied`] if a moved asset would land on the
    ///   location of an asset that is not moved.
    pub fn rename_folder(&mut self, from: &str, to: &str) -> Result<usize, CatalogError> {
        let from = normalize_path(from);
        let to = normalize_path(to);
        for path in [&from, &to] {
            if path.is_empty() {
                return Err(CatalogError::InvalidPath {
                    path: path.clone(),
                    reason: "the root folder cannot be renamed",
                });
            }
        }

        let mut moves: Vec<(AssetId, AssetLocation)> = Vec::new();
        for (id, asset) in self.stored() {
            let location = asset.metadata().location.clone();
            if !location.is_in_folder(&from) {
                continue;
            }
            let rest = &location.path()[from.len()..];
            let mut target = location.clone();
            target.set_path(&format!("{to}{rest}"));
            moves.push((*id, target));
        }
        if moves.is_empty() {
            return Err(CatalogError::FolderNotFound(from));
        }

        let moving: HashSet<AssetId> = moves.iter().map(|(id, _)| *id).collect();
        for (_, target) in &moves {
            let occupant = self.stored().find(|(id, asset)| {
                !moving.contains(*id) && asset.metadata().location == *target
            });
            if let Some((occupant, _)) = occupant {
                return Err(CatalogError::LocationOccupied {
                    location: target.full_location(),
                    occupant: *occupant,
                });
            }
        }

        let count = moves.len();
        for (id, target) in moves {
            if let Some(asset) = self.get_asset(id).lock() {
                asset.metadata_mut().location = target;
            }
        }
        log::info!("Renamed folder '{from}' to '{to}' ({count} assets moved)");
        Ok(count)
    }
}
