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

//! The importer registry and dispatcher.

use relic_core::{
    asset::{
        data::{ModelData, TextureData},
        AssetData, AssetRef, AssetType, GenericAssetRef,
    },
    naming::AssetLocation,
};
use relic_data::AssetCatalog;
use relic_lanes::asset_lane::{
    importing::{ModelImporter, TextureImporter},
    AssetImporterBase, AssetImporterContext, ImportDispatch, ImporterExt, ImporterInput,
};
use serde_json::Value;
use std::{
    any::{type_name, TypeId},
    cmp::Reverse,
    collections::HashMap,
    fmt,
    sync::Arc,
};

/// Priority of the built-in [`TextureImporter`].
pub const TEXTURE_IMPORTER_PRIORITY: i32 = 100;

/// Priority of the built-in [`ModelImporter`].
pub const MODEL_IMPORTER_PRIORITY: i32 = 90;

/// An importer registered for one asset type.
#[derive(Clone)]
pub struct ImporterEntry {
    /// The importer itself. The same instance may be shared by several types.
    pub importer: Arc<dyn AssetImporterBase>,
    /// Higher priorities are tried first.
    pub priority: i32,
    /// Kind of the asset type the importer was registered for.
    pub asset_type: AssetType,
}

impl fmt::Debug for ImporterEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImporterEntry")
            .field("importer", &self.importer.name())
            .field("priority", &self.priority)
            .field("asset_type", &self.asset_type)
            .finish()
    }
}

/// Selects and runs importers, then registers what they produce.
///
/// Importers are kept per asset type, sorted by descending priority. An
/// import tries the importers that claim the input first
/// ([`AssetImporterBase::can_read`]) and falls back to the others, so a
/// wrong probe never prevents an import that some importer could handle.
///
/// The registry is also the [`ImportDispatch`] handed to every context it
/// builds: dependencies discovered by an importer go through the same
/// selection.
pub struct AssetImporter {
    importers: HashMap<TypeId, Vec<ImporterEntry>>,
    /// Asset types in the order their first importer was registered.
    type_order: Vec<TypeId>,
    /// Parameters given to every context built by the registry.
    parameters: Value,
}

impl AssetImporter {
    /// Creates a registry with the built-in texture and model importers.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_importer::<TextureData, TextureImporter>(TEXTURE_IMPORTER_PRIORITY);
        registry.register_importer::<ModelData, ModelImporter>(MODEL_IMPORTER_PRIORITY);
        registry
    }

    /// Creates a registry without any importer.
    pub fn empty() -> Self {
        Self {
            importers: HashMap::new(),
            type_order: Vec::new(),
            parameters: Value::Null,
        }
    }

    /// Registers a default-constructed `I` as an importer for `T`.
    pub fn register_importer<T, I>(&mut self, priority: i32)
    where
        T: AssetData,
        I: AssetImporterBase + Default + 'static,
    {
        self.register_importer_instance::<T>(Arc::new(I::default()), priority);
    }

    /// Registers `importer` for `T`.
    ///
    /// The importer is placed after every importer of `T` whose priority is
    /// greater or equal, so equal priorities keep their registration order.
    pub fn register_importer_instance<T: AssetData>(
        &mut self,
        importer: Arc<dyn AssetImporterBase>,
        priority: i32,
    ) {
        log::debug!(
            "Registering importer {} for {} with priority {}",
            importer.name(),
            type_name::<T>(),
            priority
        );

        let type_id = TypeId::of::<T>();
        if !self.importers.contains_key(&type_id) {
            self.type_order.push(type_id);
        }
        let entries = self.importers.entry(type_id).or_default();
        let index = entries
            .iter()
            .position(|entry| entry.priority < priority)
            .unwrap_or(entries.len());
        entries.insert(
            index,
            ImporterEntry {
                importer,
                priority,
                asset_type: T::TYPE,
            },
        );
    }

    /// Removes every importer registered for `T` and returns how many there were.
    pub fn unregister_all_importers_for_type<T: AssetData>(&mut self) -> usize {
        let type_id = TypeId::of::<T>();
        self.type_order.retain(|id| *id != type_id);
        let removed = self.importers.remove(&type_id).map_or(0, |entries| entries.len());
        if removed > 0 {
            log::debug!("Unregistered {} importer(s) for {}", removed, type_name::<T>());
        }
        removed
    }

    /// Whether at least one importer is registered for `T`.
    pub fn has_importers_for_type<T: AssetData>(&self) -> bool {
        !self.get_importers_for_type::<T>().is_empty()
    }

    /// The importers registered for `T`, by descending priority.
    pub fn get_importers_for_type<T: AssetData>(&self) -> &[ImporterEntry] {
        self.importers
            .get(&TypeId::of::<T>())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Every registered importer, grouped by asset type in registration order.
    pub fn importers(&self) -> impl Iterator<Item = &ImporterEntry> + '_ {
        self.type_order
            .iter()
            .filter_map(|type_id| self.importers.get(type_id))
            .flatten()
    }

    /// The parameters given to every context built by the registry.
    pub fn parameters(&self) -> &Value {
        &self.parameters
    }

    /// Replaces the parameters given to every context built by the registry.
    ///
    /// Nested dependency imports receive the same parameters.
    pub fn set_parameters(&mut self, parameters: Value) {
        self.parameters = parameters;
    }

    /// Imports `input` as a `T` stored at `location`.
    ///
    /// Only the importers registered for `T` are tried. Returns a null
    /// reference when none is registered or none succeeds.
    ///
    /// An importer registered for `T` may still produce another payload type.
    /// That asset stays registered in `catalog` at `location` while this call
    /// returns null; look it up with [`AssetCatalog::get_asset_by_location`]
    /// to delete it if it is not wanted.
    pub fn import_asset<T: AssetData>(
        &self,
        catalog: &mut AssetCatalog,
        location: &AssetLocation,
        input: &ImporterInput,
    ) -> AssetRef<T> {
        let asset = self.import_asset_of_type(
            catalog,
            TypeId::of::<T>(),
            type_name::<T>(),
            location,
            input,
        );
        let typed = asset.cast::<T>();
        if asset.is_valid() && typed.is_null() {
            log::warn!(
                "'{}' was imported but does not hold a {}",
                location,
                type_name::<T>()
            );
        }
        typed
    }

    /// Imports `input` with whichever registered importer handles it.
    ///
    /// All importers are tried by descending priority. Ties keep the order in
    /// which their asset types were first registered, then the order of
    /// registration within a type.
    pub fn import_asset_auto(
        &self,
        catalog: &mut AssetCatalog,
        location: &AssetLocation,
        input: &ImporterInput,
    ) -> GenericAssetRef {
        let mut importers: Vec<ImporterEntry> = self.importers().cloned().collect();
        if importers.is_empty() {
            log::error!("Cannot import '{}': no importer registered", location);
            return GenericAssetRef::null();
        }
        importers.sort_by_key(|entry| Reverse(entry.priority));
        self.import_asset_try_importers(catalog, location, input, &importers)
    }

    /// Tries `importers` in order until one of them imports `input`.
    ///
    /// The first pass only runs the importers that claim the input. When all
    /// of them fail, a second pass runs the ones that did not, in the same
    /// order.
    pub fn import_asset_try_importers(
        &self,
        catalog: &mut AssetCatalog,
        location: &AssetLocation,
        input: &ImporterInput,
        importers: &[ImporterEntry],
    ) -> GenericAssetRef {
        let mut unclaimed = Vec::new();
        for entry in importers {
            if !entry.importer.can_read(input) {
                unclaimed.push(entry);
                continue;
            }
            let asset =
                self.import_asset_using_importer(catalog, location, input, entry.importer.as_ref());
            if asset.is_valid() {
                return asset;
            }
        }

        if !unclaimed.is_empty() {
            log::warn!(
                "No importer claiming {} could import '{}', trying the {} other importer(s)",
                input,
                location,
                unclaimed.len()
            );
        }
        for entry in unclaimed {
            let asset =
                self.import_asset_using_importer(catalog, location, input, entry.importer.as_ref());
            if asset.is_valid() {
                return asset;
            }
        }

        log::error!("Failed to import '{}' from {}", location, input);
        GenericAssetRef::null()
    }

    /// Runs `importer` in a fresh context and registers the result.
    ///
    /// The context carries this registry as dispatcher and a copy of
    /// [`AssetImporter::parameters`].
    pub fn import_asset_using_importer(
        &self,
        catalog: &mut AssetCatalog,
        location: &AssetLocation,
        input: &ImporterInput,
        importer: &dyn AssetImporterBase,
    ) -> GenericAssetRef {
        let mut ctx = AssetImporterContext::new(catalog, input, location.clone())
            .with_dispatcher(self)
            .with_parameters(self.parameters.clone());
        self.import_asset_using_importer_with_context(importer, &mut ctx)
    }

    /// Runs `importer` against a context built by the caller.
    ///
    /// Input, location, parameters and dispatcher are taken from `ctx` as is.
    /// The main asset keeps the location the importer gave it, or gets the
    /// context location when it still has the default one. It is registered
    /// in the context catalog, which assigns it an id if it has none.
    pub fn import_asset_using_importer_with_context(
        &self,
        importer: &dyn AssetImporterBase,
        ctx: &mut AssetImporterContext<'_>,
    ) -> GenericAssetRef {
        if !importer.import(ctx) {
            return GenericAssetRef::null();
        }
        let Some(asset) = ctx.take_main_asset() else {
            log::error!(
                "{} reported success for '{}' without an asset",
                importer.name(),
                ctx.location()
            );
            return GenericAssetRef::null();
        };

        let location = match asset.location() {
            current if current.is_default() => ctx.location().clone(),
            current => current,
        };
        log::info!(
            "Imported '{}' from {} with {} ({} dependencies)",
            location,
            ctx.input(),
            importer.name(),
            ctx.dependencies().len()
        );
        ctx.catalog_mut().register_asset(location, Some(asset))
    }

    fn import_asset_of_type(
        &self,
        catalog: &mut AssetCatalog,
        type_id: TypeId,
        type_label: &str,
        location: &AssetLocation,
        input: &ImporterInput,
    ) -> GenericAssetRef {
        match self.importers.get(&type_id) {
            Some(entries) if !entries.is_empty() => {
                self.import_asset_try_importers(catalog, location, input, entries)
            }
            _ => {
                log::error!(
                    "Cannot import '{}': no importer registered for {}",
                    location,
                    type_label
                );
                GenericAssetRef::null()
            }
        }
    }
}

impl ImportDispatch for AssetImporter {
    fn dispatch_import(
        &self,
        catalog: &mut AssetCatalog,
        asset_type: Option<TypeId>,
        location: &AssetLocation,
        input: &ImporterInput,
    ) -> GenericAssetRef {
        match asset_type {
            Some(type_id) => self.import_asset_of_type(
                catalog,
                type_id,
                "the requested asset type",
                location,
                input,
            ),
            None => self.import_asset_auto(catalog, location, input),
        }
    }
}

impl Default for AssetImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AssetImporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetImporter")
            .field("importers", &self.importers().collect::<Vec<_>>())
            .field("parameters", &self.parameters)
            .finish()
    }
}
