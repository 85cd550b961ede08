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

//! Per-import scratch state.

use super::{ImportDispatch, ImporterInput};
use relic_core::{
    asset::{Asset, AssetData, AssetRef, ErasedAsset, GenericAssetRef},
    naming::{AssetLocation, AssetName, InvalidName, MAX_NAME_LENGTH},
};
use relic_data::AssetCatalog;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::{any::TypeId, fmt};

/// Maximum number of candidates tried when generating a dependency location.
pub const ASSET_MAX_DEPENDENCIES: u32 = 10_000;

/// Everything an importer needs while running a single import.
///
/// A context lives for one import call. It borrows the catalog the import
/// registers into and owns the main asset until the dispatcher releases it to
/// the catalog.
pub struct AssetImporterContext<'a> {
    catalog: &'a mut AssetCatalog,
    dispatcher: Option<&'a dyn ImportDispatch>,
    input: &'a ImporterInput,
    location: AssetLocation,
    main_asset: Option<Box<dyn ErasedAsset>>,
    dependencies: Vec<GenericAssetRef>,
    parameters: Value,
    dep_unique_id: u32,
}

impl<'a> AssetImporterContext<'a> {
    /// Creates a context importing `input` to `location`.
    ///
    /// Without a dispatcher, [`AssetImporterContext::import_dependency`]
    /// always fails.
    pub fn new(
        catalog: &'a mut AssetCatalog,
        input: &'a ImporterInput,
        location: AssetLocation,
    ) -> Self {
        Self {
            catalog,
            dispatcher: None,
            input,
            location,
            main_asset: None,
            dependencies: Vec::new(),
            parameters: Value::Null,
            dep_unique_id: 0,
        }
    }

    /// Sets the dispatcher used for nested imports.
    pub fn with_dispatcher(mut self, dispatcher: &'a dyn ImportDispatch) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Sets the importer parameters.
    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.parameters = parameters;
        self
    }

    /// The data to import.
    pub fn input(&self) -> &'a ImporterInput {
        self.input
    }

    /// Where the main asset will be registered.
    pub fn location(&self) -> &AssetLocation {
        &self.location
    }

    /// Changes where the main asset will be registered.
    pub fn set_location(&mut self, location: AssetLocation) {
        self.location = location;
    }

    /// The catalog the import registers into.
    pub fn catalog(&self) -> &AssetCatalog {
        &*self.catalog
    }

    /// Mutable access to the catalog, for importers registering extra assets.
    pub fn catalog_mut(&mut self) -> &mut AssetCatalog {
        &mut *self.catalog
    }

    /// Stores the asset produced by the import, replacing any previous one.
    pub fn set_main_asset(&mut self, asset: Box<dyn ErasedAsset>) {
        self.main_asset = Some(asset);
    }

    /// Wraps `data` in a new [`Asset<T>`] and stores it as the main asset.
    pub fn set_main_asset_data<T: AssetData>(&mut self, data: T) {
        self.set_main_asset(Box::new(Asset::with_data(data)));
    }

    /// The main asset produced so far.
    pub fn main_asset(&self) -> Option<&dyn ErasedAsset> {
        self.main_asset.as_deref()
    }

    /// Returns `true` once the importer has produced its asset.
    pub fn has_main_asset(&self) -> bool {
        self.main_asset.is_some()
    }

    /// Releases ownership of the main asset.
    pub fn take_main_asset(&mut self) -> Option<Box<dyn ErasedAsset>> {
        self.main_asset.take()
    }

    /// Records an asset spawned by this import.
    pub fn add_dependency(&mut self, dependency: GenericAssetRef) {
        self.dependencies.push(dependency);
    }

    /// Assets spawned by this import, in creation order.
    pub fn dependencies(&self) -> &[GenericAssetRef] {
        &self.dependencies
    }

    /// The raw parameter document.
    pub fn parameters(&self) -> &Value {
        &self.parameters
    }

    /// Replaces the raw parameter document.
    pub fn set_parameters(&mut self, parameters: Value) {
        self.parameters = parameters;
    }

    /// Deserializes the parameters into an importer's typed parameter struct.
    ///
    /// A missing (`null`) document yields `P::default()`.
    pub fn parameters_as<P: DeserializeOwned + Default>(&self) -> Result<P, serde_json::Error> {
        if self.parameters.is_null() {
            return Ok(P::default());
        }
        serde_json::from_value(self.parameters.clone())
    }

    /// Serializes a typed parameter struct into the parameter document.
    pub fn set_typed_parameters<P: Serialize>(&mut self, parameters: &P) -> Result<(), serde_json::Error> {
        self.parameters = serde_json::to_value(parameters)?;
        Ok(())
    }

    /// Generates a location for a dependency of type `T` that is not used in
    /// the catalog yet.
    ///
    /// Candidates are named `{name}_{TYPE}{n}` in the same path and pack as
    /// the main asset, where `n` is a counter shared by every call on this
    /// context. After [`ASSET_MAX_DEPENDENCIES`] occupied candidates the last
    /// one is returned anyway and an error is logged.
    ///
    /// # Errors
    /// Returns [`InvalidName`] only if the generated name breaks the naming
    /// rules, which cannot happen for a validated base name.
    pub fn gen_unique_dependency_location<T: AssetData>(
        &mut self,
    ) -> Result<AssetLocation, InvalidName> {
        let mut candidate = self.location.clone();
        for _ in 0..ASSET_MAX_DEPENDENCIES {
            self.dep_unique_id += 1;
            let suffix = format!("_{}{}", T::TYPE.name(), self.dep_unique_id);
            let base = self.location.name().as_str();
            let base = &base[..base.len().min(MAX_NAME_LENGTH.saturating_sub(suffix.len()))];
            candidate = self
                .location
                .clone()
                .with_name(AssetName::new(format!("{base}{suffix}"))?);
            if !self.catalog.contains_location(&candidate) {
                return Ok(candidate);
            }
        }
        log::error!(
            "Could not find a free dependency location for '{}' after {} attempts, using '{}'",
            self.location,
            ASSET_MAX_DEPENDENCIES,
            candidate
        );
        Ok(candidate)
    }

    /// Imports `input` as a dependency of type `T`.
    ///
    /// The dependency gets a location from
    /// [`AssetImporterContext::gen_unique_dependency_location`], is imported
    /// through the dispatcher with the importers registered for `T`, and is
    /// recorded in [`AssetImporterContext::dependencies`]. Failures yield a
    /// null reference.
    pub fn import_dependency<T: AssetData>(&mut self, input: &ImporterInput) -> AssetRef<T> {
        let location = match self.gen_unique_dependency_location::<T>() {
            Ok(location) => location,
            Err(err) => {
                log::error!("Cannot name a dependency of '{}': {}", self.location, err);
                return AssetRef::null();
            }
        };
        self.dispatch_dependency(Some(TypeId::of::<T>()), &location, input)
            .cast::<T>()
    }

    /// Imports `input` as a dependency of unknown type, trying every importer.
    ///
    /// The generated name uses the `UNKNOWN` kind.
    pub fn import_dependency_auto(&mut self, input: &ImporterInput) -> GenericAssetRef {
        let location = match self.gen_unique_dependency_location::<UnknownDependency>() {
            Ok(location) => location,
            Err(err) => {
                log::error!("Cannot name a dependency of '{}': {}", self.location, err);
                return GenericAssetRef::null();
            }
        };
        self.dispatch_dependency(None, &location, input)
    }

    fn dispatch_dependency(
        &mut self,
        asset_type: Option<TypeId>,
        location: &AssetLocation,
        input: &ImporterInput,
    ) -> GenericAssetRef {
        let Some(dispatcher) = self.dispatcher else {
            log::error!(
                "Cannot import dependency '{}' of '{}': no dispatcher attached to the import",
                location,
                self.location
            );
            return GenericAssetRef::null();
        };
        let dependency = dispatcher.dispatch_import(&mut *self.catalog, asset_type, location, input);
        if dependency.is_valid() {
            self.dependencies.push(dependency.clone());
        } else {
            log::warn!("Dependency '{}' of '{}' could not be imported", location, self.location);
        }
        dependency
    }
}

/// Naming marker for dependencies imported without a known type.
struct UnknownDependency;

impl AssetData for UnknownDependency {
    const TYPE: relic_core::asset::AssetType = relic_core::asset::AssetType::Unknown;
}

impl fmt::Debug for AssetImporterContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetImporterContext")
            .field("input", &self.input)
            .field("location", &self.location.full_location())
            .field("has_main_asset", &self.has_main_asset())
            .field("dependencies", &self.dependencies.len())
            .field("parameters", &self.parameters)
            .finish()
    }
}
