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

//! The importer contract and the dispatch seam used for nested imports.

use super::{AssetImporterContext, ImporterInput};
use relic_core::{asset::GenericAssetRef, naming::AssetLocation};
use relic_data::AssetCatalog;
use std::{
    any::{Any, TypeId},
    panic::{self, AssertUnwindSafe},
};

/// A format specific converter from an [`ImporterInput`] to an asset.
///
/// Implementors only provide the probe and the conversion. They are run
/// through [`ImporterExt::import`], which contains failures so that one broken
/// importer never aborts the whole import pipeline.
pub trait AssetImporterBase: Send + Sync {
    /// Quickly checks whether this importer understands `input`.
    ///
    /// The probe may be wrong in both directions: the dispatcher still tries
    /// importers that answered `false` when every other one failed.
    fn can_read(&self, input: &ImporterInput) -> bool;

    /// Reads `ctx.input()` and stores the produced asset with
    /// [`AssetImporterContext::set_main_asset`].
    ///
    /// Dependencies are imported through
    /// [`AssetImporterContext::import_dependency`].
    fn import_impl(&self, ctx: &mut AssetImporterContext<'_>) -> anyhow::Result<()>;

    /// Name used in log messages.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// The entry point every importer is run through.
///
/// This trait is implemented for every [`AssetImporterBase`] and cannot be
/// implemented manually.
pub trait ImporterExt: AssetImporterBase {
    /// Runs [`AssetImporterBase::import_impl`] and reports whether a main asset
    /// was produced.
    ///
    /// Returned errors and panics are logged with the target location and
    /// turned into `false`. On failure the main asset, if any, is discarded.
    /// Dependencies registered before the failure stay in the catalog.
    fn import(&self, ctx: &mut AssetImporterContext<'_>) -> bool {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.import_impl(ctx)));
        let failure = match outcome {
            Ok(Ok(())) if ctx.has_main_asset() => return true,
            Ok(Ok(())) => "the importer did not produce any asset".to_owned(),
            Ok(Err(err)) => format!("{err:#}"),
            Err(payload) => format!("the importer panicked: {}", panic_message(&*payload)),
        };
        log::error!(
            "{} failed to import '{}' from {}: {}",
            self.name(),
            ctx.location(),
            ctx.input(),
            failure
        );
        ctx.take_main_asset();
        false
    }
}

impl<I: AssetImporterBase + ?Sized> ImporterExt for I {}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic payload"
    }
}

/// Runs imports on behalf of an importer.
///
/// The importer registry implements this trait. It is handed to every
/// [`AssetImporterContext`] so that importers can import the assets their
/// input embeds without depending on the registry itself.
pub trait ImportDispatch {
    /// Imports `input` to `location` and registers the result in `catalog`.
    ///
    /// `asset_type` restricts the import to the importers registered for that
    /// payload type. `None` tries every registered importer. Failures are
    /// reported as a null reference.
    fn dispatch_import(
        &self,
        catalog: &mut AssetCatalog,
        asset_type: Option<TypeId>,
        location: &AssetLocation,
        input: &ImporterInput,
    ) -> GenericAssetRef;
}
