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

// Relic Sandbox
// Imports a generated texture plus every file given on the command line,
// then prints the resulting catalog.

use std::path::Path;

use anyhow::{ensure, Result};
use relic_agents::AssetImporter;
use relic_core::asset::data::TextureData;
use relic_core::naming::{AssetLocation, AssetName};
use relic_data::AssetCatalog;
use relic_lanes::asset_lane::{importing::RAW_ARGB8888_HINT, ImporterInput};
use serde_json::{json, Value};

const CHECKER_SIZE: u32 = 8;

/// A black and white checkerboard, one B,G,R,A quadruplet per texel.
fn checkerboard_argb8888(size: u32) -> Vec<u8> {
    (0..size * size)
        .flat_map(|texel| {
            let (x, y) = (texel % size, texel / size);
            if (x + y) % 2 == 0 {
                [255, 255, 255, 255]
            } else {
                [0, 0, 0, 255]
            }
        })
        .collect()
}

fn import_file(registry: &AssetImporter, catalog: &mut AssetCatalog, path: &Path) {
    let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
        log::warn!("Skipping '{}': no usable file name", path.display());
        return;
    };
    let name = match AssetName::new(stem) {
        Ok(name) => name,
        Err(err) => {
            log::warn!("Skipping '{}': {}", path.display(), err);
            return;
        }
    };
    let location = AssetLocation::new(name, "imported", None);
    let asset = registry.import_asset_auto(catalog, &location, &ImporterInput::file(path));
    if asset.is_null() {
        log::warn!("Nothing could import '{}'", path.display());
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut catalog = AssetCatalog::new();
    let mut registry = AssetImporter::new();

    // --- Generated texture ---
    registry.set_parameters(json!({ "width": CHECKER_SIZE, "height": CHECKER_SIZE }));
    let checker = registry.import_asset::<TextureData>(
        &mut catalog,
        &"checker@textures/debug".parse()?,
        &ImporterInput::memory(checkerboard_argb8888(CHECKER_SIZE), Some(RAW_ARGB8888_HINT)),
    );
    registry.set_parameters(Value::Null);
    ensure!(checker.is_loaded(), "the generated checkerboard failed to import");

    // --- Files from the command line ---
    for arg in std::env::args().skip(1) {
        import_file(&registry, &mut catalog, Path::new(&arg));
    }

    let moved = catalog.rename_folder("textures/debug", "textures/dev")?;
    log::info!("Moved {} asset(s) to textures/dev", moved);

    for folder in catalog.folders() {
        log::info!("[{}]", folder);
        for asset in catalog.folder_assets(&folder) {
            let Some(asset) = asset.lock() else { continue };
            // Nested folders are listed on their own.
            if asset.location().path() == folder {
                log::info!(
                    "  {:<10} {} ({})",
                    asset.asset_type().name(),
                    asset.location(),
                    asset.id()
                );
            }
        }
    }
    Ok(())
}
