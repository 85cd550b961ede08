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

use anyhow::Result;
use base64::Engine;
use image::{ImageFormat, Rgba, RgbaImage};
use relic_core::asset::{
    data::{ModelData, TextureData},
    Asset, GenericAssetRef,
};
use relic_core::naming::AssetLocation;
use relic_data::AssetCatalog;
use relic_lanes::asset_lane::{
    importing::{ModelImporter, TextureImporter},
    AssetImporterContext, ImportDispatch, ImporterExt, ImporterInput,
};
use serde_json::json;
use std::{
    any::TypeId,
    io::Cursor,
    sync::atomic::{AtomicUsize, Ordering},
};

// --- Test Setup: a dispatcher that only knows textures ---
#[derive(Default)]
struct TextureOnlyDispatch {
    calls: AtomicUsize,
}

impl ImportDispatch for TextureOnlyDispatch {
    fn dispatch_import(
        &self,
        catalog: &mut AssetCatalog,
        asset_type: Option<TypeId>,
        location: &AssetLocation,
        input: &ImporterInput,
    ) -> GenericAssetRef {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(asset_type, Some(TypeId::of::<TextureData>()));

        let asset = {
            let mut ctx = AssetImporterContext::new(catalog, input, location.clone())
                .with_dispatcher(self);
            if !TextureImporter.import(&mut ctx) {
                return GenericAssetRef::null();
            }
            ctx.take_main_asset()
        };
        catalog.register_asset(location.clone(), asset)
    }
}

fn png_data_uri(color: [u8; 4]) -> String {
    let image = RgbaImage::from_pixel(2, 2, Rgba(color));
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png).unwrap();
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes.into_inner())
    )
}

/// A triangle whose material uses two embedded PNG textures.
fn textured_triangle_gltf() -> Vec<u8> {
    let mut buffer: Vec<u8> = [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
        .iter()
        .flat_map(|value| value.to_le_bytes())
        .collect();
    buffer.extend([0u16, 1, 2].iter().flat_map(|index| index.to_le_bytes()));
    let uri = format!(
        "data:application/octet-stream;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&buffer)
    );

    serde_json::to_vec(&json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "mesh": 0 }],
        "meshes": [{
            "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1, "material": 0 }]
        }],
        "materials": [{
            "pbrMetallicRoughness": { "baseColorTexture": { "index": 0 } },
            "normalTexture": { "index": 1 }
        }],
        "textures": [{ "source": 0 }, { "source": 1 }],
        "images": [
            { "uri": png_data_uri([255, 0, 0, 255]) },
            { "uri": png_data_uri([128, 128, 255, 255]) }
        ],
        "buffers": [{ "byteLength": buffer.len(), "uri": uri }],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 6 }
        ],
        "accessors": [
            {
                "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
                "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
            },
            { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
        ]
    }))
    .unwrap()
}
// ---

#[test]
fn test_model_textures_become_named_dependencies() -> Result<()> {
    // --- 1. Import the model through a context wired to the dispatcher ---
    let mut catalog = AssetCatalog::new();
    let dispatch = TextureOnlyDispatch::default();
    let input = ImporterInput::memory(textured_triangle_gltf(), Some("gltf"));
    let location: AssetLocation = "Crate@props/wood".parse()?;

    let (model, dependencies) = {
        let mut ctx = AssetImporterContext::new(&mut catalog, &input, location.clone())
            .with_dispatcher(&dispatch);
        assert!(ModelImporter.import(&mut ctx));
        (ctx.take_main_asset(), ctx.dependencies().to_vec())
    };

    // --- 2. Two textures were imported and registered next to the model ---
    assert_eq!(dispatch.calls.load(Ordering::SeqCst), 2);
    assert_eq!(dependencies.len(), 2);
    assert_eq!(catalog.len(), 2);
    for name in ["Crate_TEXTURE1@props/wood", "Crate_TEXTURE2@props/wood"] {
        let texture = catalog.get_asset_by_location(&name.parse()?).cast::<TextureData>();
        assert!(texture.is_loaded(), "missing texture {name}");
    }

    // --- 3. The material slots point at the registered textures ---
    let model = model
        .unwrap()
        .into_any_box()
        .downcast::<Asset<ModelData>>()
        .ok()
        .and_then(|asset| asset.take_data())
        .unwrap();
    let meshes = model.meshes();
    let material = &meshes[0].material;
    let albedo = material.base_color_texture.as_ref().unwrap();
    let normal = material.normal_texture.as_ref().unwrap();
    assert_eq!(albedo.location().unwrap().full_location(), "Crate_TEXTURE1@props/wood");
    assert_eq!(normal.location().unwrap().full_location(), "Crate_TEXTURE2@props/wood");

    let albedo = albedo.lock().unwrap();
    let albedo_data = albedo.data();
    assert_eq!(albedo_data.as_ref().unwrap().pixel(0, 0), Some(&[255u8, 0, 0, 255][..]));
    Ok(())
}

#[test]
fn test_model_textures_can_be_skipped() -> Result<()> {
    let mut catalog = AssetCatalog::new();
    let dispatch = TextureOnlyDispatch::default();
    let input = ImporterInput::memory(textured_triangle_gltf(), Some("gltf"));

    let mut ctx = AssetImporterContext::new(&mut catalog, &input, "Crate".parse()?)
        .with_dispatcher(&dispatch)
        .with_parameters(json!({ "import_textures": false }));
    assert!(ModelImporter.import(&mut ctx));
    assert!(ctx.dependencies().is_empty());
    drop(ctx);

    assert_eq!(dispatch.calls.load(Ordering::SeqCst), 0);
    assert!(catalog.is_empty());
    Ok(())
}

#[test]
fn test_model_without_dispatcher_keeps_empty_texture_slots() -> Result<()> {
    let mut catalog = AssetCatalog::new();
    let input = ImporterInput::memory(textured_triangle_gltf(), Some("gltf"));

    let mut ctx = AssetImporterContext::new(&mut catalog, &input, "Crate".parse()?);
    assert!(ModelImporter.import(&mut ctx));
    let model = ctx
        .take_main_asset()
        .unwrap()
        .into_any_box()
        .downcast::<Asset<ModelData>>()
        .ok()
        .and_then(|asset| asset.take_data())
        .unwrap();

    assert!(model.meshes()[0].material.base_color_texture.is_none());
    assert!(model.textures().is_empty());
    Ok(())
}
