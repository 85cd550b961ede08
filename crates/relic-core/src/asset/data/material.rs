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

//! Surface descriptions produced by the model importer.

use super::TextureData;
use crate::asset::{AssetData, AssetRef, AssetType};

/// Specifies how a material handles transparency.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AlphaMode {
    /// Fully opaque.
    #[default]
    Opaque,
    /// Fragments with an alpha below the cutoff are discarded.
    Mask(f32),
    /// Full alpha blending.
    Blend,
}

/// A metallic-roughness material.
///
/// Texture slots are references into the catalog. A slot holding a reference
/// whose texture was deleted behaves like an empty slot for consumers that
/// check [`AssetRef::is_valid`].
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialData {
    /// Name given by the source file, if any.
    pub name: Option<String>,
    /// Linear RGBA base color factor.
    pub base_color: [f32; 4],
    /// Texture multiplied with `base_color`.
    pub base_color_texture: Option<AssetRef<TextureData>>,
    /// Metallic factor (0 = dielectric, 1 = metal).
    pub metallic: f32,
    /// Roughness factor (0 = smooth, 1 = rough).
    pub roughness: f32,
    /// Metallic (blue) and roughness (green) texture.
    pub metallic_roughness_texture: Option<AssetRef<TextureData>>,
    /// Tangent space normal map.
    pub normal_texture: Option<AssetRef<TextureData>>,
    /// Ambient occlusion map.
    pub occlusion_texture: Option<AssetRef<TextureData>>,
    /// Linear RGB emissive factor.
    pub emissive: [f32; 3],
    /// Texture multiplied with `emissive`.
    pub emissive_texture: Option<AssetRef<TextureData>>,
    /// Transparency handling.
    pub alpha_mode: AlphaMode,
    /// Whether back faces are rendered.
    pub double_sided: bool,
}

impl Default for MaterialData {
    fn default() -> Self {
        Self {
            name: None,
            base_color: [1.0, 1.0, 1.0, 1.0],
            base_color_texture: None,
            metallic: 1.0,
            roughness: 1.0,
            metallic_roughness_texture: None,
            normal_texture: None,
            occlusion_texture: None,
            emissive: [0.0, 0.0, 0.0],
            emissive_texture: None,
            alpha_mode: AlphaMode::Opaque,
            double_sided: false,
        }
    }
}

impl AssetData for MaterialData {
    const TYPE: AssetType = AssetType::Material;
}

impl MaterialData {
    /// Iterates over the filled texture slots.
    pub fn textures(&self) -> impl Iterator<Item = &AssetRef<TextureData>> {
        [
            &self.base_color_texture,
            &self.metallic_roughness_texture,
            &self.normal_texture,
            &self.occlusion_texture,
            &self.emissive_texture,
        ]
        .into_iter()
        .flatten()
    }
}
