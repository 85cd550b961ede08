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

//! Texture importing through the `image` crate.

use crate::asset_lane::{AssetImporterBase, AssetImporterContext, ImporterInput};
use anyhow::{bail, Context, Result};
use image::ImageFormat;
use relic_core::asset::data::TextureData;
use serde::{Deserialize, Serialize};

/// Format hint of raw, uncompressed texel buffers.
///
/// Each texel is stored as the bytes `B, G, R, A` (a little-endian `0xAARRGGBB`
/// word). The buffer has no header, so the dimensions come from
/// [`TextureImportParameters`].
pub const RAW_ARGB8888_HINT: &str = "ARGB8888";

/// Number of bytes read when probing an input for an image signature.
const PROBE_HEADER_LEN: usize = 64;

/// Parameters understood by [`TextureImporter`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureImportParameters {
    /// Reverse the row order after decoding.
    pub flip_vertically: bool,
    /// Width of raw ARGB8888 buffers.
    pub width: Option<u32>,
    /// Height of raw ARGB8888 buffers.
    pub height: Option<u32>,
}

/// Imports every image format enabled in the `image` crate, plus raw
/// ARGB8888 buffers, into RGBA8 [`TextureData`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TextureImporter;

impl TextureImporter {
    /// Creates the importer.
    pub fn new() -> Self {
        Self
    }
}

impl AssetImporterBase for TextureImporter {
    fn can_read(&self, input: &ImporterInput) -> bool {
        if is_raw_argb8888(input) {
            return true;
        }
        if input
            .extension()
            .is_some_and(|ext| ImageFormat::from_extension(ext).is_some())
        {
            return true;
        }
        input
            .read_header(PROBE_HEADER_LEN)
            .is_ok_and(|header| image::guess_format(&header).is_ok())
    }

    fn import_impl(&self, ctx: &mut AssetImporterContext<'_>) -> Result<()> {
        let parameters: TextureImportParameters = ctx
            .parameters_as()
            .context("Invalid texture import parameters")?;

        let input = ctx.input();
        let mut texture = match input {
            ImporterInput::Memory { memory_data, .. } if is_raw_argb8888(input) => {
                decode_raw_argb8888(memory_data, &parameters)?
            }
            _ => {
                let bytes = input
                    .read_bytes()
                    .with_context(|| format!("Failed to read {input}"))?;
                decode_image(&bytes, input.extension().as_deref())?
            }
        };

        if parameters.flip_vertically {
            texture.flip_vertically();
        }
        log::debug!(
            "Decoded {}x{} texture for '{}'",
            texture.width,
            texture.height,
            ctx.location()
        );
        ctx.set_main_asset_data(texture);
        Ok(())
    }
}

fn is_raw_argb8888(input: &ImporterInput) -> bool {
    input
        .format_hint()
        .is_some_and(|hint| hint.eq_ignore_ascii_case(RAW_ARGB8888_HINT))
}

/// Decodes an encoded image, trusting its signature over the extension.
fn decode_image(bytes: &[u8], extension: Option<&str>) -> Result<TextureData> {
    let format = match image::guess_format(bytes) {
        Ok(format) => format,
        Err(_) => extension
            .and_then(ImageFormat::from_extension)
            .context("Unrecognized image format")?,
    };
    let image = image::load_from_memory_with_format(bytes, format)
        .with_context(|| format!("Failed to decode {format:?} image"))?;

    // Convert to RGBA8 (keep in sRGB space)
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(TextureData::rgba8(width, height, rgba.into_raw()))
}

fn decode_raw_argb8888(bytes: &[u8], parameters: &TextureImportParameters) -> Result<TextureData> {
    let (Some(width), Some(height)) = (parameters.width, parameters.height) else {
        bail!("Raw {RAW_ARGB8888_HINT} textures need 'width' and 'height' parameters");
    };
    let expected = width as usize * height as usize * 4;
    if bytes.len() != expected {
        bail!(
            "Raw {RAW_ARGB8888_HINT} texture of {width}x{height} needs {expected} bytes, got {}",
            bytes.len()
        );
    }
    let pixels = bytes
        .chunks_exact(4)
        .flat_map(|texel| [texel[2], texel[1], texel[0], texel[3]])
        .collect();
    Ok(TextureData::rgba8(width, height, pixels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset_lane::ImporterExt;
    use image::{Rgba, RgbaImage};
    use relic_core::asset::Asset;
    use relic_data::AssetCatalog;
    use std::io::{Cursor, Write};

    /// A 1x2 PNG: red on top, blue below.
    fn png_bytes() -> Vec<u8> {
        let mut image = RgbaImage::new(1, 2);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        image.put_pixel(0, 1, Rgba([0, 0, 255, 255]));
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    fn import(input: &ImporterInput, parameters: serde_json::Value) -> Option<TextureData> {
        let mut catalog = AssetCatalog::new();
        let mut ctx = AssetImporterContext::new(&mut catalog, input, "tex".parse().unwrap())
            .with_parameters(parameters);
        if !TextureImporter.import(&mut ctx) {
            return None;
        }
        let asset = ctx.take_main_asset()?;
        let asset = asset.into_any_box().downcast::<Asset<TextureData>>().ok()?;
        asset.take_data()
    }

    #[test]
    fn test_can_read() {
        let importer = TextureImporter::new();
        assert!(importer.can_read(&ImporterInput::memory(png_bytes(), None)));
        assert!(importer.can_read(&ImporterInput::memory(vec![1, 2, 3], Some("argb8888"))));
        assert!(importer.can_read(&ImporterInput::file("logo.png")));
        assert!(!importer.can_read(&ImporterInput::memory(b"glTF....".to_vec(), Some("glb"))));
        assert!(!importer.can_read(&ImporterInput::file("missing.gltf")));
    }

    #[test]
    fn test_import_png_from_memory() {
        let texture = import(&ImporterInput::memory(png_bytes(), Some("png")), serde_json::Value::Null)
            .unwrap();
        assert_eq!((texture.width, texture.height), (1, 2));
        assert!(texture.is_consistent());
        assert_eq!(texture.pixel(0, 0), Some(&[255u8, 0, 0, 255][..]));
    }

    #[test]
    fn test_import_png_from_file_with_flip() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(&png_bytes()).unwrap();

        let texture = import(
            &ImporterInput::file(file.path()),
            serde_json::json!({ "flip_vertically": true }),
        )
        .unwrap();
        assert_eq!(texture.pixel(0, 0), Some(&[0u8, 0, 255, 255][..]));
    }

    #[test]
    fn test_import_raw_argb8888() {
        let input = ImporterInput::memory(vec![10, 20, 30, 40, 1, 2, 3, 4], Some(RAW_ARGB8888_HINT));
        let texture = import(&input, serde_json::json!({ "width": 2, "height": 1 })).unwrap();
        assert_eq!(texture.pixels, vec![30, 20, 10, 40, 3, 2, 1, 4]);
    }

    #[test]
    fn test_raw_argb8888_needs_dimensions() {
        let input = ImporterInput::memory(vec![0; 8], Some(RAW_ARGB8888_HINT));
        assert!(import(&input, serde_json::Value::Null).is_none());
        assert!(import(&input, serde_json::json!({ "width": 3, "height": 1 })).is_none());
    }

    #[test]
    fn test_garbage_fails_without_main_asset() {
        let input = ImporterInput::memory(vec![0xde, 0xad, 0xbe, 0xef], Some("png"));
        let mut catalog = AssetCatalog::new();
        let mut ctx = AssetImporterContext::new(&mut catalog, &input, "bad".parse().unwrap());
        assert!(!TextureImporter.import(&mut ctx));
        assert!(!ctx.has_main_asset());
        assert!(ctx.main_asset().map(|a| a.is_loaded()).is_none());
    }
}
