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

//! Decoded image payloads.

use crate::asset::{AssetData, AssetType};
use serde::{Deserialize, Serialize};

/// Pixel layout of a [`TextureData`] buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextureFormat {
    /// 8 bits per channel, red, green, blue, alpha.
    #[default]
    Rgba8,
}

impl TextureFormat {
    /// Number of bytes used by a single pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            TextureFormat::Rgba8 => 4,
        }
    }
}

/// A CPU-side image, ready to be uploaded by a renderer.
///
/// Rows are stored top to bottom, tightly packed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextureData {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Layout of `pixels`.
    pub format: TextureFormat,
    /// The raw pixel bytes.
    pub pixels: Vec<u8>,
}

impl AssetData for TextureData {
    const TYPE: AssetType = AssetType::Texture;
}

impl TextureData {
    /// Wraps RGBA8 pixels.
    pub fn rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            format: TextureFormat::Rgba8,
            pixels,
        }
    }

    /// Number of bytes a buffer of these dimensions must hold.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel()
    }

    /// Returns `true` if `pixels` matches the dimensions and format.
    pub fn is_consistent(&self) -> bool {
        self.pixels.len() == self.expected_len()
    }

    /// Returns the bytes of pixel `(x, y)`, or `None` if out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bpp = self.format.bytes_per_pixel();
        let start = (y as usize * self.width as usize + x as usize) * bpp;
        self.pixels.get(start..start + bpp)
    }

    /// Reverses the row order in place.
    pub fn flip_vertically(&mut self) {
        let row = self.width as usize * self.format.bytes_per_pixel();
        if row == 0 || !self.is_consistent() {
            return;
        }
        let height = self.height as usize;
        for y in 0..height / 2 {
            let (top, bottom) = self.pixels.split_at_mut((height - 1 - y) * row);
            top[y * row..(y + 1) * row].swap_with_slice(&mut bottom[..row]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_access() {
        let texture = TextureData::rgba8(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert!(texture.is_consistent());
        assert_eq!(texture.pixel(1, 0), Some(&[5u8, 6, 7, 8][..]));
        assert_eq!(texture.pixel(2, 0), None);
    }

    #[test]
    fn test_flip_vertically() {
        let mut texture = TextureData::rgba8(
            1,
            3,
            vec![1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3],
        );
        texture.flip_vertically();
        assert_eq!(texture.pixels, vec![3, 3, 3, 3, 2, 2, 2, 2, 1, 1, 1, 1]);
    }
}
