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

//! Model importing through the `gltf` crate.
//!
//! Every image of the document becomes a dependency texture imported through
//! the dispatcher, so textures are shared catalog assets rather than copies
//! embedded in the model.

mod resource_resolver;

pub use resource_resolver::*;

use crate::asset_lane::{AssetImporterBase, AssetImporterContext, ImporterInput};
use anyhow::{bail, Context, Result};
use gltf::{mesh::Mode, Buffer};
use relic_core::asset::{
    data::{AlphaMode, MaterialData, Mesh, MeshNode, ModelData, TextureData, Vertex},
    AssetRef,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Guard against cyclic node graphs in malformed documents.
const MAX_NODE_DEPTH: usize = 256;

/// Parameters understood by [`ModelImporter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelImportParameters {
    /// Import the images of the document as dependency textures.
    pub import_textures: bool,
    /// Replace every texture coordinate `v` by `1 - v`.
    pub flip_uvs: bool,
}

impl Default for ModelImportParameters {
    fn default() -> Self {
        Self {
            import_textures: true,
            flip_uvs: false,
        }
    }
}

/// Imports glTF 2.0 models (`.gltf` and `.glb`) into [`ModelData`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelImporter;

impl ModelImporter {
    /// Creates the importer.
    pub fn new() -> Self {
        Self
    }
}

impl AssetImporterBase for ModelImporter {
    fn can_read(&self, input: &ImporterInput) -> bool {
        if matches!(input.extension().as_deref(), Some("gltf" | "glb")) {
            return true;
        }
        input
            .read_header(4)
            .is_ok_and(|header| header.as_ref() == b"glTF")
    }

    fn import_impl(&self, ctx: &mut AssetImporterContext<'_>) -> Result<()> {
        let parameters: ModelImportParameters = ctx
            .parameters_as()
            .context("Invalid model import parameters")?;

        let input = ctx.input();
        let bytes = input
            .read_bytes()
            .with_context(|| format!("Failed to read {input}"))?
            .into_owned();
        let resolver: Box<dyn GltfResourceResolver> = match input.file_path() {
            Some(path) => Box::new(FileSystemResolver::new(
                path.parent().unwrap_or_else(|| Path::new("")),
            )),
            None => Box::new(EmbeddedOnlyResolver),
        };

        let gltf = gltf::Gltf::from_slice(&bytes).context("Failed to parse glTF document")?;
        let buffers = load_buffer_data(&gltf, &*resolver).context("Failed to load glTF buffer data")?;

        let textures = if parameters.import_textures {
            import_textures(ctx, &gltf, &buffers, &*resolver)
        } else {
            Vec::new()
        };

        let builder = NodeBuilder {
            buffers: &buffers,
            textures: &textures,
            flip_uvs: parameters.flip_uvs,
        };
        let root = builder.build_root(&gltf)?;
        let model = ModelData { root };

        log::info!(
            "Loaded model '{}': {} nodes, {} meshes, {} textures",
            ctx.location(),
            model.node_count(),
            model.meshes().len(),
            textures.iter().filter(|texture| texture.is_valid()).count()
        );
        ctx.set_main_asset_data(model);
        Ok(())
    }
}

fn load_buffer_data(gltf: &gltf::Gltf, resolver: &dyn GltfResourceResolver) -> Result<Vec<Vec<u8>>> {
    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        let mut data = match buffer.source() {
            gltf::buffer::Source::Bin => gltf
                .blob
                .clone()
                .context("GLB file references binary chunk but it is missing")?,
            gltf::buffer::Source::Uri(uri) if uri.starts_with("data:") => decode_data_uri(uri)?.0,
            gltf::buffer::Source::Uri(uri) => resolver.resolve_buffer(uri)?,
        };
        if data.len() < buffer.length() {
            bail!(
                "Buffer {} holds {} bytes, {} expected",
                buffer.index(),
                data.len(),
                buffer.length()
            );
        }
        data.truncate(buffer.length());
        buffer_data.push(data);
    }
    Ok(buffer_data)
}

/// Imports every image of the document, in document order.
///
/// The returned list is indexed like `gltf.images()`. Images that cannot be
/// read or imported are logged and left as null references.
fn import_textures(
    ctx: &mut AssetImporterContext<'_>,
    gltf: &gltf::Gltf,
    buffers: &[Vec<u8>],
    resolver: &dyn GltfResourceResolver,
) -> Vec<AssetRef<TextureData>> {
    gltf.images()
        .map(|image| {
            let fetched = match image.source() {
                gltf::image::Source::View { view, mime_type } => {
                    let start = view.offset();
                    let end = start + view.length();
                    buffers
                        .get(view.buffer().index())
                        .and_then(|buffer| buffer.get(start..end))
                        .map(|bytes| (bytes.to_vec(), Some(mime_type.to_owned())))
                        .context("Image buffer view is out of bounds")
                }
                gltf::image::Source::Uri { uri, mime_type } if uri.starts_with("data:") => {
                    decode_data_uri(uri)
                        .map(|(bytes, declared)| (bytes, declared.or(mime_type.map(str::to_owned))))
                        .map_err(Into::into)
                }
                gltf::image::Source::Uri { uri, mime_type } => resolver
                    .resolve_image(uri)
                    .map(|bytes| (bytes, mime_type.map(str::to_owned)))
                    .map_err(Into::into),
            };

            match fetched {
                Ok((bytes, mime_type)) => {
                    let hint = mime_type.as_deref().map(format_hint_from_mime);
                    ctx.import_dependency::<TextureData>(&ImporterInput::memory(bytes, hint))
                }
                Err(err) => {
                    log::warn!(
                        "Skipping image {} of '{}': {:#}",
                        image.index(),
                        ctx.location(),
                        err
                    );
                    AssetRef::null()
                }
            }
        })
        .collect()
}

fn format_hint_from_mime(mime_type: &str) -> &str {
    mime_type.strip_prefix("image/").unwrap_or(mime_type)
}

/// Converts the glTF node graph into a [`MeshNode`] hierarchy.
struct NodeBuilder<'a> {
    buffers: &'a [Vec<u8>],
    textures: &'a [AssetRef<TextureData>],
    flip_uvs: bool,
}

impl NodeBuilder<'_> {
    /// Builds a root node whose children are the roots of the default scene,
    /// or the parentless nodes when the document has no scene.
    fn build_root(&self, gltf: &gltf::Gltf) -> Result<MeshNode> {
        let mut root = MeshNode::default();
        match gltf.default_scene().or_else(|| gltf.scenes().next()) {
            Some(scene) => {
                root.name = scene.name().map(str::to_owned);
                for node in scene.nodes() {
                    root.children.push(self.build_node(&node, 0)?);
                }
            }
            None => {
                let mut is_child = vec![false; gltf.nodes().len()];
                for node in gltf.nodes() {
                    for child in node.children() {
                        is_child[child.index()] = true;
                    }
                }
                for node in gltf.nodes().filter(|node| !is_child[node.index()]) {
                    root.children.push(self.build_node(&node, 0)?);
                }
            }
        }
        Ok(root)
    }

    fn build_node(&self, node: &gltf::Node<'_>, depth: usize) -> Result<MeshNode> {
        if depth >= MAX_NODE_DEPTH {
            bail!("Node hierarchy is deeper than {MAX_NODE_DEPTH} levels");
        }
        let mut meshes = Vec::new();
        if let Some(mesh) = node.mesh() {
            for primitive in mesh.primitives() {
                if primitive.mode() != Mode::Triangles {
                    log::warn!(
                        "Skipping primitive {} of mesh {}: {:?} topology is not supported",
                        primitive.index(),
                        mesh.index(),
                        primitive.mode()
                    );
                    continue;
                }
                meshes.push(self.build_mesh(mesh.name(), &primitive)?);
            }
        }
        let children = node
            .children()
            .map(|child| self.build_node(&child, depth + 1))
            .collect::<Result<Vec<_>>>()?;

        Ok(MeshNode {
            name: node.name().map(str::to_owned),
            transform: node.transform().matrix(),
            meshes,
            children,
        })
    }

    fn build_mesh(&self, name: Option<&str>, primitive: &gltf::Primitive<'_>) -> Result<Mesh> {
        let get_buffer_data = |buffer: Buffer<'_>| self.buffers.get(buffer.index()).map(Vec::as_slice);
        let reader = primitive.reader(get_buffer_data);

        let positions: Vec<[f32; 3]> = reader
            .read_positions()
            .context("Vertex positions attribute not found")?
            .collect();
        let mut normals = reader.read_normals().into_iter().flatten();
        let mut uvs = reader
            .read_tex_coords(0)
            .map(|coords| coords.into_f32())
            .into_iter()
            .flatten();

        let vertices: Vec<Vertex> = positions
            .into_iter()
            .map(|position| {
                let normal = normals.next().unwrap_or_default();
                let [u, v] = uvs.next().unwrap_or_default();
                Vertex {
                    position,
                    normal,
                    uv: if self.flip_uvs { [u, 1.0 - v] } else { [u, v] },
                }
            })
            .collect();

        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..vertices.len() as u32).collect(),
        };
        if let Some(&index) = indices.iter().find(|&&index| index as usize >= vertices.len()) {
            bail!("Index {index} is out of range for {} vertices", vertices.len());
        }

        Ok(Mesh {
            name: name.map(str::to_owned),
            vertices,
            indices,
            material: self.build_material(&primitive.material()),
        })
    }

    fn build_material(&self, material: &gltf::Material<'_>) -> MaterialData {
        let texture = |texture: gltf::Texture<'_>| {
            self.textures
                .get(texture.source().index())
                .filter(|reference| !reference.is_null())
                .cloned()
        };
        let pbr = material.pbr_metallic_roughness();

        MaterialData {
            name: material.name().map(str::to_owned),
            base_color: pbr.base_color_factor(),
            base_color_texture: pbr.base_color_texture().and_then(|info| texture(info.texture())),
            metallic: pbr.metallic_factor(),
            roughness: pbr.roughness_factor(),
            metallic_roughness_texture: pbr
                .metallic_roughness_texture()
                .and_then(|info| texture(info.texture())),
            normal_texture: material
                .normal_texture()
                .and_then(|normal| texture(normal.texture())),
            occlusion_texture: material
                .occlusion_texture()
                .and_then(|occlusion| texture(occlusion.texture())),
            emissive: material.emissive_factor(),
            emissive_texture: material
                .emissive_texture()
                .and_then(|info| texture(info.texture())),
            alpha_mode: match material.alpha_mode() {
                gltf::material::AlphaMode::Opaque => AlphaMode::Opaque,
                gltf::material::AlphaMode::Mask => AlphaMode::Mask(material.alpha_cutoff().unwrap_or(0.5)),
                gltf::material::AlphaMode::Blend => AlphaMode::Blend,
            },
            double_sided: material.double_sided(),
        }
    }
}
