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

//! Mesh hierarchies produced by the model importer.

use super::{MaterialData, TextureData};
use crate::asset::{AssetData, AssetRef, AssetType};

/// The 4x4 identity matrix, column major.
pub const IDENTITY: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// A single interleaved vertex.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    /// Object space position.
    pub position: [f32; 3],
    /// Object space normal.
    pub normal: [f32; 3],
    /// First texture coordinate set.
    pub uv: [f32; 2],
}

/// An indexed triangle list with its material.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    /// Name given by the source file, if any.
    pub name: Option<String>,
    /// Vertex buffer.
    pub vertices: Vec<Vertex>,
    /// Triangle list indices into `vertices`.
    pub indices: Vec<u32>,
    /// Surface description.
    pub material: MaterialData,
}

impl Mesh {
    /// Number of triangles in the index buffer.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// A node of the model hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshNode {
    /// Name given by the source file, if any.
    pub name: Option<String>,
    /// Local transform relative to the parent node, column major.
    pub transform: [[f32; 4]; 4],
    /// Meshes attached to this node.
    pub meshes: Vec<Mesh>,
    /// Child nodes.
    pub children: Vec<MeshNode>,
}

impl Default for MeshNode {
    fn default() -> Self {
        Self {
            name: None,
            transform: IDENTITY,
            meshes: Vec::new(),
            children: Vec::new(),
        }
    }
}

impl MeshNode {
    /// Visits this node and every descendant, depth first.
    pub fn visit<'a>(&'a self, visitor: &mut impl FnMut(&'a MeshNode)) {
        visitor(self);
        for child in &self.children {
            child.visit(visitor);
        }
    }
}

/// A model: a hierarchy of nodes holding meshes.
///
/// Textures used by the materials are separate catalog assets, referenced
/// through [`AssetRef`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelData {
    /// The root node. Scene roots of the source file are its children.
    pub root: MeshNode,
}

impl AssetData for ModelData {
    const TYPE: AssetType = AssetType::Model;
}

impl ModelData {
    /// Number of nodes, root included.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.root.visit(&mut |_| count += 1);
        count
    }

    /// Iterates over every mesh of the hierarchy, depth first.
    pub fn meshes(&self) -> Vec<&Mesh> {
        let mut meshes = Vec::new();
        self.root.visit(&mut |node| meshes.extend(node.meshes.iter()));
        meshes
    }

    /// Every texture reference held by a mesh material, depth first.
    pub fn textures(&self) -> Vec<&AssetRef<TextureData>> {
        self.meshes()
            .into_iter()
            .flat_map(|mesh| mesh.material.textures())
            .collect()
    }
}
