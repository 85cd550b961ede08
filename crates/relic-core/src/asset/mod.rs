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

//! Provides the asset primitives shared by every layer of Relic.
//!
//! This module defines how an asset is identified, described and referenced,
//! but it has no knowledge of how assets are stored or imported.
//!
//! The key components are:
//! - The [`AssetData`] trait: A marker for payload types, carrying their [`AssetType`].
//! - [`ErasedAsset`] and [`Asset<T>`]: the type-erased and typed asset containers.
//! - [`GenericAssetRef`] and [`AssetRef<T>`]: non-owning references that become
//!   invalid once the owning catalog deletes the asset.

pub mod data;

mod handle;
mod id;
mod metadata;
mod reference;

pub use handle::*;
pub use id::*;
pub use metadata::*;
pub use reference::*;

/// A marker trait for payload types that can be stored in an [`Asset<T>`].
///
/// The supertraits enforce the same guarantees as any shared asset:
/// - `Send` + `Sync`: assets are reachable from any thread through their references.
/// - `'static`: the payload can be stored for the lifetime of the catalog.
///
/// # Examples
///
/// ```
/// use relic_core::asset::{AssetData, AssetType};
///
/// struct Subtitles {
///     lines: Vec<String>,
/// }
///
/// impl AssetData for Subtitles {
///     const TYPE: AssetType = AssetType::Script;
/// }
/// ```
pub trait AssetData: Send + Sync + 'static {
    /// The kind checked before downcasting a [`GenericAssetRef`] to this type.
    const TYPE: AssetType;
}
