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

//! # Relic Data
//!
//! Owns live assets. The [`AssetCatalog`](catalog::AssetCatalog) is the only
//! holder of strong references to assets; every other layer reaches them
//! through the references defined in `relic-core`.

#![warn(missing_docs)]

pub mod catalog;

pub use catalog::{AssetCatalog, CatalogError};
